//! Shopcart CLI - a shopping cart in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shopcart_core::{CategoryFilter, EntryPoint, ShopContext};

mod commands;
mod output;

use commands::{cart, checkout, get_context, get_logger, log_command, logs, products, session, shell};

/// Shopcart - a shopping cart in your terminal
#[derive(Parser)]
#[command(name = "cart", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the catalog
    Products {
        /// Only show products whose name contains this text
        #[arg(long, short)]
        search: Option<String>,
        /// Only show one category (all, electronics, clothing, cosmetics)
        #[arg(long, short)]
        category: Option<CategoryFilter>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add one unit of a product to the cart
    Add {
        /// Product name
        name: String,
    },

    /// Increase the quantity of a cart line
    Inc {
        /// Product name
        name: String,
        /// How many to add
        #[arg(long, default_value = "1")]
        by: u32,
    },

    /// Decrease the quantity of a cart line (removed at zero)
    Dec {
        /// Product name
        name: String,
        /// How many to take away
        #[arg(long, default_value = "1")]
        by: u32,
    },

    /// Remove a line from the cart
    Remove {
        /// Product name
        name: String,
    },

    /// Show the cart and its total
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pay for the cart
    Checkout {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Empty the cart without paying
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Log in for this command
    Login {
        /// Username
        username: String,
    },

    /// Start an interactive shopping session
    Shell {
        /// Keep the cart in memory only
        #[arg(long)]
        ephemeral: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Products { .. } => "products",
            Commands::Add { .. } => "add",
            Commands::Inc { .. } => "inc",
            Commands::Dec { .. } => "dec",
            Commands::Remove { .. } => "remove",
            Commands::Show { .. } => "show",
            Commands::Checkout { .. } => "checkout",
            Commands::Clear { .. } => "clear",
            Commands::Login { .. } => "login",
            Commands::Shell { .. } => "shell",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    let result = run(cli);

    let logger = get_logger(EntryPoint::Cli);

    match result {
        Ok(()) => {
            log_command(&logger, name, None);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_command(&logger, name, Some(&e.to_string()));
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn shop() -> Result<ShopContext> {
    get_context(EntryPoint::Cli)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Products { search, category, json } => {
            let mut ctx = shop()?;
            if let Some(term) = search {
                ctx.shop.set_search_term(term);
            }
            if let Some(category) = category {
                ctx.shop.set_category(category);
            }
            products::run(&ctx, json)
        }
        Commands::Add { name } => cart::add(&mut shop()?, &name),
        Commands::Inc { name, by } => cart::change(&mut shop()?, &name, i64::from(by)),
        Commands::Dec { name, by } => cart::change(&mut shop()?, &name, -i64::from(by)),
        Commands::Remove { name } => cart::remove(&mut shop()?, &name),
        Commands::Show { json } => cart::show(&shop()?, json),
        Commands::Checkout { yes } => checkout::run(&mut shop()?, yes),
        Commands::Clear { force } => cart::clear(&mut shop()?, force),
        Commands::Login { username } => session::login(&mut shop()?, &username),
        Commands::Shell { ephemeral } => shell::run(ephemeral),
        Commands::Logs { command } => logs::run(command),
    }
}
