//! Shell command - interactive shopping session
//!
//! One shop stays open for the whole session, so the login state and the
//! product filter carry over from one line to the next.

use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use shopcart_core::{CategoryFilter, EntryPoint, ShopContext};

use super::{cart, checkout, get_context, get_ephemeral_context, get_logger, log_command, products, session};
use crate::output;

#[derive(Parser)]
#[command(name = "shell", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// List products matching the current search and category
    Products {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product to the cart
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Increase the quantity of a cart line
    Inc {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        #[arg(long, default_value = "1")]
        by: u32,
    },
    /// Decrease the quantity of a cart line
    Dec {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
        #[arg(long, default_value = "1")]
        by: u32,
    },
    /// Remove a line from the cart
    Remove {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
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
    /// Empty the cart
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Log in
    Login {
        #[arg(required = true, num_args = 1..)]
        username: Vec<String>,
    },
    /// Log out (the cart is kept)
    Logout,
    /// Filter products by name; no term clears the search
    Search { term: Vec<String> },
    /// Filter products by category (all, electronics, clothing, cosmetics)
    Category { category: CategoryFilter },
    /// Show who is logged in
    Whoami,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

fn prompt(ctx: &ShopContext) -> String {
    match ctx.shop.session().user() {
        Some(user) => format!("{}@cart> ", user),
        None => "cart> ".to_string(),
    }
}

fn execute(ctx: &mut ShopContext, command: ShellCommand) -> Result<Flow> {
    match command {
        ShellCommand::Products { json } => products::run(ctx, json)?,
        ShellCommand::Add { name } => cart::add(ctx, &name.join(" "))?,
        ShellCommand::Inc { name, by } => cart::change(ctx, &name.join(" "), i64::from(by))?,
        ShellCommand::Dec { name, by } => cart::change(ctx, &name.join(" "), -i64::from(by))?,
        ShellCommand::Remove { name } => cart::remove(ctx, &name.join(" "))?,
        ShellCommand::Show { json } => cart::show(ctx, json)?,
        ShellCommand::Checkout { yes } => checkout::run(ctx, yes)?,
        ShellCommand::Clear { force } => cart::clear(ctx, force)?,
        ShellCommand::Login { username } => session::login(ctx, &username.join(" "))?,
        ShellCommand::Logout => session::logout(ctx)?,
        ShellCommand::Search { term } => {
            ctx.shop.set_search_term(term.join(" "));
            products::run(ctx, false)?;
        }
        ShellCommand::Category { category } => {
            ctx.shop.set_category(category);
            products::run(ctx, false)?;
        }
        ShellCommand::Whoami => session::whoami(ctx)?,
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

pub fn run(ephemeral: bool) -> Result<()> {
    let mut ctx = if ephemeral {
        get_ephemeral_context(EntryPoint::Shell)?
    } else {
        get_context(EntryPoint::Shell)?
    };
    let logger = get_logger(EntryPoint::Shell);

    println!("{}", "Shopcart shell".bold());
    println!("{}", "Type `help` for commands, `quit` to leave.".dimmed());
    if !ctx.shop.cart().is_empty() {
        output::info(&format!(
            "Your cart has {} item(s) from last time.",
            ctx.shop.cart().item_count()
        ));
    }

    loop {
        print!("{}", prompt(&ctx));
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&name) = words.first() else {
            continue;
        };

        let parsed = match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        match execute(&mut ctx, parsed.command) {
            Ok(Flow::Continue) => log_command(&logger, name, None),
            Ok(Flow::Quit) => break,
            Err(e) => {
                output::error(&e.to_string());
                log_command(&logger, name, Some(&e.to_string()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ShellCommand {
        let words: Vec<&str> = line.split_whitespace().collect();
        ShellLine::try_parse_from(words).unwrap().command
    }

    #[test]
    fn test_parse_quantity_commands() {
        match parse("dec Phone --by 2") {
            ShellCommand::Dec { name, by } => {
                assert_eq!(name, vec!["Phone"]);
                assert_eq!(by, 2);
            }
            _ => panic!("expected dec"),
        }
        match parse("inc T-Shirt") {
            ShellCommand::Inc { by, .. } => assert_eq!(by, 1),
            _ => panic!("expected inc"),
        }
    }

    #[test]
    fn test_parse_filters() {
        match parse("category Clothing") {
            ShellCommand::Category { category } => assert_eq!(category, CategoryFilter::Clothing),
            _ => panic!("expected category"),
        }
        match parse("search") {
            ShellCommand::Search { term } => assert!(term.is_empty()),
            _ => panic!("expected search"),
        }
        assert!(ShellLine::try_parse_from(["category", "shoes"]).is_err());
    }

    #[test]
    fn test_parse_exit_alias() {
        assert!(matches!(parse("exit"), ShellCommand::Quit));
        assert!(ShellLine::try_parse_from(["add"]).is_err());
    }
}
