//! Logs command - browse the shop's event log

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use serde::Serialize;

use super::get_data_dir;
use crate::output;
use shopcart_core::{EntryPoint, LogEntry, LogFilter, LoggingService};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only this event, e.g. checkout_completed
        #[arg(long)]
        event: Option<String>,
        /// Only events recorded for this user
        #[arg(long)]
        user: Option<String>,
        /// Only failed commands and writes
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize cart activity
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop events older than a number of days
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: u32,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

/// Counts of the events a shopper cares about
#[derive(Debug, Default, PartialEq, Serialize)]
struct CartActivity {
    logins: u64,
    checkouts: u64,
    carts_emptied: u64,
    carts_restored: u64,
    stored_carts_discarded: u64,
    write_failures: u64,
    commands: u64,
}

impl CartActivity {
    fn from_counts(counts: &BTreeMap<String, u64>) -> Self {
        let count = |event: &str| counts.get(event).copied().unwrap_or(0);
        Self {
            logins: count("user_logged_in"),
            checkouts: count("checkout_completed"),
            carts_emptied: count("cart_emptied"),
            carts_restored: count("cart_rehydrated"),
            stored_carts_discarded: count("stored_cart_discarded"),
            write_failures: count("cart_write_failed"),
            commands: count("command_executed"),
        }
    }
}

fn open_log() -> Result<LoggingService> {
    let data_dir = get_data_dir()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Command, detail and error folded into one column
fn details(entry: &LogEntry) -> String {
    let mut parts: Vec<String> = [entry.command.as_deref(), entry.detail.as_deref()]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    if let Some(message) = &entry.error_message {
        parts.push(message.red().to_string());
    }
    parts.join(" | ")
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = open_log()?;

    match command {
        LogsCommands::List { limit, event, user, errors, json } => {
            let filter = LogFilter { event, username: user, errors_only: errors };
            list(&service, &filter, limit, json)
        }
        LogsCommands::Stats { json } => stats(&service, json),
        LogsCommands::Clear { older_than_days, force } => clear(&service, older_than_days, force),
    }
}

fn list(service: &LoggingService, filter: &LogFilter, limit: usize, json: bool) -> Result<()> {
    let entries = service.query(filter, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No matching events.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "User", "Details"]);
    for entry in &entries {
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.event.clone(),
            entry.username.clone().unwrap_or_default(),
            details(entry),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let activity = CartActivity::from_counts(&service.event_counts()?);
    let total = service.count()?;
    let errors = service.get_errors(usize::MAX)?.len();
    let log_path = service.log_path();
    let size_bytes = std::fs::metadata(log_path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "activity": activity,
                "total_entries": total,
                "errors": errors,
                "log_path": log_path.to_string_lossy(),
                "log_size_bytes": size_bytes,
            })
        );
        return Ok(());
    }

    println!("{}", "Cart activity".bold());
    println!("  Logins:                 {}", activity.logins);
    println!("  Checkouts:              {}", activity.checkouts);
    println!("  Carts emptied:          {}", activity.carts_emptied);
    println!("  Carts restored:         {}", activity.carts_restored);
    println!("  Stored carts discarded: {}", activity.stored_carts_discarded);
    println!("  Write failures:         {}", activity.write_failures);
    println!("  Commands run:           {}", activity.commands);
    println!("  Errors:                 {}", errors);
    println!("  Total events:           {}", total);
    println!();
    println!("  File: {} ({} bytes)", log_path.display(), size_bytes);
    Ok(())
}

fn clear(service: &LoggingService, older_than_days: u32, force: bool) -> Result<()> {
    let cutoff = Utc::now() - Duration::days(i64::from(older_than_days));

    if !force
        && !Confirm::new()
            .with_prompt(format!("Delete events older than {} days?", older_than_days))
            .default(false)
            .interact()?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    let deleted = service.delete_before(cutoff.timestamp_millis())?;
    output::success(&format!("Deleted {} event(s)", deleted));
    Ok(())
}
