//! CLI command implementations

pub mod cart;
pub mod checkout;
pub mod logs;
pub mod products;
pub mod session;
pub mod shell;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dialoguer::Confirm;
use shopcart_core::config::Config;
use shopcart_core::ports::Confirmation;
use shopcart_core::{EntryPoint, Error, LoggingService, ShopContext};

/// Get the logging service for CLI operations
///
/// Returns None if the event log is switched off or fails to initialize
/// (shouldn't block operations)
pub fn get_logger(entry_point: EntryPoint) -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    if !Config::load(&data_dir).ok()?.event_log {
        return None;
    }
    LoggingService::new(&data_dir, entry_point, env!("CARGO_PKG_VERSION")).ok()
}

/// Record a finished command, ignoring any errors (logging should never break the app)
pub fn log_command(logger: &Option<LoggingService>, command: &str, error: Option<&str>) {
    if let Some(l) = logger {
        let _ = l.log_command(command, error);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SHOPCART_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".shopcart"))
        .context("Could not find home directory; set SHOPCART_DIR")
}

/// Open the shop in the data directory
pub fn get_context(entry_point: EntryPoint) -> Result<ShopContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    ShopContext::new(&data_dir, entry_point).context("Failed to open the shop")
}

/// Open a shop whose cart is dropped when the process exits
pub fn get_ephemeral_context(entry_point: EntryPoint) -> Result<ShopContext> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    ShopContext::ephemeral(&data_dir, entry_point).context("Failed to open the shop")
}

/// Resolve `name` to the name of a line already in the cart
///
/// Exact match first, then case-insensitive.
pub fn resolve_cart_line(ctx: &ShopContext, name: &str) -> Result<String> {
    let cart = ctx.shop.cart();
    if let Some(line) = cart.get(name) {
        return Ok(line.name.clone());
    }

    let wanted = name.trim().to_lowercase();
    match cart.lines().iter().find(|l| l.name.to_lowercase() == wanted) {
        Some(line) => Ok(line.name.clone()),
        None => bail!("'{}' is not in your cart", name),
    }
}

/// Confirmation through a terminal prompt
pub struct TerminalConfirm;

impl Confirmation for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> shopcart_core::domain::result::Result<bool> {
        if !atty::is(atty::Stream::Stdin) {
            return Err(Error::prompt(
                "No terminal to ask for confirmation (use --yes to skip the prompt)",
            ));
        }

        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::prompt(e.to_string()))
    }
}
