//! Cart commands - add, change, remove, show and clear cart lines

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::Confirm;
use shopcart_core::domain::line_total;
use shopcart_core::ShopContext;

use super::resolve_cart_line;
use crate::output;

/// Add one unit of a catalog product
pub fn add(ctx: &mut ShopContext, name: &str) -> Result<()> {
    let Some(added) = ctx.shop.add_product(name)? else {
        bail!("No product named '{}' (see `cart products`)", name);
    };

    let quantity = ctx.shop.cart().get(&added).map_or(0, |l| l.quantity);
    output::success(&format!("Added {} (now {} in cart)", added, quantity));
    Ok(())
}

/// Shift a line's quantity; reaching zero removes it
pub fn change(ctx: &mut ShopContext, name: &str, delta: i64) -> Result<()> {
    let line = resolve_cart_line(ctx, name)?;
    ctx.shop.change_quantity(&line, delta)?;

    match ctx.shop.cart().get(&line) {
        Some(l) => output::success(&format!("{} x {}", l.name, l.quantity)),
        None => output::info(&format!("Removed {} from the cart", line)),
    }
    Ok(())
}

pub fn remove(ctx: &mut ShopContext, name: &str) -> Result<()> {
    let line = resolve_cart_line(ctx, name)?;
    ctx.shop.remove_item(&line)?;
    output::info(&format!("Removed {} from the cart", line));
    Ok(())
}

pub fn show(ctx: &ShopContext, json: bool) -> Result<()> {
    let cart = ctx.shop.cart();

    if json {
        let value = serde_json::json!({
            "lines": cart.lines().iter().map(|l| serde_json::json!({
                "name": l.name,
                "price": l.price,
                "quantity": l.quantity,
                "subtotal": line_total(l),
            })).collect::<Vec<_>>(),
            "itemCount": cart.item_count(),
            "total": ctx.shop.total(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if cart.is_empty() {
        output::warning("Your cart is empty.");
        return Ok(());
    }

    for line in cart.lines() {
        println!(
            "{} - {} x {} = {}",
            line.name,
            ctx.config.money(line.price),
            line.quantity,
            ctx.config.money(line_total(line))
        );
    }
    println!(
        "{} {}",
        "Total:".bold(),
        ctx.config.money(ctx.shop.total()).bold()
    );
    Ok(())
}

/// Empty the cart without checking out
pub fn clear(ctx: &mut ShopContext, force: bool) -> Result<()> {
    if ctx.shop.cart().is_empty() {
        output::warning("Your cart is empty.");
        return Ok(());
    }

    if !force {
        let items = ctx.shop.cart().item_count();
        if !Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from the cart?", items))
            .default(false)
            .interact()?
        {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    ctx.shop.clear()?;
    output::success("Cart cleared");
    Ok(())
}
