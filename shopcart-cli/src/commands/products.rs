//! Products command - list the catalog through the current filter

use anyhow::Result;
use colored::Colorize;
use shopcart_core::ShopContext;

use crate::output;

pub fn run(ctx: &ShopContext, json: bool) -> Result<()> {
    let visible = ctx.shop.visible_products();

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    let filter = ctx.shop.filter();
    if !filter.is_default() {
        let search = if filter.search_term.is_empty() {
            String::new()
        } else {
            format!(", search \"{}\"", filter.search_term)
        };
        println!(
            "{}",
            format!("Category: {}{}", filter.category, search).dimmed()
        );
    }

    if visible.is_empty() {
        output::warning("No products match.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Product", "Category", "Price"]);
    for item in &visible {
        let in_cart = ctx
            .shop
            .cart()
            .get(&item.name)
            .map(|line| format!("  ({} in cart)", line.quantity))
            .unwrap_or_default();
        table.add_row(vec![
            format!("{}{}", item.name, in_cart.dimmed()),
            item.category.to_string(),
            ctx.config.money(item.price),
        ]);
    }
    println!("{}", table);

    Ok(())
}
