//! Checkout command - pay for the cart

use anyhow::Result;
use shopcart_core::ports::AlwaysConfirm;
use shopcart_core::{CheckoutOutcome, ShopContext};

use super::TerminalConfirm;
use crate::output;

pub fn run(ctx: &mut ShopContext, yes: bool) -> Result<()> {
    if !ctx.shop.cart().is_empty() {
        println!("Total: {}", ctx.config.money(ctx.shop.total()));
    }

    let outcome = if yes {
        ctx.shop.checkout(&AlwaysConfirm(true))?
    } else {
        ctx.shop.checkout(&TerminalConfirm)?
    };
    match &outcome {
        CheckoutOutcome::EmptyCart | CheckoutOutcome::Cancelled => {
            output::warning(outcome.message())
        }
        CheckoutOutcome::Completed { total, item_count } => {
            output::success(outcome.message());
            println!("Paid {} for {} item(s)", ctx.config.money(*total), item_count);
        }
    }
    Ok(())
}
