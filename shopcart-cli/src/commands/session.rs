//! Session commands - login, logout and whoami

use anyhow::Result;
use shopcart_core::{SessionTransition, ShopContext};

use crate::output;

/// A blank username leaves the session as it was
pub fn login(ctx: &mut ShopContext, username: &str) -> Result<()> {
    if ctx.shop.login(username) == SessionTransition::Unchanged && !ctx.shop.session().logged_in {
        return Ok(());
    }
    output::success(&format!(
        "Welcome to your shopping point, {}!",
        ctx.shop.session().username
    ));
    Ok(())
}

pub fn logout(ctx: &mut ShopContext) -> Result<()> {
    match ctx.shop.logout() {
        SessionTransition::LoggedOut => output::info("Logged out. Your cart is still here."),
        _ => output::warning("You are not logged in."),
    }
    Ok(())
}

pub fn whoami(ctx: &ShopContext) -> Result<()> {
    match ctx.shop.session().user() {
        Some(user) => println!("{}", user),
        None => output::warning("You are not logged in."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopcart_core::EntryPoint;
    use tempfile::tempdir;

    #[test]
    fn test_blank_login_is_ignored() {
        let dir = tempdir().unwrap();
        let mut ctx = ShopContext::ephemeral(dir.path(), EntryPoint::Cli).unwrap();

        assert!(login(&mut ctx, "").is_ok());
        assert!(login(&mut ctx, "   ").is_ok());
        assert!(!ctx.shop.session().logged_in);

        login(&mut ctx, "alice").unwrap();
        assert_eq!(ctx.shop.session().user(), Some("alice"));
    }
}
