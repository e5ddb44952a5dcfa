//! Totals calculation
//!
//! Amounts keep full decimal precision; rounding happens only when formatting.

use rust_decimal::{Decimal, RoundingStrategy};

use super::cart::{CartLine, CartState};

/// `price * quantity` for a single line
pub fn line_total(line: &CartLine) -> Decimal {
    line.price * Decimal::from(line.quantity)
}

/// Sum of all line totals
pub fn compute_total(cart: &CartState) -> Decimal {
    cart.lines().iter().map(line_total).sum()
}

/// Format an amount with exactly two decimal places
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_total() {
        let cart = CartState::from_lines(vec![
            CartLine::new("T-Shirt", Decimal::new(20, 0), 2),
            CartLine::new("sunscreen", Decimal::new(15, 0), 1),
        ])
        .unwrap();

        assert_eq!(compute_total(&cart), Decimal::new(55, 0));
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(compute_total(&CartState::new()), Decimal::ZERO);
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_total_keeps_precision() {
        let cart = CartState::from_lines(vec![
            CartLine::new("Sample", Decimal::new(3333, 4), 3),
        ])
        .unwrap();

        // 0.3333 * 3, not 0.33 * 3
        assert_eq!(compute_total(&cart), Decimal::new(9999, 4));
        assert_eq!(format_amount(compute_total(&cart)), "1.00");
    }

    #[test]
    fn test_format_amount_rounding() {
        assert_eq!(format_amount(Decimal::new(799, 0)), "799.00");
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format_amount(Decimal::new(1994, 3)), "1.99");
        assert_eq!(format_amount(Decimal::new(125, 1)), "12.50");
    }

    #[test]
    fn test_line_total() {
        let line = CartLine::new("Jeans", Decimal::new(30, 0), 3);
        assert_eq!(line_total(&line), Decimal::new(90, 0));
    }
}
