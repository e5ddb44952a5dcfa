//! Cart domain model
//!
//! `CartState` is an ordered list of lines, unique by item name, where every
//! line has a quantity of at least one. All mutations go through the methods
//! below, which keep both properties as postconditions and report whether
//! anything actually changed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One distinct item in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    /// Price captured when the item was first added
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// The user's current selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from existing lines
    ///
    /// Returns `None` if a name repeats or a quantity is zero.
    pub fn from_lines(lines: Vec<CartLine>) -> Option<Self> {
        for (i, line) in lines.iter().enumerate() {
            if line.quantity == 0 || lines[..i].iter().any(|l| l.name == line.name) {
                return None;
            }
        }
        Some(Self { lines })
    }

    /// Add one unit of `name`
    ///
    /// An existing line keeps its original price.
    pub fn add_item(&mut self, name: &str, price: Decimal) -> bool {
        match self.position(name) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine::new(name, price, 1)),
        }
        true
    }

    /// Shift the quantity of `name` by `delta`, removing the line at zero or below
    pub fn change_quantity(&mut self, name: &str, delta: i64) -> bool {
        let Some(idx) = self.position(name) else {
            return false;
        };
        if delta == 0 {
            return false;
        }

        let next = i64::from(self.lines[idx].quantity).saturating_add(delta);
        if next > 0 {
            self.lines[idx].quantity = u32::try_from(next).unwrap_or(u32::MAX);
        } else {
            self.lines.remove(idx);
        }
        true
    }

    /// Drop the line for `name` if present
    pub fn remove_item(&mut self, name: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.name != name);
        self.lines.len() != before
    }

    /// Empty the cart
    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, name: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.name == name)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.name == name)
    }
}
