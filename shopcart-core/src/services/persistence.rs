//! Persistence service - cart snapshots in key-value storage
//!
//! The stored format is a JSON array of objects with exactly three fields:
//!
//! ```json
//! [{"name": "Phone", "price": 799, "quantity": 2}]
//! ```
//!
//! Prices are written with their exact decimal digits, so a decode of an
//! encode always yields the same cart. Anything that does not match the shape
//! is rejected as a whole.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::domain::result::Result;
use crate::domain::{CartLine, CartState};
use crate::ports::KeyValueStorage;

/// Default storage slot for the cart
pub const DEFAULT_CART_KEY: &str = "cart";

/// One cart line as stored
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredLine {
    name: String,
    price: Box<RawValue>,
    quantity: u32,
}

/// Parse a raw JSON number into a non-negative decimal
fn parse_price(raw: &RawValue) -> std::result::Result<Decimal, String> {
    let text = raw.get().trim();
    let price = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| format!("price {} is not a number", text))?;
    if price < Decimal::ZERO {
        return Err(format!("price {} is negative", text));
    }
    Ok(price)
}

/// Serialize a cart to the stored JSON format
pub fn encode_cart(cart: &CartState) -> Result<String> {
    let stored = cart
        .lines()
        .iter()
        .map(|line| -> Result<StoredLine> {
            let price = RawValue::from_string(line.price.normalize().to_string())?;
            Ok(StoredLine {
                name: line.name.clone(),
                price,
                quantity: line.quantity,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_string(&stored)?)
}

/// Parse the stored JSON format, explaining what is wrong on failure
pub fn decode_cart(data: &str) -> std::result::Result<CartState, String> {
    let stored: Vec<StoredLine> = serde_json::from_str(data).map_err(|e| e.to_string())?;

    let mut lines = Vec::with_capacity(stored.len());
    for entry in stored {
        let price = parse_price(&entry.price)?;
        if entry.quantity == 0 {
            return Err(format!("line '{}' has quantity 0", entry.name));
        }
        lines.push(CartLine::new(entry.name, price, entry.quantity));
    }

    CartState::from_lines(lines).ok_or_else(|| "duplicate item names".to_string())
}

/// How the startup read went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was stored
    Missing,
    /// A stored cart was restored
    Restored { lines: usize },
    /// Something was stored but could not be used
    Discarded { reason: String },
}

/// Result of rehydrating the cart at startup
#[derive(Debug, Clone)]
pub struct Rehydrated {
    pub cart: CartState,
    pub outcome: LoadOutcome,
}

/// Persistence service for the cart slot
pub struct PersistenceService {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl PersistenceService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored cart
    ///
    /// Never fails: a missing, unreadable or malformed slot yields an empty
    /// cart and the outcome says why.
    pub fn load(&self) -> Rehydrated {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return Rehydrated {
                    cart: CartState::new(),
                    outcome: LoadOutcome::Missing,
                }
            }
            Err(e) => {
                return Rehydrated {
                    cart: CartState::new(),
                    outcome: LoadOutcome::Discarded {
                        reason: e.to_string(),
                    },
                }
            }
        };

        match decode_cart(&raw) {
            Ok(cart) => Rehydrated {
                outcome: LoadOutcome::Restored { lines: cart.len() },
                cart,
            },
            Err(reason) => Rehydrated {
                cart: CartState::new(),
                outcome: LoadOutcome::Discarded { reason },
            },
        }
    }

    /// Overwrite the stored cart
    pub fn save(&self, cart: &CartState) -> Result<()> {
        let data = encode_cart(cart)?;
        self.storage.set(&self.key, &data)
    }
}
