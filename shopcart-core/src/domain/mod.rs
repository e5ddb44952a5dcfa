//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! and pure derivations - no I/O or external dependencies.

mod cart;
mod catalog;
pub mod filter;
pub mod result;
mod session;
pub mod totals;

pub use cart::{CartLine, CartState};
pub use catalog::{Catalog, CatalogItem, Category};
pub use filter::{compute_visible, CategoryFilter, FilterState};
pub use session::{Session, SessionTransition};
pub use totals::{compute_total, format_amount, line_total};
