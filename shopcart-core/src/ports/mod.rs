//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod confirmation;
mod storage;

pub use confirmation::{AlwaysConfirm, Confirmation};
pub use storage::KeyValueStorage;
