//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - A JSON file in the data directory for KeyValueStorage
//! - An in-memory map for KeyValueStorage (tests, ephemeral runs)

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
