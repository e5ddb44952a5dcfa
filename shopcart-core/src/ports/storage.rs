//! Storage port - durable key-value slots

use crate::domain::result::Result;

/// Durable string key-value storage
///
/// Mirrors the shape of browser local storage: each key holds one string,
/// and `set` overwrites whatever was there before.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
