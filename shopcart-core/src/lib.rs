//! Shopcart Core - Business logic for a local shopping cart
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities and pure derivations (Catalog, CartState, filters, totals)
//! - **ports**: Trait definitions for external dependencies (KeyValueStorage, Confirmation)
//! - **services**: Business logic orchestration (ShopService, persistence, event log)
//! - **adapters**: Concrete implementations (JSON file storage, in-memory storage)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::{JsonFileStorage, MemoryStorage};
use config::Config;
use ports::KeyValueStorage;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    CartLine, CartState, Catalog, CatalogItem, Category, CategoryFilter, FilterState, Session,
    SessionTransition,
};
pub use services::{CheckoutOutcome, EntryPoint, LogEntry, LogEvent, LogFilter, LoggingService};

/// Main context for Shopcart operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration and the shop service that owns the cart.
pub struct ShopContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub shop: ShopService,
}

impl ShopContext {
    /// Open the shop backed by `storage.json` in `data_dir`
    pub fn new(data_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let storage = Arc::new(JsonFileStorage::new(data_dir)?);
        Self::with_storage(data_dir, entry_point, storage)
    }

    /// Open the shop with a cart that lives only as long as the process
    pub fn ephemeral(data_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        Self::with_storage(data_dir, entry_point, Arc::new(MemoryStorage::new()))
    }

    /// Open the shop on top of any storage adapter
    pub fn with_storage(
        data_dir: &Path,
        entry_point: EntryPoint,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self> {
        let config = Config::load(data_dir)?;

        // Event logging failures shouldn't block the cart
        let logger = if config.event_log {
            LoggingService::new(data_dir, entry_point, env!("CARGO_PKG_VERSION")).ok()
        } else {
            None
        };

        let persistence = PersistenceService::new(storage, config.storage_key.clone());
        let shop = ShopService::open(Catalog::builtin(), persistence, logger);

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            shop,
        })
    }
}
