//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod logging;
pub mod persistence;
mod shop;

pub use logging::{EntryPoint, LogEntry, LogEvent, LogFilter, LoggingService};
pub use persistence::{LoadOutcome, PersistenceService, Rehydrated};
pub use shop::{CheckoutOutcome, ShopService, CHECKOUT_PROMPT};
