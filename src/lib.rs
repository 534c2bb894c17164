//! TriCache - An in-memory record cache indexed three ways
//!
//! Records have an account id, a name and a value, each unique across the
//! cache and each usable as a lookup key in O(log n).
//! - `store` owns the records and the three indexes
//! - `shared` wraps a cache for use across threads
//! - `ops` describes cache calls as data and replays JSON scripts

pub mod config;
pub mod error;
pub mod ops;
pub mod shared;
pub mod store;

/// Re-export commonly used types
pub use config::AppConfig;
pub use error::{CacheError, CacheResult};
pub use ops::{Operation, Outcome};
pub use shared::SharedCache;
pub use store::{CacheStats, Record, RecordDraft, TriIndexCache};
