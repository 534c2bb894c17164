//! In-memory record storage
//!
//! Provides the record type and the triple-indexed cache that owns records.
//! This module is independent of scripts and configuration (loose coupling).

mod cache;
mod key;
mod record;

pub use cache::{CacheStats, TriIndexCache};
pub use record::{Record, RecordDraft};
