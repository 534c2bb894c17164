//! Record structure held by the cache

use crate::error::CacheError;
use serde::{Deserialize, Serialize};

/// A single record, unique by each of its three fields
///
/// Fields are read-only outside the crate. Once a record is admitted,
/// only the cache's update operations may change them, so the indexes
/// never drift from the values stored on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    account: i64,
    name: String,
    value: f64,
}

impl Record {
    /// Create a new record
    pub fn new(account: i64, name: impl Into<String>, value: f64) -> Self {
        Record {
            account,
            name: name.into(),
            value,
        }
    }

    /// Account id
    pub fn account(&self) -> i64 {
        self.account
    }

    /// Name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value
    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn set_account(&mut self, account: i64) {
        self.account = account;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Calculate approximate memory usage of this record in bytes
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Record>() + self.name.capacity()
    }
}

/// A record as received from outside the cache, where any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    #[serde(default)]
    pub account: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl RecordDraft {
    /// Draft with every field present
    pub fn complete(account: i64, name: impl Into<String>, value: f64) -> Self {
        RecordDraft {
            account: Some(account),
            name: Some(name.into()),
            value: Some(value),
        }
    }
}

impl From<Record> for RecordDraft {
    fn from(record: Record) -> Self {
        RecordDraft {
            account: Some(record.account),
            name: Some(record.name),
            value: Some(record.value),
        }
    }
}

impl TryFrom<RecordDraft> for Record {
    type Error = CacheError;

    fn try_from(draft: RecordDraft) -> Result<Self, Self::Error> {
        let account = draft
            .account
            .ok_or_else(|| CacheError::invalid_argument("record has no account"))?;
        let name = draft
            .name
            .ok_or_else(|| CacheError::invalid_argument("record has no name"))?;
        let value = draft
            .value
            .ok_or_else(|| CacheError::invalid_argument("record has no value"))?;

        Ok(Record::new(account, name, value))
    }
}
