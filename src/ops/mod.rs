//! Cache operations as data
//!
//! Each cache call can be described by an [`Operation`] and its result by an
//! [`Outcome`], so a sequence of calls can be read from JSON and replayed
//! against a cache.

mod script;

pub use script::{load_script, run_script, ScriptReport};

use crate::error::CacheResult;
use crate::store::{Record, RecordDraft, TriIndexCache};
use serde::{Deserialize, Serialize};

/// A single cache operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Add { record: RecordDraft },
    GetByAccount { account: i64 },
    GetByName { name: String },
    GetByValue { value: f64 },
    UpdateAccount { old: i64, new: i64 },
    UpdateName { old: String, new: String },
    UpdateValue { old: f64, new: f64 },
    Remove { record: RecordDraft },
    Size,
}

impl Operation {
    /// Get the operation name (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::GetByAccount { .. } => "get_by_account",
            Operation::GetByName { .. } => "get_by_name",
            Operation::GetByValue { .. } => "get_by_value",
            Operation::UpdateAccount { .. } => "update_account",
            Operation::UpdateName { .. } => "update_name",
            Operation::UpdateValue { .. } => "update_value",
            Operation::Remove { .. } => "remove",
            Operation::Size => "size",
        }
    }
}

/// Result of a cache operation
///
/// `Updated` carries whatever the cache returned, which on a key collision
/// is the record unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Added(bool),
    Found(Option<Record>),
    Updated(Option<Record>),
    Removed(bool),
    Size(usize),
}

/// Apply one operation to the cache
///
/// Fails only when an `add` or `remove` carries an incomplete record.
pub fn apply(cache: &mut TriIndexCache, op: &Operation) -> CacheResult<Outcome> {
    let outcome = match op {
        Operation::Add { record } => Outcome::Added(cache.add_draft(record.clone())?),
        Operation::GetByAccount { account } => {
            Outcome::Found(cache.get_by_account(*account).cloned())
        }
        Operation::GetByName { name } => Outcome::Found(cache.get_by_name(name).cloned()),
        Operation::GetByValue { value } => Outcome::Found(cache.get_by_value(*value).cloned()),
        Operation::UpdateAccount { old, new } => {
            Outcome::Updated(cache.update_account(*old, *new).cloned())
        }
        Operation::UpdateName { old, new } => {
            Outcome::Updated(cache.update_name(old, new.as_str()).cloned())
        }
        Operation::UpdateValue { old, new } => {
            Outcome::Updated(cache.update_value(*old, *new).cloned())
        }
        Operation::Remove { record } => {
            let record = Record::try_from(record.clone())?;
            Outcome::Removed(cache.remove(&record))
        }
        Operation::Size => Outcome::Size(cache.size()),
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[test]
    fn test_parse_operation() {
        let op: Operation =
            serde_json::from_str(r#"{"op": "update_account", "old": 1, "new": 3}"#).unwrap();
        assert_eq!(op, Operation::UpdateAccount { old: 1, new: 3 });
        assert_eq!(op.name(), "update_account");

        let op: Operation = serde_json::from_str(r#"{"op": "size"}"#).unwrap();
        assert_eq!(op, Operation::Size);
    }

    #[test]
    fn test_apply() {
        let mut cache = TriIndexCache::new();
        let add = Operation::Add {
            record: RecordDraft::complete(1, "Alice", 10.0),
        };

        assert_eq!(apply(&mut cache, &add), Ok(Outcome::Added(true)));
        assert_eq!(apply(&mut cache, &add), Ok(Outcome::Added(false)));
        assert_eq!(
            apply(
                &mut cache,
                &Operation::GetByName {
                    name: "Alice".into(),
                }
            ),
            Ok(Outcome::Found(Some(Record::new(1, "Alice", 10.0))))
        );
        assert_eq!(
            apply(
                &mut cache,
                &Operation::UpdateValue {
                    old: 10.0,
                    new: 12.0,
                }
            ),
            Ok(Outcome::Updated(Some(Record::new(1, "Alice", 12.0))))
        );
        assert_eq!(apply(&mut cache, &Operation::Size), Ok(Outcome::Size(1)));
    }

    #[test]
    fn test_remove_with_draft_from_record() {
        let mut cache = TriIndexCache::new();
        cache.add(Record::new(1, "Alice", 10.0));
        let found = cache.get_by_account(1).cloned().unwrap();

        let remove = Operation::Remove {
            record: RecordDraft::from(found),
        };

        assert_eq!(apply(&mut cache, &remove), Ok(Outcome::Removed(true)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_apply_incomplete_record() {
        let mut cache = TriIndexCache::new();
        let remove = Operation::Remove {
            record: RecordDraft {
                account: Some(1),
                ..RecordDraft::default()
            },
        };

        assert!(matches!(
            apply(&mut cache, &remove),
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_outcome_json() {
        let outcome = Outcome::Found(Some(Record::new(3, "Alice", 10.0)));
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"found":{"account":3,"name":"Alice","value":10.0}}"#);
    }
}
