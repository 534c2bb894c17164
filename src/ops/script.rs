//! Operation scripts
//!
//! A script is a JSON array of operations applied in order to one cache.

use super::{apply, Operation, Outcome};
use crate::error::CacheResult;
use crate::store::TriIndexCache;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// Summary of a script run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptReport {
    /// Operations applied
    pub applied: usize,

    /// Operations refused with an error
    pub failed: usize,

    /// One entry per operation, `None` where the operation failed
    pub outcomes: Vec<Option<Outcome>>,
}

/// Load a script file
pub fn load_script<P: AsRef<Path>>(path: P) -> CacheResult<Vec<Operation>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let ops: Vec<Operation> = serde_json::from_reader(BufReader::new(file))?;

    info!("Loaded {} operations from {:?}", ops.len(), path);
    Ok(ops)
}

/// Apply every operation to the cache
///
/// A failing operation is logged and skipped; the rest still run.
pub fn run_script(cache: &mut TriIndexCache, ops: &[Operation]) -> ScriptReport {
    let mut report = ScriptReport::default();

    for (i, op) in ops.iter().enumerate() {
        match apply(cache, op) {
            Ok(outcome) => {
                debug!("#{} {} -> {:?}", i, op.name(), outcome);
                report.applied += 1;
                report.outcomes.push(Some(outcome));
            }
            Err(e) => {
                warn!("Operation #{} ({}) failed: {}. Skipping.", i, op.name(), e);
                report.failed += 1;
                report.outcomes.push(None);
            }
        }
    }

    info!(
        "Script done: {} applied, {} failed, {} records in cache",
        report.applied,
        report.failed,
        cache.size()
    );
    report
}
