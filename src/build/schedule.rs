//! Parallel compilation scheduling.
//!
//! Units are independent: headers are read-only inputs and no unit produces
//! another unit's input, so the whole batch fans out across the rayon pool
//! (one worker per core) with no ordering constraints. The result vector is
//! positionally aligned with the input list regardless of which unit
//! finished first.
//!
//! A failed unit does not cancel the rest of the batch; every dispatched
//! compile runs to completion so one build surfaces as many diagnostics as
//! possible. Only the link stage gets skipped on failure.

use super::compile::{self, UnitOutcome};
use super::events::BuildEvent;
use crate::config::ProjectConfig;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Number of workers the batch will fan out across.
pub fn worker_count() -> usize {
    rayon::current_num_threads()
}

/// Compile every unit in `sources`, preserving input order in the returned
/// outcomes.
pub fn compile_all(
    config: &ProjectConfig,
    sources: &[PathBuf],
    flags: &[String],
    events: &Sender<BuildEvent>,
) -> Vec<UnitOutcome> {
    run_ordered(sources, events, |tx, src| {
        compile::compile_unit(config, src, flags, tx)
    })
}

/// Indexed parallel map: `collect` on an indexed parallel iterator places
/// each result at its input position, which is the ordering guarantee the
/// caller relies on. The event sender is cloned per rayon split.
fn run_ordered<T, F>(sources: &[PathBuf], events: &Sender<BuildEvent>, job: F) -> Vec<T>
where
    T: Send,
    F: Fn(&Sender<BuildEvent>, &PathBuf) -> T + Send + Sync,
{
    sources
        .par_iter()
        .map_with(events.clone(), |tx, src| job(tx, src))
        .collect()
}
