//! Build progress events and the end-of-build summary.
//!
//! Workers never touch the terminal. Everything user-visible flows through
//! an mpsc channel as a [`BuildEvent`] and a single consumer renders it,
//! so concurrent compilations cannot interleave partial lines.

use crate::config::Profile;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// Compilation batch dispatched: total units and worker pool size.
    BatchStarted { total: usize, workers: usize },
    /// A unit missed the cache and is being handed to the compiler.
    UnitStarted(PathBuf),
    /// Raw stderr from a compiler or linker invocation, possibly multi-line.
    ToolOutput(String),
    /// Informational status line.
    Status(String),
    /// Terminal event; always the last one sent for a build.
    Finished(BuildSummary),
}

/// Aggregate outcome of one build invocation.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub profile: Profile,
    /// Units recompiled this run.
    pub compiled: usize,
    /// Units resolved as cache hits.
    pub up_to_date: usize,
    /// Units whose compilation failed.
    pub failed: Vec<PathBuf>,
    /// Whether the link stage ran and failed.
    pub link_failed: bool,
    /// Produced binary, present only on success.
    pub binary: Option<PathBuf>,
    pub elapsed: Duration,
}

impl BuildSummary {
    pub fn success(&self) -> bool {
        self.binary.is_some() && self.failed.is_empty() && !self.link_failed
    }
}
