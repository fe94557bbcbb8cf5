//! Incremental parallel build core.
//!
//! Pipeline: source discovery → per-unit staleness check ([`deps`]) →
//! parallel compilation ([`schedule`] / [`compile`]) → link ([`link`]),
//! with progress streamed as [`events::BuildEvent`]s and rendered by
//! [`report`].

pub mod clean;
pub mod compile;
pub mod deps;
pub mod diagnostics;
pub mod driver;
pub mod events;
pub mod link;
pub mod report;
pub mod schedule;
pub mod watcher;

pub use clean::clean;
pub use driver::{execute, BuildDriver};
pub use events::{BuildEvent, BuildSummary};
pub use watcher::watch;
