//! # nestudio - NewEngine build tool
//!
//! Command-line build core for NewEngine C game projects: incremental
//! header-aware dependency tracking, parallel gcc compilation and link
//! orchestration, plus a hot-reload watch loop and a best-effort engine
//! API scanner.
//!
//! ## Module Organization
//!
//! - [`build`] - Incremental parallel build core
//! - [`config`] - Project layout and `nestudio.toml` parsing
//! - [`api`] - Engine API extraction from headers
//! - [`ui`] - Terminal table rendering

/// Best-effort engine API scanner.
pub mod api;

/// Incremental parallel build core.
pub mod build;

/// Project configuration.
pub mod config;

/// Terminal UI utilities.
pub mod ui;
