//! Build orchestration.
//!
//! [`execute`] runs the whole pipeline synchronously on the calling thread:
//! source discovery, parallel compilation, link. [`BuildDriver`] wraps it
//! for interactive use: builds run on a background thread and stream
//! [`BuildEvent`]s to the caller, at most one build is in flight at a time,
//! and a relaunch of the game terminates the previous game process first.

use super::compile::UnitOutcome;
use super::events::{BuildEvent, BuildSummary};
use super::{link, schedule};
use crate::config::{Profile, ProjectConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;
use walkdir::WalkDir;

/// Collect every `.c` unit under the engine and game trees, engine first.
/// Discovery is fresh on every build; nothing is persisted across runs.
pub fn collect_sources(config: &ProjectConfig) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for dir in [&config.engine_dir, &config.game_dir] {
        if !dir.exists() {
            continue;
        }
        for entry in WalkDir::new(dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "c") {
                sources.push(path.to_path_buf());
            }
        }
    }
    sources
}

/// Flags shared by every compile and by the link invocation: include paths,
/// warnings, the profile's optimization set and any manifest extras.
fn base_flags(config: &ProjectConfig, profile: Profile) -> Vec<String> {
    let mut flags = vec![
        format!("-I{}", config.include_dir.display()),
        format!("-I{}", config.assets_dir.display()),
        "-Wall".to_string(),
    ];
    flags.extend(profile.optimization_flags().iter().map(|f| f.to_string()));
    flags.extend(config.extra_flags.iter().cloned());
    flags
}

/// Run one full build, emitting progress events along the way. The
/// `Finished` event carries the same summary that is returned.
///
/// Unit failures are collected, not raised; the batch always runs to
/// completion and linking is skipped if anything failed. A failed build
/// leaves prior artifacts in place.
pub fn execute(
    config: &ProjectConfig,
    profile: Profile,
    events: &Sender<BuildEvent>,
) -> BuildSummary {
    let start = Instant::now();
    let summary = run_pipeline(config, profile, events, start);
    let _ = events.send(BuildEvent::Finished(summary.clone()));
    summary
}

fn run_pipeline(
    config: &ProjectConfig,
    profile: Profile,
    events: &Sender<BuildEvent>,
    start: Instant,
) -> BuildSummary {
    let mut summary = BuildSummary {
        profile,
        compiled: 0,
        up_to_date: 0,
        failed: Vec::new(),
        link_failed: false,
        binary: None,
        elapsed: start.elapsed(),
    };

    let _ = events.send(BuildEvent::Status(format!("Build started [{}]", profile)));

    if let Err(e) = fs::create_dir_all(&config.obj_dir) {
        let _ = events.send(BuildEvent::ToolOutput(format!(
            "Failed to create {}: {}",
            config.obj_dir.display(),
            e
        )));
        summary.elapsed = start.elapsed();
        return summary;
    }

    let sources = collect_sources(config);
    if sources.is_empty() {
        let _ = events.send(BuildEvent::Status(
            "No source files found under engine/ or game/".to_string(),
        ));
        summary.elapsed = start.elapsed();
        return summary;
    }

    let flags = base_flags(config, profile);
    let _ = events.send(BuildEvent::BatchStarted {
        total: sources.len(),
        workers: schedule::worker_count(),
    });

    let outcomes = schedule::compile_all(config, &sources, &flags, events);

    let mut objects = Vec::with_capacity(outcomes.len());
    for outcome in &outcomes {
        match outcome {
            UnitOutcome::UpToDate(obj) => {
                summary.up_to_date += 1;
                objects.push(obj.clone());
            }
            UnitOutcome::Compiled(obj) => {
                summary.compiled += 1;
                objects.push(obj.clone());
            }
            UnitOutcome::Failed { source, .. } => summary.failed.push(source.clone()),
        }
    }

    if !summary.failed.is_empty() {
        let _ = events.send(BuildEvent::Status(format!(
            "{} unit(s) failed to compile, link skipped",
            summary.failed.len()
        )));
        summary.elapsed = start.elapsed();
        return summary;
    }

    if summary.compiled == 0 && !needs_link(&config.binary_path(), &objects) {
        summary.binary = Some(config.binary_path());
        summary.elapsed = start.elapsed();
        let _ = events.send(BuildEvent::Status("Up to date".to_string()));
        return summary;
    }

    let _ = events.send(BuildEvent::Status("Linking...".to_string()));
    match link::link(config, &objects, &flags, profile) {
        Ok(binary) => {
            summary.binary = Some(binary);
            summary.elapsed = start.elapsed();
            let _ = events.send(BuildEvent::Status(format!(
                "Build finished in {:.2?}",
                summary.elapsed
            )));
        }
        Err(stderr) => {
            summary.link_failed = true;
            summary.elapsed = start.elapsed();
            let _ = events.send(BuildEvent::ToolOutput(stderr));
            let _ = events.send(BuildEvent::Status("Linking failed".to_string()));
        }
    }

    summary
}

/// Relink only when the binary is missing or any object outruns it, so an
/// unchanged rebuild leaves the binary byte-identical.
fn needs_link(binary: &Path, objects: &[PathBuf]) -> bool {
    let Ok(binary_mtime) = fs::metadata(binary).and_then(|m| m.modified()) else {
        return true;
    };
    objects.iter().any(|obj| {
        fs::metadata(obj)
            .and_then(|m| m.modified())
            .is_ok_and(|t| t > binary_mtime)
    })
}

/// Clears the in-flight flag when the build thread finishes, panics
/// included, so a retry is always possible.
pub struct BuildPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for BuildPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Interactive front door to the build core.
pub struct BuildDriver {
    config: Arc<ProjectConfig>,
    building: Arc<AtomicBool>,
    game: Mutex<Option<Child>>,
}

impl BuildDriver {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config: Arc::new(config),
            building: Arc::new(AtomicBool::new(false)),
            game: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Claim the single in-flight build slot. `None` means a build is
    /// already running and this request is dropped, not queued.
    pub fn try_acquire(&self) -> Option<BuildPermit> {
        if self.building.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(BuildPermit {
            flag: Arc::clone(&self.building),
        })
    }

    /// Start a build on a background thread. Returns the event stream, or
    /// `None` if a build is already in flight. The receiver sees a
    /// `Finished` event last; dropping it does not abort the build.
    pub fn request_build(&self, profile: Profile) -> Option<Receiver<BuildEvent>> {
        let permit = self.try_acquire()?;
        let config = Arc::clone(&self.config);
        let (tx, rx) = channel();

        thread::spawn(move || {
            let _permit = permit;
            execute(&config, profile, &tx);
        });

        Some(rx)
    }

    /// Launch the built game binary, terminating a still-running previous
    /// instance first. The child is tracked, not waited on.
    pub fn launch_game(&self) -> Result<()> {
        let binary = self.config.binary_path();
        if !binary.exists() {
            anyhow::bail!("Game binary not found, build the project first");
        }

        let mut slot = self.game.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(child) = slot.as_mut() {
            if child.try_wait().ok().flatten().is_none() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }

        let child = Command::new(&binary)
            .current_dir(&self.config.root)
            .spawn()
            .with_context(|| format!("Failed to launch {}", binary.display()))?;
        *slot = Some(child);
        Ok(())
    }
}
