//! Single translation unit compilation.
//!
//! One source file in, one object file out. Failure is a normal outcome
//! value carrying the compiler's stderr; nothing here panics or returns
//! `Err` for a bad compile.

use super::deps;
use super::events::BuildEvent;
use crate::config::ProjectConfig;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::Sender;

/// Symbol the engine's optional entry point is renamed to, so an engine
/// `main.c` can coexist with the game's real `main`.
pub const ENGINE_MAIN_RENAME: &str = "-Dmain=__engine_dummy_main";

/// Per-unit compilation outcome.
#[derive(Debug, Clone)]
pub enum UnitOutcome {
    /// Existing object is current; the compiler was never invoked.
    UpToDate(PathBuf),
    /// Freshly compiled object.
    Compiled(PathBuf),
    /// Nonzero compiler exit, or the compiler could not be spawned.
    Failed { source: PathBuf, stderr: String },
}

/// Deterministic object path for a source unit: the path relative to the
/// project root with separators flattened to `_` and the `.c` extension
/// replaced by `.o`, under `bin/obj/`. Distinct sources can never collide
/// and re-running a build maps each unit to the same object.
pub fn object_path(config: &ProjectConfig, source: &Path) -> PathBuf {
    let rel = source.strip_prefix(&config.root).unwrap_or(source);
    let mut flat = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("_");
    if let Some(stripped) = flat.strip_suffix(".c") {
        flat = format!("{}.o", stripped);
    }
    config.obj_dir.join(flat)
}

/// An engine unit literally named `main.c` carries the engine's own demo
/// entry point; its `main` gets renamed at compile time.
pub fn needs_entry_rename(config: &ProjectConfig, source: &Path) -> bool {
    source.starts_with(&config.engine_dir)
        && source.file_name().is_some_and(|n| n == "main.c")
}

/// Compile one unit, short-circuiting on a cache hit. Cache hits are
/// silent; a real compile announces itself before the compiler runs and
/// forwards any stderr (warnings included) to the event channel.
pub fn compile_unit(
    config: &ProjectConfig,
    source: &Path,
    flags: &[String],
    events: &Sender<BuildEvent>,
) -> UnitOutcome {
    let object = object_path(config, source);

    if !deps::needs_rebuild(config, source, &object) {
        return UnitOutcome::UpToDate(object);
    }

    let rel = source.strip_prefix(&config.root).unwrap_or(source);
    let _ = events.send(BuildEvent::UnitStarted(rel.to_path_buf()));

    let mut cmd = Command::new(&config.compiler);
    cmd.arg("-c")
        .arg(source)
        .arg("-o")
        .arg(&object)
        .args(flags)
        .current_dir(&config.root);

    if needs_entry_rename(config, source) {
        cmd.arg(ENGINE_MAIN_RENAME);
    }

    let output = match cmd.output() {
        Ok(out) => out,
        Err(e) => {
            return UnitOutcome::Failed {
                source: source.to_path_buf(),
                stderr: format!("Failed to execute '{}': {}", config.compiler, e),
            };
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if !stderr.is_empty() {
        let _ = events.send(BuildEvent::ToolOutput(stderr.clone()));
    }

    if output.status.success() {
        UnitOutcome::Compiled(object)
    } else {
        UnitOutcome::Failed {
            source: source.to_path_buf(),
            stderr,
        }
    }
}
