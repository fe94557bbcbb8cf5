//! Final link stage.
//!
//! Runs only when every unit in the batch compiled. The compiler driver is
//! reused as the link driver, with platform-conditioned system and graphics
//! libraries appended. A failed link does not commit a partial binary, so
//! the previous build's output survives.

use crate::config::{Profile, ProjectConfig};
use std::path::PathBuf;
use std::process::Command;

/// System/graphics libraries for the target platform. macOS is not handled
/// yet; the empty list makes the link fail loudly rather than guess at
/// framework flags.
pub fn platform_libs() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["-lopengl32", "-lglu32", "-lgdi32", "-lwinmm"]
    } else if cfg!(target_os = "linux") {
        &["-lGL", "-lGLU", "-lm", "-lX11", "-lXrandr"]
    } else {
        &[]
    }
}

/// Link-stage flags beyond the library list. Release builds on Windows get
/// a GUI subsystem binary (no console window allocation).
pub fn link_flags(profile: Profile) -> Vec<String> {
    let mut flags = Vec::new();
    if profile == Profile::Release && cfg!(target_os = "windows") {
        flags.push("-mwindows".to_string());
    }
    flags
}

/// Link all objects into the output binary. `Err` carries linker stderr.
pub fn link(
    config: &ProjectConfig,
    objects: &[PathBuf],
    flags: &[String],
    profile: Profile,
) -> Result<PathBuf, String> {
    let binary = config.binary_path();

    let mut cmd = Command::new(&config.compiler);
    cmd.args(objects)
        .arg("-o")
        .arg(&binary)
        .args(flags)
        .args(platform_libs())
        .args(link_flags(profile))
        .current_dir(&config.root);

    let output = match cmd.output() {
        Ok(out) => out,
        Err(e) => return Err(format!("Failed to execute '{}': {}", config.compiler, e)),
    };

    if output.status.success() {
        Ok(binary)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}
