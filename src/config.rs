//! Project configuration (`nestudio.toml`).
//!
//! A NewEngine project has a fixed on-disk layout rooted at the working
//! directory:
//!
//! ```text
//! engine/     engine sources (.c, recursive)
//! game/       game sources (.c, recursive)
//! include/    project headers (first include search dir)
//! assets/     generated asset headers (second include search dir)
//! bin/        final binary
//! bin/obj/    compiled object files
//! ```
//!
//! The optional manifest only overrides the compiler command, the binary
//! base name and extra compiler flags. Everything is resolved once into an
//! immutable [`ProjectConfig`] that gets passed by reference into the build
//! core; there is no global settings state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_NAME: &str = "nestudio.toml";

/// Build profile selecting the optimization/debug tradeoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Debug,
    Release,
}

impl Profile {
    pub fn optimization_flags(self) -> &'static [&'static str] {
        match self {
            // Unoptimized with symbols
            Profile::Debug => &["-g", "-O0"],
            // Optimized and stripped
            Profile::Release => &["-O3", "-s"],
        }
    }

}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Debug => write!(f, "Debug"),
            Profile::Release => write!(f, "Release"),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct Manifest {
    #[serde(default)]
    project: ProjectSection,
    #[serde(default)]
    build: BuildSection,
}

#[derive(Deserialize, Debug, Default)]
struct ProjectSection {
    name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct BuildSection {
    compiler: Option<String>,
    flags: Option<Vec<String>>,
}

/// Immutable project paths and toolchain settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub engine_dir: PathBuf,
    pub game_dir: PathBuf,
    pub include_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub obj_dir: PathBuf,
    /// External compiler command, also used as the link driver.
    pub compiler: String,
    /// Binary base name without the platform suffix.
    pub name: String,
    /// Extra flags appended to every compile and link invocation.
    pub extra_flags: Vec<String>,
}

impl ProjectConfig {
    /// Build a config for `root` with defaults only (no manifest lookup).
    pub fn with_defaults(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            engine_dir: root.join("engine"),
            game_dir: root.join("game"),
            include_dir: root.join("include"),
            assets_dir: root.join("assets"),
            bin_dir: root.join("bin"),
            obj_dir: root.join("bin").join("obj"),
            compiler: "gcc".to_string(),
            name: "game".to_string(),
            extra_flags: Vec::new(),
        }
    }

    /// Build a config for `root`, applying `nestudio.toml` overrides if the
    /// manifest exists. A missing manifest is not an error; a malformed one is.
    pub fn load(root: &Path) -> Result<Self> {
        let mut config = Self::with_defaults(root);

        let manifest_path = root.join(MANIFEST_NAME);
        if manifest_path.exists() {
            let raw = fs::read_to_string(&manifest_path)
                .with_context(|| format!("Failed to read {}", MANIFEST_NAME))?;
            let manifest: Manifest = toml::from_str(&raw)
                .with_context(|| format!("Failed to parse {} - check for syntax errors", MANIFEST_NAME))?;

            if let Some(name) = manifest.project.name {
                config.name = name;
            }
            if let Some(compiler) = manifest.build.compiler {
                config.compiler = compiler;
            }
            if let Some(flags) = manifest.build.flags {
                config.extra_flags = flags;
            }
        }

        Ok(config)
    }

    /// Binary file name with the platform suffix applied.
    pub fn binary_name(&self) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.exe", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Full path of the output binary.
    pub fn binary_path(&self) -> PathBuf {
        self.bin_dir.join(self.binary_name())
    }

    /// Ordered include search list used for header dependency resolution.
    /// First directory containing a header of a given name wins.
    pub fn include_search_dirs(&self, unit_dir: &Path) -> Vec<PathBuf> {
        vec![
            self.include_dir.clone(),
            self.assets_dir.clone(),
            unit_dir.to_path_buf(),
        ]
    }
}
