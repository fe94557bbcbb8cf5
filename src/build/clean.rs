//! Build artifact cleanup (`nst clean`).

use crate::config::ProjectConfig;
use anyhow::{Context, Result};
use colored::*;
use std::fs;

/// Remove the output area (`bin/`, objects included). Sources, headers and
/// assets are never touched.
pub fn clean(config: &ProjectConfig) -> Result<()> {
    if config.bin_dir.exists() {
        fs::remove_dir_all(&config.bin_dir)
            .with_context(|| format!("Failed to remove {}", config.bin_dir.display()))?;
        println!("{} Build directory cleaned", "✓".green());
    } else {
        println!("{} Nothing to clean", "!".yellow());
    }
    Ok(())
}
