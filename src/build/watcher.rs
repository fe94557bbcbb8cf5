//! Hot reload (`nst watch`): rebuild and relaunch on source changes.

use super::driver::BuildDriver;
use super::report;
use crate::config::Profile;
use anyhow::Result;
use colored::*;
use notify::{Config, RecursiveMode, Watcher};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Watch the engine and game trees and rebuild on every change burst. A
/// change arriving while a build is still running is dropped by the driver
/// (single build in flight), not queued.
pub fn watch(driver: &BuildDriver, profile: Profile) -> Result<()> {
    println!(
        "{} Watching engine/ and game/ for changes...",
        "👀".cyan()
    );

    let (tx, rx) = channel();
    let notify_config = Config::default().with_poll_interval(Duration::from_secs(1));
    let mut watcher = notify::RecommendedWatcher::new(tx, notify_config)?;

    for dir in [&driver.config().engine_dir, &driver.config().game_dir] {
        if dir.exists() {
            watcher.watch(dir, RecursiveMode::Recursive)?;
        }
    }

    // First run
    rebuild_and_run(driver, profile);

    while rx.recv().is_ok() {
        // Debounce bursts of events from one save
        std::thread::sleep(Duration::from_millis(150));
        while rx.try_recv().is_ok() {}
        rebuild_and_run(driver, profile);
    }
    Ok(())
}

fn rebuild_and_run(driver: &BuildDriver, profile: Profile) {
    println!("{} Rebuilding...", "🔄".yellow());

    let Some(events) = driver.request_build(profile) else {
        println!("{} Build already in progress, change ignored", "!".yellow());
        return;
    };

    let outcome = report::render(events);
    if outcome.summary.success() {
        if let Err(e) = driver.launch_game() {
            println!("{} {}", "x".red(), e);
        }
    }
}
