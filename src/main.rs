//! # nst CLI Entry Point
//!
//! Parses CLI arguments with clap and routes to the build core.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::*;
use std::process::Command;

use nestudio::api;
use nestudio::build;
use nestudio::build::report;
use nestudio::config::{Profile, ProjectConfig};
use nestudio::ui;

#[derive(Parser)]
#[command(name = "nst")]
#[command(about = "Incremental parallel build tool for NewEngine projects", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the project incrementally
    Build {
        /// Optimized, stripped build
        #[arg(long)]
        release: bool,
    },
    /// Compile and launch the game binary
    Run {
        /// Optimized, stripped build
        #[arg(long)]
        release: bool,
    },
    /// Remove build outputs (bin/)
    Clean,
    /// Rebuild and relaunch on source changes
    Watch {
        /// Optimized, stripped build
        #[arg(long)]
        release: bool,
    },
    /// List the engine API scanned from include/ headers
    Api,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn profile_for(release: bool) -> Profile {
    if release {
        Profile::Release
    } else {
        Profile::Debug
    }
}

fn load_config() -> Result<ProjectConfig> {
    let root = std::env::current_dir().context("Failed to resolve current directory")?;
    ProjectConfig::load(&root)
}

/// Build in the foreground: the driver runs the pipeline on its worker
/// thread while this thread renders the event stream.
fn run_build(config: ProjectConfig, profile: Profile) -> Result<report::BuildReport> {
    let driver = build::BuildDriver::new(config);
    let events = driver
        .request_build(profile)
        .context("A build is already in progress")?;
    Ok(report::render(events))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { release } => {
            let config = load_config()?;
            let outcome = run_build(config, profile_for(release))?;
            if !outcome.summary.success() {
                std::process::exit(1);
            }
        }
        Commands::Run { release } => {
            let config = load_config()?;
            let outcome = run_build(config.clone(), profile_for(release))?;
            let Some(binary) = outcome.summary.binary else {
                std::process::exit(1);
            };
            println!("{} Running {}...\n", "▶".green(), binary.display());
            let status = Command::new(&binary)
                .current_dir(&config.root)
                .status()
                .with_context(|| format!("Failed to launch {}", binary.display()))?;
            if !status.success() {
                std::process::exit(status.code().unwrap_or(1));
            }
        }
        Commands::Clean => {
            let config = load_config()?;
            build::clean(&config)?;
        }
        Commands::Watch { release } => {
            let config = load_config()?;
            let driver = build::BuildDriver::new(config);
            build::watch(&driver, profile_for(release))?;
        }
        Commands::Api => {
            let config = load_config()?;
            let api_map = api::scan_engine_api(&config)?;
            if api_map.is_empty() {
                println!("{} No engine API found under include/", "!".yellow());
            } else {
                let mut table = ui::Table::new(&["Header", "Prototype"]);
                for (header, prototypes) in &api_map {
                    for proto in prototypes {
                        table.add_row(vec![header.clone(), proto.clone()]);
                    }
                }
                table.print();
            }
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}
