//! Terminal rendering of a build's event stream.
//!
//! The single consumer of the [`BuildEvent`] channel. Tool output is split
//! into lines and pushed through the diagnostic parser: structured records
//! end up in the issues table, everything else is echoed verbatim.

use super::diagnostics::{Diagnostic, DiagnosticParser, Severity};
use super::events::{BuildEvent, BuildSummary};
use crate::ui;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc::Receiver;

/// Drained result of one build: the summary plus every structured
/// diagnostic seen in compiler/linker output.
pub struct BuildReport {
    pub summary: BuildSummary,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

/// Drain `rx` until the `Finished` event, rendering progress as it comes.
pub fn render(rx: Receiver<BuildEvent>) -> BuildReport {
    let parser = DiagnosticParser::new();
    let mut diagnostics = Vec::new();
    let mut progress: Option<ProgressBar> = None;
    let mut summary = None;

    for event in rx {
        match event {
            BuildEvent::Status(text) => match &progress {
                Some(pb) => pb.println(format!("{} {}", "•".blue(), text)),
                None => println!("{} {}", "•".blue(), text),
            },
            BuildEvent::BatchStarted { total, workers } => {
                println!("{} {} unit(s), {} worker(s)", "⚙".cyan(), total, workers);
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                        .unwrap()
                        .progress_chars("#>-"),
                );
                progress = Some(pb);
            }
            BuildEvent::UnitStarted(unit) => {
                if let Some(pb) = &progress {
                    pb.set_message(format!("compiling {}", unit.display()));
                    pb.println(format!("   {} compiling: {}", "…".dimmed(), unit.display()));
                    pb.inc(1);
                }
            }
            BuildEvent::ToolOutput(text) => {
                for line in text.lines() {
                    let rendered = match parser.parse_line(line) {
                        Some(diag) => {
                            let colored_line = match diag.severity {
                                Severity::Error => line.red().to_string(),
                                Severity::Warning => line.yellow().to_string(),
                                Severity::Note => line.dimmed().to_string(),
                            };
                            diagnostics.push(diag);
                            colored_line
                        }
                        None => line.to_string(),
                    };
                    match &progress {
                        Some(pb) => pb.println(rendered),
                        None => println!("{}", rendered),
                    }
                }
            }
            BuildEvent::Finished(s) => {
                if let Some(pb) = progress.take() {
                    pb.finish_and_clear();
                }
                summary = Some(s);
                break;
            }
        }
    }

    // A dropped sender without a Finished event counts as a failed build.
    let summary = summary.unwrap_or(BuildSummary {
        profile: crate::config::Profile::Debug,
        compiled: 0,
        up_to_date: 0,
        failed: Vec::new(),
        link_failed: true,
        binary: None,
        elapsed: std::time::Duration::ZERO,
    });

    let report = BuildReport {
        summary,
        diagnostics,
    };
    print_outcome(&report);
    report
}

fn print_outcome(report: &BuildReport) {
    let s = &report.summary;

    if !report.diagnostics.is_empty() {
        let mut table = ui::Table::new(&["File", "Line", "Severity", "Message"]);
        for d in &report.diagnostics {
            table.add_row(vec![
                d.file.clone(),
                d.line.to_string(),
                d.severity.to_string(),
                d.message.clone(),
            ]);
        }
        table.print();
    }

    if s.success() {
        println!(
            "{} Build succeeded: {} compiled, {} up to date ({:.2?})",
            "✓".green(),
            s.compiled,
            s.up_to_date,
            s.elapsed
        );
    } else if !s.failed.is_empty() {
        println!(
            "{} Build failed: {} unit(s) did not compile",
            "x".red(),
            s.failed.len()
        );
    } else if s.link_failed {
        println!("{} Build failed at the link stage", "x".red());
    } else {
        println!("{} Build produced no binary", "x".red());
    }
}
