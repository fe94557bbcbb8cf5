//! End-to-end build core tests.
//!
//! These drive the real pipeline against temporary projects with gcc. When
//! gcc is not installed the tests skip themselves rather than fail.

use nestudio::build::compile::object_path;
use nestudio::build::diagnostics::{DiagnosticParser, Severity};
use nestudio::build::events::{BuildEvent, BuildSummary};
use nestudio::build::{clean, execute};
use nestudio::config::{Profile, ProjectConfig};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::channel;
use std::time::{Duration, SystemTime};

fn gcc_available() -> bool {
    Command::new("gcc").arg("--version").output().is_ok()
}

struct Project {
    _dir: tempfile::TempDir,
    config: ProjectConfig,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp project");
        let config = ProjectConfig::with_defaults(dir.path());
        for d in [
            &config.engine_dir,
            &config.game_dir,
            &config.include_dir,
            &config.assets_dir,
        ] {
            fs::create_dir_all(d).unwrap();
        }
        Self { _dir: dir, config }
    }

    fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.config.root.join(rel);
        fs::write(&path, content).unwrap();
        path
    }

    /// Push a file's mtime into the future so it is strictly newer than
    /// anything the build just wrote, without sleeping.
    fn touch_future(&self, path: &Path) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(30))
            .unwrap();
    }

    fn build(&self, profile: Profile) -> (BuildSummary, Vec<BuildEvent>) {
        let (tx, rx) = channel();
        let summary = execute(&self.config, profile, &tx);
        drop(tx);
        (summary, rx.iter().collect())
    }
}

fn compiles_started(events: &[BuildEvent]) -> Vec<PathBuf> {
    events
        .iter()
        .filter_map(|e| match e {
            BuildEvent::UnitStarted(unit) => Some(unit.clone()),
            _ => None,
        })
        .collect()
}

const OK_MAIN: &str = "int main(void) { return 0; }\n";

#[test]
fn scenario_a_single_unit_debug_build() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("game/main.c", OK_MAIN);

    let (summary, events) = project.build(Profile::Debug);

    assert!(summary.success(), "build failed: {:?}", summary);
    assert_eq!(summary.compiled, 1);
    assert_eq!(summary.up_to_date, 0);
    assert_eq!(compiles_started(&events).len(), 1);

    let binary = summary.binary.expect("binary path missing");
    assert!(binary.exists(), "binary not produced");
}

#[test]
fn rebuild_with_no_changes_is_fully_cached() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("game/main.c", OK_MAIN);
    project.write("engine/physics.c", "int physics_step(void) { return 1; }\n");

    let (first, _) = project.build(Profile::Debug);
    assert!(first.success());
    assert_eq!(first.compiled, 2);

    let (second, events) = project.build(Profile::Debug);
    assert!(second.success());
    assert_eq!(second.compiled, 0, "second run must recompile nothing");
    assert_eq!(second.up_to_date, 2);
    assert!(compiles_started(&events).is_empty());
    assert!(second.binary.unwrap().exists());
}

#[test]
fn scenario_b_unused_header_triggers_no_recompile() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("game/main.c", OK_MAIN);

    let (first, _) = project.build(Profile::Debug);
    assert!(first.success());

    let unused = project.write("include/unused.h", "void nothing(void);\n");
    project.touch_future(&unused);

    let (second, events) = project.build(Profile::Debug);
    assert!(second.success());
    assert_eq!(second.compiled, 0);
    assert!(compiles_started(&events).is_empty());
}

#[test]
fn scenario_c_one_failing_unit_blocks_link_but_not_siblings() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("game/main.c", OK_MAIN);
    project.write("game/hud.c", "int hud(void) { return 2; }\n");
    project.write("game/level.c", "int level(void) { return 3; }\n");
    project.write("game/broken.c", "int broken(void) { return oops }\n");

    let (summary, events) = project.build(Profile::Debug);

    // All four attempts ran despite the failure
    assert_eq!(compiles_started(&events).len(), 4);
    assert!(!summary.success());
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].ends_with("game/broken.c"));
    assert!(!summary.link_failed, "link must never have been attempted");
    assert!(summary.binary.is_none());
    assert!(!project.config.binary_path().exists());

    // Structured diagnostics point only at the failing unit
    let parser = DiagnosticParser::new();
    let errors: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BuildEvent::ToolOutput(text) => Some(text),
            _ => None,
        })
        .flat_map(|text| text.lines())
        .filter_map(|line| parser.parse_line(line))
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert!(!errors.is_empty(), "expected structured errors");
    assert!(errors.iter().all(|d| d.file.contains("broken.c")));
}

#[test]
fn scenario_d_touched_header_recompiles_only_including_units() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("include/shared.h", "static const int SHARED = 7;\n");
    project.write("game/main.c", OK_MAIN);
    project.write("game/a.c", "#include \"shared.h\"\nint a(void) { return SHARED; }\n");
    project.write("game/b.c", "#include \"shared.h\"\nint b(void) { return SHARED; }\n");
    project.write("game/c.c", "int c(void) { return 0; }\n");
    project.write("game/d.c", "int d(void) { return 0; }\n");

    let (first, _) = project.build(Profile::Debug);
    assert!(first.success());
    assert_eq!(first.compiled, 5);

    project.touch_future(&project.config.include_dir.join("shared.h"));

    let (second, events) = project.build(Profile::Debug);
    assert!(second.success());
    assert_eq!(second.compiled, 2, "exactly the two including units rebuild");
    assert_eq!(second.up_to_date, 3);

    let recompiled = compiles_started(&events);
    assert_eq!(recompiled.len(), 2);
    assert!(recompiled.iter().all(|p| {
        p.ends_with("game/a.c") || p.ends_with("game/b.c")
    }));
}

#[test]
fn nested_header_change_propagates_to_units() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("include/outer.h", "#include \"inner.h\"\n");
    project.write("include/inner.h", "static const int INNER = 1;\n");
    project.write("game/main.c", "#include \"outer.h\"\nint main(void) { return INNER; }\n");

    let (first, _) = project.build(Profile::Debug);
    assert!(first.success());

    project.touch_future(&project.config.include_dir.join("inner.h"));

    let (second, _) = project.build(Profile::Debug);
    assert!(second.success());
    assert_eq!(second.compiled, 1);
}

#[test]
fn engine_main_is_renamed_away_from_game_main() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("engine/main.c", "int main(void) { return 42; }\n");
    project.write("game/main.c", OK_MAIN);

    // Without the rename this would be a duplicate-symbol link failure
    let (summary, _) = project.build(Profile::Debug);
    assert!(summary.success(), "duplicate main was not renamed: {:?}", summary);
}

#[test]
fn failed_build_leaves_previous_binary_in_place() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    let main_c = project.write("game/main.c", OK_MAIN);

    let (first, _) = project.build(Profile::Debug);
    assert!(first.success());
    let binary = project.config.binary_path();
    assert!(binary.exists());

    project.write("game/main.c", "int main(void) { return oops }\n");
    project.touch_future(&main_c);

    let (second, _) = project.build(Profile::Debug);
    assert!(!second.success());
    assert!(binary.exists(), "prior binary must survive a failed build");

    // Objects for the failing unit were not replaced with garbage either:
    // a fixed source compiles cleanly again.
    project.write("game/main.c", OK_MAIN);
    project.touch_future(&main_c);
    let (third, _) = project.build(Profile::Debug);
    assert!(third.success());
}

#[test]
fn release_build_produces_binary() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    project.write("game/main.c", OK_MAIN);

    let (summary, _) = project.build(Profile::Release);
    assert!(summary.success());
    assert_eq!(summary.profile, Profile::Release);
    assert!(summary.binary.unwrap().exists());
}

#[test]
fn clean_then_build_recompiles_everything() {
    if !gcc_available() {
        eprintln!("Skipping: gcc not found");
        return;
    }
    let project = Project::new();
    let src = project.write("game/main.c", OK_MAIN);

    let (first, _) = project.build(Profile::Debug);
    assert!(first.success());
    assert!(object_path(&project.config, &src).exists());

    clean(&project.config).unwrap();
    assert!(!project.config.bin_dir.exists());

    let (second, _) = project.build(Profile::Debug);
    assert!(second.success());
    assert_eq!(second.compiled, 1);
}
