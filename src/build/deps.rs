//! Header dependency analysis for incremental builds.
//!
//! Decides whether a translation unit must be recompiled by walking the
//! transitive closure of its `#include` references and comparing timestamps
//! against the compiled object.
//!
//! Include extraction is textual: there is no preprocessor, no macro
//! expansion and no conditional compilation. Lines that do not look like an
//! include directive simply contribute no edges.

use crate::config::ProjectConfig;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Extract the names referenced by `#include "..."` and `#include <...>`
/// directives in `path`. An unreadable file yields no edges.
pub fn extract_includes(path: &Path) -> Vec<String> {
    let Ok(data) = fs::read_to_string(path) else {
        return Vec::new();
    };

    let pattern = Regex::new(r#"#include\s+["<]([^">]+)[">]"#).unwrap();
    pattern
        .captures_iter(&data)
        .map(|cap| cap[1].to_string())
        .collect()
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Returns true when `source` (or any header in its transitive include
/// closure) is newer than `object`, or when `object` does not exist yet.
///
/// Header names are resolved against the ordered search list (project
/// include dir, asset dir, the unit's own directory); the first directory
/// containing a file of that name wins. A name that resolves nowhere is
/// assumed to be a system header and contributes no staleness signal.
///
/// Known approximation: the visited set is keyed by the raw include spelling,
/// not the resolved path. Two same-named headers in different search
/// directories are treated as one node, so a stale header shadowed by a
/// fresher one elsewhere can be missed. This mirrors the behavior builds have
/// always had and is deliberately left as-is.
pub fn needs_rebuild(config: &ProjectConfig, source: &Path, object: &Path) -> bool {
    let Some(object_mtime) = mtime(object) else {
        return true; // Never built
    };

    match mtime(source) {
        Some(t) if t > object_mtime => return true,
        Some(_) => {}
        None => return true, // Source vanished mid-build, force a compile attempt
    }

    let unit_dir = source.parent().unwrap_or(Path::new("."));
    let search_dirs = config.include_search_dirs(unit_dir);

    let mut visited: HashSet<String> = HashSet::new();
    let mut stack = extract_includes(source);

    while let Some(header_name) = stack.pop() {
        if !visited.insert(header_name.clone()) {
            continue;
        }

        for dir in &search_dirs {
            let header_path = dir.join(&header_name);
            if header_path.exists() {
                if mtime(&header_path).is_some_and(|t| t > object_mtime) {
                    return true;
                }
                // Descend into this header's own includes
                stack.extend(extract_includes(&header_path));
                break;
            }
        }
    }

    false
}
