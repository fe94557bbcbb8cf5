//! Best-effort engine API listing (`nst api`).
//!
//! Scans project headers for function prototypes with a regex. This is
//! signature extraction, not parsing: there is no preprocessor and no macro
//! expansion, so macro-wrapped declarations and multi-line prototypes are
//! missed. Good enough for a browsable list of the engine surface.

use crate::config::ProjectConfig;
use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use walkdir::WalkDir;

/// C keywords that can open a line but never start a prototype.
const FORBIDDEN_LEADS: &[&str] = &[
    "return", "if", "else", "while", "for", "switch", "typedef", "static", "extern",
];

/// Return types and engine naming prefixes a prototype may start with.
const ALLOWED_PREFIXES: &[&str] = &[
    "NE_", "NScreen_", "NEnt_", "RGFW_", "void", "int", "bool", "u8", "u32", "f32", "f64", "s32",
];

/// Scan `include/` recursively and collect prototypes per header, keyed by
/// the header path relative to the include dir. Unreadable headers are
/// skipped.
pub fn scan_engine_api(config: &ProjectConfig) -> Result<BTreeMap<String, Vec<String>>> {
    let mut api = BTreeMap::new();
    if !config.include_dir.exists() {
        return Ok(api);
    }

    for entry in WalkDir::new(&config.include_dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "h") {
            continue;
        }
        let Ok(text) = fs::read_to_string(path) else {
            continue;
        };

        let prototypes = extract_prototypes(&text);
        if !prototypes.is_empty() {
            let rel = path
                .strip_prefix(&config.include_dir)
                .unwrap_or(path)
                .display()
                .to_string();
            api.insert(rel, prototypes);
        }
    }

    Ok(api)
}

/// Pull `Type Name(args);` declarations out of one header's text.
pub fn extract_prototypes(text: &str) -> Vec<String> {
    let line_comments = Regex::new(r"//.*").unwrap();
    let block_comments = Regex::new(r"(?s)/\*.*?\*/").unwrap();
    let prototype = Regex::new(r"(?m)^([A-Za-z0-9_]+\s+\*?[A-Za-z0-9_]+)\s*\(([^)]*)\);").unwrap();

    let text = line_comments.replace_all(text, "");
    let text = block_comments.replace_all(&text, "");

    let mut found = Vec::new();
    for caps in prototype.captures_iter(&text) {
        let head = caps[1].trim().to_string();
        let args = caps[2].trim().to_string();

        let first_word = head.split_whitespace().next().unwrap_or("");
        if FORBIDDEN_LEADS.contains(&first_word) || head.contains("__") {
            continue;
        }
        if !ALLOWED_PREFIXES.iter().any(|p| head.starts_with(p)) {
            continue;
        }

        found.push(format!("{}({});", head, args));
    }
    found
}
