//! Structured parsing of gcc-style compiler and linker output.
//!
//! The recognized grammar is one diagnostic per line:
//!
//! ```text
//! <file>:<line>:<column>: <severity>: <message>
//! ```
//!
//! Anything else (linker notes, multi-line carets, summaries) is passed
//! through as plain log text, never dropped and never a parse error.

use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            "note" => Some(Severity::Note),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// One structured compiler/linker message. Lives only for the reporting
/// phase of a single build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    pub message: String,
}

pub struct DiagnosticParser {
    pattern: Regex,
}

impl Default for DiagnosticParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^(.*):(\d+):(\d+): (error|warning|note): (.*)$").unwrap(),
        }
    }

    /// Parse one line of tool output. `None` means the line did not match
    /// the diagnostic grammar and should be surfaced verbatim.
    pub fn parse_line(&self, line: &str) -> Option<Diagnostic> {
        let caps = self.pattern.captures(line)?;
        Some(Diagnostic {
            file: caps[1].to_string(),
            line: caps[2].parse().ok()?,
            column: caps[3].parse().ok()?,
            severity: Severity::from_keyword(&caps[4])?,
            message: caps[5].to_string(),
        })
    }
}
