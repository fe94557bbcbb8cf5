//! Terminal table rendering for diagnostics and API listings.

use colored::*;
use std::cmp;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row.into_iter().map(flatten_whitespace).collect());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column widths fitted to content, with the widest columns shrunk
    /// until the table fits the terminal.
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| h.chars().count())
            .collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = cmp::max(widths[i], cell.chars().count());
            }
        }

        let (_, term_width) = console::Term::stdout().size();
        // Borders and padding: "│ cell │ cell │"
        let overhead = 1 + 3 * widths.len();
        let budget = (term_width as usize).saturating_sub(overhead);

        let mut total: usize = widths.iter().sum();
        while total > budget {
            let mut widest = 0;
            for i in 1..widths.len() {
                if widths[i] > widths[widest] {
                    widest = i;
                }
            }
            if widths[widest] <= 8 {
                break;
            }
            widths[widest] -= 1;
            total -= 1;
        }
        widths
    }

    pub fn print(&self) {
        if self.headers.is_empty() {
            return;
        }
        let widths = self.column_widths();

        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };

        println!("{}", border("┌", "┬", "┐"));

        let mut header_line = String::from("│");
        for (header, &width) in self.headers.iter().zip(&widths) {
            let cell = fit(header, width);
            let pad = width.saturating_sub(cell.chars().count());
            header_line.push_str(&format!(" {}{} │", cell.bold(), " ".repeat(pad)));
        }
        println!("{}", header_line);
        println!("{}", border("├", "┼", "┤"));

        for row in &self.rows {
            let mut line = String::from("│");
            for (cell, &width) in row.iter().zip(&widths) {
                let cell = fit(cell, width);
                let pad = width.saturating_sub(cell.chars().count());
                line.push_str(&format!(" {}{} │", cell, " ".repeat(pad)));
            }
            println!("{}", line);
        }

        println!("{}", border("└", "┴", "┘"));
    }
}

fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn flatten_whitespace(s: String) -> String {
    s.chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}
