//! Box-drawn tables for the status and bootstrap summaries.

use console::measure_text_width;

/// A simple table for formatted output.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new table with the given headers.
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row to the table. Missing cells render empty; extra cells are dropped.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        self.rows.push(
            row.iter()
                .take(self.headers.len())
                .map(|s| s.as_ref().to_string())
                .collect(),
        );
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(cell));
            }
        }
        widths
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 4);

        lines.push(border(&widths, '┌', '┬', '┐'));
        lines.push(render_row(&widths, &self.headers));
        lines.push(border(&widths, '├', '┼', '┤'));
        for row in &self.rows {
            lines.push(render_row(&widths, row));
        }
        lines.push(border(&widths, '└', '┴', '┘'));

        lines.join("\n")
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let inner = widths
        .iter()
        .map(|w| "─".repeat(w + 2))
        .collect::<Vec<_>>()
        .join(&mid.to_string());
    format!("{}{}{}", left, inner, right)
}

fn render_row(widths: &[usize], row: &[String]) -> String {
    let mut s = String::from("│");
    for (i, width) in widths.iter().enumerate() {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        // Pad by display width so styled cells stay aligned.
        let pad = width - measure_text_width(cell);
        s.push_str(&format!(" {}{} │", cell, " ".repeat(pad)));
    }
    s
}
