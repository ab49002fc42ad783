//! Table rendering for formatted output.

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// A box-drawing table.
///
/// Widths are measured in characters, so cells must not carry color codes.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers, all left-aligned.
    pub fn new(headers: Vec<&str>) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| h.chars().count()).collect();
        let align = vec![Align::Left; headers.len()];

        Self {
            headers,
            align,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Set the alignment of one column.
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.align.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Add a row to the table. Cells beyond the header count are dropped.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        let row: Vec<String> = row
            .iter()
            .take(self.headers.len())
            .map(|s| s.as_ref().to_string())
            .collect();

        for (width, cell) in self.column_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }

        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.render_border('┌', '┬', '┐'));
        lines.push(self.render_row(&self.headers));
        lines.push(self.render_border('├', '┼', '┤'));
        lines.extend(self.rows.iter().map(|row| self.render_row(row)));
        lines.push(self.render_border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn render_border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn render_row(&self, row: &[String]) -> String {
        let mut s = String::from("│");

        for (i, width) in self.column_widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let padding = " ".repeat(width - cell.chars().count());
            match self.align[i] {
                Align::Left => s.push_str(&format!(" {}{} │", cell, padding)),
                Align::Right => s.push_str(&format!(" {}{} │", padding, cell)),
            }
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_empty() {
        let table = Table::new(vec!["Host", "Tier"]);
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);

        let output = table.render();
        assert!(output.contains("Host"));
        assert!(output.contains("Tier"));
    }

    #[test]
    fn table_with_rows() {
        let mut table = Table::new(vec!["Host", "Tier"]);
        table.add_row(&["ws-001", "Tier B"]);
        table.add_row(&["ws-002", "Not ready"]);

        assert_eq!(table.row_count(), 2);
        let output = table.render();
        assert!(output.contains("ws-001"));
        assert!(output.contains("Not ready"));
    }

    #[test]
    fn table_uses_box_drawing() {
        let mut table = Table::new(vec!["A", "B"]);
        table.add_row(&["1", "2"]);
        let output = table.render();

        for c in ['┌', '┬', '┐', '├', '┼', '┤', '└', '┴', '┘', '│', '─'] {
            assert!(output.contains(c), "missing {}", c);
        }
    }

    #[test]
    fn table_handles_missing_and_extra_cells() {
        let mut table = Table::new(vec!["A", "B", "C"]);
        table.add_row(&["only", "two"]);
        table.add_row(&["1", "2", "3", "4"]);

        let output = table.render();
        assert!(output.contains("only"));
        assert!(!output.contains('4'));
    }

    #[test]
    fn lines_have_equal_width_with_multibyte_cells() {
        let mut table = Table::new(vec!["Host", "Met"]);
        table.add_row(&["ws-001", "✓"]);
        table.add_row(&["a-much-longer-host", "✗"]);

        let output = table.render();
        let widths: Vec<usize> = output.lines().map(|l| l.chars().count()).collect();
        assert_eq!(widths.len(), 6);
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn right_alignment_pads_left() {
        let mut table = Table::new(vec!["Host", "Clock"]).align(1, Align::Right);
        table.add_row(&["ws-001", "800"]);
        table.add_row(&["ws-002", "2400"]);

        let output = table.render();
        assert!(output.contains("│   800 │"));
        assert!(output.contains("│  2400 │"));
    }
}
