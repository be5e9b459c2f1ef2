use crate::core::Row;
use std::fmt;

/// Rows of one entity table, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl TableView {
    pub fn new(title: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.rows.is_empty() {
            return writeln!(f, "No records yet.");
        }

        // Calculate column widths
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                widths[i] = widths[i].max(value.to_string().len());
            }
        }

        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{:width$}", col, width = widths[i]))
            .collect();
        writeln!(f, "{}", header.join(" | ").trim_end())?;

        let separator: String = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");
        writeln!(f, "{}", separator)?;

        for row in &self.rows {
            let row_str: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, val)| format!("{:width$}", val.to_string(), width = widths[i]))
                .collect();
            writeln!(f, "{}", row_str.join(" | ").trim_end())?;
        }

        write!(f, "\n{} row(s)", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn test_empty_view_text() {
        let view = TableView::new("Branches", vec!["Branch Name".into()], Vec::new());
        assert!(view.is_empty());
        assert_eq!(view.to_string(), "Branches\nNo records yet.\n");
    }

    #[test]
    fn test_view_text_is_aligned() {
        let view = TableView::new(
            "Meeting Days",
            vec!["Meeting Day".into(), "Total".into()],
            vec![
                vec![Value::from("Sunday"), Value::Integer(150)],
                vec![Value::from("Wed"), Value::Integer(20)],
            ],
        );
        let text = view.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Meeting Day | Total");
        assert_eq!(lines[2], "------------+------");
        assert_eq!(lines[3], "Sunday      | 150");
        assert!(text.ends_with("2 row(s)"));
    }
}
