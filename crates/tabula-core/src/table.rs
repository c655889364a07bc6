//! Extracted table types.

use crate::geometry::Rectangle;

/// Which extractor produced a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    /// Ruling-based extraction.
    Lattice,
    /// Flow-based extraction.
    Stream,
}

impl ExtractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionKind::Lattice => "lattice",
            ExtractionKind::Stream => "stream",
        }
    }
}

/// A table cell. An empty cell has empty `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub rect: Rectangle,
    pub text: String,
}

impl Cell {
    pub fn new(rect: Rectangle, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }

    pub fn empty(rect: Rectangle) -> Self {
        Self::new(rect, String::new())
    }
}

/// A table extracted from one page view. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: ExtractionKind,
    /// 1-based page number the table came from.
    pub page_number: usize,
    /// Rectangle enclosing the table.
    pub area: Rectangle,
    /// Cells organised top-to-bottom, left-to-right within each row.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    /// Cell texts, row by row.
    pub fn text_rows(&self) -> Vec<Vec<&str>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        let r = Rectangle::default();
        let table = Table {
            kind: ExtractionKind::Stream,
            page_number: 1,
            area: r,
            rows: vec![
                vec![Cell::new(r, "a"), Cell::new(r, "b")],
                vec![Cell::new(r, "c")],
            ],
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.text_rows(), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ExtractionKind::Lattice.as_str(), "lattice");
        assert_eq!(ExtractionKind::Stream.as_str(), "stream");
    }
}
