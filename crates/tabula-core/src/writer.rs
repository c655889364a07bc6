//! Table serializers.
//!
//! [`write_tables`] picks the serializer for an [`OutputFormat`]; the
//! serializers themselves implement [`TableWriter`].

use std::io::{self, Write};

use serde::Serialize;

use crate::plan::OutputFormat;
use crate::table::{Cell, Table};

/// Serializes a sequence of tables to a sink.
pub trait TableWriter {
    fn write(&self, sink: &mut dyn Write, tables: &[Table]) -> io::Result<()>;
}

/// Write `tables` to `sink` in `format`.
pub fn write_tables(tables: &[Table], format: OutputFormat, sink: &mut dyn Write) -> io::Result<()> {
    match format {
        OutputFormat::Csv => DelimitedWriter::csv().write(sink, tables),
        OutputFormat::Tsv => DelimitedWriter::tsv().write(sink, tables),
        OutputFormat::Json => JsonWriter.write(sink, tables),
    }
}

/// CSV or TSV: one record per table row, CRLF terminated, rows of all
/// tables back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedWriter {
    delimiter: char,
}

impl DelimitedWriter {
    pub fn csv() -> Self {
        Self { delimiter: ',' }
    }

    pub fn tsv() -> Self {
        Self { delimiter: '\t' }
    }

    fn escape(&self, text: &str) -> String {
        if text.contains(self.delimiter)
            || text.contains('"')
            || text.contains('\n')
            || text.contains('\r')
        {
            format!("\"{}\"", text.replace('"', "\"\""))
        } else {
            text.to_string()
        }
    }
}

impl TableWriter for DelimitedWriter {
    fn write(&self, sink: &mut dyn Write, tables: &[Table]) -> io::Result<()> {
        let separator = self.delimiter.to_string();
        for row in tables.iter().flat_map(|t| &t.rows) {
            let record: Vec<String> = row.iter().map(|c| self.escape(&c.text)).collect();
            write!(sink, "{}\r\n", record.join(&separator))?;
        }
        sink.flush()
    }
}

/// JSON array of table objects with per-cell geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

#[derive(Serialize)]
struct JsonTable<'a> {
    extraction_method: &'static str,
    page_number: usize,
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    right: f64,
    bottom: f64,
    data: Vec<Vec<JsonCell<'a>>>,
}

#[derive(Serialize)]
struct JsonCell<'a> {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    text: &'a str,
}

impl<'a> From<&'a Table> for JsonTable<'a> {
    fn from(table: &'a Table) -> Self {
        let area = table.area;
        JsonTable {
            extraction_method: table.kind.as_str(),
            page_number: table.page_number,
            top: area.top,
            left: area.left,
            width: area.width,
            height: area.height,
            right: area.right(),
            bottom: area.bottom(),
            data: table
                .rows
                .iter()
                .map(|row| row.iter().map(JsonCell::from).collect())
                .collect(),
        }
    }
}

impl<'a> From<&'a Cell> for JsonCell<'a> {
    fn from(cell: &'a Cell) -> Self {
        JsonCell {
            top: cell.rect.top,
            left: cell.rect.left,
            width: cell.rect.width,
            height: cell.rect.height,
            text: &cell.text,
        }
    }
}

impl TableWriter for JsonWriter {
    fn write(&self, sink: &mut dyn Write, tables: &[Table]) -> io::Result<()> {
        let tables: Vec<JsonTable<'_>> = tables.iter().map(JsonTable::from).collect();
        serde_json::to_writer(&mut *sink, &tables)?;
        sink.flush()
    }
}
