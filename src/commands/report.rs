use serde::Serialize;
use std::io::{self, Write};

use crate::commands::sqlite_inspector::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Everything an inspection run can say, in the order it says it.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event<'a> {
    Checking { path: &'a str },
    NotFound { path: &'a str },
    ConnectError { path: &'a str, message: &'a str },
    Tables { path: &'a str, tables: &'a [String] },
    Table { path: &'a str, table: &'a str },
    Row { path: &'a str, table: &'a str, values: &'a Row },
    TableError { path: &'a str, table: &'a str, message: &'a str },
}

/// Writes events to `out` as soon as they happen.
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn emit(&mut self, event: &Event<'_>) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.write_text(event)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, event)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    fn write_text(&mut self, event: &Event<'_>) -> io::Result<()> {
        match event {
            Event::Checking { path } => writeln!(self.out, "--- Checking {} ---", path),
            Event::NotFound { .. } => writeln!(self.out, "File not found."),
            Event::ConnectError { path, message } => {
                writeln!(self.out, "Error connecting to {}: {}", path, message)
            }
            Event::Tables { tables, .. } => writeln!(self.out, "Tables: [{}]", tables.join(", ")),
            Event::Table { table, .. } => writeln!(self.out, "Content of table {}:", table),
            Event::Row { values, .. } => writeln!(self.out, "{}", values),
            Event::TableError { table, message, .. } => {
                writeln!(self.out, "Error reading table {}: {}", table, message)
            }
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
