use std::io::{self, Write};
use std::path::Path;

use crate::commands::report::{Event, Reporter};
use crate::commands::sqlite_inspector::{SqliteError, SqliteInspector};

/// Walks every path in order and reports its tables and first `limit` rows.
///
/// Store failures are reported and skipped. Only a failure to write the
/// report itself is returned.
pub fn inspect<W: Write>(paths: &[String], limit: usize, reporter: &mut Reporter<W>) -> io::Result<()> {
    for path in paths {
        inspect_path(path, limit, reporter)?;
    }
    Ok(())
}

fn inspect_path<W: Write>(path: &str, limit: usize, reporter: &mut Reporter<W>) -> io::Result<()> {
    reporter.emit(&Event::Checking { path })?;

    let inspector = match SqliteInspector::open(Path::new(path)) {
        Ok(inspector) => inspector,
        Err(SqliteError::NotFound(_)) => {
            tracing::debug!(path, "skipping missing store");
            return reporter.emit(&Event::NotFound { path });
        }
        Err(e) => {
            let message = e.to_string();
            return reporter.emit(&Event::ConnectError { path, message: &message });
        }
    };

    let tables = match inspector.tables() {
        Ok(tables) => tables,
        Err(e) => {
            let message = e.to_string();
            return reporter.emit(&Event::ConnectError { path, message: &message });
        }
    };
    reporter.emit(&Event::Tables { path, tables: &tables })?;

    for table in &tables {
        reporter.emit(&Event::Table { path, table })?;

        // Rows are reported as they stream so a mid-table failure keeps what was read
        let mut write_result = Ok(());
        let read_result = inspector.for_each_row(table, limit, |row| {
            if write_result.is_ok() {
                write_result = reporter.emit(&Event::Row { path, table, values: &row });
            }
        });
        write_result?;

        if let Err(e) = read_result {
            tracing::debug!(path, table = table.as_str(), error = %e, "table read failed");
            let message = e.to_string();
            reporter.emit(&Event::TableError { path, table, message: &message })?;
        }
    }

    // A failed close has already been logged; the report is complete either way
    let _ = inspector.close();
    Ok(())
}
