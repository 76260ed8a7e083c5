use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SqliteError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Query(String),
}

/// A single column value, copied out of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    fn from_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }

    /// Unquoted rendering used in table cells.
    pub fn plain(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Blob(b) => format!("<{} bytes>", b.len()),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write_real(f, *r),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Blob(b) => {
                write!(f, "X'")?;
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                write!(f, "'")
            }
        }
    }
}

// SQLite reads 1e999 back as infinity and never stores NaN
fn write_real(f: &mut fmt::Formatter<'_>, r: f64) -> fmt::Result {
    if r.is_nan() {
        return write!(f, "NULL");
    }
    if r.is_infinite() {
        return write!(f, "{}", if r > 0.0 { "1e999" } else { "-1e999" });
    }
    let text = r.to_string();
    if text.contains('.') {
        write!(f, "{}", text)
    } else {
        write!(f, "{}.0", text)
    }
}

/// Clamps a row count to what SQLite accepts as a bound parameter.
fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// One row, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(pub Vec<Value>);

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Quote a table name as an SQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Read-only handle on one store file. Dropping it releases the connection.
pub struct SqliteInspector {
    path: PathBuf,
    connection: Connection,
}

impl SqliteInspector {
    /// Opens the store read-only and checks that its header can be read.
    pub fn open(path: &Path) -> Result<Self, SqliteError> {
        if !path.is_file() {
            return Err(SqliteError::NotFound(path.display().to_string()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(path, flags)
            .map_err(|e| SqliteError::Connection(e.to_string()))?;

        // Opening is lazy; touching the schema forces the header to be parsed
        connection
            .query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| SqliteError::Connection(e.to_string()))?;

        tracing::debug!(path = %path.display(), "opened store");

        Ok(Self {
            path: path.to_path_buf(),
            connection,
        })
    }

    /// Table names from `sqlite_master`, in catalog order.
    pub fn tables(&self) -> Result<Vec<String>, SqliteError> {
        let mut stmt = self
            .connection
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .map_err(|e| SqliteError::Connection(e.to_string()))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| SqliteError::Connection(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SqliteError::Connection(e.to_string()))?;

        Ok(names)
    }

    /// Streams up to `limit` rows, in the store's default scan order, to
    /// `visit`. Rows delivered before a failing step are not taken back.
    pub fn for_each_row<F>(&self, table: &str, limit: usize, mut visit: F) -> Result<(), SqliteError>
    where
        F: FnMut(Row),
    {
        let query = format!("SELECT * FROM {} LIMIT ?1", quote_identifier(table));
        tracing::debug!(table, limit, "reading rows");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| SqliteError::Query(e.to_string()))?;
        let column_count = stmt.column_count();

        let mut rows = stmt
            .query([sql_count(limit)])
            .map_err(|e| SqliteError::Query(e.to_string()))?;

        while let Some(row) = rows.next().map_err(|e| SqliteError::Query(e.to_string()))? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row
                    .get_ref(i)
                    .map_err(|e| SqliteError::Query(e.to_string()))?;
                values.push(Value::from_ref(value));
            }
            visit(Row(values));
        }

        Ok(())
    }

    /// Column layout from `PRAGMA table_info`.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, SqliteError> {
        let query = format!("PRAGMA table_info({})", quote_identifier(table));

        let mut stmt = self.connection.prepare(&query).map_err(|e| {
            SqliteError::Query(format!("Failed to prepare schema query: {}", e))
        })?;

        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    name: row.get(1)?,
                    decl_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    primary_key: row.get::<_, i64>(5)? != 0,
                })
            })
            .map_err(|e| SqliteError::Query(format!("Failed to execute schema query: {}", e)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SqliteError::Query(format!("Failed to read schema row: {}", e)))?;

        Ok(columns)
    }

    pub fn row_count(&self, table: &str) -> Result<usize, SqliteError> {
        let query = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));

        let count: i64 = self
            .connection
            .query_row(&query, [], |row| row.get(0))
            .map_err(|e| SqliteError::Query(format!("Failed to count rows: {}", e)))?;

        Ok(count as usize)
    }

    /// Returns a page of rows as (headers, rows_of_strings).
    pub fn preview(
        &self,
        table: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<String>, Vec<Vec<String>>), SqliteError> {
        let query = format!(
            "SELECT * FROM {} LIMIT ?1 OFFSET ?2",
            quote_identifier(table)
        );

        let mut stmt = self.connection.prepare(&query).map_err(|e| {
            SqliteError::Query(format!("Failed to prepare preview query: {}", e))
        })?;

        let headers: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = headers.len();

        let rows = stmt
            .query_map([sql_count(limit), sql_count(offset)], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(Value::from_ref(row.get_ref(i)?).plain());
                }
                Ok(values)
            })
            .map_err(|e| SqliteError::Query(format!("Failed to execute preview query: {}", e)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SqliteError::Query(format!("Failed to read preview row: {}", e)))?;

        Ok((headers, rows))
    }

    /// Closes the connection, surfacing any error the drop would swallow.
    pub fn close(self) -> Result<(), SqliteError> {
        let path = self.path;
        self.connection.close().map_err(|(_, e)| {
            tracing::warn!(path = %path.display(), error = %e, "failed to close store");
            SqliteError::Connection(e.to_string())
        })?;
        tracing::debug!(path = %path.display(), "closed store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::TempDir;

    fn head(inspector: &SqliteInspector, table: &str, limit: usize) -> Result<Vec<Row>, SqliteError> {
        let mut rows = Vec::new();
        inspector.for_each_row(table, limit, |row| rows.push(row))?;
        Ok(rows)
    }

    fn store_with(dir: &TempDir, name: &str, sql: &str) -> PathBuf {
        let path = dir.path().join(name);
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
        path
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = SqliteInspector::open(&dir.path().join("nope.db")).err().unwrap();
        assert!(matches!(err, SqliteError::NotFound(_)));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = SqliteInspector::open(dir.path()).err().unwrap();
        assert!(matches!(err, SqliteError::NotFound(_)));
    }

    #[test]
    fn garbage_file_fails_to_connect() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.db");
        std::fs::write(&path, b"not a sqlite database ".repeat(64)).unwrap();

        let err = SqliteInspector::open(&path).err().unwrap();
        assert!(matches!(err, SqliteError::Connection(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn zero_byte_file_is_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.db");
        std::fs::write(&path, b"").unwrap();

        let inspector = SqliteInspector::open(&path).unwrap();
        assert!(inspector.tables().unwrap().is_empty());
    }

    #[test]
    fn lists_tables_but_not_indexes_or_views() {
        let dir = TempDir::new().unwrap();
        let path = store_with(
            &dir,
            "s.db",
            "CREATE TABLE a (x INTEGER);
             CREATE TABLE b (y TEXT);
             CREATE INDEX a_x ON a(x);
             CREATE VIEW v AS SELECT * FROM a;",
        );

        let inspector = SqliteInspector::open(&path).unwrap();
        let mut tables = inspector.tables().unwrap();
        tables.sort();
        assert_eq!(tables, vec!["a", "b"]);
    }

    #[test]
    fn head_caps_rows_at_limit() {
        let dir = TempDir::new().unwrap();
        let path = store_with(&dir, "s.db", "CREATE TABLE t (n INTEGER);");
        {
            let conn = Connection::open(&path).unwrap();
            for n in 0..7 {
                conn.execute("INSERT INTO t (n) VALUES (?1)", params![n]).unwrap();
            }
        }

        let inspector = SqliteInspector::open(&path).unwrap();
        assert_eq!(head(&inspector, "t", 5).unwrap().len(), 5);
        assert_eq!(head(&inspector, "t", 10).unwrap().len(), 7);
        assert_eq!(inspector.row_count("t").unwrap(), 7);
    }

    #[test]
    fn reserved_word_table_names_are_readable() {
        let dir = TempDir::new().unwrap();
        let path = store_with(
            &dir,
            "s.db",
            r#"CREATE TABLE "order" (id INTEGER);
               INSERT INTO "order" VALUES (1);
               CREATE TABLE "we""ird name" (id INTEGER);
               INSERT INTO "we""ird name" VALUES (2);"#,
        );

        let inspector = SqliteInspector::open(&path).unwrap();
        assert_eq!(head(&inspector, "order", 5).unwrap(), vec![Row(vec![Value::Integer(1)])]);
        assert_eq!(
            head(&inspector, "we\"ird name", 5).unwrap(),
            vec![Row(vec![Value::Integer(2)])]
        );
    }

    #[test]
    fn unknown_table_is_a_query_error() {
        let dir = TempDir::new().unwrap();
        let path = store_with(&dir, "s.db", "CREATE TABLE t (n INTEGER);");

        let inspector = SqliteInspector::open(&path).unwrap();
        let err = head(&inspector, "missing", 5).err().unwrap();
        assert!(matches!(err, SqliteError::Query(_)));
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn values_keep_their_storage_class() {
        let dir = TempDir::new().unwrap();
        let path = store_with(&dir, "s.db", "CREATE TABLE t (a, b, c, d, e);");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                "INSERT INTO t VALUES (?1, ?2, ?3, ?4, ?5)",
                params![Option::<i64>::None, 42, 1.5, "it's", vec![0x0au8, 0xff]],
            )
            .unwrap();
        }

        let inspector = SqliteInspector::open(&path).unwrap();
        let rows = head(&inspector, "t", 5).unwrap();
        assert_eq!(rows[0].to_string(), "(NULL, 42, 1.5, 'it''s', X'0AFF')");
    }

    #[test]
    fn whole_reals_keep_a_fraction() {
        assert_eq!(Value::Real(2.0).to_string(), "2.0");
        assert_eq!(Value::Real(1e20).to_string(), "100000000000000000000.0");
        assert_eq!(Value::Real(1e-7).to_string(), "0.0000001");
        assert_eq!(Value::Real(-0.25).to_string(), "-0.25");
        assert_eq!(Value::Real(f64::NEG_INFINITY).to_string(), "-1e999");
        assert_eq!(Row(vec![]).to_string(), "()");
    }

    #[test]
    fn infinite_reals_read_back_as_literals() {
        let dir = TempDir::new().unwrap();
        let path = store_with(
            &dir,
            "s.db",
            "CREATE TABLE r (x REAL);
             INSERT INTO r VALUES (1e999), (-1e999), (1e20);",
        );

        let inspector = SqliteInspector::open(&path).unwrap();
        let rendered: Vec<String> = head(&inspector, "r", 5)
            .unwrap()
            .iter()
            .map(|row| row.to_string())
            .collect();
        assert_eq!(rendered, vec!["(1e999)", "(-1e999)", "(100000000000000000000.0)"]);
    }

    #[test]
    fn oversized_limits_are_clamped() {
        assert_eq!(sql_count(usize::MAX), i64::MAX);
        assert_eq!(sql_count(5), 5);

        let dir = TempDir::new().unwrap();
        let path = store_with(
            &dir,
            "s.db",
            "CREATE TABLE t (n INTEGER);
             INSERT INTO t VALUES (1), (2), (3);",
        );

        let inspector = SqliteInspector::open(&path).unwrap();
        assert_eq!(head(&inspector, "t", usize::MAX).unwrap().len(), 3);
        let (_, rows) = inspector.preview("t", usize::MAX, 1).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn columns_and_preview() {
        let dir = TempDir::new().unwrap();
        let path = store_with(
            &dir,
            "s.db",
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, note);
             INSERT INTO users VALUES (1, 'ann', NULL), (2, 'bob', 'hi'), (3, 'cy', NULL);",
        );

        let inspector = SqliteInspector::open(&path).unwrap();
        let columns = inspector.columns("users").unwrap();
        assert_eq!(columns.len(), 3);
        assert!(columns[0].primary_key);
        assert!(columns[1].not_null);
        assert_eq!(columns[1].decl_type, "TEXT");
        assert_eq!(columns[2].decl_type, "");

        let (headers, rows) = inspector.preview("users", 2, 1).unwrap();
        assert_eq!(headers, vec!["id", "name", "note"]);
        assert_eq!(rows, vec![vec!["2", "bob", "hi"], vec!["3", "cy", "NULL"]]);
    }

    #[test]
    fn opening_never_writes_to_the_store() {
        let dir = TempDir::new().unwrap();
        let path = store_with(&dir, "s.db", "CREATE TABLE t (n INTEGER);");
        let before = std::fs::read(&path).unwrap();

        let inspector = SqliteInspector::open(&path).unwrap();
        head(&inspector, "t", 5).unwrap();
        inspector.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
