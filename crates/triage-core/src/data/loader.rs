//! SQLite access for the labeled message table.
//!
//! The ETL step writes a single table whose first four columns are
//! `id, message, original, genre`, followed by one integer column per
//! category. Loading is all-or-nothing: a missing file, a missing table, a
//! wrong header or an out-of-range label aborts with an error.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params_from_iter};

use crate::data::dataset::{Dataset, MessageRecord, RELATED, RELATED_SENTINEL};
use crate::error::{Result, TriageError};

/// Table name the ETL step writes to.
pub const DEFAULT_TABLE: &str = "DisasterResponse";

/// Non-category columns, in the order they must appear.
pub const LEADING_COLUMNS: [&str; 4] = ["id", "message", "original", "genre"];

/// Quote an SQL identifier, doubling embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Load the message table from a SQLite file.
///
/// The file is opened read-only and must already exist.
pub fn load_dataset<P: AsRef<Path>>(path: P, table: &str) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(TriageError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("database not found: {}", path.display()),
        )));
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let dataset = Dataset::from_connection(&conn, table)?;

    tracing::info!(
        path = %path.display(),
        table,
        messages = dataset.len(),
        categories = dataset.category_names().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

impl Dataset {
    /// Read every row of `table` through an open connection.
    pub fn from_connection(conn: &Connection, table: &str) -> Result<Self> {
        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let mut stmt = conn.prepare(&sql)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        if columns.len() <= LEADING_COLUMNS.len() {
            return Err(TriageError::InvalidSchema(format!(
                "table {table:?} has {} columns, expected {} leading columns and at least one category",
                columns.len(),
                LEADING_COLUMNS.len()
            )));
        }
        for (found, expected) in columns.iter().zip(LEADING_COLUMNS) {
            if !found.eq_ignore_ascii_case(expected) {
                return Err(TriageError::InvalidSchema(format!(
                    "expected column {expected:?}, found {found:?}"
                )));
            }
        }
        let category_names = columns[LEADING_COLUMNS.len()..].to_vec();

        let mut records = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let mut categories = Vec::with_capacity(category_names.len());

            for (offset, name) in category_names.iter().enumerate() {
                let value = match row.get_ref(LEADING_COLUMNS.len() + offset)? {
                    ValueRef::Integer(v) => v,
                    ValueRef::Real(v) if v.fract() == 0.0 => v as i64,
                    other => {
                        return Err(TriageError::InvalidSchema(format!(
                            "column {name:?} holds a {} value (message id {id})",
                            other.data_type()
                        )));
                    }
                };
                categories.push(check_label(name, id, value)?);
            }

            records.push(MessageRecord {
                id,
                message: row.get(1)?,
                original: row.get(2)?,
                genre: row.get(3)?,
                categories,
            });
        }

        Dataset::new(category_names, records)
    }

    /// Write the dataset as a table with the layout [`Dataset::from_connection`] reads.
    ///
    /// An existing table of the same name is replaced.
    pub fn write_table(&self, conn: &mut Connection, table: &str) -> Result<()> {
        let quoted = quote_identifier(table);
        let category_defs: Vec<String> = self
            .category_names()
            .iter()
            .map(|c| format!("{} INTEGER NOT NULL", quote_identifier(c)))
            .collect();

        let tx = conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {quoted}"), [])?;
        tx.execute(
            &format!(
                "CREATE TABLE {quoted} (id INTEGER, message TEXT, original TEXT, genre TEXT, {})",
                category_defs.join(", ")
            ),
            [],
        )?;

        {
            let placeholders = vec!["?"; LEADING_COLUMNS.len() + self.category_names().len()];
            let mut insert = tx.prepare(&format!(
                "INSERT INTO {quoted} VALUES ({})",
                placeholders.join(", ")
            ))?;

            for record in self.records() {
                let mut values: Vec<rusqlite::types::Value> = vec![
                    record.id.into(),
                    record.message.clone().into(),
                    record.original.clone().into(),
                    record.genre.clone().into(),
                ];
                values.extend(record.categories.iter().map(|&v| i64::from(v).into()));
                insert.execute(params_from_iter(values))?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

/// Validate a stored category value.
fn check_label(column: &str, id: i64, value: i64) -> Result<u8> {
    match value {
        0 | 1 => Ok(value as u8),
        v if v == i64::from(RELATED_SENTINEL) && column == RELATED => Ok(RELATED_SENTINEL),
        _ => Err(TriageError::InvalidLabel {
            column: column.to_string(),
            id,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE DisasterResponse (
                id INTEGER, message TEXT, original TEXT, genre TEXT,
                related INTEGER, request INTEGER, food INTEGER
             );
             INSERT INTO DisasterResponse VALUES
                (2, 'We need food', 'Nou bezwen manje', 'direct', 1, 1, 1),
                (7, 'Storm is over', NULL, 'news', 0, 0, 0),
                (9, 'Is it the end?', NULL, 'social', 2, 0, 0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_from_connection_reads_rows() {
        let conn = fixture();
        let dataset = Dataset::from_connection(&conn, DEFAULT_TABLE).unwrap();

        assert_eq!(dataset.category_names(), ["related", "request", "food"]);
        assert_eq!(dataset.len(), 3);

        let first = &dataset.records()[0];
        assert_eq!(first.id, 2);
        assert_eq!(first.message, "We need food");
        assert_eq!(first.original.as_deref(), Some("Nou bezwen manje"));
        assert_eq!(first.genre, "direct");
        assert_eq!(first.categories, [1, 1, 1]);

        assert_eq!(dataset.records()[1].original, None);
        assert_eq!(dataset.records()[2].categories[0], RELATED_SENTINEL);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        let result = Dataset::from_connection(&conn, DEFAULT_TABLE);
        assert!(matches!(result, Err(TriageError::Database(_))));
    }

    #[test]
    fn test_wrong_leading_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, text TEXT, original TEXT, genre TEXT, food INTEGER);",
        )
        .unwrap();
        let result = Dataset::from_connection(&conn, "t");
        assert!(matches!(result, Err(TriageError::InvalidSchema(_))));
    }

    #[test]
    fn test_no_category_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER, message TEXT, original TEXT, genre TEXT);")
            .unwrap();
        let result = Dataset::from_connection(&conn, "t");
        assert!(matches!(result, Err(TriageError::InvalidSchema(_))));
    }

    #[test]
    fn test_sentinel_outside_related_is_rejected() {
        let conn = fixture();
        conn.execute("UPDATE DisasterResponse SET food = 2 WHERE id = 7", [])
            .unwrap();

        match Dataset::from_connection(&conn, DEFAULT_TABLE) {
            Err(TriageError::InvalidLabel { column, id, value }) => {
                assert_eq!(column, "food");
                assert_eq!(id, 7);
                assert_eq!(value, 2);
            }
            other => panic!("expected InvalidLabel, got {other:?}"),
        }
    }

    #[test]
    fn test_text_label_is_rejected() {
        let conn = fixture();
        conn.execute("UPDATE DisasterResponse SET request = 'yes' WHERE id = 2", [])
            .unwrap();
        let result = Dataset::from_connection(&conn, DEFAULT_TABLE);
        assert!(matches!(result, Err(TriageError::InvalidSchema(_))));
    }

    #[test]
    fn test_write_table_round_trips_through_a_file() {
        let source = Dataset::from_connection(&fixture(), DEFAULT_TABLE).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.db");
        let mut conn = Connection::open(&path).unwrap();
        source.write_table(&mut conn, "Messages").unwrap();
        drop(conn);

        let loaded = load_dataset(&path, "Messages").unwrap();
        assert_eq!(loaded, source);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_dataset(dir.path().join("absent.db"), DEFAULT_TABLE);
        assert!(matches!(result, Err(TriageError::Io(_))));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("DisasterResponse"), "\"DisasterResponse\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
