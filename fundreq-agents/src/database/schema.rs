use rusqlite::Connection;

pub const REQUESTS_TABLE: &str = "requests";

/// Columns the `requests` table must carry, in table order
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "timestamp",
    "project_number",
    "project_name",
    "amount",
    "reason",
    "original_text",
];

/// Columns carried across a schema repair, with the value used when the old
/// table lacks them too
const PRESERVED_COLUMNS: [(&str, &str); 5] = [
    ("timestamp", "strftime('%Y-%m-%d %H:%M:%f', 'now')"),
    ("project_number", "''"),
    ("project_name", "''"),
    ("amount", "0"),
    ("reason", "''"),
];

const CREATE_REQUESTS_TABLE: &str = "CREATE TABLE requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp DATETIME,
    project_number TEXT,
    project_name TEXT,
    amount REAL,
    reason TEXT,
    original_text TEXT
)";

/// What `ensure_schema` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Created,
    UpToDate,
    Repaired { rows_copied: usize },
}

pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Create the `requests` table, or rebuild it when columns are missing.
///
/// A rebuild keeps only timestamp and the four business fields; rows get new
/// ids and an empty `original_text`. The whole rebuild runs in one transaction.
pub fn ensure_schema(conn: &mut Connection) -> rusqlite::Result<SchemaStatus> {
    conn.execute_batch("PRAGMA encoding = \"UTF-8\";")?;

    let existing = table_columns(conn, REQUESTS_TABLE)?;
    if existing.is_empty() {
        conn.execute(CREATE_REQUESTS_TABLE, [])?;
        return Ok(SchemaStatus::Created);
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !existing.iter().any(|c| c == column))
        .collect();
    if missing.is_empty() {
        return Ok(SchemaStatus::UpToDate);
    }

    tracing::info!(?missing, "requests table is missing columns, rebuilding it");

    let source_columns: Vec<&str> = PRESERVED_COLUMNS
        .iter()
        .map(|(column, fallback)| {
            if existing.iter().any(|c| c == column) {
                *column
            } else {
                *fallback
            }
        })
        .collect();
    let target_columns: Vec<&str> = PRESERVED_COLUMNS.iter().map(|(c, _)| *c).collect();

    let tx = conn.transaction()?;
    tx.execute("DROP TABLE IF EXISTS requests_old", [])?;
    tx.execute("ALTER TABLE requests RENAME TO requests_old", [])?;
    tx.execute(CREATE_REQUESTS_TABLE, [])?;
    let rows_copied = tx.execute(
        &format!(
            "INSERT INTO requests ({}, original_text) SELECT {}, '' FROM requests_old ORDER BY rowid",
            target_columns.join(", "),
            source_columns.join(", ")
        ),
        [],
    )?;
    tx.execute("DROP TABLE requests_old", [])?;
    tx.commit()?;

    tracing::info!(rows_copied, "requests table rebuilt");
    Ok(SchemaStatus::Repaired { rows_copied })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_table_on_empty_database() {
        let mut conn = Connection::open_in_memory().unwrap();

        let status = ensure_schema(&mut conn).unwrap();

        assert_eq!(status, SchemaStatus::Created);
        assert_eq!(
            table_columns(&conn, REQUESTS_TABLE).unwrap(),
            REQUIRED_COLUMNS.to_vec()
        );
    }

    #[test]
    fn test_schema_check_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();

        ensure_schema(&mut conn).unwrap();
        let status = ensure_schema(&mut conn).unwrap();

        assert_eq!(status, SchemaStatus::UpToDate);
    }

    #[test]
    fn test_repairs_legacy_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE requests (
                timestamp DATETIME,
                project_number TEXT,
                project_name TEXT,
                amount REAL,
                reason TEXT
            );
            INSERT INTO requests VALUES ('2024-03-01 09:30:00.000000', '7', 'Depot', 120.5, 'paint');
            INSERT INTO requests VALUES ('2024-03-02 10:00:00.000000', '8', 'Lab', 40.0, 'cables');",
        )
        .unwrap();

        let status = ensure_schema(&mut conn).unwrap();

        assert_eq!(status, SchemaStatus::Repaired { rows_copied: 2 });
        assert_eq!(
            table_columns(&conn, REQUESTS_TABLE).unwrap(),
            REQUIRED_COLUMNS.to_vec()
        );

        let rows: Vec<(i64, String, String, f64, String)> = conn
            .prepare("SELECT id, project_number, project_name, amount, original_text FROM requests ORDER BY id")
            .unwrap()
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1, "7");
        assert_eq!(rows[0].2, "Depot");
        assert_eq!(rows[0].3, 120.5);
        assert_eq!(rows[0].4, "");
        assert_eq!(rows[1].1, "8");

        let leftovers: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='requests_old'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_repair_fills_columns_absent_from_old_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE requests (project_name TEXT, amount REAL);
             INSERT INTO requests VALUES ('Depot', 10.0);",
        )
        .unwrap();

        ensure_schema(&mut conn).unwrap();

        let (number, name, reason, timestamp): (String, String, String, String) = conn
            .query_row(
                "SELECT project_number, project_name, reason, timestamp FROM requests",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(number, "");
        assert_eq!(name, "Depot");
        assert_eq!(reason, "");
        assert!(!timestamp.is_empty());
    }
}
