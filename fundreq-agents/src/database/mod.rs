pub mod schema;


use crate::retry::{RetryError, RetryPolicy};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, ErrorCode, Row};
use shared_types::{NewRequest, Request};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub use schema::SchemaStatus;

pub type DbConnection = Arc<Mutex<Connection>>;

/// Timestamp layout written by [`RecordStore::add`]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Append-only persistence for confirmed requests
pub trait RequestStore: Send + Sync {
    /// Append one request; the store assigns id and timestamp
    fn add(&self, request: &NewRequest) -> Result<Request, StoreError>;

    /// Every stored request, newest first
    fn list_all(&self) -> Result<Vec<Request>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage unavailable after {attempts} attempts: {source}")]
    StorageUnavailable {
        attempts: u32,
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable { .. })
    }
}

impl From<RetryError<rusqlite::Error>> for StoreError {
    fn from(err: RetryError<rusqlite::Error>) -> Self {
        match err {
            RetryError::Fatal(source) => StoreError::Database(source),
            RetryError::Exhausted { attempts, last } => StoreError::StorageUnavailable {
                attempts,
                source: last,
            },
        }
    }
}

/// SQLite errors worth another attempt
pub fn is_transient(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.code,
            ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure
        ),
        _ => false,
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts the stored layout, the same layout with a `T` separator, and RFC 3339
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// Text view of a column, whatever storage class a legacy row used
fn column_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    })
}

fn column_amount(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

struct RawRow {
    id: i64,
    timestamp: Option<String>,
    project_number: Option<String>,
    project_name: Option<String>,
    amount: Option<f64>,
    reason: Option<String>,
    original_text: Option<String>,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: column_text(row, 1)?,
            project_number: column_text(row, 2)?,
            project_name: column_text(row, 3)?,
            amount: column_amount(row, 4)?,
            reason: column_text(row, 5)?,
            original_text: column_text(row, 6)?,
        })
    }

    fn into_request(self) -> Request {
        let timestamp = self.timestamp.as_deref().and_then(parse_timestamp);
        if timestamp.is_none() {
            tracing::warn!(
                id = self.id,
                stored = ?self.timestamp,
                "Request has no readable timestamp"
            );
        }

        Request {
            id: self.id,
            timestamp,
            project_number: self.project_number.unwrap_or_default(),
            project_name: self.project_name.unwrap_or_default(),
            amount: self.amount.unwrap_or(0.0),
            reason: self.reason.unwrap_or_default(),
            original_text: self.original_text.unwrap_or_default(),
        }
    }
}

/// Newest first by decoded time, then by id; rows without a readable time go last
fn sort_newest_first(requests: &mut [Request]) {
    requests.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

/// SQLite-backed request log
pub struct RecordStore {
    connection: DbConnection,
    policy: RetryPolicy,
    location: String,
}

impl RecordStore {
    /// Open (creating if needed) the database file and bring its schema up to date
    pub fn open(path: &Path, policy: RetryPolicy) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = policy.run("open database", || Connection::open(path), is_transient)?;
        let store = Self {
            connection: Arc::new(Mutex::new(conn)),
            policy,
            location: path.display().to_string(),
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn in_memory(policy: RetryPolicy) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            connection: Arc::new(Mutex::new(conn)),
            policy,
            location: ":memory:".to_string(),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create the `requests` table or repair a legacy one
    pub fn initialize(&self) -> Result<SchemaStatus, StoreError> {
        let mut conn = self.lock()?;
        let status = self.policy.run(
            "initialize schema",
            || schema::ensure_schema(&mut conn),
            is_transient,
        )?;
        tracing::debug!(location = %self.location, ?status, "Record store ready");
        Ok(status)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl RequestStore for RecordStore {
    fn add(&self, request: &NewRequest) -> Result<Request, StoreError> {
        let conn = self.lock()?;
        let timestamp = Utc::now().trunc_subsecs(6);
        let stored_timestamp = format_timestamp(&timestamp);
        let fields = &request.fields;

        let id = self.policy.run(
            "add request",
            || {
                conn.execute(
                    "INSERT INTO requests (timestamp, project_number, project_name, amount, reason, original_text)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        stored_timestamp,
                        fields.project_number,
                        fields.project_name,
                        fields.amount,
                        fields.reason,
                        request.original_text
                    ],
                )?;
                Ok::<_, rusqlite::Error>(conn.last_insert_rowid())
            },
            is_transient,
        )?;

        tracing::info!(
            id,
            project_number = %fields.project_number,
            amount = fields.amount,
            "Request saved"
        );

        Ok(Request {
            id,
            timestamp: Some(timestamp),
            project_number: fields.project_number.clone(),
            project_name: fields.project_name.clone(),
            amount: fields.amount,
            reason: fields.reason.clone(),
            original_text: request.original_text.clone(),
        })
    }

    fn list_all(&self) -> Result<Vec<Request>, StoreError> {
        let conn = self.lock()?;

        let rows = self.policy.run(
            "list requests",
            || {
                let mut stmt = conn.prepare(
                    "SELECT id, timestamp, project_number, project_name, amount, reason, original_text
                        FROM requests",
                )?;
                let rows = stmt
                    .query_map([], RawRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, rusqlite::Error>(rows)
            },
            is_transient,
        )?;

        let mut requests: Vec<Request> = rows.into_iter().map(RawRow::into_request).collect();
        sort_newest_first(&mut requests);
        Ok(requests)
    }
}
