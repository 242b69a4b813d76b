//! SQLite connection bootstrap for the key-value backend.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Create the `kv_entries` table and stamp its schema version.
//!
//! # Invariants
//! - The schema version is tracked via `PRAGMA user_version`.
//! - A file written by a newer build is refused, never downgraded.
//! - A current-version file that lost `kv_entries` is recreated on open.

use crate::storage::{StorageError, StorageResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Schema version written by this build. Version 0 is a fresh file.
pub const KV_SCHEMA_VERSION: u32 = 1;
pub const KV_TABLE: &str = "kv_entries";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_KV_TABLE: &str = "CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Opens (or creates) a SQLite file ready for `SqliteKvStore`.
///
/// # Side effects
/// - Emits `db_open` log events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> StorageResult<Connection> {
    let path = path.as_ref();
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory database ready for `SqliteKvStore`.
pub fn open_db_in_memory() -> StorageResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

pub(crate) fn kv_table_exists(conn: &Connection) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn open_with<F>(mode: &'static str, connect: F) -> StorageResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        StorageError::from(err)
    })?;

    if let Err(err) = prepare_kv_schema(&mut conn) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=kv_schema_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn prepare_kv_schema(conn: &mut Connection) -> StorageResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let db_version = schema_version(conn)?;
    if db_version > KV_SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: KV_SCHEMA_VERSION,
        });
    }
    if db_version == KV_SCHEMA_VERSION && kv_table_exists(conn)? {
        return Ok(());
    }
    if db_version == KV_SCHEMA_VERSION {
        warn!("event=kv_schema module=db status=repair table={KV_TABLE}");
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_KV_TABLE)?;
    tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}
