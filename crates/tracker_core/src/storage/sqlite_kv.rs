//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist key/value pairs in the `kv_entries` table.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - Construction rejects connections that skipped `db::open_db`.
//! - `set` is a single upsert statement, so a value is replaced atomically.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::db::{kv_table_exists, schema_version, KV_SCHEMA_VERSION, KV_TABLE};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store over a connection prepared by `db::open_db`.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection returned by `db::open_db` / `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not `KV_SCHEMA_VERSION`.
    /// - `MissingRequiredTable` when `kv_entries` does not exist.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let actual_version = schema_version(conn)?;
        let expected_version = KV_SCHEMA_VERSION;
        if actual_version != expected_version {
            return Err(StorageError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        if !kv_table_exists(conn)? {
            return Err(StorageError::MissingRequiredTable(KV_TABLE));
        }

        Ok(Self { conn })
    }

    /// Deletes `key`. Returns whether a row was removed.
    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::db::open_db_in_memory;
    use crate::storage::KeyValueStore;

    #[test]
    fn get_set_remove_roundtrip() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SqliteKvStore::try_new(&conn).unwrap();

        assert_eq!(store.get("productivity-data").unwrap(), None);
        store.set("productivity-data", "{}").unwrap();
        store.set("productivity-data", r#"{"tasks":[]}"#).unwrap();
        assert_eq!(
            store.get("productivity-data").unwrap().as_deref(),
            Some(r#"{"tasks":[]}"#)
        );

        assert!(store.remove("productivity-data").unwrap());
        assert!(!store.remove("productivity-data").unwrap());
        assert_eq!(store.get("productivity-data").unwrap(), None);
    }
}
