use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use super::error::StoreError;
use super::location::StoreLocation;
use super::types::{Record, RecordId};
use super::RecordStore;

/// SQLite-backed record store.
///
/// Uses a `Mutex<Option<Connection>>` so the connection can be released
/// through a shared reference. The schema is created on `open()`; dropping
/// the store closes the connection if `close()` was never called.
pub struct SqliteStore {
    conn: Mutex<Option<Connection>>,
    location: Option<StoreLocation>,
}

impl SqliteStore {
    /// Open (or create) the database at the given location.
    pub fn open(location: &StoreLocation) -> Result<Self, StoreError> {
        let path = location.db_path();
        if let Some(dir) = location.container_dir() {
            create_private_dir(&dir).map_err(|e| StoreError::unavailable(&dir, e))?;
        }

        let conn = Connection::open(&path).map_err(|e| StoreError::unavailable(&path, e))?;
        migrate(&conn).map_err(|e| StoreError::unavailable(&path, e))?;
        tracing::debug!(path = %path.display(), "storage opened");

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            location: Some(location.clone()),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::unavailable(":memory:", e))?;
        migrate(&conn).map_err(|e| StoreError::unavailable(":memory:", e))?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            location: None,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        f(conn)
    }
}

impl RecordStore for SqliteStore {
    fn create_record(&self, content: &str) -> Result<RecordId, StoreError> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO record (content) VALUES (?1)", params![content])
                .map_err(StoreError::write("create_record"))?;
            let id = conn.last_insert_rowid() as RecordId;
            tracing::debug!(id, "record created");
            Ok(id)
        })
    }

    fn get_record_by_id(&self, id: RecordId) -> Result<String, StoreError> {
        let Some(key) = sqlite_id(id) else {
            return Err(StoreError::NotFound(id));
        };
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT content FROM record WHERE id = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(StoreError::read("get_record_by_id"))?
            .ok_or(StoreError::NotFound(id))
        })
    }

    fn list_records(&self) -> Result<Vec<Record>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, content, created_at FROM record ORDER BY id DESC")
                .map_err(StoreError::read("list_records prepare"))?;

            let rows = stmt
                .query_map([], record_from_row)
                .map_err(StoreError::read("list_records query"))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(StoreError::read("list_records collect"))
        })
    }

    fn count_records(&self) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let count = conn
                .query_row("SELECT COUNT(*) FROM record", [], |row| row.get::<_, i64>(0))
                .map_err(StoreError::read("count_records"))?;
            Ok(count as u64)
        })
    }

    fn delete_record_by_id(&self, id: RecordId) -> Result<(), StoreError> {
        let Some(key) = sqlite_id(id) else {
            tracing::debug!(id, "id out of range, nothing to delete");
            return Ok(());
        };
        self.with_conn(|conn| {
            let removed = conn
                .execute("DELETE FROM record WHERE id = ?1", params![key])
                .map_err(StoreError::write("delete_record_by_id"))?;
            tracing::debug!(id, removed, "delete by id");
            Ok(())
        })
    }

    fn delete_last_record(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let removed = conn
                .execute(
                    "DELETE FROM record WHERE id = (SELECT MAX(id) FROM record)",
                    [],
                )
                .map_err(StoreError::write("delete_last_record"))?;
            tracing::debug!(removed, "delete last");
            Ok(())
        })
    }

    fn clean_up(&self) -> Result<(), StoreError> {
        let Some(location) = self.location.as_ref() else {
            return Err(StoreError::CleanupFailed {
                path: PathBuf::from(":memory:"),
                source: io::Error::new(
                    io::ErrorKind::Unsupported,
                    "in-memory storage has no backing file",
                ),
            });
        };

        let path = location.db_path();
        if let Err(source) = fs::metadata(&path) {
            return Err(StoreError::CleanupFailed { path, source });
        }

        self.close()?;

        fs::remove_file(&path).map_err(|source| StoreError::CleanupFailed {
            path: path.clone(),
            source,
        })?;
        if let Some(dir) = location.owned_dir() {
            fs::remove_dir_all(&dir).map_err(|source| StoreError::CleanupFailed {
                path: dir.clone(),
                source,
            })?;
        }

        tracing::info!(path = %path.display(), "storage removed");
        Ok(())
    }

    fn close(&self) -> Result<(), StoreError> {
        let conn = self.lock()?.take();
        match conn {
            Some(conn) => conn.close().map_err(|(_, e)| StoreError::CloseFailed(e)),
            None => Ok(()),
        }
    }
}

fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS record (
            id         INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            content    TEXT    NOT NULL CHECK (content <> ''),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )
}

/// Create `dir` (and parents) if missing, owner-only on unix.
fn create_private_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

// SQLite rowids are signed; anything above i64::MAX can not exist.
fn sqlite_id(id: RecordId) -> Option<i64> {
    i64::try_from(id).ok()
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let id: i64 = row.get(0)?;
    let raw: String = row.get(2)?;
    let created_at = NaiveDateTime::parse_from_str(&raw, Record::TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .and_utc();
    Ok(Record {
        id: id as RecordId,
        content: row.get(1)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> SqliteStore {
        SqliteStore::open_memory().unwrap()
    }

    #[test]
    fn create_and_list_newest_first() {
        let store = make_store();
        store.create_record("buy milk").unwrap();
        store.create_record("call Alice").unwrap();

        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "call Alice");
        assert_eq!(records[1].content, "buy milk");
        assert!(records[0].id > records[1].id);
    }

    #[test]
    fn ids_strictly_increase() {
        let store = make_store();
        let ids: Vec<_> = (0..5)
            .map(|i| store.create_record(&format!("task {i}")).unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids[0], 1);
    }

    #[test]
    fn count_matches_list() {
        let store = make_store();
        assert_eq!(store.count_records().unwrap(), 0);
        for i in 0..3 {
            store.create_record(&format!("task {i}")).unwrap();
        }
        assert_eq!(store.count_records().unwrap(), 3);
        assert_eq!(store.list_records().unwrap().len(), 3);
    }

    #[test]
    fn get_existing_and_missing() {
        let store = make_store();
        let id = store.create_record("water plants").unwrap();
        assert_eq!(store.get_record_by_id(id).unwrap(), "water plants");

        let err = store.get_record_by_id(id + 100).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id + 100));
    }

    #[test]
    fn get_out_of_range_id_is_not_found() {
        let store = make_store();
        let err = store.get_record_by_id(u64::MAX).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(u64::MAX)));
    }

    #[test]
    fn delete_by_id() {
        let store = make_store();
        let first = store.create_record("a").unwrap();
        let second = store.create_record("b").unwrap();

        store.delete_record_by_id(first).unwrap();

        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, second);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let store = make_store();
        store.create_record("a").unwrap();

        store.delete_record_by_id(42).unwrap();
        store.delete_record_by_id(u64::MAX).unwrap();

        assert_eq!(store.count_records().unwrap(), 1);
    }

    #[test]
    fn delete_last_removes_max_id() {
        let store = make_store();
        store.create_record("a").unwrap();
        store.create_record("b").unwrap();
        let last = store.create_record("c").unwrap();

        store.delete_last_record().unwrap();

        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.id != last));
        assert_eq!(records[0].content, "b");
    }

    #[test]
    fn delete_last_on_empty_store() {
        let store = make_store();
        store.delete_last_record().unwrap();
        assert_eq!(store.count_records().unwrap(), 0);
    }

    #[test]
    fn ids_not_reused_after_pop() {
        let store = make_store();
        store.create_record("a").unwrap();
        let popped = store.create_record("b").unwrap();
        store.delete_last_record().unwrap();

        let next = store.create_record("c").unwrap();
        assert!(next > popped);
    }

    #[test]
    fn empty_content_rejected() {
        let store = make_store();
        let err = store.create_record("").unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));
        assert_eq!(store.count_records().unwrap(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let store = make_store();
        store.close().unwrap();
        store.close().unwrap();
        assert!(matches!(store.count_records(), Err(StoreError::Closed)));
    }

    #[test]
    fn clean_up_in_memory_fails() {
        let store = make_store();
        assert!(matches!(
            store.clean_up(),
            Err(StoreError::CleanupFailed { .. })
        ));
    }

    #[test]
    fn schema_bootstrap_is_idempotent() {
        let store = make_store();
        store.create_record("kept").unwrap();
        store
            .with_conn(|conn| migrate(conn).map_err(StoreError::write("migrate")))
            .unwrap();
        assert_eq!(store.count_records().unwrap(), 1);
    }
}
