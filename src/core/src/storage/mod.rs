mod error;
mod location;
mod sqlite;
mod types;

pub use error::StoreError;
pub use location::StoreLocation;
pub use sqlite::SqliteStore;
pub use types::{Record, RecordId};

/// Abstract storage interface for records.
///
/// All methods use `&self`; implementations handle interior mutability
/// (e.g. `Mutex<Option<Connection>>` for sqlite) so the handle can be shared
/// with the command router and still be closed by its owner.
pub trait RecordStore: Send + Sync {
    /// Insert a new record and return the id the store assigned to it.
    fn create_record(&self, content: &str) -> Result<RecordId, StoreError>;

    /// Get the content of a record, or `StoreError::NotFound`.
    fn get_record_by_id(&self, id: RecordId) -> Result<String, StoreError>;

    /// List all records, ordered by id descending.
    fn list_records(&self) -> Result<Vec<Record>, StoreError>;

    /// Number of records currently stored.
    fn count_records(&self) -> Result<u64, StoreError>;

    /// Delete a record by id. Absent ids are a no-op, not an error.
    fn delete_record_by_id(&self, id: RecordId) -> Result<(), StoreError>;

    /// Delete the record with the highest id. No-op on an empty store.
    fn delete_last_record(&self) -> Result<(), StoreError>;

    /// Irreversibly remove the backing storage.
    fn clean_up(&self) -> Result<(), StoreError>;

    /// Release the underlying connection. Safe to call more than once.
    fn close(&self) -> Result<(), StoreError>;
}
