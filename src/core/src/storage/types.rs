use chrono::{DateTime, Utc};

/// Identifier assigned by the store when a record is created.
pub type RecordId = u64;

/// Persisted task note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Timestamp layout used by `list` output.
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Render as a single `list` line, without trailing newline.
    pub fn display_line(&self) -> String {
        format!(
            "{}. {} (created at: {})",
            self.id,
            self.content,
            self.created_at.format(Self::TIMESTAMP_FORMAT)
        )
    }
}
