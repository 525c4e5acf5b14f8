mod config;
mod paths;
pub mod router;
pub mod storage;

pub use config::{ConfigError, LaterConfig, LocationOverrides, StorageConfig};
pub use paths::{default_config_path, user_home_dir};
pub use router::{write_usage, Command, CommandError, CommandRouter, Verb};
pub use storage::{Record, RecordId, RecordStore, SqliteStore, StoreError, StoreLocation};
