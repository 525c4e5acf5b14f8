use std::path::{Path, PathBuf};

/// Where the record database lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// `<base_dir>/<dir_name>/<file_name>`. The directory belongs to the store
    /// and is removed together with the file on cleanup.
    Dedicated {
        base_dir: PathBuf,
        dir_name: String,
        file_name: String,
    },
    /// An explicit database file. Cleanup removes the file only.
    File(PathBuf),
}

impl StoreLocation {
    pub const DEFAULT_DIR_NAME: &'static str = ".later";
    pub const DEFAULT_FILE_NAME: &'static str = "later.db";

    pub fn dedicated(
        base_dir: impl Into<PathBuf>,
        dir_name: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self::Dedicated {
            base_dir: base_dir.into(),
            dir_name: dir_name.into(),
            file_name: file_name.into(),
        }
    }

    /// Default layout under `base_dir`: `<base_dir>/.later/later.db`.
    pub fn in_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self::dedicated(base_dir, Self::DEFAULT_DIR_NAME, Self::DEFAULT_FILE_NAME)
    }

    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        match self {
            Self::Dedicated {
                base_dir,
                dir_name,
                file_name,
            } => base_dir.join(dir_name).join(file_name),
            Self::File(path) => path.clone(),
        }
    }

    /// Directory that must exist before the database can be opened.
    pub fn container_dir(&self) -> Option<PathBuf> {
        match self {
            Self::Dedicated {
                base_dir, dir_name, ..
            } => Some(base_dir.join(dir_name)),
            Self::File(path) => path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf),
        }
    }

    /// Directory removed on cleanup, if the store owns one.
    pub fn owned_dir(&self) -> Option<PathBuf> {
        match self {
            Self::Dedicated { .. } => self.container_dir(),
            Self::File(_) => None,
        }
    }
}
