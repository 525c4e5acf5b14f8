use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

fn env_home_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home));
        }
    }
    if let Some(profile) = std::env::var_os("USERPROFILE") {
        if !profile.is_empty() {
            return Some(PathBuf::from(profile));
        }
    }
    let drive = std::env::var_os("HOMEDRIVE");
    let path = std::env::var_os("HOMEPATH");
    match (drive, path) {
        (Some(drive), Some(path)) if !drive.is_empty() && !path.is_empty() => {
            Some(PathBuf::from(drive).join(path))
        }
        _ => None,
    }
}

pub fn user_home_dir() -> Option<PathBuf> {
    if let Some(base) = BaseDirs::new() {
        return Some(base.home_dir().to_path_buf());
    }
    env_home_dir()
}

/// `<platform config dir>/later/config.toml`. Kept outside the store
/// directory so `clean` leaves it alone.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(dirs) = ProjectDirs::from("", "", "later") {
        return Some(dirs.config_dir().join("config.toml"));
    }
    user_home_dir().map(|home| home.join(".config").join("later").join("config.toml"))
}
