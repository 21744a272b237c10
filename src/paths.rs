use std::path::{Path, PathBuf};

use crate::error::PlaceError;

/// Per-user config file: `~/.config/virt-place/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("virt-place").join("config.toml"))
}

/// Staging file for `target_file`: its final component inside the host temp dir.
pub fn staging_path(target_file: &str) -> Result<PathBuf, PlaceError> {
    staging_path_in(&std::env::temp_dir(), target_file)
}

pub(crate) fn staging_path_in(temp_dir: &Path, target_file: &str) -> Result<PathBuf, PlaceError> {
    let name = Path::new(target_file)
        .file_name()
        .ok_or_else(|| PlaceError::Usage {
            message: format!("-file '{target_file}' has no file name"),
        })?;
    Ok(temp_dir.join(name))
}
