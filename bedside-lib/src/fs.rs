use std::{fs::create_dir_all, path::PathBuf};

use xdg::BaseDirectories;

use crate::{Error, Result};

/// Returns the path to the Bedside configuration directory. If it doesn't exist when this
/// function is called, it will be created.
pub fn config_dir() -> Result<PathBuf> {
    let path = xdg_prefix().get_config_home().ok_or(Error::NoHome)?;

    ensure_dir(path)
}

/// Returns the path to the Bedside data directory. If it doesn't exist when this function is
/// called, it will be created.
pub fn data_dir() -> Result<PathBuf> {
    let path = xdg_prefix().get_data_home().ok_or(Error::NoHome)?;

    ensure_dir(path)
}

/// Create `path` and all of its parents, returning it unchanged.
pub fn ensure_dir(path: PathBuf) -> Result<PathBuf> {
    create_dir_all(&path).map_err(|source| Error::CreateDir {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

fn xdg_prefix() -> BaseDirectories {
    xdg::BaseDirectories::with_prefix("bedside")
}
