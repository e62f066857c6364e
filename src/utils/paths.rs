//! Cross-Platform Path Utilities
//!
//! Functions for resolving the application data directory and the files
//! persisted inside it (~/.storefront-search/).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the application data directory (~/.storefront-search/)
pub fn app_data_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".storefront-search"))
}

/// Get the recent-searches file path (~/.storefront-search/recent-searches.json)
pub fn recent_searches_path() -> AppResult<PathBuf> {
    Ok(app_data_dir()?.join("recent-searches.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the application data directory, creating if it doesn't exist
pub fn ensure_app_data_dir() -> AppResult<PathBuf> {
    let path = app_data_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
