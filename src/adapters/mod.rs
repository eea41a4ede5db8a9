//! Concrete adapter implementations for ports.

use crate::domain::error::HorizonError;
use std::fs;
use std::path::Path;

pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod json_report_adapter;
pub mod price_cache;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;

/// Creates the parent directories of a report path.
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), HorizonError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(HorizonError::Io)
        }
        _ => Ok(()),
    }
}
