//! Filesystem primitives the MSP assembly is built from.
use crate::error::{BootstrapError, BootstrapResult};
use std::fs::{self, ReadDir};
use std::path::Path;

/// Create the given directory and all missing parents.
pub fn create_dir(path: &Path) -> BootstrapResult<()> {
    fs::create_dir_all(path).map_err(|e| BootstrapError::dir_error(path, e))
}

/// Remove the given directory tree if it exists.
pub fn remove_dir(path: &Path) -> BootstrapResult<()> {
    if path.exists() {
        fs::remove_dir_all(path).map_err(|e| BootstrapError::dir_error(path, e))
    } else {
        Ok(())
    }
}

pub fn read_dir(path: &Path) -> BootstrapResult<ReadDir> {
    fs::read_dir(path).map_err(|e| BootstrapError::dir_error(path, e))
}

/// Recursively copy the contents of the directory `src` into `dst`,
/// creating `dst` and missing parents first.
pub fn copy_dir(src: &Path, dst: &Path) -> BootstrapResult<()> {
    create_dir(dst)?;
    for entry in read_dir(src)? {
        let entry = entry.map_err(|e| BootstrapError::dir_error(src, e))?;
        let source = entry.path();
        let target = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| BootstrapError::file_error(&source, e))?;
        if file_type.is_dir() {
            copy_dir(&source, &target)?;
        } else {
            fs::copy(&source, &target).map_err(|e| BootstrapError::file_error(&source, e))?;
        }
    }
    Ok(())
}
