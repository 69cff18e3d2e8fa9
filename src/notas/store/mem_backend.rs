use super::backend::StorageBackend;
use crate::error::{NotasError, Result};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory storage backend for testing.
///
/// Writes into a directory that was never created fail, mirroring the
/// filesystem, so tests exercise the same error paths.
#[derive(Debug, Default)]
pub struct MemBackend {
    files: RefCell<HashMap<PathBuf, String>>,
    dirs: RefCell<HashSet<PathBuf>>,
    simulate_write_error: Cell<bool>,
    simulate_dir_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    pub fn set_simulate_dir_error(&self, simulate: bool) {
        self.simulate_dir_error.set(simulate);
    }

    pub fn file_count(&self) -> usize {
        self.files.borrow().len()
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                self.dirs.borrow().contains(parent)
            }
            _ => true,
        }
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, path: &Path) -> Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            NotasError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ))
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(NotasError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated write error",
            )));
        }
        if !self.parent_exists(path) {
            return Err(NotasError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory of {} does not exist", path.display()),
            )));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if self.simulate_dir_error.get() {
            return Err(NotasError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated mkdir error",
            )));
        }
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_inside_known_dir() {
        let backend = MemBackend::new();
        backend.ensure_dir(Path::new("/notes")).unwrap();
        backend.write(Path::new("/notes/a.md"), "text").unwrap();
        assert_eq!(backend.read(Path::new("/notes/a.md")).unwrap(), "text");
        assert_eq!(backend.file_count(), 1);
    }

    #[test]
    fn test_write_without_dir_fails() {
        let backend = MemBackend::new();
        assert!(backend.write(Path::new("/nowhere/a.md"), "x").is_err());
    }

    #[test]
    fn test_simulated_write_error() {
        let backend = MemBackend::new();
        backend.ensure_dir(Path::new("/notes")).unwrap();
        backend.set_simulate_write_error(true);
        assert!(backend.write(Path::new("/notes/a.md"), "x").is_err());
        assert_eq!(backend.file_count(), 0);
    }
}
