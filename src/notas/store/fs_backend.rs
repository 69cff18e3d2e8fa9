use super::backend::StorageBackend;
use crate::error::{NotasError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "note".to_string());
        dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()))
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(NotasError::Io)
    }

    /// Writes through a temp file and a rename. An existing `path` is resolved
    /// first, so a symlinked note updates its target and keeps its mode.
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let existing = if path.exists() {
            let target = fs::canonicalize(path).map_err(NotasError::Io)?;
            let perms = fs::metadata(&target).map_err(NotasError::Io)?.permissions();
            Some((target, perms))
        } else {
            None
        };
        let target = existing.as_ref().map_or(path, |(t, _)| t.as_path());

        let tmp = Self::tmp_path(target);
        fs::write(&tmp, content).map_err(NotasError::Io)?;
        let result = match &existing {
            Some((_, perms)) => fs::set_permissions(&tmp, perms.clone()),
            None => Ok(()),
        }
        .and_then(|_| fs::rename(&tmp, target));

        if let Err(err) = result {
            let _ = fs::remove_file(&tmp);
            return Err(NotasError::Io(err));
        }
        Ok(())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(NotasError::Io)?;
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.md");
        let backend = FsBackend::new();

        backend.write(&path, "Hola mundo").unwrap();
        assert_eq!(backend.read(&path).unwrap(), "Hola mundo");

        backend.write(&path, "").unwrap();
        assert_eq!(backend.read(&path).unwrap(), "");
    }

    #[test]
    fn test_write_leaves_no_tmp_files() {
        let dir = TempDir::new().unwrap();
        let backend = FsBackend::new();
        backend.write(&dir.path().join("a.md"), "a").unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let name = entry.unwrap().file_name();
            let name = name.to_string_lossy();
            assert!(!name.ends_with(".tmp"), "leftover tmp file: {}", name);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_write_through_symlink_updates_target() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.md");
        let link = dir.path().join("link.md");
        fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        FsBackend::new().write(&link, "new").unwrap();

        assert_eq!(fs::read_to_string(&real).unwrap(), "new");
        assert!(fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("private.md");
        fs::write(&path, "secret").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        FsBackend::new().write(&path, "still secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "still secret");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("a.md");
        let err = FsBackend::new().write(&path, "x").unwrap_err();
        assert!(matches!(err, NotasError::Io(_)));
    }

    #[test]
    fn test_read_invalid_utf8_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.md");
        fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();
        assert!(FsBackend::new().read(&path).is_err());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("Notas").join("nested");
        let backend = FsBackend::new();
        backend.ensure_dir(&notes).unwrap();
        backend.ensure_dir(&notes).unwrap();
        assert!(backend.exists(&notes));
    }
}
