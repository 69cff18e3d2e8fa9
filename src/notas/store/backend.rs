use crate::error::Result;
use std::path::Path;

/// Raw text I/O by path.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`super::FileStore`] handles events, the notes directory and save ordering.
/// All methods take `&self`; implementations use interior mutability where
/// they need it, since the core is single-threaded.
pub trait StorageBackend {
    /// Read the whole file as UTF-8 text.
    /// Missing files and invalid UTF-8 are both errors.
    fn read(&self, path: &Path) -> Result<String>;

    /// Create or overwrite the file.
    /// MUST be atomic (e.g. write to tmp then rename): a reader never sees a partial note.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Create the directory and its parents. No-op if it already exists.
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;
}
