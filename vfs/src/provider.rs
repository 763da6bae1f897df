use crate::VfsError;

pub type VfsResult<T> = Result<T, VfsError>;

/// Storage behind one mount point.
///
/// The router hands every provider a normalized path relative to the mount
/// root: `/`-separated, without empty, `.` or `..` segments. Directories are
/// addressed by the same kind of path; the mount root itself is `""`.
///
/// Reading is mandatory. Mutating operations fail with
/// [`VfsError::ReadOnly`] unless the provider overrides them.
pub trait VfsProvider: Send + Sync + 'static {
    fn read(&self, path: &str) -> VfsResult<Vec<u8>>;

    /// `true` only for files, never for directories.
    fn exists(&self, path: &str) -> VfsResult<bool>;

    /// Names (not paths) of the entries directly inside `dir`, sorted.
    /// A missing directory has no entries.
    fn list_dir(&self, dir: &str) -> VfsResult<Vec<String>>;

    fn is_read_only(&self) -> bool {
        true
    }

    /// Creates or replaces a file, along with any missing parent directories.
    fn write(&self, _path: &str, _data: Vec<u8>) -> VfsResult<()> {
        Err(VfsError::ReadOnly)
    }

    fn delete(&self, _path: &str) -> VfsResult<()> {
        Err(VfsError::ReadOnly)
    }

    fn create_dir(&self, _path: &str) -> VfsResult<()> {
        Err(VfsError::ReadOnly)
    }
}
