use std::fs;
use std::path::PathBuf;

use crate::provider::{VfsProvider, VfsResult};

/// A project content folder on disk, such as `WebContent/`.
///
/// The folder is only touched when a file is accessed, so it may be created
/// after mounting.
pub struct FileSystemProvider {
    root: PathBuf,
}

impl FileSystemProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl VfsProvider for FileSystemProvider {
    fn read(&self, path: &str) -> VfsResult<Vec<u8>> {
        Ok(fs::read(self.full_path(path))?)
    }

    fn exists(&self, path: &str) -> VfsResult<bool> {
        Ok(self.full_path(path).is_file())
    }

    fn list_dir(&self, dir: &str) -> VfsResult<Vec<String>> {
        let dir = self.full_path(dir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            match entry?.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::debug!("Skipping non UTF-8 entry {name:?} in {}", dir.display()),
            }
        }
        names.sort();
        Ok(names)
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn write(&self, path: &str, data: Vec<u8>) -> VfsResult<()> {
        let target = self.full_path(path);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        Ok(fs::write(target, data)?)
    }

    fn delete(&self, path: &str) -> VfsResult<()> {
        Ok(fs::remove_file(self.full_path(path))?)
    }

    fn create_dir(&self, path: &str) -> VfsResult<()> {
        Ok(fs::create_dir_all(self.full_path(path))?)
    }
}
