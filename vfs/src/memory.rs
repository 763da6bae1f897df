use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::VfsError;
use crate::provider::{VfsProvider, VfsResult};

/// Files held in memory.
///
/// Clones share storage, so a test can keep a handle and add scenes or
/// prefabs after the provider was mounted. Directories exist implicitly
/// through the files below them.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` at `path` (normalized, relative to the mount root).
    pub fn insert(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.write().insert(path.into(), data.into());
    }

    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.files.write().remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl VfsProvider for MemoryProvider {
    fn read(&self, path: &str) -> VfsResult<Vec<u8>> {
        match self.files.read().get(path) {
            Some(data) => Ok(data.clone()),
            None => Err(VfsError::NotFound(path.to_owned())),
        }
    }

    fn exists(&self, path: &str) -> VfsResult<bool> {
        Ok(self.files.read().contains_key(path))
    }

    fn list_dir(&self, dir: &str) -> VfsResult<Vec<String>> {
        let prefix = if dir.is_empty() { String::new() } else { format!("{dir}/") };
        let files = self.files.read();

        let names: BTreeSet<&str> = files
            .range(prefix.clone()..)
            .map(|(path, _)| path)
            .take_while(|path| path.starts_with(&prefix))
            .filter_map(|path| path[prefix.len()..].split('/').next())
            .filter(|name| !name.is_empty())
            .collect();
        Ok(names.into_iter().map(str::to_owned).collect())
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn write(&self, path: &str, data: Vec<u8>) -> VfsResult<()> {
        self.insert(path, data);
        Ok(())
    }

    fn delete(&self, path: &str) -> VfsResult<()> {
        match self.remove(path) {
            Some(_) => Ok(()),
            None => Err(VfsError::NotFound(path.to_owned())),
        }
    }

    fn create_dir(&self, _path: &str) -> VfsResult<()> {
        Ok(())
    }
}
