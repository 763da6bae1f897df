use std::collections::BTreeMap;

use crate::error::VfsError;
use crate::path;
use crate::provider::{VfsProvider, VfsResult};

/// Mount table for project folders.
///
/// The first segment of a path picks the mount (`"game/scenes/Level1.canvas"`).
/// When it names no mount, the whole path is looked up in the default mount,
/// so `"scenes/Level1.canvas"` works too once `"game"` is the default.
#[derive(Default)]
pub struct Vfs {
    mounts: BTreeMap<String, Box<dyn VfsProvider>>,
    default_mount: Option<String>,
}

impl Vfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `provider` as `name`, replacing a previous mount of that name.
    pub fn mount(&mut self, name: impl Into<String>, provider: impl VfsProvider) {
        let name = name.into();
        log::debug!("Mounted '{name}'");
        self.mounts.insert(name, Box::new(provider));
    }

    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default_mount = Some(name.into());
    }

    /// Mount names in sorted order.
    pub fn sources(&self) -> Vec<&str> {
        self.mounts.keys().map(String::as_str).collect()
    }

    pub fn read(&self, path: &str) -> VfsResult<Vec<u8>> {
        let (provider, path) = self.route(path)?;
        provider.read(&path)
    }

    pub fn read_to_string(&self, path: &str) -> VfsResult<String> {
        String::from_utf8(self.read(path)?)
            .map_err(|e| VfsError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Whether `path` is a file. Paths that cannot be routed are not.
    pub fn exists(&self, path: &str) -> bool {
        self.route(path)
            .and_then(|(provider, path)| provider.exists(&path))
            .unwrap_or(false)
    }

    pub fn list_dir(&self, dir: &str) -> VfsResult<Vec<String>> {
        let (provider, dir) = self.route(dir)?;
        provider.list_dir(&dir)
    }

    /// Files below `dir`, at any depth, whose extension is `extension`.
    ///
    /// Results are full project paths starting with `dir`, in sorted order.
    pub fn find_files(&self, dir: &str, extension: &str) -> VfsResult<Vec<String>> {
        let dir = path::normalize(dir)?;
        let (provider, root) = self.route(&dir)?;

        let mut found = Vec::new();
        let mut pending = vec![root.clone()];
        while let Some(current) = pending.pop() {
            for name in provider.list_dir(&current)? {
                let child = path::join(&current, &name);
                if !provider.exists(&child)? {
                    pending.push(child);
                } else if path::extension(&name) == Some(extension) {
                    let below = child.get(root.len()..).unwrap_or_default();
                    found.push(path::join(&dir, below.trim_start_matches('/')));
                }
            }
        }
        found.sort();
        Ok(found)
    }

    pub fn write(&self, path: &str, data: Vec<u8>) -> VfsResult<()> {
        let (provider, path) = self.route(path)?;
        provider.write(&path, data)
    }

    pub fn delete(&self, path: &str) -> VfsResult<()> {
        let (provider, path) = self.route(path)?;
        provider.delete(&path)
    }

    pub fn create_dir(&self, dir: &str) -> VfsResult<()> {
        let (provider, dir) = self.route(dir)?;
        provider.create_dir(&dir)
    }

    pub fn is_read_only(&self, path: &str) -> VfsResult<bool> {
        Ok(self.route(path)?.0.is_read_only())
    }

    /// Picks the provider for `path` and the path inside it.
    fn route(&self, path: &str) -> VfsResult<(&dyn VfsProvider, String)> {
        let normalized = path::normalize(path)?;
        let (first, rest) = path::split_source(&normalized);

        if let Some(provider) = self.mounts.get(first) {
            return Ok((provider.as_ref(), rest.to_owned()));
        }
        match self.default_mount.as_deref().and_then(|name| self.mounts.get(name)) {
            Some(provider) => Ok((provider.as_ref(), normalized)),
            None => Err(VfsError::NoSuchSource(first.to_owned())),
        }
    }
}
