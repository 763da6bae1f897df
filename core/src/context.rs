//! The project context threaded through read, write and build calls.

use std::cell::RefCell;

use phaser_canvas_vfs::Vfs;
use serde_json::Value;

use crate::asset::{AssetHandle, AssetResolver};

/// Collaborators a canvas document needs from its project.
///
/// Besides the asset resolver and the file system, the context remembers
/// which prefab files are being expanded so that self-instantiating prefabs
/// are detected instead of recursing forever.
pub struct ProjectContext<'a> {
    resolver: &'a dyn AssetResolver,
    vfs: &'a Vfs,
    expanding: RefCell<Vec<String>>,
}

impl<'a> ProjectContext<'a> {
    pub fn new(resolver: &'a dyn AssetResolver, vfs: &'a Vfs) -> Self {
        Self {
            resolver,
            vfs,
            expanding: RefCell::new(Vec::new()),
        }
    }

    pub fn resolver(&self) -> &'a dyn AssetResolver {
        self.resolver
    }

    pub fn vfs(&self) -> &'a Vfs {
        self.vfs
    }

    pub fn find_asset(&self, reference: &Value) -> Option<AssetHandle> {
        self.resolver.find_asset_element(reference)
    }

    pub fn asset_reference(&self, asset: &AssetHandle) -> Value {
        self.resolver.asset_json_reference(asset)
    }

    /// Whether `file` is currently being expanded further up the stack.
    pub fn is_expanding(&self, file: &str) -> bool {
        self.expanding.borrow().iter().any(|f| f == file)
    }

    /// Marks `file` as being expanded until the guard drops.
    pub(crate) fn enter_prefab(&self, file: &str) -> PrefabGuard<'_, 'a> {
        self.expanding.borrow_mut().push(file.to_owned());
        PrefabGuard { ctx: self }
    }
}

pub(crate) struct PrefabGuard<'c, 'a> {
    ctx: &'c ProjectContext<'a>,
}

impl Drop for PrefabGuard<'_, '_> {
    fn drop(&mut self) {
        self.ctx.expanding.borrow_mut().pop();
    }
}
