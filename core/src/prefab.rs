//! Prefabs: canvas files used as reusable templates.
//!
//! Instantiating a prefab loads its file into a throwaway document, picks the
//! object to instantiate, overlays the instance's own info, gives it a fresh
//! id and returns the inline JSON snapshot of that subtree. The snapshot is
//! then built like any other scene object.

use phaser_canvas_vfs::path::file_stem;
use serde_json::{Map, Value};

use crate::context::ProjectContext;
use crate::document::{CanvasModel, CanvasType};
use crate::error::{CanvasError, CanvasResult};
use crate::node::{Node, new_id};

/// A prefab, identified by its project-relative file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefab {
    file: String,
}

impl Prefab {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// The file name without extension.
    pub fn class_name(&self) -> &str {
        file_stem(&self.file)
    }

    pub fn exists(&self, ctx: &ProjectContext<'_>) -> bool {
        ctx.vfs().exists(&self.file)
    }

    /// Builds the instance data of this prefab.
    ///
    /// `info` overrides the root object's info keys. Fails with
    /// [`CanvasError::PrefabCycle`] when called while this prefab is already
    /// being expanded.
    pub fn new_instance(
        &self,
        ctx: &ProjectContext<'_>,
        info: Option<&Map<String, Value>>,
    ) -> CanvasResult<Value> {
        if ctx.is_expanding(&self.file) {
            return Err(CanvasError::PrefabCycle(self.file.clone()));
        }
        let _guard = ctx.enter_prefab(&self.file);
        self.instance_data(ctx, info)
    }

    /// [`new_instance`](Self::new_instance) without the cycle guard; the
    /// caller holds it.
    pub(crate) fn instance_data(
        &self,
        ctx: &ProjectContext<'_>,
        info: Option<&Map<String, Value>>,
    ) -> CanvasResult<Value> {
        log::debug!("Instantiating prefab {}", self.file);

        let text = ctx.vfs().read_to_string(&self.file)?;
        let json: Value = serde_json::from_str(&text)?;
        let mut model = CanvasModel::from_json(&json, ctx)?;
        let doc_type = model.doc_type();
        let world = model.world_mut();
        let world_root = world.root();

        let root = match doc_type {
            CanvasType::Sprite => world
                .children(world_root)
                .first()
                .copied()
                .ok_or_else(|| CanvasError::EmptyPrefab(self.file.clone()))?,
            CanvasType::Group | CanvasType::State => {
                let mut group = Node::group();
                group.base.editor_name = self.class_name().to_owned();
                let group = world.add_node(world_root, group)?;
                let children: Vec<_> = world
                    .children(world_root)
                    .iter()
                    .copied()
                    .filter(|&child| child != group)
                    .collect();
                for child in children {
                    world.append_child(group, child)?;
                }
                group
            }
        };

        if let Some(overrides) = info {
            let mut merged = world
                .to_json(root, false, ctx)
                .and_then(|mut data| match data.get_mut("info").map(Value::take) {
                    Some(Value::Object(info)) => Some(info),
                    _ => None,
                })
                .unwrap_or_default();
            for (key, value) in overrides {
                if key != "children" {
                    merged.insert(key.clone(), value.clone());
                }
            }
            if let Some(node) = world.node_mut(root) {
                node.read_info(&merged);
            }
        }

        if let Some(node) = world.node_mut(root) {
            node.base.id = new_id();
        }

        world
            .to_json(root, false, ctx)
            .ok_or_else(|| CanvasError::EmptyPrefab(self.file.clone()))
    }
}
