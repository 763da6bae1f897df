//! The scene tree.
//!
//! [`World`] owns every node of a document in a generational arena, the
//! document's asset and prefab tables, and the dirty flag. All mutation goes
//! through the world: [`node_mut`](World::node_mut) and every structural edit
//! mark the document dirty.

use serde_json::{Map, Value};

use crate::arena::{NodeArena, NodeId};
use crate::asset_table::AssetTable;
use crate::context::ProjectContext;
use crate::error::{BuildError, CanvasError, CanvasResult, TreeError};
use crate::factory;
use crate::node::{Node, NodeKind, SpriteShape, describe_reference, tag};
use crate::prefab::Prefab;
use crate::prefab_table::PrefabTable;

/// Outcome of [`World::build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Objects whose asset disappeared and became placeholders.
    pub lost: usize,
    /// Placeholders rebuilt because their dependency is back.
    pub repaired: usize,
}

pub struct World {
    nodes: NodeArena,
    root: NodeId,
    assets: AssetTable,
    prefabs: PrefabTable,
    dirty: bool,
}

impl World {
    pub fn new() -> Self {
        let mut nodes = NodeArena::new();
        let mut root = Node::group();
        root.base.editor_name = "world".to_owned();
        let root = nodes.insert(root);
        Self {
            nodes,
            root,
            assets: AssetTable::new(),
            prefabs: PrefabTable::new(),
            dirty: false,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the root and detached nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node. Marks the document dirty.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let node = self.nodes.get_mut(id)?;
        self.dirty = true;
        Some(node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(Node::parent)
    }

    /// Children of a group; empty for other nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetTable {
        &mut self.assets
    }

    pub fn prefabs(&self) -> &PrefabTable {
        &self.prefabs
    }

    pub fn prefabs_mut(&mut self) -> &mut PrefabTable {
        &mut self.prefabs
    }

    // -----------------------------------------------------------------------
    // Hierarchy
    // -----------------------------------------------------------------------

    /// Adds a new node as the last child of `parent`.
    pub fn add_node(&mut self, parent: NodeId, node: Node) -> Result<NodeId, TreeError> {
        self.insert_node(parent, usize::MAX, node)
    }

    /// Adds a new node at `index` (clamped) among the children of `parent`.
    pub fn insert_node(
        &mut self,
        parent: NodeId,
        index: usize,
        mut node: Node,
    ) -> Result<NodeId, TreeError> {
        self.check_group(parent)?;
        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        let children = self
            .nodes
            .get_mut(parent)
            .and_then(Node::children_mut)
            .ok_or(TreeError::NotAGroup)?;
        children.insert(index.min(children.len()), id);
        self.dirty = true;
        Ok(id)
    }

    /// Moves `node` into `group` at `index` (clamped).
    ///
    /// The node is first removed from its current parent, so this is also
    /// how nodes are reordered and reparented.
    pub fn add_child(&mut self, group: NodeId, index: usize, node: NodeId) -> Result<(), TreeError> {
        if node == self.root {
            return Err(TreeError::RootNode);
        }
        if !self.nodes.contains(node) {
            return Err(TreeError::UnknownNode);
        }
        self.check_group(group)?;
        if self.is_ancestor_or_self(node, group) {
            return Err(TreeError::WouldCycle);
        }

        self.detach(node);
        let children = self
            .nodes
            .get_mut(group)
            .and_then(Node::children_mut)
            .ok_or(TreeError::NotAGroup)?;
        children.insert(index.min(children.len()), node);
        if let Some(moved) = self.nodes.get_mut(node) {
            moved.parent = Some(group);
        }
        self.dirty = true;
        Ok(())
    }

    pub fn append_child(&mut self, group: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.add_child(group, usize::MAX, node)
    }

    /// Removes `node` from `group`'s children. The node keeps its own
    /// children and stays alive, detached, until re-added or destroyed.
    ///
    /// Returns `false` if `node` was not a child of `group`.
    pub fn remove_child(&mut self, group: NodeId, node: NodeId) -> Result<bool, TreeError> {
        self.check_group(group)?;
        if self.parent(node) != Some(group) {
            return Ok(false);
        }
        self.detach(node);
        self.dirty = true;
        Ok(true)
    }

    /// Detaches and frees `id` and its whole subtree.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootNode);
        }
        if !self.nodes.contains(id) {
            return Err(TreeError::UnknownNode);
        }
        self.detach(id);
        for node in self.descendants(id) {
            self.nodes.remove(node);
        }
        self.dirty = true;
        Ok(())
    }

    fn check_group(&self, id: NodeId) -> Result<(), TreeError> {
        match self.nodes.get(id) {
            None => Err(TreeError::UnknownNode),
            Some(node) if !node.is_group() => Err(TreeError::NotAGroup),
            Some(_) => Ok(()),
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(children) = self.nodes.get_mut(parent).and_then(Node::children_mut) {
            children.retain(|&child| child != node);
        }
        if let Some(node) = self.nodes.get_mut(node) {
            node.parent = None;
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Visits `from` and its descendants, parents before children.
    pub fn walk<'w>(&'w self, from: NodeId, mut visit: impl FnMut(NodeId, &'w Node)) {
        self.walk_while(from, |id, node| {
            visit(id, node);
            true
        });
    }

    /// Like [`walk`](Self::walk), but stops as soon as `visit` returns
    /// `false`. Returns `false` if the walk was stopped.
    pub fn walk_while<'w>(
        &'w self,
        from: NodeId,
        mut visit: impl FnMut(NodeId, &'w Node) -> bool,
    ) -> bool {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !visit(id, node) {
                return false;
            }
            stack.extend(node.children().iter().rev().copied());
        }
        true
    }

    /// `from` and its descendants in walk order.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk(from, |id, _| ids.push(id));
        ids
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_by_name_in(self.root, name)
    }

    /// First node named `name` in walk order; a group matches before its
    /// children are searched.
    pub fn find_by_name_in(&self, from: NodeId, name: &str) -> Option<NodeId> {
        self.find(from, |node| node.base.editor_name == name)
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.find(self.root, |node| node.base.id == id)
    }

    fn find(&self, from: NodeId, mut pred: impl FnMut(&Node) -> bool) -> Option<NodeId> {
        let mut found = None;
        self.walk_while(from, |id, node| {
            if pred(node) {
                found = Some(id);
                false
            } else {
                true
            }
        });
        found
    }

    // -----------------------------------------------------------------------
    // Derived properties
    // -----------------------------------------------------------------------

    /// Number of ancestors; the root has depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Sum of angles in degrees along the parent chain, root excluded.
    pub fn global_angle(&self, id: NodeId) -> f64 {
        self.fold_ancestors(id, 0.0, |angle, node| angle + node.base.angle())
    }

    /// Product of scales along the parent chain, root excluded.
    pub fn global_scale(&self, id: NodeId) -> (f64, f64) {
        self.fold_ancestors(id, (1.0, 1.0), |(sx, sy), node| {
            (sx * node.base.scale_x, sy * node.base.scale_y)
        })
    }

    fn fold_ancestors<T>(&self, id: NodeId, init: T, mut f: impl FnMut(T, &Node) -> T) -> T {
        let mut acc = init;
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == self.root {
                break;
            }
            let Some(node) = self.nodes.get(node_id) else {
                break;
            };
            acc = f(acc, node);
            current = node.parent();
        }
        acc
    }

    /// Whether some ancestor of `id` is a prefab instance.
    pub fn is_prefab_instance_component(&self, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            match self.nodes.get(parent) {
                Some(node) if node.base.is_prefab_instance() => return true,
                Some(node) => current = node.parent(),
                None => break,
            }
        }
        false
    }

    pub fn label(&self, id: NodeId) -> Option<String> {
        self.nodes.get(id).map(Node::label)
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Shifts the direct children of `group` so the smallest x and y are 0.
    pub fn trim(&mut self, group: NodeId) -> Result<(), TreeError> {
        self.check_group(group)?;
        let children = self.children(group).to_vec();

        let (min_x, min_y) = children
            .iter()
            .filter_map(|&child| self.nodes.get(child))
            .fold((f64::INFINITY, f64::INFINITY), |(x, y), node| {
                (x.min(node.base.x), y.min(node.base.y))
            });
        if !min_x.is_finite() || !min_y.is_finite() {
            return Ok(());
        }

        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.base.x -= min_x;
                node.base.y -= min_y;
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Gives `id` and all its descendants fresh identities.
    pub fn reset_id(&mut self, id: NodeId) {
        for node in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(node) {
                node.reset_id();
            }
        }
        self.dirty = true;
    }

    /// Duplicates `id` through its JSON snapshot and appends the copy to the
    /// same parent.
    pub fn copy(
        &mut self,
        id: NodeId,
        keep_id: bool,
        ctx: &ProjectContext<'_>,
    ) -> CanvasResult<NodeId> {
        if id == self.root {
            return Err(TreeError::RootNode.into());
        }
        let parent = self.parent(id).ok_or(TreeError::UnknownNode)?;
        let data = self.to_json(id, false, ctx).ok_or(TreeError::UnknownNode)?;
        let copy = factory::create_child(self, parent, &data, ctx)?;
        if !keep_id {
            self.reset_id(copy);
        }
        Ok(copy)
    }

    /// Re-resolves every asset binding after an asset-pack change.
    ///
    /// Objects whose asset is gone become missing-asset placeholders;
    /// placeholders whose dependency is back are rebuilt in place.
    pub fn build(&mut self, ctx: &ProjectContext<'_>) -> BuildSummary {
        self.assets.refresh(ctx.resolver());

        let mut summary = BuildSummary::default();
        for id in self.descendants(self.root) {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.is_placeholder() {
                if self.repair(id, ctx) {
                    summary.repaired += 1;
                }
            } else if let Some(reference) = self.rebind_assets(id, ctx) {
                self.lose_asset(id, reference, ctx);
                summary.lost += 1;
            }
        }

        if summary != BuildSummary::default() {
            log::info!(
                "Build: {} objects lost their asset, {} restored",
                summary.lost,
                summary.repaired
            );
        }
        summary
    }

    // Returns the reference of the first asset that no longer resolves.
    fn rebind_assets(&mut self, id: NodeId, ctx: &ProjectContext<'_>) -> Option<Value> {
        let sprite = self.nodes.get_mut(id)?.as_sprite_mut()?;

        if let Some(asset) = sprite.shape.texture_mut() {
            let reference = ctx.asset_reference(asset);
            match ctx.find_asset(&reference) {
                Some(fresh) => *asset = fresh,
                None => return Some(reference),
            }
        }

        if let SpriteShape::Tilemap(map) = &mut sprite.shape
            && let Some(image) = &mut map.tileset_image
        {
            let reference = ctx.asset_reference(image);
            match ctx.find_asset(&reference) {
                Some(fresh) => *image = fresh,
                None => return Some(reference),
            }
        }

        None
    }

    fn lose_asset(&mut self, id: NodeId, reference: Value, ctx: &ProjectContext<'_>) {
        let Some(data) = self.to_json(id, false, ctx) else {
            return;
        };
        if let Some(label) = self.label(id) {
            log::warn!("Asset of {label} is gone ({})", describe_reference(&reference));
        }
        self.replace_node(id, Node::missing_asset(data, reference));
    }

    fn repair(&mut self, id: NodeId, ctx: &ProjectContext<'_>) -> bool {
        let data = match self.nodes.get(id).map(Node::kind) {
            Some(NodeKind::MissingAsset(missing)) => missing.data.clone(),
            Some(NodeKind::MissingPrefab(missing)) => missing.data.clone(),
            _ => return false,
        };
        let (Some(parent), Some(index)) = (self.parent(id), self.index_in_parent(id)) else {
            return false;
        };

        match factory::create_from_json(self, parent, &data, ctx) {
            Ok(rebuilt) => {
                if self.add_child(parent, index, rebuilt).is_err() || self.destroy(id).is_err() {
                    return false;
                }
                if let Some(label) = self.label(rebuilt) {
                    log::info!("Restored {label}");
                }
                true
            }
            Err(BuildError::Canvas(e)) => {
                log::warn!("Cannot rebuild placeholder: {e}");
                false
            }
            Err(_) => false,
        }
    }

    fn replace_node(&mut self, old: NodeId, node: Node) -> Option<NodeId> {
        let parent = self.parent(old)?;
        let index = self.index_in_parent(old)?;
        let new = self.insert_node(parent, index, node).ok()?;
        self.destroy(old).ok()?;
        Some(new)
    }

    // -----------------------------------------------------------------------
    // JSON
    // -----------------------------------------------------------------------

    /// Writes `id` and its subtree.
    ///
    /// Saving uses the asset and prefab tables and drops the children of
    /// prefab instances; the snapshot form inlines every reference.
    pub fn to_json(&mut self, id: NodeId, saving: bool, ctx: &ProjectContext<'_>) -> Option<Value> {
        let (mut obj, mut info, children, minimise) = {
            let node = self.nodes.get(id)?;
            match node.kind() {
                NodeKind::MissingAsset(missing) => {
                    return Some(self.placeholder_json(&missing.data, saving));
                }
                NodeKind::MissingPrefab(missing) => return Some(missing.data.clone()),
                _ => {}
            }

            let mut obj = Map::new();
            match &node.base.prefab {
                Some(prefab) => {
                    obj.insert("type".into(), "prefab".into());
                    if saving {
                        obj.insert("prefab".into(), self.prefabs.post_prefab(prefab).into());
                    } else {
                        obj.insert("prefabFile".into(), prefab.file().into());
                    }
                }
                None => {
                    let type_name = if id == self.root { "world" } else { node.type_name() };
                    obj.insert("type".into(), type_name.into());
                }
            }
            obj.insert("id".into(), node.base.id.as_str().into());

            if let Some(asset) = node.texture()
                && node.base.is_overriding(tag::TEXTURE)
            {
                if saving {
                    obj.insert("asset".into(), self.assets.post_asset(asset, ctx.resolver()).into());
                } else {
                    obj.insert("asset-ref".into(), ctx.asset_reference(asset));
                }
            }

            let mut info = Map::new();
            node.write_info(&mut info, saving);

            if let Some(SpriteShape::Tilemap(map)) = node.as_sprite().map(|sprite| &sprite.shape)
                && let Some(image) = &map.tileset_image
                && node.base.is_overriding(tag::TILESET)
            {
                let value: Value = if saving {
                    self.assets.post_asset(image, ctx.resolver()).into()
                } else {
                    ctx.asset_reference(image)
                };
                info.insert("tilesetImage".into(), value);
            }

            let instance = node.base.is_prefab_instance();
            let children = (node.is_group() && !(saving && instance)).then(|| node.children().to_vec());
            let minimise = if saving { node.base.prefab.clone() } else { None };
            (obj, info, children, minimise)
        };

        if let Some(children) = children {
            let children: Vec<Value> = children
                .into_iter()
                .filter_map(|child| self.to_json(child, saving, ctx))
                .collect();
            info.insert("children".into(), Value::Array(children));
        }

        if let Some(prefab) = minimise {
            remove_prefab_defaults(&mut info, &prefab, ctx);
        }

        obj.insert("info".into(), Value::Object(info));
        Some(Value::Object(obj))
    }

    // Snapshots cannot rely on this document's asset table.
    fn placeholder_json(&self, data: &Value, saving: bool) -> Value {
        if saving {
            return data.clone();
        }
        let Some(obj) = data.as_object() else {
            return data.clone();
        };
        let Some(reference) = obj
            .get("asset")
            .and_then(Value::as_str)
            .and_then(|id| self.assets.entry(id))
            .map(|entry| entry.reference().clone())
        else {
            return data.clone();
        };

        let rebuilt: Map<String, Value> = obj
            .iter()
            .map(|(key, value)| {
                if key == "asset" {
                    ("asset-ref".to_owned(), reference.clone())
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect();
        Value::Object(rebuilt)
    }

    /// Reads the `world` section into this (empty) world.
    pub(crate) fn read(&mut self, json: &Value, ctx: &ProjectContext<'_>) -> CanvasResult<()> {
        if !json.is_object() {
            return Err(CanvasError::MissingSection("world"));
        }
        let empty = Map::new();
        let info = json.get("info").and_then(Value::as_object).unwrap_or(&empty);

        let root = self.root;
        if let Some(node) = self.nodes.get_mut(root) {
            node.read_info(info);
            node.read_id(json);
        }

        if let Some(children) = info.get("children").and_then(Value::as_array) {
            factory::read_children(self, root, children, ctx)?;
        }

        self.dirty = false;
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// Drops instance info equal to the prefab's own defaults.
fn remove_prefab_defaults(info: &mut Map<String, Value>, prefab: &Prefab, ctx: &ProjectContext<'_>) {
    if !prefab.exists(ctx) || ctx.is_expanding(prefab.file()) {
        return;
    }
    let defaults = match prefab.new_instance(ctx, None) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("Keeping full info of {} instance: {e}", prefab.file());
            return;
        }
    };
    let Some(defaults) = defaults.get("info").and_then(Value::as_object) else {
        return;
    };
    info.retain(|key, value| {
        matches!(key.as_str(), "editorName" | "x" | "y") || defaults.get(key) != Some(value)
    });
}
