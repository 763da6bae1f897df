//! Scene-graph node types.
//!
//! Every node carries an [`ObjectBase`] (transform and editor metadata) and a
//! [`NodeKind`]. Nodes live in a [`World`](crate::World) and refer to each
//! other through [`NodeId`]s; the world keeps `parent` and group children
//! consistent.

mod base;
mod button;
mod group;
mod missing;
mod sprite;
mod text;
mod tile;

pub use base::{ObjectBase, tag};
pub(crate) use base::new_id;
pub use button::ButtonData;
pub use group::{GroupData, PhysicsBodyType, PhysicsSortDirection};
pub use missing::{MissingAsset, MissingPrefab};
pub(crate) use missing::describe_reference;
pub use sprite::{Animation, ArcadeBody, SpriteCommon, SpriteNode, SpriteShape};
pub use text::{BitmapTextData, FontStyle, FontWeight, TextAlign, TextData, TextStyle};
pub use tile::{TileSpriteData, TilemapData};

use serde_json::{Map, Value};

use crate::arena::NodeId;
use crate::asset::AssetHandle;
use crate::json::InfoWriter;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group(GroupData),
    Sprite(SpriteNode),
    MissingAsset(MissingAsset),
    MissingPrefab(MissingPrefab),
}

#[derive(Debug)]
pub struct Node {
    pub base: ObjectBase,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub fn group() -> Self {
        Self::with_kind("group", NodeKind::Group(GroupData::default()))
    }

    pub fn sprite(shape: SpriteShape) -> Self {
        let type_name = shape.type_name();
        Self::with_kind(type_name, NodeKind::Sprite(SpriteNode::new(shape)))
    }

    pub(crate) fn missing_asset(data: Value, reference: Value) -> Self {
        Self {
            base: placeholder_base(&data),
            kind: NodeKind::MissingAsset(MissingAsset { data, reference }),
            parent: None,
        }
    }

    pub(crate) fn missing_prefab(data: Value, path: String) -> Self {
        Self {
            base: placeholder_base(&data),
            kind: NodeKind::MissingPrefab(MissingPrefab { data, path }),
            parent: None,
        }
    }

    fn with_kind(type_name: &str, kind: NodeKind) -> Self {
        Self {
            base: ObjectBase::new(type_name),
            kind,
            parent: None,
        }
    }

    pub(crate) fn read_id(&mut self, json: &Value) {
        if let Some(id) = json.get("id").and_then(Value::as_str) {
            self.base.id = id.to_owned();
        }
    }

    /// Gives the node a fresh identity. Placeholders also carry it in the
    /// JSON they are written back with.
    pub fn reset_id(&mut self) {
        self.base.reset_id();
        let data = match &mut self.kind {
            NodeKind::MissingAsset(MissingAsset { data, .. })
            | NodeKind::MissingPrefab(MissingPrefab { data, .. }) => data,
            _ => return,
        };
        if let Some(obj) = data.as_object_mut() {
            obj.insert("id".into(), Value::from(self.base.id.as_str()));
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The `type` discriminator this node is written with.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            NodeKind::Group(_) => "group",
            NodeKind::Sprite(sprite) => sprite.shape.type_name(),
            NodeKind::MissingAsset(MissingAsset { data, .. })
            | NodeKind::MissingPrefab(MissingPrefab { data, .. }) => {
                data.get("type").and_then(Value::as_str).unwrap_or("missing")
            }
        }
    }

    /// `editorName[type]`, as shown in outlines and messages.
    pub fn label(&self) -> String {
        format!("{}[{}]", self.base.editor_name, self.type_name())
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::MissingAsset(_) | NodeKind::MissingPrefab(_)
        )
    }

    pub fn as_group(&self) -> Option<&GroupData> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupData> {
        match &mut self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_sprite(&self) -> Option<&SpriteNode> {
        match &self.kind {
            NodeKind::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    pub fn as_sprite_mut(&mut self) -> Option<&mut SpriteNode> {
        match &mut self.kind {
            NodeKind::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group(group) => group.children(),
            _ => &[],
        }
    }

    pub fn texture(&self) -> Option<&AssetHandle> {
        self.as_sprite().and_then(|sprite| sprite.shape.texture())
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        self.as_group_mut().map(|group| &mut group.children)
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        let type_name = self.type_name().to_owned();
        self.base.read_info(info, &type_name);
        match &mut self.kind {
            NodeKind::Group(group) => group.read_info(info),
            NodeKind::Sprite(sprite) => {
                sprite.common.read_info(info);
                sprite.shape.read_info(info);
            }
            _ => {}
        }
    }

    /// Writes base and kind properties. Children and assets are written by
    /// the world.
    pub(crate) fn write_info(&self, info: &mut Map<String, Value>, saving: bool) {
        let mut w = InfoWriter::new(info, &self.base, saving);
        self.base.write_info(&mut w);
        match &self.kind {
            NodeKind::Group(group) => group.write_info(&mut w),
            NodeKind::Sprite(sprite) => {
                sprite.common.write_info(&mut w);
                sprite.shape.write_info(&mut w);
            }
            _ => {}
        }
    }

    pub(crate) fn replace_shape(&mut self, shape: SpriteShape) {
        if let NodeKind::Sprite(sprite) = &mut self.kind {
            sprite.shape = shape;
        }
    }
}

// Placeholders show the name and transform stored in their data.
fn placeholder_base(data: &Value) -> ObjectBase {
    let type_name = data.get("type").and_then(Value::as_str).unwrap_or("missing");
    let mut base = ObjectBase::new(type_name);
    if let Some(info) = data.get("info").and_then(Value::as_object) {
        base.read_info(info, type_name);
    }
    if let Some(id) = data.get("id").and_then(Value::as_str) {
        base.id = id.to_owned();
    }
    base
}
