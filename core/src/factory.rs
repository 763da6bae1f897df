//! Node construction.
//!
//! Nodes are built either from an asset picked by the user or from their JSON
//! form. JSON construction reports unresolvable assets and prefabs as
//! [`BuildError::MissingAsset`] / [`BuildError::MissingPrefab`]; group readers
//! turn those into placeholder nodes so one broken object never aborts a load.

use serde_json::{Map, Value};

use crate::arena::NodeId;
use crate::asset::{AssetHandle, AssetKind};
use crate::context::ProjectContext;
use crate::error::{BuildError, CanvasError, CanvasResult, TextureError, TreeError};
use crate::node::{
    BitmapTextData, ButtonData, Node, NodeKind, SpriteShape, TextData, TileSpriteData,
    TilemapData, describe_reference, tag,
};
use crate::prefab::Prefab;
use crate::world::World;

/// Something the user can drop into a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetObject {
    Asset(AssetHandle),
    /// A plain string becomes a text object.
    Text(String),
}

/// Creates the default object for `object` as the last child of `parent`.
///
/// Returns `Ok(None)` when the asset kind has no default object.
pub fn create_from_asset(
    world: &mut World,
    parent: NodeId,
    object: AssetObject,
) -> Result<Option<NodeId>, TreeError> {
    let (shape, name) = match object {
        AssetObject::Text(text) => (SpriteShape::Text(TextData::new(text)), None),
        AssetObject::Asset(asset) => {
            let name = asset.frame().unwrap_or(&asset.key().asset).to_owned();
            match natural_shape(asset) {
                Some(shape) => (shape, Some(name)),
                None => return Ok(None),
            }
        }
    };

    let mut node = Node::sprite(shape);
    if let Some(name) = name {
        node.base.editor_name = name;
    }
    world.add_node(parent, node).map(Some)
}

/// The sprite kind an asset is shown with by default.
fn natural_shape(asset: AssetHandle) -> Option<SpriteShape> {
    let shape = match asset.kind() {
        AssetKind::Image => SpriteShape::Image(asset),
        AssetKind::Spritesheet => {
            let first = asset.key().clone().with_frame("0");
            SpriteShape::Spritesheet(AssetHandle::new(
                AssetKind::SpritesheetFrame,
                first,
                asset.revision(),
            ))
        }
        AssetKind::SpritesheetFrame => SpriteShape::Spritesheet(asset),
        AssetKind::AtlasFrame => SpriteShape::Atlas(asset),
        AssetKind::BitmapFont => SpriteShape::BitmapText(BitmapTextData::new(asset)),
        AssetKind::Atlas | AssetKind::Tilemap | AssetKind::Other => return None,
    };
    Some(shape)
}

/// Builds a node from its JSON form and appends it to `parent`.
pub fn create_from_json(
    world: &mut World,
    parent: NodeId,
    json: &Value,
    ctx: &ProjectContext<'_>,
) -> Result<NodeId, BuildError> {
    let obj = json
        .as_object()
        .ok_or_else(|| CanvasError::Malformed("object is not a JSON object".into()))?;
    let type_name = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CanvasError::Malformed("object without type".into()))?;
    let empty = Map::new();
    let info = obj.get("info").and_then(Value::as_object).unwrap_or(&empty);

    match type_name {
        "prefab" => create_prefab_instance(world, parent, json, info, ctx),
        "group" => create_group(world, parent, json, info, ctx),
        _ => {
            let shape = read_shape(world, type_name, json, info, ctx)?;
            let mut node = Node::sprite(shape);
            node.read_info(info);
            node.read_id(json);
            Ok(world.add_node(parent, node)?)
        }
    }
}

/// [`create_from_json`], with missing dependencies replaced by placeholders.
pub(crate) fn create_child(
    world: &mut World,
    parent: NodeId,
    json: &Value,
    ctx: &ProjectContext<'_>,
) -> CanvasResult<NodeId> {
    match create_from_json(world, parent, json, ctx) {
        Ok(id) => Ok(id),
        Err(BuildError::MissingAsset { data, reference }) => {
            log::warn!("Missing asset ({}), keeping a placeholder", describe_reference(&reference));
            Ok(world.add_node(parent, Node::missing_asset(data, reference))?)
        }
        Err(BuildError::MissingPrefab { data, path }) => {
            log::warn!("Missing prefab '{path}', keeping a placeholder");
            Ok(world.add_node(parent, Node::missing_prefab(data, path))?)
        }
        Err(BuildError::Canvas(e)) => Err(e),
    }
}

pub(crate) fn read_children(
    world: &mut World,
    group: NodeId,
    children: &[Value],
    ctx: &ProjectContext<'_>,
) -> CanvasResult<()> {
    for child in children {
        create_child(world, group, child, ctx)?;
    }
    Ok(())
}

fn create_group(
    world: &mut World,
    parent: NodeId,
    json: &Value,
    info: &Map<String, Value>,
    ctx: &ProjectContext<'_>,
) -> Result<NodeId, BuildError> {
    let mut node = Node::group();
    node.read_info(info);
    node.read_id(json);
    let id = world.add_node(parent, node)?;

    if let Some(children) = info.get("children").and_then(Value::as_array)
        && let Err(e) = read_children(world, id, children, ctx)
    {
        let _ = world.destroy(id);
        return Err(e.into());
    }
    Ok(id)
}

fn read_shape(
    world: &World,
    type_name: &str,
    json: &Value,
    info: &Map<String, Value>,
    ctx: &ProjectContext<'_>,
) -> Result<SpriteShape, BuildError> {
    let shape = match type_name {
        "image" => SpriteShape::Image(read_asset(world, json, ctx)?),
        "sprite" => SpriteShape::Spritesheet(read_asset(world, json, ctx)?),
        "atlas" => SpriteShape::Atlas(read_asset(world, json, ctx)?),
        "button" => SpriteShape::Button(ButtonData::new(read_asset(world, json, ctx)?)),
        "tileSprite" => {
            SpriteShape::TileSprite(TileSpriteData::new(read_asset(world, json, ctx)?, 0.0, 0.0))
        }
        "tilemap" => {
            let mut map = TilemapData::new(read_asset(world, json, ctx)?);
            map.tileset_image = read_tileset(world, json, info, ctx)?;
            SpriteShape::Tilemap(map)
        }
        "text" => SpriteShape::Text(TextData::default()),
        "bitmapText" => SpriteShape::BitmapText(BitmapTextData::new(read_asset(world, json, ctx)?)),
        other => return Err(CanvasError::UnknownType(other.to_owned()).into()),
    };
    Ok(shape)
}

/// Resolves the object's asset, from a table id (`asset`) or an inline
/// reference (`asset-ref`).
fn read_asset(
    world: &World,
    json: &Value,
    ctx: &ProjectContext<'_>,
) -> Result<AssetHandle, BuildError> {
    if let Some(id) = json.get("asset").and_then(table_id) {
        return resolve_table_id(world, &id, json);
    }
    let reference = json
        .get("asset-ref")
        .ok_or_else(|| CanvasError::Malformed("object without asset".into()))?;
    ctx.find_asset(reference)
        .ok_or_else(|| missing_asset(json, reference.clone()))
}

fn read_tileset(
    world: &World,
    json: &Value,
    info: &Map<String, Value>,
    ctx: &ProjectContext<'_>,
) -> Result<Option<AssetHandle>, BuildError> {
    match info.get("tilesetImage") {
        None | Some(Value::Null) => Ok(None),
        Some(reference @ Value::Object(_)) => ctx
            .find_asset(reference)
            .map(Some)
            .ok_or_else(|| missing_asset(json, reference.clone())),
        Some(other) => match table_id(other) {
            Some(id) => resolve_table_id(world, &id, json).map(Some),
            None => Err(CanvasError::Malformed("invalid tilesetImage".into()).into()),
        },
    }
}

fn resolve_table_id(world: &World, id: &str, json: &Value) -> Result<AssetHandle, BuildError> {
    match world.assets().entry(id) {
        Some(entry) => entry
            .asset()
            .cloned()
            .ok_or_else(|| missing_asset(json, entry.reference().clone())),
        None => Err(missing_asset(json, Value::from(id))),
    }
}

fn table_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn missing_asset(json: &Value, reference: Value) -> BuildError {
    BuildError::MissingAsset {
        data: json.clone(),
        reference,
    }
}

// The placeholder keeps the instance data with an explicit prefab path.
fn missing_prefab(json: &Value, path: &str) -> BuildError {
    let data = match json.as_object() {
        Some(obj) => Value::Object(
            obj.iter()
                .map(|(key, value)| {
                    if key == "prefab" {
                        ("prefabFile".to_owned(), Value::from(path))
                    } else {
                        (key.clone(), value.clone())
                    }
                })
                .collect(),
        ),
        None => json.clone(),
    };
    BuildError::MissingPrefab {
        data,
        path: path.to_owned(),
    }
}

fn create_prefab_instance(
    world: &mut World,
    parent: NodeId,
    json: &Value,
    info: &Map<String, Value>,
    ctx: &ProjectContext<'_>,
) -> Result<NodeId, BuildError> {
    let prefab = match json.get("prefab").and_then(table_id) {
        Some(id) => match world.prefabs().lookup(&id) {
            Some(prefab) => prefab.clone(),
            None => {
                log::warn!("Prefab table has no entry {id}");
                return Err(missing_prefab(json, &format!("<prefab {id}>")));
            }
        },
        None => match json.get("prefabFile").and_then(Value::as_str) {
            Some(path) => Prefab::new(path),
            None => {
                return Err(CanvasError::Malformed("prefab instance without prefab".into()).into());
            }
        },
    };

    if !prefab.exists(ctx) {
        return Err(missing_prefab(json, prefab.file()));
    }
    if ctx.is_expanding(prefab.file()) {
        log::warn!("Prefab {} instantiates itself", prefab.file());
        return Err(missing_prefab(json, prefab.file()));
    }

    let id = {
        let _guard = ctx.enter_prefab(prefab.file());
        let data = match prefab.instance_data(ctx, Some(info)) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("Cannot instantiate prefab {}: {e}", prefab.file());
                return Err(missing_prefab(json, prefab.file()));
            }
        };
        match create_from_json(world, parent, &data, ctx) {
            Ok(id) => id,
            Err(BuildError::MissingAsset { reference, .. }) => {
                return Err(missing_asset(json, reference));
            }
            Err(BuildError::MissingPrefab { path, .. }) => {
                return Err(missing_prefab(json, &path));
            }
            Err(e) => return Err(e),
        }
    };

    if let Some(node) = world.node_mut(id) {
        node.base.prefab = Some(prefab);
        node.read_id(json);
        if let Some(group) = node.as_group_mut() {
            group.editor_closed = true;
        }
    }

    if let Err(e) = apply_texture_override(world, id, json, ctx) {
        let _ = world.destroy(id);
        return Err(e);
    }
    Ok(id)
}

// An instance overriding its texture may also change its sprite kind.
fn apply_texture_override(
    world: &mut World,
    id: NodeId,
    json: &Value,
    ctx: &ProjectContext<'_>,
) -> Result<(), BuildError> {
    let Some(node) = world.get(id) else {
        return Ok(());
    };
    let has_asset = json.get("asset").is_some() || json.get("asset-ref").is_some();
    if !has_asset || !node.base.prefab_override.iter().any(|t| t == tag::TEXTURE) {
        return Ok(());
    }

    let asset = match read_asset(world, json, ctx) {
        Ok(asset) => asset,
        Err(BuildError::MissingAsset { reference, .. }) => return Err(missing_asset(json, reference)),
        Err(e) => return Err(e),
    };

    let Some(node) = world.get(id) else {
        return Ok(());
    };
    if node.texture().is_some_and(|current| current.same_asset(&asset)) {
        return Ok(());
    }

    let shape = match node.as_sprite().map(|sprite| &sprite.shape) {
        Some(
            current @ (SpriteShape::Image(_)
            | SpriteShape::Spritesheet(_)
            | SpriteShape::Atlas(_)
            | SpriteShape::BitmapText(_)),
        ) => retarget_shape(current, asset),
        _ => {
            log::warn!(
                "Texture override is not supported for {}; keeping the prefab texture",
                node.label()
            );
            return Ok(());
        }
    };

    match shape {
        Ok(shape) => {
            if let Some(node) = world.node_mut(id) {
                node.replace_shape(shape);
            }
        }
        Err(e) => log::warn!("Ignoring texture override: {e}"),
    }
    Ok(())
}

/// Maps `asset` to its natural sprite kind, keeping bitmap text content.
fn retarget_shape(current: &SpriteShape, asset: AssetHandle) -> Result<SpriteShape, TextureError> {
    if let (SpriteShape::BitmapText(text), AssetKind::BitmapFont) = (current, asset.kind()) {
        return Ok(SpriteShape::BitmapText(BitmapTextData {
            font: asset,
            ..text.clone()
        }));
    }
    let kind = asset.kind();
    natural_shape(asset).ok_or(TextureError::Incompatible {
        node: current.type_name(),
        asset: kind,
    })
}

/// Binds a different asset to `id`.
///
/// Images, spritesheet sprites, atlas sprites and bitmap texts switch to the
/// natural kind of the new asset. Buttons, tile sprites and tilemaps keep
/// their kind and only accept a compatible asset.
pub fn change_texture(world: &mut World, id: NodeId, asset: AssetHandle) -> Result<(), TextureError> {
    let node = world.get(id).ok_or(TextureError::UnknownNode)?;
    let sprite = match node.kind() {
        NodeKind::Sprite(sprite) => sprite,
        NodeKind::Group(_) => return Err(TextureError::NoTexture("group")),
        NodeKind::MissingAsset(_) | NodeKind::MissingPrefab(_) => {
            return Err(TextureError::NoTexture("placeholder"));
        }
    };

    let kind = asset.kind();
    let incompatible = |shape: &SpriteShape| TextureError::Incompatible {
        node: shape.type_name(),
        asset: kind,
    };

    let shape = match &sprite.shape {
        current @ (SpriteShape::Image(_)
        | SpriteShape::Spritesheet(_)
        | SpriteShape::Atlas(_)
        | SpriteShape::BitmapText(_)) => retarget_shape(current, asset)?,
        current @ SpriteShape::Button(button) => {
            if !kind.is_texture() {
                return Err(incompatible(current));
            }
            SpriteShape::Button(ButtonData {
                asset,
                ..button.clone()
            })
        }
        current @ SpriteShape::TileSprite(tile) => {
            if !kind.is_texture() {
                return Err(incompatible(current));
            }
            SpriteShape::TileSprite(TileSpriteData {
                asset,
                ..tile.clone()
            })
        }
        current @ SpriteShape::Tilemap(map) => {
            if kind != AssetKind::Tilemap {
                return Err(incompatible(current));
            }
            SpriteShape::Tilemap(TilemapData {
                asset,
                ..map.clone()
            })
        }
        SpriteShape::Text(_) => return Err(TextureError::NoTexture("text")),
    };

    if let Some(node) = world.node_mut(id) {
        node.replace_shape(shape);
    }
    Ok(())
}
