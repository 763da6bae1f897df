use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::base::tag;
use super::button::ButtonData;
use super::text::{BitmapTextData, TextData};
use super::tile::{TileSpriteData, TilemapData};
use crate::asset::AssetHandle;
use crate::json::{InfoWriter, read_f64, read_opt_string};

/// A named frame sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub name: String,
    #[serde(default, deserialize_with = "frame_names")]
    pub frames: Vec<String>,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub kill_on_complete: bool,
}

impl Animation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
            frame_rate: default_frame_rate(),
            looping: false,
            kill_on_complete: false,
        }
    }
}

fn default_frame_rate() -> u32 {
    60
}

// Spritesheet frames are indices, atlas frames are names.
fn frame_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Frame {
        Name(String),
        Index(i64),
    }

    let frames = Vec::<Frame>::deserialize(deserializer)?;
    Ok(frames
        .into_iter()
        .map(|frame| match frame {
            Frame::Name(name) => name,
            Frame::Index(index) => index.to_string(),
        })
        .collect())
}

/// Arcade physics body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArcadeBody {
    Rect {
        #[serde(rename = "offset.x", default)]
        offset_x: f64,
        #[serde(rename = "offset.y", default)]
        offset_y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        #[serde(rename = "offset.x", default)]
        offset_x: f64,
        #[serde(rename = "offset.y", default)]
        offset_y: f64,
        radius: f64,
    },
}

/// Properties common to every non-group node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteCommon {
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub tint: Option<String>,
    pub data: Option<String>,
    pub animations: Vec<Animation>,
    pub body: Option<ArcadeBody>,
}

impl SpriteCommon {
    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        self.anchor_x = read_f64(info, "anchor.x", 0.0);
        self.anchor_y = read_f64(info, "anchor.y", 0.0);
        self.tint = read_opt_string(info, "tint");
        self.data = read_opt_string(info, "data");

        self.animations = match info.get("animations") {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed animations: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };

        self.body = match info.get("body") {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| log::warn!("Ignoring malformed physics body: {e}"))
                .ok(),
            None => None,
        };
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put_prop(tag::ANCHOR, "anchor.x", self.anchor_x, 0.0);
        w.put_prop(tag::ANCHOR, "anchor.y", self.anchor_y, 0.0);
        w.put_opt(tag::TINT, "tint", self.tint.as_deref());
        w.put_opt(tag::DATA, "data", self.data.as_deref());

        if !self.animations.is_empty() && w.is_overriding(tag::ANIMATIONS) {
            match serde_json::to_value(&self.animations) {
                Ok(value) => w.put("animations", value),
                Err(e) => log::error!("Cannot write animations: {e}"),
            }
        }

        if let Some(body) = &self.body
            && w.is_overriding(tag::PHYSICS)
        {
            match serde_json::to_value(body) {
                Ok(value) => w.put("body", value),
                Err(e) => log::error!("Cannot write physics body: {e}"),
            }
        }
    }
}

/// The concrete shape of a non-group node.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteShape {
    Image(AssetHandle),
    /// Bound to a spritesheet frame.
    Spritesheet(AssetHandle),
    /// Bound to an atlas frame.
    Atlas(AssetHandle),
    Button(ButtonData),
    TileSprite(TileSpriteData),
    Tilemap(TilemapData),
    Text(TextData),
    BitmapText(BitmapTextData),
}

impl SpriteShape {
    pub fn type_name(&self) -> &'static str {
        match self {
            SpriteShape::Image(_) => "image",
            SpriteShape::Spritesheet(_) => "sprite",
            SpriteShape::Atlas(_) => "atlas",
            SpriteShape::Button(_) => "button",
            SpriteShape::TileSprite(_) => "tileSprite",
            SpriteShape::Tilemap(_) => "tilemap",
            SpriteShape::Text(_) => "text",
            SpriteShape::BitmapText(_) => "bitmapText",
        }
    }

    /// The asset this shape is drawn from, if any.
    pub fn texture(&self) -> Option<&AssetHandle> {
        match self {
            SpriteShape::Image(asset)
            | SpriteShape::Spritesheet(asset)
            | SpriteShape::Atlas(asset) => Some(asset),
            SpriteShape::Button(button) => Some(&button.asset),
            SpriteShape::TileSprite(tile) => Some(&tile.asset),
            SpriteShape::Tilemap(map) => Some(&map.asset),
            SpriteShape::BitmapText(text) => Some(&text.font),
            SpriteShape::Text(_) => None,
        }
    }

    pub fn texture_mut(&mut self) -> Option<&mut AssetHandle> {
        match self {
            SpriteShape::Image(asset)
            | SpriteShape::Spritesheet(asset)
            | SpriteShape::Atlas(asset) => Some(asset),
            SpriteShape::Button(button) => Some(&mut button.asset),
            SpriteShape::TileSprite(tile) => Some(&mut tile.asset),
            SpriteShape::Tilemap(map) => Some(&mut map.asset),
            SpriteShape::BitmapText(text) => Some(&mut text.font),
            SpriteShape::Text(_) => None,
        }
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        match self {
            SpriteShape::Image(_) | SpriteShape::Spritesheet(_) | SpriteShape::Atlas(_) => {}
            SpriteShape::Button(button) => button.read_info(info),
            SpriteShape::TileSprite(tile) => tile.read_info(info),
            SpriteShape::Tilemap(map) => map.read_info(info),
            SpriteShape::Text(text) => text.read_info(info),
            SpriteShape::BitmapText(text) => text.read_info(info),
        }
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        match self {
            SpriteShape::Image(_) | SpriteShape::Spritesheet(_) | SpriteShape::Atlas(_) => {}
            SpriteShape::Button(button) => button.write_info(w),
            SpriteShape::TileSprite(tile) => tile.write_info(w),
            SpriteShape::Tilemap(map) => map.write_info(w),
            SpriteShape::Text(text) => text.write_info(w),
            SpriteShape::BitmapText(text) => text.write_info(w),
        }
    }
}

/// A non-group node: common sprite properties plus its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteNode {
    pub common: SpriteCommon,
    pub shape: SpriteShape,
}

impl SpriteNode {
    pub fn new(shape: SpriteShape) -> Self {
        Self {
            common: SpriteCommon::default(),
            shape,
        }
    }
}
