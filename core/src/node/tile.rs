use serde_json::{Map, Value};

use super::base::tag;
use crate::asset::AssetHandle;
use crate::json::{InfoWriter, read_f64};

pub const DEFAULT_TILE_SIZE: f64 = 32.0;

/// A repeating texture filling a rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSpriteData {
    pub asset: AssetHandle,
    pub width: f64,
    pub height: f64,
    pub tile_position_x: f64,
    pub tile_position_y: f64,
    pub tile_scale_x: f64,
    pub tile_scale_y: f64,
}

impl TileSpriteData {
    pub fn new(asset: AssetHandle, width: f64, height: f64) -> Self {
        Self {
            asset,
            width,
            height,
            tile_position_x: 0.0,
            tile_position_y: 0.0,
            tile_scale_x: 1.0,
            tile_scale_y: 1.0,
        }
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        self.width = read_f64(info, "width", self.width);
        self.height = read_f64(info, "height", self.height);
        self.tile_position_x = read_f64(info, "tilePosition.x", 0.0);
        self.tile_position_y = read_f64(info, "tilePosition.y", 0.0);
        self.tile_scale_x = read_f64(info, "tileScale.x", 1.0);
        self.tile_scale_y = read_f64(info, "tileScale.y", 1.0);
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put_tagged(tag::SIZE, "width", self.width);
        w.put_tagged(tag::SIZE, "height", self.height);
        w.put_prop(tag::TILE_POSITION, "tilePosition.x", self.tile_position_x, 0.0);
        w.put_prop(tag::TILE_POSITION, "tilePosition.y", self.tile_position_y, 0.0);
        w.put_prop(tag::TILE_SCALE, "tileScale.x", self.tile_scale_x, 1.0);
        w.put_prop(tag::TILE_SCALE, "tileScale.y", self.tile_scale_y, 1.0);
    }
}

/// A tilemap asset with an optional tileset image.
///
/// The tileset image is written by the world, which owns the asset table.
#[derive(Debug, Clone, PartialEq)]
pub struct TilemapData {
    pub asset: AssetHandle,
    pub tile_width: f64,
    pub tile_height: f64,
    pub tileset_image: Option<AssetHandle>,
}

impl TilemapData {
    pub fn new(asset: AssetHandle) -> Self {
        Self {
            asset,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            tileset_image: None,
        }
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>) {
        self.tile_width = read_f64(info, "tileWidth", DEFAULT_TILE_SIZE);
        self.tile_height = read_f64(info, "tileHeight", DEFAULT_TILE_SIZE);
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put_prop(tag::TILESET, "tileWidth", self.tile_width, DEFAULT_TILE_SIZE);
        w.put_prop(tag::TILESET, "tileHeight", self.tile_height, DEFAULT_TILE_SIZE);
    }
}
