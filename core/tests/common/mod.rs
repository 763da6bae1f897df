#![allow(dead_code)]

use phaser_canvas_core::{AssetCatalog, ProjectContext};
use phaser_canvas_vfs::{MemoryProvider, Vfs};
use serde_json::{Value, json};

pub const PACK: &str = "assets/pack.json";

/// An in-memory project: one asset pack and a default memory mount.
pub struct Project {
    pub catalog: AssetCatalog,
    pub files: MemoryProvider,
    pub vfs: Vfs,
}

impl Project {
    pub fn new() -> Self {
        let mut catalog = AssetCatalog::new();
        catalog.load_pack(
            PACK,
            &json!({
                "level": [
                    {"type": "image", "key": "crate", "url": "crate.png"},
                    {"type": "image", "key": "sky", "url": "sky.png"},
                    {"type": "spritesheet", "key": "coin", "frameMax": 8},
                    {"type": "atlasJSONHash", "key": "hero"},
                    {"type": "bitmapFont", "key": "digits"},
                    {"type": "tilemap", "key": "map1"}
                ]
            }),
        );

        let files = MemoryProvider::new();
        let mut vfs = Vfs::new();
        vfs.mount("game", files.clone());
        vfs.set_default("game");

        Self {
            catalog,
            files,
            vfs,
        }
    }

    pub fn ctx(&self) -> ProjectContext<'_> {
        ProjectContext::new(&self.catalog, &self.vfs)
    }

    pub fn add_file(&self, path: &str, json: &Value) {
        self.files.insert(path, serde_json::to_vec_pretty(json).unwrap());
    }

    pub fn read_file(&self, path: &str) -> Value {
        let text = self.vfs.read_to_string(path).unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

pub fn asset_ref(asset: &str) -> Value {
    json!({"file": PACK, "section": "level", "asset": asset})
}

pub fn frame_ref(asset: &str, frame: &str) -> Value {
    json!({"file": PACK, "section": "level", "asset": asset, "sprite": frame})
}

/// A canvas document with the given world children.
pub fn document(doc_type: &str, children: Value) -> Value {
    json!({
        "canvas-version": 2,
        "settings": {},
        "world": {
            "type": "world",
            "id": "world-id",
            "info": {"editorName": "world", "children": children}
        },
        "type": doc_type
    })
}
