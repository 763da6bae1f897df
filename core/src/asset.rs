//! Asset references and the resolver seam.
//!
//! The asset-pack subsystem is external to the canvas model. The model only
//! sees [`AssetHandle`]s produced by an [`AssetResolver`] from JSON references
//! of the form
//!
//! ```json
//! { "file": "assets/pack.json", "section": "level", "asset": "hero", "sprite": "walk01" }
//! ```
//!
//! [`AssetCatalog`] is an in-memory resolver fed from registrations or from
//! Phaser asset-pack files.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

/// The kind of element an asset reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Image,
    Spritesheet,
    SpritesheetFrame,
    Atlas,
    AtlasFrame,
    BitmapFont,
    Tilemap,
    Other,
}

impl AssetKind {
    /// Maps a Phaser asset-pack entry type to a kind.
    pub fn from_pack_type(pack_type: &str) -> Option<Self> {
        match pack_type {
            "image" => Some(AssetKind::Image),
            "spritesheet" => Some(AssetKind::Spritesheet),
            "atlas" | "atlasJSONArray" | "atlasJSONHash" | "atlasXML" => Some(AssetKind::Atlas),
            "bitmapFont" => Some(AssetKind::BitmapFont),
            "tilemap" => Some(AssetKind::Tilemap),
            _ => None,
        }
    }

    /// Whether a sprite can show this asset as its texture.
    pub fn is_texture(self) -> bool {
        matches!(
            self,
            AssetKind::Image
                | AssetKind::Spritesheet
                | AssetKind::SpritesheetFrame
                | AssetKind::AtlasFrame
        )
    }
}

/// Canonical identity of an asset element.
///
/// This is the "shared version" of a reference: two handles pointing at the
/// same pack entry compare equal here even when they are distinct instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub file: String,
    pub section: String,
    pub asset: String,
    pub frame: Option<String>,
}

impl AssetKey {
    pub fn new(
        file: impl Into<String>,
        section: impl Into<String>,
        asset: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            section: section.into(),
            asset: asset.into(),
            frame: None,
        }
    }

    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.frame = Some(frame.into());
        self
    }

    /// The same key without its frame part.
    pub fn without_frame(&self) -> Self {
        Self {
            frame: None,
            ..self.clone()
        }
    }

    /// Parses a JSON asset reference. Numeric frames are accepted.
    pub fn from_reference(reference: &Value) -> Option<Self> {
        let obj = reference.as_object()?;
        let field = |name: &str| obj.get(name).and_then(Value::as_str).map(str::to_owned);
        let frame = match obj.get("sprite") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Some(Self {
            file: field("file")?,
            section: field("section")?,
            asset: field("asset")?,
            frame,
        })
    }

    pub fn to_reference(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("file".into(), Value::from(self.file.as_str()));
        obj.insert("section".into(), Value::from(self.section.as_str()));
        obj.insert("asset".into(), Value::from(self.asset.as_str()));
        if let Some(frame) = &self.frame {
            obj.insert("sprite".into(), Value::from(frame.as_str()));
        }
        Value::Object(obj)
    }
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "section={} key={}", self.section, self.asset)?;
        if let Some(frame) = &self.frame {
            write!(f, " frame={frame}")?;
        }
        Ok(())
    }
}

/// A resolved asset element.
///
/// `revision` distinguishes transient instances handed out by the resolver;
/// identity checks go through [`shared_version`](Self::shared_version).
#[derive(Debug, Clone, PartialEq)]
pub struct AssetHandle {
    kind: AssetKind,
    key: AssetKey,
    revision: u64,
}

impl AssetHandle {
    pub fn new(kind: AssetKind, key: AssetKey, revision: u64) -> Self {
        Self {
            kind,
            key,
            revision,
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn frame(&self) -> Option<&str> {
        self.key.frame.as_deref()
    }

    pub fn shared_version(&self) -> &AssetKey {
        &self.key
    }

    pub fn same_asset(&self, other: &AssetHandle) -> bool {
        self.shared_version() == other.shared_version()
    }
}

/// Resolves JSON asset references to handles and back.
pub trait AssetResolver {
    /// Returns `None` when the referenced element does not exist.
    fn find_asset_element(&self, reference: &Value) -> Option<AssetHandle>;

    fn asset_json_reference(&self, asset: &AssetHandle) -> Value {
        asset.key().to_reference()
    }
}

/// In-memory [`AssetResolver`].
///
/// Frame references under a registered atlas or spritesheet resolve to frame
/// handles; when frame names were registered for that asset, only those
/// names resolve.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    assets: HashMap<AssetKey, AssetKind>,
    frames: HashMap<AssetKey, Vec<String>>,
    revision: AtomicU64,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: AssetKey, kind: AssetKind) {
        self.assets.insert(key, kind);
    }

    /// Restricts the frames that resolve under `key`.
    pub fn register_frames<I, S>(&mut self, key: AssetKey, frames: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frames
            .insert(key.without_frame(), frames.into_iter().map(Into::into).collect());
    }

    pub fn unregister(&mut self, key: &AssetKey) -> Option<AssetKind> {
        self.frames.remove(key);
        self.assets.remove(key)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Registers every recognised entry of a Phaser asset-pack file.
    ///
    /// Returns the number of registered assets.
    pub fn load_pack(&mut self, file: &str, pack: &Value) -> usize {
        let Some(sections) = pack.as_object() else {
            log::warn!("Asset pack {file} is not a JSON object");
            return 0;
        };

        let mut count = 0;
        for (section, entries) in sections {
            if section == "meta" {
                continue;
            }
            let Some(entries) = entries.as_array() else {
                continue;
            };
            for entry in entries {
                let pack_type = entry.get("type").and_then(Value::as_str).unwrap_or("");
                let (Some(kind), Some(asset)) = (
                    AssetKind::from_pack_type(pack_type),
                    entry.get("key").and_then(Value::as_str),
                ) else {
                    continue;
                };

                let key = AssetKey::new(file, section.as_str(), asset);
                if kind == AssetKind::Spritesheet
                    && let Some(max) = entry.get("frameMax").and_then(Value::as_i64)
                    && max > 0
                {
                    self.register_frames(key.clone(), (0..max).map(|i| i.to_string()));
                }
                self.register(key, kind);
                count += 1;
            }
        }

        log::debug!("Loaded {count} assets from pack {file}");
        count
    }

    fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::Relaxed)
    }

    fn frame_kind(&self, key: &AssetKey, frame: &str) -> Option<AssetKind> {
        let base = key.without_frame();
        let kind = match self.assets.get(&base)? {
            AssetKind::Atlas => AssetKind::AtlasFrame,
            AssetKind::Spritesheet => AssetKind::SpritesheetFrame,
            _ => return None,
        };
        match self.frames.get(&base) {
            Some(names) if !names.iter().any(|n| n == frame) => None,
            _ => Some(kind),
        }
    }
}

impl AssetResolver for AssetCatalog {
    fn find_asset_element(&self, reference: &Value) -> Option<AssetHandle> {
        let key = AssetKey::from_reference(reference)?;
        let kind = match key.frame.as_deref() {
            None => *self.assets.get(&key)?,
            Some(frame) => match self.assets.get(&key) {
                Some(kind) => *kind,
                None => self.frame_kind(&key, frame)?,
            },
        };
        Some(AssetHandle::new(kind, key, self.next_revision()))
    }
}
