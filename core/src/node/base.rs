use serde_json::{Map, Value};

use crate::json::{InfoWriter, read_bool, read_f64, read_opt_string};
use crate::prefab::Prefab;

/// Property-set names used in a prefab instance's override list.
pub mod tag {
    pub const POSITION: &str = "position";
    pub const ANGLE: &str = "angle";
    pub const SCALE: &str = "scale";
    pub const PIVOT: &str = "pivot";
    pub const ALPHA: &str = "alpha";
    pub const RENDERABLE: &str = "renderable";
    pub const FIXED_TO_CAMERA: &str = "fixedToCamera";
    pub const TEXTURE: &str = "texture";
    pub const ANCHOR: &str = "anchor";
    pub const TINT: &str = "tint";
    pub const DATA: &str = "data";
    pub const ANIMATIONS: &str = "animations";
    pub const PHYSICS: &str = "physics";
    pub const TEXT: &str = "text";
    pub const STYLE: &str = "style";
    pub const SIZE: &str = "size";
    pub const TILE_POSITION: &str = "tilePosition";
    pub const TILE_SCALE: &str = "tileScale";
    pub const TILESET: &str = "tileset";
    pub const FRAMES: &str = "frames";
    pub const CALLBACK: &str = "callback";
}

/// Transform and editor metadata shared by every node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectBase {
    /// Identity used to correlate prefab-instance overrides.
    pub id: String,
    pub editor_name: String,
    pub editor_factory: Option<String>,
    pub editor_pick: bool,
    pub editor_generate: bool,
    editor_public: bool,
    pub editor_field: bool,
    pub editor_show: bool,
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Radians.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub pivot_x: f64,
    pub pivot_y: f64,
    pub alpha: f64,
    pub renderable: bool,
    pub fixed_to_camera: bool,
    pub prefab: Option<Prefab>,
    pub prefab_override: Vec<String>,
}

impl ObjectBase {
    pub fn new(type_name: &str) -> Self {
        Self {
            id: new_id(),
            editor_name: type_name.to_owned(),
            editor_factory: None,
            editor_pick: true,
            editor_generate: true,
            editor_public: false,
            editor_field: false,
            editor_show: true,
            name: None,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            alpha: 1.0,
            renderable: true,
            fixed_to_camera: false,
            prefab: None,
            prefab_override: vec![tag::POSITION.to_owned()],
        }
    }

    pub fn reset_id(&mut self) {
        self.id = new_id();
    }

    /// Rotation in degrees.
    pub fn angle(&self) -> f64 {
        self.rotation.to_degrees()
    }

    pub fn set_angle(&mut self, degrees: f64) {
        self.rotation = degrees.to_radians();
    }

    pub fn editor_public(&self) -> bool {
        self.editor_public
    }

    /// Public objects are always generated as fields.
    pub fn set_editor_public(&mut self, public: bool) {
        self.editor_public = public;
        if public {
            self.editor_field = true;
        }
    }

    pub fn is_prefab_instance(&self) -> bool {
        self.prefab.is_some()
    }

    /// Ordinary objects own every property; instances only the overridden sets.
    pub fn is_overriding(&self, tag: &str) -> bool {
        !self.is_prefab_instance() || self.prefab_override.iter().any(|t| t == tag)
    }

    pub fn is_prefab_read_only(&self, tag: &str) -> bool {
        !self.is_overriding(tag)
    }

    pub fn set_overriding(&mut self, tag: &str, overriding: bool) {
        let present = self.prefab_override.iter().position(|t| t == tag);
        match (present, overriding) {
            (None, true) => self.prefab_override.push(tag.to_owned()),
            (Some(i), false) => {
                self.prefab_override.remove(i);
            }
            _ => {}
        }
    }

    pub(crate) fn read_info(&mut self, info: &Map<String, Value>, type_name: &str) {
        self.editor_name = info
            .get("editorName")
            .and_then(Value::as_str)
            .unwrap_or(type_name)
            .to_owned();
        self.editor_factory = read_opt_string(info, "editorFactory");
        self.editor_pick = read_bool(info, "editorPick", true);
        self.editor_generate = read_bool(info, "editorGenerate", true);
        self.editor_field = read_bool(info, "editorField", false);
        self.set_editor_public(read_bool(info, "editorPublic", false));
        self.editor_show = read_bool(info, "editorShow", true);

        self.prefab_override = match info.get("prefabOverride").and_then(Value::as_array) {
            Some(tags) => tags
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            None => vec![tag::POSITION.to_owned()],
        };

        self.name = read_opt_string(info, "name");
        self.x = read_f64(info, "x", 0.0);
        self.y = read_f64(info, "y", 0.0);
        self.rotation = read_f64(info, "rotation", 0.0);
        self.scale_x = read_f64(info, "scale.x", 1.0);
        self.scale_y = read_f64(info, "scale.y", 1.0);
        self.pivot_x = read_f64(info, "pivot.x", 0.0);
        self.pivot_y = read_f64(info, "pivot.y", 0.0);
        self.alpha = read_f64(info, "alpha", 1.0);
        self.renderable = read_bool(info, "renderable", true);
        self.fixed_to_camera = read_bool(info, "fixedToCamera", false);
    }

    pub(crate) fn write_info(&self, w: &mut InfoWriter<'_>) {
        w.put("editorName", self.editor_name.as_str());
        if let Some(factory) = &self.editor_factory {
            w.put("editorFactory", factory.as_str());
        }
        w.put_default("editorPick", self.editor_pick, true);
        w.put_default("editorGenerate", self.editor_generate, true);
        w.put_default("editorPublic", self.editor_public, false);
        w.put_default("editorField", self.editor_field, false);
        w.put_default("editorShow", self.editor_show, true);

        if w.is_instance() || !w.saving() {
            w.put(
                "prefabOverride",
                Value::from(self.prefab_override.clone()),
            );
        }

        if let Some(name) = &self.name {
            w.put("name", name.as_str());
        }

        w.put_prop(tag::POSITION, "x", self.x, 0.0);
        w.put_prop(tag::POSITION, "y", self.y, 0.0);
        w.put_prop(tag::ANGLE, "rotation", self.rotation, 0.0);
        w.put_prop(tag::SCALE, "scale.x", self.scale_x, 1.0);
        w.put_prop(tag::SCALE, "scale.y", self.scale_y, 1.0);
        w.put_prop(tag::PIVOT, "pivot.x", self.pivot_x, 0.0);
        w.put_prop(tag::PIVOT, "pivot.y", self.pivot_y, 0.0);
        w.put_prop(tag::ALPHA, "alpha", self.alpha, 1.0);
        w.put_prop(tag::RENDERABLE, "renderable", self.renderable, true);
        w.put_prop(tag::FIXED_TO_CAMERA, "fixedToCamera", self.fixed_to_camera, false);
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(base: &ObjectBase, saving: bool) -> Value {
        let mut info = Map::new();
        base.write_info(&mut InfoWriter::new(&mut info, base, saving));
        Value::Object(info)
    }

    #[test]
    fn defaults_are_omitted_when_saving() {
        let base = ObjectBase::new("image");
        assert_eq!(write(&base, true), json!({"editorName": "image"}));
    }

    #[test]
    fn snapshot_keeps_override_list() {
        let base = ObjectBase::new("image");
        assert_eq!(
            write(&base, false),
            json!({"editorName": "image", "prefabOverride": ["position"]})
        );
    }

    #[test]
    fn instance_writes_only_overridden_sets() {
        let mut base = ObjectBase::new("group");
        base.prefab = Some(Prefab::new("prefabs/Enemy.canvas"));
        base.rotation = 1.0;
        base.set_overriding(tag::SCALE, true);

        let info = write(&base, true);
        assert_eq!(info["x"], json!(0.0));
        assert_eq!(info["scale.x"], json!(1.0));
        assert!(info.get("rotation").is_none());
        assert_eq!(info["prefabOverride"], json!(["position", "scale"]));
    }

    #[test]
    fn public_forces_field() {
        let mut base = ObjectBase::new("sprite");
        base.read_info(
            json!({"editorPublic": true, "editorField": false})
                .as_object()
                .unwrap(),
            "sprite",
        );
        assert!(base.editor_public());
        assert!(base.editor_field);
    }

    #[test]
    fn missing_override_list_defaults_to_position() {
        let mut base = ObjectBase::new("sprite");
        base.read_info(json!({"x": 3}).as_object().unwrap(), "sprite");
        assert_eq!(base.prefab_override, vec!["position".to_owned()]);
        assert_eq!(base.editor_name, "sprite");
        assert_eq!(base.x, 3.0);
    }

    #[test]
    fn angle_is_degrees() {
        let mut base = ObjectBase::new("image");
        base.set_angle(180.0);
        assert!((base.rotation - std::f64::consts::PI).abs() < 1e-9);
        assert!((base.angle() - 180.0).abs() < 1e-9);
    }
}
