//! The `settings` and `stateSettings` sections of a canvas document.
//!
//! Every field has a default so sections written by older editors, or not
//! written at all, still load.

use serde::{Deserialize, Serialize};

/// Language the scene code is generated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceLang {
    #[default]
    JavaScript,
    TypeScript,
}

/// Editor-side scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    pub scene_width: f64,
    pub scene_height: f64,
    pub scene_background_color: String,
    pub grid_color: String,
    pub show_grid: bool,
    pub enable_stepping: bool,
    pub step_width: u32,
    pub step_height: u32,
    pub generate_on_save: bool,
    pub lang: SourceLang,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            scene_width: 800.0,
            scene_height: 600.0,
            scene_background_color: "#b4b4b4".to_owned(),
            grid_color: "#c8c8c8".to_owned(),
            show_grid: true,
            enable_stepping: false,
            step_width: 32,
            step_height: 32,
            generate_on_save: true,
            lang: SourceLang::JavaScript,
            base_class: None,
            class_name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhysicsSystem {
    #[default]
    None,
    Arcade,
    P2js,
    Ninja,
    Box2d,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreloadDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// An asset-pack section loaded by a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadPack {
    pub file: String,
    pub section: String,
}

/// Phaser state configuration, used by `state` documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateSettings {
    pub scale_mode: String,
    pub page_align_horizontally: bool,
    pub page_align_vertically: bool,
    pub stage_background_color: String,
    pub physics_system: PhysicsSystem,
    pub renderer_round_pixels: bool,
    pub is_preloader: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preload_sprite_id: Option<String>,
    pub preload_sprite_direction: PreloadDirection,
    pub load: Vec<LoadPack>,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            scale_mode: "NO_SCALE".to_owned(),
            page_align_horizontally: false,
            page_align_vertically: false,
            stage_background_color: "#000000".to_owned(),
            physics_system: PhysicsSystem::None,
            renderer_round_pixels: false,
            is_preloader: false,
            preload_sprite_id: None,
            preload_sprite_direction: PreloadDirection::Horizontal,
            load: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_section_keeps_defaults() {
        let settings: EditorSettings =
            serde_json::from_value(json!({"sceneWidth": 1024, "lang": "TYPE_SCRIPT"})).unwrap();
        assert_eq!(settings.scene_width, 1024.0);
        assert_eq!(settings.scene_height, 600.0);
        assert_eq!(settings.lang, SourceLang::TypeScript);
        assert!(settings.generate_on_save);
    }

    #[test]
    fn state_settings_use_java_names() {
        let mut state = StateSettings::default();
        state.physics_system = PhysicsSystem::P2js;
        state.load.push(LoadPack {
            file: "assets/pack.json".into(),
            section: "level".into(),
        });

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["physicsSystem"], "P2JS");
        assert_eq!(json["scaleMode"], "NO_SCALE");
        assert_eq!(json["preloadSpriteDirection"], "HORIZONTAL");
        assert_eq!(json["load"][0]["section"], "level");
        assert!(json.get("preloadSpriteId").is_none());

        let back: StateSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
