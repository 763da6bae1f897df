//! Canvas documents: settings plus the world tree, and their JSON file form.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::context::ProjectContext;
use crate::error::{CanvasError, CanvasResult};
use crate::settings::{EditorSettings, StateSettings};
use crate::validate::{Problem, validate_world};
use crate::world::World;

/// Schema version written to `canvas-version`.
pub const CANVAS_VERSION: i64 = 2;

/// What a canvas file describes, and how it is instantiated as a prefab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CanvasType {
    #[default]
    Group,
    Sprite,
    State,
}

impl CanvasType {
    pub fn as_str(self) -> &'static str {
        match self {
            CanvasType::Group => "group",
            CanvasType::Sprite => "sprite",
            CanvasType::State => "state",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "group" => Some(CanvasType::Group),
            "sprite" => Some(CanvasType::Sprite),
            "state" => Some(CanvasType::State),
            _ => None,
        }
    }
}

impl std::fmt::Display for CanvasType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One open `.canvas` document.
pub struct CanvasModel {
    settings: EditorSettings,
    state_settings: StateSettings,
    world: World,
    doc_type: CanvasType,
    problems: Vec<Problem>,
}

impl CanvasModel {
    pub fn new(doc_type: CanvasType) -> Self {
        Self {
            settings: EditorSettings::default(),
            state_settings: StateSettings::default(),
            world: World::new(),
            doc_type,
            problems: Vec::new(),
        }
    }

    pub fn from_json(json: &Value, ctx: &ProjectContext<'_>) -> CanvasResult<Self> {
        let mut model = Self::new(CanvasType::default());
        model.read(json, ctx)?;
        Ok(model)
    }

    /// Reads a file through the project's VFS.
    pub fn load(path: &str, ctx: &ProjectContext<'_>) -> CanvasResult<Self> {
        let text = ctx.vfs().read_to_string(path)?;
        let json: Value = serde_json::from_str(&text)?;
        let model = Self::from_json(&json, ctx)?;
        log::info!(
            "Loaded {path}: {} objects, {} problems",
            model.world.len() - 1,
            model.problems.len()
        );
        Ok(model)
    }

    /// Writes the saving form as pretty JSON and clears the dirty flag.
    pub fn save(&mut self, path: &str, ctx: &ProjectContext<'_>) -> CanvasResult<()> {
        let json = self.to_json(true, ctx)?;
        let text = serde_json::to_string_pretty(&json)?;
        ctx.vfs().write(path, text.into_bytes())?;
        self.world.set_dirty(false);
        log::info!("Saved {path}");
        Ok(())
    }

    /// Replaces the whole document with `json`.
    ///
    /// On error the document is left unchanged.
    pub fn read(&mut self, json: &Value, ctx: &ProjectContext<'_>) -> CanvasResult<()> {
        let obj = json
            .as_object()
            .ok_or_else(|| CanvasError::Malformed("document is not a JSON object".into()))?;
        let mut problems = Vec::new();

        if let Some(version) = obj.get("canvas-version")
            && version.as_i64() != Some(CANVAS_VERSION)
        {
            log::warn!("Canvas version {version} differs from {CANVAS_VERSION}");
            problems.push(Problem::warning(format!(
                "Canvas version {version} differs from the current version {CANVAS_VERSION}"
            )));
        }

        let settings: EditorSettings = read_section(obj.get("settings"), "settings", &mut problems);
        let state_settings: StateSettings =
            read_section(obj.get("stateSettings"), "stateSettings", &mut problems);

        let world_json = obj.get("world").ok_or(CanvasError::MissingSection("world"))?;
        let mut world = World::new();
        problems.extend(world.assets_mut().read(obj.get("asset-table"), ctx.resolver()));
        world.prefabs_mut().read(obj.get("prefab-table"));
        world.read(world_json, ctx)?;

        let doc_type = match obj.get("type").and_then(Value::as_str) {
            None => CanvasType::Group,
            Some(name) => CanvasType::parse(name).unwrap_or_else(|| {
                log::warn!("Unknown canvas type '{name}', reading as group");
                CanvasType::Group
            }),
        };

        self.settings = settings;
        self.state_settings = state_settings;
        self.world = world;
        self.doc_type = doc_type;
        self.problems = problems;
        Ok(())
    }

    /// The document's JSON form.
    ///
    /// `saving` selects the file form (table ids, no prefab-instance
    /// children) over the inline snapshot form.
    pub fn to_json(&mut self, saving: bool, ctx: &ProjectContext<'_>) -> CanvasResult<Value> {
        let root = self.world.root();
        let world = self.world.to_json(root, saving, ctx).unwrap_or(Value::Null);

        let mut obj = Map::new();
        obj.insert("canvas-version".into(), CANVAS_VERSION.into());
        obj.insert("settings".into(), serde_json::to_value(&self.settings)?);
        obj.insert("stateSettings".into(), serde_json::to_value(&self.state_settings)?);
        obj.insert("world".into(), world);
        obj.insert("type".into(), self.doc_type.as_str().into());
        obj.insert("asset-table".into(), self.world.assets().to_json());
        obj.insert("prefab-table".into(), self.world.prefabs().to_json());
        Ok(Value::Object(obj))
    }

    pub fn doc_type(&self) -> CanvasType {
        self.doc_type
    }

    pub fn set_doc_type(&mut self, doc_type: CanvasType) {
        if self.doc_type != doc_type {
            self.doc_type = doc_type;
            self.world.set_dirty(true);
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Marks the document dirty.
    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        self.world.set_dirty(true);
        &mut self.settings
    }

    pub fn state_settings(&self) -> &StateSettings {
        &self.state_settings
    }

    /// Marks the document dirty.
    pub fn state_settings_mut(&mut self) -> &mut StateSettings {
        self.world.set_dirty(true);
        &mut self.state_settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn is_dirty(&self) -> bool {
        self.world.is_dirty()
    }

    /// Problems found while reading.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Load-time problems followed by the problems of the current tree.
    pub fn validate(&self) -> Vec<Problem> {
        let mut problems = self.problems.clone();
        problems.extend(validate_world(&self.world));
        problems
    }
}

/// Reads a settings section field by field.
///
/// Values that do not fit their field are dropped with a warning and the
/// field keeps its default.
fn read_section<T>(section: Option<&Value>, name: &str, problems: &mut Vec<Problem>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(section) = section else {
        return T::default();
    };
    if let Ok(settings) = serde_json::from_value(section.clone()) {
        return settings;
    }
    let Some(fields) = section.as_object() else {
        log::warn!("Section {name} is not an object, using defaults");
        problems.push(Problem::warning(format!("Section '{name}' is not an object")));
        return T::default();
    };

    let mut accepted = Map::new();
    for (key, value) in fields {
        let mut candidate = accepted.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
            Ok(_) => accepted = candidate,
            Err(e) => {
                log::warn!("Ignoring {name}.{key}: {e}");
                problems.push(Problem::warning(format!("Invalid value {value} for '{name}.{key}'")));
            }
        }
    }
    serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
}

impl Default for CanvasModel {
    fn default() -> Self {
        Self::new(CanvasType::default())
    }
}
