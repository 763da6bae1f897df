use serde_json::Value;

use crate::asset::AssetKey;

/// Placeholder for an object whose asset could not be resolved.
///
/// `data` is the object's original JSON and is written back unchanged,
/// apart from `id` when the node is given a fresh identity.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingAsset {
    pub data: Value,
    pub reference: Value,
}

impl MissingAsset {
    /// Human readable `section/key/frame` description of the lost asset.
    pub fn describe(&self) -> String {
        describe_reference(&self.reference)
    }
}

/// Placeholder for a prefab instance whose prefab file is gone.
///
/// `data` always names the prefab through an explicit `prefabFile` path.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingPrefab {
    pub data: Value,
    pub path: String,
}

pub(crate) fn describe_reference(reference: &Value) -> String {
    match AssetKey::from_reference(reference) {
        Some(key) => key.to_string(),
        None => reference.to_string(),
    }
}
