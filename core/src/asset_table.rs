//! Per-document asset indirection table.
//!
//! Saved objects refer to their asset through a short table id; the table maps
//! each id to the full asset reference once per document.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::asset::{AssetHandle, AssetKey, AssetResolver};
use crate::node::describe_reference;
use crate::validate::Problem;

#[derive(Debug, Clone)]
pub struct AssetEntry {
    id: String,
    reference: Value,
    asset: Option<AssetHandle>,
}

impl AssetEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The stored JSON reference, kept even when it does not resolve.
    pub fn reference(&self) -> &Value {
        &self.reference
    }

    pub fn asset(&self) -> Option<&AssetHandle> {
        self.asset.as_ref()
    }

    fn key(&self) -> Option<AssetKey> {
        match &self.asset {
            Some(asset) => Some(asset.shared_version().clone()),
            None => AssetKey::from_reference(&self.reference),
        }
    }
}

/// De-duplicating registry of asset references keyed by numeric string ids.
///
/// Ids are never reused within a document. Unresolved entries read from a
/// file are kept so that placeholders pointing at them still save intact.
#[derive(Debug, Default)]
pub struct AssetTable {
    entries: Vec<AssetEntry>,
    index: HashMap<String, usize>,
    counter: u64,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `asset`, registering it first if needed.
    ///
    /// Two handles with the same shared version get the same id.
    pub fn post_asset(&mut self, asset: &AssetHandle, resolver: &dyn AssetResolver) -> String {
        let key = asset.shared_version();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.key().as_ref() == Some(key))
        {
            if entry.asset.is_none() {
                entry.asset = Some(asset.clone());
            }
            return entry.id.clone();
        }

        let id = self.counter.to_string();
        self.counter += 1;
        self.push(AssetEntry {
            id: id.clone(),
            reference: resolver.asset_json_reference(asset),
            asset: Some(asset.clone()),
        });
        id
    }

    pub fn lookup(&self, id: &str) -> Option<&AssetHandle> {
        self.entry(id).and_then(AssetEntry::asset)
    }

    pub fn entry(&self, id: &str) -> Option<&AssetEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry, for reuse across bulk exports.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.counter = 0;
    }

    /// `{id: reference}` in insertion order.
    pub fn to_json(&self) -> Value {
        let mut table = Map::new();
        for entry in &self.entries {
            table.insert(entry.id.clone(), entry.reference.clone());
        }
        Value::Object(table)
    }

    /// Loads the table written by [`to_json`](Self::to_json).
    ///
    /// An absent table is an older file format and reads as empty. Entries
    /// that do not resolve are kept and reported.
    pub fn read(&mut self, json: Option<&Value>, resolver: &dyn AssetResolver) -> Vec<Problem> {
        self.reset();
        let mut problems = Vec::new();

        let Some(table) = json.and_then(Value::as_object) else {
            return problems;
        };

        for (id, reference) in table {
            let asset = resolver.find_asset_element(reference);
            if asset.is_none() {
                let message = format!("Asset not found ({})", describe_reference(reference));
                log::warn!("{message}");
                problems.push(Problem::error(message));
            }
            if let Ok(n) = id.parse::<u64>() {
                self.counter = self.counter.max(n + 1);
            }
            self.push(AssetEntry {
                id: id.clone(),
                reference: reference.clone(),
                asset,
            });
        }

        problems
    }

    /// Re-resolves every entry, returning the number of lost assets.
    pub fn refresh(&mut self, resolver: &dyn AssetResolver) -> usize {
        let mut lost = 0;
        for entry in &mut self.entries {
            entry.asset = resolver.find_asset_element(&entry.reference);
            if entry.asset.is_none() {
                lost += 1;
            }
        }
        lost
    }

    fn push(&mut self, entry: AssetEntry) {
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetCatalog, AssetKind};
    use crate::validate::ProblemKind;
    use serde_json::json;

    fn catalog() -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        catalog.register(AssetKey::new("pack.json", "level", "sky"), AssetKind::Image);
        catalog.register(AssetKey::new("pack.json", "level", "hero"), AssetKind::Atlas);
        catalog
    }

    fn sky() -> Value {
        json!({"file": "pack.json", "section": "level", "asset": "sky"})
    }

    #[test]
    fn post_is_idempotent_for_shared_versions() {
        let catalog = catalog();
        let mut table = AssetTable::new();

        let a = catalog.find_asset_element(&sky()).unwrap();
        let b = catalog.find_asset_element(&sky()).unwrap();
        assert_ne!(a, b);

        let id_a = table.post_asset(&a, &catalog);
        let id_b = table.post_asset(&b, &catalog);
        assert_eq!(id_a, id_b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn ids_follow_insertion_order() {
        let catalog = catalog();
        let mut table = AssetTable::new();
        let hero = json!({"file": "pack.json", "section": "level", "asset": "hero", "sprite": "idle"});

        let sky_id = table.post_asset(&catalog.find_asset_element(&sky()).unwrap(), &catalog);
        let hero_id = table.post_asset(&catalog.find_asset_element(&hero).unwrap(), &catalog);
        assert_eq!((sky_id.as_str(), hero_id.as_str()), ("0", "1"));

        let keys: Vec<_> = table.to_json().as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["0", "1"]);
    }

    #[test]
    fn absent_table_reads_empty() {
        let mut table = AssetTable::new();
        assert!(table.read(None, &catalog()).is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn unresolved_entries_are_kept_and_reported() {
        let catalog = catalog();
        let mut table = AssetTable::new();
        let lost = json!({"file": "pack.json", "section": "level", "asset": "moon", "sprite": "full"});
        let problems = table.read(Some(&json!({"3": sky(), "7": lost})), &catalog);

        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::Error);
        assert!(problems[0].message.contains("key=moon"));
        assert!(problems[0].message.contains("frame=full"));

        assert!(table.lookup("3").is_some());
        assert!(table.lookup("7").is_none());
        assert_eq!(table.entry("7").unwrap().reference(), &lost);

        let new_id = table.post_asset(
            &catalog
                .find_asset_element(&json!({"file": "pack.json", "section": "level", "asset": "hero", "sprite": "a"}))
                .unwrap(),
            &catalog,
        );
        assert_eq!(new_id, "8");
    }

    #[test]
    fn reset_clears_entries() {
        let catalog = catalog();
        let mut table = AssetTable::new();
        table.post_asset(&catalog.find_asset_element(&sky()).unwrap(), &catalog);
        table.reset();
        assert!(table.is_empty());
        assert_eq!(table.to_json(), json!({}));
    }
}
