//! Per-document prefab indirection table.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::prefab::Prefab;

/// Maps numeric string ids to prefabs and prefab files back to ids.
#[derive(Debug, Default)]
pub struct PrefabTable {
    by_id: HashMap<String, Prefab>,
    by_file: HashMap<String, String>,
    order: Vec<String>,
    counter: u64,
}

impl PrefabTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `prefab`, registering it first if needed.
    pub fn post_prefab(&mut self, prefab: &Prefab) -> String {
        if let Some(id) = self.by_file.get(prefab.file()) {
            return id.clone();
        }
        let id = self.counter.to_string();
        self.counter += 1;
        self.insert(id.clone(), prefab.clone());
        id
    }

    pub fn lookup(&self, id: &str) -> Option<&Prefab> {
        self.by_id.get(id)
    }

    pub fn id_of(&self, prefab: &Prefab) -> Option<&str> {
        self.by_file.get(prefab.file()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prefab)> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|prefab| (id.as_str(), prefab)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `{id: path}` in registration order.
    pub fn to_json(&self) -> Value {
        let mut table = Map::new();
        for (id, prefab) in self.iter() {
            table.insert(id.to_owned(), Value::from(prefab.file()));
        }
        Value::Object(table)
    }

    /// Loads the table written by [`to_json`](Self::to_json).
    ///
    /// Files are not checked here; a missing prefab file is only noticed when
    /// one of its instances is expanded. An absent table reads as empty.
    pub fn read(&mut self, json: Option<&Value>) {
        self.by_id.clear();
        self.by_file.clear();
        self.order.clear();
        self.counter = 0;

        let Some(table) = json.and_then(Value::as_object) else {
            return;
        };

        for (id, path) in table {
            let Some(path) = path.as_str() else {
                log::warn!("Ignoring prefab table entry {id}: path is not a string");
                continue;
            };
            if let Ok(n) = id.parse::<u64>() {
                self.counter = self.counter.max(n + 1);
            }
            self.insert(id.clone(), Prefab::new(path));
        }
    }

    fn insert(&mut self, id: String, prefab: Prefab) {
        self.by_file.insert(prefab.file().to_owned(), id.clone());
        self.by_id.insert(id.clone(), prefab);
        self.order.push(id);
    }
}
