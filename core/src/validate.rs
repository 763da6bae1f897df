//! Problems reported to the build layer.

use std::collections::HashMap;

use crate::arena::NodeId;
use crate::node::NodeKind;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub message: String,
    pub node: Option<NodeId>,
}

impl Problem {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ProblemKind::Error,
            message: message.into(),
            node: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ProblemKind::Warning,
            message: message.into(),
            node: None,
        }
    }

    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == ProblemKind::Error
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ProblemKind::Error => "error",
            ProblemKind::Warning => "warning",
        };
        write!(f, "{kind}: {}", self.message)
    }
}

/// Checks the tree for placeholders and duplicated editor names.
///
/// Objects inside prefab instances are named by their prefab and are not
/// checked for duplicates.
pub fn validate_world(world: &World) -> Vec<Problem> {
    let mut problems = Vec::new();
    let mut names: HashMap<&str, usize> = HashMap::new();

    world.walk(world.root(), |id, node| {
        match node.kind() {
            NodeKind::MissingAsset(missing) => problems.push(
                Problem::error(format!(
                    "Missing asset ({}) in '{}'",
                    missing.describe(),
                    node.base.editor_name
                ))
                .with_node(id),
            ),
            NodeKind::MissingPrefab(missing) => problems.push(
                Problem::error(format!(
                    "Missing prefab '{}' in '{}'",
                    missing.path, node.base.editor_name
                ))
                .with_node(id),
            ),
            _ => {}
        }

        if id != world.root() && !world.is_prefab_instance_component(id) {
            *names.entry(node.base.editor_name.as_str()).or_default() += 1;
        }
    });

    let mut duplicated: Vec<&str> = names
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(name, _)| name)
        .collect();
    duplicated.sort_unstable();
    for name in duplicated {
        problems.push(Problem::error(format!("Duplicated name '{name}'")));
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::prefab::Prefab;
    use serde_json::json;

    fn named(name: &str) -> Node {
        let mut node = Node::group();
        node.base.editor_name = name.into();
        node
    }

    #[test]
    fn duplicated_names_are_reported_once() {
        let mut world = World::new();
        let root = world.root();
        world.add_node(root, named("coin")).unwrap();
        let group = world.add_node(root, named("coins")).unwrap();
        world.add_node(group, named("coin")).unwrap();
        world.add_node(group, named("coin")).unwrap();

        let problems = validate_world(&world);
        assert_eq!(problems, vec![Problem::error("Duplicated name 'coin'")]);
    }

    #[test]
    fn prefab_components_are_not_name_checked() {
        let mut world = World::new();
        let root = world.root();
        for name in ["enemy1", "enemy2"] {
            let mut instance = named(name);
            instance.base.prefab = Some(Prefab::new("prefabs/Enemy.canvas"));
            let instance = world.add_node(root, instance).unwrap();
            world.add_node(instance, named("body")).unwrap();
        }

        assert!(validate_world(&world).is_empty());
    }

    #[test]
    fn placeholders_are_errors() {
        let mut world = World::new();
        let root = world.root();
        let reference = json!({"file": "pack.json", "section": "level", "asset": "sky"});
        let data = json!({"type": "image", "info": {"editorName": "bg"}});
        let lost = world
            .add_node(root, Node::missing_asset(data, reference))
            .unwrap();

        let problems = validate_world(&world);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].is_error());
        assert_eq!(problems[0].node, Some(lost));
        assert!(problems[0].message.ends_with("in 'bg'"));
        assert_eq!(problems[0].to_string(), format!("error: {}", problems[0].message));
    }
}
