//! Error types for document loading, node construction and tree edits.

use phaser_canvas_vfs::VfsError;
use serde_json::Value;
use thiserror::Error;

/// Hard failures that abort a read, write or prefab expansion.
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file access failed: {0}")]
    Vfs(#[from] VfsError),
    #[error("missing section '{0}'")]
    MissingSection(&'static str),
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("unknown object type '{0}'")]
    UnknownType(String),
    #[error("prefab '{0}' instantiates itself")]
    PrefabCycle(String),
    #[error("prefab '{0}' has no object to instantiate")]
    EmptyPrefab(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type CanvasResult<T> = Result<T, CanvasError>;

/// Outcome of building a single node from its JSON form.
///
/// The two `Missing*` variants are recoverable: the group reader turns them
/// into placeholder nodes that keep `data` for round-trip and later repair.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("missing asset {reference}")]
    MissingAsset { data: Value, reference: Value },
    #[error("missing prefab '{path}'")]
    MissingPrefab { data: Value, path: String },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

impl From<TreeError> for BuildError {
    fn from(err: TreeError) -> Self {
        BuildError::Canvas(CanvasError::Tree(err))
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError::Canvas(CanvasError::Json(err))
    }
}

/// Misuse of the hierarchy operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node does not exist")]
    UnknownNode,
    #[error("target node is not a group")]
    NotAGroup,
    #[error("the world root cannot be moved or removed")]
    RootNode,
    #[error("a group cannot be moved inside itself")]
    WouldCycle,
}

/// Rejected texture change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("node does not exist")]
    UnknownNode,
    #[error("'{0}' objects have no texture")]
    NoTexture(&'static str),
    #[error("'{asset:?}' assets cannot be bound to '{node}' objects")]
    Incompatible {
        node: &'static str,
        asset: crate::asset::AssetKind,
    },
}
