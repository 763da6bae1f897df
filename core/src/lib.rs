//! # Phaser canvas model
//!
//! In-memory model of Phaser Editor `.canvas` scenes: the object tree, its
//! JSON file form, and the prefab protocol.
//!
//! ## Core Types
//!
//! - [`CanvasModel`] — One document: settings, state settings and the world
//! - [`World`] — Arena-backed scene tree with asset and prefab tables
//! - [`Node`] / [`NodeKind`] — Scene objects and their kinds
//! - [`NodeId`] — Generational node identifier
//! - [`AssetTable`] / [`PrefabTable`] — Per-document id indirection
//! - [`Prefab`] — Canvas file used as a template
//!
//! ## Project Collaborators
//!
//! - [`AssetResolver`] — Maps JSON asset references to [`AssetHandle`]s
//! - [`AssetCatalog`] — In-memory resolver fed from asset-pack files
//! - [`ProjectContext`] — Resolver and VFS threaded through every operation
//!
//! ## Loading
//!
//! ```ignore
//! let ctx = ProjectContext::new(&catalog, &vfs);
//! let mut model = CanvasModel::load("scenes/Level.canvas", &ctx)?;
//! for problem in model.validate() {
//!     println!("{problem}");
//! }
//! model.save("scenes/Level.canvas", &ctx)?;
//! ```

mod arena;
mod asset;
mod asset_table;
mod context;
mod document;
mod error;
pub mod factory;
mod json;
pub mod node;
mod prefab;
mod prefab_table;
mod settings;
mod validate;
mod world;

pub use arena::NodeId;
pub use asset::{AssetCatalog, AssetHandle, AssetKey, AssetKind, AssetResolver};
pub use asset_table::{AssetEntry, AssetTable};
pub use context::ProjectContext;
pub use document::{CANVAS_VERSION, CanvasModel, CanvasType};
pub use error::{BuildError, CanvasError, CanvasResult, TextureError, TreeError};
pub use factory::AssetObject;
pub use node::{Node, NodeKind, ObjectBase, SpriteShape};
pub use prefab::Prefab;
pub use prefab_table::PrefabTable;
pub use settings::{
    EditorSettings, LoadPack, PhysicsSystem, PreloadDirection, SourceLang, StateSettings,
};
pub use validate::{Problem, ProblemKind, validate_world};
pub use world::{BuildSummary, World};
