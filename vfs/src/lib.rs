//! Project file access for the Phaser canvas model.
//!
//! A Phaser project keeps its scenes, prefabs and asset packs under one or
//! more content folders. Each folder is mounted into a [`Vfs`] under a short
//! name, and files are then addressed as `"<mount>/<path>"`, for instance
//! `"game/prefabs/Enemy.canvas"`. With a default mount set, the mount name may
//! be left out, which is how canvas documents refer to prefab files.
//!
//! ```ignore
//! let mut vfs = Vfs::new();
//! vfs.mount("game", FileSystemProvider::new("./WebContent"));
//! vfs.set_default("game");
//!
//! let scene = vfs.read_to_string("scenes/Level1.canvas")?;
//! let prefabs = vfs.find_files("prefabs", "canvas")?;
//! ```
//!
//! Providers:
//! - [`MemoryProvider`] — shared in-memory files, used by tests and tools
//! - [`FileSystemProvider`] — a directory on disk (feature `filesystem`)

mod error;
#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
mod filesystem;
mod memory;
pub mod path;
mod provider;
mod vfs;

pub use error::VfsError;
#[cfg(all(feature = "filesystem", not(target_arch = "wasm32")))]
pub use filesystem::FileSystemProvider;
pub use memory::MemoryProvider;
pub use provider::{VfsProvider, VfsResult};
pub use vfs::Vfs;
