//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Checks, dumps and re-saves Phaser canvas scenes.
///
/// # Examples
///
/// ```bash
/// # Report problems of every scene
/// canvas-tool --project game/project.toml check scenes prefabs/Enemy.canvas
///
/// # Print the object tree
/// canvas-tool dump scenes/Level1.canvas
///
/// # Print an instance of a prefab placed at (100, 40)
/// canvas-tool instantiate prefabs/Enemy.canvas --x 100 --y 40
/// ```
#[derive(Debug, Parser)]
#[command(name = "canvas-tool", version, about)]
pub struct Args {
    /// Project configuration file.
    #[arg(long, short, default_value = "project.toml")]
    pub project: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load canvas files and report their problems.
    ///
    /// Folders are searched for `.canvas` files.
    Check {
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Print the object tree of a canvas file.
    Dump {
        file: String,
        /// Print the inline JSON snapshot instead of the tree.
        #[arg(long)]
        json: bool,
    },
    /// Load a canvas file and save it back in the current format.
    Resave { file: String },
    /// Print the instance data of a prefab.
    Instantiate {
        prefab: String,
        #[arg(long)]
        x: Option<f64>,
        #[arg(long)]
        y: Option<f64>,
    },
}
