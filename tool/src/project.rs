//! `project.toml`: where a game's content folders and asset packs live.

use std::path::{Path, PathBuf};

use phaser_canvas_core::AssetCatalog;
use phaser_canvas_vfs::{FileSystemProvider, Vfs};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub project: GameInfo,
    /// Content folders, mounted into the VFS by name.
    #[serde(default, rename = "mount")]
    pub mounts: Vec<ContentFolder>,
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameInfo {
    pub name: String,
}

/// A folder such as `WebContent/`, relative to the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFolder {
    pub name: String,
    pub path: String,
    /// Paths without a mount prefix resolve here.
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetsConfig {
    /// Asset-pack JSON files, as VFS paths.
    #[serde(default)]
    pub packs: Vec<String>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Config used when there is no `project.toml`: the directory itself is
    /// the only content folder and there are no asset packs.
    pub fn fallback() -> Self {
        Self {
            project: GameInfo { name: "Untitled".into() },
            mounts: vec![ContentFolder {
                name: "project".into(),
                path: ".".into(),
                default: true,
            }],
            assets: AssetsConfig::default(),
        }
    }

    /// Mounts every content folder, resolving relative paths from `base_dir`.
    pub fn mount_folders(&self, base_dir: &Path) -> Vfs {
        let mut vfs = Vfs::new();
        for folder in &self.mounts {
            let root = base_dir.join(&folder.path);
            log::info!("Content folder '{}' at {}", folder.name, root.display());
            vfs.mount(folder.name.clone(), FileSystemProvider::new(root));
        }
        if let Some(folder) = self.mounts.iter().find(|folder| folder.default) {
            vfs.set_default(folder.name.clone());
        }
        vfs
    }

    /// Reads the configured asset packs into a catalog.
    ///
    /// A pack that cannot be read is logged and skipped, so scenes using its
    /// assets load with missing-asset placeholders.
    pub fn load_catalog(&self, vfs: &Vfs) -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        for pack in &self.assets.packs {
            let json = vfs
                .read_to_string(pack)
                .map_err(|e| e.to_string())
                .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()));
            match json {
                Ok(json) => {
                    let count = catalog.load_pack(pack, &json);
                    log::info!("Asset pack {pack}: {count} assets");
                }
                Err(e) => log::error!("Skipping asset pack {pack}: {e}"),
            }
        }
        catalog
    }
}

/// Everything a command needs: config, mounted folders and asset catalog.
pub struct Project {
    pub config: ProjectConfig,
    pub vfs: Vfs,
    pub catalog: AssetCatalog,
}

impl Project {
    /// Opens the project described by `config_path`, or the directory around
    /// it when the file is missing or broken.
    pub fn open(config_path: &Path) -> Self {
        let config = ProjectConfig::load(config_path).unwrap_or_else(|e| {
            log::warn!("{e}; using the project directory as the only content folder");
            ProjectConfig::fallback()
        });
        log::info!(
            "Project '{}': {} content folders, {} asset packs",
            config.project.name,
            config.mounts.len(),
            config.assets.packs.len()
        );

        let base_dir = config_path.parent().unwrap_or(Path::new("."));
        let vfs = config.mount_folders(base_dir);
        let catalog = config.load_catalog(&vfs);
        Self { config, vfs, catalog }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phaser_canvas_core::AssetResolver;
    use serde_json::json;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("canvas-tool-{name}-{}", std::process::id()));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(dir.join("WebContent/assets")).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn parses_full_config() {
        let config: ProjectConfig = toml::from_str(
            r#"
            [project]
            name = "my-game"

            [[mount]]
            name = "game"
            path = "./WebContent"
            default = true

            [assets]
            packs = ["assets/pack.json"]
            "#,
        )
        .unwrap();

        assert_eq!(config.project.name, "my-game");
        assert_eq!(config.mounts.len(), 1);
        assert!(config.mounts[0].default);
        assert_eq!(config.assets.packs, vec!["assets/pack.json"]);
    }

    #[test]
    fn folders_and_packs_are_optional() {
        let config: ProjectConfig = toml::from_str("[project]\nname = \"bare\"\n").unwrap();
        assert!(config.mounts.is_empty());
        assert!(config.assets.packs.is_empty());
    }

    #[test]
    fn missing_config_falls_back_to_directory() {
        let path = Path::new("/nonexistent/dir/project.toml");
        assert!(matches!(ProjectConfig::load(path), Err(ConfigError::Read { .. })));

        let project = Project::open(path);
        assert_eq!(project.config.project.name, "Untitled");
        assert_eq!(project.vfs.sources(), vec!["project"]);
        assert!(project.catalog.is_empty());
    }

    #[test]
    fn broken_config_reports_parse_error() {
        let dir = TempDir::new("broken");
        let path = dir.0.join("project.toml");
        std::fs::write(&path, "[project\n").unwrap();
        assert!(matches!(ProjectConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn packs_are_read_from_content_folders() {
        let dir = TempDir::new("packs");
        std::fs::write(
            dir.0.join("project.toml"),
            "[project]\nname = \"t\"\n[[mount]]\nname = \"game\"\npath = \"WebContent\"\ndefault = true\n[assets]\npacks = [\"assets/pack.json\", \"assets/missing.json\"]\n",
        )
        .unwrap();
        std::fs::write(
            dir.0.join("WebContent/assets/pack.json"),
            json!({"level": [{"type": "image", "key": "sky"}]}).to_string(),
        )
        .unwrap();

        let project = Project::open(&dir.0.join("project.toml"));
        assert_eq!(project.catalog.len(), 1);
        assert!(
            project
                .catalog
                .find_asset_element(&json!({"file": "assets/pack.json", "section": "level", "asset": "sky"}))
                .is_some()
        );
        assert!(project.vfs.exists("game/assets/pack.json"));
    }
}
