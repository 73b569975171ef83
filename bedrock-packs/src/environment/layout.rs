//! Paths inside a Bedrock Dedicated Server root.

use std::fs;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

use crate::error::{ManagerError, ManagerResult};
use crate::pack::PackType;

/// Name of the inbound auto-install queue directory.
pub const AUTO_INSTALL_DIR: &str = "addons_auto_install";

/// Name of the queue subdirectory receiving successfully installed archives.
pub const PROCESSED_DIR: &str = "processed";

/// Default scratch directory name, relative to the server root.
pub const DEFAULT_SCRATCH_DIR: &str = ".tmp_addon_extract";

/// File name of the human-readable install report.
pub const REPORT_FILE: &str = "world_packs_report.md";

/// Layout of one server root.
///
/// Every path the pack manager touches is derived from here, so the root
/// is resolved exactly once by the locator and then passed around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    root: PathBuf,
    scratch_name: String,
}

impl ServerLayout {
    /// Create a layout for the given server root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scratch_name: DEFAULT_SCRATCH_DIR.to_string(),
        }
    }

    /// Use a different scratch directory name (relative to the root).
    pub fn with_scratch_dir(mut self, name: impl Into<String>) -> Self {
        self.scratch_name = name.into();
        self
    }

    /// The server root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `behavior_packs/` or `resource_packs/`.
    pub fn packs_dir(&self, pack_type: PackType) -> PathBuf {
        self.root.join(pack_type.packs_dir_name())
    }

    /// `worlds/`.
    pub fn worlds_dir(&self) -> PathBuf {
        self.root.join("worlds")
    }

    /// `addons_auto_install/`.
    pub fn auto_install_dir(&self) -> PathBuf {
        self.root.join(AUTO_INSTALL_DIR)
    }

    /// `addons_auto_install/processed/`.
    pub fn processed_dir(&self) -> PathBuf {
        self.auto_install_dir().join(PROCESSED_DIR)
    }

    /// Scratch area for archive extraction, local to the server root.
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(&self.scratch_name)
    }

    /// `server.properties`.
    pub fn server_properties(&self) -> PathBuf {
        self.root.join("server.properties")
    }

    /// Install report written after each install batch.
    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }

    /// World folder names, sorted.
    pub fn list_worlds(&self) -> ManagerResult<Vec<String>> {
        let worlds_dir = self.worlds_dir();
        if !worlds_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&worlds_dir).map_err(|e| ManagerError::read(&worlds_dir, e))?;

        let mut worlds: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        worlds.sort();
        Ok(worlds)
    }

    /// The `level-name` configured in `server.properties`, if any.
    pub fn level_name(&self) -> Option<String> {
        let path = self.server_properties();
        if !path.is_file() {
            return None;
        }

        // server.properties is flat `key=value`; quotes and backslashes are literal.
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = match Ini::load_from_file_opt(&path, options) {
            Ok(ini) => ini,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable server.properties");
                return None;
            }
        };

        ini.general_section()
            .get("level-name")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// The world whose activation lists an invocation manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldTarget {
    name: String,
    dir: PathBuf,
}

impl WorldTarget {
    /// Create a world target.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    /// World folder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `world_behavior_packs.json` or `world_resource_packs.json`.
    pub fn activation_file(&self, pack_type: PackType) -> PathBuf {
        self.dir.join(pack_type.activation_file_name())
    }
}

/// Explicit context produced once by the locator and passed to every
/// component that needs a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerContext {
    layout: ServerLayout,
    world: WorldTarget,
}

impl ServerContext {
    /// Create a context from an already chosen world.
    pub fn new(layout: ServerLayout, world: WorldTarget) -> Self {
        Self { layout, world }
    }

    /// Choose the target world and build the context.
    ///
    /// Precedence: `preferred` name → `level-name` from `server.properties`
    /// → first world folder in sorted order.
    pub fn resolve(layout: ServerLayout, preferred: Option<&str>) -> ManagerResult<Self> {
        let worlds_dir = layout.worlds_dir();
        let worlds = layout.list_worlds()?;

        let name = match preferred {
            Some(name) => {
                if !worlds.iter().any(|w| w == name) {
                    return Err(ManagerError::WorldNotFound {
                        name: name.to_string(),
                        worlds_dir,
                    });
                }
                name.to_string()
            }
            None => match layout.level_name().filter(|n| worlds.contains(n)) {
                Some(level) => level,
                None => worlds
                    .first()
                    .cloned()
                    .ok_or_else(|| ManagerError::WorldNotFound {
                        name: "<any>".to_string(),
                        worlds_dir: worlds_dir.clone(),
                    })?,
            },
        };

        tracing::debug!(world = %name, root = %layout.root().display(), "Selected world");
        let world = WorldTarget::new(name.clone(), worlds_dir.join(&name));
        Ok(Self { layout, world })
    }

    /// Server layout.
    pub fn layout(&self) -> &ServerLayout {
        &self.layout
    }

    /// Target world.
    pub fn world(&self) -> &WorldTarget {
        &self.world
    }
}
