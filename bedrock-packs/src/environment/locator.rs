//! Server root discovery across deployment layouts.
//!
//! Search order, first match wins:
//!
//! 1. Explicit override supplied by the caller (flag or config), if it exists.
//! 2. A directory with both a server executable and `worlds/`, checked in
//!    candidate order: the current directory, panel container roots
//!    (`/home/container`), `./servers/*`, then the children of known panel
//!    volume directories (Pterodactyl, Crafty).
//! 3. The same candidates again, accepting `worlds/` alone.
//!
//! Sub-directory candidates are visited in sorted order, so the result only
//! depends on the filesystem state. Discovery never writes anything.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ManagerError, ManagerResult};

/// Executable names of the Bedrock Dedicated Server.
pub const SERVER_EXECUTABLES: &[&str] = &["bedrock_server", "bedrock_server.exe"];

/// Roots that are themselves a server in panel-managed containers.
const PANEL_SERVER_ROOTS: &[&str] = &["/home/container"];

/// Directories whose children are server roots on panel hosts.
const PANEL_VOLUME_DIRS: &[&str] = &[
    "/var/lib/pterodactyl/volumes",
    "/var/opt/minecraft/crafty/crafty-4/servers",
];

/// Which server markers a directory carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerMarkers {
    /// A Bedrock server executable is present.
    pub executable: bool,
    /// A `worlds/` directory is present.
    pub worlds: bool,
}

impl ServerMarkers {
    /// Inspect a directory.
    pub fn probe(dir: &Path) -> Self {
        Self {
            executable: SERVER_EXECUTABLES.iter().any(|e| dir.join(e).is_file()),
            worlds: dir.join("worlds").is_dir(),
        }
    }

    /// Executable and worlds: the most specific marker.
    pub fn is_complete(&self) -> bool {
        self.executable && self.worlds
    }
}

/// How a server root was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateRule {
    /// Supplied explicitly by the caller.
    Override,
    /// Executable plus `worlds/`.
    ServerMarkers,
    /// `worlds/` only.
    WorldsOnly,
}

/// A located server root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedServer {
    /// The server root directory.
    pub root: PathBuf,
    /// The rule that selected it.
    pub rule: LocateRule,
}

/// Discovers the server root directory.
#[derive(Debug, Clone)]
pub struct EnvironmentLocator {
    override_root: Option<PathBuf>,
    cwd: PathBuf,
    panel_roots: Vec<PathBuf>,
    volume_dirs: Vec<PathBuf>,
}

impl EnvironmentLocator {
    /// Create a locator searching from `cwd` and the known panel layouts.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            override_root: None,
            cwd: cwd.into(),
            panel_roots: PANEL_SERVER_ROOTS.iter().map(PathBuf::from).collect(),
            volume_dirs: PANEL_VOLUME_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Create a locator for the process' current directory.
    pub fn from_current_dir() -> ManagerResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| ManagerError::read(".", e))?;
        Ok(Self::new(cwd))
    }

    /// Set an explicit server root that always wins when it exists.
    pub fn with_override(mut self, root: Option<PathBuf>) -> Self {
        self.override_root = root;
        self
    }

    /// Replace the panel container roots.
    pub fn with_panel_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.panel_roots = roots;
        self
    }

    /// Replace the panel volume directories.
    pub fn with_volume_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.volume_dirs = dirs;
        self
    }

    /// Resolve the server root.
    pub fn locate_server_root(&self) -> ManagerResult<LocatedServer> {
        if let Some(root) = &self.override_root {
            if root.is_dir() {
                if !ServerMarkers::probe(root).worlds {
                    tracing::warn!(root = %root.display(), "Server root override has no worlds/ directory");
                }
                return Ok(LocatedServer {
                    root: root.clone(),
                    rule: LocateRule::Override,
                });
            }
            return Err(ManagerError::EnvironmentNotFound {
                searched: vec![root.clone()],
            });
        }

        let candidates = self.candidates();

        if let Some(root) = candidates
            .iter()
            .find(|c| ServerMarkers::probe(c).is_complete())
        {
            return Ok(LocatedServer {
                root: root.clone(),
                rule: LocateRule::ServerMarkers,
            });
        }

        if let Some(root) = candidates.iter().find(|c| ServerMarkers::probe(c).worlds) {
            return Ok(LocatedServer {
                root: root.clone(),
                rule: LocateRule::WorldsOnly,
            });
        }

        Err(ManagerError::EnvironmentNotFound {
            searched: candidates,
        })
    }

    /// Every candidate that carries at least a `worlds/` directory, in
    /// search order. Used to offer a choice when several servers exist.
    pub fn detect_all(&self) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = Vec::new();
        if let Some(root) = &self.override_root {
            if root.is_dir() {
                found.push(root.clone());
            }
        }
        for c in self.candidates() {
            if ServerMarkers::probe(&c).worlds && !found.contains(&c) {
                found.push(c);
            }
        }
        found
    }

    /// Candidate directories in search order.
    fn candidates(&self) -> Vec<PathBuf> {
        let mut out = vec![self.cwd.clone()];
        out.extend(self.panel_roots.iter().cloned());
        out.extend(sorted_subdirs(&self.cwd.join("servers")));
        for dir in &self.volume_dirs {
            out.extend(sorted_subdirs(dir));
        }

        let mut seen = Vec::with_capacity(out.len());
        out.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
        out
    }
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}
