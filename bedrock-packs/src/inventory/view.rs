//! The combined installed × active view and its filters.

use std::fmt;
use std::str::FromStr;

use crate::error::ManagerResult;
use crate::pack::{InstalledPack, PackType, PackVersion};
use crate::registry::WorldRegistry;

/// One installed pack and whether the target world activates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackView {
    pub pack: InstalledPack,
    pub active: bool,
}

/// An activation entry that matches no installed pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub pack_type: PackType,
    pub pack_id: String,
    pub version: Option<PackVersion>,
}

/// Installed packs joined with one world's activation lists.
///
/// Derived on demand; rebuild it after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedView {
    pub entries: Vec<PackView>,
    pub dangling: Vec<DanglingRef>,
}

impl CombinedView {
    /// Join `packs` with the activation lists of `registry`.
    pub fn build(packs: Vec<InstalledPack>, registry: &WorldRegistry) -> ManagerResult<Self> {
        let mut view = Self::default();

        for pack_type in PackType::ALL {
            let activation = registry.read_entries(pack_type)?;

            for entry in &activation {
                let installed = packs
                    .iter()
                    .any(|p| p.pack_type == pack_type && p.matches_id(entry.pack_id()));
                if !installed {
                    tracing::warn!(
                        pack_id = entry.pack_id(),
                        pack_type = %pack_type,
                        world = registry.world_name(),
                        "Activation entry references a pack that is not installed"
                    );
                    view.dangling.push(DanglingRef {
                        pack_type,
                        pack_id: entry.pack_id().to_string(),
                        version: entry.version(),
                    });
                }
            }

            for pack in packs.iter().filter(|p| p.pack_type == pack_type) {
                let active = activation.iter().any(|e| e.references(&pack.id));
                view.entries.push(PackView {
                    pack: pack.clone(),
                    active,
                });
            }
        }

        Ok(view)
    }

    /// Entries passing `filter`, in view order.
    pub fn filtered(&self, filter: &PackFilter) -> Vec<&PackView> {
        self.entries.iter().filter(|v| filter.matches(v)).collect()
    }

    /// Entries of one type.
    pub fn of_type(&self, pack_type: PackType) -> impl Iterator<Item = &PackView> {
        self.entries
            .iter()
            .filter(move |v| v.pack.pack_type == pack_type)
    }

    /// Number of active entries.
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|v| v.active).count()
    }
}

/// Active-state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    fn matches(&self, active: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => active,
            Self::Inactive => !active,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Filters for the manage listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackFilter {
    pub pack_type: Option<PackType>,
    pub status: StatusFilter,
    /// Case-insensitive substring of the name or pack id.
    pub text: Option<String>,
}

impl PackFilter {
    /// A filter passing everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one type.
    pub fn with_type(mut self, pack_type: Option<PackType>) -> Self {
        self.pack_type = pack_type;
        self
    }

    /// Restrict by active state.
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Restrict by text; blank text is no restriction.
    pub fn with_text(mut self, text: Option<&str>) -> Self {
        self.text = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        self
    }

    /// Whether a view entry passes.
    pub fn matches(&self, view: &PackView) -> bool {
        if let Some(t) = self.pack_type {
            if view.pack.pack_type != t {
                return false;
            }
        }
        if !self.status.matches(view.active) {
            return false;
        }
        match &self.text {
            Some(text) => {
                let text = text.to_lowercase();
                view.pack.name.to_lowercase().contains(&text)
                    || view.pack.id.to_lowercase().contains(&text)
                    || view.pack.folder_name().to_lowercase().contains(&text)
            }
            None => true,
        }
    }

    /// Whether the filter passes everything.
    pub fn is_unrestricted(&self) -> bool {
        self.pack_type.is_none() && self.status == StatusFilter::All && self.text.is_none()
    }
}
