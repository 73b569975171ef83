//! Pack identity types and naming conventions.
//!
//! # Overview
//!
//! A Bedrock add-on is shipped as one or more packs. Each pack is either a
//! behavior pack or a resource pack and is identified by the `header.uuid`
//! of its `manifest.json`.
//!
//! - **PackIdentity**: Core identity (id, type, name, version)
//! - **InstalledPack**: Extends PackIdentity with the owning directory
//! - **PackType / PackVersion**: Value types shared with manifests and
//!   world activation files
//!
//! # Type Hierarchy
//!
//! ```text
//! PackIdentity (base)               InstalledPack (composition)
//! ├── id: String                    ├── identity: PackIdentity  ←── contains
//! ├── pack_type: PackType           └── directory: PathBuf
//! ├── name: String
//! └── version: PackVersion
//! ```

mod core;
mod installed;
mod naming;
mod types;

pub use self::core::{pack_ids_match, PackIdentity};
pub use installed::InstalledPack;
pub use types::{PackType, PackVersion};

pub use naming::{
    has_type_marker, is_system_pack, normalize_folder_name, type_hint_from_name, unique_folder,
};
