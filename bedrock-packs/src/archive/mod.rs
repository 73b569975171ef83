//! Archive extraction into a server-local scratch area.
//!
//! # Overview
//!
//! Add-ons ship as `.zip`, `.mcpack` or `.mcaddon` files. All three are zip
//! containers; an `.mcaddon` usually holds one `.mcpack` per pack.
//!
//! Extraction runs in three steps:
//!
//! 1. **Pre-check**: the declared uncompressed sizes are summed and compared
//!    against the free space of the scratch root before anything is written.
//! 2. **Unpack**: the archive is unpacked into a fresh [`ScratchArea`], and
//!    nested archives are expanded in place, each into its own folder.
//! 3. **Discover**: pack roots are located in the staged tree.
//!
//! The scratch area lives under the server root (`.tmp_addon_extract/` by
//! default) rather than the system temp directory, and is removed when the
//! [`StagedArchive`] is dropped or extraction fails.

mod discover;
mod extract;
mod format;
mod scratch;
mod space;

pub use discover::{discover_packs, StagedPack, MAX_DISCOVERY_DEPTH};
pub use extract::{ArchiveExtractor, StagedArchive, ZipExtractor, MAX_NESTING};
pub use format::ArchiveFormat;
pub use scratch::ScratchArea;
pub use space::{FixedSpace, SpaceProbe, StatvfsProbe};

pub(crate) use discover::{folder_name, sorted_subdirs};
