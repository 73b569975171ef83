//! Manifest parsing, repair and synthesis.
//!
//! Every pack directory resolves to a [`PackIdentity`](crate::pack::PackIdentity).
//! A complete `manifest.json` is read as is. Incomplete manifests are
//! repaired, missing ones synthesized, and the result written back so that
//! the next scan of the same folder lands on the same identity without any
//! inference.
//!
//! Type inference is an explicit chain; the rule that matched is logged.
//!
//! | Step | Rule                            |
//! |------|---------------------------------|
//! | 1    | `modules[].type` in the manifest |
//! | 2    | Directory the pack was found in  |
//! | 3    | `BP`/`RP` markers in the name    |
//! | 4    | Characteristic content folders   |
//!
//! When no step decides, resolution fails with `AmbiguousType`.

mod heuristics;
mod model;
mod resolver;

pub use heuristics::ContentMarkers;
pub use model::{
    parse_version, Manifest, ManifestHeader, ManifestModule, DEFAULT_FORMAT_VERSION,
    DEFAULT_MIN_ENGINE_VERSION,
};
pub use resolver::{
    resolve, resolve_as, synthesize_id, ManifestOutcome, Resolution, TypeRule, MANIFEST_FILE,
};
