//! Installed packs and the combined installed × active view.

mod scan;
mod view;

pub use scan::{InventoryScan, PackInventory, UnresolvedPack};
pub use view::{CombinedView, DanglingRef, PackFilter, PackView, StatusFilter};
