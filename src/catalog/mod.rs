//! Per-cycle catalog of purchasable entries
//!
//! Rebuilt from a fresh scan every planning cycle. Handles price derivation,
//! virtual entry synthesis, the consistency passes and purchase propagation.

pub mod entry;
pub mod filters;
pub mod scan;
pub mod table;

pub use entry::CatalogEntry;
pub use scan::{ScanResult, ScanRow};
pub use table::{Catalog, CatalogContext};
