//! Reference data - every known skill, loaded once per process

pub mod conditions;
pub mod loader;
pub mod record;
pub mod store;

pub use conditions::ActivationProfile;
pub use loader::{load_reference_table, parse_reference_json, parse_reference_toml, LoadedTable};
pub use record::{CategoryFlags, ReferenceRecord};
pub use store::ReferenceStore;
