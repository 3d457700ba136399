//! Skill Planner - budgeted skill purchase planning
//!
//! A reference table of versioned skills is indexed into upgrade chains once
//! per process. Each planning cycle turns a screen scan into a catalog,
//! derives prices and discounts, and spends the point budget according to the
//! selected strategy.

pub mod catalog;
pub mod chain;
pub mod core;
pub mod plan;
pub mod reference;

pub use catalog::{Catalog, CatalogContext, CatalogEntry, ScanResult, ScanRow};
pub use chain::{Chain, ChainIndex};
pub use crate::core::{Diagnostic, PlanError, PlannerConfig, Result};
pub use plan::{PlanSettings, Planner, Purchase, PurchaseList, Strategy};
pub use reference::{ReferenceRecord, ReferenceStore};
