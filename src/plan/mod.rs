//! Purchase planning
//!
//! `Planner::allocate` is the single entry point: shared passes first, then
//! the selected strategy, all simulated on the caller's catalog.

pub mod allocation;
pub mod purchase;
pub mod settings;
pub mod strategies;

pub use allocation::{Allocation, Planner};
pub use purchase::{Purchase, PurchaseList};
pub use settings::{PlanSettings, Preferences, Strategy, TraineeProfile};
