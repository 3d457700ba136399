//! Catalog entries - one reference record bound to this cycle's observed state
//!
//! Values that depend on chain neighbors (price, discount, evaluation) live
//! on `Catalog`; an entry only knows its own row and flags.

use std::sync::Arc;

use crate::core::config::PlannerConfig;
use crate::core::types::Points;
use crate::reference::record::ReferenceRecord;

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub record: Arc<ReferenceRecord>,
    /// Position in the scan; synthesized entries sort after every scanned row
    pub row: usize,
    /// Price as accepted from the scan, before any propagation
    pub observed_price: Points,
    /// Price currently shown for this row
    pub screen_price: Points,
    /// Sum of lower-version purchases subtracted from `observed_price` this cycle
    pub applied_reduction: Points,
    pub obtained: bool,
    /// Inferred rather than observed
    pub is_virtual: bool,
    /// Neighbor entries in the same chain
    pub prev: Option<usize>,
    pub next: Option<usize>,
    /// Evaluation of unpurchased lower rows, set by the consistency pass
    pub combined_evaluation: Option<i32>,
    /// Price of unpurchased lower rows, set by the consistency pass
    pub combined_price: Option<Points>,
    /// Trainee aptitude multiplier on the evaluation value
    pub evaluation_modifier: f64,
}

impl CatalogEntry {
    pub fn new(record: Arc<ReferenceRecord>, row: usize, screen_price: Points) -> Self {
        Self {
            record,
            row,
            observed_price: screen_price,
            screen_price,
            applied_reduction: 0,
            obtained: false,
            is_virtual: false,
            prev: None,
            next: None,
            combined_evaluation: None,
            combined_price: None,
            evaluation_modifier: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn is_in_place(&self) -> bool {
        self.record.is_in_place()
    }

    pub fn is_available(&self) -> bool {
        !self.obtained && !self.is_virtual
    }

    /// Cheapest price the screen can legitimately show
    pub fn min_screen_price(&self, config: &PlannerConfig) -> Option<Points> {
        let base = self.record.base_cost?;
        Some((base as f64 * (1.0 - config.max_discount())).round() as Points)
    }

    /// In-place rows show only themselves; multi-row rows may include one lower version
    pub fn max_screen_price(&self) -> Option<Points> {
        let base = self.record.base_cost?;
        Some(if self.is_in_place() { base } else { base * 2 })
    }

    /// Accept a scanned price, falling back to the maximum when it is out of range
    ///
    /// Returns the price to use and whether the observed value was rejected.
    pub fn bounded_price(&self, observed: Option<Points>, config: &PlannerConfig) -> (Points, bool) {
        let (Some(min), Some(max)) = (self.min_screen_price(config), self.max_screen_price()) else {
            return (observed.unwrap_or(0), false);
        };
        match observed {
            Some(price) if (min..=max).contains(&price) => (price, false),
            Some(_) => (max, true),
            None => (max, false),
        }
    }

    /// Recompute the shown price from the observed one and all reductions so far
    pub fn apply_reduction(&mut self, amount: Points, cap: Points) {
        self.applied_reduction = self.applied_reduction.saturating_add(amount);
        self.screen_price = self
            .observed_price
            .saturating_sub(self.applied_reduction)
            .min(cap);
    }

    /// Short flag summary for log lines
    pub fn flag_summary(&self) -> String {
        let mut flags = Vec::new();
        if self.obtained {
            flags.push("obtained");
        }
        if self.is_virtual {
            flags.push("virtual");
        }
        if self.is_in_place() {
            flags.push("in-place");
        }
        if self.record.is_negative() {
            flags.push("negative");
        }
        if self.record.is_inherited_unique() {
            flags.push("inherited");
        }
        flags.join(",")
    }
}
