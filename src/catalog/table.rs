//! The per-cycle catalog
//!
//! Entries live in an arena in on-screen order and point at their chain
//! neighbors by index. Everything that depends on a neighbor (price,
//! discount, evaluation) is derived on demand, so purchases only flip flags
//! and shown prices and the rest follows.

use ahash::AHashMap;
use std::sync::Arc;

use crate::catalog::entry::CatalogEntry;
use crate::catalog::scan::ScanResult;
use crate::chain::ChainIndex;
use crate::core::config::PlannerConfig;
use crate::core::error::{Diagnostic, PlanError, Result};
use crate::core::types::Points;
use crate::reference::record::ReferenceRecord;
use crate::reference::store::ReferenceStore;

/// Process-lifetime data every catalog is built against
#[derive(Debug, Clone)]
pub struct CatalogContext {
    pub store: Arc<ReferenceStore>,
    pub chains: Arc<ChainIndex>,
    pub config: Arc<PlannerConfig>,
}

impl CatalogContext {
    /// Index chains for a store
    pub fn new(store: ReferenceStore, config: PlannerConfig) -> Self {
        let store = store.with_fuzzy_threshold(config.fuzzy_match_threshold);
        let chains = ChainIndex::build(&store);
        Self {
            store: Arc::new(store),
            chains: Arc::new(chains),
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    context: CatalogContext,
    entries: Vec<CatalogEntry>,
    by_name: AHashMap<String, usize>,
    /// Remaining points
    budget: Points,
    /// Rows in the scan this catalog was built from, resolved or not
    scanned_rows: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Catalog {
    pub fn new(context: CatalogContext, budget: Points) -> Self {
        Self {
            context,
            entries: Vec::new(),
            by_name: AHashMap::new(),
            budget,
            scanned_rows: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Populate from a scan, then synthesize virtual entries and run the consistency passes
    pub fn from_scan(context: CatalogContext, scan: &ScanResult, budget: Points) -> Result<Self> {
        if scan.is_empty() {
            return Err(PlanError::IncompleteScan("scan produced no rows".into()));
        }

        let mut catalog = Self::new(context, budget);
        catalog.scanned_rows = scan.len();
        for (row, scanned) in scan.rows.iter().enumerate() {
            let Some(record) = catalog.context.store.resolve(&scanned.name).cloned() else {
                tracing::warn!("Skipping unresolved scan row \"{}\"", scanned.name);
                catalog
                    .diagnostics
                    .push(Diagnostic::UnresolvedName(scanned.name.clone()));
                continue;
            };

            if catalog.by_name.contains_key(&record.name) {
                tracing::warn!("Skipping duplicate scan row \"{}\"", record.name);
                catalog
                    .diagnostics
                    .push(Diagnostic::DuplicateRow(record.name.clone()));
                continue;
            }

            let mut entry = CatalogEntry::new(record, row, 0);
            let (price, rejected) = entry.bounded_price(scanned.price, &catalog.context.config);
            if rejected && !scanned.obtained {
                if let (Some(observed), Some(min), Some(max)) = (
                    scanned.price,
                    entry.min_screen_price(&catalog.context.config),
                    entry.max_screen_price(),
                ) {
                    tracing::warn!(
                        "Price {} for \"{}\" outside [{}, {}], using {}",
                        observed,
                        entry.name(),
                        min,
                        max,
                        price
                    );
                    catalog.diagnostics.push(Diagnostic::PriceOutOfBounds {
                        name: entry.name().to_string(),
                        observed,
                        min,
                        max,
                        used: price,
                    });
                }
            }
            entry.observed_price = price;
            entry.screen_price = price;
            entry.obtained = scanned.obtained;

            catalog.push(entry);
        }

        catalog.link();
        catalog.synthesize_virtual();
        catalog.refresh();

        tracing::debug!(
            "Catalog populated: {} entries from {} scan rows, budget {}",
            catalog.len(),
            scan.len(),
            catalog.budget
        );
        Ok(catalog)
    }

    fn push(&mut self, entry: CatalogEntry) -> usize {
        let idx = self.entries.len();
        self.by_name.insert(entry.name().to_string(), idx);
        self.entries.push(entry);
        idx
    }

    /// Point every entry at its present chain neighbors
    fn link(&mut self) {
        for idx in 0..self.entries.len() {
            let name = self.entries[idx].name().to_string();
            let prev = self
                .context
                .chains
                .direct_downgrade(&name)
                .and_then(|n| self.by_name.get(n).copied());
            let next = self
                .context
                .chains
                .direct_upgrade(&name)
                .and_then(|n| self.by_name.get(n).copied());
            let entry = &mut self.entries[idx];
            entry.prev = prev;
            entry.next = next;
        }
    }

    /// Add an inferred entry; returns the existing index when the name is already present
    pub fn insert_virtual(&mut self, record: Arc<ReferenceRecord>, screen_price: Points) -> usize {
        if let Some(&idx) = self.by_name.get(&record.name) {
            return idx;
        }
        let row = self
            .entries
            .iter()
            .map(|entry| entry.row + 1)
            .max()
            .unwrap_or(0)
            .max(self.scanned_rows);
        let mut entry = CatalogEntry::new(record, row, screen_price);
        entry.is_virtual = true;
        tracing::debug!(
            "Synthesized virtual entry \"{}\" at {}",
            entry.name(),
            screen_price
        );
        let idx = self.push(entry);
        self.link();
        idx
    }

    /// Price of the next in-place rung given the discount unlocked below it
    pub fn upgrade_price(&self, record: &ReferenceRecord, discount: f64) -> Points {
        let base = record.base_cost.unwrap_or(0) as f64;
        ceil_points(base * (1.0 - discount))
    }

    /// Add the direct upgrade of every obtained in-place entry that the scan did not show
    pub fn synthesize_virtual(&mut self) {
        let owners: Vec<usize> = (0..self.entries.len())
            .filter(|&idx| {
                let entry = &self.entries[idx];
                entry.obtained && entry.is_in_place()
            })
            .collect();

        for owner in owners {
            let Some(upgrade) = self.context.chains.direct_upgrade(self.entries[owner].name()) else {
                continue;
            };
            if self.by_name.contains_key(upgrade) {
                continue;
            }
            let Some(record) = self.context.store.get(upgrade).cloned() else {
                continue;
            };
            let price = self.upgrade_price(&record, self.discount(owner));
            self.insert_virtual(record, price);
        }
    }

    /// Evaluation-value and base-price consistency passes
    pub fn refresh(&mut self) {
        let mut updates = Vec::with_capacity(self.entries.len());
        for idx in 0..self.entries.len() {
            let entry = &self.entries[idx];
            let lower = self.present_downgrades(idx);
            if entry.obtained || entry.is_virtual || entry.is_in_place() || lower.is_empty() {
                updates.push((None, None));
                continue;
            }

            let unpurchased = lower.iter().copied().filter(|&d| self.entries[d].is_available());
            let evaluation = unpurchased
                .clone()
                .filter(|&d| !self.entries[d].record.is_negative())
                .map(|d| self.entries[d].record.evaluation_value)
                .sum::<i32>();
            let price = unpurchased.map(|d| self.price(d)).sum::<Points>();
            updates.push((Some(evaluation), Some(price)));
        }

        for (entry, (evaluation, price)) in self.entries.iter_mut().zip(updates) {
            entry.combined_evaluation = evaluation;
            entry.combined_price = price;
        }
    }

    /// Present lower versions of an entry, lowest first
    pub fn present_downgrades(&self, idx: usize) -> Vec<usize> {
        self.context
            .chains
            .all_downgrades(self.entries[idx].name())
            .into_iter()
            .filter_map(|name| self.by_name.get(name).copied())
            .collect()
    }

    /// Present higher versions of an entry, closest first
    pub fn present_upgrades(&self, idx: usize) -> Vec<usize> {
        self.context
            .chains
            .all_upgrades(self.entries[idx].name())
            .into_iter()
            .filter_map(|name| self.by_name.get(name).copied())
            .collect()
    }

    // ------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------

    /// Own price of the row, without any unpurchased lower version folded in
    pub fn price(&self, idx: usize) -> Points {
        let entry = &self.entries[idx];
        match entry.prev {
            Some(prev) if !entry.is_in_place() && self.entries[prev].is_available() => {
                let own = entry.screen_price as i64 - self.price(prev) as i64;
                own.clamp(0, self.context.config.multi_row_price_cap as i64) as Points
            }
            _ => entry.screen_price,
        }
    }

    /// Discount implied by the price, snapped to the ladder
    pub fn discount(&self, idx: usize) -> f64 {
        match self.entries[idx].record.base_cost {
            Some(base) if base > 0 => {
                let raw = 1.0 - self.price(idx) as f64 / base as f64;
                self.context.config.snap_discount(raw)
            }
            _ => 0.0,
        }
    }

    /// Price before the discount was applied
    pub fn raw_price(&self, idx: usize) -> Points {
        let factor = 1.0 - self.discount(idx);
        ceil_points(self.price(idx) as f64 / factor)
    }

    /// Price plus every unpurchased lower row needed to reach this version
    pub fn baseline_price(&self, idx: usize) -> Points {
        self.price(idx) + self.entries[idx].combined_price.unwrap_or(0)
    }

    pub fn evaluation_value(&self, idx: usize) -> f64 {
        let entry = &self.entries[idx];
        let lower = match (entry.combined_evaluation, entry.prev) {
            (Some(combined), _) => combined,
            (None, Some(prev)) if self.entries[prev].is_available() => {
                self.entries[prev].record.evaluation_value
            }
            _ => 0,
        };
        (entry.record.evaluation_value + lower) as f64 * entry.evaluation_modifier
    }

    /// Evaluation per point shown; free rows with value rank first
    pub fn evaluation_ratio(&self, idx: usize) -> f64 {
        let value = self.evaluation_value(idx);
        match self.entries[idx].screen_price {
            0 if value > 0.0 => f64::INFINITY,
            0 => 0.0,
            price => value / price as f64,
        }
    }

    /// Set the aptitude multiplier of every entry
    pub fn apply_modifiers(&mut self, modifier: impl Fn(&ReferenceRecord) -> f64) {
        for entry in &mut self.entries {
            entry.evaluation_modifier = modifier(&entry.record);
        }
    }

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    /// Simulate buying an entry; returns the points charged
    pub fn buy(&mut self, idx: usize) -> Points {
        let cost = self.entries[idx].screen_price;
        tracing::debug!(
            "Buying \"{}\" for {} (price {}, discount {:.0}%)",
            self.entries[idx].name(),
            cost,
            self.price(idx),
            self.discount(idx) * 100.0
        );

        if self.entries[idx].is_in_place() {
            self.buy_in_place(idx);
        } else {
            self.buy_multi_row(idx);
        }

        self.budget = self.budget.saturating_sub(cost);
        self.refresh();
        cost
    }

    fn buy_in_place(&mut self, idx: usize) {
        let discount = self.discount(idx);
        self.entries[idx].obtained = true;

        if let Some(prev) = self.entries[idx].prev {
            self.entries[prev].is_virtual = true;
            tracing::debug!("\"{}\" replaced in place", self.entries[prev].name());
        }

        match self.entries[idx].next {
            Some(next) if !self.entries[next].obtained => {
                let price = self.upgrade_price(&self.entries[next].record, discount);
                let entry = &mut self.entries[next];
                entry.observed_price = price;
                entry.screen_price = price;
                tracing::debug!("Next rung \"{}\" now shows {}", entry.name(), price);
            }
            Some(_) => {}
            None => self.synthesize_virtual(),
        }
    }

    fn buy_multi_row(&mut self, idx: usize) {
        let reduction = self.price(idx);
        self.entries[idx].obtained = true;

        for lower in self.present_downgrades(idx) {
            if !self.entries[lower].obtained {
                self.entries[lower].obtained = true;
                tracing::debug!(
                    "\"{}\" obtained through \"{}\"",
                    self.entries[lower].name(),
                    self.entries[idx].name()
                );
            }
        }

        let cap = self.context.config.multi_row_price_cap;
        for higher in self.present_upgrades(idx) {
            let entry = &mut self.entries[higher];
            if entry.obtained {
                continue;
            }
            entry.apply_reduction(reduction, cap);
            tracing::debug!(
                "\"{}\" reduced by {}: {} -> {}",
                entry.name(),
                reduction,
                entry.observed_price,
                entry.screen_price
            );
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn context(&self) -> &CatalogContext {
        &self.context
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.context.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> &CatalogEntry {
        &self.entries[idx]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index_of(name).map(|idx| &self.entries[idx])
    }

    pub fn budget(&self) -> Points {
        self.budget
    }

    pub fn set_budget(&mut self, budget: Points) {
        self.budget = budget;
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Dump the entry table at debug level
    pub fn log_entries(&self, verbose: bool) {
        tracing::debug!("Catalog ({} entries, budget {}):", self.len(), self.budget);
        for (idx, entry) in self.entries.iter().enumerate() {
            if !verbose && entry.obtained {
                continue;
            }
            tracing::debug!(
                "  {} -> price(shown): {}({}), discount: {:.0}%, value(ratio): {:.0}({:.2}) [{}]",
                entry.name(),
                self.price(idx),
                entry.screen_price,
                self.discount(idx) * 100.0,
                self.evaluation_value(idx),
                self.evaluation_ratio(idx),
                entry.flag_summary()
            );
            if verbose {
                tracing::debug!(
                    "      raw: {}, baseline: {}, observed: {}, reduced by: {}",
                    self.raw_price(idx),
                    self.baseline_price(idx),
                    entry.observed_price,
                    entry.applied_reduction
                );
            }
        }
    }
}

/// Round up, ignoring float noise such as `0.9 * 110 = 99.00000000000001`
fn ceil_points(value: f64) -> Points {
    (value - 1e-9).ceil().max(0.0) as Points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::scan::ScanRow;

    fn context() -> CatalogContext {
        let store = ReferenceStore::from_records(vec![
            ReferenceRecord::new(1, "Recovery ○", Some(100), 150)
                .in_place()
                .with_upgrade(2),
            ReferenceRecord::new(2, "Maestro", Some(200), 400)
                .in_place()
                .with_downgrade(1),
            ReferenceRecord::new(10, "Firm Conditions ×", Some(70), 20).with_upgrade(11),
            ReferenceRecord::new(11, "Firm Conditions ○", Some(110), 180).with_downgrade(10),
            ReferenceRecord::new(20, "Early Lead", Some(160), 200),
            ReferenceRecord::new(30, "Gate Jitters", Some(50), -40)
                .negative()
                .with_upgrade(31),
            ReferenceRecord::new(31, "Gate Calm", Some(120), 150).with_downgrade(30),
        ]);
        CatalogContext::new(store, PlannerConfig::default())
    }

    fn catalog(rows: Vec<ScanRow>) -> Catalog {
        Catalog::from_scan(context(), &ScanResult::new(rows), 1000).unwrap()
    }

    #[test]
    fn test_empty_scan_is_incomplete() {
        let err = Catalog::from_scan(context(), &ScanResult::default(), 100).unwrap_err();
        assert!(matches!(err, PlanError::IncompleteScan(_)));
    }

    #[test]
    fn test_multi_row_price_subtracts_lower_row() {
        let catalog = catalog(vec![
            ScanRow::new("Firm Conditions ×", 70),
            ScanRow::new("Firm Conditions ○", 150),
        ]);
        let lower = catalog.index_of("Firm Conditions ×").unwrap();
        let upper = catalog.index_of("Firm Conditions ○").unwrap();
        assert_eq!(catalog.entry(upper).prev, Some(lower));
        assert_eq!(catalog.entry(lower).next, Some(upper));
        assert_eq!(catalog.price(upper), 80);
        assert_eq!(catalog.discount(upper), 0.3);
        assert_eq!(catalog.raw_price(upper), 115);
        assert_eq!(catalog.entry(upper).combined_evaluation, Some(20));
        assert_eq!(catalog.entry(upper).combined_price, Some(70));
        assert_eq!(catalog.evaluation_value(upper), 200.0);
        assert_eq!(catalog.baseline_price(upper), 150);
    }

    #[test]
    fn test_out_of_bounds_price_falls_back() {
        let catalog = catalog(vec![ScanRow::new("Early Lead", 20)]);
        let idx = catalog.index_of("Early Lead").unwrap();
        assert_eq!(catalog.entry(idx).screen_price, 320);
        assert_eq!(catalog.discount(idx), 0.0);
        assert!(matches!(
            catalog.diagnostics()[0],
            Diagnostic::PriceOutOfBounds { observed: 20, used: 320, .. }
        ));
    }

    #[test]
    fn test_unresolved_and_duplicate_rows_skipped() {
        let catalog = catalog(vec![
            ScanRow::new("Xyzzy Unknown Skill", 100),
            ScanRow::new("Early Lead", 120),
            ScanRow::new("Early Lead", 120),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.diagnostics(),
            &[
                Diagnostic::UnresolvedName("Xyzzy Unknown Skill".into()),
                Diagnostic::DuplicateRow("Early Lead".into()),
            ]
        );
    }

    #[test]
    fn test_obtained_in_place_entry_synthesizes_upgrade() {
        let catalog = catalog(vec![ScanRow::obtained("Recovery ○")]);
        let maestro = catalog.index_of("Maestro").unwrap();
        let entry = catalog.entry(maestro);
        assert!(entry.is_virtual);
        assert!(!entry.is_available());
        assert_eq!(entry.screen_price, 200);
        assert_eq!(entry.prev, catalog.index_of("Recovery ○"));
    }

    #[test]
    fn test_virtual_entry_rows_follow_the_scan() {
        let mut catalog = catalog(vec![
            ScanRow::new("Xyzzy Unknown Skill", 100),
            ScanRow::obtained("Recovery ○"),
            ScanRow::new("Early Lead", 160),
        ]);
        let maestro = catalog.index_of("Maestro").unwrap();
        assert_eq!(catalog.entry(maestro).row, 3);

        let extra = catalog.context().store.get("Firm Conditions ×").cloned().unwrap();
        let idx = catalog.insert_virtual(extra, 70);
        assert_eq!(catalog.entry(idx).row, 4);

        let rows: Vec<usize> = catalog.entries().iter().map(|entry| entry.row).collect();
        assert_eq!(rows, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_in_place_purchase_prices_next_rung() {
        let mut catalog = catalog(vec![ScanRow::new("Recovery ○", 70)]);
        let recovery = catalog.index_of("Recovery ○").unwrap();
        assert_eq!(catalog.discount(recovery), 0.3);

        let cost = catalog.buy(recovery);
        assert_eq!(cost, 70);
        assert_eq!(catalog.budget(), 930);

        let maestro = catalog.index_of("Maestro").unwrap();
        assert_eq!(catalog.entry(maestro).screen_price, 140);
        assert!(catalog.entry(maestro).is_virtual);

        catalog.buy(maestro);
        assert!(catalog.entry(maestro).obtained);
        assert!(catalog.entry(recovery).is_virtual);
    }

    #[test]
    fn test_multi_row_purchase_propagates() {
        let mut catalog = catalog(vec![
            ScanRow::new("Firm Conditions ×", 70),
            ScanRow::new("Firm Conditions ○", 150),
        ]);
        let lower = catalog.index_of("Firm Conditions ×").unwrap();
        let upper = catalog.index_of("Firm Conditions ○").unwrap();

        catalog.buy(lower);
        assert_eq!(catalog.entry(upper).screen_price, 80);
        assert_eq!(catalog.price(upper), 80);
        assert_eq!(catalog.entry(upper).combined_evaluation, Some(0));

        let mut catalog = catalog_with_both();
        let lower = catalog.index_of("Firm Conditions ×").unwrap();
        let upper = catalog.index_of("Firm Conditions ○").unwrap();
        catalog.buy(upper);
        assert!(catalog.entry(lower).obtained);
    }

    #[test]
    fn test_negative_lower_row_adds_no_evaluation() {
        let catalog = catalog(vec![
            ScanRow::new("Gate Jitters", 50),
            ScanRow::new("Gate Calm", 170),
        ]);
        let upper = catalog.index_of("Gate Calm").unwrap();
        assert_eq!(catalog.entry(upper).combined_evaluation, Some(0));
        assert_eq!(catalog.evaluation_value(upper), 150.0);
        assert_eq!(catalog.entry(upper).combined_price, Some(50));
        assert_eq!(catalog.price(upper), 120);
        assert_eq!(catalog.baseline_price(upper), 170);
    }

    #[test]
    fn test_virtual_lower_row_adds_no_price() {
        let mut catalog = catalog(vec![ScanRow::new("Firm Conditions ○", 150)]);
        let upper = catalog.index_of("Firm Conditions ○").unwrap();
        assert_eq!(catalog.entry(upper).combined_price, None);

        let lower = catalog.context().store.get("Firm Conditions ×").cloned().unwrap();
        let lower = catalog.insert_virtual(lower, 70);
        catalog.refresh();
        assert_eq!(catalog.entry(upper).prev, Some(lower));
        assert_eq!(catalog.entry(upper).combined_price, Some(0));
        assert_eq!(catalog.entry(upper).combined_evaluation, Some(0));
        assert_eq!(catalog.price(upper), 150);
        assert_eq!(catalog.baseline_price(upper), 150);
    }

    fn catalog_with_both() -> Catalog {
        catalog(vec![
            ScanRow::new("Firm Conditions ×", 70),
            ScanRow::new("Firm Conditions ○", 150),
        ])
    }

    #[test]
    fn test_modifiers_scale_evaluation() {
        let mut catalog = catalog(vec![ScanRow::new("Early Lead", 160)]);
        catalog.apply_modifiers(|_| 1.1);
        let idx = catalog.index_of("Early Lead").unwrap();
        assert!((catalog.evaluation_value(idx) - 220.0).abs() < 1e-9);
        assert!((catalog.evaluation_ratio(idx) - 220.0 / 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_ceil_points_ignores_float_noise() {
        assert_eq!(ceil_points(110.0 * 0.9), 99);
        assert_eq!(ceil_points(63.0 / 0.9), 70);
        assert_eq!(ceil_points(99.2), 100);
        assert_eq!(ceil_points(-3.0), 0);
    }
}
