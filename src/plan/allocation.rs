//! Budget allocation
//!
//! Every plan runs the same three shared passes (negative skills, inherited
//! unique skills, user targets) before the strategy pass. Purchases are
//! simulated on the catalog as they are chosen, so chain propagation
//! decides what the later passes still see as available.

use crate::catalog::{Catalog, CatalogContext, ScanResult};
use crate::chain::ChainIndex;
use crate::core::config::PlannerConfig;
use crate::core::error::{Diagnostic, PlanError, Result};
use crate::core::types::Points;
use crate::plan::purchase::{Purchase, PurchaseList};
use crate::plan::settings::PlanSettings;
use crate::reference::store::ReferenceStore;

/// Builds catalogs and plans purchases against one reference table
#[derive(Debug, Clone)]
pub struct Planner {
    context: CatalogContext,
}

impl Planner {
    pub fn new(store: ReferenceStore, config: PlannerConfig) -> Self {
        Self {
            context: CatalogContext::new(store, config),
        }
    }

    pub fn from_context(context: CatalogContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &CatalogContext {
        &self.context
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.context.store
    }

    pub fn chains(&self) -> &ChainIndex {
        &self.context.chains
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.context.config
    }

    /// Build this cycle's catalog from a scan
    pub fn catalog(&self, scan: &ScanResult, budget: Points) -> Result<Catalog> {
        Catalog::from_scan(self.context.clone(), scan, budget)
    }

    /// Plan purchases, simulating each one on `catalog`
    ///
    /// Never fails: an internal invariant violation abandons the plan and
    /// yields an empty list.
    pub fn allocate(&self, catalog: &mut Catalog, budget: Points, settings: &PlanSettings) -> PurchaseList {
        match self.try_allocate(catalog, budget, settings) {
            Ok(list) => list,
            Err(err) => {
                tracing::error!("Abandoning plan: {}", err);
                PurchaseList::new(budget)
            }
        }
    }

    /// Plan against a copy, leaving `catalog` untouched
    pub fn preview(&self, catalog: &Catalog, budget: Points, settings: &PlanSettings) -> PurchaseList {
        let mut scratch = catalog.clone();
        self.allocate(&mut scratch, budget, settings)
    }

    /// One full cycle: population, synthesis, consistency passes, allocation
    ///
    /// `budget` overrides the budget read by the scanner.
    pub fn plan_cycle(
        &self,
        scan: &ScanResult,
        budget: Option<Points>,
        settings: &PlanSettings,
    ) -> Result<PurchaseList> {
        let budget = budget.or(scan.budget).unwrap_or(0);
        let mut catalog = match self.catalog(scan, budget) {
            Ok(catalog) => catalog,
            Err(PlanError::IncompleteScan(reason)) => {
                tracing::warn!("No catalog this cycle: {}", reason);
                return Ok(PurchaseList::new(budget));
            }
            Err(err) => return Err(err),
        };
        catalog.log_entries(false);
        self.try_allocate(&mut catalog, budget, settings)
    }

    fn try_allocate(
        &self,
        catalog: &mut Catalog,
        budget: Points,
        settings: &PlanSettings,
    ) -> Result<PurchaseList> {
        catalog.set_budget(budget);
        if settings.is_noop() {
            tracing::debug!("Plan disabled or has nothing to do");
            return Ok(PurchaseList::new(budget));
        }

        let config = self.context.config.clone();
        catalog.apply_modifiers(|record| settings.trainee.evaluation_modifier(&record.activation, &config));

        let mut allocation = Allocation::new(catalog, settings);
        if settings.buy_negative {
            allocation.buy_negative();
        }
        if settings.buy_inherited_unique {
            allocation.buy_inherited_unique();
        }
        allocation.satisfy_targets()?;
        settings.strategy.run(&mut allocation);

        let list = allocation.finish();
        if list.total_cost > budget {
            return Err(PlanError::Invariant(format!(
                "planned {} points against a budget of {}",
                list.total_cost, budget
            )));
        }

        tracing::info!(
            "Planned {} purchases for {}/{} points ({:?})",
            list.len(),
            list.total_cost,
            budget,
            settings.strategy
        );
        for purchase in list.iter() {
            tracing::info!("  {} ({}pt)", purchase.name, purchase.cost);
        }
        Ok(list)
    }
}

/// In-progress plan over a mutable catalog
pub struct Allocation<'a> {
    pub(crate) catalog: &'a mut Catalog,
    pub(crate) settings: &'a PlanSettings,
    list: PurchaseList,
}

impl<'a> Allocation<'a> {
    pub fn new(catalog: &'a mut Catalog, settings: &'a PlanSettings) -> Self {
        let list = PurchaseList::new(catalog.budget());
        Self {
            catalog,
            settings,
            list,
        }
    }

    pub fn remaining(&self) -> Points {
        self.catalog.budget()
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// Available and within the remaining budget
    pub fn affordable(&self, idx: usize) -> bool {
        let entry = self.catalog.entry(idx);
        entry.is_available() && entry.screen_price <= self.remaining()
    }

    /// Buy an entry if it is still affordable; returns whether it was bought
    pub fn try_buy(&mut self, idx: usize) -> bool {
        if !self.affordable(idx) {
            return false;
        }
        let name = self.catalog.entry(idx).name().to_string();
        let cost = self.catalog.buy(idx);
        self.list.push(Purchase::single(name, cost));
        true
    }

    pub fn buy_negative(&mut self) {
        for idx in self.catalog.negative(false) {
            if self.try_buy(idx) {
                tracing::debug!("Negative: bought \"{}\"", self.catalog.entry(idx).name());
            }
        }
    }

    pub fn buy_inherited_unique(&mut self) {
        for idx in self.catalog.inherited_unique(false) {
            if self.try_buy(idx) {
                tracing::debug!("Inherited unique: bought \"{}\"", self.catalog.entry(idx).name());
            }
        }
    }

    /// Acquire every user target that can be reached within budget
    pub fn satisfy_targets(&mut self) -> Result<()> {
        let settings = self.settings;
        for target in &settings.targets {
            let Some(record) = self.catalog.context().store.resolve(target).cloned() else {
                tracing::warn!("Target \"{}\" does not match any known skill", target);
                self.catalog.report(Diagnostic::UnresolvedName(target.clone()));
                continue;
            };

            match self.catalog.index_of(&record.name) {
                Some(idx) if self.catalog.entry(idx).obtained => {
                    tracing::debug!("Target \"{}\" already obtained", record.name);
                }
                Some(idx) if self.catalog.entry(idx).is_available() => self.buy_highest_from(idx),
                _ => self.upgrade_in_place_to(&record.name)?,
            }
        }
        Ok(())
    }

    /// Buy the highest affordable version at or above a present target
    fn buy_highest_from(&mut self, idx: usize) {
        if !self.affordable(idx) {
            tracing::debug!(
                "Target \"{}\" unaffordable ({} > {})",
                self.catalog.entry(idx).name(),
                self.catalog.entry(idx).screen_price,
                self.remaining()
            );
            return;
        }

        let mut best = idx;
        for higher in self.catalog.present_upgrades(idx) {
            if !self.affordable(higher) {
                break;
            }
            best = higher;
        }
        self.try_buy(best);
    }

    /// Reach a target that is not shown by upgrading a lower in-place rung
    fn upgrade_in_place_to(&mut self, target: &str) -> Result<()> {
        let context = self.catalog.context().clone();
        let anchor = context
            .chains
            .all_downgrades(target)
            .into_iter()
            .rev()
            .find_map(|name| {
                let idx = self.catalog.index_of(name)?;
                let entry = self.catalog.entry(idx);
                (entry.is_available() || entry.obtained).then_some(idx)
            });
        let Some(anchor) = anchor else {
            tracing::debug!("Target \"{}\" not reachable from the catalog", target);
            return Ok(());
        };

        let anchor_name = self.catalog.entry(anchor).name().to_string();
        let path = context.chains.version_range(&anchor_name, target);
        let mut records = Vec::with_capacity(path.len());
        for name in &path {
            let record = context.store.get(name).cloned().ok_or_else(|| {
                PlanError::Invariant(format!("chain member \"{}\" missing from the reference table", name))
            })?;
            records.push(record);
        }
        if !records.iter().all(|record| record.is_in_place()) {
            tracing::debug!(
                "Target \"{}\" needs its own row; \"{}\" does not upgrade in place",
                target,
                anchor_name
            );
            return Ok(());
        }

        // Buy rung by rung on a scratch copy so each rung is priced from the one below
        let mut trial = self.catalog.clone();
        let mut charged: Points = 0;
        let mut rungs: u32 = 0;
        let mut below = anchor;
        for record in records {
            let idx = match trial.index_of(&record.name) {
                Some(idx) => idx,
                None => {
                    let price = trial.upgrade_price(&record, trial.discount(below));
                    trial.insert_virtual(record, price)
                }
            };
            below = idx;
            if trial.entry(idx).obtained {
                continue;
            }
            charged += trial.entry(idx).screen_price;
            if charged > self.remaining() {
                tracing::debug!(
                    "Target \"{}\" unaffordable via \"{}\" ({} > {})",
                    target,
                    anchor_name,
                    charged,
                    self.remaining()
                );
                return Ok(());
            }
            trial.buy(idx);
            rungs += 1;
        }

        if rungs == 0 {
            return Ok(());
        }
        tracing::debug!(
            "Target \"{}\": {} upgrades from \"{}\" for {}",
            target,
            rungs,
            anchor_name,
            charged
        );
        *self.catalog = trial;
        self.list.push(Purchase {
            name: target.to_string(),
            row: anchor_name,
            repeat_count: rungs,
            cost: charged,
        });
        Ok(())
    }

    pub fn finish(self) -> PurchaseList {
        self.list
    }
}
