//! Property tests for catalog pricing, chain structure and allocation

use proptest::prelude::*;

use skill_planner::core::config::DISCOUNT_LADDER;
use skill_planner::core::types::CommunityTier;
use skill_planner::{
    ChainIndex, PlanSettings, Planner, PlannerConfig, ReferenceRecord, ReferenceStore, ScanResult,
    ScanRow, Strategy as PlanStrategy,
};

/// One generated skill: base cost, evaluation, scanned price, obtained,
/// in-place, linked to the previous skill, tier selector
type GenSkill = (u32, i32, Option<u32>, bool, bool, bool, usize);

fn gen_skill() -> impl Strategy<Value = GenSkill> {
    (
        20u32..300,
        -50i32..500,
        prop::option::of(0u32..700),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        0usize..5,
    )
}

fn tier(selector: usize) -> Option<CommunityTier> {
    [
        None,
        Some(CommunityTier::B),
        Some(CommunityTier::A),
        Some(CommunityTier::S),
        Some(CommunityTier::SS),
    ][selector]
}

/// Records chained where requested, every record shown as one scan row
fn build(skills: &[GenSkill]) -> (Planner, ScanResult) {
    let mut records: Vec<ReferenceRecord> = Vec::with_capacity(skills.len());
    let mut rows = Vec::with_capacity(skills.len());
    let mut chain_in_place = false;

    for (i, &(base, eval, price, obtained, in_place, linked, selector)) in skills.iter().enumerate() {
        let id = i as u32 + 1;
        let name = format!("Generated Skill {}", id);
        let linked = linked && i > 0;
        if !linked {
            chain_in_place = in_place;
        }

        let mut record = ReferenceRecord::new(id, &name, Some(base), eval);
        if let Some(tier) = tier(selector) {
            record = record.with_tier(tier);
        }
        if chain_in_place {
            record = record.in_place();
        }
        if linked {
            record = record.with_downgrade(id - 1);
            if let Some(previous) = records.last_mut() {
                previous.upgrade_id = Some(record.id);
            }
        }
        records.push(record);
        rows.push(ScanRow {
            name,
            price,
            obtained,
        });
    }

    let planner = Planner::new(ReferenceStore::from_records(records), PlannerConfig::default());
    (planner, ScanResult::new(rows))
}

fn settings(strategy_selector: u8) -> PlanSettings {
    let strategy = match strategy_selector % 3 {
        0 => PlanStrategy::Default,
        1 => PlanStrategy::OptimizeBySkillValue,
        _ => PlanStrategy::OptimizeRank,
    };
    PlanSettings {
        rank_fallback: strategy_selector % 2 == 0,
        ..PlanSettings::new(strategy)
    }
    .with_negative(true)
}

proptest! {
    #[test]
    fn test_discount_on_ladder(skills in prop::collection::vec(gen_skill(), 1..12)) {
        let (planner, scan) = build(&skills);
        let catalog = planner.catalog(&scan, 0).unwrap();
        for idx in 0..catalog.len() {
            let discount = catalog.discount(idx);
            prop_assert!(DISCOUNT_LADDER.contains(&discount), "discount {} off the ladder", discount);
        }
    }

    #[test]
    fn test_price_within_bounds_after_population(skills in prop::collection::vec(gen_skill(), 1..12)) {
        let (planner, scan) = build(&skills);
        let catalog = planner.catalog(&scan, 0).unwrap();
        for entry in catalog.entries() {
            let min = entry.min_screen_price(catalog.config()).unwrap();
            let max = entry.max_screen_price().unwrap();
            prop_assert!(
                (min..=max).contains(&entry.screen_price),
                "{} shows {} outside [{}, {}]",
                entry.name(),
                entry.screen_price,
                min,
                max
            );
        }
    }

    #[test]
    fn test_chain_walks_terminate(len in 1usize..10, order in Just((0..10u32).collect::<Vec<_>>()).prop_shuffle()) {
        let records = order
            .into_iter()
            .filter(|&i| (i as usize) < len)
            .map(|i| {
                let id = i + 1;
                let mut record = ReferenceRecord::new(id, format!("Rung {}", id), Some(100), 100);
                if i > 0 {
                    record = record.with_downgrade(id - 1);
                }
                if (i as usize) + 1 < len {
                    record = record.with_upgrade(id + 1);
                }
                record
            });
        let store = ReferenceStore::from_records(records);
        let chains = ChainIndex::build(&store);

        prop_assert!(chains.diagnostics().is_empty());
        prop_assert_eq!(chains.chains().len(), 1);
        let chain = &chains.chains()[0];
        prop_assert_eq!(chain.iter().count(), len);
        prop_assert_eq!(chain.iter_rev().count(), len);
        let forward: Vec<_> = chain.iter().map(|node| node.id).collect();
        let mut backward: Vec<_> = chain.iter_rev().map(|node| node.id).collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn test_purchase_obtains_lower_rows(len in 2usize..6, pick in any::<prop::sample::Index>()) {
        let skills: Vec<GenSkill> = (0..len)
            .map(|i| (100, 100, Some(150), false, false, i > 0, 2))
            .collect();
        let (planner, scan) = build(&skills);
        let mut catalog = planner.catalog(&scan, 10_000).unwrap();

        let idx = pick.index(catalog.len());
        let name = catalog.entry(idx).name().to_string();
        catalog.buy(idx);
        for lower in planner.chains().required_upgrades(&name) {
            prop_assert!(catalog.get(lower).unwrap().obtained, "{} not obtained", lower);
        }
    }

    #[test]
    fn test_plan_is_repeatable(
        skills in prop::collection::vec(gen_skill(), 1..12),
        budget in 0u32..2000,
        strategy in any::<u8>(),
    ) {
        let (planner, scan) = build(&skills);
        let catalog = planner.catalog(&scan, 0).unwrap();
        let settings = settings(strategy);

        let first = planner.preview(&catalog, budget, &settings);
        let second = planner.preview(&catalog, budget, &settings);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_budget_never_overspent(
        skills in prop::collection::vec(gen_skill(), 1..12),
        budget in 0u32..2000,
        strategy in any::<u8>(),
    ) {
        let (planner, scan) = build(&skills);
        let list = planner.plan_cycle(&scan, Some(budget), &settings(strategy)).unwrap();
        prop_assert!(list.total_cost <= budget);
        prop_assert_eq!(list.total_cost + list.remaining_budget, budget);
        let charged: u32 = list.iter().map(|purchase| purchase.cost).sum();
        prop_assert_eq!(charged, list.total_cost);
    }
}
