//! Strategy passes run after the shared passes

use ahash::AHashSet;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::core::types::CommunityTier;
use crate::plan::allocation::Allocation;
use crate::plan::settings::Strategy;

impl Strategy {
    pub fn run(self, allocation: &mut Allocation<'_>) {
        match self {
            Strategy::Default => {}
            Strategy::OptimizeBySkillValue => {
                optimize_by_skill_value(allocation);
                if allocation.settings.rank_fallback {
                    optimize_rank(allocation);
                }
            }
            Strategy::OptimizeRank => optimize_rank(allocation),
        }
    }
}

/// Entries matching the trainee preferences or independent of aptitude
fn preferred_candidates(allocation: &Allocation<'_>) -> Vec<usize> {
    let catalog = allocation.catalog();
    let preferences = allocation.settings.preferences;

    let mut candidates = catalog.aptitude_independent(preferences.running_style, false);
    if let Some(style) = preferences.running_style {
        candidates.extend(catalog.running_style(Some(style), false));
        candidates.extend(catalog.inferred_running_style(Some(style), false));
    }
    if let Some(distance) = preferences.track_distance {
        candidates.extend(catalog.track_distance(Some(distance), false));
    }
    if let Some(surface) = preferences.track_surface {
        candidates.extend(catalog.track_surface(Some(surface), false));
    }

    let mut seen = AHashSet::new();
    candidates.retain(|idx| seen.insert(*idx));
    candidates.sort_unstable();
    candidates.retain(|&idx| allocation.affordable(idx));
    candidates
}

/// Best community tier first, evaluation ratio within a tier
fn optimize_by_skill_value(allocation: &mut Allocation<'_>) {
    let max_iterations = allocation.catalog().config().max_iterations;
    for iteration in 0..max_iterations {
        let candidates = preferred_candidates(allocation);
        if candidates.is_empty() {
            break;
        }

        let mut tiers: BTreeMap<Reverse<CommunityTier>, Vec<usize>> = BTreeMap::new();
        for idx in candidates {
            if let Some(tier) = allocation.catalog().entry(idx).record.tier {
                tiers.entry(Reverse(tier)).or_default().push(idx);
            }
        }

        let mut bought = 0;
        for (Reverse(tier), mut group) in tiers {
            let catalog = allocation.catalog();
            group.sort_by_key(|&idx| Reverse(OrderedFloat(catalog.evaluation_ratio(idx))));
            tracing::debug!("Skill value pass {}, tier {}:", iteration, tier.name());
            for idx in group {
                log_candidate(allocation, idx);
                if allocation.try_buy(idx) {
                    bought += 1;
                }
            }
        }

        if bought == 0 {
            break;
        }
    }
}

/// Evaluation ratio across every available entry
fn optimize_rank(allocation: &mut Allocation<'_>) {
    let max_iterations = allocation.catalog().config().max_iterations;
    for iteration in 0..max_iterations {
        let mut candidates: Vec<usize> = allocation
            .catalog()
            .available()
            .into_iter()
            .filter(|&idx| allocation.affordable(idx))
            .collect();
        if candidates.is_empty() {
            break;
        }

        let catalog = allocation.catalog();
        candidates.sort_by_key(|&idx| {
            let entry = catalog.entry(idx);
            (
                Reverse(OrderedFloat(catalog.evaluation_ratio(idx))),
                entry.screen_price,
                entry.row,
            )
        });

        tracing::debug!("Rank pass {}:", iteration);
        let mut bought = 0;
        for idx in candidates {
            log_candidate(allocation, idx);
            if allocation.try_buy(idx) {
                bought += 1;
            }
        }
        if bought == 0 {
            break;
        }
    }
}

fn log_candidate(allocation: &Allocation<'_>, idx: usize) {
    let catalog = allocation.catalog();
    let entry = catalog.entry(idx);
    tracing::debug!(
        "  {} -> price(shown): {}({}), value(ratio): {:.0}({:.2})",
        entry.name(),
        catalog.price(idx),
        entry.screen_price,
        catalog.evaluation_value(idx),
        catalog.evaluation_ratio(idx)
    );
}
