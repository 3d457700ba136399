//! Chain index - every reference record mapped to its place in a version chain
//!
//! Built once from the reference store by walking downgrade links to the
//! root and upgrade links to the tip. A record reached twice means the table
//! is cyclic or branching; the walk stops there and the problem is recorded,
//! leaving every other chain usable.

use ahash::{AHashMap, AHashSet};

use crate::chain::node::Chain;
use crate::core::error::Diagnostic;
use crate::core::types::SkillId;
use crate::reference::record::ReferenceRecord;
use crate::reference::store::ReferenceStore;

/// Chain number and position inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    chain: usize,
    index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ChainIndex {
    chains: Vec<Chain>,
    positions: AHashMap<String, Position>,
    diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Copy)]
enum Direction {
    Down,
    Up,
}

impl ChainIndex {
    pub fn build(store: &ReferenceStore) -> Self {
        let mut index = Self::default();
        let mut assigned: AHashSet<SkillId> = AHashSet::new();

        let mut records: Vec<_> = store.iter().collect();
        records.sort_by_key(|record| record.id);

        for record in records {
            if assigned.contains(&record.id) {
                continue;
            }

            let mut seen = AHashSet::new();
            seen.insert(record.id);

            let mut downgrades = index.walk(store, record, Direction::Down, &mut seen, &assigned);
            downgrades.reverse();
            let upgrades = index.walk(store, record, Direction::Up, &mut seen, &assigned);

            let mut chain = Chain::new();
            let chain_idx = index.chains.len();
            for member in downgrades
                .into_iter()
                .chain(std::iter::once(&**record))
                .chain(upgrades)
            {
                let position = chain.push(member.id, member.name.clone());
                assigned.insert(member.id);
                index.positions.insert(
                    member.name.clone(),
                    Position {
                        chain: chain_idx,
                        index: position,
                    },
                );
            }

            if chain.len() > 1 {
                tracing::debug!(
                    "Chain {}: {}",
                    chain_idx,
                    chain.names().collect::<Vec<_>>().join(" -> ")
                );
            }
            index.chains.push(chain);
        }

        tracing::debug!(
            "Built {} chains from {} records ({} problems)",
            index.chains.len(),
            store.len(),
            index.diagnostics.len()
        );
        index
    }

    /// Follow one link direction, closest version first
    fn walk<'a>(
        &mut self,
        store: &'a ReferenceStore,
        start: &'a ReferenceRecord,
        direction: Direction,
        seen: &mut AHashSet<SkillId>,
        assigned: &AHashSet<SkillId>,
    ) -> Vec<&'a ReferenceRecord> {
        let link = |record: &ReferenceRecord| match direction {
            Direction::Down => record.downgrade_id,
            Direction::Up => record.upgrade_id,
        };

        let mut found = Vec::new();
        let mut current = start;
        while let Some(next_id) = link(current) {
            let Some(next) = store.get_by_id(next_id) else {
                tracing::warn!("{} links to unknown record {}", current.id, next_id);
                self.diagnostics.push(Diagnostic::DanglingLink {
                    from: current.id,
                    to: next_id,
                });
                break;
            };

            if seen.contains(&next_id) || assigned.contains(&next_id) {
                let reason = if seen.contains(&next_id) {
                    "cycle in version links"
                } else {
                    "record already belongs to another chain"
                };
                tracing::error!(
                    "Malformed chain at \"{}\" ({}): {}",
                    next.name,
                    next_id,
                    reason
                );
                self.diagnostics.push(Diagnostic::MalformedChain {
                    id: next_id,
                    reason: reason.to_string(),
                });
                break;
            }

            seen.insert(next_id);
            found.push(&**next);
            current = &**next;
        }
        found
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// The chain a name belongs to
    pub fn chain_of(&self, name: &str) -> Option<&Chain> {
        let position = self.positions.get(name)?;
        self.chains.get(position.chain)
    }

    /// Zero-based position of a name within its chain
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).map(|position| position.index)
    }

    fn name_at(&self, chain: usize, index: usize) -> Option<&str> {
        self.chains
            .get(chain)?
            .node(index)
            .map(|node| node.name.as_str())
    }

    fn same_chain(&self, a: &str, b: &str) -> Option<(Position, Position)> {
        let pa = *self.positions.get(a)?;
        let pb = *self.positions.get(b)?;
        (pa.chain == pb.chain).then_some((pa, pb))
    }

    /// Every lower version, lowest first; these must be owned before `name`
    pub fn required_upgrades(&self, name: &str) -> Vec<&str> {
        self.all_downgrades(name)
    }

    pub fn direct_upgrade(&self, name: &str) -> Option<&str> {
        let position = self.positions.get(name)?;
        let node = self.chains.get(position.chain)?.node(position.index)?;
        self.name_at(position.chain, node.next?)
    }

    pub fn direct_downgrade(&self, name: &str) -> Option<&str> {
        let position = self.positions.get(name)?;
        let node = self.chains.get(position.chain)?.node(position.index)?;
        self.name_at(position.chain, node.prev?)
    }

    /// Every higher version, closest first
    pub fn all_upgrades(&self, name: &str) -> Vec<&str> {
        let mut result = Vec::new();
        let mut current = self.direct_upgrade(name);
        while let Some(upgrade) = current {
            result.push(upgrade);
            current = self.direct_upgrade(upgrade);
        }
        result
    }

    /// Every lower version, lowest first
    pub fn all_downgrades(&self, name: &str) -> Vec<&str> {
        let mut result = Vec::new();
        let mut current = self.direct_downgrade(name);
        while let Some(downgrade) = current {
            result.push(downgrade);
            current = self.direct_downgrade(downgrade);
        }
        result.reverse();
        result
    }

    /// The higher of two versions of the same skill
    pub fn compare_versions<'a>(&'a self, a: &'a str, b: &'a str) -> Option<&'a str> {
        let (pa, pb) = self.same_chain(a, b)?;
        let higher = if pa.index >= pb.index { pa } else { pb };
        self.name_at(higher.chain, higher.index)
    }

    /// Signed number of versions from `from` up to `to`
    pub fn version_delta(&self, from: &str, to: &str) -> Option<isize> {
        let (pa, pb) = self.same_chain(from, to)?;
        Some(pb.index as isize - pa.index as isize)
    }

    /// Inclusive path between two versions, lowest first, in either argument order
    pub fn version_range(&self, a: &str, b: &str) -> Vec<&str> {
        let Some((pa, pb)) = self.same_chain(a, b) else {
            return Vec::new();
        };
        let (low, high) = if pa.index <= pb.index {
            (pa.index, pb.index)
        } else {
            (pb.index, pa.index)
        };
        (low..=high)
            .filter_map(|index| self.name_at(pa.chain, index))
            .collect()
    }
}
