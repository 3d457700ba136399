//! Reference store - process-lifetime table of every known skill
//!
//! Names resolve exactly first, then by Jaro-Winkler similarity so that
//! scanner artifacts ("Corner Recovery 0" for "Corner Recovery ○") still
//! find their record.

use ahash::AHashMap;
use std::sync::Arc;

use crate::core::config::FUZZY_MATCH_THRESHOLD;
use crate::core::error::Diagnostic;
use crate::core::types::SkillId;
use crate::reference::record::ReferenceRecord;

/// Immutable lookup table of reference records
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    /// Records in load order
    records: Vec<Arc<ReferenceRecord>>,
    by_name: AHashMap<String, usize>,
    by_id: AHashMap<SkillId, usize>,
    fuzzy_threshold: f64,
    /// Problems found while building the table
    diagnostics: Vec<Diagnostic>,
}

impl ReferenceStore {
    /// Build a store; records with a duplicate id or name are dropped
    pub fn from_records(records: impl IntoIterator<Item = ReferenceRecord>) -> Self {
        let mut store = Self {
            fuzzy_threshold: FUZZY_MATCH_THRESHOLD,
            ..Self::default()
        };

        for record in records {
            if store.by_id.contains_key(&record.id) || store.by_name.contains_key(&record.name) {
                tracing::warn!(
                    "Dropping duplicate reference record \"{}\" ({})",
                    record.name,
                    record.id
                );
                store.diagnostics.push(Diagnostic::DuplicateRecord {
                    id: record.id,
                    name: record.name,
                });
                continue;
            }
            let idx = store.records.len();
            store.by_name.insert(record.name.clone(), idx);
            store.by_id.insert(record.id, idx);
            store.records.push(Arc::new(record));
        }

        store
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Append diagnostics gathered before the store existed (e.g. by the loader)
    pub(crate) fn extend_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ReferenceRecord>> {
        self.records.iter()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Exact lookup by name
    pub fn get(&self, name: &str) -> Option<&Arc<ReferenceRecord>> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// Exact lookup by id
    pub fn get_by_id(&self, id: SkillId) -> Option<&Arc<ReferenceRecord>> {
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    /// Reverse lookup: id to name
    pub fn by_id(&self, id: SkillId) -> Option<&str> {
        self.get_by_id(id).map(|record| record.name.as_str())
    }

    /// Resolve a possibly misread name
    ///
    /// Returns the exact match, otherwise the single most similar name at or
    /// above the fuzzy threshold, otherwise `None`.
    pub fn resolve(&self, name: &str) -> Option<&Arc<ReferenceRecord>> {
        if let Some(record) = self.get(name).or_else(|| self.get(name.trim())) {
            return Some(record);
        }

        let query = name.trim();
        let mut best: Option<(&Arc<ReferenceRecord>, f64)> = None;
        for record in &self.records {
            let score = strsim::jaro_winkler(query, &record.name);
            if score >= self.fuzzy_threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((record, score));
            }
        }

        match best {
            Some((record, score)) => {
                tracing::debug!(
                    "Fuzzy matched \"{}\" to \"{}\" (similarity {:.2})",
                    name,
                    record.name,
                    score
                );
                Some(record)
            }
            None => {
                tracing::debug!("No reference match for \"{}\"", name);
                None
            }
        }
    }
}
