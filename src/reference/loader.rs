//! Reference table loading
//!
//! Tables are TOML (`[[skills]]`) or JSON (`{"skills": [...]}`, a bare array,
//! or an object keyed by skill name). Rows are converted one at a time, so a
//! malformed row is dropped with a diagnostic and the rest still loads.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::{Diagnostic, Result};
use crate::core::types::{CommunityTier, Points, SkillId, SkillType};
use crate::reference::conditions::ActivationProfile;
use crate::reference::record::{infers_in_place, CategoryFlags, ReferenceRecord};
use crate::reference::store::ReferenceStore;

/// One row as it appears in a table file
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: u32,
    #[serde(alias = "name_en")]
    name: String,
    #[serde(default, alias = "base_cost")]
    cost: Option<Points>,
    #[serde(alias = "evaluation_value")]
    eval_pt: i32,
    #[serde(default)]
    icon_id: Option<u32>,
    #[serde(default)]
    is_gold: Option<bool>,
    #[serde(default)]
    is_unique: Option<bool>,
    #[serde(default, alias = "inherited")]
    is_inherited_unique: Option<bool>,
    #[serde(default)]
    is_negative: Option<bool>,
    #[serde(default)]
    is_in_place: Option<bool>,
    #[serde(default, alias = "tier")]
    community_tier: Option<String>,
    #[serde(default, alias = "upgrade_id")]
    upgrade: Option<u32>,
    #[serde(default, alias = "downgrade_id")]
    downgrade: Option<u32>,
    #[serde(default)]
    condition: String,
    #[serde(default)]
    precondition: String,
    #[serde(default, alias = "desc_en")]
    description: String,
}

impl RawRecord {
    fn into_record(self) -> std::result::Result<ReferenceRecord, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("empty name".to_string());
        }

        let skill_type = self.icon_id.and_then(SkillType::from_icon_id);
        let derived = self.icon_id.map(CategoryFlags::from_icon_id).unwrap_or_default();
        let negative = self.is_negative.unwrap_or(derived.negative);
        let inherited_unique = self.is_inherited_unique.unwrap_or(false);

        let flags = CategoryFlags {
            gold: self.is_gold.unwrap_or(derived.gold),
            unique: self.is_unique.unwrap_or(derived.unique) || inherited_unique,
            inherited_unique,
            negative,
            in_place_upgrade: self
                .is_in_place
                .unwrap_or_else(|| infers_in_place(&name, skill_type, negative)),
        };

        let tier = match self.community_tier.as_deref() {
            None => None,
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(
                CommunityTier::from_name(value)
                    .ok_or_else(|| format!("unknown community tier \"{}\"", value))?,
            ),
        };

        Ok(ReferenceRecord {
            id: SkillId(self.id),
            name,
            base_cost: self.cost,
            evaluation_value: self.eval_pt,
            flags,
            tier,
            skill_type,
            upgrade_id: self.upgrade.map(SkillId),
            downgrade_id: self.downgrade.map(SkillId),
            activation: ActivationProfile::from_sources(
                &self.condition,
                &self.precondition,
                &self.description,
            ),
        })
    }
}

/// Records that converted cleanly plus one diagnostic per dropped row
#[derive(Debug, Default)]
pub struct LoadedTable {
    pub records: Vec<ReferenceRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedTable {
    fn push_row<E: std::fmt::Display>(
        &mut self,
        index: usize,
        row: std::result::Result<RawRecord, E>,
    ) {
        let converted = row
            .map_err(|e| e.to_string())
            .and_then(RawRecord::into_record);
        match converted {
            Ok(record) => self.records.push(record),
            Err(reason) => {
                tracing::warn!("Dropping reference row {}: {}", index, reason);
                self.diagnostics.push(Diagnostic::MalformedRow { index, reason });
            }
        }
    }

    /// Build a store; load diagnostics are kept alongside duplicate drops
    pub fn into_store(self) -> ReferenceStore {
        let mut store = ReferenceStore::from_records(self.records);
        store.extend_diagnostics(self.diagnostics);
        store
    }
}

/// Parse a `[[skills]]` TOML table
pub fn parse_reference_toml(content: &str) -> Result<LoadedTable> {
    let document: toml::Table = toml::from_str(content)?;
    let rows = match document.get("skills") {
        Some(toml::Value::Array(rows)) => rows.clone(),
        _ => Vec::new(),
    };

    let mut table = LoadedTable::default();
    for (index, row) in rows.into_iter().enumerate() {
        table.push_row(index, row.try_into::<RawRecord>());
    }
    Ok(table)
}

/// Parse a JSON table: `{"skills": [...]}`, a bare array, or a name-keyed object
pub fn parse_reference_json(content: &str) -> Result<LoadedTable> {
    let document: serde_json::Value = serde_json::from_str(content)?;
    let rows = match document {
        serde_json::Value::Array(rows) => rows,
        serde_json::Value::Object(mut map) => match map.remove("skills") {
            Some(serde_json::Value::Array(rows)) => rows,
            Some(other) => {
                map.insert("skills".to_string(), other);
                map.into_iter().map(|(_, row)| row).collect()
            }
            None => map.into_iter().map(|(_, row)| row).collect(),
        },
        _ => Vec::new(),
    };

    let mut table = LoadedTable::default();
    for (index, row) in rows.into_iter().enumerate() {
        table.push_row(index, serde_json::from_value::<RawRecord>(row));
    }
    Ok(table)
}

/// Load a table file, JSON by `.json` extension and TOML otherwise
pub fn load_reference_table(path: &Path) -> Result<ReferenceStore> {
    let content = std::fs::read_to_string(path)?;
    let table = if is_json(path) {
        parse_reference_json(&content)?
    } else {
        parse_reference_toml(&content)?
    };
    tracing::info!(
        "Loaded {} reference records from {} ({} rows dropped)",
        table.records.len(),
        path.display(),
        table.diagnostics.len()
    );
    Ok(table.into_store())
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}
