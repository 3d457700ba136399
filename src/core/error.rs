use thiserror::Error;

use crate::core::types::SkillId;

/// Failures that abort a load or the current planning cycle
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Incomplete scan: {0}")]
    IncompleteScan(String),

    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// Conditions that are recovered locally, logged, and kept for inspection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("unresolved name \"{0}\"")]
    UnresolvedName(String),

    #[error("malformed chain at {id}: {reason}")]
    MalformedChain { id: SkillId, reason: String },

    #[error("{from} links to unknown record {to}")]
    DanglingLink { from: SkillId, to: SkillId },

    #[error("price {observed} for \"{name}\" outside [{min}, {max}], using {used}")]
    PriceOutOfBounds {
        name: String,
        observed: u32,
        min: u32,
        max: u32,
        used: u32,
    },

    #[error("malformed row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },

    #[error("duplicate record \"{name}\" ({id})")]
    DuplicateRecord { id: SkillId, name: String },

    #[error("duplicate scan row \"{0}\"")]
    DuplicateRow(String),
}
