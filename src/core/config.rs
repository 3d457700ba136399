//! Planner configuration with documented constants
//!
//! All magic numbers of the pricing and allocation rules are collected here
//! so they can be tuned and tested independently.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{PlanError, Result};
use crate::core::types::Aptitude;

/// Configuration for the planning engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    // === NAME RESOLUTION ===
    /// Minimum Jaro-Winkler similarity for a fuzzy name match
    pub fuzzy_match_threshold: f64,

    // === PRICING ===
    /// Allowed discount fractions, ascending, first entry 0.0
    ///
    /// Derived discounts always snap to the nearest rung.
    pub discount_ladder: Vec<f64>,

    /// Upper clamp applied when stripping lower-version cost out of a
    /// multi-row chain price
    pub multi_row_price_cap: u32,

    // === ALLOCATION ===
    /// Maximum number of re-derivation passes in the looping strategies
    pub max_iterations: usize,

    // === EVALUATION ===
    /// Evaluation multiplier for S and A aptitudes
    pub aptitude_top_modifier: f64,
    /// Evaluation multiplier for B and C aptitudes
    pub aptitude_middle_modifier: f64,
    /// Evaluation multiplier for D, E and F aptitudes
    pub aptitude_low_modifier: f64,
    /// Evaluation multiplier for G aptitude
    pub aptitude_lowest_modifier: f64,
}

/// Default fuzzy name resolution threshold
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Default discount ladder
pub const DISCOUNT_LADDER: [f64; 6] = [0.0, 0.1, 0.2, 0.3, 0.35, 0.4];

/// Default clamp for multi-row price deltas
pub const MULTI_ROW_PRICE_CAP: u32 = 500;

/// Default iteration cap for the looping strategies
pub const MAX_ITERATIONS: usize = 5;

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fuzzy_match_threshold: FUZZY_MATCH_THRESHOLD,
            discount_ladder: DISCOUNT_LADDER.to_vec(),
            multi_row_price_cap: MULTI_ROW_PRICE_CAP,
            max_iterations: MAX_ITERATIONS,
            aptitude_top_modifier: 1.1,
            aptitude_middle_modifier: 0.9,
            aptitude_low_modifier: 0.8,
            aptitude_lowest_modifier: 0.7,
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Largest discount on the ladder; bounds the cheapest observable price
    pub fn max_discount(&self) -> f64 {
        self.discount_ladder.last().copied().unwrap_or(0.0)
    }

    /// Snap a raw discount fraction to the nearest ladder rung
    pub fn snap_discount(&self, raw: f64) -> f64 {
        let mut best = 0.0;
        let mut best_distance = f64::INFINITY;
        for &rung in &self.discount_ladder {
            let distance = (rung - raw).abs();
            if distance < best_distance {
                best = rung;
                best_distance = distance;
            }
        }
        best
    }

    /// Evaluation multiplier for an aptitude grade
    pub fn aptitude_modifier(&self, aptitude: Aptitude) -> f64 {
        match aptitude {
            Aptitude::S | Aptitude::A => self.aptitude_top_modifier,
            Aptitude::B | Aptitude::C => self.aptitude_middle_modifier,
            Aptitude::D | Aptitude::E | Aptitude::F => self.aptitude_low_modifier,
            Aptitude::G => self.aptitude_lowest_modifier,
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_match_threshold) {
            return Err(PlanError::InvalidConfig(format!(
                "fuzzy_match_threshold ({}) must be within [0, 1]",
                self.fuzzy_match_threshold
            )));
        }

        if self.discount_ladder.first() != Some(&0.0) {
            return Err(PlanError::InvalidConfig(
                "discount_ladder must start at 0.0".into(),
            ));
        }

        if self.discount_ladder.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PlanError::InvalidConfig(
                "discount_ladder must be strictly ascending".into(),
            ));
        }

        if self.max_discount() >= 1.0 {
            return Err(PlanError::InvalidConfig(format!(
                "discount_ladder values must be below 1.0 (found {})",
                self.max_discount()
            )));
        }

        if self.max_iterations == 0 {
            return Err(PlanError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
