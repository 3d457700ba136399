//! User settings for one plan

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::config::PlannerConfig;
use crate::core::error::Result;
use crate::core::types::{Aptitude, RunningStyle, TrackDistance, TrackSurface};
use crate::reference::conditions::ActivationProfile;
use crate::reference::loader::is_json;

/// Strategy-specific pass run after the shared passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Shared passes only
    #[default]
    #[serde(alias = "Default")]
    Default,
    /// Tier list first, evaluation ratio within a tier
    #[serde(alias = "OptimizeBySkillValue", alias = "skill_value")]
    OptimizeBySkillValue,
    /// Evaluation ratio across everything
    #[serde(alias = "OptimizeRank", alias = "rank")]
    OptimizeRank,
}

/// Which aptitude-bound skills count as useful; `None` means no preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub running_style: Option<RunningStyle>,
    pub track_distance: Option<TrackDistance>,
    pub track_surface: Option<TrackSurface>,
}

/// Trainee aptitudes used to scale evaluation values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraineeProfile {
    pub running_styles: AHashMap<RunningStyle, Aptitude>,
    pub track_distances: AHashMap<TrackDistance, Aptitude>,
}

impl TraineeProfile {
    pub fn with_running_style(mut self, style: RunningStyle, aptitude: Aptitude) -> Self {
        self.running_styles.insert(style, aptitude);
        self
    }

    pub fn with_track_distance(mut self, distance: TrackDistance, aptitude: Aptitude) -> Self {
        self.track_distances.insert(distance, aptitude);
        self
    }

    /// Multiplier for a skill's evaluation; unknown aptitudes leave it unchanged
    pub fn evaluation_modifier(&self, activation: &ActivationProfile, config: &PlannerConfig) -> f64 {
        let style = activation
            .running_style
            .and_then(|style| self.running_styles.get(&style))
            .map_or(1.0, |&aptitude| config.aptitude_modifier(aptitude));
        let distance = activation
            .track_distance
            .and_then(|distance| self.track_distances.get(&distance))
            .map_or(1.0, |&aptitude| config.aptitude_modifier(aptitude));
        style * distance
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSettings {
    pub enabled: bool,
    pub strategy: Strategy,
    pub buy_negative: bool,
    pub buy_inherited_unique: bool,
    /// Skill names to acquire before the strategy pass
    pub targets: Vec<String>,
    pub preferences: Preferences,
    pub trainee: TraineeProfile,
    /// Spend what OptimizeBySkillValue leaves over through the OptimizeRank pass
    pub rank_fallback: bool,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            strategy: Strategy::Default,
            buy_negative: false,
            buy_inherited_unique: false,
            targets: Vec::new(),
            preferences: Preferences::default(),
            trainee: TraineeProfile::default(),
            rank_fallback: true,
        }
    }
}

impl PlanSettings {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_negative(mut self, enabled: bool) -> Self {
        self.buy_negative = enabled;
        self
    }

    pub fn with_inherited_unique(mut self, enabled: bool) -> Self {
        self.buy_inherited_unique = enabled;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_trainee(mut self, trainee: TraineeProfile) -> Self {
        self.trainee = trainee;
        self
    }

    /// Nothing to buy regardless of the catalog
    pub fn is_noop(&self) -> bool {
        !self.enabled
            || (self.targets.is_empty()
                && self.strategy == Strategy::Default
                && !self.buy_negative
                && !self.buy_inherited_unique)
    }

    /// Load settings, JSON by `.json` extension and TOML otherwise
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }
}
