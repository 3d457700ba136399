//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a reference record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub u32);

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Skill points, the currency every price and budget is expressed in
pub type Points = u32;

/// Trainee aptitude grade, worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Aptitude {
    G,
    F,
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Aptitude {
    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "G" => Some(Aptitude::G),
            "F" => Some(Aptitude::F),
            "E" => Some(Aptitude::E),
            "D" => Some(Aptitude::D),
            "C" => Some(Aptitude::C),
            "B" => Some(Aptitude::B),
            "A" => Some(Aptitude::A),
            "S" => Some(Aptitude::S),
            _ => None,
        }
    }
}

/// Race positioning strategy a skill may be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunningStyle {
    FrontRunner,
    PaceChaser,
    LateSurger,
    EndCloser,
}

impl RunningStyle {
    pub const ALL: [RunningStyle; 4] = [
        RunningStyle::FrontRunner,
        RunningStyle::PaceChaser,
        RunningStyle::LateSurger,
        RunningStyle::EndCloser,
    ];

    /// Zero-based ordinal lookup
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            RunningStyle::FrontRunner => "FRONT",
            RunningStyle::PaceChaser => "PACE",
            RunningStyle::LateSurger => "LATE",
            RunningStyle::EndCloser => "END",
        }
    }

    /// Accepts either the long name (`front_runner`) or the short name (`FRONT`)
    pub fn from_name(value: &str) -> Option<Self> {
        let value = value.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|style| {
            style.short_name() == value || format!("{:?}", style).to_uppercase() == value.replace('_', "")
        })
    }
}

/// Race length category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackDistance {
    Sprint,
    Mile,
    Medium,
    Long,
}

impl TrackDistance {
    pub const ALL: [TrackDistance; 4] = [
        TrackDistance::Sprint,
        TrackDistance::Mile,
        TrackDistance::Medium,
        TrackDistance::Long,
    ];

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    pub fn from_name(value: &str) -> Option<Self> {
        let value = value.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|distance| format!("{:?}", distance).to_uppercase() == value)
    }
}

/// Race ground type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSurface {
    Turf,
    Dirt,
}

impl TrackSurface {
    pub const ALL: [TrackSurface; 2] = [TrackSurface::Turf, TrackSurface::Dirt];

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }
}

/// Community ranking of a skill. Ordered worst to best so `max` is the best tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommunityTier {
    B,
    A,
    S,
    SS,
}

impl CommunityTier {
    pub fn name(&self) -> &'static str {
        match self {
            CommunityTier::SS => "SS",
            CommunityTier::S => "S",
            CommunityTier::A => "A",
            CommunityTier::B => "B",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "SS" => Some(CommunityTier::SS),
            "S" => Some(CommunityTier::S),
            "A" => Some(CommunityTier::A),
            "B" => Some(CommunityTier::B),
            _ => None,
        }
    }
}

/// Skill colour category, derived from the icon id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillType {
    Green,
    Blue,
    Yellow,
    Red,
}

impl SkillType {
    pub fn from_icon_id(icon_id: u32) -> Option<Self> {
        // Runaway is green but its icon sits in the 4xxxx range
        if icon_id == 40012 {
            return Some(SkillType::Green);
        }
        let digits = icon_id.to_string();
        if digits.starts_with('1') {
            Some(SkillType::Green)
        } else if ["2002", "2003", "2011"].iter().any(|p| digits.starts_with(p)) {
            Some(SkillType::Blue)
        } else if digits.starts_with('2') {
            Some(SkillType::Yellow)
        } else if digits.starts_with('3') {
            Some(SkillType::Red)
        } else {
            None
        }
    }
}
