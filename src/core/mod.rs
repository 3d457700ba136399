pub mod config;
pub mod error;
pub mod types;

pub use config::PlannerConfig;
pub use error::{Diagnostic, PlanError, Result};
pub use types::{
    Aptitude, CommunityTier, Points, RunningStyle, SkillId, SkillType, TrackDistance, TrackSurface,
};
