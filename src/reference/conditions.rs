//! Activation condition parsing
//!
//! Condition strings come from scraped skill data. Terms are `name op value`,
//! `&` joins terms into an AND group and `@` joins groups with OR:
//!
//! ```text
//! running_style==1&phase>=2@distance_type==4
//! ```
//!
//! Only the parts that decide which trainees a skill is useful for are kept:
//! the required running style, track distance and track surface, plus the
//! running styles a positional skill is likely to suit.

use serde::{Deserialize, Serialize};

use crate::core::types::{RunningStyle, TrackDistance, TrackSurface};

/// Comparison operator of a single condition term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }
}

/// One `name op value` term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub name: String,
    pub op: Operator,
    pub value: i32,
}

impl Condition {
    /// Parse a single term such as `order==1`
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let start = input.find(['=', '!', '<', '>'])?;
        let rest = &input[start..];

        let (op, width) = match (rest.as_bytes()[0], rest.as_bytes().get(1)) {
            (b'=', Some(b'=')) => (Operator::Eq, 2),
            (b'!', Some(b'=')) => (Operator::Ne, 2),
            (b'>', Some(b'=')) => (Operator::Ge, 2),
            (b'<', Some(b'=')) => (Operator::Le, 2),
            (b'>', _) => (Operator::Gt, 1),
            (b'<', _) => (Operator::Lt, 1),
            _ => return None,
        };

        let name = input[..start].trim();
        if name.is_empty() {
            return None;
        }
        let value = rest[width..].trim().parse::<i32>().ok()?;

        Some(Self {
            name: name.to_string(),
            op,
            value,
        })
    }

    fn equals(&self, name: &str) -> Option<i32> {
        (self.name == name && self.op == Operator::Eq).then_some(self.value)
    }
}

/// Terms joined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionGroup {
    pub terms: Vec<Condition>,
}

impl ConditionGroup {
    pub fn parse(input: &str) -> Self {
        Self {
            terms: input.split('&').filter_map(Condition::parse).collect(),
        }
    }

    /// Value of the first `name==value` term in this group
    pub fn lookup(&self, name: &str) -> Option<i32> {
        self.terms.iter().find_map(|term| term.equals(name))
    }
}

/// Groups joined with OR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    pub groups: Vec<ConditionGroup>,
}

impl Conditions {
    pub fn parse(input: &str) -> Self {
        Self {
            groups: input
                .split('@')
                .filter(|group| !group.trim().is_empty())
                .map(ConditionGroup::parse)
                .collect(),
        }
    }

    /// First `name==value` across all groups
    pub fn lookup(&self, name: &str) -> Option<i32> {
        self.groups.iter().find_map(|group| group.lookup(name))
    }

    /// Values in the data are 1-based ordinals
    fn ordinal(&self, name: &str) -> Option<usize> {
        let value = self.lookup(name)?;
        usize::try_from(value).ok()?.checked_sub(1)
    }
}

/// Which trainees a skill can activate for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationProfile {
    pub running_style: Option<RunningStyle>,
    pub track_distance: Option<TrackDistance>,
    pub track_surface: Option<TrackSurface>,
    /// Styles a positional skill suits without strictly requiring them
    #[serde(default)]
    pub inferred_running_styles: Vec<RunningStyle>,
}

/// Description phrases that hint at race positioning
const POSITION_HINTS: &[(&str, &[RunningStyle])] = &[
    (
        "well-positioned",
        &[RunningStyle::PaceChaser, RunningStyle::LateSurger],
    ),
    (
        "toward the front",
        &[RunningStyle::FrontRunner, RunningStyle::PaceChaser],
    ),
    ("midpack", &[RunningStyle::PaceChaser, RunningStyle::LateSurger]),
    (
        "off the pace",
        &[RunningStyle::PaceChaser, RunningStyle::LateSurger],
    ),
    (
        "toward the back",
        &[RunningStyle::LateSurger, RunningStyle::EndCloser],
    ),
];

impl ActivationProfile {
    /// Build from the raw condition, precondition and description strings
    pub fn from_sources(condition: &str, precondition: &str, description: &str) -> Self {
        let joined = [condition, precondition]
            .iter()
            .filter(|s| !s.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("@");
        let conditions = Conditions::parse(&joined);

        let running_style = conditions
            .ordinal("running_style")
            .and_then(RunningStyle::from_ordinal);
        let track_distance = conditions
            .ordinal("distance_type")
            .and_then(TrackDistance::from_ordinal);
        let track_surface = conditions
            .ordinal("ground_type")
            .and_then(TrackSurface::from_ordinal);

        let inferred_running_styles = if running_style.is_some() {
            Vec::new()
        } else {
            infer_running_styles(condition, description)
        };

        Self {
            running_style,
            track_distance,
            track_surface,
            inferred_running_styles,
        }
    }

    /// Whether the skill's evaluation depends on a trainee aptitude
    pub fn is_aptitude_bound(&self) -> bool {
        self.running_style.is_some() || self.track_distance.is_some()
    }

    /// Whether the skill fires regardless of style, distance and surface
    pub fn is_unrestricted(&self) -> bool {
        self.running_style.is_none() && self.track_distance.is_none() && self.track_surface.is_none()
    }
}

fn infer_running_styles(condition: &str, description: &str) -> Vec<RunningStyle> {
    let mut result = Vec::new();
    let mut push = |style: RunningStyle| {
        if !result.contains(&style) {
            result.push(style);
        }
    };

    if condition.contains("order==1") {
        push(RunningStyle::FrontRunner);
    }
    let description = description.to_lowercase();
    for (phrase, styles) in POSITION_HINTS {
        if description.contains(phrase) {
            styles.iter().copied().for_each(&mut push);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_condition_terms() {
        let c = Condition::parse("order==1").unwrap();
        assert_eq!(c.name, "order");
        assert_eq!(c.op, Operator::Eq);
        assert_eq!(c.value, 1);

        let c = Condition::parse(" order_rate >= 50 ").unwrap();
        assert_eq!(c.op, Operator::Ge);
        assert_eq!(c.value, 50);

        assert_eq!(Condition::parse("phase<2").unwrap().op, Operator::Lt);
        assert_eq!(Condition::parse("phase!=2").unwrap().op, Operator::Ne);
        assert!(Condition::parse("==3").is_none());
        assert!(Condition::parse("phase=3").is_none());
        assert!(Condition::parse("phase==x").is_none());
    }

    #[test]
    fn test_requirements_extracted() {
        let profile = ActivationProfile::from_sources(
            "running_style==1&phase>=2@distance_type==4",
            "ground_type==2",
            "",
        );
        assert_eq!(profile.running_style, Some(RunningStyle::FrontRunner));
        assert_eq!(profile.track_distance, Some(TrackDistance::Long));
        assert_eq!(profile.track_surface, Some(TrackSurface::Dirt));
        assert!(profile.inferred_running_styles.is_empty());
        assert!(profile.is_aptitude_bound());
    }

    #[test]
    fn test_out_of_range_ordinal_ignored() {
        let profile = ActivationProfile::from_sources("running_style==0@distance_type==9", "", "");
        assert_eq!(profile.running_style, None);
        assert_eq!(profile.track_distance, None);
        assert!(profile.is_unrestricted());
    }

    #[test]
    fn test_inferred_styles_from_description() {
        let profile = ActivationProfile::from_sources(
            "order==1&phase==1",
            "",
            "Slightly increase velocity when Toward the Back midpack.",
        );
        assert_eq!(
            profile.inferred_running_styles,
            vec![
                RunningStyle::FrontRunner,
                RunningStyle::PaceChaser,
                RunningStyle::LateSurger,
                RunningStyle::EndCloser,
            ]
        );
        assert!(profile.is_unrestricted());
    }

    #[test]
    fn test_explicit_style_suppresses_inference() {
        let profile =
            ActivationProfile::from_sources("running_style==3", "", "when toward the front");
        assert_eq!(profile.running_style, Some(RunningStyle::LateSurger));
        assert!(profile.inferred_running_styles.is_empty());
    }
}
