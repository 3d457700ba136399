//! Reference records - the immutable description of every known skill

use serde::{Deserialize, Serialize};

use crate::core::types::{CommunityTier, Points, SkillId, SkillType};
use crate::reference::conditions::ActivationProfile;

/// Category flags of a reference record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFlags {
    /// Upgraded (gold) version of another skill
    pub gold: bool,
    pub unique: bool,
    /// Unique skill inherited from a parent; always also `unique`
    pub inherited_unique: bool,
    /// Debuff skill that is bought to be removed
    pub negative: bool,
    /// The chain shows a single row that upgrades in place
    pub in_place_upgrade: bool,
}

impl CategoryFlags {
    /// Derive flags from the last digit of an icon id
    ///
    /// 2 marks gold, 3 unique, 4 negative.
    pub fn from_icon_id(icon_id: u32) -> Self {
        let last = icon_id % 10;
        Self {
            gold: last == 2,
            unique: last == 3,
            negative: last == 4,
            ..Self::default()
        }
    }
}

/// One purchasable skill version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub id: SkillId,
    pub name: String,
    /// Undiscounted cost; absent for skills with no direct price
    pub base_cost: Option<Points>,
    pub evaluation_value: i32,
    pub flags: CategoryFlags,
    pub tier: Option<CommunityTier>,
    pub skill_type: Option<SkillType>,
    pub upgrade_id: Option<SkillId>,
    pub downgrade_id: Option<SkillId>,
    pub activation: ActivationProfile,
}

impl ReferenceRecord {
    pub fn new(id: u32, name: impl Into<String>, base_cost: Option<Points>, evaluation_value: i32) -> Self {
        Self {
            id: SkillId(id),
            name: name.into(),
            base_cost,
            evaluation_value,
            flags: CategoryFlags::default(),
            tier: None,
            skill_type: None,
            upgrade_id: None,
            downgrade_id: None,
            activation: ActivationProfile::default(),
        }
    }

    pub fn with_flags(mut self, flags: CategoryFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn in_place(mut self) -> Self {
        self.flags.in_place_upgrade = true;
        self
    }

    pub fn negative(mut self) -> Self {
        self.flags.negative = true;
        self
    }

    pub fn inherited_unique(mut self) -> Self {
        self.flags.inherited_unique = true;
        self.flags.unique = true;
        self
    }

    pub fn with_tier(mut self, tier: CommunityTier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn with_upgrade(mut self, id: u32) -> Self {
        self.upgrade_id = Some(SkillId(id));
        self
    }

    pub fn with_downgrade(mut self, id: u32) -> Self {
        self.downgrade_id = Some(SkillId(id));
        self
    }

    pub fn with_activation(mut self, activation: ActivationProfile) -> Self {
        self.activation = activation;
        self
    }

    pub fn is_in_place(&self) -> bool {
        self.flags.in_place_upgrade
    }

    pub fn is_negative(&self) -> bool {
        self.flags.negative
    }

    pub fn is_inherited_unique(&self) -> bool {
        self.flags.inherited_unique
    }
}

/// In-place chains are green skills, negative skills, and the distance or
/// style specific straightaway/corner skills.
pub fn infers_in_place(name: &str, skill_type: Option<SkillType>, negative: bool) -> bool {
    if skill_type == Some(SkillType::Green) || negative {
        return true;
    }
    // Drop the trailing grade marker (" ○", " ◎", ...)
    let chars: Vec<char> = name.chars().collect();
    let stem: String = chars[..chars.len().saturating_sub(2)].iter().collect();
    let stem = stem.to_lowercase();
    stem.ends_with("straightaways") || stem.ends_with("corners")
}
