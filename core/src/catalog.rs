//! Static skill and upgrade definitions.

use serde::{Deserialize, Serialize};

use crate::ResourceCategory;

/// Skills that can occupy a player's skill slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Burns every enemy on the grid.
    Fireball,
    /// Restores hit points.
    Heal,
    /// Cancels the next enemy counterattack.
    Freeze,
    /// Strikes every enemy in the bottom row.
    Slash,
    /// Hits the strongest enemy with the player's current defense.
    ShieldBash,
}

impl SkillKind {
    /// Turns the skill waits after firing before it can fire again.
    #[must_use]
    pub const fn cooldown_max(self) -> u32 {
        match self {
            Self::Fireball => 5,
            Self::Heal => 8,
            Self::Freeze => 6,
            Self::Slash => 3,
            Self::ShieldBash => 4,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fireball => "Fireball",
            Self::Heal => "Heal",
            Self::Freeze => "Freeze",
            Self::Slash => "Slash",
            Self::ShieldBash => "Shield Bash",
        }
    }

    /// Short player-facing description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Fireball => "Deals damage to every enemy.",
            Self::Heal => "Restores HP.",
            Self::Freeze => "Freezes enemies for a turn.",
            Self::Slash => "Attacks the bottom row of enemies.",
            Self::ShieldBash => "Deals damage based on defense.",
        }
    }
}

/// Static upgrade definitions offered after level-ups.
///
/// Upgrades are immutable; drafting only selects among these variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Weapon attack +1.
    UpgradeWeapon,
    /// Shield value +1.
    UpgradeShield,
    /// Max HP +5.
    UpgradeHp,
    /// Learn the Fireball skill.
    LearnFireball,
    /// Every enemy on the grid turns into a potion.
    Alchemist,
    /// Max defense +1.
    MaxDefense,
    /// Base attack +1.
    BasePower,
    /// Learn the Slash skill.
    LearnSlash,
    /// Learn the Shield Bash skill.
    LearnShieldBash,
    /// Gain 10 experience.
    Wisdom,
    /// Max HP +5 and heal 5.
    Vitality,
    /// Heal 20.
    Recovery,
    /// Experience needed per level -10%.
    FastLearner,
    /// Survive the next lethal counterattack with 1 HP.
    SecondWind,
    /// Learn the Heal skill.
    LearnHeal,
    /// Learn the Freeze skill.
    LearnFreeze,
}

impl UpgradeKind {
    /// The complete catalog in definition order.
    pub const ALL: [Self; 16] = [
        Self::UpgradeWeapon,
        Self::UpgradeShield,
        Self::UpgradeHp,
        Self::LearnFireball,
        Self::Alchemist,
        Self::MaxDefense,
        Self::BasePower,
        Self::LearnSlash,
        Self::LearnShieldBash,
        Self::Wisdom,
        Self::Vitality,
        Self::Recovery,
        Self::FastLearner,
        Self::SecondWind,
        Self::LearnHeal,
        Self::LearnFreeze,
    ];

    /// Stable identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::UpgradeWeapon => "upgrade_weapon",
            Self::UpgradeShield => "upgrade_shield",
            Self::UpgradeHp => "upgrade_hp",
            Self::LearnFireball => "skill_fireball",
            Self::Alchemist => "coin_alchemist",
            Self::MaxDefense => "max_defense",
            Self::BasePower => "base_power",
            Self::LearnSlash => "skill_slash",
            Self::LearnShieldBash => "skill_shield_bash",
            Self::Wisdom => "exp_wisdom",
            Self::Vitality => "exp_vitality",
            Self::Recovery => "exp_recovery",
            Self::FastLearner => "exp_learning",
            Self::SecondWind => "exp_secondwind",
            Self::LearnHeal => "skill_heal",
            Self::LearnFreeze => "skill_freeze",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpgradeWeapon => "Upgrade Weapon",
            Self::UpgradeShield => "Upgrade Shield",
            Self::UpgradeHp => "Upgrade HP",
            Self::LearnFireball => "Fireball",
            Self::Alchemist => "Alchemist",
            Self::MaxDefense => "Max Defense",
            Self::BasePower => "Base Power",
            Self::LearnSlash => "Slash",
            Self::LearnShieldBash => "Shield Bash",
            Self::Wisdom => "Wisdom",
            Self::Vitality => "Vitality",
            Self::Recovery => "Recovery",
            Self::FastLearner => "Fast Learner",
            Self::SecondWind => "Second Wind",
            Self::LearnHeal => "Heal",
            Self::LearnFreeze => "Freeze",
        }
    }

    /// Player-facing description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UpgradeWeapon => "Add 1 to weapon attack.",
            Self::UpgradeShield => "Add 1 to shield value.",
            Self::UpgradeHp => "Add 5 to max HP.",
            Self::LearnFireball => "Get fireball skill.",
            Self::Alchemist => "Turn all currently visible enemy tiles into potion tiles.",
            Self::MaxDefense => "Increase Max Defense by 1.",
            Self::BasePower => "Increase Base Attack by 1.",
            Self::LearnSlash => "Get slash skill.",
            Self::LearnShieldBash => "Get shield bash skill.",
            Self::Wisdom => "Gain 10 Experience instantly.",
            Self::Vitality => "Increase Max HP by 5.",
            Self::Recovery => "Heal 20 HP.",
            Self::FastLearner => "Reduce Experience needed for next level by 10%.",
            Self::SecondWind => "If HP drops to 0, survive with 1 HP (Once per game).",
            Self::LearnHeal => "Get heal skill.",
            Self::LearnFreeze => "Get freeze skill.",
        }
    }

    /// Level-up category whose drafts may offer this upgrade.
    #[must_use]
    pub const fn category(self) -> ResourceCategory {
        match self {
            Self::UpgradeWeapon
            | Self::UpgradeShield
            | Self::UpgradeHp
            | Self::LearnFireball
            | Self::Alchemist => ResourceCategory::Coin,
            Self::MaxDefense | Self::BasePower | Self::LearnSlash | Self::LearnShieldBash => {
                ResourceCategory::Equipment
            }
            Self::Wisdom
            | Self::Vitality
            | Self::Recovery
            | Self::FastLearner
            | Self::SecondWind
            | Self::LearnHeal
            | Self::LearnFreeze => ResourceCategory::Experience,
        }
    }

    /// Relative sampling weight; always positive.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::UpgradeWeapon
            | Self::UpgradeShield
            | Self::UpgradeHp
            | Self::LearnFireball
            | Self::MaxDefense
            | Self::BasePower
            | Self::FastLearner => 10,
            Self::Wisdom => 20,
            Self::Vitality | Self::Recovery => 15,
            Self::Alchemist
            | Self::LearnSlash
            | Self::LearnShieldBash
            | Self::SecondWind
            | Self::LearnHeal
            | Self::LearnFreeze => 5,
        }
    }

    /// Skill granted by the upgrade, if it teaches one.
    #[must_use]
    pub const fn taught_skill(self) -> Option<SkillKind> {
        match self {
            Self::LearnFireball => Some(SkillKind::Fireball),
            Self::LearnSlash => Some(SkillKind::Slash),
            Self::LearnShieldBash => Some(SkillKind::ShieldBash),
            Self::LearnHeal => Some(SkillKind::Heal),
            Self::LearnFreeze => Some(SkillKind::Freeze),
            _ => None,
        }
    }
}
