//! Effects of drafted upgrades.

use dungeon_raid_core::{Event, ResourceCategory, TileKind, UpgradeKind};
use tracing::{debug, info};

use crate::Context;

const HP_UPGRADE: u32 = 5;
const WISDOM_EXPERIENCE: u32 = 10;
const RECOVERY_HEAL: u32 = 20;
const FAST_LEARNER_PERCENT: u32 = 10;

/// Applies `upgrade` to the player and grid synchronously.
pub(crate) fn apply_upgrade(ctx: &mut Context<'_>, upgrade: UpgradeKind, out: &mut Vec<Event>) {
    let player = &mut *ctx.player;
    match upgrade {
        UpgradeKind::UpgradeWeapon => player.weapon_attack = player.weapon_attack.saturating_add(1),
        UpgradeKind::UpgradeShield => player.shield_value = player.shield_value.saturating_add(1),
        UpgradeKind::UpgradeHp => player.hp.raise_max(HP_UPGRADE),
        UpgradeKind::MaxDefense => player.defense.raise_max(1),
        UpgradeKind::BasePower => player.base_attack = player.base_attack.saturating_add(1),
        UpgradeKind::Vitality => {
            player.hp.raise_max(HP_UPGRADE);
            let _ = player.hp.restore(HP_UPGRADE);
        }
        UpgradeKind::Recovery => {
            let _ = player.hp.restore(RECOVERY_HEAL);
        }
        UpgradeKind::SecondWind => player.second_wind = true,
        UpgradeKind::Alchemist => {
            let converted = ctx.grid.convert_enemies(TileKind::Potion);
            debug!(converted, "enemies transmuted");
        }
        UpgradeKind::Wisdom => {
            ctx.progression
                .add(ResourceCategory::Experience, WISDOM_EXPERIENCE, out);
        }
        UpgradeKind::FastLearner => {
            ctx.progression
                .shrink_max(ResourceCategory::Experience, FAST_LEARNER_PERCENT, out);
        }
        UpgradeKind::LearnFireball
        | UpgradeKind::LearnSlash
        | UpgradeKind::LearnShieldBash
        | UpgradeKind::LearnHeal
        | UpgradeKind::LearnFreeze => {
            if let Some(skill) = upgrade.taught_skill() {
                if !ctx.skills.learn(skill) {
                    debug!(skill = skill.name(), "skill already known or no free slot");
                }
            }
        }
    }

    info!(upgrade = upgrade.id(), "upgrade applied");
    out.push(Event::UpgradeApplied { upgrade });
}
