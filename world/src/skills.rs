//! Skill slots, cooldowns and skill effects.

use dungeon_raid_core::{
    CellCoord, Event, RejectionReason, ResourceCategory, SkillKind, SkillSlotSnapshot, TileId,
    TileKind,
};
use tracing::debug;

use crate::{
    combat::{self, Armor},
    Context,
};

const FIREBALL_DAMAGE: u32 = 2;
const HEAL_AMOUNT: u32 = 10;

#[derive(Clone, Copy, Debug, Default)]
struct SkillSlot {
    skill: Option<SkillKind>,
    cooldown: u32,
}

/// Fixed-size list of optional skills plus the pending freeze.
#[derive(Clone, Debug)]
pub(crate) struct SkillSlots {
    slots: Vec<SkillSlot>,
    freeze_armed: bool,
}

impl SkillSlots {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            slots: vec![SkillSlot::default(); count],
            freeze_armed: false,
        }
    }

    /// Decrements every running cooldown once.
    pub(crate) fn tick_cooldowns(&mut self) {
        for slot in &mut self.slots {
            slot.cooldown = slot.cooldown.saturating_sub(1);
        }
    }

    /// Places `skill` in the first empty slot; known skills and full slots are a no-op.
    pub(crate) fn learn(&mut self, skill: SkillKind) -> bool {
        if self.slots.iter().any(|slot| slot.skill == Some(skill)) {
            return false;
        }
        match self.slots.iter_mut().find(|slot| slot.skill.is_none()) {
            Some(slot) => {
                slot.skill = Some(skill);
                slot.cooldown = 0;
                true
            }
            None => false,
        }
    }

    fn ready(&self, slot: usize) -> Result<SkillKind, RejectionReason> {
        let entry = self.slots.get(slot).ok_or(RejectionReason::EmptySkillSlot)?;
        let skill = entry.skill.ok_or(RejectionReason::EmptySkillSlot)?;
        if entry.cooldown > 0 {
            return Err(RejectionReason::SkillOnCooldown);
        }
        Ok(skill)
    }

    fn start_cooldown(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            entry.cooldown = entry.skill.map_or(0, SkillKind::cooldown_max);
        }
    }

    /// Consumes the pending freeze, reporting whether one was armed.
    pub(crate) fn take_freeze(&mut self) -> bool {
        std::mem::take(&mut self.freeze_armed)
    }

    pub(crate) const fn freeze_armed(&self) -> bool {
        self.freeze_armed
    }

    pub(crate) fn snapshots(&self) -> Vec<SkillSlotSnapshot> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| SkillSlotSnapshot {
                slot: index,
                skill: slot.skill,
                cooldown_current: slot.cooldown,
                cooldown_max: slot.skill.map_or(0, SkillKind::cooldown_max),
            })
            .collect()
    }
}

/// Fires the skill in `slot`, applying its effect and starting its cooldown.
///
/// Enemies killed by the effect award score and experience and are collapsed
/// out of the grid before this returns.
pub(crate) fn activate(
    ctx: &mut Context<'_>,
    slot: usize,
    out: &mut Vec<Event>,
) -> Result<SkillKind, RejectionReason> {
    let skill = ctx.skills.ready(slot)?;
    ctx.skills.start_cooldown(slot);
    out.push(Event::SkillActivated { slot, skill });
    debug!(slot, skill = skill.name(), "skill activated");

    let killed = match skill {
        SkillKind::Fireball => {
            let targets = ctx.grid.enemy_ids();
            strike_all(ctx, &targets, FIREBALL_DAMAGE, Armor::Ignored, out)
        }
        SkillKind::Heal => {
            let _ = ctx.player.hp.restore(HEAL_AMOUNT);
            Vec::new()
        }
        SkillKind::Freeze => {
            ctx.skills.freeze_armed = true;
            Vec::new()
        }
        SkillKind::Slash => {
            let targets = bottom_row_enemies(ctx);
            let damage = ctx.player.chain_damage(1);
            strike_all(ctx, &targets, damage, Armor::Counts, out)
        }
        SkillKind::ShieldBash => {
            let targets: Vec<TileId> = strongest_enemy(ctx).into_iter().collect();
            let damage = ctx.player.defense.current();
            strike_all(ctx, &targets, damage, Armor::Counts, out)
        }
    };

    if !killed.is_empty() {
        let experience = u32::try_from(killed.len()).unwrap_or(u32::MAX);
        ctx.progression
            .add(ResourceCategory::Experience, experience, out);
        let _ = combat::collapse(ctx, &killed, out);
    }

    Ok(skill)
}

fn strike_all(
    ctx: &mut Context<'_>,
    targets: &[TileId],
    damage: u32,
    armor: Armor,
    out: &mut Vec<Event>,
) -> Vec<TileId> {
    targets
        .iter()
        .copied()
        .filter(|id| combat::strike(ctx, *id, damage, armor, out))
        .collect()
}

fn bottom_row_enemies(ctx: &Context<'_>) -> Vec<TileId> {
    let (columns, rows) = ctx.grid.dimensions();
    let Some(bottom) = rows.checked_sub(1) else {
        return Vec::new();
    };
    (0..columns)
        .filter_map(|column| ctx.grid.get(CellCoord::new(column, bottom)))
        .filter(|tile| tile.kind == TileKind::Enemy)
        .map(|tile| tile.id)
        .collect()
}

/// Enemy with the highest attack; ties go to the first in row-major order.
fn strongest_enemy(ctx: &Context<'_>) -> Option<TileId> {
    let mut best: Option<(u32, TileId)> = None;
    for tile in ctx.grid.tiles() {
        let Some(stats) = tile.stats else {
            continue;
        };
        if best.map_or(true, |(attack, _)| stats.attack > attack) {
            best = Some((stats.attack, tile.id));
        }
    }
    best.map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, TileSeed, World};
    use dungeon_raid_core::Balance;

    #[test]
    fn learning_fills_first_empty_slot_once() {
        let mut slots = SkillSlots::new(2);
        assert!(slots.learn(SkillKind::Heal));
        assert!(!slots.learn(SkillKind::Heal));
        assert!(slots.learn(SkillKind::Slash));
        assert!(!slots.learn(SkillKind::Freeze));

        let skills: Vec<Option<SkillKind>> =
            slots.snapshots().iter().map(|slot| slot.skill).collect();
        assert_eq!(skills, vec![Some(SkillKind::Heal), Some(SkillKind::Slash)]);
    }

    #[test]
    fn cooldown_blocks_until_ticked_down() {
        let mut slots = SkillSlots::new(1);
        assert!(slots.learn(SkillKind::Slash));
        assert_eq!(slots.ready(0), Ok(SkillKind::Slash));

        slots.start_cooldown(0);
        assert_eq!(slots.ready(0), Err(RejectionReason::SkillOnCooldown));
        for _ in 0..SkillKind::Slash.cooldown_max() {
            slots.tick_cooldowns();
        }
        assert_eq!(slots.ready(0), Ok(SkillKind::Slash));
    }

    #[test]
    fn empty_or_missing_slots_are_rejected() {
        let slots = SkillSlots::new(1);
        assert_eq!(slots.ready(0), Err(RejectionReason::EmptySkillSlot));
        assert_eq!(slots.ready(5), Err(RejectionReason::EmptySkillSlot));
    }

    #[test]
    fn freeze_is_consumed_once() {
        let mut slots = SkillSlots::new(1);
        slots.freeze_armed = true;
        assert!(slots.take_freeze());
        assert!(!slots.take_freeze());
    }

    #[test]
    fn fireball_pierces_enemy_defense() {
        let balance = Balance {
            columns: 2,
            rows: 1,
            ..Balance::default()
        };
        let mut world = World::with_layout(
            Config::new(balance, 5),
            vec![TileSeed::enemy(5, 9, 4), TileSeed::new(TileKind::Coin)],
        )
        .expect("layout");
        let mut ctx = world.context();
        assert!(ctx.skills.learn(SkillKind::Fireball));
        let mut events = Vec::new();

        assert_eq!(activate(&mut ctx, 0, &mut events), Ok(SkillKind::Fireball));

        assert!(events.contains(&Event::EnemyDamaged {
            tile: TileId::new(0),
            damage: FIREBALL_DAMAGE,
            remaining_hp: 2,
        }));
    }
}
