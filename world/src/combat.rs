//! Turn resolution for committed chains.

use dungeon_raid_core::{Event, ResourceCategory, TileId, TileKind};
use rand::Rng;
use tracing::debug;

use crate::{grid::CollapseReport, Context};

/// Index from which resource tiles in a chain may roll a bonus.
const BONUS_START_INDEX: usize = 3;
const BONUS_MULTIPLIER: u32 = 2;

/// Whether an enemy's defense reduces incoming damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Armor {
    Counts,
    Ignored,
}

/// Deals `raw_damage` to an enemy, never less than 1.
///
/// Returns whether the strike killed the enemy; kills award score here and
/// the caller is responsible for experience and removal.
pub(crate) fn strike(
    ctx: &mut Context<'_>,
    id: TileId,
    raw_damage: u32,
    armor: Armor,
    out: &mut Vec<Event>,
) -> bool {
    let Some(stats) = ctx.grid.tile_mut(id).and_then(|tile| tile.stats.as_mut()) else {
        return false;
    };
    let damage = match armor {
        Armor::Counts => raw_damage.saturating_sub(stats.defense),
        Armor::Ignored => raw_damage,
    }
    .max(1);
    stats.hp = stats
        .hp
        .saturating_sub(i32::try_from(damage).unwrap_or(i32::MAX));
    out.push(Event::EnemyDamaged {
        tile: id,
        damage,
        remaining_hp: stats.hp,
    });
    if stats.hp > 0 {
        return false;
    }

    let score = ctx.balance.kill_score;
    ctx.player.score = ctx.player.score.saturating_add(score);
    out.push(Event::EnemyKilled { tile: id, score });
    true
}

/// Removes tiles, applies gravity and refills, announcing the diff.
pub(crate) fn collapse(
    ctx: &mut Context<'_>,
    ids: &[TileId],
    out: &mut Vec<Event>,
) -> CollapseReport {
    let report = ctx.grid.remove_and_collapse(ids, &mut *ctx.rng);
    debug!(
        removed = report.removed.len(),
        spawned = report.spawned.len(),
        "grid collapsed"
    );
    out.push(Event::GridCollapsed {
        removed: report.removed.clone(),
        spawned: report.spawned.clone(),
    });
    report
}

#[derive(Debug, Default)]
struct Gains {
    coins: u32,
    shield_points: u32,
    potions: u32,
    experience: u32,
}

/// Resolves one committed, already validated chain of at least three tiles.
pub(crate) fn resolve_turn(ctx: &mut Context<'_>, path: &[TileId], turn: u32, out: &mut Vec<Event>) {
    ctx.grid.clear_new_flags();
    ctx.skills.tick_cooldowns();
    ctx.grid.age_tiles();

    let chain: Vec<(TileId, TileKind)> = path
        .iter()
        .filter_map(|id| ctx.grid.tile(*id).map(|tile| (tile.id, tile.kind)))
        .collect();
    let swords = chain
        .iter()
        .filter(|(_, kind)| *kind == TileKind::Sword)
        .count();
    let raw_damage = ctx
        .player
        .chain_damage(u32::try_from(swords).unwrap_or(u32::MAX));
    debug!(turn, length = chain.len(), swords, raw_damage, "resolving chain");

    let rates = ctx.balance.bonus_rates();
    let mut marked = Vec::with_capacity(chain.len());
    let mut gains = Gains::default();
    for (index, (id, kind)) in chain.iter().copied().enumerate() {
        match kind {
            TileKind::Enemy => {
                if strike(ctx, id, raw_damage, Armor::Counts, out) {
                    marked.push(id);
                    gains.experience += 1;
                }
            }
            TileKind::Sword => marked.push(id),
            TileKind::Coin | TileKind::Shield | TileKind::Potion => {
                marked.push(id);
                let multiplier = match rates.for_kind(kind) {
                    Some(rate) if index >= BONUS_START_INDEX && ctx.rng.gen_bool(rate) => {
                        BONUS_MULTIPLIER
                    }
                    _ => 1,
                };
                match kind {
                    TileKind::Coin => gains.coins += multiplier,
                    TileKind::Shield => {
                        gains.shield_points += ctx.player.shield_value.saturating_mul(multiplier)
                    }
                    _ => gains.potions += multiplier,
                }
            }
        }
    }

    let healed = ctx.player.hp.restore(gains.potions);
    let defense = ctx.player.defense.restore(gains.shield_points);
    let equipment = gains.shield_points - defense;
    out.push(Event::ResourcesGathered {
        coins: gains.coins,
        equipment,
        experience: gains.experience,
        healed,
        defense,
    });
    ctx.progression.add(ResourceCategory::Coin, gains.coins, out);
    ctx.progression
        .add(ResourceCategory::Equipment, equipment, out);
    ctx.progression
        .add(ResourceCategory::Experience, gains.experience, out);

    let report = collapse(ctx, &marked, out);
    let player_damage = counterattack(ctx, out);

    out.push(Event::TurnResolved {
        turn,
        removed: report.removed,
        spawned: report.spawned,
        player_damage,
    });
}

/// Enemies present for at least one full turn attack; returns hit points lost.
fn counterattack(ctx: &mut Context<'_>, out: &mut Vec<Event>) -> u32 {
    if ctx.skills.take_freeze() {
        debug!("counterattack frozen");
        return 0;
    }

    let (attack, attackers) = ctx
        .grid
        .tiles()
        .filter(|tile| tile.turns_alive >= 1)
        .filter_map(|tile| tile.stats)
        .fold((0u32, 0u32), |(attack, count), stats| {
            (attack.saturating_add(stats.attack), count + 1)
        });
    let damage = attack.saturating_sub(ctx.player.defense.current());
    let lost = ctx.player.hp.drain(damage);
    let _ = ctx.player.defense.drain(attackers);
    debug!(attackers, attack, lost, "counterattack");
    out.push(Event::CounterAttack {
        damage: lost,
        attackers,
    });
    lost
}
