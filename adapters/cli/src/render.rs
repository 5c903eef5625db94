//! Plain-text presentation of the board and of world events.

use std::io::{self, Write};

use dungeon_raid_core::{
    CellCoord, EnginePhase, Event, PlayerSnapshot, PoolSnapshot, SkillSlotSnapshot, TileKind,
    TileView,
};
use dungeon_raid_world::{query, World};

use crate::input::cell_label;

/// Writes the grid, player status, skills and whatever the phase asks for next.
pub(crate) fn write_state(out: &mut impl Write, world: &World) -> io::Result<()> {
    let view = query::tile_view(world);
    write!(out, "{}", grid(&view))?;
    writeln!(out, "{}", status(&query::player_snapshot(world)))?;
    writeln!(out, "{}", skills(&query::skill_slots(world)))?;
    if query::freeze_armed(world) {
        writeln!(out, "frozen: enemies skip their next counterattack")?;
    }

    match query::phase(world) {
        EnginePhase::Drafting => match query::pending_offer(world) {
            Some(offer) => {
                writeln!(out, "{} level up! choose an upgrade:", offer.category.label())?;
                for (index, upgrade) in offer.choices.iter().enumerate() {
                    writeln!(
                        out,
                        "  {}. {}: {}",
                        index + 1,
                        upgrade.name(),
                        upgrade.description()
                    )?;
                }
            }
            None => writeln!(out, "waiting for upgrade candidates")?,
        },
        EnginePhase::GameOver => writeln!(out, "game over; `restart` or `quit`")?,
        EnginePhase::Idle | EnginePhase::Resolving => {}
    }
    Ok(())
}

/// Renders the grid with column letters and row numbers.
///
/// Enemies show their remaining hit points and freshly spawned tiles carry a `+`.
fn grid(view: &TileView) -> String {
    let (columns, rows) = view.dimensions();
    let mut text = String::from("   ");
    for column in 0..columns {
        let letter = char::from_u32(u32::from('a') + column).unwrap_or('?');
        text.push_str(&format!(" {letter:<3}"));
    }
    text.push('\n');

    for row in 0..rows {
        text.push_str(&format!("{:>2} ", row + 1));
        for column in 0..columns {
            let cell = match view.at(CellCoord::new(column, row)) {
                Some(tile) => {
                    let detail = match (tile.kind, tile.stats) {
                        (TileKind::Enemy, Some(stats)) => stats.hp.to_string(),
                        _ => String::new(),
                    };
                    let fresh = if tile.is_new { "+" } else { "" };
                    format!("{}{detail}{fresh}", tile.kind.glyph())
                }
                None => String::from("."),
            };
            text.push_str(&format!(" {cell:<3}"));
        }
        text.push('\n');
    }

    let enemies: Vec<String> = view
        .iter()
        .filter_map(|tile| {
            tile.stats.map(|stats| {
                format!(
                    "{} atk {} def {} hp {}",
                    cell_label(tile.cell),
                    stats.attack,
                    stats.defense,
                    stats.hp
                )
            })
        })
        .collect();
    if !enemies.is_empty() {
        text.push_str(&format!("enemies: {}\n", enemies.join(", ")));
    }
    text
}

fn pool(pool: PoolSnapshot) -> String {
    format!("{}/{}", pool.current, pool.max)
}

fn status(player: &PlayerSnapshot) -> String {
    let mut line = format!(
        "hp {}  def {}  atk {}+{}/sword  shield {}  coin {}  equip {}  exp {}  score {}  best {}",
        pool(player.hp),
        pool(player.defense),
        player.base_attack,
        player.weapon_attack,
        player.shield_value,
        pool(player.coins),
        pool(player.equipment),
        pool(player.experience),
        player.score,
        player.high_score,
    );
    if player.second_wind {
        line.push_str("  [second wind]");
    }
    line
}

fn skills(slots: &[SkillSlotSnapshot]) -> String {
    let entries: Vec<String> = slots
        .iter()
        .map(|slot| match slot.skill {
            None => format!("[{}] -", slot.slot + 1),
            Some(skill) if slot.is_ready() => format!("[{}] {} ready", slot.slot + 1, skill.name()),
            Some(skill) => format!(
                "[{}] {} {}/{}",
                slot.slot + 1,
                skill.name(),
                slot.cooldown_current,
                slot.cooldown_max
            ),
        })
        .collect();
    format!("skills: {}", entries.join("  "))
}

/// One-line message for events worth telling the player about.
pub(crate) fn describe(event: &Event) -> Option<String> {
    let message = match event {
        Event::SelectionDiscarded { length } => {
            format!("a chain needs at least 3 tiles, got {length}")
        }
        Event::EnemyKilled { score, .. } => format!("enemy slain (+{score})"),
        Event::ResourcesGathered {
            coins,
            equipment,
            experience,
            healed,
            defense,
        } => {
            let parts: Vec<String> = [
                ("coin", *coins),
                ("equipment", *equipment),
                ("exp", *experience),
                ("hp", *healed),
                ("def", *defense),
            ]
            .into_iter()
            .filter(|(_, amount)| *amount > 0)
            .map(|(label, amount)| format!("+{amount} {label}"))
            .collect();
            if parts.is_empty() {
                return None;
            }
            format!("gathered {}", parts.join(", "))
        }
        Event::LevelUp { category } => format!("{} level up", category.label()),
        Event::CounterAttack { damage, attackers } => {
            format!("{attackers} enemies strike back for {damage} damage")
        }
        Event::SkillActivated { skill, .. } => {
            format!("{} cast: {}", skill.name(), skill.description())
        }
        Event::UpgradeApplied { upgrade } => format!("gained {}", upgrade.name()),
        Event::SecondWindTriggered => String::from("second wind! you cling on with 1 hp"),
        Event::GameOver {
            score,
            high_score,
            new_high_score,
        } => {
            if *new_high_score {
                format!("you died with {score} points, a new best!")
            } else {
                format!("you died with {score} points (best {high_score})")
            }
        }
        Event::CommandRejected { reason } => format!("rejected: {reason}"),
        Event::PhaseChanged { .. }
        | Event::EnemyDamaged { .. }
        | Event::GridCollapsed { .. }
        | Event::TurnResolved { .. }
        | Event::DraftRequested { .. }
        | Event::DraftOffered { .. } => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_raid_core::{CombatStats, RejectionReason, SkillKind, TileId, TileSnapshot};

    fn snapshot(index: u32, kind: TileKind, stats: Option<CombatStats>) -> TileSnapshot {
        TileSnapshot {
            id: TileId::new(index),
            kind,
            cell: CellCoord::new(index % 2, index / 2),
            is_new: index == 1,
            turns_alive: 0,
            stats,
        }
    }

    #[test]
    fn grid_marks_enemy_health_and_fresh_tiles() {
        let view = TileView::from_snapshots(
            2,
            1,
            vec![
                snapshot(0, TileKind::Enemy, Some(CombatStats::new(5, 0, 3))),
                snapshot(1, TileKind::Coin, None),
            ],
        );

        let text = grid(&view);

        assert!(text.contains(" 1  E3  C+"), "{text}");
        assert!(text.contains("enemies: a1 atk 5 def 0 hp 3"), "{text}");
    }

    #[test]
    fn quiet_events_are_not_described() {
        assert!(describe(&Event::SecondWindTriggered).is_some());
        assert!(describe(&Event::TurnResolved {
            turn: 1,
            removed: Vec::new(),
            spawned: Vec::new(),
            player_damage: 0,
        })
        .is_none());
        assert!(describe(&Event::ResourcesGathered {
            coins: 0,
            equipment: 0,
            experience: 0,
            healed: 0,
            defense: 0,
        })
        .is_none());
    }

    #[test]
    fn skill_casts_carry_their_description() {
        let message = describe(&Event::SkillActivated {
            slot: 0,
            skill: SkillKind::Freeze,
        })
        .expect("message");
        assert_eq!(message, "Freeze cast: Freezes enemies for a turn.");
    }

    #[test]
    fn rejections_explain_themselves() {
        let message = describe(&Event::CommandRejected {
            reason: RejectionReason::SkillOnCooldown,
        })
        .expect("message");
        assert_eq!(message, "rejected: the skill is still on cooldown");
    }
}
