use dungeon_raid_core::{
    Balance, Command, CombatStats, EnginePhase, Event, RejectionReason, ResourceCategory,
    SkillKind, TileId, TileKind, UpgradeKind,
};
use dungeon_raid_world::{self as world, query, Config, TileSeed, World};

fn calm() -> Balance {
    Balance {
        coin_bonus_rate: 0.0,
        shield_bonus_rate: 0.0,
        potion_bonus_rate: 0.0,
        ..Balance::default()
    }
}

fn sized(columns: u32, rows: u32, balance: Balance) -> Balance {
    Balance {
        columns,
        rows,
        ..balance
    }
}

fn build(balance: Balance, layout: Vec<TileSeed>) -> World {
    World::with_layout(Config::new(balance, 21), layout).expect("layout")
}

fn ids(raw: &[u32]) -> Vec<TileId> {
    raw.iter().copied().map(TileId::new).collect()
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn commit(world: &mut World, raw: &[u32]) -> Vec<Event> {
    run(world, Command::CommitSelection { path: ids(raw) })
}

fn rejected(reason: RejectionReason) -> Vec<Event> {
    vec![Event::CommandRejected { reason }]
}

fn fighting_layout() -> Vec<TileSeed> {
    vec![
        TileSeed::new(TileKind::Sword),
        TileSeed::new(TileKind::Sword),
        TileSeed::enemy(5, 1, 2),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Shield),
        TileSeed::new(TileKind::Potion),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Shield),
        TileSeed::new(TileKind::Potion),
    ]
}

#[test]
fn two_swords_kill_a_defended_enemy() {
    let mut world = build(sized(3, 3, calm()), fighting_layout());

    let events = commit(&mut world, &[0, 1, 2]);

    assert_eq!(
        events.first(),
        Some(&Event::PhaseChanged {
            phase: EnginePhase::Resolving
        })
    );
    assert!(events.contains(&Event::EnemyDamaged {
        tile: TileId::new(2),
        damage: 2,
        remaining_hp: 0,
    }));
    assert!(events.contains(&Event::EnemyKilled {
        tile: TileId::new(2),
        score: 50,
    }));
    assert!(events.contains(&Event::CounterAttack {
        damage: 0,
        attackers: 0,
    }));
    assert_eq!(
        events.last(),
        Some(&Event::PhaseChanged {
            phase: EnginePhase::Idle
        })
    );

    let player = query::player_snapshot(&world);
    assert_eq!(player.score, 50);
    assert_eq!(player.experience.current, 1);
    assert_eq!(query::turn(&world), 1);

    let view = query::tile_view(&world);
    assert!(view.tile(TileId::new(2)).is_none());
    assert_eq!(view.iter().count(), 9);
}

#[test]
fn turn_resolution_reports_the_diff() {
    let mut world = build(sized(3, 3, calm()), fighting_layout());

    let events = commit(&mut world, &[0, 1, 2]);

    let resolved = events.iter().find_map(|event| match event {
        Event::TurnResolved {
            turn,
            removed,
            spawned,
            player_damage,
        } => Some((*turn, removed.clone(), spawned.len(), *player_damage)),
        _ => None,
    });
    assert_eq!(resolved, Some((1, ids(&[0, 1, 2]), 3, 0)));
}

#[test]
fn heavy_armour_still_takes_one_damage() {
    let mut layout = fighting_layout();
    layout[2] = TileSeed::enemy(5, 10, 3);
    let mut world = build(sized(3, 3, calm()), layout);

    let events = commit(&mut world, &[0, 1, 2]);

    assert!(events.contains(&Event::EnemyDamaged {
        tile: TileId::new(2),
        damage: 1,
        remaining_hp: 2,
    }));
    assert!(events.contains(&Event::CounterAttack {
        damage: 0,
        attackers: 1,
    }));
    let view = query::tile_view(&world);
    let survivor = view.tile(TileId::new(2)).expect("enemy survives");
    assert_eq!(survivor.stats, Some(CombatStats::new(5, 10, 2)));
    assert_eq!(query::player_snapshot(&world).defense.current, 9);
}

#[test]
fn bonus_rolls_start_at_the_fourth_tile() {
    let balance = Balance {
        coin_bonus_rate: 1.0,
        ..sized(5, 1, calm())
    };
    let mut world = build(balance, vec![TileSeed::new(TileKind::Coin); 5]);

    let events = commit(&mut world, &[0, 1, 2, 3, 4]);

    assert!(events.contains(&Event::ResourcesGathered {
        coins: 7,
        equipment: 0,
        experience: 0,
        healed: 0,
        defense: 0,
    }));
    assert_eq!(query::player_snapshot(&world).coins.current, 7);
}

#[test]
fn game_over_records_the_high_score_once() {
    let balance = Balance {
        starting_hp: 5,
        starting_defense: 0,
        ..sized(4, 1, calm())
    };
    let layout = vec![
        TileSeed::new(TileKind::Sword),
        TileSeed::new(TileKind::Sword),
        TileSeed::enemy(1, 0, 1),
        TileSeed::enemy(10, 0, 99),
    ];
    let mut world =
        World::with_layout(Config::new(balance, 4).with_high_score(20), layout).expect("layout");

    let events = commit(&mut world, &[0, 1, 2]);

    let game_overs: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::GameOver { .. }))
        .collect();
    assert_eq!(
        game_overs,
        vec![&Event::GameOver {
            score: 50,
            high_score: 50,
            new_high_score: true,
        }]
    );
    assert_eq!(
        events.last(),
        Some(&Event::PhaseChanged {
            phase: EnginePhase::GameOver
        })
    );
    assert_eq!(query::phase(&world), EnginePhase::GameOver);

    assert_eq!(
        commit(&mut world, &[0, 1, 2]),
        rejected(RejectionReason::GameOver)
    );
    assert_eq!(
        run(&mut world, Command::ActivateSkill { slot: 0 }),
        rejected(RejectionReason::GameOver)
    );
    assert_eq!(query::player_snapshot(&world).high_score, 50);
}

#[test]
fn losing_below_the_high_score_keeps_it() {
    let balance = Balance {
        starting_hp: 1,
        starting_defense: 0,
        ..sized(4, 1, calm())
    };
    let layout = vec![
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::enemy(3, 0, 3),
    ];
    let mut world =
        World::with_layout(Config::new(balance, 4).with_high_score(200), layout).expect("layout");

    let events = commit(&mut world, &[0, 1, 2]);

    assert!(events.contains(&Event::GameOver {
        score: 0,
        high_score: 200,
        new_high_score: false,
    }));
}

fn draft_layout() -> Vec<TileSeed> {
    vec![
        TileSeed::new(TileKind::Sword),
        TileSeed::new(TileKind::Sword),
        TileSeed::enemy(1, 0, 1),
        TileSeed::enemy(3, 0, 99),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Potion),
    ]
}

fn learn_through_experience(world: &mut World, upgrade: UpgradeKind) {
    let events = commit(world, &[0, 1, 2]);
    assert!(events.ends_with(&[
        Event::PhaseChanged {
            phase: EnginePhase::Drafting
        },
        Event::DraftRequested {
            category: ResourceCategory::Experience
        },
    ]));

    let events = run(
        world,
        Command::OfferDraft {
            category: ResourceCategory::Experience,
            upgrades: vec![upgrade],
        },
    );
    assert_eq!(
        events,
        vec![Event::DraftOffered {
            offer: dungeon_raid_core::DraftOffer {
                category: ResourceCategory::Experience,
                choices: vec![upgrade],
            }
        }]
    );

    let events = run(world, Command::ChooseUpgrade { choice: 0 });
    assert_eq!(
        events,
        vec![
            Event::UpgradeApplied { upgrade },
            Event::PhaseChanged {
                phase: EnginePhase::Idle
            },
        ]
    );
}

#[test]
fn second_wind_revives_once() {
    let balance = Balance {
        starting_hp: 5,
        starting_defense: 0,
        max_experience: 1,
        ..sized(4, 2, calm())
    };
    let mut world = build(balance, draft_layout());

    learn_through_experience(&mut world, UpgradeKind::SecondWind);
    assert_eq!(query::player_snapshot(&world).hp.current, 2);
    assert!(query::player_snapshot(&world).second_wind);

    let events = commit(&mut world, &[4, 5, 6]);

    assert!(events.contains(&Event::SecondWindTriggered));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::GameOver { .. })));
    let player = query::player_snapshot(&world);
    assert_eq!(player.hp.current, 1);
    assert!(!player.second_wind);
    assert_ne!(query::phase(&world), EnginePhase::GameOver);
}

#[test]
fn freeze_cancels_the_next_counterattack() {
    let balance = Balance {
        starting_defense: 0,
        max_experience: 1,
        ..sized(4, 2, calm())
    };
    let mut world = build(balance, draft_layout());

    learn_through_experience(&mut world, UpgradeKind::LearnFreeze);
    let hp_before = query::player_snapshot(&world).hp.current;

    let events = run(&mut world, Command::ActivateSkill { slot: 0 });
    assert_eq!(
        events,
        vec![Event::SkillActivated {
            slot: 0,
            skill: SkillKind::Freeze
        }]
    );
    assert!(query::freeze_armed(&world));
    assert_eq!(
        run(&mut world, Command::ActivateSkill { slot: 0 }),
        rejected(RejectionReason::SkillOnCooldown)
    );

    let events = commit(&mut world, &[4, 5, 6]);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CounterAttack { .. })));
    assert_eq!(query::player_snapshot(&world).hp.current, hp_before);
    assert!(!query::freeze_armed(&world));
    assert_eq!(query::skill_slots(&world)[0].cooldown_current, 5);
}

#[test]
fn fireball_kills_award_score_and_collapse() {
    let balance = Balance {
        max_coins: 3,
        ..sized(3, 2, calm())
    };
    let layout = vec![
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::enemy(5, 0, 2),
        TileSeed::enemy(5, 0, 1),
        TileSeed::new(TileKind::Sword),
    ];
    let mut world = build(balance, layout);

    let events = commit(&mut world, &[0, 1, 2]);
    assert!(events.contains(&Event::DraftRequested {
        category: ResourceCategory::Coin
    }));
    let _ = run(
        &mut world,
        Command::OfferDraft {
            category: ResourceCategory::Coin,
            upgrades: vec![UpgradeKind::LearnFireball, UpgradeKind::UpgradeHp],
        },
    );
    let _ = run(&mut world, Command::ChooseUpgrade { choice: 0 });
    assert_eq!(query::phase(&world), EnginePhase::Idle);

    let events = run(&mut world, Command::ActivateSkill { slot: 0 });

    assert_eq!(
        events.first(),
        Some(&Event::SkillActivated {
            slot: 0,
            skill: SkillKind::Fireball
        })
    );
    for raw in [3, 4] {
        assert!(events.contains(&Event::EnemyKilled {
            tile: TileId::new(raw),
            score: 50,
        }));
    }
    let removed = events.iter().find_map(|event| match event {
        Event::GridCollapsed { removed, .. } => Some(removed.clone()),
        _ => None,
    });
    assert!(removed.is_some_and(|removed| removed.contains(&TileId::new(3))
        && removed.contains(&TileId::new(4))));

    let player = query::player_snapshot(&world);
    assert!(player.score >= 100);
    assert!(player.experience.current >= 2);
    let view = query::tile_view(&world);
    assert!(view.tile(TileId::new(3)).is_none());
    assert_eq!(view.iter().count(), 6);
    assert_eq!(query::skill_slots(&world)[0].cooldown_current, 5);
}

#[test]
fn empty_skill_slot_is_rejected() {
    let mut world = build(sized(3, 3, calm()), fighting_layout());
    assert_eq!(
        run(&mut world, Command::ActivateSkill { slot: 0 }),
        rejected(RejectionReason::EmptySkillSlot)
    );
    assert_eq!(
        run(&mut world, Command::ActivateSkill { slot: 9 }),
        rejected(RejectionReason::EmptySkillSlot)
    );
}
