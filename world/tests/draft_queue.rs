use dungeon_raid_core::{
    Balance, Command, DraftOffer, EnginePhase, Event, RejectionReason, ResourceCategory, TileId,
    TileKind, UpgradeKind,
};
use dungeon_raid_world::{self as world, query, Config, TileSeed, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn rejected(reason: RejectionReason) -> Vec<Event> {
    vec![Event::CommandRejected { reason }]
}

fn offer(category: ResourceCategory, upgrades: Vec<UpgradeKind>) -> Command {
    Command::OfferDraft { category, upgrades }
}

/// Three coins with a coin maximum of one queue three coin level-ups.
fn drafting_world() -> World {
    let balance = Balance {
        columns: 3,
        rows: 2,
        max_coins: 1,
        coin_bonus_rate: 0.0,
        shield_bonus_rate: 0.0,
        potion_bonus_rate: 0.0,
        ..Balance::default()
    };
    let layout = vec![
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Coin),
        TileSeed::new(TileKind::Potion),
        TileSeed::new(TileKind::Potion),
        TileSeed::new(TileKind::Potion),
    ];
    let mut world = World::with_layout(Config::new(balance, 8), layout).expect("layout");

    let events = run(
        &mut world,
        Command::CommitSelection {
            path: vec![TileId::new(0), TileId::new(1), TileId::new(2)],
        },
    );
    let level_ups = events
        .iter()
        .filter(|event| matches!(event, Event::LevelUp { .. }))
        .count();
    assert_eq!(level_ups, 3);
    assert!(events.ends_with(&[
        Event::PhaseChanged {
            phase: EnginePhase::Drafting
        },
        Event::DraftRequested {
            category: ResourceCategory::Coin
        },
    ]));
    world
}

#[test]
fn turn_input_is_refused_while_drafting() {
    let mut world = drafting_world();

    assert_eq!(
        run(
            &mut world,
            Command::CommitSelection {
                path: vec![TileId::new(3), TileId::new(4), TileId::new(5)],
            },
        ),
        rejected(RejectionReason::EngineBusy)
    );
    assert_eq!(
        run(&mut world, Command::ActivateSkill { slot: 0 }),
        rejected(RejectionReason::EngineBusy)
    );
    assert_eq!(query::phase(&world), EnginePhase::Drafting);
    assert_eq!(query::pending_level_ups(&world), 3);
}

#[test]
fn drafts_must_match_the_queue_head() {
    let mut world = drafting_world();

    assert_eq!(
        run(
            &mut world,
            offer(ResourceCategory::Experience, vec![UpgradeKind::Wisdom]),
        ),
        rejected(RejectionReason::UnexpectedDraft)
    );
    assert_eq!(
        run(
            &mut world,
            offer(ResourceCategory::Coin, vec![UpgradeKind::Wisdom]),
        ),
        rejected(RejectionReason::UnexpectedDraft)
    );
    assert_eq!(
        run(&mut world, Command::ChooseUpgrade { choice: 0 }),
        rejected(RejectionReason::NoPendingDraft)
    );

    let events = run(
        &mut world,
        offer(
            ResourceCategory::Coin,
            vec![
                UpgradeKind::UpgradeWeapon,
                UpgradeKind::UpgradeWeapon,
                UpgradeKind::UpgradeShield,
            ],
        ),
    );
    let expected = DraftOffer {
        category: ResourceCategory::Coin,
        choices: vec![UpgradeKind::UpgradeWeapon, UpgradeKind::UpgradeShield],
    };
    assert_eq!(
        events,
        vec![Event::DraftOffered {
            offer: expected.clone()
        }]
    );
    assert_eq!(query::pending_offer(&world), Some(&expected));

    assert_eq!(
        run(
            &mut world,
            offer(ResourceCategory::Coin, vec![UpgradeKind::UpgradeHp]),
        ),
        rejected(RejectionReason::UnexpectedDraft)
    );
    assert_eq!(
        run(&mut world, Command::ChooseUpgrade { choice: 2 }),
        rejected(RejectionReason::InvalidChoice)
    );
}

#[test]
fn queue_drains_one_draft_at_a_time() {
    let mut world = drafting_world();

    let _ = run(
        &mut world,
        offer(ResourceCategory::Coin, vec![UpgradeKind::UpgradeWeapon]),
    );
    let events = run(&mut world, Command::ChooseUpgrade { choice: 0 });
    assert_eq!(
        events,
        vec![
            Event::UpgradeApplied {
                upgrade: UpgradeKind::UpgradeWeapon
            },
            Event::DraftRequested {
                category: ResourceCategory::Coin
            },
        ]
    );
    assert_eq!(query::pending_level_ups(&world), 2);
    assert_eq!(query::player_snapshot(&world).weapon_attack, 2);

    let events = run(&mut world, offer(ResourceCategory::Coin, Vec::new()));
    assert_eq!(
        events,
        vec![Event::DraftRequested {
            category: ResourceCategory::Coin
        }]
    );
    assert_eq!(query::pending_level_ups(&world), 1);

    let _ = run(
        &mut world,
        offer(ResourceCategory::Coin, vec![UpgradeKind::UpgradeHp]),
    );
    let events = run(&mut world, Command::ChooseUpgrade { choice: 0 });
    assert_eq!(
        events,
        vec![
            Event::UpgradeApplied {
                upgrade: UpgradeKind::UpgradeHp
            },
            Event::PhaseChanged {
                phase: EnginePhase::Idle
            },
        ]
    );
    assert_eq!(query::pending_level_ups(&world), 0);
    assert_eq!(query::pending_offer(&world), None);
    assert_eq!(query::player_snapshot(&world).hp.max, 105);
}
