use dungeon_raid_core::{
    Balance, Command, EnginePhase, Event, ResourceCategory, TileId, TileKind,
};
use dungeon_raid_system_drafting::{Config, Drafting, DEFAULT_DRAFT_SIZE};
use dungeon_raid_world::{self as world, query, Config as WorldConfig, TileSeed, World};

#[test]
fn answers_each_draft_request() {
    let mut drafting = Drafting::new(Config::new(DEFAULT_DRAFT_SIZE, 17));
    let mut commands = Vec::new();

    drafting.handle(
        &[
            Event::PhaseChanged {
                phase: EnginePhase::Drafting,
            },
            Event::DraftRequested {
                category: ResourceCategory::Coin,
            },
        ],
        &mut commands,
    );

    assert_eq!(commands.len(), 1);
    let Command::OfferDraft { category, upgrades } = &commands[0] else {
        panic!("expected an offer, got {:?}", commands[0]);
    };
    assert_eq!(*category, ResourceCategory::Coin);
    assert_eq!(upgrades.len(), DEFAULT_DRAFT_SIZE);
}

#[test]
fn ignores_unrelated_events() {
    let mut drafting = Drafting::new(Config::new(DEFAULT_DRAFT_SIZE, 17));
    let mut commands = Vec::new();

    drafting.handle(
        &[Event::LevelUp {
            category: ResourceCategory::Experience,
        }],
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn same_seed_drafts_the_same_candidates() {
    let request = [Event::DraftRequested {
        category: ResourceCategory::Experience,
    }];
    let mut first = Vec::new();
    let mut second = Vec::new();

    Drafting::new(Config::new(3, 5)).handle(&request, &mut first);
    Drafting::new(Config::new(3, 5)).handle(&request, &mut second);

    assert_eq!(first, second);
}

#[test]
fn world_offers_what_the_system_drafts() {
    let balance = Balance {
        columns: 3,
        rows: 1,
        max_coins: 3,
        coin_bonus_rate: 0.0,
        ..Balance::default()
    };
    let layout = vec![TileSeed::new(TileKind::Coin); 3];
    let mut world = World::with_layout(WorldConfig::new(balance, 1), layout).expect("layout");
    let mut drafting = Drafting::new(Config::new(2, 1));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::CommitSelection {
            path: vec![TileId::new(0), TileId::new(1), TileId::new(2)],
        },
        &mut events,
    );
    assert_eq!(query::phase(&world), EnginePhase::Drafting);

    let mut commands = Vec::new();
    drafting.handle(&events, &mut commands);
    let mut offered = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut offered);
    }

    let offer = query::pending_offer(&world).expect("offer pending");
    assert_eq!(offer.category, ResourceCategory::Coin);
    assert_eq!(offer.choices.len(), 2);
    assert_eq!(
        offered,
        vec![Event::DraftOffered {
            offer: offer.clone()
        }]
    );
}
