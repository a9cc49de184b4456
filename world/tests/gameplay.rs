use std::time::Duration;

use cat_bin_core::{
    CloseReason, Command, Event, GameStatus, Modifier, OccupantKind, PowerUpKind, SlotId,
};
use cat_bin_world::{self as world, query, World};

fn apply_all(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn started_world() -> World {
    let mut world = World::new();
    let _ = apply_all(&mut world, [Command::StartGame]);
    world
}

fn open(slot: u32, kind: OccupantKind) -> Command {
    Command::OpenSlot {
        slot: SlotId::new(slot),
        kind,
    }
}

fn click(slot: u32) -> Command {
    Command::ClickSlot {
        slot: SlotId::new(slot),
    }
}

fn tick(millis: u64) -> Command {
    Command::Tick {
        dt: Duration::from_millis(millis),
    }
}

#[test]
fn clicking_normal_cat_scores_and_closes_slot() {
    let mut world = started_world();
    assert_eq!(query::slot_view(&world).len(), 4);
    assert_eq!(query::lives(&world), 5);

    let events = apply_all(
        &mut world,
        [open(0, OccupantKind::Normal), tick(100), click(0)],
    );

    assert_eq!(query::score(&world), 10);
    assert_eq!(query::slot_view(&world).open_count(), 0);
    assert!(events.contains(&Event::ScoreChanged {
        score: 10,
        delta: 10
    }));
    assert!(events.contains(&Event::SlotClosed {
        slot: SlotId::new(0),
        kind: OccupantKind::Normal,
        reason: CloseReason::Caught,
    }));
}

#[test]
fn sticky_cat_needs_two_clicks() {
    let mut world = started_world();
    let _ = apply_all(&mut world, [open(1, OccupantKind::Sticky)]);

    let first = apply_all(&mut world, [click(1)]);
    assert_eq!(
        first,
        vec![
            Event::Clicked {
                slot: SlotId::new(1)
            },
            Event::SlotHit {
                slot: SlotId::new(1),
                hits_remaining: 1,
            }
        ]
    );
    let snapshot = query::slot_view(&world)
        .get(SlotId::new(1))
        .copied()
        .expect("slot exists");
    assert!(snapshot.is_open());
    assert_eq!(snapshot.hits_remaining(), 1);
    assert_eq!(query::score(&world), 0);

    let _ = apply_all(&mut world, [click(1)]);
    assert_eq!(query::score(&world), 30);
    assert!(!query::slot_view(&world)
        .get(SlotId::new(1))
        .expect("slot exists")
        .is_open());
}

#[test]
fn frenzy_doubles_final_gain() {
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            open(0, OccupantKind::PowerUp(PowerUpKind::Frenzy)),
            click(0),
            open(1, OccupantKind::Sticky),
            click(1),
            click(1),
        ],
    );
    assert_eq!(query::score(&world), 60);
}

#[test]
fn repellent_closes_every_slot_and_blocks_spawns() {
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            open(0, OccupantKind::Normal),
            open(1, OccupantKind::Grumpy),
            open(2, OccupantKind::PowerUp(PowerUpKind::Repellent)),
            open(3, OccupantKind::Sleepy),
        ],
    );
    assert_eq!(query::slot_view(&world).open_count(), 4);

    let events = apply_all(&mut world, [click(2)]);
    assert_eq!(query::slot_view(&world).open_count(), 0);
    assert!(query::active_modifiers(&world).contains(Modifier::Repelled));
    assert_eq!(query::lives(&world), 5);
    let repelled = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::SlotClosed {
                    reason: CloseReason::Repelled,
                    ..
                }
            )
        })
        .count();
    assert_eq!(repelled, 4);

    let blocked = apply_all(&mut world, [tick(1000), open(0, OccupantKind::Normal)]);
    assert!(!blocked
        .iter()
        .any(|event| matches!(event, Event::OccupantSpawned { .. })));

    let _ = apply_all(&mut world, [tick(3000)]);
    assert!(query::active_modifiers(&world).is_empty());
    let _ = apply_all(&mut world, [open(0, OccupantKind::Normal)]);
    assert_eq!(query::slot_view(&world).open_count(), 1);
}

#[test]
fn broom_sweeps_grid_and_grants_bonus() {
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            open(0, OccupantKind::Golden),
            open(3, OccupantKind::PowerUp(PowerUpKind::Broom)),
        ],
    );
    let events = apply_all(&mut world, [click(3)]);

    assert_eq!(query::score(&world), 50);
    assert_eq!(query::slot_view(&world).open_count(), 0);
    assert!(events.contains(&Event::SlotClosed {
        slot: SlotId::new(3),
        kind: OccupantKind::PowerUp(PowerUpKind::Broom),
        reason: CloseReason::Swept,
    }));
    assert!(!events.iter().any(|event| matches!(
        event,
        Event::SlotClosed {
            reason: CloseReason::Caught,
            ..
        }
    )));
}

#[test]
fn clock_adds_time_up_to_cap() {
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            open(0, OccupantKind::PowerUp(PowerUpKind::Clock)),
            click(0),
        ],
    );
    assert_eq!(query::time_remaining(&world), 40);

    for _ in 0..3 {
        let _ = apply_all(
            &mut world,
            [
                open(0, OccupantKind::PowerUp(PowerUpKind::Clock)),
                click(0),
            ],
        );
    }
    assert_eq!(query::time_remaining(&world), 60);
}

#[test]
fn reactivated_power_up_restarts_its_deadline() {
    // Clicks still land while frozen, so the second freeze can be caught mid-window.
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            open(0, OccupantKind::PowerUp(PowerUpKind::Freeze)),
            open(1, OccupantKind::PowerUp(PowerUpKind::Freeze)),
            click(0),
            tick(2000),
            click(1),
        ],
    );
    assert_eq!(
        query::modifier_remaining(&world, Modifier::Frozen),
        Some(Duration::from_secs(5))
    );

    let events = apply_all(&mut world, [tick(4900)]);
    assert!(query::active_modifiers(&world).contains(Modifier::Frozen));
    assert!(!events.contains(&Event::ModifierExpired {
        modifier: Modifier::Frozen
    }));

    let events = apply_all(&mut world, [tick(100)]);
    assert_eq!(
        events
            .iter()
            .filter(|event| **event
                == Event::ModifierExpired {
                    modifier: Modifier::Frozen
                })
            .count(),
        1
    );
    assert!(query::active_modifiers(&world).is_empty());
}

#[test]
fn clicking_closed_slot_changes_nothing_in_every_status() {
    let mut world = World::new();
    assert!(apply_all(&mut world, [click(0)]).is_empty());

    let _ = apply_all(&mut world, [Command::StartGame]);
    assert_eq!(
        apply_all(&mut world, [click(0), click(99)]),
        vec![
            Event::Clicked {
                slot: SlotId::new(0)
            },
            Event::Clicked {
                slot: SlotId::new(99)
            },
        ],
        "missed clicks are reported without touching state"
    );
    assert_eq!(query::score(&world), 0);

    let _ = apply_all(&mut world, [open(0, OccupantKind::Normal), Command::Pause]);
    assert!(apply_all(&mut world, [click(0)]).is_empty());
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::slot_view(&world).open_count(), 1);
}

#[test]
fn last_life_triggers_single_game_over() {
    let mut world = started_world();
    let mut game_overs = 0;
    for _ in 0..7 {
        let events = apply_all(
            &mut world,
            [
                open(0, OccupantKind::Normal),
                Command::CloseSlot {
                    slot: SlotId::new(0),
                    reason: CloseReason::Expired,
                },
            ],
        );
        game_overs += events
            .iter()
            .filter(|event| matches!(event, Event::GameOver { .. }))
            .count();
    }

    assert_eq!(game_overs, 1);
    assert_eq!(query::lives(&world), 0);
    assert_eq!(query::status(&world), GameStatus::GameOver);

    let clock = query::clock(&world);
    assert!(apply_all(&mut world, [tick(5000)]).is_empty());
    assert_eq!(query::clock(&world), clock);
}

#[test]
fn countdown_wins_level_and_next_level_keeps_progress() {
    let mut world = started_world();
    let _ = apply_all(&mut world, [open(0, OccupantKind::Playful), click(0)]);

    let events = apply_all(&mut world, [tick(30_000)]);
    assert_eq!(query::status(&world), GameStatus::LevelWon);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::LevelWon { .. }))
            .count(),
        1
    );

    let _ = apply_all(&mut world, [Command::NextLevel]);
    assert_eq!(query::status(&world), GameStatus::Playing);
    assert_eq!(query::level(&world), 2);
    assert_eq!(query::score(&world), 20);
    assert_eq!(query::lives(&world), 5);
    assert_eq!(query::time_remaining(&world), 30);
}

#[test]
fn pause_freezes_modifier_deadlines() {
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            open(0, OccupantKind::PowerUp(PowerUpKind::Slow)),
            click(0),
            tick(1000),
            Command::Pause,
            tick(60_000),
            Command::Resume,
        ],
    );
    assert_eq!(
        query::modifier_remaining(&world, Modifier::SlowMotion),
        Some(Duration::from_secs(7))
    );
    assert_eq!(query::time_remaining(&world), 29);
}

#[test]
fn start_game_from_pause_performs_full_reset() {
    let mut world = started_world();
    let _ = apply_all(
        &mut world,
        [
            open(0, OccupantKind::Golden),
            click(0),
            open(1, OccupantKind::PowerUp(PowerUpKind::Frenzy)),
            click(1),
            Command::Pause,
            Command::StartGame,
        ],
    );
    assert_eq!(query::status(&world), GameStatus::Playing);
    assert_eq!(query::score(&world), 0);
    assert!(query::active_modifiers(&world).is_empty());
}

#[test]
fn invalid_status_commands_are_ignored() {
    let mut world = World::new();
    assert!(apply_all(
        &mut world,
        [Command::Resume, Command::Pause, Command::NextLevel, Command::QuitToMenu]
    )
    .is_empty());
    assert_eq!(query::status(&world), GameStatus::Menu);
}
