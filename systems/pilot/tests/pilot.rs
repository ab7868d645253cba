use chase_core::{Command, Coordinate, Direction, Event, PlayerConfig, SessionConfig};
use chase_system_pilot::Pilot;
use chase_world::{self as world, query, World};

fn world_with(layout: &[&str], start: Coordinate) -> World {
    let config = SessionConfig {
        layout: layout.iter().map(|row| (*row).to_owned()).collect(),
        player: PlayerConfig {
            start,
            ..PlayerConfig::default()
        },
        adversaries: Vec::new(),
        ..SessionConfig::default()
    };
    World::new(&config).expect("setup")
}

fn step(world: &mut World, pilot: &mut Pilot) -> Vec<Command> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
    let mut commands = Vec::new();
    pilot.handle(&events, world, &mut commands);
    for command in commands.clone() {
        let mut generated = Vec::new();
        world::apply(world, command, &mut generated);
    }
    commands
}

#[test]
fn interactive_request_moves_on_next_tick() {
    let mut world = world_with(&["  .", "   "], Coordinate::new(0, 0));
    let mut pilot = Pilot::new(&PlayerConfig::default(), 7).expect("pilot");

    assert!(step(&mut world, &mut pilot).is_empty());

    pilot.request_direction(Direction::East);
    let commands = step(&mut world, &mut pilot);
    assert_eq!(
        commands,
        vec![Command::MovePlayer {
            to: Coordinate::new(1, 0),
            heading: Direction::East,
        }]
    );
    assert_eq!(query::player(&world).cell, Coordinate::new(1, 0));

    assert!(step(&mut world, &mut pilot).is_empty(), "requests are consumed");
}

#[test]
fn blocked_request_only_turns_the_player() {
    let mut world = world_with(&[" x", "  "], Coordinate::new(0, 0));
    let mut pilot = Pilot::new(&PlayerConfig::default(), 7).expect("pilot");

    pilot.request_direction(Direction::East);
    let commands = step(&mut world, &mut pilot);

    assert_eq!(
        commands,
        vec![Command::TurnPlayer {
            heading: Direction::East
        }]
    );
    assert_eq!(query::player(&world).cell, Coordinate::new(0, 0));
}

#[test]
fn script_replays_turns_and_moves() {
    let mut world = world_with(&["   ", "   ", "  ."], Coordinate::new(0, 0));
    let config = PlayerConfig {
        start: Coordinate::new(0, 0),
        auto: true,
        moves: "M,R,M,M,L,M".to_owned(),
    };
    let mut pilot = Pilot::new(&config, 7).expect("pilot");

    for _ in 0..6 {
        let _ = step(&mut world, &mut pilot);
    }

    // East to (1, 0), turn to face south, two steps down, turn east, one step.
    assert_eq!(query::player(&world).cell, Coordinate::new(2, 2));
    assert_eq!(query::remaining_score_items(&world), 0);
}

#[test]
fn scripted_move_into_wall_is_skipped() {
    let mut world = world_with(&[" x."], Coordinate::new(0, 0));
    let config = PlayerConfig {
        start: Coordinate::new(0, 0),
        auto: true,
        moves: "M".to_owned(),
    };
    let mut pilot = Pilot::new(&config, 7).expect("pilot");

    assert!(step(&mut world, &mut pilot).is_empty());
    assert_eq!(query::player(&world).cell, Coordinate::new(0, 0));
}

#[test]
fn exhausted_script_hunts_the_nearest_item() {
    let mut world = world_with(&["     ", "     ", "    ."], Coordinate::new(0, 0));
    let config = PlayerConfig {
        start: Coordinate::new(0, 0),
        auto: true,
        moves: String::new(),
    };
    let mut pilot = Pilot::new(&config, 7).expect("pilot");

    for _ in 0..6 {
        let _ = step(&mut world, &mut pilot);
    }

    assert_eq!(query::player(&world).cell, Coordinate::new(4, 2));
    assert_eq!(query::remaining_score_items(&world), 0);
}

#[test]
fn ignores_batches_without_time_advancing() {
    let world = world_with(&["  "], Coordinate::new(0, 0));
    let mut pilot = Pilot::new(&PlayerConfig::default(), 7).expect("pilot");
    pilot.request_direction(Direction::East);
    let mut commands = Vec::new();

    pilot.handle(
        &[Event::PlayerTurned {
            heading: Direction::East,
        }],
        &world,
        &mut commands,
    );

    assert!(commands.is_empty());
}
