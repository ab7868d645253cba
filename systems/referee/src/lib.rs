#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick loop and termination rules.
//!
//! A [`Session`] owns the world and both agent systems. Every tick it
//! advances the clock, lets the adversaries act, checks for a catch, lets the
//! player act and finally evaluates the outcome. Once decided, the world is
//! halted and the session stops advancing.

use chase_core::{Command, Direction, Event, Outcome, SessionConfig, SetupError, Snapshot};
use chase_system_pilot::Pilot;
use chase_system_pursuit::Pursuit;
use chase_world::{self as world, query, World};

/// Evaluates the termination predicate against the current world.
///
/// A catch wins over a cleared board when both hold at once.
#[must_use]
pub fn evaluate(world: &World) -> Outcome {
    let player = query::player(world).cell;
    if !query::adversaries_at(world, player).is_empty() {
        Outcome::Lost
    } else if query::remaining_score_items(world) == 0 {
        Outcome::Won
    } else {
        Outcome::Running
    }
}

/// A single chase from setup to outcome.
#[derive(Debug)]
pub struct Session {
    world: World,
    pursuit: Pursuit,
    pilot: Pilot,
    outcome: Outcome,
    last_events: Vec<Event>,
}

impl Session {
    /// Assembles the world and agents, then evaluates the outcome at tick zero.
    pub fn new(config: &SessionConfig) -> Result<Self, SetupError> {
        let world = World::new(config)?;
        let pilot = Pilot::new(&config.player, config.seed)?;
        let pursuit = Pursuit::new(config.seed, &world);

        let mut session = Self {
            world,
            pursuit,
            pilot,
            outcome: Outcome::Running,
            last_events: Vec::new(),
        };
        let outcome = evaluate(&session.world);
        if outcome.is_decided() {
            session.finish(outcome);
        }
        Ok(session)
    }

    /// Advances the simulation by one tick and returns the resulting state.
    ///
    /// Once the outcome is decided the session no longer changes and the
    /// final snapshot is returned unchanged.
    pub fn on_tick(&mut self) -> Snapshot {
        if self.outcome.is_decided() {
            return self.snapshot();
        }
        self.last_events.clear();

        let mut clock = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut clock);
        self.last_events.extend_from_slice(&clock);

        let mut commands = Vec::new();
        self.pursuit.handle(&clock, &self.world, &mut commands);
        let _ = self.execute(&mut commands);

        if evaluate(&self.world) == Outcome::Lost {
            self.finish(Outcome::Lost);
            return self.snapshot();
        }

        self.pilot.handle(&clock, &self.world, &mut commands);
        let player_events = self.execute(&mut commands);
        self.pursuit.handle(&player_events, &self.world, &mut commands);

        let outcome = evaluate(&self.world);
        if outcome.is_decided() {
            self.finish(outcome);
        }
        self.snapshot()
    }

    /// Forwards a direction request to the player.
    ///
    /// Only the four orthogonal directions move the player; diagonal
    /// requests are ignored.
    pub fn on_direction_request(&mut self, direction: Direction) {
        self.pilot.request_direction(direction);
    }

    /// Runs until the outcome is decided or `max_ticks` ticks have elapsed.
    pub fn run(&mut self, max_ticks: u64) -> Outcome {
        while !self.outcome.is_decided() && query::tick(&self.world) < max_ticks {
            let _ = self.on_tick();
        }
        self.outcome
    }

    /// Current termination state.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Captures the current state without advancing.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        query::snapshot(&self.world, self.outcome)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent tick, in the order they happened.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.last_events
    }

    fn execute(&mut self, commands: &mut Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }
        self.last_events.extend_from_slice(&events);
        events
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        let player = query::player(&self.world);
        tracing::info!(
            tick = query::tick(&self.world),
            ?outcome,
            score = player.score,
            remaining = query::remaining_score_items(&self.world),
            "session decided"
        );
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Halt { outcome }, &mut events);
        self.last_events.extend(events);
    }
}
