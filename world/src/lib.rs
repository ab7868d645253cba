#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the maze chase engine.
//!
//! The world owns the maze, the items, the player and every adversary. It is
//! mutated exclusively through [`apply`], which validates every movement
//! against the single legality check in [`query::is_legal`] before
//! committing it and reports the outcome as [`Event`] values.

mod grid;
mod items;

use std::collections::HashSet;

use chase_core::{
    AdversaryId, AdversaryKind, CellKind, Command, Coordinate, Direction, Event, ItemKind, Mover,
    SessionConfig, SetupError, StatusEffect, TimingConfig,
};

pub use grid::Grid;
pub use items::Item;

use items::ItemLedger;

/// Represents the authoritative world state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    walls: HashSet<Coordinate>,
    items: ItemLedger,
    gold_cells: Vec<Coordinate>,
    player: Player,
    adversaries: Vec<Adversary>,
    timing: TimingConfig,
    tick: u64,
}

impl World {
    /// Assembles a world from the provided configuration.
    ///
    /// Item overrides are written into the grid before walls are derived, so
    /// an override wins over whatever the layout holds. Any item beneath the
    /// player's starting cell is consumed immediately.
    pub fn new(config: &SessionConfig) -> Result<Self, SetupError> {
        let mut grid = Grid::parse(&config.layout)?;
        let overrides = [
            (&config.items.pills, ItemKind::Pill),
            (&config.items.gold, ItemKind::Gold),
            (&config.items.ice, ItemKind::Ice),
        ];
        for (cells, kind) in overrides {
            for &cell in cells {
                grid.override_cell(cell, kind.into())
                    .map_err(|_| SetupError::ItemOutOfBounds { cell })?;
            }
        }

        let mut walls = HashSet::new();
        let mut items = ItemLedger::default();
        let mut gold_cells = Vec::new();
        for (cell, kind) in grid.cells() {
            if kind == CellKind::Wall {
                let _ = walls.insert(cell);
            }
            if let Some(item) = kind.item() {
                items.place(Item::new(cell, item));
                if item == ItemKind::Gold {
                    gold_cells.push(cell);
                }
            }
        }

        let mut world = Self {
            grid,
            walls,
            items,
            gold_cells,
            player: Player::new(config.player.start),
            adversaries: Vec::with_capacity(config.adversaries.len()),
            timing: config.timing,
            tick: 0,
        };

        if !query::is_legal(&world, config.player.start) {
            return Err(SetupError::PlayerStartBlocked {
                cell: config.player.start,
            });
        }

        for (index, spawn) in config.adversaries.iter().enumerate() {
            if !query::is_legal(&world, spawn.start) {
                return Err(SetupError::AdversaryStartBlocked {
                    index,
                    cell: spawn.start,
                });
            }
            let id = AdversaryId::new(u32::try_from(index).unwrap_or(u32::MAX));
            let mut adversary = Adversary::new(id, spawn.kind, spawn.start);
            if spawn.frozen_for_ticks > 0 {
                adversary.frozen_until_tick = Some(spawn.frozen_for_ticks);
            }
            world.adversaries.push(adversary);
        }

        let mut setup_events = Vec::new();
        world.consume_at(config.player.start, &mut setup_events);
        Ok(world)
    }

    fn adversary_mut(&mut self, id: AdversaryId) -> Option<&mut Adversary> {
        self.adversaries
            .iter_mut()
            .find(|adversary| adversary.id == id)
    }

    fn consume_at(&mut self, cell: Coordinate, out_events: &mut Vec<Event>) {
        let Some(item) = self.items.consume(cell) else {
            return;
        };

        let kind = item.kind();
        let score = kind.score();
        self.player.score = self.player.score.saturating_add(score);
        if kind.counts_toward_completion() {
            self.player.items_eaten = self.player.items_eaten.saturating_add(1);
        }
        tracing::debug!(
            tick = self.tick,
            %cell,
            ?kind,
            score = self.player.score,
            remaining = self.items.remaining_score_items(),
            "player consumed item"
        );
        out_events.push(Event::ItemConsumed { cell, kind, score });

        let Some(effect) = kind.effect() else {
            return;
        };
        let until_tick = match effect {
            StatusEffect::Freeze => self.tick.saturating_add(self.timing.freeze_ticks),
            StatusEffect::Aggravate => self.tick.saturating_add(self.timing.aggravate_ticks),
        };
        let multiplier = self.timing.aggravate_speed_multiplier.max(1);
        for adversary in self.adversaries.iter_mut().filter(|a| !a.halted) {
            match effect {
                StatusEffect::Freeze => {
                    adversary.frozen_until_tick = adversary.frozen_until_tick.max(Some(until_tick));
                }
                StatusEffect::Aggravate => {
                    adversary.aggravated_until_tick =
                        adversary.aggravated_until_tick.max(Some(until_tick));
                    adversary.speed_multiplier = multiplier;
                }
            }
        }
        out_events.push(Event::StatusApplied { effect, until_tick });
    }

    fn expire_statuses(&mut self, out_events: &mut Vec<Event>) {
        let tick = self.tick;
        for adversary in self.adversaries.iter_mut().filter(|a| !a.halted) {
            if adversary.frozen_until_tick.is_some_and(|until| until < tick) {
                adversary.frozen_until_tick = None;
                out_events.push(Event::StatusExpired {
                    adversary: adversary.id,
                    effect: StatusEffect::Freeze,
                });
            }
            if adversary
                .aggravated_until_tick
                .is_some_and(|until| until < tick)
            {
                adversary.aggravated_until_tick = None;
                adversary.speed_multiplier = 1;
                out_events.push(Event::StatusExpired {
                    adversary: adversary.id,
                    effect: StatusEffect::Aggravate,
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick = world.tick.saturating_add(1);
            out_events.push(Event::TimeAdvanced { tick: world.tick });
            world.expire_statuses(out_events);
        }
        Command::MoveAdversary {
            adversary,
            to,
            heading,
        } => {
            let legality = query::legality(world, to);
            let tick = world.tick;
            let Some(entry) = world.adversary_mut(adversary) else {
                return;
            };
            if entry.halted {
                return;
            }
            if let Err(reason) = legality {
                tracing::warn!(
                    tick,
                    adversary = adversary.get(),
                    %to,
                    ?reason,
                    "rejected adversary move"
                );
                out_events.push(Event::MoveRejected {
                    mover: Mover::Adversary(adversary),
                    to,
                    reason,
                });
                return;
            }

            let from = entry.cell;
            entry.cell = to;
            entry.heading = heading;
            tracing::debug!(tick, adversary = adversary.get(), %from, %to, "adversary moved");
            out_events.push(Event::AdversaryMoved {
                adversary,
                from,
                to,
            });
        }
        Command::HoldAdversary { adversary } => {
            let Some(entry) = world.adversary_mut(adversary) else {
                return;
            };
            if entry.halted {
                return;
            }
            tracing::trace!(
                tick = world.tick,
                adversary = adversary.get(),
                "adversary found no legal move"
            );
            out_events.push(Event::AdversaryStalled { adversary });
        }
        Command::MovePlayer { to, heading } => {
            if let Err(reason) = query::legality(world, to) {
                out_events.push(Event::MoveRejected {
                    mover: Mover::Player,
                    to,
                    reason,
                });
                return;
            }

            let from = world.player.cell;
            world.player.cell = to;
            world.player.heading = heading;
            tracing::debug!(tick = world.tick, %from, %to, "player moved");
            out_events.push(Event::PlayerMoved { from, to });
            world.consume_at(to, out_events);
        }
        Command::TurnPlayer { heading } => {
            world.player.heading = heading;
            out_events.push(Event::PlayerTurned { heading });
        }
        Command::Halt { outcome } => {
            for adversary in &mut world.adversaries {
                adversary.halted = true;
            }
            out_events.push(Event::Halted { outcome });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use chase_core::{
        AdversaryId, AdversarySnapshot, AdversaryView, Coordinate, ItemKind, MoveRejection,
        Outcome, PlayerSnapshot, Snapshot,
    };

    use super::{Grid, World};

    /// Provides read-only access to the maze layout.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current tick number. Setup happens at tick zero.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Reports whether the cell is a wall.
    #[must_use]
    pub fn is_wall(world: &World, cell: Coordinate) -> bool {
        world.walls.contains(&cell)
    }

    /// Checks whether an agent may occupy the cell.
    ///
    /// This is the single legality rule every movement goes through: the
    /// cell must lie inside the grid and must not be a wall.
    pub fn legality(world: &World, cell: Coordinate) -> Result<(), MoveRejection> {
        if !world.grid.contains(cell) {
            return Err(MoveRejection::OutOfBounds);
        }
        if is_wall(world, cell) {
            return Err(MoveRejection::IllegalMove);
        }
        Ok(())
    }

    /// Reports whether an agent may occupy the cell.
    #[must_use]
    pub fn is_legal(world: &World, cell: Coordinate) -> bool {
        legality(world, cell).is_ok()
    }

    /// Kind of the item resting on the cell, if any.
    #[must_use]
    pub fn item_at(world: &World, cell: Coordinate) -> Option<ItemKind> {
        world.items.item_at(cell).map(|item| item.kind())
    }

    /// Iterates over the items still on the board in row-major order.
    pub fn items(world: &World) -> impl Iterator<Item = (Coordinate, ItemKind)> + '_ {
        world.items.iter().map(|item| (item.cell(), item.kind()))
    }

    /// Every cell that held gold when the session started, eaten or not.
    #[must_use]
    pub fn gold_cells(world: &World) -> &[Coordinate] {
        &world.gold_cells
    }

    /// Number of pills and gold pieces still on the board.
    #[must_use]
    pub fn remaining_score_items(world: &World) -> u32 {
        world.items.remaining_score_items()
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            heading: world.player.heading,
            score: world.player.score,
            items_eaten: world.player.items_eaten,
        }
    }

    /// Captures a read-only view of every adversary.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        AdversaryView::from_snapshots(
            world
                .adversaries
                .iter()
                .map(|adversary| adversary.snapshot(world.tick))
                .collect(),
        )
    }

    /// Captures the state of a single adversary.
    #[must_use]
    pub fn adversary(world: &World, id: AdversaryId) -> Option<AdversarySnapshot> {
        world
            .adversaries
            .iter()
            .find(|adversary| adversary.id == id)
            .map(|adversary| adversary.snapshot(world.tick))
    }

    /// Identifiers of every adversary standing on the cell.
    #[must_use]
    pub fn adversaries_at(world: &World, cell: Coordinate) -> Vec<AdversaryId> {
        world
            .adversaries
            .iter()
            .filter(|adversary| adversary.cell == cell)
            .map(|adversary| adversary.id)
            .collect()
    }

    /// Reports whether the adversary takes a decision on the current tick.
    ///
    /// Halted and frozen adversaries never act. Otherwise the adversary acts
    /// on ticks divisible by its step period, which aggravation shortens.
    #[must_use]
    pub fn ready_to_act(world: &World, id: AdversaryId) -> bool {
        let Some(adversary) = world.adversaries.iter().find(|a| a.id == id) else {
            return false;
        };
        if adversary.halted || adversary.is_frozen(world.tick) {
            return false;
        }

        let base = world.timing.adversary_step_period.max(1);
        let period = (base / adversary.speed_multiplier(world.tick)).max(1);
        world.tick % u64::from(period) == 0
    }

    /// Captures everything the presentation layer needs after a tick.
    #[must_use]
    pub fn snapshot(world: &World, outcome: Outcome) -> Snapshot {
        let player = player(world);
        Snapshot {
            tick: world.tick,
            outcome,
            player,
            adversaries: adversary_view(world).into_vec(),
            score: player.score,
            remaining_score_items: remaining_score_items(world),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: Coordinate,
    heading: Direction,
    score: u32,
    items_eaten: u32,
}

impl Player {
    fn new(cell: Coordinate) -> Self {
        Self {
            cell,
            heading: Direction::East,
            score: 0,
            items_eaten: 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Adversary {
    id: AdversaryId,
    kind: AdversaryKind,
    cell: Coordinate,
    heading: Direction,
    frozen_until_tick: Option<u64>,
    aggravated_until_tick: Option<u64>,
    speed_multiplier: u32,
    halted: bool,
}

impl Adversary {
    fn new(id: AdversaryId, kind: AdversaryKind, cell: Coordinate) -> Self {
        Self {
            id,
            kind,
            cell,
            heading: Direction::North,
            frozen_until_tick: None,
            aggravated_until_tick: None,
            speed_multiplier: 1,
            halted: false,
        }
    }

    fn is_frozen(&self, tick: u64) -> bool {
        self.frozen_until_tick.is_some_and(|until| until >= tick)
    }

    fn speed_multiplier(&self, tick: u64) -> u32 {
        if self.aggravated_until_tick.is_some_and(|until| until >= tick) {
            self.speed_multiplier.max(1)
        } else {
            1
        }
    }

    fn snapshot(&self, tick: u64) -> chase_core::AdversarySnapshot {
        chase_core::AdversarySnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            heading: self.heading,
            frozen_until_tick: self.frozen_until_tick.filter(|until| *until >= tick),
            speed_multiplier: self.speed_multiplier(tick),
            halted: self.halted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase_core::{AdversaryConfig, ItemOverrides, MoveRejection, Outcome, PlayerConfig};

    fn config(layout: &[&str], player: Coordinate) -> SessionConfig {
        SessionConfig {
            layout: layout.iter().map(|row| (*row).to_owned()).collect(),
            player: PlayerConfig {
                start: player,
                ..PlayerConfig::default()
            },
            adversaries: Vec::new(),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn walls_and_items_derive_from_layout() {
        let world = World::new(&config(&["x.g", " i."], Coordinate::new(0, 1))).expect("setup");

        assert!(query::is_wall(&world, Coordinate::new(0, 0)));
        assert!(!query::is_wall(&world, Coordinate::new(1, 0)));
        assert_eq!(query::remaining_score_items(&world), 3);
        assert_eq!(query::gold_cells(&world), &[Coordinate::new(2, 0)]);
        assert_eq!(query::item_at(&world, Coordinate::new(1, 1)), Some(ItemKind::Ice));
    }

    #[test]
    fn items_are_listed_row_by_row() {
        let world =
            World::new(&config(&["  g", ".i ", "g  "], Coordinate::new(1, 0))).expect("setup");

        let items: Vec<(Coordinate, ItemKind)> = query::items(&world).collect();
        assert_eq!(
            items,
            vec![
                (Coordinate::new(2, 0), ItemKind::Gold),
                (Coordinate::new(0, 1), ItemKind::Pill),
                (Coordinate::new(1, 1), ItemKind::Ice),
                (Coordinate::new(0, 2), ItemKind::Gold),
            ]
        );
    }

    #[test]
    fn legality_rejects_walls_and_bounds() {
        let world = World::new(&config(&["x..", "..."], Coordinate::new(1, 1))).expect("setup");

        assert_eq!(
            query::legality(&world, Coordinate::new(0, 0)),
            Err(MoveRejection::IllegalMove)
        );
        assert_eq!(
            query::legality(&world, Coordinate::new(3, 0)),
            Err(MoveRejection::OutOfBounds)
        );
        assert_eq!(
            query::legality(&world, Coordinate::new(-1, 1)),
            Err(MoveRejection::OutOfBounds)
        );
        assert!(query::is_legal(&world, Coordinate::new(2, 1)));
    }

    #[test]
    fn overrides_win_without_double_counting() {
        let mut config = config(&["x..", "   "], Coordinate::new(2, 1));
        config.items = ItemOverrides {
            pills: vec![Coordinate::new(1, 0)],
            gold: vec![Coordinate::new(0, 0), Coordinate::new(0, 1)],
            ice: Vec::new(),
        };
        let world = World::new(&config).expect("setup");

        assert_eq!(query::remaining_score_items(&world), 4);
        assert!(!query::is_wall(&world, Coordinate::new(0, 0)));
        assert_eq!(query::item_at(&world, Coordinate::new(0, 0)), Some(ItemKind::Gold));
        assert_eq!(query::gold_cells(&world).len(), 2);
    }

    #[test]
    fn override_outside_grid_is_rejected() {
        let mut config = config(&["..."], Coordinate::new(0, 0));
        config.items.ice = vec![Coordinate::new(9, 9)];
        assert_eq!(
            World::new(&config).err(),
            Some(SetupError::ItemOutOfBounds {
                cell: Coordinate::new(9, 9)
            })
        );
    }

    #[test]
    fn blocked_starts_are_rejected() {
        assert_eq!(
            World::new(&config(&["x."], Coordinate::new(0, 0))).err(),
            Some(SetupError::PlayerStartBlocked {
                cell: Coordinate::new(0, 0)
            })
        );

        let mut config = config(&["x.."], Coordinate::new(1, 0));
        config.adversaries = vec![AdversaryConfig {
            kind: AdversaryKind::Wanderer,
            start: Coordinate::new(0, 0),
            frozen_for_ticks: 0,
        }];
        assert_eq!(
            World::new(&config).err(),
            Some(SetupError::AdversaryStartBlocked {
                index: 0,
                cell: Coordinate::new(0, 0)
            })
        );
    }

    #[test]
    fn item_under_player_start_is_consumed_at_setup() {
        let world = World::new(&config(&["..."], Coordinate::new(0, 0))).expect("setup");
        assert_eq!(query::remaining_score_items(&world), 2);
        assert_eq!(query::player(&world).score, 1);
        assert!(query::item_at(&world, Coordinate::new(0, 0)).is_none());
    }

    #[test]
    fn player_move_consumes_item_exactly_once() {
        let mut world = World::new(&config(&[" ..", "   "], Coordinate::new(0, 0))).expect("setup");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePlayer {
                to: Coordinate::new(1, 0),
                heading: Direction::East,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MovePlayer {
                to: Coordinate::new(1, 1),
                heading: Direction::South,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MovePlayer {
                to: Coordinate::new(1, 0),
                heading: Direction::North,
            },
            &mut events,
        );

        let consumed: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::ItemConsumed { .. }))
            .collect();
        assert_eq!(consumed.len(), 1);
        assert_eq!(query::remaining_score_items(&world), 1);
        assert_eq!(query::player(&world).score, 1);
    }

    #[test]
    fn illegal_moves_are_rejected_before_commit() {
        let mut config = config(&[".x."], Coordinate::new(0, 0));
        config.adversaries = vec![AdversaryConfig {
            kind: AdversaryKind::Chaser,
            start: Coordinate::new(2, 0),
            frozen_for_ticks: 0,
        }];
        let mut world = World::new(&config).expect("setup");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePlayer {
                to: Coordinate::new(1, 0),
                heading: Direction::East,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MoveAdversary {
                adversary: AdversaryId::new(0),
                to: Coordinate::new(3, 0),
                heading: Direction::East,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::MoveRejected {
                    mover: Mover::Player,
                    to: Coordinate::new(1, 0),
                    reason: MoveRejection::IllegalMove,
                },
                Event::MoveRejected {
                    mover: Mover::Adversary(AdversaryId::new(0)),
                    to: Coordinate::new(3, 0),
                    reason: MoveRejection::OutOfBounds,
                },
            ]
        );
        assert_eq!(query::player(&world).cell, Coordinate::new(0, 0));
        assert_eq!(
            query::adversaries_at(&world, Coordinate::new(2, 0)),
            vec![AdversaryId::new(0)]
        );
    }

    #[test]
    fn initial_freeze_expires_after_configured_ticks() {
        let mut config = config(&["....."], Coordinate::new(0, 0));
        config.timing.adversary_step_period = 1;
        config.adversaries = vec![AdversaryConfig {
            kind: AdversaryKind::Wanderer,
            start: Coordinate::new(4, 0),
            frozen_for_ticks: 2,
        }];
        let mut world = World::new(&config).expect("setup");
        let id = AdversaryId::new(0);
        let mut events = Vec::new();

        apply(&mut world, Command::Tick, &mut events);
        assert!(!query::ready_to_act(&world, id));
        apply(&mut world, Command::Tick, &mut events);
        assert!(!query::ready_to_act(&world, id));
        apply(&mut world, Command::Tick, &mut events);
        assert!(query::ready_to_act(&world, id));
        assert!(events.contains(&Event::StatusExpired {
            adversary: id,
            effect: StatusEffect::Freeze,
        }));
    }

    #[test]
    fn step_period_gates_adversary_decisions() {
        let mut config = config(&["....."], Coordinate::new(0, 0));
        config.timing.adversary_step_period = 3;
        config.adversaries = vec![AdversaryConfig {
            kind: AdversaryKind::Wanderer,
            start: Coordinate::new(4, 0),
            frozen_for_ticks: 0,
        }];
        let mut world = World::new(&config).expect("setup");
        let mut events = Vec::new();
        let mut ready = Vec::new();
        for _ in 0..6 {
            apply(&mut world, Command::Tick, &mut events);
            ready.push(query::ready_to_act(&world, AdversaryId::new(0)));
        }
        assert_eq!(ready, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn halt_disables_every_adversary() {
        let mut config = config(&["....."], Coordinate::new(0, 0));
        config.timing.adversary_step_period = 1;
        config.adversaries = vec![AdversaryConfig {
            kind: AdversaryKind::Phaser,
            start: Coordinate::new(4, 0),
            frozen_for_ticks: 0,
        }];
        let mut world = World::new(&config).expect("setup");
        let mut events = Vec::new();

        apply(&mut world, Command::Halt { outcome: Outcome::Won }, &mut events);
        apply(&mut world, Command::Tick, &mut events);
        apply(
            &mut world,
            Command::MoveAdversary {
                adversary: AdversaryId::new(0),
                to: Coordinate::new(3, 0),
                heading: Direction::West,
            },
            &mut events,
        );

        assert!(!query::ready_to_act(&world, AdversaryId::new(0)));
        assert!(query::adversary_view(&world).iter().all(|a| a.halted));
        assert_eq!(
            query::adversaries_at(&world, Coordinate::new(4, 0)),
            vec![AdversaryId::new(0)]
        );
    }

    #[test]
    fn halted_adversary_does_not_report_stalls() {
        let mut config = config(&["....."], Coordinate::new(0, 0));
        config.adversaries = vec![AdversaryConfig {
            kind: AdversaryKind::Phaser,
            start: Coordinate::new(4, 0),
            frozen_for_ticks: 0,
        }];
        let mut world = World::new(&config).expect("setup");
        let hold = Command::HoldAdversary {
            adversary: AdversaryId::new(0),
        };

        let mut events = Vec::new();
        apply(&mut world, hold.clone(), &mut events);
        assert_eq!(
            events,
            vec![Event::AdversaryStalled {
                adversary: AdversaryId::new(0)
            }]
        );

        apply(&mut world, Command::Halt { outcome: Outcome::Lost }, &mut events);
        events.clear();
        apply(&mut world, hold, &mut events);
        assert!(events.is_empty());
    }
}
