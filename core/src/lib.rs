#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze chase engine.
//!
//! This crate defines the message surface that connects the referee, the
//! authoritative world, and the pure agent systems. Systems read the world
//! through its query functions and respond with [`Command`] values; the world
//! executes those commands via its `apply` entry point and broadcasts
//! [`Event`] values describing what actually happened. Every movement is
//! validated by the world before it is committed, so rejected proposals
//! surface as events rather than errors.

mod config;

pub use config::{
    AdversaryConfig, ItemOverrides, PlayerConfig, SessionConfig, TimingConfig, DEFAULT_LAYOUT,
    DEFAULT_SEED,
};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of recently chosen cells each agent remembers to discourage backtracking.
pub const RECENCY_CAPACITY: usize = 10;

/// Integer grid position. Columns grow eastward and rows grow southward.
///
/// Coordinates compare and hash by value. Components are signed so that the
/// neighbours of edge cells can be expressed and then rejected by the
/// legality check instead of wrapping around.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate reached by taking `steps` cells toward `direction`.
    #[must_use]
    pub const fn stepped(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx.saturating_mul(steps)),
            y: self.y.saturating_add(dy.saturating_mul(steps)),
        }
    }

    /// Returns the adjacent coordinate toward `direction`.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        self.stepped(direction, 1)
    }

    /// Squared Euclidean distance between two coordinates.
    #[must_use]
    pub fn distance_squared(self, other: Coordinate) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    /// Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Key that orders coordinates by row first, then by column.
    #[must_use]
    pub const fn row_major_key(self) -> (i32, i32) {
        (self.y, self.x)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight compass headings an agent can face.
///
/// Headings are measured in degrees clockwise from east, so a positive
/// rotation turns an agent to its right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Increasing column index.
    East,
    /// Increasing column and row index.
    SouthEast,
    /// Increasing row index.
    South,
    /// Decreasing column, increasing row index.
    SouthWest,
    /// Decreasing column index.
    West,
    /// Decreasing column and row index.
    NorthWest,
    /// Decreasing row index.
    North,
    /// Increasing column, decreasing row index.
    NorthEast,
}

impl Direction {
    /// All headings in clockwise order starting from east.
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
    ];

    /// The four orthogonal headings in clockwise order starting from east.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// Heading expressed in degrees clockwise from east.
    #[must_use]
    pub const fn degrees(self) -> i32 {
        self.index() as i32 * 45
    }

    /// Column and row offsets of a single step along the heading.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
        }
    }

    /// Reports whether the heading is one of the four orthogonal directions.
    #[must_use]
    pub const fn is_orthogonal(self) -> bool {
        self.index() % 2 == 0
    }

    /// Returns the heading obtained after turning by `degrees` clockwise.
    ///
    /// Angles that are not multiples of 45 snap to the nearest heading.
    #[must_use]
    pub fn rotated(self, degrees: i32) -> Self {
        let normalized = (self.degrees() + degrees).rem_euclid(360);
        let index = ((normalized + 22) / 45) % 8;
        Self::ALL[index as usize]
    }

    /// Returns the heading pointing the opposite way.
    #[must_use]
    pub fn reversed(self) -> Self {
        self.rotated(180)
    }

    /// Orthogonal heading that best points from `from` toward `to`.
    ///
    /// The dominant axis wins. When both axes are equal the heading is the
    /// one reached by rounding the exact bearing clockwise, so a target lying
    /// on a perfect diagonal to the south-east resolves to south. Returns
    /// `None` when both coordinates are equal.
    #[must_use]
    pub fn toward(from: Coordinate, to: Coordinate) -> Option<Self> {
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        if dx == 0 && dy == 0 {
            return None;
        }

        let (horizontal, vertical) = (dx.unsigned_abs(), dy.unsigned_abs());
        let direction = if horizontal > vertical {
            if dx > 0 {
                Self::East
            } else {
                Self::West
            }
        } else if vertical > horizontal {
            if dy > 0 {
                Self::South
            } else {
                Self::North
            }
        } else {
            match (dx > 0, dy > 0) {
                (true, true) => Self::South,
                (false, true) => Self::West,
                (false, false) => Self::North,
                (true, false) => Self::East,
            }
        };
        Some(direction)
    }

    const fn index(self) -> usize {
        match self {
            Self::East => 0,
            Self::SouthEast => 1,
            Self::South => 2,
            Self::SouthWest => 3,
            Self::West => 4,
            Self::NorthWest => 5,
            Self::North => 6,
            Self::NorthEast => 7,
        }
    }
}

/// Classification of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable cell.
    Wall,
    /// Empty walkable cell.
    Space,
    /// Walkable cell seeded with a pill.
    Pill,
    /// Walkable cell seeded with a gold piece.
    Gold,
    /// Walkable cell seeded with an ice cube.
    Ice,
}

impl CellKind {
    /// Parses a layout symbol into a cell kind.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'x' => Some(Self::Wall),
            ' ' => Some(Self::Space),
            '.' => Some(Self::Pill),
            'g' => Some(Self::Gold),
            'i' => Some(Self::Ice),
            _ => None,
        }
    }

    /// Layout symbol representing the cell kind.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Wall => 'x',
            Self::Space => ' ',
            Self::Pill => '.',
            Self::Gold => 'g',
            Self::Ice => 'i',
        }
    }

    /// Item seeded into the cell at setup, if any.
    #[must_use]
    pub const fn item(self) -> Option<ItemKind> {
        match self {
            Self::Pill => Some(ItemKind::Pill),
            Self::Gold => Some(ItemKind::Gold),
            Self::Ice => Some(ItemKind::Ice),
            Self::Wall | Self::Space => None,
        }
    }
}

impl From<ItemKind> for CellKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Pill => Self::Pill,
            ItemKind::Gold => Self::Gold,
            ItemKind::Ice => Self::Ice,
        }
    }
}

/// Consumable placed on the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Plain score item.
    Pill,
    /// Valuable score item that aggravates adversaries when eaten.
    Gold,
    /// Non-scoring item that freezes adversaries when eaten.
    Ice,
}

impl ItemKind {
    /// Score awarded to the player for consuming the item.
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Pill => 1,
            Self::Gold => 5,
            Self::Ice => 0,
        }
    }

    /// Reports whether the item must be consumed to win.
    #[must_use]
    pub const fn counts_toward_completion(self) -> bool {
        matches!(self, Self::Pill | Self::Gold)
    }

    /// Status effect broadcast to every adversary on consumption.
    #[must_use]
    pub const fn effect(self) -> Option<StatusEffect> {
        match self {
            Self::Pill => None,
            Self::Gold => Some(StatusEffect::Aggravate),
            Self::Ice => Some(StatusEffect::Freeze),
        }
    }
}

/// Timed modifier applied to adversaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    /// The adversary skips its decisions until the effect expires.
    Freeze,
    /// The adversary's step period shrinks until the effect expires.
    Aggravate,
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Decision policy driving an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdversaryKind {
    /// Steps toward the player along the dominant axis, random-walking when blocked.
    #[serde(alias = "tx5")]
    Chaser,
    /// Random walk that prefers turning over reversing.
    #[serde(alias = "troll")]
    Wanderer,
    /// Picks whichever of the eight neighbours lies closest to the player.
    #[serde(alias = "alien")]
    Stalker,
    /// Patrols the gold pieces in randomized cycles.
    #[serde(alias = "orion")]
    Guardian,
    /// Random walk that can phase through a single wall cell.
    #[serde(alias = "wizard")]
    Phaser,
}

/// Termination state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The chase is still in progress.
    #[default]
    Running,
    /// Every score item was consumed.
    Won,
    /// An adversary caught the player.
    Lost,
}

impl Outcome {
    /// Reports whether the session has ended.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Agent that proposed a movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mover {
    /// The player-controlled agent.
    Player,
    /// An adversary identified by its id.
    Adversary(AdversaryId),
}

/// Reasons a movement proposal may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The destination lies outside the grid.
    OutOfBounds,
    /// The destination is a wall.
    IllegalMove,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by one tick.
    Tick,
    /// Requests that an adversary occupy a new cell.
    MoveAdversary {
        /// Identifier of the adversary attempting to move.
        adversary: AdversaryId,
        /// Destination cell.
        to: Coordinate,
        /// Heading the adversary faces after the move.
        heading: Direction,
    },
    /// Reports that an adversary found no legal move this tick.
    HoldAdversary {
        /// Identifier of the stationary adversary.
        adversary: AdversaryId,
    },
    /// Requests that the player occupy a new cell and consume whatever lies there.
    MovePlayer {
        /// Destination cell.
        to: Coordinate,
        /// Heading the player faces after the move.
        heading: Direction,
    },
    /// Turns the player in place.
    TurnPlayer {
        /// Heading the player faces after turning.
        heading: Direction,
    },
    /// Ends the session, permanently disabling every adversary.
    Halt {
        /// Outcome that ended the session.
        outcome: Outcome,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick that just began.
        tick: u64,
    },
    /// Confirms that an adversary moved between two cells.
    AdversaryMoved {
        /// Identifier of the adversary that moved.
        adversary: AdversaryId,
        /// Cell occupied before moving.
        from: Coordinate,
        /// Cell occupied after moving.
        to: Coordinate,
    },
    /// Reports that an adversary stayed put because no move was legal.
    AdversaryStalled {
        /// Identifier of the stationary adversary.
        adversary: AdversaryId,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell occupied before moving.
        from: Coordinate,
        /// Cell occupied after moving.
        to: Coordinate,
    },
    /// Confirms that the player turned in place.
    PlayerTurned {
        /// Heading after the turn.
        heading: Direction,
    },
    /// Reports that a movement proposal was rejected.
    MoveRejected {
        /// Agent that proposed the move.
        mover: Mover,
        /// Requested destination.
        to: Coordinate,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Confirms that the player consumed an item.
    ItemConsumed {
        /// Cell the item occupied.
        cell: Coordinate,
        /// Kind of item consumed.
        kind: ItemKind,
        /// Score awarded for the item.
        score: u32,
    },
    /// Announces that a status effect was broadcast to every adversary.
    StatusApplied {
        /// Effect that was applied.
        effect: StatusEffect,
        /// Last tick on which the effect is active.
        until_tick: u64,
    },
    /// Announces that a status effect lapsed for an adversary.
    StatusExpired {
        /// Adversary whose status returned to normal.
        adversary: AdversaryId,
        /// Effect that lapsed.
        effect: StatusEffect,
    },
    /// Announces that the session ended and adversaries were disabled.
    Halted {
        /// Outcome that ended the session.
        outcome: Outcome,
    },
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: Coordinate,
    /// Heading the player currently faces.
    pub heading: Direction,
    /// Score accumulated so far.
    pub score: u32,
    /// Number of score items consumed so far.
    pub items_eaten: u32,
}

/// Immutable representation of a single adversary used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdversarySnapshot {
    /// Unique identifier assigned to the adversary.
    pub id: AdversaryId,
    /// Policy driving the adversary.
    pub kind: AdversaryKind,
    /// Cell currently occupied by the adversary.
    pub cell: Coordinate,
    /// Heading the adversary currently faces.
    pub heading: Direction,
    /// Last tick on which the adversary stays frozen, if frozen.
    pub frozen_until_tick: Option<u64>,
    /// Multiplier currently applied to the adversary's speed.
    pub speed_multiplier: u32,
    /// Indicates whether the adversary was permanently disabled.
    pub halted: bool,
}

/// Read-only snapshot describing all adversaries in deterministic order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdversaryView {
    snapshots: Vec<AdversarySnapshot>,
}

impl AdversaryView {
    /// Creates a new adversary view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AdversarySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AdversarySnapshot> {
        self.snapshots
    }
}

/// State handed to the presentation layer after every tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick the snapshot was captured at.
    pub tick: u64,
    /// Termination state of the session.
    pub outcome: Outcome,
    /// Player state.
    pub player: PlayerSnapshot,
    /// Adversary states in identifier order.
    pub adversaries: Vec<AdversarySnapshot>,
    /// Score accumulated by the player.
    pub score: u32,
    /// Pills and gold pieces still on the board.
    pub remaining_score_items: u32,
}

/// Errors raised while building a grid from a textual layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside the grid.
    #[error("cell {cell} lies outside the grid")]
    OutOfBounds {
        /// Offending coordinate.
        cell: Coordinate,
    },
    /// The layout contained an unrecognised symbol.
    #[error("unknown layout symbol {symbol:?} at row {row}, column {column}")]
    UnknownCell {
        /// Offending character.
        symbol: char,
        /// Row containing the character.
        row: usize,
        /// Column containing the character.
        column: usize,
    },
    /// A layout row had a different width than the first row.
    #[error("layout row {row} has width {found}, expected {expected}")]
    RaggedLayout {
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The layout contained no cells.
    #[error("layout contains no cells")]
    EmptyLayout,
}

/// Errors raised while assembling a session from configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The layout could not be parsed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The player would start outside the grid or on a wall.
    #[error("player cannot start at {cell}")]
    PlayerStartBlocked {
        /// Requested start cell.
        cell: Coordinate,
    },
    /// An adversary would start outside the grid or on a wall.
    #[error("adversary {index} cannot start at {cell}")]
    AdversaryStartBlocked {
        /// Position of the adversary in the configuration list.
        index: usize,
        /// Requested start cell.
        cell: Coordinate,
    },
    /// An item override lies outside the grid.
    #[error("item override at {cell} lies outside the grid")]
    ItemOutOfBounds {
        /// Offending coordinate.
        cell: Coordinate,
    },
    /// The scripted move string contained an unknown token.
    #[error("unknown move token {token:?}")]
    InvalidMoveToken {
        /// Offending token.
        token: String,
    },
}

#[cfg(test)]
mod tests {
    use super::{AdversaryKind, Coordinate, Direction, ItemKind, MoveRejection, Outcome};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn coordinates_compare_by_value() {
        let first = Coordinate::new(3, 4);
        let second = Coordinate::new(3, 4);
        assert_eq!(first, second);

        let mut cells = std::collections::HashSet::new();
        assert!(cells.insert(first));
        assert!(!cells.insert(second));
    }

    #[test]
    fn distance_metrics_match_expectation() {
        let origin = Coordinate::new(1, 1);
        let destination = Coordinate::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(origin.distance_squared(destination), 13);
        assert_eq!(destination.distance_squared(origin), 13);
    }

    #[test]
    fn rotation_turns_clockwise() {
        assert_eq!(Direction::North.rotated(90), Direction::East);
        assert_eq!(Direction::North.rotated(-90), Direction::West);
        assert_eq!(Direction::East.rotated(180), Direction::West);
        assert_eq!(Direction::NorthEast.rotated(45), Direction::East);
        assert_eq!(Direction::South.rotated(-450), Direction::East);
        assert_eq!(Direction::West.reversed(), Direction::East);
    }

    #[test]
    fn stepping_moves_along_heading() {
        let origin = Coordinate::new(5, 5);
        assert_eq!(origin.neighbor(Direction::North), Coordinate::new(5, 4));
        assert_eq!(origin.neighbor(Direction::SouthWest), Coordinate::new(4, 6));
        assert_eq!(origin.stepped(Direction::East, 2), Coordinate::new(7, 5));
    }

    #[test]
    fn toward_prefers_dominant_axis() {
        let origin = Coordinate::new(5, 5);
        assert_eq!(
            Direction::toward(origin, Coordinate::new(9, 6)),
            Some(Direction::East)
        );
        assert_eq!(
            Direction::toward(origin, Coordinate::new(4, 1)),
            Some(Direction::North)
        );
        assert_eq!(Direction::toward(origin, origin), None);
    }

    #[test]
    fn toward_resolves_diagonal_ties_clockwise() {
        let origin = Coordinate::new(5, 5);
        assert_eq!(
            Direction::toward(origin, Coordinate::new(7, 7)),
            Some(Direction::South)
        );
        assert_eq!(
            Direction::toward(origin, Coordinate::new(3, 7)),
            Some(Direction::West)
        );
        assert_eq!(
            Direction::toward(origin, Coordinate::new(3, 3)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::toward(origin, Coordinate::new(7, 3)),
            Some(Direction::East)
        );
    }

    #[test]
    fn item_contracts_match_rules() {
        assert_eq!(ItemKind::Pill.score(), 1);
        assert_eq!(ItemKind::Gold.score(), 5);
        assert_eq!(ItemKind::Ice.score(), 0);
        assert!(ItemKind::Gold.counts_toward_completion());
        assert!(!ItemKind::Ice.counts_toward_completion());
        assert!(ItemKind::Pill.effect().is_none());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn wire_contracts_round_trip_through_bincode() {
        assert_round_trip(&Coordinate::new(-2, 7));
        assert_round_trip(&AdversaryKind::Guardian);
        assert_round_trip(&MoveRejection::IllegalMove);
        assert_round_trip(&Outcome::Lost);
    }
}
