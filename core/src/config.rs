//! Declarative session configuration consumed by the world and the systems.

use serde::{Deserialize, Serialize};

use crate::{AdversaryKind, Coordinate};

/// Seed used when the configuration does not provide one.
pub const DEFAULT_SEED: u64 = 30_006;

/// The classic 20 × 11 maze.
pub const DEFAULT_LAYOUT: [&str; 11] = [
    "xxxxxxxxxxxxxxxxxxxx",
    "x....x....g...x....x",
    "xgxx.x.xxxxxx.x.xx.x",
    "x.x.......i.g....x.x",
    "x.x.xx.xx  xx.xx.x.x",
    "x......x    x......x",
    "x.x.xx.xxxxxx.xx.x.x",
    "x.x......gi......x.x",
    "xixx.x.xxxxxx.x.xx.x",
    "x...gx....g...x....x",
    "xxxxxxxxxxxxxxxxxxxx",
];

/// Complete description of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed from which every agent derives its private random stream.
    pub seed: u64,
    /// Maze rows, top to bottom.
    pub layout: Vec<String>,
    /// Player placement and control mode.
    pub player: PlayerConfig,
    /// Adversaries in the order they act each tick.
    pub adversaries: Vec<AdversaryConfig>,
    /// Items placed on top of the layout.
    pub items: ItemOverrides,
    /// Step cadence and status effect durations.
    pub timing: TimingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            layout: DEFAULT_LAYOUT.iter().map(|row| (*row).to_owned()).collect(),
            player: PlayerConfig::default(),
            adversaries: vec![
                AdversaryConfig {
                    kind: AdversaryKind::Chaser,
                    start: Coordinate::new(9, 5),
                    frozen_for_ticks: 50,
                },
                AdversaryConfig {
                    kind: AdversaryKind::Wanderer,
                    start: Coordinate::new(10, 5),
                    frozen_for_ticks: 0,
                },
            ],
            items: ItemOverrides::default(),
            timing: TimingConfig::default(),
        }
    }
}

/// Player placement and control mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Starting cell.
    pub start: Coordinate,
    /// Whether the player is driven by the scripted auto-mode.
    pub auto: bool,
    /// Comma separated `L`, `R` and `M` tokens replayed before auto-chasing.
    pub moves: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Coordinate::new(1, 1),
            auto: false,
            moves: String::new(),
        }
    }
}

/// Placement of a single adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdversaryConfig {
    /// Policy driving the adversary.
    pub kind: AdversaryKind,
    /// Starting cell.
    pub start: Coordinate,
    /// Number of ticks the adversary stays frozen after the session starts.
    #[serde(default)]
    pub frozen_for_ticks: u64,
}

/// Items seeded on top of the layout. An override replaces whatever the
/// layout holds at the same cell, walls included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemOverrides {
    /// Cells seeded with pills.
    pub pills: Vec<Coordinate>,
    /// Cells seeded with gold pieces.
    pub gold: Vec<Coordinate>,
    /// Cells seeded with ice cubes.
    pub ice: Vec<Coordinate>,
}

impl ItemOverrides {
    /// Reports whether no override was configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pills.is_empty() && self.gold.is_empty() && self.ice.is_empty()
    }
}

/// Step cadence and status effect durations, all measured in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Adversaries act on ticks divisible by this period.
    pub adversary_step_period: u32,
    /// Number of ticks an ice cube keeps adversaries frozen.
    pub freeze_ticks: u64,
    /// Number of ticks a gold piece keeps adversaries aggravated.
    pub aggravate_ticks: u64,
    /// Divisor applied to the step period of aggravated adversaries.
    pub aggravate_speed_multiplier: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            adversary_step_period: 2,
            freeze_ticks: 30,
            aggravate_ticks: 30,
            aggravate_speed_multiplier: 2,
        }
    }
}
