#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player control.
//!
//! The pilot turns either queued direction requests or a scripted token
//! sequence into player commands. Once a script runs out, the player hunts
//! the nearest remaining score item with the same greedy steering the chaser
//! adversary uses.

use chase_core::{Command, Coordinate, Direction, Event, PlayerConfig, SetupError};
use chase_system_pursuit::{
    steering::{agent_rng, chase_step, PLAYER_STREAM},
    RecencyBuffer,
};
use chase_world::{query, World};
use rand_chacha::ChaCha8Rng;

/// Single instruction of a scripted move sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveToken {
    /// Turn 90 degrees counter-clockwise.
    Left,
    /// Turn 90 degrees clockwise.
    Right,
    /// Step forward if the cell ahead is legal.
    Move,
}

impl MoveToken {
    /// Parses a comma separated token list such as `"R,M,M,L"`.
    ///
    /// Blank entries are skipped; anything other than `L`, `R` or `M` is an
    /// error.
    pub fn parse_script(script: &str) -> Result<Vec<Self>, SetupError> {
        script
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| match token {
                "L" | "l" => Ok(Self::Left),
                "R" | "r" => Ok(Self::Right),
                "M" | "m" => Ok(Self::Move),
                other => Err(SetupError::InvalidMoveToken {
                    token: other.to_owned(),
                }),
            })
            .collect()
    }
}

#[derive(Debug)]
enum Mode {
    Interactive { pending: Option<Direction> },
    Auto { script: Vec<MoveToken>, cursor: usize },
}

/// Pure system that reacts to world events and emits player commands.
#[derive(Debug)]
pub struct Pilot {
    mode: Mode,
    rng: ChaCha8Rng,
    recency: RecencyBuffer,
}

impl Pilot {
    /// Creates the pilot described by the player configuration.
    pub fn new(config: &PlayerConfig, seed: u64) -> Result<Self, SetupError> {
        let mode = if config.auto {
            Mode::Auto {
                script: MoveToken::parse_script(&config.moves)?,
                cursor: 0,
            }
        } else {
            Mode::Interactive { pending: None }
        };

        Ok(Self {
            mode,
            rng: agent_rng(seed, PLAYER_STREAM),
            recency: RecencyBuffer::default(),
        })
    }

    /// Reports whether the player is driven by the script and item hunt.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        matches!(self.mode, Mode::Auto { .. })
    }

    /// Queues a requested direction for the next tick.
    ///
    /// Later requests replace earlier ones. Diagonal requests are dropped, as
    /// are all requests in auto mode.
    pub fn request_direction(&mut self, direction: Direction) {
        if !direction.is_orthogonal() {
            return;
        }
        if let Mode::Interactive { pending } = &mut self.mode {
            *pending = Some(direction);
        }
    }

    /// Consumes world events and emits at most one player command per tick.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let player = query::player(world);
        let command = match &mut self.mode {
            Mode::Interactive { pending } => pending.take().map(|heading| {
                let to = player.cell.neighbor(heading);
                if query::is_legal(world, to) {
                    Command::MovePlayer { to, heading }
                } else {
                    Command::TurnPlayer { heading }
                }
            }),
            Mode::Auto { script, cursor } => match script.get(*cursor).copied() {
                Some(token) => {
                    *cursor += 1;
                    scripted(token, player.cell, player.heading, world)
                }
                None => hunt(world, player.cell, player.heading, &self.recency, &mut self.rng),
            },
        };

        if let Some(command) = command {
            if let Command::MovePlayer { to, .. } = command {
                self.recency.push(to);
            }
            out.push(command);
        }
    }
}

fn scripted(
    token: MoveToken,
    cell: Coordinate,
    heading: Direction,
    world: &World,
) -> Option<Command> {
    match token {
        MoveToken::Left => Some(Command::TurnPlayer {
            heading: heading.rotated(-90),
        }),
        MoveToken::Right => Some(Command::TurnPlayer {
            heading: heading.rotated(90),
        }),
        MoveToken::Move => {
            let to = cell.neighbor(heading);
            query::is_legal(world, to).then_some(Command::MovePlayer { to, heading })
        }
    }
}

fn hunt(
    world: &World,
    cell: Coordinate,
    heading: Direction,
    recency: &RecencyBuffer,
    rng: &mut ChaCha8Rng,
) -> Option<Command> {
    let target = nearest_score_item(world, cell)?;
    let is_legal = |candidate: Coordinate| query::is_legal(world, candidate);
    chase_step(cell, heading, target, recency, rng, &is_legal).map(|step| Command::MovePlayer {
        to: step.cell,
        heading: step.heading,
    })
}

/// Closest remaining pill or gold, ties resolved by row then column.
fn nearest_score_item(world: &World, cell: Coordinate) -> Option<Coordinate> {
    query::items(world)
        .filter(|(_, kind)| kind.counts_toward_completion())
        .map(|(item, _)| item)
        .min_by_key(|item| (item.distance_squared(cell), item.row_major_key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_and_skips_blanks() {
        assert_eq!(
            MoveToken::parse_script("R, M,,L ,m"),
            Ok(vec![
                MoveToken::Right,
                MoveToken::Move,
                MoveToken::Left,
                MoveToken::Move
            ])
        );
        assert_eq!(MoveToken::parse_script(""), Ok(Vec::new()));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(
            MoveToken::parse_script("M,X"),
            Err(SetupError::InvalidMoveToken {
                token: "X".to_owned()
            })
        );
    }

    #[test]
    fn diagonal_requests_are_dropped() {
        let mut pilot = Pilot::new(&PlayerConfig::default(), 1).expect("pilot");
        pilot.request_direction(Direction::South);
        pilot.request_direction(Direction::SouthEast);
        assert!(matches!(
            pilot.mode,
            Mode::Interactive {
                pending: Some(Direction::South)
            }
        ));
    }

    #[test]
    fn requests_are_ignored_in_auto_mode() {
        let config = PlayerConfig {
            auto: true,
            ..PlayerConfig::default()
        };
        let mut pilot = Pilot::new(&config, 1).expect("pilot");
        pilot.request_direction(Direction::South);
        assert!(pilot.is_auto());
        assert!(matches!(pilot.mode, Mode::Auto { .. }));
    }
}
