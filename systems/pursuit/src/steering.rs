//! Greedy local steering rules shared by every agent.
//!
//! Each rule takes the legality predicate as a closure so the same code can
//! run against the live world or against a hand-built maze in tests. None of
//! the rules ever returns the agent's current cell; `None` means the agent
//! has no legal move and stays put.

use chase_core::{Coordinate, Direction};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::RecencyBuffer;

const STREAM_SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

/// Random stream reserved for the player.
pub const PLAYER_STREAM: u64 = 0;

/// Derives the private random generator of an agent from the session seed.
///
/// Distinct streams yield independent sequences, so adding an agent never
/// perturbs the decisions of the others.
#[must_use]
pub fn agent_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed ^ stream.wrapping_add(1).wrapping_mul(STREAM_SPREAD))
}

/// A committed movement decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    /// Destination cell.
    pub cell: Coordinate,
    /// Heading after the step.
    pub heading: Direction,
}

/// Random-walk fallback chain.
///
/// Tries, relative to `heading`: a randomly chosen quarter turn, straight
/// ahead, the opposite quarter turn, and finally a reversal. The first legal
/// candidate wins.
pub fn fallback_step<R, F>(
    cell: Coordinate,
    heading: Direction,
    rng: &mut R,
    is_legal: &F,
) -> Option<Step>
where
    R: Rng + ?Sized,
    F: Fn(Coordinate) -> bool,
{
    let sign = if rng.gen_bool(0.5) { 1 } else { -1 };
    [sign * 90, 0, -sign * 90, 180]
        .into_iter()
        .map(|turn| heading.rotated(turn))
        .map(|heading| Step {
            cell: cell.neighbor(heading),
            heading,
        })
        .find(|step| is_legal(step.cell))
}

/// Steps along the dominant axis toward `target`, falling back to the random
/// walk when that cell is illegal or was visited recently.
pub fn chase_step<R, F>(
    cell: Coordinate,
    heading: Direction,
    target: Coordinate,
    recency: &RecencyBuffer,
    rng: &mut R,
    is_legal: &F,
) -> Option<Step>
where
    R: Rng + ?Sized,
    F: Fn(Coordinate) -> bool,
{
    if let Some(direction) = Direction::toward(cell, target) {
        let next = cell.neighbor(direction);
        if is_legal(next) && !recency.contains(next) {
            return Some(Step {
                cell: next,
                heading: direction,
            });
        }
    }

    fallback_step(cell, heading, rng, is_legal)
}

/// Picks the neighbour among `directions` closest to `target`.
///
/// Cells found in `recency`, when provided, are skipped. Ties on squared
/// Euclidean distance are broken uniformly at random.
pub fn nearest_step<R, F>(
    cell: Coordinate,
    target: Coordinate,
    directions: &[Direction],
    recency: Option<&RecencyBuffer>,
    rng: &mut R,
    is_legal: &F,
) -> Option<Step>
where
    R: Rng + ?Sized,
    F: Fn(Coordinate) -> bool,
{
    let mut best_distance = u64::MAX;
    let mut best: Vec<Step> = Vec::with_capacity(directions.len());

    for &heading in directions {
        let next = cell.neighbor(heading);
        if !is_legal(next) {
            continue;
        }
        if recency.is_some_and(|recent| recent.contains(next)) {
            continue;
        }

        let distance = next.distance_squared(target);
        if distance < best_distance {
            best_distance = distance;
            best.clear();
        }
        if distance == best_distance {
            best.push(Step {
                cell: next,
                heading,
            });
        }
    }

    best.choose(rng).copied()
}

/// Random step in any of the eight directions that may jump over one blocked cell.
///
/// Directions are drawn in random order without replacement. For each one
/// the neighbour is tried first, then the cell directly beyond it. When all
/// eight directions fail the agent is boxed in by walls at least two cells
/// thick.
pub fn phase_step<R, F>(cell: Coordinate, rng: &mut R, is_legal: &F) -> Option<Step>
where
    R: Rng + ?Sized,
    F: Fn(Coordinate) -> bool,
{
    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    for heading in directions {
        let next = cell.neighbor(heading);
        if is_legal(next) {
            return Some(Step {
                cell: next,
                heading,
            });
        }

        let beyond = cell.stepped(heading, 2);
        if is_legal(beyond) {
            return Some(Step {
                cell: beyond,
                heading,
            });
        }
    }

    None
}
