//! Gold-patrol bookkeeping for the guardian policy.

use std::collections::BTreeSet;

use chase_core::{Coordinate, Direction};
use rand::{seq::SliceRandom, Rng};

use crate::{
    steering::{fallback_step, nearest_step, Step},
    RecencyBuffer,
};

/// Patrol memory of a single guardian.
///
/// Each cycle visits every uneaten gold cell once in random order. When the
/// cycle is exhausted the visited set is cleared and a new cycle begins.
#[derive(Clone, Debug)]
pub(crate) struct GuardianState {
    gold_cells: Vec<Coordinate>,
    eaten: BTreeSet<Coordinate>,
    visited: BTreeSet<Coordinate>,
    destination: Option<Coordinate>,
}

impl GuardianState {
    pub(crate) fn new(gold_cells: &[Coordinate]) -> Self {
        Self {
            gold_cells: gold_cells.to_vec(),
            eaten: BTreeSet::new(),
            visited: BTreeSet::new(),
            destination: None,
        }
    }

    pub(crate) fn record_eaten(&mut self, cell: Coordinate) {
        let _ = self.eaten.insert(cell);
    }

    pub(crate) fn decide<R, F>(
        &mut self,
        cell: Coordinate,
        heading: Direction,
        recency: &RecencyBuffer,
        rng: &mut R,
        is_legal: &F,
    ) -> Option<Step>
    where
        R: Rng + ?Sized,
        F: Fn(Coordinate) -> bool,
    {
        if self.destination == Some(cell) {
            self.arrive(cell);
        }
        if self.destination.is_none() {
            self.destination = self.select_destination(cell, rng);
        }
        let Some(target) = self.destination else {
            return fallback_step(cell, heading, rng, is_legal);
        };

        let step = match nearest_step(
            cell,
            target,
            &Direction::ORTHOGONAL,
            Some(recency),
            rng,
            is_legal,
        ) {
            Some(step) => Some(step),
            None => nearest_step(cell, target, &Direction::ORTHOGONAL, None, rng, is_legal),
        };

        if let Some(step) = step {
            if step.cell == target {
                self.arrive(target);
            }
        }
        step
    }

    fn arrive(&mut self, cell: Coordinate) {
        let _ = self.visited.insert(cell);
        self.destination = None;
    }

    fn select_destination<R>(&mut self, cell: Coordinate, rng: &mut R) -> Option<Coordinate>
    where
        R: Rng + ?Sized,
    {
        let fresh: Vec<Coordinate> = self
            .gold_cells
            .iter()
            .copied()
            .filter(|gold| *gold != cell)
            .filter(|gold| !self.eaten.contains(gold) && !self.visited.contains(gold))
            .collect();
        if let Some(choice) = fresh.choose(rng) {
            return Some(*choice);
        }

        self.visited.clear();
        let cycle: Vec<Coordinate> = self
            .gold_cells
            .iter()
            .copied()
            .filter(|gold| *gold != cell)
            .collect();
        cycle.choose(rng).copied()
    }

    #[cfg(test)]
    fn destination(&self) -> Option<Coordinate> {
        self.destination
    }
}
