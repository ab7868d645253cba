#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adversary decision policies.
//!
//! The pursuit system keeps one private brain per adversary: a random stream,
//! a recency buffer and, for guardians, the gold patrol ledger. On every tick
//! it proposes one command per adversary that is ready to act. Legality is
//! always re-checked by the world before a proposal is committed.

mod guardian;
mod recency;
pub mod steering;

use chase_core::{
    AdversaryId, AdversaryKind, AdversarySnapshot, Command, Coordinate, Direction, Event,
    ItemKind,
};
use chase_world::{query, World};
use rand_chacha::ChaCha8Rng;

use guardian::GuardianState;
pub use recency::RecencyBuffer;
use steering::{agent_rng, chase_step, fallback_step, nearest_step, phase_step, Step};

/// Pure system that reacts to world events and emits adversary commands.
#[derive(Debug)]
pub struct Pursuit {
    brains: Vec<Brain>,
}

impl Pursuit {
    /// Creates one brain per adversary currently present in the world.
    ///
    /// Gold that is already gone when the system is created (for example the
    /// piece under the player's start) is recorded as eaten up front.
    #[must_use]
    pub fn new(seed: u64, world: &World) -> Self {
        let gold_cells = query::gold_cells(world);
        let brains = query::adversary_view(world)
            .iter()
            .map(|adversary| {
                let mut brain = Brain::new(seed, adversary, gold_cells);
                for &cell in gold_cells {
                    if query::item_at(world, cell) != Some(ItemKind::Gold) {
                        brain.record_gold_eaten(cell);
                    }
                }
                brain
            })
            .collect();
        Self { brains }
    }

    /// Consumes world events and emits adversary commands.
    ///
    /// Gold consumption is always recorded. Decisions are only taken in
    /// response to [`Event::TimeAdvanced`], and only for adversaries the world
    /// reports as ready to act.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        for event in events {
            if let Event::ItemConsumed {
                cell,
                kind: ItemKind::Gold,
                ..
            } = event
            {
                for brain in &mut self.brains {
                    brain.record_gold_eaten(*cell);
                }
            }
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let player = query::player(world).cell;
        let is_legal = |cell: Coordinate| query::is_legal(world, cell);
        for adversary in query::adversary_view(world).iter() {
            if !query::ready_to_act(world, adversary.id) {
                continue;
            }
            let Some(brain) = self.brains.iter_mut().find(|brain| brain.id == adversary.id)
            else {
                continue;
            };

            match brain.decide(adversary, player, &is_legal) {
                Some(step) => out.push(Command::MoveAdversary {
                    adversary: adversary.id,
                    to: step.cell,
                    heading: step.heading,
                }),
                None => out.push(Command::HoldAdversary {
                    adversary: adversary.id,
                }),
            }
        }
    }
}

#[derive(Debug)]
struct Brain {
    id: AdversaryId,
    kind: AdversaryKind,
    rng: ChaCha8Rng,
    recency: RecencyBuffer,
    guardian: Option<GuardianState>,
}

impl Brain {
    fn new(seed: u64, adversary: &AdversarySnapshot, gold_cells: &[Coordinate]) -> Self {
        let guardian = (adversary.kind == AdversaryKind::Guardian)
            .then(|| GuardianState::new(gold_cells));
        Self {
            id: adversary.id,
            kind: adversary.kind,
            rng: agent_rng(seed, u64::from(adversary.id.get()) + 1),
            recency: RecencyBuffer::default(),
            guardian,
        }
    }

    fn record_gold_eaten(&mut self, cell: Coordinate) {
        if let Some(guardian) = self.guardian.as_mut() {
            guardian.record_eaten(cell);
        }
    }

    fn decide<F>(
        &mut self,
        me: &AdversarySnapshot,
        player: Coordinate,
        is_legal: &F,
    ) -> Option<Step>
    where
        F: Fn(Coordinate) -> bool,
    {
        let rng = &mut self.rng;
        let step = match self.kind {
            AdversaryKind::Chaser => {
                chase_step(me.cell, me.heading, player, &self.recency, rng, is_legal)
            }
            AdversaryKind::Wanderer => fallback_step(me.cell, me.heading, rng, is_legal),
            AdversaryKind::Stalker => {
                nearest_step(me.cell, player, &Direction::ALL, None, rng, is_legal)
            }
            AdversaryKind::Guardian => match self.guardian.as_mut() {
                Some(guardian) => {
                    guardian.decide(me.cell, me.heading, &self.recency, rng, is_legal)
                }
                None => fallback_step(me.cell, me.heading, rng, is_legal),
            },
            AdversaryKind::Phaser => phase_step(me.cell, rng, is_legal),
        };

        if let Some(step) = step {
            self.recency.push(step.cell);
        }
        step
    }
}
