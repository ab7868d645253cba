//! Consumable bookkeeping.

use std::collections::BTreeMap;

use chase_core::{Coordinate, ItemKind};

/// Consumable resting on a maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    cell: Coordinate,
    kind: ItemKind,
}

impl Item {
    /// Creates an item at the provided cell.
    #[must_use]
    pub const fn new(cell: Coordinate, kind: ItemKind) -> Self {
        Self { cell, kind }
    }

    /// Cell the item rests on.
    #[must_use]
    pub const fn cell(&self) -> Coordinate {
        self.cell
    }

    /// Kind of the item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }
}

/// Items keyed by cell in row-major order, together with the count of score
/// items left.
///
/// The ledger is the only place that adjusts the remaining counter, which
/// keeps consumption and counting in lockstep.
#[derive(Clone, Debug, Default)]
pub(crate) struct ItemLedger {
    items: BTreeMap<(i32, i32), Item>,
    remaining_score_items: u32,
}

impl ItemLedger {
    /// Places an item, replacing whatever previously occupied the cell.
    pub(crate) fn place(&mut self, item: Item) {
        if let Some(previous) = self.items.insert(item.cell().row_major_key(), item) {
            if previous.kind().counts_toward_completion() {
                self.remaining_score_items = self.remaining_score_items.saturating_sub(1);
            }
        }
        if item.kind().counts_toward_completion() {
            self.remaining_score_items = self.remaining_score_items.saturating_add(1);
        }
    }

    /// Removes the item at `cell`. Consuming an empty cell is a no-op.
    pub(crate) fn consume(&mut self, cell: Coordinate) -> Option<Item> {
        let item = self.items.remove(&cell.row_major_key())?;
        if item.kind().counts_toward_completion() {
            self.remaining_score_items = self.remaining_score_items.saturating_sub(1);
        }
        Some(item)
    }

    pub(crate) fn item_at(&self, cell: Coordinate) -> Option<Item> {
        self.items.get(&cell.row_major_key()).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub(crate) fn remaining_score_items(&self) -> u32 {
        self.remaining_score_items
    }
}
