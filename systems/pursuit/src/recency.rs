use std::collections::VecDeque;

use chase_core::{Coordinate, RECENCY_CAPACITY};

/// Bounded FIFO of the cells an agent chose most recently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecencyBuffer {
    cells: VecDeque<Coordinate>,
    capacity: usize,
}

impl RecencyBuffer {
    /// Creates an empty buffer that remembers at most `capacity` cells.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a chosen cell, evicting the oldest entry when full.
    pub fn push(&mut self, cell: Coordinate) {
        if self.capacity == 0 {
            return;
        }
        if self.cells.len() == self.capacity {
            let _ = self.cells.pop_front();
        }
        self.cells.push_back(cell);
    }

    /// Reports whether the cell was chosen recently.
    #[must_use]
    pub fn contains(&self, cell: Coordinate) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of remembered cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remembered cells, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.cells.iter()
    }
}

impl Default for RecencyBuffer {
    fn default() -> Self {
        Self::with_capacity(RECENCY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_entry_when_full() {
        let mut buffer = RecencyBuffer::with_capacity(3);
        for x in 0..4 {
            buffer.push(Coordinate::new(x, 0));
        }

        assert_eq!(buffer.len(), 3);
        assert!(!buffer.contains(Coordinate::new(0, 0)));
        assert_eq!(
            buffer.iter().copied().collect::<Vec<_>>(),
            vec![
                Coordinate::new(1, 0),
                Coordinate::new(2, 0),
                Coordinate::new(3, 0)
            ]
        );
    }

    #[test]
    fn default_buffer_holds_ten_cells() {
        let mut buffer = RecencyBuffer::default();
        assert!(buffer.is_empty());
        for x in 0..15 {
            buffer.push(Coordinate::new(x, 1));
        }
        assert_eq!(buffer.len(), RECENCY_CAPACITY);
        assert!(buffer.contains(Coordinate::new(5, 1)));
        assert!(!buffer.contains(Coordinate::new(4, 1)));
    }

    #[test]
    fn zero_capacity_remembers_nothing() {
        let mut buffer = RecencyBuffer::with_capacity(0);
        buffer.push(Coordinate::new(0, 0));
        assert!(buffer.is_empty());
    }
}
