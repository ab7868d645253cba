//! Static maze layout.

use chase_core::{CellKind, Coordinate, GridError};

/// Dense, row-major classification of every maze cell.
///
/// The grid is immutable once the world is assembled; the only mutation is
/// the one-time item override performed during setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Builds a grid from textual rows, top to bottom.
    ///
    /// Every row must have the same width and only contain the symbols
    /// understood by [`CellKind::from_symbol`].
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::EmptyLayout);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GridError::EmptyLayout);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedLayout {
                    row,
                    expected: width,
                    found,
                });
            }

            for (column, symbol) in line.chars().enumerate() {
                let kind = CellKind::from_symbol(symbol).ok_or(GridError::UnknownCell {
                    symbol,
                    row,
                    column,
                })?;
                cells.push(kind);
            }
        }

        Ok(Self {
            width: u32::try_from(width).map_err(|_| GridError::EmptyLayout)?,
            height: u32::try_from(rows.len()).map_err(|_| GridError::EmptyLayout)?,
            cells,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: Coordinate) -> bool {
        self.index(cell).is_some()
    }

    /// Classifies the cell at the provided coordinate.
    pub fn classify(&self, cell: Coordinate) -> Result<CellKind, GridError> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or(GridError::OutOfBounds { cell })
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coordinate, CellKind)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let x = (index % width) as i32;
            let y = (index / width) as i32;
            (Coordinate::new(x, y), *kind)
        })
    }

    pub(crate) fn override_cell(
        &mut self,
        cell: Coordinate,
        kind: CellKind,
    ) -> Result<(), GridError> {
        let index = self.index(cell).ok_or(GridError::OutOfBounds { cell })?;
        self.cells[index] = kind;
        Ok(())
    }

    fn index(&self, cell: Coordinate) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.y()).ok()?;
        if column < self.width && row < self.height {
            let width = usize::try_from(self.width).ok()?;
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
