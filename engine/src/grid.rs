use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A cell address, 0-indexed from the top left corner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// Square board of tile values stored row-major. 0 is an empty cell, every
/// other value is a power of two no smaller than 2.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

/// Largest tile a grid may hold. Two of these never merge, so every doubled
/// tile still fits in a cell.
pub const MAX_TILE: u32 = 1 << 30;

fn is_tile_value(v: u32) -> bool {
    v == 0 || ((2..=MAX_TILE).contains(&v) && v.is_power_of_two())
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from explicit rows, checking the shape and that every
    /// value is a tile value.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::InvalidGrid("grid has no rows".into()));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(EngineError::InvalidGrid(format!(
                    "row {r} has {} cells, expected {size}",
                    row.len()
                )));
            }
            if let Some(bad) = row.iter().find(|v| !is_tile_value(**v)) {
                return Err(EngineError::InvalidGrid(format!(
                    "{bad} in row {r} is not a power of two between 2 and {MAX_TILE}"
                )));
            }
            cells.extend_from_slice(row);
        }

        Ok(Grid { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.row < self.size && pos.col < self.size,
            "position ({}, {}) outside {}x{} grid",
            pos.row,
            pos.col,
            self.size,
            self.size
        );
        pos.row * self.size + pos.col
    }

    pub fn get(&self, pos: Position) -> u32 {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, value: u32) {
        debug_assert!(is_tile_value(value), "{value} is not a tile value");
        let i = self.index(pos);
        self.cells[i] = value;
    }

    /// Empty positions in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(i, _)| Position::new(i / self.size, i % self.size))
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.cells.contains(&value)
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&0)
    }

    /// True if some pair of horizontally or vertically adjacent cells hold the
    /// same mergeable value. Empty cells count, so call this on a full grid.
    pub fn has_adjacent_equal(&self) -> bool {
        (0..self.size).any(|row| {
            (0..self.size).any(|col| {
                let cur = self.get(Position::new(row, col));
                cur < MAX_TILE
                    && ((col + 1 < self.size && self.get(Position::new(row, col + 1)) == cur)
                        || (row + 1 < self.size
                            && self.get(Position::new(row + 1, col)) == cur))
            })
        })
    }

    fn print_row(f: &mut impl fmt::Write, row: &[u32]) -> fmt::Result {
        for tile in row.iter() {
            match tile {
                0 => write!(f, "|{: ^6}", " ")?,
                v => write!(f, "|{: ^6}", v)?,
            }
        }
        Ok(())
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            Grid::print_row(f, row)?;
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Grid, Position, MAX_TILE};
    use crate::error::EngineError;

    #[test]
    fn new_grid_is_all_empty() {
        let g = Grid::new(4);
        assert_eq!(g.empty_cells().len(), 16);
        assert_eq!(g.max_tile(), 0);
        assert!(!g.is_full());
    }

    #[test]
    fn empty_cells_are_row_major() {
        let g = Grid::from_rows(&[[2, 0, 4], [0, 8, 0], [16, 32, 0]]).unwrap();
        assert_eq!(
            g.empty_cells(),
            vec![
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(2, 2),
            ]
        );
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        assert!(matches!(
            Grid::from_rows(&[[2, 3], [0, 0]]),
            Err(EngineError::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[vec![2, 2], vec![0]]),
            Err(EngineError::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid::from_rows(&[[1]]),
            Err(EngineError::InvalidGrid(_))
        ));
        assert!(Grid::from_rows::<[u32; 0]>(&[]).is_err());
    }

    #[test]
    fn tiles_are_capped() {
        assert!(Grid::from_rows(&[[MAX_TILE, MAX_TILE], [0, 0]]).is_ok());
        assert!(matches!(
            Grid::from_rows(&[[1u32 << 31, 1 << 31], [0, 0]]),
            Err(EngineError::InvalidGrid(_))
        ));
    }

    #[test]
    fn capped_tiles_are_not_a_pair() {
        let g = Grid::from_rows(&[[MAX_TILE, MAX_TILE], [2, 4]]).unwrap();
        assert!(!g.has_adjacent_equal());
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_access_panics() {
        let g = Grid::new(4);
        g.get(Position::new(4, 0));
    }

    #[test]
    fn adjacent_equal_checks_rows_and_columns() {
        let none = Grid::from_rows(&[[2, 4], [4, 2]]).unwrap();
        assert!(!none.has_adjacent_equal());
        let horizontal = Grid::from_rows(&[[2, 2], [4, 8]]).unwrap();
        assert!(horizontal.has_adjacent_equal());
        let vertical = Grid::from_rows(&[[2, 4], [8, 4]]).unwrap();
        assert!(vertical.has_adjacent_equal());
    }

    // | 128  |      |
    // |      |  2   |
    #[test]
    fn display_pads_cells() {
        let g = Grid::from_rows(&[[128, 0], [0, 2]]).unwrap();
        assert_eq!(g.to_string(), "| 128  |      |\n|      |  2   |\n");
    }
}
