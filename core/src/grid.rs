//! Square tile grid.
//!
//! The grid is stored as a flat vector of `size * size` values in row-major
//! order (indices `0..size` are row 0, and so on). Empty cells are 0, tiles
//! hold their value (2, 4, 8, ...).

use std::fmt;

use crate::error::GridError;

/// Largest tile a cell can hold. Two of these do not merge.
pub const MAX_TILE: u32 = 1 << 31;

/// Returns true for values a non-empty cell may hold.
pub(crate) fn is_tile_value(value: u32) -> bool {
    (2..=MAX_TILE).contains(&value) && value.is_power_of_two()
}

/// An N×N board of optional power-of-two tiles.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// Create a grid with every cell empty.
    ///
    /// Panics if `size` is 0.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "grid size must be at least 1");
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from fixed-size rows, validating every value.
    pub fn from_rows<const N: usize>(rows: [[u32; N]; N]) -> Result<Self, GridError> {
        let cells = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self::from_cells(N, cells)
    }

    /// Build a grid from `size * size` row-major values, validating every value.
    pub fn from_cells(size: usize, cells: Vec<u32>) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::ZeroSize);
        }
        if cells.len() != size * size {
            return Err(GridError::CellCount {
                expected: size * size,
                actual: cells.len(),
            });
        }
        if let Some(idx) = cells.iter().position(|&v| v != 0 && !is_tile_value(v)) {
            return Err(GridError::InvalidTile {
                row: idx / size,
                col: idx % size,
                value: cells[idx],
            });
        }
        Ok(Grid { size, cells })
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw row-major cell values, 0 for empty.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// The tile at `(row, col)`, or `None` if the cell is empty.
    ///
    /// Panics if the coordinate lies outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        match self.cells[self.index(row, col)] {
            0 => None,
            v => Some(v),
        }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        debug_assert!(value == 0 || is_tile_value(value));
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Copy the grid out as nested rows.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.size).map(<[u32]>::to_vec).collect()
    }

    pub(crate) fn row(&self, row: usize) -> &[u32] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [u32] {
        let start = row * self.size;
        &mut self.cells[start..start + self.size]
    }

    /// Coordinates of empty cells, in row-major order.
    ///
    /// The iterator borrows the grid and can be recreated at any time.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(move |(i, _)| (i / size, i % size))
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Number of occupied cells.
    pub fn tile_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    /// Largest tile on the board, 0 when the grid is empty.
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Rotate the whole grid one quarter turn clockwise.
    ///
    /// `new[r][c] = old[n - 1 - c][r]`: the top row becomes the right column.
    pub fn rotate_clockwise(&self) -> Grid {
        let n = self.size;
        let mut out = Grid::new(n);
        for r in 0..n {
            for c in 0..n {
                out.cells[r * n + c] = self.cells[(n - 1 - c) * n + r];
            }
        }
        out
    }

    /// Apply `turns` clockwise quarter turns (taken modulo 4).
    pub fn rotated(&self, turns: usize) -> Grid {
        let mut out = self.clone();
        for _ in 0..turns % 4 {
            out = out.rotate_clockwise();
        }
        out
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) outside {n}x{n} grid",
            n = self.size
        );
        row * self.size + col
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.cells.chunks(self.size)).finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = format!("+{}", "------+".repeat(self.size));
        writeln!(f, "{border}")?;
        for row in self.cells.chunks(self.size) {
            write!(f, "|")?;
            for &val in row {
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{border}")?;
        }
        Ok(())
    }
}
