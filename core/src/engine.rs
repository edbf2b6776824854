//! Directional move and merge.
//!
//! Every direction is handled by the same routine: rotate the grid so the
//! requested direction points left, slide each row left, then rotate back.
//! With the clockwise primitive from [`Grid::rotate_clockwise`] the rotation
//! counts are:
//!
//! | Direction | Turns in | Turns back |
//! |-----------|----------|------------|
//! | Left      | 0        | 0          |
//! | Down      | 1        | 3          |
//! | Right     | 2        | 2          |
//! | Up        | 3        | 1          |
//!
//! Tiles at [`MAX_TILE`] are the largest a `u32` cell can hold and never merge.

use crate::grid::{Grid, MAX_TILE};

/// The four possible move directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    /// All four directions, in discriminant order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Clockwise quarter turns that make this direction point left.
    pub const fn quarter_turns(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }

    /// Clockwise quarter turns that undo [`quarter_turns`](Self::quarter_turns).
    pub const fn inverse_turns(self) -> usize {
        (4 - self.quarter_turns()) % 4
    }
}

/// Result of applying one move to a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The grid after the move. Equal to the input when `changed` is false.
    pub grid: Grid,
    /// Whether any cell differs from the input grid.
    pub changed: bool,
    /// Sum of the tile values produced by merges.
    pub reward: u64,
    /// Number of merges performed.
    pub merges: usize,
}

/// Slide one row towards index 0.
///
/// Empty cells are removed, adjacent equal tiles merge once in a single
/// left-to-right pass, and the row is padded back to its length with empties.
/// Tiles already at [`MAX_TILE`] stay as they are. Returns the new row and
/// the merge reward.
pub fn slide_row(row: &[u32]) -> (Vec<u32>, u64) {
    let (line, reward, _) = slide_row_counted(row);
    (line, reward)
}

fn slide_row_counted(row: &[u32]) -> (Vec<u32>, u64, usize) {
    let tiles: Vec<u32> = row.iter().copied().filter(|&v| v != 0).collect();

    let mut merged = Vec::with_capacity(row.len());
    let mut reward = 0u64;
    let mut merges = 0;
    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] && tiles[i] < MAX_TILE {
            let value = tiles[i] * 2;
            merged.push(value);
            reward += u64::from(value);
            merges += 1;
            // both source tiles are consumed; the merged tile is never revisited
            i += 2;
        } else {
            merged.push(tiles[i]);
            i += 1;
        }
    }

    merged.resize(row.len(), 0);
    (merged, reward, merges)
}

/// Apply a move in the given direction without modifying `grid`.
pub fn move_grid(grid: &Grid, direction: Direction) -> MoveOutcome {
    let mut work = grid.rotated(direction.quarter_turns());

    let mut reward = 0;
    let mut merges = 0;
    for r in 0..work.size() {
        let (line, line_reward, line_merges) = slide_row_counted(work.row(r));
        work.row_mut(r).copy_from_slice(&line);
        reward += line_reward;
        merges += line_merges;
    }

    let moved = work.rotated(direction.inverse_turns());
    let changed = moved != *grid;

    MoveOutcome {
        grid: moved,
        changed,
        reward,
        merges,
    }
}

/// Check if a move in the given direction would change the grid.
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    move_grid(grid, direction).changed
}

/// Legal moves as a boolean array in [`Direction::ALL`] order [Up, Down, Left, Right].
pub fn legal_moves(grid: &Grid) -> [bool; 4] {
    Direction::ALL.map(|d| can_move(grid, d))
}
