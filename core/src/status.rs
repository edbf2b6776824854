//! Win and loss detection.

use crate::engine::{can_move, Direction};
use crate::grid::Grid;

/// Tile value that wins the standard game.
pub const DEFAULT_TARGET: u32 = 2048;

/// Where a game stands after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    /// `Won` and `Lost` end the game.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// True if any tile has reached `target`.
///
/// `target` must be a power of two of at least 4, as [`GameConfig`](crate::GameConfig)
/// enforces for sessions.
pub fn is_won(grid: &Grid, target: u32) -> bool {
    debug_assert!(
        target >= 4 && target.is_power_of_two(),
        "target {target} must be a power of two >= 4"
    );
    grid.cells().iter().any(|&v| v >= target)
}

/// True if the grid is full and no direction would change it.
pub fn is_stuck(grid: &Grid) -> bool {
    grid.is_full() && !Direction::ALL.iter().any(|&d| can_move(grid, d))
}

/// Classify the grid. A win takes precedence over a loss.
///
/// Same precondition on `target` as [`is_won`].
pub fn evaluate_status(grid: &Grid, target: u32) -> GameStatus {
    if is_won(grid, target) {
        GameStatus::Won
    } else if is_stuck(grid) {
        GameStatus::Lost
    } else {
        GameStatus::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::move_grid;

    // -------------------------------------------------------------------------
    // Loss detection
    // -------------------------------------------------------------------------

    #[test]
    fn test_checkerboard_is_lost() {
        let grid = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]])
            .unwrap();
        assert!(is_stuck(&grid));
        assert_eq!(evaluate_status(&grid, DEFAULT_TARGET), GameStatus::Lost);
    }

    #[test]
    fn test_distinct_powers_is_lost() {
        let grid = Grid::from_rows([
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [2, 4, 8, 16],
            [32, 64, 128, 256],
        ])
        .unwrap();
        assert_eq!(evaluate_status(&grid, DEFAULT_TARGET), GameStatus::Lost);
    }

    #[test]
    fn test_empty_cell_keeps_playing() {
        let grid = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]])
            .unwrap();
        assert_eq!(evaluate_status(&grid, DEFAULT_TARGET), GameStatus::Playing);
    }

    #[test]
    fn test_full_with_horizontal_merge_keeps_playing() {
        let grid = Grid::from_rows([
            [2, 2, 4, 8],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ])
        .unwrap();
        assert!(!is_stuck(&grid));
    }

    #[test]
    fn test_full_with_vertical_merge_keeps_playing() {
        let grid = Grid::from_rows([
            [2, 4, 8, 16],
            [2, 8, 16, 32],
            [4, 16, 32, 64],
            [8, 32, 64, 128],
        ])
        .unwrap();
        assert_eq!(evaluate_status(&grid, DEFAULT_TARGET), GameStatus::Playing);
    }

    // -------------------------------------------------------------------------
    // Win detection
    // -------------------------------------------------------------------------

    #[test]
    fn test_target_tile_wins() {
        let grid = Grid::from_rows([[2048, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        assert_eq!(evaluate_status(&grid, DEFAULT_TARGET), GameStatus::Won);
        assert_eq!(evaluate_status(&grid, 4096), GameStatus::Playing);
    }

    #[test]
    fn test_win_takes_precedence_over_loss() {
        // Moving right merges the 1024s and leaves one gap; filling that gap
        // with a 2 yields a stuck board that also holds the target.
        let grid = Grid::from_rows([
            [8, 4, 1024, 1024],
            [4, 16, 8, 4],
            [8, 32, 16, 8],
            [16, 64, 32, 16],
        ])
        .unwrap();
        let moved = move_grid(&grid, Direction::Right);
        assert!(moved.changed);
        assert_eq!(moved.grid.get(0, 3), Some(2048));

        let mut cells = moved.grid.cells().to_vec();
        let gap = cells.iter().position(|&v| v == 0).unwrap();
        cells[gap] = 2;
        let filled = Grid::from_cells(4, cells).unwrap();

        assert!(filled.is_full());
        assert!(is_stuck(&filled));
        assert_eq!(evaluate_status(&filled, DEFAULT_TARGET), GameStatus::Won);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "power of two")]
    fn test_zero_target_rejected() {
        evaluate_status(&Grid::new(4), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "power of two")]
    fn test_non_power_target_rejected() {
        is_won(&Grid::new(4), 1000);
    }

    #[test]
    fn test_terminal_flags() {
        assert!(!GameStatus::Playing.is_terminal());
        assert!(GameStatus::Won.is_terminal());
        assert!(GameStatus::Lost.is_terminal());
    }
}
