//! New tile placement after a successful move.

use rand::Rng;

use crate::grid::Grid;

/// Probability that a spawned tile is [`SMALL_TILE`] rather than [`LARGE_TILE`].
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;
/// The common spawn value.
pub const SMALL_TILE: u32 = 2;
/// The rare spawn value.
pub const LARGE_TILE: u32 = 4;

/// Place one new tile in a uniformly chosen empty cell.
///
/// The tile is a 2 with probability [`SPAWN_TWO_PROBABILITY`], otherwise a 4.
///
/// Panics if the grid has no empty cell; callers only spawn after a move that
/// changed the grid, which always leaves a gap.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Grid {
    match try_spawn_tile(grid, rng) {
        Some(next) => next,
        None => panic!("spawn_tile called on a full grid"),
    }
}

/// Like [`spawn_tile`], but returns `None` instead of panicking on a full grid.
pub fn try_spawn_tile<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Grid> {
    let empty_count = grid.empty_count();
    if empty_count == 0 {
        return None;
    }

    let (row, col) = grid.empty_cells().nth(rng.gen_range(0..empty_count))?;
    let value = if rng.gen_bool(SPAWN_TWO_PROBABILITY) {
        SMALL_TILE
    } else {
        LARGE_TILE
    };
    log::trace!("spawn {} at ({}, {})", value, row, col);

    let mut next = grid.clone();
    next.set(row, col, value);
    Some(next)
}
