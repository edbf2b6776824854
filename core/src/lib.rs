//! # Sliding-tile merge engine
//!
//! Pure game logic for 2048-style puzzles on an N×N board: the grid model,
//! directional moves with single-pass merging, seeded tile spawning, and
//! win/loss detection. The engine owns no I/O; a front end holds the grid,
//! feeds it directions and renders what comes back.
//!
//! ## Example
//!
//! ```rust
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use tile_merge_core::{evaluate_status, move_grid, spawn_tile, Direction, GameStatus, Grid};
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let grid = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
//!
//! let outcome = move_grid(&grid, Direction::Left);
//! assert!(outcome.changed);
//! assert_eq!(outcome.grid.get(0, 0), Some(4));
//!
//! let next = spawn_tile(&outcome.grid, &mut rng);
//! assert_eq!(evaluate_status(&next, 2048), GameStatus::Playing);
//! ```
//!
//! [`Game`] bundles the same steps into a session with a score and status.

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod spawn;
pub mod status;

pub use config::GameConfig;
pub use engine::{can_move, legal_moves, move_grid, slide_row, Direction, MoveOutcome};
pub use error::{ConfigError, GridError};
pub use game::{Game, StepResult};
pub use grid::{Grid, MAX_TILE};
pub use spawn::{spawn_tile, try_spawn_tile};
pub use status::{evaluate_status, is_stuck, is_won, GameStatus, DEFAULT_TARGET};
