//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules, the session state and the simulation clock of the
//! falling-block engine. It has **no dependencies** on terminals or I/O:
//!
//! - **Deterministic**: the same seed and input sequence produce the same game
//! - **Testable**: every rule is exercised by unit tests next to its code
//! - **Portable**: the terminal front-end is one consumer; tests and benches are others
//!
//! # Module Structure
//!
//! - [`coord`]: y-up integer coordinates and matrix dimensions
//! - [`pieces`]: tetromino catalog, kick tables and the rotation solver
//! - [`tetromino`]: the piece entity (move, rotate, bounds, drop point)
//! - [`board`]: locked cells, full-row detection, peel and collapse
//! - [`rng`]: two-bag piece queue
//! - [`timer`]: frame-synchronised interval with suspend/resume
//! - [`lock_delay`]: grounded-piece lock controller
//! - [`line_clear`]: centre-out peel animation
//! - [`scoring`]: points, levels and gravity speed
//! - [`status`]: game mode state machine
//! - [`game_state`]: the session tying it all together
//!
//! # Game Rules
//!
//! - **Bag randomizer**: every aligned group of seven draws holds each kind once
//! - **Rotation**: clockwise around a pivot cell with SRS-style wall kicks
//! - **Lock delay**: 500ms after touching down, restarted by any move, capped by a
//!   manipulation count since the lowest row reached
//! - **Line clear**: five 60ms peel frames from the centre outward, then collapse
//! - **Scoring**: 100/300/500/800 × level; 1 per soft-drop row, 2 per hard-drop row
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! // Create and start a game
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! // Apply game actions
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop awards points
//! assert!(game.points() > 0);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed milliseconds. Gravity starts at 1000ms per row and speeds up with the
//! level; soft drop runs 20 times faster.

pub mod board;
pub mod config;
pub mod coord;
pub mod game_state;
pub mod line_clear;
pub mod lock_delay;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod status;
pub mod tetromino;
pub mod timer;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::GameConfig;
pub use coord::{Coord, Dimensions, MATRIX, QUEUE_MATRIX, STORAGE};
pub use game_state::GameState;
pub use lock_delay::{LockDelay, LockPhase, LockSignal};
pub use pieces::{get_kick_table, get_shape, try_rotate};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{calculate_drop_score, calculate_line_score, Score, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
pub use status::StatusMachine;
pub use tetromino::Tetromino;
pub use timer::FrameSyncInterval;
