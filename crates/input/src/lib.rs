//! Terminal input (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides a
//! DAS/ARR input handler suitable for terminal environments (including terminals
//! without key-release events).

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::{
    is_held_key, HorizontalDirection, InputHandler, DEFAULT_KEY_RELEASE_TIMEOUT_MS,
};
pub use map::{handle_key_event, should_quit};
