//! Blockfall (workspace facade crate).
//!
//! The engine, input mapping and terminal renderer live in dedicated crates under
//! `crates/`; this package re-exports them as `blockfall::{core,input,term,types}` and
//! adds the pieces only the binary needs: on-disk settings and the high-score file.

pub mod highscore;
pub mod settings;

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;

pub use highscore::HighScoreStore;
pub use settings::{DataDir, Settings};
