//! Terminal front-end for blockfall.
//!
//! Rendering is split in two: [`GameView`] turns a [`GameSnapshot`](blockfall_core::GameSnapshot)
//! into a [`FrameBuffer`] without touching the terminal, and [`TerminalRenderer`]
//! flushes framebuffers to stdout, writing only the runs that changed since the
//! previous frame.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
