//! Read-only view of a session for the presentation layer.
//!
//! The snapshot is `Copy` and allocation free so the front-end can refill the same
//! value every frame with [`GameState::snapshot_into`](crate::GameState::snapshot_into).

use crate::coord::Coord;
use crate::tetromino::Tetromino;
use crate::types::{GameStatus, PieceKind, BOARD_COLUMNS, BOARD_ROWS, PREVIEW_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation_stage: u8,
    /// Board positions, y-up
    pub cells: [Coord; 4],
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation_stage: value.rotation_stage,
            cells: value.cells,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub gravity_ms: u32,
    pub gravity_interval_ms: u32,
    pub lock_ms: u32,
    pub line_clear_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Locked cells as piece codes, row 0 at the top
    pub board: [[u8; BOARD_COLUMNS as usize]; BOARD_ROWS as usize],
    pub active: Option<ActiveSnapshot>,
    /// Active cells moved to their resting position
    pub ghost: Option<[Coord; 4]>,
    pub next_queue: [PieceKind; PREVIEW_LEN],
    pub status: GameStatus,
    pub episode_id: u32,
    pub seed: u32,
    pub piece_id: u32,
    pub points: u32,
    pub high_score: u32,
    pub level: u32,
    pub lines: u32,
    /// Line-clear frame in progress (0 when not clearing)
    pub line_clear_frame: u32,
    pub timers: TimersSnapshot,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        self.status.accepts_movement()
    }

    pub fn paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_COLUMNS as usize]; BOARD_ROWS as usize],
            active: None,
            ghost: None,
            next_queue: [PieceKind::I; PREVIEW_LEN],
            status: GameStatus::Playing,
            episode_id: 0,
            seed: 0,
            piece_id: 0,
            points: 0,
            high_score: 0,
            level: 0,
            lines: 0,
            line_clear_frame: 0,
            timers: TimersSnapshot::default(),
        }
    }
}
