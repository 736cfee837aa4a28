//! Engine tuning knobs. Defaults match the constants in the types crate.

use crate::types::{
    INITIAL_LEVEL, LINE_CLEAR_FRAMES, LINE_CLEAR_FRAME_MS, LOCK_DELAY_MS, LOCK_MOVE_LIMIT,
    MAX_LEVEL, SOFT_DROP_MULTIPLIER,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub initial_level: u32,
    pub max_level: u32,
    pub lock_delay_ms: u32,
    pub lock_move_limit: u32,
    pub soft_drop_multiplier: u32,
    pub line_clear_frame_ms: u32,
    pub line_clear_frames: u32,
}

impl GameConfig {
    /// Copy with every value forced into its usable range.
    pub fn sanitized(mut self) -> Self {
        self.max_level = self.max_level.clamp(1, MAX_LEVEL);
        self.initial_level = self.initial_level.clamp(1, self.max_level);
        self.lock_delay_ms = self.lock_delay_ms.max(1);
        self.soft_drop_multiplier = self.soft_drop_multiplier.max(1);
        self.line_clear_frame_ms = self.line_clear_frame_ms.max(1);
        self.line_clear_frames = self.line_clear_frames.max(1);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_level: INITIAL_LEVEL,
            max_level: MAX_LEVEL,
            lock_delay_ms: LOCK_DELAY_MS,
            lock_move_limit: LOCK_MOVE_LIMIT,
            soft_drop_multiplier: SOFT_DROP_MULTIPLIER,
            line_clear_frame_ms: LINE_CLEAR_FRAME_MS,
            line_clear_frames: LINE_CLEAR_FRAMES,
        }
    }
}
