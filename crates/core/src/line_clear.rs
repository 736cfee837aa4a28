//! Line clear animation
//!
//! Full rows disappear from the centre outward: each frame empties the next
//! innermost pair of columns (4 and 5 first, 0 and 9 last) in every full row. The
//! frame after the last peel collapses the rows and hands the line count back to
//! the session.

use crate::board::{Board, FullRows};
use crate::timer::FrameSyncInterval;
use crate::types::BOARD_COLUMNS;

/// Result of advancing the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClearStep {
    /// Still animating
    Running,
    /// Rows removed; carries the number of lines cleared
    Collapsed(usize),
}

#[derive(Debug, Clone)]
pub struct LineClear {
    rows: FullRows,
    timer: FrameSyncInterval,
    frames: u32,
    frame: u32,
}

impl LineClear {
    pub fn new(rows: FullRows, frame_ms: u32, frames: u32) -> Self {
        let frames = frames.max(1);
        Self {
            rows,
            timer: FrameSyncInterval::new(frame_ms).with_limit(frames),
            frames,
            frame: 0,
        }
    }

    /// Feed frame time, peeling or collapsing `board` as frames elapse.
    pub fn advance(&mut self, elapsed_ms: u32, board: &mut Board) -> LineClearStep {
        for _ in 0..self.timer.advance(elapsed_ms) {
            self.frame += 1;
            if self.frame >= self.frames {
                board.collapse_rows(&self.rows);
                return LineClearStep::Collapsed(self.rows.len());
            }
            Self::peel(board, &self.rows, self.frame);
        }
        LineClearStep::Running
    }

    /// Empty the column pair `frame` steps out from the centre.
    fn peel(board: &mut Board, rows: &[i8], frame: u32) {
        let step = frame as i8;
        let centre = BOARD_COLUMNS / 2;
        board.clear_cells(rows, &[centre - step, centre - 1 + step]);
    }

    pub fn suspend(&mut self) {
        self.timer.suspend();
    }

    pub fn resume(&mut self) {
        self.timer.resume();
    }

    /// Rows being cleared, bottom to top
    pub fn rows(&self) -> &[i8] {
        &self.rows
    }

    /// Frames elapsed so far
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn remaining_ms(&self) -> u32 {
        self.timer.remaining_ms()
    }
}
