//! Scoring module - points, levels and gravity speed
//!
//! - Line clears pay `LINE_SCORES[n] * level`, using the level *before* the clear
//!   is counted.
//! - Soft drop pays 1 point per row, hard drop 2 per row.
//! - The level goes up by one when cumulative lines reach `level * 10`, up to 15.
//! - Gravity follows the guideline curve `(0.8 - (level - 1) * 0.007)^(level - 1)`
//!   seconds per row, rounded to whole milliseconds.

use crate::types::{
    BASE_DROP_MS, HARD_DROP_POINTS, INITIAL_LEVEL, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL,
    SOFT_DROP_POINTS,
};

/// Outcome of counting a line clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points for the clear, level multiplier included
    pub line_clear_score: u32,
    /// Level the clear was scored at
    pub scored_level: u32,
    pub leveled_up: bool,
    pub new_high_score: bool,
}

/// Calculate line clear score
/// lines: number of lines cleared (1-4)
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    LINE_SCORES[lines.min(4)] * level
}

/// Calculate drop score
/// soft_drop: +1 per row
/// hard_drop: +2 per row
pub fn calculate_drop_score(rows: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        rows * HARD_DROP_POINTS
    } else {
        rows * SOFT_DROP_POINTS
    }
}

/// Level after `total_lines` have been cleared, starting from `level`.
/// Advances at most one step per call.
pub fn next_level(level: u32, total_lines: u32, max_level: u32) -> u32 {
    if level < max_level && total_lines >= level * LINES_PER_LEVEL {
        level + 1
    } else {
        level
    }
}

/// Gravity interval for a level (in milliseconds), never below 1.
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let steps = f64::from(level.max(1) - 1);
    let seconds = (0.8 - steps * 0.007).powf(steps);
    let interval = (seconds * f64::from(BASE_DROP_MS)).round();
    (interval as u32).max(1)
}

/// Calculate soft drop interval
/// Base interval divided by soft drop multiplier
pub fn get_soft_drop_interval_ms(base_interval: u32, multiplier: u32) -> u32 {
    let interval = base_interval / multiplier.max(1);
    interval.max(1)
}

/// Running score of a session. The high score outlives restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub level: u32,
    pub points: u32,
    pub lines: u32,
    pub high_score: u32,
}

impl Score {
    pub fn new(initial_level: u32, high_score: u32) -> Self {
        Self {
            level: initial_level,
            points: 0,
            lines: 0,
            high_score,
        }
    }

    /// Add points. Returns true if this set a new high score.
    pub fn add_points(&mut self, points: u32) -> bool {
        self.points = self.points.saturating_add(points);
        if self.points > self.high_score {
            self.high_score = self.points;
            return true;
        }
        false
    }

    /// Count `lines` cleared in one lock.
    pub fn record_line_clear(&mut self, lines: usize, max_level: u32) -> ScoreResult {
        let scored_level = self.level;
        let line_clear_score = calculate_line_score(lines, scored_level);
        let new_high_score = self.add_points(line_clear_score);

        self.lines += lines as u32;
        self.level = next_level(self.level, self.lines, max_level);

        ScoreResult {
            line_clear_score,
            scored_level,
            leveled_up: self.level > scored_level,
            new_high_score,
        }
    }

    /// Zero the session counters, keeping the high score.
    pub fn reset(&mut self, initial_level: u32) {
        *self = Self::new(initial_level, self.high_score);
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new(INITIAL_LEVEL, 0)
    }
}
