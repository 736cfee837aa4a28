//! Lock delay - grace period before a grounded piece merges into the board
//!
//! The session calls [`LockDelay::observe`] after every change to the active piece and
//! [`LockDelay::advance`] once per frame. The controller answers with a
//! [`LockSignal`] telling the session what to do with its status.
//!
//! Rules:
//! - A grounded piece starts a 500ms one-shot timer, anchored to its position.
//! - While running, any displacement from the anchor restarts the timer.
//! - Leaving the ground cancels the timer.
//! - A hard drop, or more than the allowed manipulations since the piece last
//!   reached a new lowest row, locks on contact without waiting.

use crate::coord::Coord;
use crate::tetromino::Tetromino;
use crate::timer::FrameSyncInterval;
use crate::types::{LOCK_DELAY_MS, LOCK_MOVE_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
    Idle,
    Running,
    Committed,
}

/// What the session should do after an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockSignal {
    None,
    /// Timer started: enter lock-down
    Started,
    /// Piece moved while grounded; timer started over
    Restarted,
    /// Piece left the ground
    Cancelled,
    /// Lock now
    Commit,
}

#[derive(Debug, Clone)]
pub struct LockDelay {
    phase: LockPhase,
    timer: FrameSyncInterval,
    anchor: Option<Tetromino>,
    lowest_y: Option<i8>,
    moves: u32,
    move_limit: u32,
}

impl LockDelay {
    pub fn new(delay_ms: u32, move_limit: u32) -> Self {
        Self {
            phase: LockPhase::Idle,
            timer: FrameSyncInterval::stopped(delay_ms).with_limit(1),
            anchor: None,
            lowest_y: None,
            moves: 0,
            move_limit,
        }
    }

    /// Forget everything about the previous piece.
    pub fn reset(&mut self) {
        self.phase = LockPhase::Idle;
        self.timer.cancel();
        self.anchor = None;
        self.lowest_y = None;
        self.moves = 0;
    }

    /// Count a successful player move or rotation of `piece`.
    ///
    /// Reaching a row lower than any before resets the count.
    pub fn record_manipulation(&mut self, piece: &Tetromino) {
        let y = piece.lowest_y();
        if self.lowest_y.map_or(true, |lowest| y < lowest) {
            self.lowest_y = Some(y);
            self.moves = 0;
        }
        self.moves += 1;
    }

    /// Note a fall of `piece` that the player did not cause (gravity, soft drop).
    ///
    /// A new lowest row resets the count; nothing is counted.
    pub fn record_descent(&mut self, piece: &Tetromino) {
        let y = piece.lowest_y();
        if self.lowest_y.map_or(true, |lowest| y < lowest) {
            self.lowest_y = Some(y);
            self.moves = 0;
        }
    }

    /// React to the current state of the active piece.
    pub fn observe(&mut self, piece: &Tetromino, grounded: bool, instant: bool) -> LockSignal {
        if self.phase == LockPhase::Committed {
            return LockSignal::None;
        }

        if !grounded {
            if self.phase == LockPhase::Running {
                self.timer.cancel();
                self.phase = LockPhase::Idle;
                self.anchor = None;
                return LockSignal::Cancelled;
            }
            return LockSignal::None;
        }

        if instant || self.moves > self.move_limit {
            self.commit();
            return LockSignal::Commit;
        }

        match self.phase {
            LockPhase::Idle => {
                self.timer.restart();
                self.phase = LockPhase::Running;
                self.anchor = Some(*piece);
                LockSignal::Started
            }
            LockPhase::Running => {
                let unmoved = self
                    .anchor
                    .and_then(|anchor| piece.difference(&anchor))
                    .is_some_and(|d| d == Coord::ZERO);
                if unmoved {
                    LockSignal::None
                } else {
                    self.timer.restart();
                    self.anchor = Some(*piece);
                    LockSignal::Restarted
                }
            }
            LockPhase::Committed => LockSignal::None,
        }
    }

    /// Feed frame time. Returns true when the delay has elapsed and the piece must lock.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if self.phase != LockPhase::Running {
            return false;
        }
        if self.timer.advance(elapsed_ms) > 0 {
            self.commit();
            return true;
        }
        false
    }

    fn commit(&mut self) {
        self.timer.cancel();
        self.phase = LockPhase::Committed;
    }

    pub fn suspend(&mut self) {
        self.timer.suspend();
    }

    pub fn resume(&mut self) {
        self.timer.resume();
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    /// Time left before the piece locks (0 when not running)
    pub fn remaining_ms(&self) -> u32 {
        match self.phase {
            LockPhase::Running => self.timer.remaining_ms(),
            _ => 0,
        }
    }

    /// Manipulations counted since the last new lowest row
    pub fn moves(&self) -> u32 {
        self.moves
    }
}

impl Default for LockDelay {
    fn default() -> Self {
        Self::new(LOCK_DELAY_MS, LOCK_MOVE_LIMIT)
    }
}
