//! Status machine - single source of truth for the game mode
//!
//! Wraps [`GameStatus`] with the transition table and remembers which status a
//! pause interrupted. Rejected transitions are logged and leave the state alone.

use crate::types::GameStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMachine {
    current: GameStatus,
    /// Status to return to on resume
    paused_from: Option<GameStatus>,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self {
            current: GameStatus::Playing,
            paused_from: None,
        }
    }

    pub fn current(&self) -> GameStatus {
        self.current
    }

    pub fn is(&self, status: GameStatus) -> bool {
        self.current == status
    }

    /// Move to `next` if the table allows it. Pausing goes through [`pause`](Self::pause).
    pub fn set(&mut self, next: GameStatus) -> bool {
        if next == GameStatus::Paused {
            return self.pause();
        }
        if self.current == GameStatus::Paused {
            log::debug!("ignored {} while paused", next.as_str());
            return false;
        }
        self.apply(next)
    }

    fn apply(&mut self, next: GameStatus) -> bool {
        if !self.current.can_transition_to(next) {
            log::debug!(
                "ignored transition {} -> {}",
                self.current.as_str(),
                next.as_str()
            );
            return false;
        }
        log::trace!("status {} -> {}", self.current.as_str(), next.as_str());
        self.current = next;
        true
    }

    pub fn pause(&mut self) -> bool {
        let from = self.current;
        if self.apply(GameStatus::Paused) {
            self.paused_from = Some(from);
            return true;
        }
        false
    }

    /// Return to the interrupted status. `None` if not paused.
    pub fn resume(&mut self) -> Option<GameStatus> {
        if self.current != GameStatus::Paused {
            log::debug!("ignored resume while {}", self.current.as_str());
            return None;
        }
        let target = self.paused_from.take().unwrap_or(GameStatus::Playing);
        self.current = target;
        Some(target)
    }

    /// The status a resume would return to
    pub fn paused_from(&self) -> Option<GameStatus> {
        self.paused_from
    }

    /// Rewrite the resume target, e.g. when soft drop is released during a pause.
    pub fn set_paused_from(&mut self, status: GameStatus) {
        if self.paused_from.is_some() {
            self.paused_from = Some(status);
        }
    }

    /// Back to a fresh `Playing` state, from anywhere (restart).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StatusMachine {
    fn default() -> Self {
        Self::new()
    }
}
