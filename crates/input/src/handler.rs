//! DAS/ARR input handler for terminal environments.
//!
//! Left/right move once on press, then repeat every `arr` ms after an initial
//! `das` ms delay. Down is reported as a start/end pair; the engine applies the soft
//! drop speed itself.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::{GameAction, DEFAULT_ARR_MS, DEFAULT_DAS_MS};
use blockfall_core::FrameSyncInterval;

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    fn action(self) -> Option<GameAction> {
        match self {
            HorizontalDirection::Left => Some(GameAction::MoveLeft),
            HorizontalDirection::Right => Some(GameAction::MoveRight),
            HorizontalDirection::None => None,
        }
    }
}

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers DAS/ARR repeats.
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks held keys and produces repeat actions.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    repeat: FrameSyncInterval,
    down_held: bool,
    /// Time since the last press of a held key
    idle_ms: u32,
    das_ms: u32,
    arr_ms: u32,
    key_release_timeout_ms: u32,
}

/// Which held key a code belongs to
fn held_direction(code: KeyCode) -> Option<HorizontalDirection> {
    match code {
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => Some(HorizontalDirection::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => Some(HorizontalDirection::Right),
        _ => None,
    }
}

fn is_down(code: KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J'))
}

/// True for keys the handler owns (left, right, down and their aliases).
pub fn is_held_key(code: KeyCode) -> bool {
    held_direction(code).is_some() || is_down(code)
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            repeat: FrameSyncInterval::stopped(arr_ms),
            down_held: false,
            idle_ms: 0,
            das_ms,
            arr_ms,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn horizontal(&self) -> HorizontalDirection {
        self.horizontal
    }

    pub fn down_held(&self) -> bool {
        self.down_held
    }

    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        if let Some(direction) = held_direction(code) {
            self.idle_ms = 0;
            if self.horizontal == direction {
                return None;
            }
            self.horizontal = direction;
            self.repeat = FrameSyncInterval::new(self.arr_ms).with_delay(self.das_ms);
            return direction.action();
        }

        if is_down(code) {
            self.idle_ms = 0;
            if self.down_held {
                return None;
            }
            self.down_held = true;
            return Some(GameAction::SoftDropStart);
        }

        None
    }

    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<GameAction> {
        if let Some(direction) = held_direction(code) {
            if self.horizontal == direction {
                self.release_horizontal();
            }
            return None;
        }

        if is_down(code) && self.down_held {
            self.down_held = false;
            return Some(GameAction::SoftDropEnd);
        }

        None
    }

    fn release_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.repeat.cancel();
    }

    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<GameAction, 32> {
        let mut actions = ArrayVec::<GameAction, 32>::new();

        // Auto-release when terminal does not emit release events.
        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > self.key_release_timeout_ms {
            if self.horizontal != HorizontalDirection::None {
                self.release_horizontal();
            }
            if self.down_held {
                self.down_held = false;
                let _ = actions.try_push(GameAction::SoftDropEnd);
            }
        }

        if let Some(action) = self.horizontal.action() {
            for _ in 0..self.repeat.advance(elapsed_ms) {
                let _ = actions.try_push(action);
            }
        }

        actions
    }

    /// Drop every held key without emitting actions.
    pub fn reset(&mut self) {
        self.release_horizontal();
        self.down_held = false;
        self.idle_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
