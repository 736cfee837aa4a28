//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the engine, the terminal front-end and the tests alike.
//!
//! # Board Dimensions
//!
//! - **Columns**: 10 (x = 0..9, left to right)
//! - **Visible rows**: 20 (y = 0..19, measured *upward* from the floor)
//! - **Hidden rows**: 4 extra rows above the visible matrix, so a piece nudged
//!   above the spawn line can still settle
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Front-end fixed timestep (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Gravity interval at level 1 |
//! | `SOFT_DROP_MULTIPLIER` | 20 | Soft drop divides the interval by this |
//! | `LOCK_DELAY_MS` | 500 | Time before a grounded piece locks |
//! | `LOCK_MOVE_LIMIT` | 15 | Manipulations allowed since the lowest point |
//! | `LINE_CLEAR_FRAME_MS` | 60 | Duration of one peel animation frame |
//! | `LINE_CLEAR_FRAMES` | 6 | Peel frames (5) plus the collapse frame |
//!
//! # Auto Repeat
//!
//! - `DEFAULT_DAS_MS`: 300ms - time before a held left/right key repeats
//! - `DEFAULT_ARR_MS`: 50ms - interval between repeats
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, GameStatus, PieceKind, BOARD_COLUMNS, BOARD_ROWS};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert!(GameStatus::Playing.accepts_movement());
//! assert!(!GameStatus::Paused.accepts_movement());
//!
//! assert_eq!(BOARD_COLUMNS, 10);
//! assert_eq!(BOARD_ROWS, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_COLUMNS: i8 = 10;

/// Visible board height in cells (20 rows)
pub const BOARD_ROWS: i8 = 20;

/// Rows kept above the visible matrix
pub const HIDDEN_ROWS: i8 = 4;

/// Total rows stored for locked cells (visible + hidden)
pub const STORAGE_ROWS: i8 = BOARD_ROWS + HIDDEN_ROWS;

/// Rows of the upcoming-piece preview matrix
pub const QUEUE_ROWS: i8 = 8;

/// Columns of the upcoming-piece preview matrix
pub const QUEUE_COLUMNS: i8 = 4;

/// Number of upcoming pieces shown in the preview
pub const PREVIEW_LEN: usize = 3;

/// Vertical distance between previewed pieces in the queue matrix
pub const QUEUE_SPACING: i8 = 3;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Soft drop divides the gravity interval by this value.
pub const SOFT_DROP_MULTIPLIER: u32 = 20;

/// Lock delay when piece is grounded (500ms)
pub const LOCK_DELAY_MS: u32 = 500;

/// Player manipulations allowed after reaching a new lowest row before the
/// next ground contact locks instantly.
pub const LOCK_MOVE_LIMIT: u32 = 15;

/// Duration of a single line-clear animation frame
pub const LINE_CLEAR_FRAME_MS: u32 = 60;

/// Line-clear animation call budget (five peel frames, then collapse)
pub const LINE_CLEAR_FRAMES: u32 = 6;

/// Maximum upward adjustment applied to a spawning piece
pub const SPAWN_NUDGE_LIMIT: i8 = 2;

/// Level a fresh game starts at
pub const INITIAL_LEVEL: u32 = 1;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 15;

/// Lines needed per level step (level N ends at N * LINES_PER_LEVEL lines)
pub const LINES_PER_LEVEL: u32 = 10;

/// Delay before a held left/right key starts repeating.
pub const DEFAULT_DAS_MS: u32 = 300;

/// Interval between left/right repeats once DAS has elapsed.
pub const DEFAULT_ARR_MS: u32 = 50;

/// Line clear scoring table
///
/// Base points for clearing N lines, multiplied by the current level:
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row of soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row of hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// A locked cell on the board (`None` when empty)
pub type Cell = Option<PieceKind>;

/// The seven tetromino piece kinds
///
/// - **I**: horizontal bar
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
/// - **O**: 2x2 square
/// - **S**: S-shaped
/// - **T**: T-shaped
/// - **Z**: Z-shaped (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind, in canonical order. This is the source list bags are shuffled from.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Single uppercase letter, as shown in the side panel
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }

    /// Compact non-zero code used in snapshot grids (0 means empty).
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Semantic intents issued by the presentation layer.
///
/// These are device independent: the terminal front-end maps keys onto them, tests
/// call them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Down held: step once and switch gravity to soft-drop speed
    SoftDropStart,
    /// Down released: back to normal gravity
    SoftDropEnd,
    /// Drop to the lowest legal position and lock immediately
    HardDrop,
    /// Rotate piece 90° clockwise (with wall kicks)
    RotateCw,
    /// Pause the game, preserving timer residuals
    Pause,
    /// Resume a paused game
    Resume,
    /// Pause when running, resume when paused
    TogglePause,
    /// Full reset, including a queue reshuffle
    Restart,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase names)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("softDropStart"), Some(GameAction::SoftDropStart));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdropstart" => Some(GameAction::SoftDropStart),
            "softdropend" => Some(GameAction::SoftDropEnd),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" | "rotateclockwise" => Some(GameAction::RotateCw),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            "togglepause" => Some(GameAction::TogglePause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDropStart => "softDropStart",
            GameAction::SoftDropEnd => "softDropEnd",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::TogglePause => "togglePause",
            GameAction::Restart => "restart",
        }
    }
}

/// Top-level game mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Paused,
    SoftDrop,
    HardDrop,
    LockDown,
    LineClear,
    GameOver,
}

impl GameStatus {
    pub const ALL: [GameStatus; 7] = [
        GameStatus::Playing,
        GameStatus::Paused,
        GameStatus::SoftDrop,
        GameStatus::HardDrop,
        GameStatus::LockDown,
        GameStatus::LineClear,
        GameStatus::GameOver,
    ];

    /// True if the status is any of `statuses`.
    pub fn is(&self, statuses: &[GameStatus]) -> bool {
        statuses.contains(self)
    }

    /// Movement and rotation intents are only honoured in these states.
    pub fn accepts_movement(&self) -> bool {
        self.is(&[GameStatus::Playing, GameStatus::SoftDrop, GameStatus::LockDown])
    }

    /// Whether the gravity scheduler may run. Outside these states it is frozen.
    pub fn gravity_active(&self) -> bool {
        self.is(&[GameStatus::Playing, GameStatus::SoftDrop, GameStatus::HardDrop])
    }

    /// Legal transitions of the status machine. `Paused` may only return to the
    /// status it interrupted, which the session tracks; here any playable status
    /// is accepted.
    pub fn can_transition_to(&self, next: GameStatus) -> bool {
        use GameStatus::*;

        if *self == next {
            return false;
        }

        match self {
            Playing => matches!(next, SoftDrop | HardDrop | LockDown | Paused | GameOver | LineClear),
            SoftDrop => matches!(next, Playing | LockDown | Paused | HardDrop | GameOver | LineClear),
            HardDrop => matches!(next, LineClear | Playing | SoftDrop | GameOver),
            LockDown => matches!(next, Playing | SoftDrop | LineClear | Paused | HardDrop | GameOver),
            LineClear => matches!(next, Playing | Paused | GameOver),
            Paused => matches!(next, Playing | SoftDrop | LockDown | LineClear),
            GameOver => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "PLAYING",
            GameStatus::Paused => "PAUSED",
            GameStatus::SoftDrop => "SOFT_DROP",
            GameStatus::HardDrop => "HARD_DROP",
            GameStatus::LockDown => "LOCK_DOWN",
            GameStatus::LineClear => "LINE_CLEAR",
            GameStatus::GameOver => "GAME_OVER",
        }
    }
}

/// Core-side event emitted after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Points awarded for the clear (level multiplier included)
    pub line_clear_score: u32,
    pub level: u32,
}
