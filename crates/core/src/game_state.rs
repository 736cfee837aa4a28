//! Game state module - one playing session
//!
//! [`GameState`] owns the board, the active piece, the queue, the score and every
//! timer. The presentation layer drives it with two calls:
//!
//! - [`GameState::apply_action`] for each player intent, in arrival order
//! - [`GameState::tick`] once per frame with the elapsed milliseconds
//!
//! All timing goes through [`FrameSyncInterval`]s that only advance inside `tick`,
//! so a session is fully determined by its seed and its input sequence.

use crate::board::Board;
use crate::config::GameConfig;
use crate::coord::Coord;
use crate::line_clear::{LineClear, LineClearStep};
use crate::lock_delay::{LockDelay, LockPhase, LockSignal};
use crate::pieces;
use crate::rng::PieceQueue;
use crate::scoring::{
    calculate_drop_score, calculate_line_score, get_drop_interval_ms, get_soft_drop_interval_ms,
    Score,
};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
use crate::status::StatusMachine;
use crate::tetromino::Tetromino;
use crate::timer::FrameSyncInterval;
use crate::types::{GameAction, GameStatus, LockEvent, PieceKind, PREVIEW_LEN, SPAWN_NUDGE_LIMIT};

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Tetromino>,
    queue: PieceQueue,
    status: StatusMachine,
    score: Score,
    gravity: FrameSyncInterval,
    lock: LockDelay,
    line_clear: Option<LineClear>,
    /// Down is held; survives lock-down so lift-off resumes soft drop.
    soft_drop_held: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id for spawned pieces within an episode.
    piece_id: u32,
    started: bool,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
    high_score_dirty: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, GameConfig::default(), 0)
    }

    /// New game that remembers a previously saved high score.
    pub fn with_high_score(seed: u32, high_score: u32) -> Self {
        Self::with_config(seed, GameConfig::default(), high_score)
    }

    pub fn with_config(seed: u32, config: GameConfig, high_score: u32) -> Self {
        let config = config.sanitized();
        Self {
            config,
            board: Board::new(),
            active: None,
            queue: PieceQueue::new(seed),
            status: StatusMachine::new(),
            score: Score::new(config.initial_level, high_score),
            gravity: FrameSyncInterval::stopped(get_drop_interval_ms(config.initial_level)),
            lock: LockDelay::new(config.lock_delay_ms, config.lock_move_limit),
            line_clear: None,
            soft_drop_held: false,
            episode_id: 0,
            piece_id: 0,
            started: false,
            last_event: None,
            high_score_dirty: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!(
            "episode {} started (seed {}, level {})",
            self.episode_id,
            self.queue.seed(),
            self.score.level
        );
        self.spawn_next();
    }

    /// Full reset. The high score, seed stream and configuration carry over.
    pub fn restart(&mut self) {
        log::info!(
            "episode {} ended with {} points",
            self.episode_id,
            self.score.points
        );
        self.queue.reset();
        self.board.clear();
        self.active = None;
        self.line_clear = None;
        self.lock.reset();
        self.gravity.cancel();
        self.status.reset();
        self.score.reset(self.config.initial_level);
        self.soft_drop_held = false;
        self.last_event = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.piece_id = 0;
        self.started = false;
        self.start();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> GameStatus {
        self.status.current()
    }

    pub fn paused(&self) -> bool {
        self.status.is(GameStatus::Paused)
    }

    pub fn game_over(&self) -> bool {
        self.status.is(GameStatus::GameOver)
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn seed(&self) -> u32 {
        self.queue.seed()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn points(&self) -> u32 {
        self.score.points
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn lines(&self) -> u32 {
        self.score.lines
    }

    pub fn high_score(&self) -> u32 {
        self.score.high_score
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    /// The next pieces, in draw order
    pub fn next_queue(&self) -> [PieceKind; PREVIEW_LEN] {
        let mut out = [PieceKind::I; PREVIEW_LEN];
        for (slot, &kind) in out.iter_mut().zip(self.queue.preview(PREVIEW_LEN)) {
            *slot = kind;
        }
        out
    }

    /// Where the active piece would come to rest
    pub fn ghost(&self) -> Option<Tetromino> {
        if self.game_over() {
            return None;
        }
        self.active.map(|p| p.move_to_drop_point(&self.board))
    }

    pub fn lock_phase(&self) -> LockPhase {
        self.lock.phase()
    }

    /// Rows being animated away, bottom to top (empty outside a line clear)
    pub fn clearing_rows(&self) -> &[i8] {
        match &self.line_clear {
            Some(lc) => lc.rows(),
            None => &[],
        }
    }

    /// Current gravity interval, soft-drop speed included
    pub fn gravity_interval_ms(&self) -> u32 {
        self.interval_for(self.status.current())
    }

    fn interval_for(&self, status: GameStatus) -> u32 {
        let base = get_drop_interval_ms(self.score.level);
        if status == GameStatus::SoftDrop {
            get_soft_drop_interval_ms(base, self.config.soft_drop_multiplier)
        } else {
            base
        }
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// The high score, if it changed since the last call (for persistence).
    pub fn take_high_score_update(&mut self) -> Option<u32> {
        if std::mem::take(&mut self.high_score_dirty) {
            Some(self.score.high_score)
        } else {
            None
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_visible(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost = self.ghost().map(|g| g.cells);
        out.next_queue = self.next_queue();
        out.status = self.status.current();
        out.episode_id = self.episode_id;
        out.seed = self.queue.seed();
        out.piece_id = self.piece_id;
        out.points = self.score.points;
        out.high_score = self.score.high_score;
        out.level = self.score.level;
        out.lines = self.score.lines;
        out.line_clear_frame = self.line_clear.as_ref().map_or(0, |lc| lc.frame());
        out.timers = TimersSnapshot {
            gravity_ms: self.gravity.remaining_ms(),
            gravity_interval_ms: self.gravity.interval_ms(),
            lock_ms: self.lock.remaining_ms(),
            line_clear_ms: self.line_clear.as_ref().map_or(0, |lc| lc.remaining_ms()),
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Apply a game action. Returns false if it was ignored in the current status.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if !self.started {
            return false;
        }
        match action {
            GameAction::MoveLeft => self.try_move(Coord::x(-1)),
            GameAction::MoveRight => self.try_move(Coord::x(1)),
            GameAction::SoftDropStart => self.soft_drop_start(),
            GameAction::SoftDropEnd => self.soft_drop_end(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.try_rotate(),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
            GameAction::TogglePause => {
                if self.paused() {
                    self.resume()
                } else {
                    self.pause()
                }
            }
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    /// Advance every running timer by `elapsed_ms`. Returns true if the state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.started {
            return false;
        }

        match self.status.current() {
            GameStatus::Paused | GameStatus::GameOver => false,
            GameStatus::LineClear => self.advance_line_clear(elapsed_ms),
            GameStatus::LockDown => {
                if self.lock.advance(elapsed_ms) {
                    self.commit_lock();
                    return true;
                }
                false
            }
            _ => self.advance_gravity(elapsed_ms),
        }
    }

    fn advance_gravity(&mut self, elapsed_ms: u32) -> bool {
        let fires = self.gravity.advance(elapsed_ms);
        let mut changed = false;
        for _ in 0..fires {
            if !self.status.current().gravity_active() || self.active.is_none() {
                break;
            }
            changed |= self.gravity_step();
        }
        changed
    }

    fn advance_line_clear(&mut self, elapsed_ms: u32) -> bool {
        let Some(line_clear) = self.line_clear.as_mut() else {
            return false;
        };
        if let LineClearStep::Collapsed(lines) = line_clear.advance(elapsed_ms, &mut self.board) {
            self.line_clear = None;
            self.finish_line_clear(lines);
        }
        true
    }

    /// Status changes go through here so gravity speed follows soft drop.
    fn set_status(&mut self, next: GameStatus) -> bool {
        if self.status.is(next) {
            return true;
        }
        if !self.status.set(next) {
            return false;
        }
        if matches!(next, GameStatus::Playing | GameStatus::SoftDrop) {
            let interval = self.interval_for(next);
            if self.gravity.interval_ms() != interval {
                self.gravity.restart_with(interval);
            }
        }
        true
    }

    /// Playing, or SoftDrop while down is held
    fn free_fall_status(&self) -> GameStatus {
        if self.soft_drop_held {
            GameStatus::SoftDrop
        } else {
            GameStatus::Playing
        }
    }

    fn award(&mut self, points: u32) {
        if points > 0 && self.score.add_points(points) {
            self.high_score_dirty = true;
        }
    }

    fn spawn_next(&mut self) {
        let kind = self.queue.next();
        self.place_piece(kind);
    }

    /// Put a new piece of `kind` at the spawn point, nudging it up over the stack.
    ///
    /// Returns false and ends the game if the nudged piece still collides.
    fn place_piece(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::spawn(kind);

        let mut lift: i8 = 0;
        for &cell in &piece.cells {
            if lift >= SPAWN_NUDGE_LIMIT {
                break;
            }
            if self.board.is_occupied(cell) {
                lift = lift.max(1);
            }
            if self.board.is_occupied(cell + Coord::y(1)) {
                lift = SPAWN_NUDGE_LIMIT;
            }
        }

        let piece = piece.moved(Coord::y(lift));
        self.active = Some(piece);
        self.lock.reset();

        if piece.collides(&self.board) {
            self.end_game();
            return false;
        }

        if lift > 0 {
            log::debug!("{:?} spawned {} row(s) high", kind, lift);
        }
        self.piece_id = self.piece_id.wrapping_add(1);
        let interval = self.gravity_interval_ms();
        self.gravity.restart_with(interval);
        self.evaluate_lock();
        true
    }

    fn end_game(&mut self) {
        self.gravity.cancel();
        self.lock.reset();
        self.line_clear = None;
        self.soft_drop_held = false;
        self.set_status(GameStatus::GameOver);
        log::info!(
            "game over: {} points, {} lines, level {}",
            self.score.points,
            self.score.lines,
            self.score.level
        );
    }

    fn try_move(&mut self, offset: Coord) -> bool {
        if !self.status.current().accepts_movement() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        if piece.is_at_bound(&self.board, offset) {
            return false;
        }

        let moved = piece.moved(offset);
        self.active = Some(moved);
        self.lock.record_manipulation(&moved);
        self.evaluate_lock();
        true
    }

    fn try_rotate(&mut self) -> bool {
        if !self.status.current().accepts_movement() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let Some(rotated) = pieces::try_rotate(&piece, &self.board) else {
            return false;
        };

        self.active = Some(rotated);
        self.lock.record_manipulation(&rotated);
        self.evaluate_lock();
        true
    }

    /// One row of gravity. Soft drop pays a point per row.
    fn gravity_step(&mut self) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        if piece.is_grounded(&self.board) {
            self.evaluate_lock();
            return false;
        }

        let fallen = piece.moved(Coord::y(-1));
        self.active = Some(fallen);
        self.lock.record_descent(&fallen);
        if self.status.is(GameStatus::SoftDrop) {
            self.award(calculate_drop_score(1, false));
        }
        self.evaluate_lock();
        true
    }

    fn soft_drop_start(&mut self) -> bool {
        if !self.status.current().accepts_movement() {
            return false;
        }
        self.soft_drop_held = true;
        if !self.status.is(GameStatus::Playing) {
            return true;
        }
        self.set_status(GameStatus::SoftDrop);
        self.gravity_step();
        true
    }

    fn soft_drop_end(&mut self) -> bool {
        let was_held = std::mem::replace(&mut self.soft_drop_held, false);
        match self.status.current() {
            GameStatus::SoftDrop => self.set_status(GameStatus::Playing),
            GameStatus::Paused if self.status.paused_from() == Some(GameStatus::SoftDrop) => {
                self.status.set_paused_from(GameStatus::Playing);
                let interval = self.interval_for(GameStatus::Playing);
                self.gravity.set_interval(interval);
                true
            }
            _ => was_held,
        }
    }

    fn hard_drop(&mut self) -> bool {
        if !self.status.current().accepts_movement() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let rows = piece.drop_distance(&self.board);
        self.active = Some(piece.move_to_drop_point(&self.board));
        self.set_status(GameStatus::HardDrop);
        self.award(calculate_drop_score(rows, true));
        self.evaluate_lock();
        true
    }

    fn pause(&mut self) -> bool {
        if !self.status.pause() {
            return false;
        }
        self.gravity.suspend();
        self.lock.suspend();
        if let Some(lc) = self.line_clear.as_mut() {
            lc.suspend();
        }
        log::debug!("paused");
        true
    }

    fn resume(&mut self) -> bool {
        let Some(status) = self.status.resume() else {
            return false;
        };
        self.gravity.resume();
        self.lock.resume();
        if let Some(lc) = self.line_clear.as_mut() {
            lc.resume();
        }
        log::debug!("resumed to {}", status.as_str());
        true
    }

    /// Feed the lock controller the current piece and act on its answer.
    fn evaluate_lock(&mut self) {
        let Some(piece) = self.active else {
            return;
        };
        let grounded = piece.is_grounded(&self.board);
        let instant = self.status.is(GameStatus::HardDrop);

        match self.lock.observe(&piece, grounded, instant) {
            LockSignal::Started => {
                self.set_status(GameStatus::LockDown);
            }
            LockSignal::Cancelled => {
                self.set_status(self.free_fall_status());
            }
            LockSignal::Commit => self.commit_lock(),
            LockSignal::Restarted | LockSignal::None => {}
        }
    }

    /// Merge the active piece and either spawn the next one or start a line clear.
    fn commit_lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        if !self.board.lock_piece(&piece) {
            log::warn!("{:?} overlapped the stack when locking", piece.kind);
        }
        self.lock.reset();

        let rows = self.board.full_rows();
        let lines = rows.len();
        self.last_event = Some(LockEvent {
            kind: piece.kind,
            lines_cleared: lines as u32,
            line_clear_score: calculate_line_score(lines, self.score.level),
            level: self.score.level,
        });
        log::debug!("locked {:?}, {} full row(s)", piece.kind, lines);

        if rows.is_empty() {
            self.set_status(self.free_fall_status());
            self.spawn_next();
            return;
        }

        self.gravity.cancel();
        self.line_clear = Some(LineClear::new(
            rows,
            self.config.line_clear_frame_ms,
            self.config.line_clear_frames,
        ));
        self.set_status(GameStatus::LineClear);
    }

    fn finish_line_clear(&mut self, lines: usize) {
        let result = self.score.record_line_clear(lines, self.config.max_level);
        if result.new_high_score {
            self.high_score_dirty = true;
        }
        if result.leveled_up {
            log::info!("level {}", self.score.level);
        }

        self.set_status(GameStatus::Playing);
        if self.soft_drop_held {
            self.set_status(GameStatus::SoftDrop);
        }
        self.spawn_next();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BOARD_COLUMNS, LINE_CLEAR_FRAME_MS};

    fn started(seed: u32) -> GameState {
        let mut state = GameState::new(seed);
        state.start();
        state
    }

    /// Session with `kind` as the active piece at its spawn point.
    fn with_piece(kind: PieceKind) -> GameState {
        let mut state = started(7);
        state.active = Some(Tetromino::spawn(kind));
        state.lock.reset();
        state
    }

    fn fill_row_except(board: &mut Board, y: i8, hole: i8) {
        for x in 0..BOARD_COLUMNS {
            if x != hole {
                board.set(Coord::new(x, y), Some(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);
        assert!(!state.started());
        assert_eq!(state.status(), GameStatus::Playing);
        assert!(state.active().is_none());
        assert_eq!(state.level(), 1);
        assert_eq!(state.points(), 0);
    }

    #[test]
    fn test_start_spawns_piece() {
        let state = started(12345);
        assert!(state.active().is_some());
        assert_eq!(state.piece_id(), 1);
        assert!(state.gravity.is_running());
        assert_eq!(state.gravity_interval_ms(), 1000);
    }

    #[test]
    fn test_actions_ignored_before_start() {
        let mut state = GameState::new(1);
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.tick(1000));
    }

    #[test]
    fn test_move_and_wall() {
        let mut state = with_piece(PieceKind::T);
        assert!(state.apply_action(GameAction::MoveLeft));
        assert!(state.apply_action(GameAction::MoveLeft));
        assert!(state.apply_action(GameAction::MoveLeft));
        // T spans x = 0..2 now.
        assert!(!state.apply_action(GameAction::MoveLeft));
        let min_x = state.active().unwrap().cells.iter().map(|c| c.x).min();
        assert_eq!(min_x, Some(0));
    }

    #[test]
    fn test_gravity_moves_one_row_per_interval() {
        let mut state = with_piece(PieceKind::O);
        state.gravity.restart();
        let before = state.active().unwrap().lowest_y();
        assert!(!state.tick(999));
        assert!(state.tick(1));
        assert_eq!(state.active().unwrap().lowest_y(), before - 1);
    }

    #[test]
    fn test_long_frame_applies_every_step() {
        let mut state = with_piece(PieceKind::O);
        state.gravity.restart();
        let before = state.active().unwrap().lowest_y();
        state.tick(3000);
        assert_eq!(state.active().unwrap().lowest_y(), before - 3);
    }

    #[test]
    fn test_hard_drop_scores_and_locks() {
        let mut state = with_piece(PieceKind::T);
        assert!(state.apply_action(GameAction::HardDrop));

        // T lowest row starts at 18 and rests on the floor.
        assert_eq!(state.points(), 36);
        assert_eq!(state.board().row_count(0), 3);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.piece_id(), 2);

        let event = state.take_last_event().unwrap();
        assert_eq!(event.kind, PieceKind::T);
        assert_eq!(event.lines_cleared, 0);
        assert!(state.take_last_event().is_none());
        assert_eq!(state.take_high_score_update(), Some(36));
        assert_eq!(state.take_high_score_update(), None);
    }

    #[test]
    fn test_soft_drop_steps_and_speeds_up() {
        let mut state = with_piece(PieceKind::O);
        let before = state.active().unwrap().lowest_y();

        assert!(state.apply_action(GameAction::SoftDropStart));
        assert_eq!(state.status(), GameStatus::SoftDrop);
        assert_eq!(state.active().unwrap().lowest_y(), before - 1);
        assert_eq!(state.points(), 1);
        assert_eq!(state.gravity_interval_ms(), 50);

        state.tick(100);
        assert_eq!(state.active().unwrap().lowest_y(), before - 3);
        assert_eq!(state.points(), 3);

        assert!(state.apply_action(GameAction::SoftDropEnd));
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.gravity_interval_ms(), 1000);
        assert_eq!(state.gravity.interval_ms(), 1000);
    }

    #[test]
    fn test_grounded_piece_enters_lock_down_then_locks() {
        let mut state = with_piece(PieceKind::O);
        state.active = Some(Tetromino::spawn(PieceKind::O).moved(Coord::y(-17)));
        state.gravity.restart();

        assert!(state.tick(1000));
        assert_eq!(state.status(), GameStatus::LockDown);
        assert_eq!(state.lock_phase(), LockPhase::Running);

        // Gravity is frozen, the lock timer is not.
        assert!(!state.tick(499));
        assert!(state.tick(1));
        assert_eq!(state.board().row_count(0), 2);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.piece_id(), 2);
    }

    #[test]
    fn test_moves_spent_in_the_air_do_not_skip_lock_delay() {
        let mut state = with_piece(PieceKind::O);
        state.gravity.restart();
        for i in 0..16 {
            let action = if i % 2 == 0 {
                GameAction::MoveLeft
            } else {
                GameAction::MoveRight
            };
            assert!(state.apply_action(action));
        }
        assert_eq!(state.lock.moves(), 16);

        for _ in 0..30 {
            state.tick(1000);
            if state.status() != GameStatus::Playing {
                break;
            }
        }
        assert_eq!(state.status(), GameStatus::LockDown);
        assert_eq!(state.piece_id(), 1);
        assert_eq!(state.lock.moves(), 0);
        assert_eq!(state.lock.remaining_ms(), 500);

        assert!(!state.tick(499));
        assert!(state.tick(1));
        assert_eq!(state.piece_id(), 2);
        assert_eq!(state.board().row_count(0), 2);
    }

    #[test]
    fn test_soft_drop_descent_resets_move_count() {
        let mut state = with_piece(PieceKind::T);
        for _ in 0..3 {
            state.apply_action(GameAction::MoveRight);
        }
        assert_eq!(state.lock.moves(), 3);
        assert!(state.apply_action(GameAction::SoftDropStart));
        assert_eq!(state.lock.moves(), 0);
    }

    #[test]
    fn test_move_during_lock_down_restarts_timer() {
        let mut state = with_piece(PieceKind::O);
        state.active = Some(Tetromino::spawn(PieceKind::O).moved(Coord::y(-18)));
        state.evaluate_lock();
        assert_eq!(state.status(), GameStatus::LockDown);

        state.tick(400);
        assert!(state.apply_action(GameAction::MoveLeft));
        assert_eq!(state.lock.remaining_ms(), 500);
        assert!(!state.tick(400));
        assert!(state.tick(100));
        assert_eq!(state.board().row_count(0), 2);
    }

    #[test]
    fn test_sliding_off_ledge_cancels_lock() {
        let mut state = with_piece(PieceKind::O);
        state.board.set(Coord::new(4, 0), Some(PieceKind::I));
        state.board.set(Coord::new(5, 0), Some(PieceKind::I));
        state.active = Some(Tetromino::spawn(PieceKind::O).moved(Coord::y(-17)));
        state.evaluate_lock();
        assert_eq!(state.status(), GameStatus::LockDown);

        state.apply_action(GameAction::MoveLeft);
        state.apply_action(GameAction::MoveLeft);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.lock_phase(), LockPhase::Idle);
    }

    #[test]
    fn test_tetris_clear() {
        let mut state = with_piece(PieceKind::I);
        for y in 0..4 {
            fill_row_except(&mut state.board, y, 0);
        }

        assert!(state.apply_action(GameAction::RotateCw));
        for _ in 0..5 {
            assert!(state.apply_action(GameAction::MoveLeft));
        }
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(state.apply_action(GameAction::HardDrop));

        assert_eq!(state.status(), GameStatus::LineClear);
        assert!(state.active().is_none());
        assert_eq!(state.clearing_rows(), &[0, 1, 2, 3]);
        // Vertical I travels from a top cell at y = 20 down to y = 3.
        assert_eq!(state.points(), 34);

        // Actions are ignored while clearing.
        assert!(!state.apply_action(GameAction::MoveLeft));

        state.tick(LINE_CLEAR_FRAME_MS);
        assert_eq!(state.board().row_count(0), 8);
        state.tick(LINE_CLEAR_FRAME_MS * 5);

        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.lines(), 4);
        assert_eq!(state.points(), 834);
        assert_eq!(state.board().occupied().count(), 0);
        assert!(state.active().is_some());
    }

    #[test]
    fn test_non_adjacent_rows_clear() {
        let mut state = with_piece(PieceKind::I);
        let board = &mut state.board;
        board.set(Coord::new(0, 0), Some(PieceKind::S));
        board.set(Coord::new(0, 1), Some(PieceKind::S));
        fill_row_except(board, 2, 0);
        fill_row_except(board, 5, 0);
        // Rows 3 and 4 stay incomplete.
        board.set(Coord::new(5, 3), Some(PieceKind::J));
        board.set(Coord::new(6, 4), Some(PieceKind::L));
        board.set(Coord::new(8, 6), Some(PieceKind::T));

        let vertical = pieces::try_rotate(&Tetromino::spawn(PieceKind::I), &Board::new()).unwrap();
        let dx = -vertical.cells[0].x;
        state.active = Some(vertical.moved(Coord::x(dx)));
        assert!(state.apply_action(GameAction::HardDrop));
        assert_eq!(state.clearing_rows(), &[2, 5]);

        state.tick(LINE_CLEAR_FRAME_MS * 6);
        assert_eq!(state.lines(), 2);
        // Rows 0 and 1 untouched, 3 and 4 shifted by one, 6 by two.
        assert!(state.board().is_occupied(Coord::new(0, 1)));
        assert!(state.board().is_occupied(Coord::new(5, 2)));
        assert!(state.board().is_occupied(Coord::new(0, 2)));
        assert!(state.board().is_occupied(Coord::new(6, 3)));
        assert!(state.board().is_occupied(Coord::new(8, 4)));
        assert!(!state.board().is_occupied(Coord::new(8, 6)));
    }

    #[test]
    fn test_spawn_nudge_one_row() {
        let mut state = started(3);
        for x in 3..=5 {
            state.board.set(Coord::new(x, 18), Some(PieceKind::Z));
        }
        assert!(state.place_piece(PieceKind::T));
        let piece = state.active().unwrap();
        assert_eq!(piece.lowest_y(), 19);
        assert_ne!(state.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_spawn_blocked_ends_game() {
        let mut state = started(3);
        for y in 18..22 {
            for x in 3..=5 {
                state.board.set(Coord::new(x, y), Some(PieceKind::Z));
            }
        }
        assert!(!state.place_piece(PieceKind::T));
        assert!(state.game_over());
        assert!(state.active().is_some());
        assert!(!state.gravity.is_running());

        // Terminal: only restart leaves it.
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::Pause));
        assert!(!state.tick(10_000));
        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn test_pause_preserves_gravity_residual() {
        let mut state = with_piece(PieceKind::O);
        state.gravity.restart();
        let before = state.active().unwrap().lowest_y();

        state.tick(700);
        assert!(state.apply_action(GameAction::Pause));
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.tick(5000));
        assert_eq!(state.snapshot().timers.gravity_ms, 300);

        assert!(state.apply_action(GameAction::TogglePause));
        assert!(!state.tick(299));
        assert_eq!(state.active().unwrap().lowest_y(), before);
        assert!(state.tick(1));
        assert_eq!(state.active().unwrap().lowest_y(), before - 1);
    }

    #[test]
    fn test_pause_during_line_clear() {
        let mut state = with_piece(PieceKind::I);
        for y in 0..4 {
            fill_row_except(&mut state.board, y, 0);
        }
        state.apply_action(GameAction::RotateCw);
        for _ in 0..5 {
            state.apply_action(GameAction::MoveLeft);
        }
        state.apply_action(GameAction::HardDrop);

        state.tick(90);
        assert!(state.apply_action(GameAction::Pause));
        state.tick(10_000);
        assert_eq!(state.snapshot().line_clear_frame, 1);
        assert!(state.apply_action(GameAction::Resume));
        assert_eq!(state.status(), GameStatus::LineClear);
        state.tick(30 + 60 * 4);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn test_soft_drop_released_while_paused() {
        let mut state = with_piece(PieceKind::O);
        state.apply_action(GameAction::SoftDropStart);
        state.apply_action(GameAction::Pause);
        state.apply_action(GameAction::SoftDropEnd);
        state.apply_action(GameAction::Resume);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.gravity.interval_ms(), 1000);
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut state = with_piece(PieceKind::T);
        state.apply_action(GameAction::HardDrop);
        let high = state.high_score();
        assert!(high > 0);

        state.apply_action(GameAction::Restart);
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.points(), 0);
        assert_eq!(state.high_score(), high);
        assert_eq!(state.board().occupied().count(), 0);
        assert_eq!(state.piece_id(), 1);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let state = with_piece(PieceKind::T);
        let snap = state.snapshot();
        assert_eq!(snap.status, GameStatus::Playing);
        assert_eq!(snap.next_queue, state.next_queue());
        assert_eq!(snap.active.unwrap().kind, PieceKind::T);
        let ghost = snap.ghost.unwrap();
        assert_eq!(ghost.iter().map(|c| c.y).min(), Some(0));
        assert_eq!(snap.high_score, 0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = started(2024);
        let mut b = started(2024);
        let script = [
            GameAction::MoveLeft,
            GameAction::RotateCw,
            GameAction::HardDrop,
            GameAction::MoveRight,
            GameAction::HardDrop,
        ];
        for action in script {
            a.apply_action(action);
            b.apply_action(action);
            a.tick(16);
            b.tick(16);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
