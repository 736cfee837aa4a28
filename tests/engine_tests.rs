//! End-to-end scenarios driven only through the public engine API.

use std::collections::HashSet;

use blockfall::core::{GameSnapshot, GameState};
use blockfall::input::InputHandler;
use blockfall::types::{GameAction, GameStatus, PieceKind, BOARD_ROWS, TICK_MS};

fn started(seed: u32) -> GameState {
    let mut state = GameState::new(seed);
    state.start();
    state
}

fn occupied(snap: &GameSnapshot) -> usize {
    snap.board.iter().flatten().filter(|&&code| code != 0).count()
}

/// Hard drop until the game ends, returning the number of pieces dropped.
fn top_out(state: &mut GameState) -> usize {
    for dropped in 0..200 {
        if state.game_over() {
            return dropped;
        }
        assert!(state.apply_action(GameAction::HardDrop));
    }
    panic!("stack never reached the top");
}

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(12345);
    assert!(!state.started());
    assert!(state.active().is_none());
    assert!(!state.apply_action(GameAction::HardDrop));

    state.start();
    assert!(state.started());
    assert!(state.active().is_some());
    assert_eq!(state.status(), GameStatus::Playing);
    assert_eq!(state.piece_id(), 1);
    assert_eq!(state.level(), 1);
}

#[test]
fn test_hard_drop_pays_two_points_per_row() {
    let mut state = started(3);
    let rows = state.active().unwrap().lowest_y() as u32;

    assert!(state.apply_action(GameAction::HardDrop));
    assert_eq!(state.points(), rows * 2);
    assert_eq!(state.piece_id(), 2);
    assert_eq!(state.status(), GameStatus::Playing);

    let event = state.take_last_event().unwrap();
    assert_eq!(event.lines_cleared, 0);
    assert_eq!(event.line_clear_score, 0);
    assert!(state.take_last_event().is_none());

    assert_eq!(occupied(&state.snapshot()), 4);
}

#[test]
fn test_first_seven_spawns_are_one_bag() {
    let mut state = started(99);
    let mut kinds = HashSet::new();
    for _ in 0..7 {
        kinds.insert(state.active().unwrap().kind);
        state.apply_action(GameAction::HardDrop);
    }
    assert_eq!(kinds.len(), 7);
}

#[test]
fn test_preview_matches_spawn_order() {
    let mut state = started(5);
    let preview = state.next_queue();
    assert_eq!(state.snapshot().next_queue, preview);
    for expected in preview {
        state.apply_action(GameAction::HardDrop);
        assert_eq!(state.active().unwrap().kind, expected);
    }
}

#[test]
fn test_stacking_ends_the_game() {
    let mut state = started(11);
    let dropped = top_out(&mut state);
    assert!(dropped > 5);

    assert_eq!(state.status(), GameStatus::GameOver);
    // The piece that could not spawn stays for display.
    let stuck = state.active().unwrap();
    assert!(stuck.collides(state.board()));
    assert!(!state.apply_action(GameAction::MoveLeft));
    assert!(!state.apply_action(GameAction::Pause));
    assert!(!state.tick(10_000));
    assert_eq!(state.lines(), 0);
}

#[test]
fn test_restart_after_game_over() {
    let mut state = started(11);
    top_out(&mut state);
    let points = state.points();
    assert_eq!(state.take_high_score_update(), Some(points));

    let episode = state.episode_id();
    assert!(state.apply_action(GameAction::Restart));
    assert_eq!(state.status(), GameStatus::Playing);
    assert_eq!(state.episode_id(), episode + 1);
    assert_eq!(state.points(), 0);
    assert_eq!(state.high_score(), points);
    assert_eq!(occupied(&state.snapshot()), 0);
    assert!(state.active().is_some());
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        GameAction::MoveLeft,
        GameAction::RotateCw,
        GameAction::HardDrop,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::SoftDropStart,
        GameAction::SoftDropEnd,
        GameAction::HardDrop,
    ];
    let play = || {
        let mut state = started(2024);
        for action in script {
            state.apply_action(action);
            state.tick(TICK_MS * 10);
        }
        state.snapshot()
    };
    assert_eq!(play(), play());
}

#[test]
fn test_gravity_and_pause_residual() {
    let mut state = started(8);
    let top = state.active().unwrap().lowest_y();

    assert!(!state.tick(700));
    assert!(state.apply_action(GameAction::TogglePause));
    assert!(state.paused());
    assert!(!state.tick(60_000));
    assert_eq!(state.active().unwrap().lowest_y(), top);

    assert!(state.apply_action(GameAction::TogglePause));
    assert!(!state.tick(299));
    assert!(state.tick(1));
    assert_eq!(state.active().unwrap().lowest_y(), top - 1);
}

#[test]
fn test_soft_drop_until_lock() {
    let mut state = started(21);
    assert!(state.apply_action(GameAction::SoftDropStart));
    assert_eq!(state.status(), GameStatus::SoftDrop);

    // 20 rows at 50ms plus the lock delay is well under five seconds.
    for _ in 0..(5000 / TICK_MS) {
        state.tick(TICK_MS);
        if state.piece_id() == 2 {
            break;
        }
    }
    assert_eq!(state.piece_id(), 2);
    assert!(state.points() >= (BOARD_ROWS - 2) as u32);
    // Still held, so the next piece falls fast too.
    assert_eq!(state.status(), GameStatus::SoftDrop);

    assert!(state.apply_action(GameAction::SoftDropEnd));
    assert_eq!(state.status(), GameStatus::Playing);
}

#[test]
fn test_input_handler_drives_moves() {
    use crossterm::event::KeyCode;

    let mut state = started(4);
    let mut input = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
    let x0 = state.active().unwrap().cells[0].x;

    if let Some(action) = input.handle_key_press(KeyCode::Right) {
        state.apply_action(action);
    }
    for action in input.update(125) {
        state.apply_action(action);
    }
    // Press, DAS expiry and one ARR repeat
    assert_eq!(state.active().unwrap().cells[0].x, x0 + 3);

    input.handle_key_release(KeyCode::Right);
    assert!(input.update(1000).is_empty());
}

#[test]
fn test_snapshot_reports_hidden_piece_rows_clipped() {
    let state = started(1);
    let snap = state.snapshot();
    assert_eq!(snap.status, GameStatus::Playing);
    let active = snap.active.unwrap();
    assert!(active.cells.iter().all(|c| c.y < BOARD_ROWS));
    assert!(snap.ghost.unwrap().iter().any(|c| c.y == 0));
    assert_ne!(snap.next_queue, [PieceKind::I; 3]);
}
