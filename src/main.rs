//! Terminal runner (default binary).
//!
//! Logs go to `blockfall.log` in the data directory; anything written to stderr
//! would land on the alternate screen.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use blockfall::core::{GameSnapshot, GameState};
use blockfall::input::{handle_key_event, is_held_key, should_quit, InputHandler};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::{GameAction, TICK_MS};
use blockfall::{DataDir, HighScoreStore, Settings};

fn main() -> Result<()> {
    let dir = DataDir::from_env();
    dir.ensure()?;
    init_logging(&dir)?;

    let settings = Settings::load(&dir.settings_path()).unwrap_or_else(|e| {
        log::warn!("using default settings: {:#}", e);
        Settings::default()
    });
    let store = HighScoreStore::new(dir.highscore_path());

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &settings, &store);

    // Always try to restore terminal state.
    let restored = term.exit();
    if let Err(e) = &result {
        log::error!("game loop failed: {:#}", e);
    }
    result.and(restored)
}

fn init_logging(dir: &DataDir) -> Result<()> {
    let path = dir.log_path();
    let file = File::create(&path).with_context(|| format!("open log {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, settings: &Settings, store: &HighScoreStore) -> Result<()> {
    let seed = settings.resolve_seed();
    let mut game = GameState::with_config(seed, settings.game_config(), store.load());
    game.start();

    let view = GameView::default();
    let mut input = InputHandler::with_config(settings.das_ms, settings.arr_ms)
        .with_key_release_timeout_ms(settings.key_release_timeout_ms);

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(u64::from(TICK_MS));

    loop {
        game.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).context("poll terminal events")? {
            match event::read().context("read terminal event")? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            break;
                        }
                        let action = if is_held_key(key.code) {
                            input.handle_key_press(key.code)
                        } else {
                            handle_key_event(key)
                        };
                        if let Some(action) = action {
                            if action == GameAction::Restart {
                                input.reset();
                            }
                            game.apply_action(action);
                        }
                    }
                    // DAS/ARR handles repeats internally.
                    KeyEventKind::Repeat => {}
                    KeyEventKind::Release => {
                        if let Some(action) = input.handle_key_release(key.code) {
                            game.apply_action(action);
                        }
                    }
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for action in input.update(TICK_MS) {
                game.apply_action(action);
            }
            game.tick(TICK_MS);

            if let Some(event) = game.take_last_event() {
                log::debug!(
                    "{:?} locked: {} line(s), {} points at level {}",
                    event.kind,
                    event.lines_cleared,
                    event.line_clear_score,
                    event.level
                );
            }
            store.sync(&mut game);
        }
    }

    store.sync(&mut game);
    log::info!(
        "quit: {} points, level {}, {} lines",
        game.points(),
        game.level(),
        game.lines()
    );
    Ok(())
}
