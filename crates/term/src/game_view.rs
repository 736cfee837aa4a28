//! GameView: draws a [`GameSnapshot`] into a [`FrameBuffer`].
//!
//! Pure, no I/O. Board coordinates are y-up; the snapshot grid and the screen are
//! both top-down, so piece cells go through [`Coord::row`] before drawing.

use crate::core::{get_shape, Coord, GameSnapshot};
use crate::fb::{FrameBuffer, Rgb, Style, BLACK, TEXT};
use crate::types::{
    GameStatus, PieceKind, BOARD_COLUMNS, BOARD_ROWS, PREVIEW_LEN, QUEUE_COLUMNS, QUEUE_ROWS,
    QUEUE_SPACING,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_MIN_WIDTH: u16 = 12;

/// Screen origin (top-left inside the border) of a matrix.
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: u16,
    y: u16,
}

pub struct GameView {
    /// Terminal columns per board cell
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell keeps blocks roughly square.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Outer size of the bordered well.
    pub fn frame_size(&self) -> (u16, u16) {
        (
            BOARD_COLUMNS as u16 * self.cell_w + 2,
            BOARD_ROWS as u16 + 2,
        )
    }

    /// Render into a reused framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Style::default().glyph(' '));

        let (frame_w, frame_h) = self.frame_size();
        let left = viewport.width.saturating_sub(frame_w) / 2;
        let top = viewport.height.saturating_sub(frame_h) / 2;
        let well = Origin {
            x: left + 1,
            y: top + 1,
        };

        fb.draw_box(left, top, frame_w, frame_h, Style::new(Rgb::new(200, 200, 200), BLACK));
        self.draw_well(fb, snap, well);

        if let Some(ghost) = snap.ghost {
            let style = Style::new(Rgb::new(140, 140, 140), WELL_BG).dim();
            for cell in ghost {
                self.draw_matrix_cell(fb, well, BOARD_ROWS, cell, '░', style);
            }
        }
        if let Some(active) = snap.active {
            for cell in active.cells {
                self.draw_matrix_cell(fb, well, BOARD_ROWS, cell, '█', piece_style(active.kind));
            }
        }

        self.draw_side_panel(fb, snap, viewport, left + frame_w + 2, top);

        match snap.status {
            GameStatus::Paused => {
                self.draw_overlay(fb, left, top, &["PAUSED", "P to resume"]);
            }
            GameStatus::GameOver => {
                self.draw_overlay(fb, left, top, &["GAME OVER", "R to restart"]);
            }
            _ => {}
        }
    }

    /// Allocating convenience wrapper around [`render_into`](Self::render_into).
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_well(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, well: Origin) {
        let empty = Style::new(Rgb::new(90, 90, 100), WELL_BG).dim();
        for (row, cells) in snap.board.iter().enumerate() {
            for (col, &code) in cells.iter().enumerate() {
                let (ch, style) = match PieceKind::from_code(code) {
                    Some(kind) => ('█', piece_style(kind)),
                    None => ('·', empty),
                };
                self.fill_cell(fb, well, col as u16, row as u16, ch, style);
            }
        }
    }

    /// Draw a y-up cell of a matrix with `rows` rows; cells above it are skipped.
    fn draw_matrix_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        rows: i8,
        cell: Coord,
        ch: char,
        style: Style,
    ) {
        let row = cell.row(rows);
        if cell.x < 0 || row < 0 || cell.y < 0 {
            return;
        }
        self.fill_cell(fb, origin, cell.x as u16, row as u16, ch, style);
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: Origin,
        col: u16,
        row: u16,
        ch: char,
        style: Style,
    ) {
        fb.fill_rect(origin.x + col * self.cell_w, origin.y + row, self.cell_w, 1, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        x: u16,
        top: u16,
    ) {
        if x.saturating_add(PANEL_MIN_WIDTH) > viewport.width {
            return;
        }

        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), BLACK);

        let mut y = top;
        for (name, number) in [
            ("SCORE", snap.points),
            ("HIGH", snap.high_score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, number, value);
            y += 3;
        }

        fb.put_str(x, y, "NEXT", label);
        y += 1;
        let box_w = QUEUE_COLUMNS as u16 * self.cell_w + 2;
        let box_h = QUEUE_ROWS as u16 + 2;
        fb.draw_box(x, y, box_w, box_h, Style::new(TEXT, BLACK).dim());
        let origin = Origin { x: x + 1, y: y + 1 };
        for (i, &kind) in snap.next_queue.iter().take(PREVIEW_LEN).enumerate() {
            let anchor = Coord::new(0, QUEUE_ROWS - 1 - i as i8 * QUEUE_SPACING);
            for &offset in &get_shape(kind).cells {
                self.draw_matrix_cell(fb, origin, QUEUE_ROWS, anchor + offset, '█', piece_style(kind));
            }
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, left: u16, top: u16, lines: &[&str]) {
        let (frame_w, frame_h) = self.frame_size();
        let style = Style::new(Rgb::new(255, 255, 255), BLACK).bold();
        let mid = top + frame_h / 2;
        for (i, text) in lines.iter().enumerate() {
            let w = text.chars().count() as u16;
            let x = left + frame_w.saturating_sub(w) / 2;
            fb.put_str(x, mid + i as u16, text, style);
        }
    }
}

pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

fn piece_style(kind: PieceKind) -> Style {
    Style::new(piece_color(kind), WELL_BG).bold()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;
    use crate::types::GameAction;

    // 60x24: well border at (19, 1), cells start at (20, 2), panel at x = 43.
    const VIEW: Viewport = Viewport {
        width: 60,
        height: 24,
    };

    fn screen_pos(cell: Coord) -> (u16, u16) {
        (20 + cell.x as u16 * 2, 2 + cell.row(BOARD_ROWS) as u16)
    }

    fn find_row(fb: &FrameBuffer, needle: &str) -> Option<u16> {
        (0..fb.height()).find(|&y| fb.row_text(y).contains(needle))
    }

    #[test]
    fn test_border_and_empty_well() {
        let fb = GameView::default().render(&GameSnapshot::default(), VIEW);
        assert_eq!(fb.get(19, 1).map(|g| g.ch), Some('┌'));
        assert_eq!(fb.get(40, 22).map(|g| g.ch), Some('┘'));
        assert_eq!(fb.get(20, 2).map(|g| g.ch), Some('·'));
    }

    #[test]
    fn test_locked_cells_use_top_down_grid() {
        let mut snap = GameSnapshot::default();
        snap.board[19][0] = PieceKind::Z.code();
        let fb = GameView::default().render(&snap, VIEW);

        let glyph = fb.get(20, 21).unwrap();
        assert_eq!(glyph.ch, '█');
        assert_eq!(glyph.style.fg, piece_color(PieceKind::Z));
        assert_eq!(fb.get(21, 21).map(|g| g.ch), Some('█'));
        assert_eq!(fb.get(22, 21).map(|g| g.ch), Some('·'));
    }

    #[test]
    fn test_active_piece_drawn_over_ghost() {
        let mut game = GameState::new(7);
        game.start();
        let snap = game.snapshot();
        let fb = GameView::default().render(&snap, VIEW);

        let active = snap.active.unwrap();
        for cell in active.cells {
            let (x, y) = screen_pos(cell);
            let glyph = fb.get(x, y).unwrap();
            assert_eq!(glyph.ch, '█');
            assert_eq!(glyph.style.fg, piece_color(active.kind));
        }
        for cell in snap.ghost.unwrap() {
            if active.cells.contains(&cell) {
                continue;
            }
            let (x, y) = screen_pos(cell);
            assert_eq!(fb.get(x, y).map(|g| g.ch), Some('░'));
        }
    }

    #[test]
    fn test_side_panel_shows_numbers() {
        let mut snap = GameSnapshot::default();
        snap.points = 1234;
        snap.high_score = 98765;
        snap.level = 3;
        let fb = GameView::default().render(&snap, VIEW);

        assert_eq!(find_row(&fb, "SCORE"), Some(1));
        assert_eq!(find_row(&fb, "1234"), Some(2));
        assert_eq!(find_row(&fb, "98765"), Some(5));
        assert_eq!(find_row(&fb, "NEXT"), Some(13));
    }

    #[test]
    fn test_queue_preview_draws_three_pieces() {
        let mut snap = GameSnapshot::default();
        snap.next_queue = [PieceKind::I, PieceKind::O, PieceKind::T];
        let fb = GameView::default().render(&snap, VIEW);

        // Queue box interior starts at (44, 15); 8 rows.
        let filled = |x: u16, y: u16| fb.get(x, y).map(|g| g.ch) == Some('█');
        // I on the top row, four cells wide
        assert!((44..52).all(|x| filled(x, 15)));
        // O on queue rows 3 and 4
        assert!(filled(44, 18) && filled(46, 19));
        // T: nub at x=1 on row 6, base on row 7
        assert!(filled(46, 21) && !filled(44, 21));
        assert!((44..50).all(|x| filled(x, 22)));
    }

    #[test]
    fn test_overlays() {
        let mut snap = GameSnapshot::default();
        snap.status = GameStatus::Paused;
        let fb = GameView::default().render(&snap, VIEW);
        assert_eq!(find_row(&fb, "PAUSED"), Some(12));

        snap.status = GameStatus::GameOver;
        let fb = GameView::default().render(&snap, VIEW);
        assert_eq!(find_row(&fb, "GAME OVER"), Some(12));
        assert_eq!(find_row(&fb, "R to restart"), Some(13));
    }

    #[test]
    fn test_pause_from_game_state() {
        let mut game = GameState::new(1);
        game.start();
        assert!(game.apply_action(GameAction::Pause));
        let fb = GameView::default().render(&game.snapshot(), VIEW);
        assert!(find_row(&fb, "PAUSED").is_some());
    }

    #[test]
    fn test_small_viewport_skips_panel() {
        let fb = GameView::default().render(&GameSnapshot::default(), Viewport::new(22, 22));
        assert_eq!(fb.get(0, 0).map(|g| g.ch), Some('┌'));
        assert!(find_row(&fb, "SCORE").is_none());
    }

    #[test]
    fn test_render_into_reuses_buffer() {
        let view = GameView::default();
        let mut fb = FrameBuffer::new(1, 1);
        view.render_into(&GameSnapshot::default(), VIEW, &mut fb);
        assert_eq!((fb.width(), fb.height()), (60, 24));
    }
}
