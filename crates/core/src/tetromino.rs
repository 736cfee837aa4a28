//! Tetromino module - the piece entity
//!
//! A [`Tetromino`] is a value: every transformation returns a new piece and leaves
//! the receiver untouched, so callers can test a candidate position against the
//! board before committing to it.

use crate::board::Board;
use crate::coord::Coord;
use crate::pieces::get_shape;
use crate::types::{PieceKind, BOARD_COLUMNS, BOARD_ROWS, STORAGE_ROWS};

/// A piece of a given kind, either in origin-relative form or plotted on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    /// Cell positions. Relative to the origin until [`Tetromino::plot`] runs.
    pub cells: [Coord; 4],
    /// Clockwise quarter turns applied so far, modulo 4
    pub rotation_stage: u8,
    pub plotted: bool,
}

impl Tetromino {
    /// Origin-relative piece in its spawn orientation.
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            cells: get_shape(kind).cells,
            rotation_stage: 0,
            plotted: false,
        }
    }

    /// Piece translated to its spawn position (top row of the visible matrix).
    pub fn spawn(kind: PieceKind) -> Self {
        let mut piece = Self::new(kind);
        piece.plot();
        piece
    }

    /// Translate origin-relative cells to the spawn position.
    ///
    /// Plotting twice would move the piece off its spawn point, so a second call is
    /// ignored.
    pub fn plot(&mut self) {
        if self.plotted {
            log::warn!("tetromino {:?} plotted twice", self.kind);
            return;
        }
        let origin = Coord::new(get_shape(self.kind).start_x, BOARD_ROWS - 1);
        for cell in &mut self.cells {
            *cell += origin;
        }
        self.plotted = true;
    }

    /// Copy of this piece translated by `offset`.
    pub fn moved(&self, offset: Coord) -> Self {
        let mut piece = *self;
        for cell in &mut piece.cells {
            *cell += offset;
        }
        piece
    }

    /// The pivot cell rotation is computed around
    pub fn pivot(&self) -> Coord {
        self.cells[get_shape(self.kind).pivot]
    }

    /// Copy of this piece rotated 90° clockwise around its pivot, without kicks.
    pub fn rotated(&self) -> Self {
        let pivot = self.pivot();
        let mut piece = *self;
        for cell in &mut piece.cells {
            *cell = pivot + (*cell - pivot).rotate_cw();
        }
        piece.rotation_stage = (self.rotation_stage + 1) % 4;
        piece
    }

    /// True if the piece shifted by `offset` would leave the matrix or overlap a
    /// locked cell. Cells above the stored rows count as empty.
    pub fn is_at_bound(&self, board: &Board, offset: Coord) -> bool {
        self.cells.iter().any(|&cell| {
            let c = cell + offset;
            c.x < 0 || c.x >= BOARD_COLUMNS || c.y < 0 || board.is_occupied(c)
        })
    }

    /// True if the piece overlaps the walls, floor or stack where it is.
    pub fn collides(&self, board: &Board) -> bool {
        self.is_at_bound(board, Coord::ZERO)
    }

    /// True if the piece cannot move one row down.
    pub fn is_grounded(&self, board: &Board) -> bool {
        self.is_at_bound(board, Coord::y(-1))
    }

    /// Copy of this piece at its resting position.
    ///
    /// A colliding piece is pushed upward until it is free instead. Both searches are
    /// bounded by the storage height.
    pub fn move_to_drop_point(&self, board: &Board) -> Self {
        let mut piece = *self;

        if piece.collides(board) {
            for _ in 0..STORAGE_ROWS {
                if !piece.collides(board) {
                    break;
                }
                piece = piece.moved(Coord::y(1));
            }
            return piece;
        }

        for _ in 0..STORAGE_ROWS {
            if piece.is_grounded(board) {
                break;
            }
            piece = piece.moved(Coord::y(-1));
        }
        piece
    }

    /// Rows between this piece and its resting position.
    pub fn drop_distance(&self, board: &Board) -> u32 {
        let dropped = self.move_to_drop_point(board);
        (self.cells[0].y - dropped.cells[0].y).max(0) as u32
    }

    /// Displacement from `other` to `self`, when both share kind and orientation.
    pub fn difference(&self, other: &Tetromino) -> Option<Coord> {
        if self.kind != other.kind || self.rotation_stage != other.rotation_stage {
            return None;
        }
        Some(self.cells[0] - other.cells[0])
    }

    /// Lowest row any cell occupies
    pub fn lowest_y(&self) -> i8 {
        self.cells.iter().map(|c| c.y).min().unwrap_or(0)
    }

    /// Highest row any cell occupies
    pub fn highest_y(&self) -> i8 {
        self.cells.iter().map(|c| c.y).max().unwrap_or(0)
    }
}
