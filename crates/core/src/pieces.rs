//! Pieces module - tetromino catalog and wall-kick rotation
//!
//! Shapes are stored as four offsets relative to the piece origin, with the top row
//! at `y = 0` and the lower row at `y = -1`. Rotation happens around one of the four
//! cells (the pivot), which is not always the geometric centre; the kick tables carry
//! the correction for I and O.
//!
//! Kick tables follow the "offset" formulation of the Super Rotation System: each
//! rotation stage has a list of offsets, and the translation tested for kick `i` when
//! rotating from stage `s` to `s + 1` is `table[s][i] - table[s + 1][i]`.
//! Reference: https://tetris.wiki/Super_Rotation_System

use crate::board::Board;
use crate::coord::Coord;
use crate::tetromino::Tetromino;
use crate::types::PieceKind;

/// Static description of a piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    /// Origin-relative cell offsets
    pub cells: [Coord; 4],
    /// Horizontal spawn offset
    pub start_x: i8,
    /// Index into `cells` of the cell rotation is computed around
    pub pivot: usize,
}

const fn shape(cells: [(i8, i8); 4], start_x: i8, pivot: usize) -> PieceShape {
    PieceShape {
        cells: [
            Coord::new(cells[0].0, cells[0].1),
            Coord::new(cells[1].0, cells[1].1),
            Coord::new(cells[2].0, cells[2].1),
            Coord::new(cells[3].0, cells[3].1),
        ],
        start_x,
        pivot,
    }
}

const I_SHAPE: PieceShape = shape([(0, 0), (1, 0), (2, 0), (3, 0)], 3, 1);
const J_SHAPE: PieceShape = shape([(0, 0), (0, -1), (1, -1), (2, -1)], 3, 2);
const L_SHAPE: PieceShape = shape([(2, 0), (0, -1), (1, -1), (2, -1)], 3, 2);
const O_SHAPE: PieceShape = shape([(0, 0), (1, 0), (0, -1), (1, -1)], 4, 2);
const S_SHAPE: PieceShape = shape([(1, 0), (2, 0), (0, -1), (1, -1)], 3, 3);
const T_SHAPE: PieceShape = shape([(1, 0), (0, -1), (1, -1), (2, -1)], 3, 2);
const Z_SHAPE: PieceShape = shape([(0, 0), (1, 0), (1, -1), (2, -1)], 3, 2);

/// Get the catalog entry for a piece kind
pub fn get_shape(kind: PieceKind) -> &'static PieceShape {
    match kind {
        PieceKind::I => &I_SHAPE,
        PieceKind::J => &J_SHAPE,
        PieceKind::L => &L_SHAPE,
        PieceKind::O => &O_SHAPE,
        PieceKind::S => &S_SHAPE,
        PieceKind::T => &T_SHAPE,
        PieceKind::Z => &Z_SHAPE,
    }
}

/// Per-stage kick offsets for one group of piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KickTable {
    stages: [&'static [Coord]; 4],
}

impl KickTable {
    /// Number of kick candidates per stage (index 0 is the plain rotation)
    pub fn len(&self) -> usize {
        self.stages[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Translation to test for kick `index` when rotating clockwise out of `stage`.
    pub fn offset(&self, stage: u8, index: usize) -> Coord {
        let current = self.stages[(stage % 4) as usize];
        let next = self.stages[((stage + 1) % 4) as usize];
        current[index] - next[index]
    }

    /// Every candidate translation for a clockwise rotation out of `stage`, in priority order.
    pub fn offsets(&self, stage: u8) -> impl Iterator<Item = Coord> + '_ {
        (0..self.len()).map(move |i| self.offset(stage, i))
    }
}

const ZERO_STAGE: [Coord; 5] = [Coord::ZERO; 5];

/// JLSTZ offsets (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = KickTable {
    stages: [
        &ZERO_STAGE,
        &[
            Coord::new(0, 0),
            Coord::new(1, 0),
            Coord::new(1, -1),
            Coord::new(0, 2),
            Coord::new(1, 2),
        ],
        &ZERO_STAGE,
        &[
            Coord::new(0, 0),
            Coord::new(-1, 0),
            Coord::new(-1, -1),
            Coord::new(0, 2),
            Coord::new(-1, 2),
        ],
    ],
};

/// I offsets. Index 0 is non-zero because the pivot is off-centre.
const I_KICKS: KickTable = KickTable {
    stages: [
        &[
            Coord::new(0, 0),
            Coord::new(-1, 0),
            Coord::new(2, 0),
            Coord::new(-1, 0),
            Coord::new(2, 0),
        ],
        &[
            Coord::new(-1, 0),
            Coord::new(0, 0),
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(0, -2),
        ],
        &[
            Coord::new(-1, 1),
            Coord::new(1, 1),
            Coord::new(-2, 1),
            Coord::new(1, 0),
            Coord::new(-2, 0),
        ],
        &[
            Coord::new(0, 1),
            Coord::new(0, 1),
            Coord::new(0, 1),
            Coord::new(0, -1),
            Coord::new(0, 2),
        ],
    ],
};

/// O offsets: a single entry per stage that cancels the pivot drift, so rotating O
/// never changes which cells it covers.
const O_KICKS: KickTable = KickTable {
    stages: [
        &[Coord::new(0, 0)],
        &[Coord::new(0, -1)],
        &[Coord::new(-1, -1)],
        &[Coord::new(-1, 0)],
    ],
};

/// Get kick table for a piece kind
pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::I => &I_KICKS,
        PieceKind::O => &O_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Try to rotate a piece clockwise with wall kicks.
///
/// Returns the rotated (and possibly kicked) piece, or `None` if every candidate
/// collides. A rejected rotation is not an error; the caller keeps the old piece.
pub fn try_rotate(piece: &Tetromino, board: &Board) -> Option<Tetromino> {
    let kicks = get_kick_table(piece.kind);
    let rotated = piece.rotated();

    kicks
        .offsets(piece.rotation_stage)
        .map(|offset| rotated.moved(offset))
        .find(|candidate| !candidate.collides(board))
}
