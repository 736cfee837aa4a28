//! Board module - locked cells of the playfield
//!
//! The board is 10 columns wide and stores 24 rows: the 20 visible rows plus 4
//! hidden rows above them, so a piece nudged up at spawn can still lock.
//! Uses a flat array for cache locality and zero allocation.
//!
//! Coordinates are y-up (`y = 0` is the floor); storage is row-major from the top,
//! see [`Coord::to_index`].

use arrayvec::ArrayVec;

use crate::coord::{Coord, STORAGE};
use crate::tetromino::Tetromino;
use crate::types::{Cell, PieceKind, BOARD_COLUMNS, BOARD_ROWS, STORAGE_ROWS};

/// Total number of stored cells
const BOARD_SIZE: usize = STORAGE.area();

/// Rows found full after a lock, bottom to top
pub type FullRows = ArrayVec<i8, { STORAGE_ROWS as usize }>;

/// Locked cells, visible matrix plus hidden rows
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(coord: Coord) -> Option<usize> {
        coord.to_index(STORAGE)
    }

    /// Index range of row `y` in the flat array
    #[inline(always)]
    fn row_range(y: i8) -> std::ops::Range<usize> {
        let start = Coord::new(0, y).row(STORAGE_ROWS) as usize * BOARD_COLUMNS as usize;
        start..start + BOARD_COLUMNS as usize
    }

    /// Get cell at `coord`. Returns None if out of storage.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        Self::index(coord).map(|idx| self.cells[idx])
    }

    /// Set cell at `coord`. Returns false if out of storage.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        match Self::index(coord) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within storage and filled)
    pub fn is_occupied(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Some(_)))
    }

    /// Number of filled cells in row `y`
    pub fn row_count(&self, y: i8) -> usize {
        if !(0..STORAGE_ROWS).contains(&y) {
            return 0;
        }
        self.cells[Self::row_range(y)]
            .iter()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i8) -> bool {
        self.row_count(y) == BOARD_COLUMNS as usize
    }

    /// Every full row, bottom to top.
    pub fn full_rows(&self) -> FullRows {
        (0..STORAGE_ROWS).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Merge a piece into the board.
    ///
    /// Returns false, leaving the board untouched, if any cell is outside the walls
    /// or already filled. Cells above the stored rows are discarded.
    pub fn lock_piece(&mut self, piece: &Tetromino) -> bool {
        for &cell in &piece.cells {
            if cell.x < 0 || cell.x >= BOARD_COLUMNS || cell.y < 0 || self.is_occupied(cell) {
                return false;
            }
        }

        for &cell in &piece.cells {
            if !self.set(cell, Some(piece.kind)) {
                log::warn!("discarding {:?} cell above storage at {:?}", piece.kind, cell);
            }
        }

        true
    }

    /// Empty the given columns of each row in `rows` (one peel frame).
    pub fn clear_cells(&mut self, rows: &[i8], columns: &[i8]) {
        for &y in rows {
            for &x in columns {
                self.set(Coord::new(x, y), None);
            }
        }
    }

    /// Remove `rows` and drop everything above them.
    ///
    /// Uses a two-pointer pass from the floor up with zero allocation; rows above
    /// the last survivor are emptied.
    pub fn collapse_rows(&mut self, rows: &[i8]) {
        if rows.is_empty() {
            return;
        }

        let mut write_y: i8 = 0;
        for read_y in 0..STORAGE_ROWS {
            if rows.contains(&read_y) {
                continue;
            }
            if write_y != read_y {
                let src = Self::row_range(read_y);
                self.cells.copy_within(src, Self::row_range(write_y).start);
            }
            write_y += 1;
        }

        for y in write_y..STORAGE_ROWS {
            for cell in &mut self.cells[Self::row_range(y)] {
                *cell = None;
            }
        }
    }

    /// Filled cells with their positions, top row first.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, PieceKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|kind| (Coord::from_index(idx, STORAGE), kind)))
    }

    /// True if any locked cell sits in the hidden rows.
    pub fn has_hidden_cells(&self) -> bool {
        (BOARD_ROWS..STORAGE_ROWS).any(|y| self.row_count(y) > 0)
    }

    /// Visible matrix as piece codes (0 = empty), row 0 at the top.
    pub fn write_visible(&self, out: &mut [[u8; BOARD_COLUMNS as usize]; BOARD_ROWS as usize]) {
        for (row, out_row) in out.iter_mut().enumerate() {
            let y = BOARD_ROWS - 1 - row as i8;
            for (x, out_cell) in out_row.iter_mut().enumerate() {
                *out_cell = self
                    .get(Coord::new(x as i8, y))
                    .flatten()
                    .map_or(0, |kind| kind.code());
            }
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    /// Build a board from text rows, top row first, bottom row last.
    ///
    /// `.` is empty, any piece letter fills the cell. Rows shorter than the board are
    /// padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let bottom = rows.len() as i8 - 1;
        for (i, row) in rows.iter().enumerate() {
            let y = bottom - i as i8;
            for (x, ch) in row.chars().enumerate() {
                let kind = PieceKind::from_str(&ch.to_string());
                board.set(Coord::new(x as i8, y), kind);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
