//! Coordinate module - integer grid positions
//!
//! Coordinates are measured from the bottom-left corner of a matrix: `x` grows to
//! the right, `y` grows *upward* from the floor. Flat indices (used for row-major
//! storage and rendering) count from the top-left instead, so row 0 of an index is
//! the highest row of the matrix.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::types::{BOARD_COLUMNS, BOARD_ROWS, QUEUE_COLUMNS, QUEUE_ROWS, STORAGE_ROWS};

/// Size of a matrix in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub rows: i8,
    pub columns: i8,
}

impl Dimensions {
    pub const fn new(rows: i8, columns: i8) -> Self {
        Self { rows, columns }
    }

    /// Number of cells in the matrix
    pub const fn area(&self) -> usize {
        (self.rows as usize) * (self.columns as usize)
    }

    /// True if `coord` lies inside the matrix.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.columns && coord.y >= 0 && coord.y < self.rows
    }
}

/// The visible playfield.
pub const MATRIX: Dimensions = Dimensions::new(BOARD_ROWS, BOARD_COLUMNS);

/// The playfield including the hidden rows above it.
pub const STORAGE: Dimensions = Dimensions::new(STORAGE_ROWS, BOARD_COLUMNS);

/// The upcoming-piece preview matrix.
pub const QUEUE_MATRIX: Dimensions = Dimensions::new(QUEUE_ROWS, QUEUE_COLUMNS);

/// A cell position (or an offset between two positions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub x: i8,
    pub y: i8,
}

impl Coord {
    pub const ZERO: Coord = Coord::new(0, 0);

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Pure horizontal offset
    pub const fn x(x: i8) -> Self {
        Self { x, y: 0 }
    }

    /// Pure vertical offset
    pub const fn y(y: i8) -> Self {
        Self { x: 0, y }
    }

    /// Sum of any number of offsets.
    ///
    /// ```
    /// use blockfall_core::Coord;
    ///
    /// let total = Coord::sum([Coord::x(2), Coord::y(-1), Coord::new(1, 1)]);
    /// assert_eq!(total, Coord::new(3, 0));
    /// ```
    pub fn sum(offsets: impl IntoIterator<Item = Coord>) -> Coord {
        offsets.into_iter().fold(Coord::ZERO, |acc, c| acc + c)
    }

    /// Rotate 90° clockwise around the origin.
    ///
    /// cos(90°) = 0 and sin(90°) = 1, so this is exact: `x' = y, y' = -x`.
    pub const fn rotate_cw(self) -> Self {
        Self {
            x: self.y,
            y: -self.x,
        }
    }

    /// True if this coordinate appears in `coords`.
    pub fn is_in(&self, coords: &[Coord]) -> bool {
        coords.iter().any(|c| c == self)
    }

    /// Row number counted from the top of a matrix with `rows` rows.
    pub fn row(&self, rows: i8) -> i8 {
        rows - 1 - self.y
    }

    /// Flat row-major index (top-left is 0), or `None` outside the matrix.
    pub fn to_index(&self, dims: Dimensions) -> Option<usize> {
        if !dims.contains(*self) {
            return None;
        }
        Some((self.row(dims.rows) as usize) * (dims.columns as usize) + (self.x as usize))
    }

    /// Inverse of [`Coord::to_index`].
    pub fn from_index(index: usize, dims: Dimensions) -> Self {
        let columns = dims.columns as usize;
        Self {
            x: (index % columns) as i8,
            y: dims.rows - 1 - (index / columns) as i8,
        }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Coord {
    fn sub_assign(&mut self, rhs: Coord) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

impl From<(i8, i8)> for Coord {
    fn from((x, y): (i8, i8)) -> Self {
        Coord::new(x, y)
    }
}
