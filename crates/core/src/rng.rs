//! RNG module - bag randomizer for upcoming pieces
//!
//! The queue keeps a working list of two shuffled copies of the seven piece kinds.
//! Drawing removes the front entry; whenever the list shrinks to exactly one copy's
//! length a fresh shuffled copy is appended. Every aligned group of seven draws
//! therefore contains each kind once, and the preview always has at least seven
//! entries to show.
//!
//! Also provides a simple LCG so a seed reproduces a whole game.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Pieces per bag
pub const BAG_SIZE: usize = PieceKind::ALL.len();

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state is a fixed point of the multiplier-only part.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Upcoming-piece queue
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Working list: between one and two bags
    pieces: ArrayVec<PieceKind, { BAG_SIZE * 2 }>,
    rng: SimpleRng,
    seed: u32,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            pieces: ArrayVec::new(),
            rng: SimpleRng::new(seed),
            seed,
        };
        queue.reset();
        queue
    }

    /// Shuffled copy of the canonical kind list. The source list is never touched.
    fn shuffled_bag(&mut self) -> [PieceKind; BAG_SIZE] {
        let mut scratch = PieceKind::ALL;
        self.rng.shuffle(&mut scratch);
        scratch
    }

    fn push_bag(&mut self) {
        let bag = self.shuffled_bag();
        self.pieces.extend(bag);
    }

    /// Replace the working list with two new bags.
    ///
    /// The RNG stream continues, so a restart yields a different order than the
    /// previous game while staying reproducible from the seed.
    pub fn reset(&mut self) {
        self.pieces.clear();
        self.push_bag();
        self.push_bag();
    }

    /// Remove and return the front piece
    pub fn next(&mut self) -> PieceKind {
        let kind = match self.pieces.pop_at(0) {
            Some(kind) => kind,
            None => {
                self.reset();
                return self.next();
            }
        };
        if self.pieces.len() == BAG_SIZE {
            self.push_bag();
        }
        kind
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> Option<PieceKind> {
        self.pieces.first().copied()
    }

    /// The next `n` pieces in draw order (fewer if `n` exceeds the working list).
    pub fn preview(&self, n: usize) -> &[PieceKind] {
        &self.pieces[..n.min(self.pieces.len())]
    }

    /// Pieces currently in the working list
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Seed the queue was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}
