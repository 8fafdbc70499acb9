//! Board square representation.

use crate::Color;
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing a square from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid square: {0:?}")]
pub struct ParseSquareError(pub String);

/// A square on the board as a `(file, rank)` pair, both in `0..8`.
///
/// File 0 is the a-file and rank 0 is White's back rank, so `e1` is `(4, 0)`.
/// A `Square` is always on the board; out-of-range coordinates are rejected
/// at construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Creates a square, returning `None` when either coordinate is off the board.
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    /// Creates a square from signed coordinates, as produced by offset arithmetic.
    #[inline]
    pub const fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if file < 0 || rank < 0 {
            return None;
        }
        Self::new(file as u8, rank as u8)
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Square {
            file: file - b'a',
            rank: rank - b'1',
        })
    }

    /// Returns the file index (0 = a).
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Returns the rank index (0 = first rank).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Returns the square shifted by the given file and rank deltas, if still on the board.
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        Self::from_coords(self.file as i8 + file_delta, self.rank as i8 + rank_delta)
    }

    /// Signed `(file, rank)` delta needed to travel from `self` to `to`.
    #[inline]
    pub const fn delta(self, to: Square) -> (i8, i8) {
        (
            to.file as i8 - self.file as i8,
            to.rank as i8 - self.rank as i8,
        )
    }

    /// Shade of the cell; a1 is dark.
    #[inline]
    pub const fn cell_color(self) -> Color {
        if (self.file + self.rank) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Returns the squares strictly between `self` and `to`, walking from `self`.
    ///
    /// Empty unless the two squares share a file, a rank or a diagonal.
    pub fn between(self, to: Square) -> Vec<Square> {
        let (df, dr) = self.delta(to);
        let aligned = df == 0 || dr == 0 || df.abs() == dr.abs();
        if !aligned || self == to {
            return Vec::new();
        }

        let (step_f, step_r) = (df.signum(), dr.signum());
        let mut squares = Vec::new();
        let mut current = self.offset(step_f, step_r);
        while let Some(sq) = current {
            if sq == to {
                break;
            }
            squares.push(sq);
            current = sq.offset(step_f, step_r);
        }
        squares
    }

    /// Iterates over all 64 squares, file by file.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|file| (0..8u8).map(move |rank| Square { file, rank }))
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }

    pub const A1: Square = Square { file: 0, rank: 0 };
    pub const B1: Square = Square { file: 1, rank: 0 };
    pub const C1: Square = Square { file: 2, rank: 0 };
    pub const D1: Square = Square { file: 3, rank: 0 };
    pub const E1: Square = Square { file: 4, rank: 0 };
    pub const F1: Square = Square { file: 5, rank: 0 };
    pub const G1: Square = Square { file: 6, rank: 0 };
    pub const H1: Square = Square { file: 7, rank: 0 };
    pub const A8: Square = Square { file: 0, rank: 7 };
    pub const B8: Square = Square { file: 1, rank: 7 };
    pub const C8: Square = Square { file: 2, rank: 7 };
    pub const D8: Square = Square { file: 3, rank: 7 };
    pub const E8: Square = Square { file: 4, rank: 7 };
    pub const F8: Square = Square { file: 5, rank: 7 };
    pub const G8: Square = Square { file: 6, rank: 7 };
    pub const H8: Square = Square { file: 7, rank: 7 };
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ParseSquareError(s.to_string()))
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
