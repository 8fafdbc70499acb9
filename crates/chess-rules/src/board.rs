//! Board state: the 8x8 grid, king identities and the piece in hand.

use crate::piece::{Piece, PieceId, Role};
use chess_core::{Color, PieceKind, Square};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors that can occur when building a board from placements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("square {0} is given more than one piece")]
    Occupied(Square),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    ExtraKing(Color),
}

/// One piece to put on an otherwise empty board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub square: Square,
    pub color: Color,
    pub kind: PieceKind,
    pub moved: bool,
}

impl Placement {
    /// An unmoved piece on `square`.
    pub const fn new(square: Square, color: Color, kind: PieceKind) -> Self {
        Placement {
            square,
            color,
            kind,
            moved: false,
        }
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Authoritative game board.
///
/// Cells hold pieces by value; empty cells are `None`. Each color has exactly
/// one king whose identity is kept for O(1) lookup. The grid is the only
/// record of where a piece stands.
///
/// Equality compares the position (cells, kings and the piece in hand) and
/// ignores the identity allocator, so undoing a promotion restores an equal
/// board.
#[derive(Debug, Clone, Eq)]
pub struct Board {
    /// Indexed `[file][rank]`.
    cells: [[Option<Piece>; 8]; 8],
    kings: [PieceId; 2],
    in_hand: Option<PieceId>,
    next_id: u16,
}

impl Board {
    /// Placements of the standard starting position.
    pub fn standard_placements() -> Vec<Placement> {
        let mut placements = Vec::with_capacity(32);
        for (file, kind) in (0u8..).zip(BACK_RANK) {
            for color in Color::ALL {
                let back = color.back_rank();
                let pawns = (back as i8 + color.pawn_direction()) as u8;
                placements.push(Placement::new(square(file, back), color, kind));
                placements.push(Placement::new(square(file, pawns), color, PieceKind::Pawn));
            }
        }
        placements
    }

    /// Creates the standard starting position.
    pub fn standard() -> Self {
        Self::from_placements(&Self::standard_placements()).expect("standard layout is valid")
    }

    /// Builds a board holding exactly the given pieces.
    pub fn from_placements(placements: &[Placement]) -> Result<Self, SetupError> {
        let mut cells = [[None; 8]; 8];
        let mut kings: [Option<PieceId>; 2] = [None, None];
        let mut seen = HashSet::with_capacity(placements.len());
        let mut next_id = 0u16;

        for placement in placements {
            if !seen.insert(placement.square) {
                return Err(SetupError::Occupied(placement.square));
            }

            let id = PieceId(next_id);
            next_id += 1;

            let mut piece = Piece::new(id, placement.color, Role::fresh(placement.kind));
            piece.set_moved(placement.moved);

            if placement.kind == PieceKind::King {
                let slot = &mut kings[placement.color.index()];
                if slot.is_some() {
                    return Err(SetupError::ExtraKing(placement.color));
                }
                *slot = Some(id);
            }

            cells[placement.square.file() as usize][placement.square.rank() as usize] = Some(piece);
        }

        let white = kings[0].ok_or(SetupError::MissingKing(Color::White))?;
        let black = kings[1].ok_or(SetupError::MissingKing(Color::Black))?;

        Ok(Board {
            cells,
            kings: [white, black],
            in_hand: None,
            next_id,
        })
    }

    /// Throws the current game away and sets up the starting position again.
    pub fn reset(&mut self) {
        *self = Board::standard();
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.cells[sq.file() as usize][sq.rank() as usize].as_ref()
    }

    /// Mutable access to the piece on the given square.
    #[inline]
    pub fn piece_at_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.cells[sq.file() as usize][sq.rank() as usize].as_mut()
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    /// Overwrites a cell. No legality checks are made.
    #[inline]
    pub fn place(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.file() as usize][sq.rank() as usize] = piece;
    }

    /// Empties a cell, returning what stood there.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.file() as usize][sq.rank() as usize].take()
    }

    /// Clears `from` and writes `piece` to `to`.
    ///
    /// Captures, en passant removal and the rook half of castling are the
    /// caller's business.
    pub fn move_piece(&mut self, from: Square, to: Square, piece: Piece) {
        self.place(from, None);
        self.place(to, Some(piece));
    }

    /// Finds the square a piece stands on by scanning the grid.
    pub fn coordinates_of(&self, id: PieceId) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.id() == id)
            .map(|(sq, _)| sq)
    }

    /// Iterates over occupied squares, file by file.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Squares of every piece of the given color.
    pub fn squares_of(&self, color: Color) -> Vec<Square> {
        self.pieces()
            .filter(|(_, piece)| piece.color() == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Identity of the king of `color`.
    #[inline]
    pub fn king_of(&self, color: Color) -> PieceId {
        self.kings[color.index()]
    }

    /// Identity of the king of the other color.
    #[inline]
    pub fn king_of_opponent(&self, color: Color) -> PieceId {
        self.kings[color.opposite().index()]
    }

    /// Square of the king of `color`.
    ///
    /// # Panics
    ///
    /// Panics if the king is not on the board, which no legal sequence of
    /// moves can cause.
    pub fn king_square(&self, color: Color) -> Square {
        self.coordinates_of(self.king_of(color))
            .unwrap_or_else(|| panic!("board invariant broken: {} king is missing", color))
    }

    /// The king of `color` as it currently stands.
    pub fn king(&self, color: Color) -> &Piece {
        let sq = self.king_square(color);
        self.piece_at(sq)
            .expect("king square was just located on the grid")
    }

    /// Shade of a cell.
    #[inline]
    pub fn cell_color(&self, sq: Square) -> Color {
        sq.cell_color()
    }

    /// Allocates a new, unplaced piece (used for promotions).
    pub fn create(&mut self, color: Color, kind: PieceKind) -> Piece {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        let mut piece = Piece::new(id, color, Role::fresh(kind));
        piece.set_moved(true);
        piece
    }

    /// Selects the piece on `sq` as the piece in hand.
    pub fn pick_up(&mut self, sq: Square) -> Option<PieceId> {
        self.in_hand = self.piece_at(sq).map(|piece| piece.id());
        self.in_hand
    }

    /// The selected piece, provided it is still on the board.
    pub fn in_hand(&self) -> Option<PieceId> {
        self.in_hand
            .filter(|&id| self.coordinates_of(id).is_some())
    }

    /// Clears the selection.
    pub fn release(&mut self) {
        self.in_hand = None;
    }

    /// Piece placement in FEN order (rank 8 first), e.g. `rnbqkbnr/pppppppp/8/...`.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);

        for rank in (0..8u8).rev() {
            let mut empty_count = 0;
            for file in 0..8u8 {
                match self.piece_at(square(file, rank)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            out.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        out.push(piece.symbol());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                out.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells && self.kings == other.kings && self.in_hand == other.in_hand
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let symbol = self.piece_at(square(file, rank)).map_or('.', Piece::symbol);
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

fn square(file: u8, rank: u8) -> Square {
    Square::new(file, rank).expect("loop bounds stay on the board")
}
