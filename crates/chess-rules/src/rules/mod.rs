//! The rule engine.
//!
//! [`RuleEngine`] borrows a [`Board`] and a [`MoveLog`] for the duration of a
//! query and keeps no state of its own. Legality answers are plain booleans;
//! a rejected move is the normal outcome of a query, not an error.
//!
//! # Recursion rule
//!
//! `is_legal` runs a king-safety probe that calls [`is_attacked`]. Attack
//! detection and the per-kind movement rules only ever see `&Board`, so they
//! cannot reach `is_legal` again.

mod attacks;
mod checkmate;
mod moves;
mod probe;

pub use attacks::{attacks, checkers, is_attacked};
pub(crate) use moves::en_passant_victim;

use crate::{Board, MoveLog, Role};
use chess_core::{Color, PieceKind, Square};
use probe::Probe;

/// Legality, check and checkmate queries over one board and its move log.
///
/// # Example
///
/// ```
/// use chess_rules::{Board, MoveLog, RuleEngine};
/// use chess_core::Square;
///
/// let mut board = Board::standard();
/// let log = MoveLog::new();
/// let mut engine = RuleEngine::new(&mut board, &log);
///
/// let e2 = Square::from_algebraic("e2").unwrap();
/// let e4 = Square::from_algebraic("e4").unwrap();
/// assert!(engine.is_legal(e2, e4));
/// assert!(!engine.is_legal(e4, e2));
/// ```
pub struct RuleEngine<'a> {
    board: &'a mut Board,
    log: &'a MoveLog,
}

impl<'a> RuleEngine<'a> {
    pub fn new(board: &'a mut Board, log: &'a MoveLog) -> Self {
        RuleEngine { board, log }
    }

    /// Read access to the board being judged.
    pub fn board(&self) -> &Board {
        &*self.board
    }

    /// Returns true if the piece on `from` may move to `to`.
    ///
    /// Checks run in order: distinct squares and a piece to move; destination
    /// not holding a friendly piece (or any king); the move must not leave the
    /// mover's own king attacked; finally the movement rule of the piece's kind.
    /// The board is identical before and after the call.
    pub fn is_legal(&mut self, from: Square, to: Square) -> bool {
        if from == to {
            return false;
        }
        let Some(piece) = self.board.piece_at(from).copied() else {
            return false;
        };
        if let Some(target) = self.board.piece_at(to) {
            if target.color() == piece.color() || target.kind() == PieceKind::King {
                return false;
            }
        }

        if self.exposes_king(from, to, piece.color()) {
            tracing::trace!(%from, %to, "rejected: leaves own king attacked");
            return false;
        }

        let board: &Board = &*self.board;
        match piece.role() {
            Role::Pawn { .. } => moves::pawn(board, self.log, from, to, &piece),
            Role::Knight => moves::knight(from, to),
            Role::Bishop => moves::diagonal(board, from, to),
            Role::Rook { .. } => moves::straight(board, from, to),
            Role::Queen => moves::diagonal(board, from, to) || moves::straight(board, from, to),
            Role::King { .. } => moves::king(board, from, to, &piece),
        }
    }

    /// True if any piece not of `color` attacks `square`.
    pub fn is_attacked(&self, square: Square, color: Color) -> bool {
        attacks::is_attacked(&*self.board, square, color)
    }

    /// Squares of the pieces checking the king of `color` (at most two).
    pub fn checkers(&self, color: Color) -> Vec<Square> {
        attacks::checkers(&*self.board, color)
    }

    /// King-safety probe: plays `from -> to` on the board for the duration of
    /// one attack test against the mover's king.
    fn exposes_king(&mut self, from: Square, to: Square, color: Color) -> bool {
        let victim = moves::en_passant_victim(self.board, from, to);
        let probe = Probe::new(self.board, from, to, victim);
        let king_sq = probe.king_square(color);
        attacks::is_attacked(&probe, king_sq, color)
    }
}
