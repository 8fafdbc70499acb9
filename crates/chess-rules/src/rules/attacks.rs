//! Attack detection.
//!
//! Attacks use capture shapes, which differ from movement for pawns: a pawn
//! threatens the two squares diagonally ahead of it and never the square in
//! front. These functions only read the board; they must never call back into
//! [`RuleEngine::is_legal`](super::RuleEngine::is_legal), whose king-safety
//! probe is itself built on [`is_attacked`].

use super::moves::{diagonal, knight, straight};
use crate::{Board, Piece};
use chess_core::{Color, PieceKind, Square};

/// Most checkers worth collecting; two already rule out any single answering move.
const MAX_CHECKERS: usize = 2;

/// True if `piece`, standing on `from`, attacks `target`.
pub fn attacks(board: &Board, piece: &Piece, from: Square, target: Square) -> bool {
    if from == target {
        return false;
    }
    let (df, dr) = from.delta(target);
    match piece.kind() {
        PieceKind::Pawn => dr == piece.color().pawn_direction() && df.abs() == 1,
        PieceKind::Knight => knight(from, target),
        PieceKind::Bishop => diagonal(board, from, target),
        PieceKind::Rook => straight(board, from, target),
        PieceKind::Queen => diagonal(board, from, target) || straight(board, from, target),
        PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
    }
}

/// True if any piece not of `color` attacks `square`.
pub fn is_attacked(board: &Board, square: Square, color: Color) -> bool {
    board
        .pieces()
        .any(|(from, piece)| piece.color() != color && attacks(board, piece, from, square))
}

/// Squares of the enemy pieces giving check to the king of `color`, at most two.
pub fn checkers(board: &Board, color: Color) -> Vec<Square> {
    let king_sq = board.king_square(color);
    board
        .pieces()
        .filter(|(_, piece)| piece.color() != color && piece.kind() != PieceKind::King)
        .filter(|(from, piece)| attacks(board, piece, *from, king_sq))
        .map(|(from, _)| from)
        .take(MAX_CHECKERS)
        .collect()
}
