//! Scoped "what if" board edits.

use crate::{Board, Piece};
use chess_core::Square;
use std::ops::Deref;

/// A tentative move applied to the board for the lifetime of the guard.
///
/// On creation the mover is lifted from `from`, whatever stands on `to` (and
/// an optional en passant victim) is set aside, and the mover is written to
/// `to`. Dropping the guard puts every cell back exactly as it was, on every
/// exit path. While the guard lives the board is only reachable through it,
/// read-only.
pub(crate) struct Probe<'a> {
    board: &'a mut Board,
    from: Square,
    to: Square,
    mover: Option<Piece>,
    displaced: Option<Piece>,
    victim: Option<(Square, Piece)>,
}

impl<'a> Probe<'a> {
    pub(crate) fn new(
        board: &'a mut Board,
        from: Square,
        to: Square,
        en_passant_victim: Option<Square>,
    ) -> Self {
        let mover = board.take(from);
        let displaced = board.take(to);
        let victim = en_passant_victim.and_then(|sq| board.take(sq).map(|piece| (sq, piece)));
        board.place(to, mover);

        Probe {
            board,
            from,
            to,
            mover,
            displaced,
            victim,
        }
    }
}

impl Deref for Probe<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        self.board.place(self.to, self.displaced);
        self.board.place(self.from, self.mover);
        if let Some((sq, piece)) = self.victim {
            self.board.place(sq, Some(piece));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn probe_applies_and_restores() {
        let mut board = Board::standard();
        let snapshot = board.clone();
        {
            let probe = Probe::new(&mut board, sq("d1"), sq("d7"), None);
            assert!(probe.is_empty(sq("d1")));
            assert_eq!(probe.piece_at(sq("d7")).unwrap().symbol(), 'Q');
        }
        assert_eq!(board, snapshot);
    }

    #[test]
    fn probe_restores_en_passant_victim() {
        let mut board = Board::standard();
        let black_pawn = board.take(sq("d7")).unwrap();
        board.place(sq("d5"), Some(black_pawn));
        let white_pawn = board.take(sq("e2")).unwrap();
        board.place(sq("e5"), Some(white_pawn));
        let snapshot = board.clone();
        {
            let probe = Probe::new(&mut board, sq("e5"), sq("d6"), Some(sq("d5")));
            assert!(probe.is_empty(sq("d5")));
            assert!(probe.is_empty(sq("e5")));
            assert_eq!(probe.piece_at(sq("d6")), Some(&white_pawn));
        }
        assert_eq!(board, snapshot);
    }

    #[test]
    fn probe_from_empty_square_is_harmless() {
        let mut board = Board::standard();
        let snapshot = board.clone();
        drop(Probe::new(&mut board, sq("e4"), sq("e5"), None));
        assert_eq!(board, snapshot);
    }
}
