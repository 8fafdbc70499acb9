use super::{attacks, moves, RuleEngine};
use chess_core::{Color, PieceKind, Square};

impl RuleEngine<'_> {
    /// Returns true if the king of `color` is checkmated.
    ///
    /// Only a king already flagged as in check can be mated. The search goes:
    /// king escapes, then double check (mate if no escape), then capturing the
    /// single checker, then interposing on the line between checker and king.
    /// Knight and pawn checks cannot be blocked.
    pub fn is_checkmate(&mut self, color: Color) -> bool {
        let king_sq = self.board.king_square(color);
        if !self.board.king(color).in_check() {
            return false;
        }
        let checkers = attacks::checkers(self.board, color);
        let Some(&attacker_sq) = checkers.first() else {
            return false;
        };

        if self.king_can_escape(king_sq) {
            tracing::trace!(%color, "not mate: king escape");
            return false;
        }
        if checkers.len() > 1 {
            return true;
        }

        let defenders = self.board.squares_of(color);
        if self.can_capture(&defenders, attacker_sq) {
            tracing::trace!(%color, attacker = %attacker_sq, "not mate: checker can be taken");
            return false;
        }

        let unblockable = self
            .board
            .piece_at(attacker_sq)
            .is_some_and(|piece| matches!(piece.kind(), PieceKind::Knight | PieceKind::Pawn));
        if unblockable {
            return true;
        }

        let blocked = attacker_sq.between(king_sq).into_iter().any(|square| {
            defenders
                .iter()
                .filter(|&&from| from != king_sq)
                .any(|&from| self.is_legal(from, square))
        });
        if blocked {
            tracing::trace!(%color, "not mate: check can be blocked");
        }
        !blocked
    }

    fn king_can_escape(&mut self, king_sq: Square) -> bool {
        let escapes: Vec<Square> = (-1i8..=1)
            .flat_map(|df| (-1i8..=1).map(move |dr| (df, dr)))
            .filter(|&step| step != (0, 0))
            .filter_map(|(df, dr)| king_sq.offset(df, dr))
            .collect();
        escapes.into_iter().any(|to| self.is_legal(king_sq, to))
    }

    /// True if some piece on `defenders` can legally take the piece on `target`,
    /// counting an en passant capture of a pawn that has just double-stepped.
    fn can_capture(&mut self, defenders: &[Square], target: Square) -> bool {
        if defenders.iter().any(|&from| self.is_legal(from, target)) {
            return true;
        }

        let Some(victim) = self.board.piece_at(target).copied() else {
            return false;
        };
        if victim.kind() != PieceKind::Pawn {
            return false;
        }
        let Some(skipped) = target.offset(0, -victim.color().pawn_direction()) else {
            return false;
        };
        defenders.iter().any(|&from| {
            moves::en_passant_victim(self.board, from, skipped) == Some(target)
                && self.is_legal(from, skipped)
        })
    }
}
