//! Per-kind movement rules.
//!
//! Every function here reads the board through a shared reference, so none of
//! them can start a king-safety probe. King safety for the mover is the
//! caller's concern (see [`RuleEngine::is_legal`](super::RuleEngine::is_legal)).

use super::attacks::is_attacked;
use crate::{Board, MoveLog, Piece, Role};
use chess_core::{CastleSide, Color, PieceKind, Square};

/// File of both kings in the starting position.
const KING_HOME_FILE: u8 = 4;

/// True if every square strictly between `from` and `to` is empty.
pub(crate) fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    from.between(to).into_iter().all(|sq| board.is_empty(sq))
}

/// L-shaped jump.
pub(crate) fn knight(from: Square, to: Square) -> bool {
    let (df, dr) = from.delta(to);
    let (df, dr) = (df.abs(), dr.abs());
    df + dr == 3 && df >= 1 && dr >= 1
}

/// Bishop line: same cell shade, equal deltas, nothing in between.
pub(crate) fn diagonal(board: &Board, from: Square, to: Square) -> bool {
    let (df, dr) = from.delta(to);
    board.cell_color(from) == board.cell_color(to)
        && df.abs() == dr.abs()
        && path_is_clear(board, from, to)
}

/// Rook line: exactly one coordinate changes, nothing in between.
pub(crate) fn straight(board: &Board, from: Square, to: Square) -> bool {
    let (df, dr) = from.delta(to);
    (df == 0) != (dr == 0) && path_is_clear(board, from, to)
}

/// Pawn pushes, captures and en passant.
pub(crate) fn pawn(board: &Board, log: &MoveLog, from: Square, to: Square, pawn: &Piece) -> bool {
    let color = pawn.color();
    let dir = color.pawn_direction();
    let (df, dr) = from.delta(to);

    match df.abs() {
        0 => {
            if !board.is_empty(to) {
                return false;
            }
            if dr == dir {
                return true;
            }
            dr == 2 * dir
                && !pawn.has_moved()
                && from.offset(0, dir).is_some_and(|mid| board.is_empty(mid))
        }
        1 if dr == dir => match board.piece_at(to) {
            Some(target) => target.color() != color,
            None => en_passant(board, log, to, color),
        },
        _ => false,
    }
}

/// Square of the pawn an en passant move onto `to` would remove.
///
/// Only the geometry is checked: a pawn stepping diagonally onto an empty
/// square with an enemy pawn beside its origin.
pub(crate) fn en_passant_victim(board: &Board, from: Square, to: Square) -> Option<Square> {
    let mover = board.piece_at(from)?;
    let (df, _) = from.delta(to);
    if mover.kind() != PieceKind::Pawn || df.abs() != 1 || !board.is_empty(to) {
        return None;
    }
    let victim_sq = Square::new(to.file(), from.rank())?;
    let victim = board.piece_at(victim_sq)?;
    (victim.kind() == PieceKind::Pawn && victim.color() != mover.color()).then_some(victim_sq)
}

/// En passant onto the empty square `to`.
///
/// Legal only right after an enemy pawn's two-square advance on `to`'s file,
/// landing on the square that pawn skipped.
pub(crate) fn en_passant(board: &Board, log: &MoveLog, to: Square, color: Color) -> bool {
    let Some(last) = log.last_record() else {
        return false;
    };
    if !last.is_pawn_double_step() || last.to.file() != to.file() {
        return false;
    }

    let skipped_rank = (last.from.rank() + last.to.rank()) / 2;
    let enemy_pawn_present = board
        .piece_at(last.to)
        .is_some_and(|p| p.kind() == PieceKind::Pawn && p.color() != color);

    to.rank() == skipped_rank && board.is_empty(to) && enemy_pawn_present
}

/// One-square king step or castling.
pub(crate) fn king(board: &Board, from: Square, to: Square, king: &Piece) -> bool {
    let (df, dr) = from.delta(to);
    if df.abs() <= 1 && dr.abs() <= 1 {
        return !is_attacked(board, to, king.color());
    }
    if df.abs() == 2 && dr == 0 {
        return castling(board, from, to, king);
    }
    false
}

/// Castling as a two-file king step toward an unmoved rook of the same color.
///
/// The king must be unmoved on its home square (e1 or e8) and not in check,
/// every square between king and rook must be empty, and neither square the
/// king crosses or lands on may be attacked.
pub(crate) fn castling(board: &Board, from: Square, to: Square, king: &Piece) -> bool {
    let Role::King { moved, in_check } = king.role() else {
        return false;
    };
    let color = king.color();
    if Square::new(KING_HOME_FILE, color.back_rank()) != Some(from) {
        return false;
    }
    if moved || in_check || is_attacked(board, from, color) {
        return false;
    }

    let side = CastleSide::from_king_step(from.file(), to.file());
    let Some(rook_sq) = Square::new(side.rook_file(), from.rank()) else {
        return false;
    };
    let rook_ready = board.piece_at(rook_sq).is_some_and(|rook| {
        matches!(rook.role(), Role::Rook { moved: false }) && rook.color() == color
    });
    if !rook_ready || !path_is_clear(board, from, rook_sq) {
        return false;
    }

    from.between(to)
        .into_iter()
        .chain(std::iter::once(to))
        .all(|sq| board.is_empty(sq) && !is_attacked(board, sq, color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Placement;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board_with(extra: &[(&str, Color, PieceKind)]) -> Board {
        let mut placements = vec![
            Placement::new(Square::E1, Color::White, PieceKind::King),
            Placement::new(Square::E8, Color::Black, PieceKind::King),
        ];
        for &(s, color, kind) in extra {
            placements.push(Placement::new(sq(s), color, kind));
        }
        Board::from_placements(&placements).unwrap()
    }

    fn at(board: &Board, s: &str) -> Piece {
        *board.piece_at(sq(s)).unwrap()
    }

    #[test]
    fn knight_shape() {
        assert!(knight(sq("g1"), sq("f3")));
        assert!(knight(sq("g1"), sq("e2")));
        assert!(!knight(sq("g1"), sq("g4")));
        assert!(!knight(sq("g1"), sq("d1")));
        assert!(!knight(sq("g1"), sq("h4")));
    }

    #[test]
    fn sliders_need_clear_paths() {
        let board = board_with(&[
            ("a1", Color::White, PieceKind::Rook),
            ("a4", Color::White, PieceKind::Pawn),
            ("c1", Color::White, PieceKind::Bishop),
        ]);
        assert!(straight(&board, sq("a1"), sq("a3")));
        assert!(straight(&board, sq("a1"), sq("a4")));
        assert!(!straight(&board, sq("a1"), sq("a5")));
        assert!(!straight(&board, sq("a1"), sq("b2")));
        assert!(diagonal(&board, sq("c1"), sq("h6")));
        assert!(!diagonal(&board, sq("c1"), sq("c3")));
        assert!(!diagonal(&board, sq("c1"), sq("d3")));
    }

    #[test]
    fn pawn_pushes() {
        let board = board_with(&[
            ("e2", Color::White, PieceKind::Pawn),
            ("d7", Color::Black, PieceKind::Pawn),
            ("d6", Color::White, PieceKind::Knight),
        ]);
        let log = MoveLog::new();
        let white = at(&board, "e2");
        assert!(pawn(&board, &log, sq("e2"), sq("e3"), &white));
        assert!(pawn(&board, &log, sq("e2"), sq("e4"), &white));
        assert!(!pawn(&board, &log, sq("e2"), sq("e5"), &white));
        assert!(!pawn(&board, &log, sq("e2"), sq("e1"), &white));

        let black = at(&board, "d7");
        assert!(!pawn(&board, &log, sq("d7"), sq("d6"), &black));
        assert!(!pawn(&board, &log, sq("d7"), sq("d5"), &black));
    }

    #[test]
    fn moved_pawn_has_no_double_step() {
        let board = board_with(&[("e3", Color::White, PieceKind::Pawn)]);
        let log = MoveLog::new();
        let mut moved = at(&board, "e3");
        moved.set_moved(true);
        assert!(!pawn(&board, &log, sq("e3"), sq("e5"), &moved));
        assert!(pawn(&board, &log, sq("e3"), sq("e4"), &moved));
    }

    #[test]
    fn pawn_captures_diagonally_only_enemies() {
        let board = board_with(&[
            ("e4", Color::White, PieceKind::Pawn),
            ("d5", Color::Black, PieceKind::Knight),
            ("f5", Color::White, PieceKind::Knight),
        ]);
        let log = MoveLog::new();
        let white = at(&board, "e4");
        assert!(pawn(&board, &log, sq("e4"), sq("d5"), &white));
        assert!(!pawn(&board, &log, sq("e4"), sq("f5"), &white));
        assert!(!pawn(&board, &log, sq("e4"), sq("d3"), &white));
    }

    #[test]
    fn king_steps_avoid_attacked_squares() {
        let board = board_with(&[("d8", Color::Black, PieceKind::Rook)]);
        let white_king = at(&board, "e1");
        assert!(king(&board, sq("e1"), sq("f2"), &white_king));
        assert!(!king(&board, sq("e1"), sq("d2"), &white_king));
        assert!(!king(&board, sq("e1"), sq("e3"), &white_king));
    }

    #[test]
    fn castling_requires_rook_and_empty_path() {
        let board = board_with(&[
            ("h1", Color::White, PieceKind::Rook),
            ("a1", Color::White, PieceKind::Rook),
            ("b1", Color::White, PieceKind::Knight),
        ]);
        let white_king = at(&board, "e1");
        assert!(castling(&board, sq("e1"), sq("g1"), &white_king));
        assert!(!castling(&board, sq("e1"), sq("c1"), &white_king));
    }

    #[test]
    fn castling_rejects_enemy_rook_and_moved_rook() {
        let board = board_with(&[
            ("h1", Color::Black, PieceKind::Rook),
            ("a1", Color::White, PieceKind::Rook),
        ]);
        let white_king = at(&board, "e1");
        assert!(!castling(&board, sq("e1"), sq("g1"), &white_king));

        let mut board = board;
        board.piece_at_mut(Square::A1).unwrap().set_moved(true);
        assert!(!castling(&board, sq("e1"), sq("c1"), &white_king));
    }

    #[test]
    fn castling_only_from_the_home_square() {
        let board = Board::from_placements(&[
            Placement::new(sq("d1"), Color::White, PieceKind::King),
            Placement::new(Square::H1, Color::White, PieceKind::Rook),
            Placement::new(Square::E8, Color::Black, PieceKind::King),
        ])
        .unwrap();
        let white_king = at(&board, "d1");
        assert!(!castling(&board, sq("d1"), Square::F1, &white_king));
        assert!(!king(&board, sq("d1"), Square::F1, &white_king));

        let board = Board::from_placements(&[
            Placement::new(sq("e4"), Color::White, PieceKind::King),
            Placement::new(sq("h4"), Color::White, PieceKind::Rook),
            Placement::new(Square::E8, Color::Black, PieceKind::King),
        ])
        .unwrap();
        let white_king = at(&board, "e4");
        assert!(!castling(&board, sq("e4"), sq("g4"), &white_king));
    }

    #[test]
    fn en_passant_victim_geometry() {
        let board = board_with(&[
            ("e5", Color::White, PieceKind::Pawn),
            ("d5", Color::Black, PieceKind::Pawn),
            ("f5", Color::White, PieceKind::Pawn),
        ]);
        assert_eq!(en_passant_victim(&board, sq("e5"), sq("d6")), Some(sq("d5")));
        assert_eq!(en_passant_victim(&board, sq("e5"), sq("f6")), None);
        assert_eq!(en_passant_victim(&board, sq("e5"), sq("e6")), None);
    }
}
