//! Move log: one structured record per applied ply, the exported notation
//! text, captured pieces indexed by ply, and one-ply undo.

use crate::{Board, Piece};
use chess_core::{CastleSide, Capture, CheckMark, Color, Notation, PieceKind, Square};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised by the move log.
///
/// All of them mean the caller broke the log's contract or the board no
/// longer matches the log; none is a legality rejection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("capture recorded without a captured piece")]
    CaptureWithoutPiece,

    #[error("promotion recorded without a promoted piece")]
    PromotionWithoutPiece,

    #[error("no move to undo")]
    NothingToUndo,

    #[error("no captured piece indexed for ply {0}")]
    MissingCapturedPiece(u32),

    #[error("board does not match the last logged move at {square}")]
    Desynchronized { square: Square },
}

/// Tags describing what happened during a ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Capture,
    Check,
    ShortCastling,
    LongCastling,
    Checkmate,
    Promotion,
    EnPassant,
}

impl Action {
    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of [`Action`]s, packed into a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Actions(u8);

impl Actions {
    pub const NONE: Actions = Actions(0);

    #[inline]
    pub const fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    /// Returns a copy with `action` added.
    #[inline]
    pub const fn with(self, action: Action) -> Self {
        Actions(self.0 | action.bit())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Action> for Actions {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut actions = Actions::NONE;
        for action in iter {
            actions.insert(action);
        }
        actions
    }
}

/// Structured form of one logged ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    /// Zero-based ply number; even plies are White's.
    pub ply: u32,
    pub color: Color,
    pub piece: PieceKind,
    pub from: Square,
    pub to: Square,
    pub capture: Option<Capture>,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
    pub check: CheckMark,
}

impl MoveRecord {
    /// Exported notation for this ply.
    pub fn notation(&self) -> Notation {
        match self.castle {
            Some(side) => Notation::Castle(side),
            None => Notation::Move {
                piece: self.piece,
                from: self.from,
                capture: self.capture,
                to: self.to,
                promotion: self.promotion,
                check: self.check,
            },
        }
    }

    #[inline]
    pub fn is_pawn_double_step(&self) -> bool {
        self.castle.is_none() && self.notation().is_pawn_double_step()
    }
}

#[derive(Debug, Clone)]
struct LogEntry {
    record: MoveRecord,
    text: String,
    /// The moving piece as it stood before the move.
    mover: Piece,
    promoted: Option<Piece>,
}

/// Ordered log of applied plies.
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    entries: Vec<LogEntry>,
    captured: HashMap<u32, Piece>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one applied ply and returns its notation.
    ///
    /// `mover` is the moving piece before the move was applied. A declared
    /// capture (or en passant) needs `captured`; a declared promotion needs
    /// `promoted`.
    pub fn record(
        &mut self,
        from: Square,
        to: Square,
        mover: &Piece,
        captured: Option<&Piece>,
        promoted: Option<&Piece>,
        actions: Actions,
    ) -> Result<&str, LogError> {
        let ply = self.current_move();

        let capture = if actions.contains(Action::EnPassant) {
            captured.ok_or(LogError::CaptureWithoutPiece)?;
            Some(Capture::EnPassant)
        } else if actions.contains(Action::Capture) {
            let victim = captured.ok_or(LogError::CaptureWithoutPiece)?;
            Some(Capture::Piece(victim.kind()))
        } else {
            None
        };

        let promotion = if actions.contains(Action::Promotion) {
            Some(promoted.ok_or(LogError::PromotionWithoutPiece)?.kind())
        } else {
            None
        };

        let castle = if actions.contains(Action::ShortCastling) {
            Some(CastleSide::Short)
        } else if actions.contains(Action::LongCastling) {
            Some(CastleSide::Long)
        } else {
            None
        };

        let check = if actions.contains(Action::Checkmate) {
            CheckMark::Checkmate
        } else if actions.contains(Action::Check) {
            CheckMark::Check
        } else {
            CheckMark::None
        };

        let record = MoveRecord {
            ply,
            color: mover.color(),
            piece: mover.kind(),
            from,
            to,
            capture,
            castle,
            promotion,
            check,
        };

        if capture.is_some() {
            if let Some(victim) = captured {
                self.captured.insert(ply, *victim);
            }
        }

        self.entries.push(LogEntry {
            record,
            text: record.notation().to_string(),
            mover: *mover,
            promoted: promoted.filter(|_| promotion.is_some()).copied(),
        });

        Ok(self.last_move().unwrap_or_default())
    }

    /// Replaces the check mark of the last entry.
    pub fn annotate_last(&mut self, check: CheckMark) {
        if let Some(entry) = self.entries.last_mut() {
            entry.record.check = check;
            entry.text = entry.record.notation().to_string();
        }
    }

    /// Notation of the most recent ply.
    pub fn last_move(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.text.as_str())
    }

    pub fn last_record(&self) -> Option<&MoveRecord> {
        self.entries.last().map(|entry| &entry.record)
    }

    /// Notation of every ply in order.
    pub fn history(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.text.as_str())
    }

    /// Move counter: number of plies recorded so far.
    #[inline]
    pub fn current_move(&self) -> u32 {
        self.entries.len() as u32
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        Color::to_move(self.current_move())
    }

    /// The piece removed by ply `ply`, if it captured.
    pub fn captured_at(&self, ply: u32) -> Option<&Piece> {
        self.captured.get(&ply)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Pops the last ply and returns the cell writes that take `board` back
    /// to the position before it.
    ///
    /// The log is left untouched when an error is returned.
    pub fn reconstruct_previous_position(
        &mut self,
        board: &Board,
    ) -> Result<BTreeMap<Square, Option<Piece>>, LogError> {
        let entry = self.entries.last().ok_or(LogError::NothingToUndo)?;
        let record = entry.record;
        let (from, to) = (record.from, record.to);

        let on_target = board
            .piece_at(to)
            .ok_or(LogError::Desynchronized { square: to })?;
        let expected = entry.promoted.as_ref().unwrap_or(&entry.mover);
        if !on_target.is(expected) {
            return Err(LogError::Desynchronized { square: to });
        }

        let mut writes = BTreeMap::new();
        writes.insert(to, None);

        if let Some(side) = record.castle {
            let rook_now = from
                .between(to)
                .first()
                .copied()
                .ok_or(LogError::Desynchronized { square: to })?;
            let mut rook = *board
                .piece_at(rook_now)
                .ok_or(LogError::Desynchronized { square: rook_now })?;
            let rook_home = Square::new(side.rook_file(), from.rank())
                .ok_or(LogError::Desynchronized { square: rook_now })?;
            rook.set_moved(false);
            writes.insert(rook_now, None);
            writes.insert(rook_home, Some(rook));
        }

        match record.capture {
            Some(Capture::EnPassant) => {
                let victim = self.captured_piece(record.ply)?;
                let victim_sq = Square::new(to.file(), from.rank())
                    .ok_or(LogError::Desynchronized { square: to })?;
                writes.insert(victim_sq, Some(victim));
            }
            Some(Capture::Piece(_)) => {
                let victim = self.captured_piece(record.ply)?;
                writes.insert(to, Some(victim));
            }
            None => {}
        }

        let mut mover = entry.mover;
        if record.castle.is_some() {
            mover.set_moved(false);
        }
        writes.insert(from, Some(mover));

        self.entries.pop();
        self.captured.remove(&record.ply);
        Ok(writes)
    }

    fn captured_piece(&self, ply: u32) -> Result<Piece, LogError> {
        self.captured
            .get(&ply)
            .copied()
            .ok_or(LogError::MissingCapturedPiece(ply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Placement;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn apply(board: &mut Board, writes: BTreeMap<Square, Option<Piece>>) {
        for (square, piece) in writes {
            board.place(square, piece);
        }
    }

    #[test]
    fn actions_set() {
        let actions: Actions = [Action::Capture, Action::Check].into_iter().collect();
        assert!(actions.contains(Action::Capture));
        assert!(actions.contains(Action::Check));
        assert!(!actions.contains(Action::Checkmate));
        assert!(Actions::NONE.is_empty());
        assert!(Actions::NONE.with(Action::EnPassant).contains(Action::EnPassant));
    }

    #[test]
    fn records_quiet_move() {
        let mut board = Board::standard();
        let mut log = MoveLog::new();
        assert_eq!(log.last_move(), None);

        let pawn = *board.piece_at(sq("e2")).unwrap();
        let mut moved = pawn;
        moved.set_moved(true);
        board.move_piece(sq("e2"), sq("e4"), moved);

        let text = log
            .record(sq("e2"), sq("e4"), &pawn, None, None, Actions::NONE)
            .unwrap();
        assert_eq!(text, "P4143");
        assert_eq!(log.current_move(), 1);
        assert_eq!(log.side_to_move(), Color::Black);
        assert!(log.last_record().unwrap().is_pawn_double_step());
    }

    #[test]
    fn rejects_missing_companions() {
        let board = Board::standard();
        let mut log = MoveLog::new();
        let pawn = *board.piece_at(sq("e2")).unwrap();

        let capture = Actions::NONE.with(Action::Capture);
        assert_eq!(
            log.record(sq("e2"), sq("d3"), &pawn, None, None, capture),
            Err(LogError::CaptureWithoutPiece)
        );
        let promotion = Actions::NONE.with(Action::Promotion);
        assert_eq!(
            log.record(sq("e2"), sq("e3"), &pawn, None, None, promotion),
            Err(LogError::PromotionWithoutPiece)
        );
        assert!(log.is_empty());
    }

    #[test]
    fn castling_writes_token_only() {
        let board = Board::standard();
        let mut log = MoveLog::new();
        let king = *board.piece_at(Square::E1).unwrap();
        let actions = Actions::NONE.with(Action::ShortCastling).with(Action::Check);
        let text = log
            .record(Square::E1, Square::G1, &king, None, None, actions)
            .unwrap();
        assert_eq!(text, "0-0");
    }

    #[test]
    fn annotate_last_rewrites_suffix() {
        let board = Board::standard();
        let mut log = MoveLog::new();
        let queen = *board.piece_at(Square::D1).unwrap();
        log.record(Square::D1, sq("h5"), &queen, None, None, Actions::NONE)
            .unwrap();
        log.annotate_last(CheckMark::Checkmate);
        assert_eq!(log.last_move(), Some("Q3074#"));
    }

    #[test]
    fn undo_with_empty_log_fails() {
        let board = Board::standard();
        let mut log = MoveLog::new();
        assert_eq!(
            log.reconstruct_previous_position(&board),
            Err(LogError::NothingToUndo)
        );
    }

    #[test]
    fn undo_restores_capture() {
        let mut board = Board::from_placements(&[
            Placement::new(Square::E1, Color::White, PieceKind::King),
            Placement::new(Square::E8, Color::Black, PieceKind::King),
            Placement::new(sq("d4"), Color::White, PieceKind::Knight),
            Placement::new(sq("e6"), Color::Black, PieceKind::Bishop),
        ])
        .unwrap();
        let snapshot = board.clone();
        let mut log = MoveLog::new();

        let knight = board.take(sq("d4")).unwrap();
        let bishop = board.take(sq("e6")).unwrap();
        board.place(sq("e6"), Some(knight));
        let text = log
            .record(
                sq("d4"),
                sq("e6"),
                &knight,
                Some(&bishop),
                None,
                Actions::NONE.with(Action::Capture),
            )
            .unwrap();
        assert_eq!(text, "N33xB45");
        assert_eq!(log.captured_at(0), Some(&bishop));

        let writes = log.reconstruct_previous_position(&board).unwrap();
        apply(&mut board, writes);
        assert_eq!(board, snapshot);
        assert!(log.is_empty());
        assert_eq!(log.captured_at(0), None);
    }

    #[test]
    fn undo_restores_en_passant_victim() {
        let mut board = Board::from_placements(&[
            Placement::new(Square::E1, Color::White, PieceKind::King),
            Placement::new(Square::E8, Color::Black, PieceKind::King),
            Placement::new(sq("e5"), Color::White, PieceKind::Pawn),
            Placement::new(sq("d5"), Color::Black, PieceKind::Pawn),
        ])
        .unwrap();
        let snapshot = board.clone();
        let mut log = MoveLog::new();

        let pawn = board.take(sq("e5")).unwrap();
        let victim = board.take(sq("d5")).unwrap();
        board.place(sq("d6"), Some(pawn));
        let text = log
            .record(
                sq("e5"),
                sq("d6"),
                &pawn,
                Some(&victim),
                None,
                Actions::NONE.with(Action::EnPassant),
            )
            .unwrap();
        assert_eq!(text, "P44e.p.35");

        let writes = log.reconstruct_previous_position(&board).unwrap();
        apply(&mut board, writes);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn undo_restores_castled_rook() {
        let mut board = Board::from_placements(&[
            Placement::new(Square::E1, Color::White, PieceKind::King),
            Placement::new(Square::H1, Color::White, PieceKind::Rook),
            Placement::new(Square::E8, Color::Black, PieceKind::King),
        ])
        .unwrap();
        let snapshot = board.clone();
        let mut log = MoveLog::new();

        let king = board.take(Square::E1).unwrap();
        let mut rook = board.take(Square::H1).unwrap();
        let mut moved_king = king;
        moved_king.set_moved(true);
        rook.set_moved(true);
        board.place(Square::G1, Some(moved_king));
        board.place(Square::F1, Some(rook));
        log.record(
            Square::E1,
            Square::G1,
            &king,
            None,
            None,
            Actions::NONE.with(Action::ShortCastling),
        )
        .unwrap();

        let writes = log.reconstruct_previous_position(&board).unwrap();
        apply(&mut board, writes);
        assert_eq!(board, snapshot);
        assert!(!board.piece_at(Square::H1).unwrap().has_moved());
    }

    #[test]
    fn undo_removes_promoted_piece() {
        let mut board = Board::from_placements(&[
            Placement::new(Square::E1, Color::White, PieceKind::King),
            Placement::new(Square::A8, Color::Black, PieceKind::King),
            Placement::new(sq("h7"), Color::White, PieceKind::Pawn),
        ])
        .unwrap();
        let snapshot = board.clone();
        let mut log = MoveLog::new();

        let pawn = board.take(sq("h7")).unwrap();
        let queen = board.create(Color::White, PieceKind::Queen);
        board.place(Square::H8, Some(queen));
        let text = log
            .record(
                sq("h7"),
                Square::H8,
                &pawn,
                None,
                Some(&queen),
                Actions::NONE.with(Action::Promotion),
            )
            .unwrap();
        assert_eq!(text, "P7677=Q");

        let writes = log.reconstruct_previous_position(&board).unwrap();
        apply(&mut board, writes);
        assert_eq!(board, snapshot);
        assert_eq!(board.piece_at(sq("h7")), Some(&pawn));
        assert!(board.is_empty(Square::H8));
    }

    #[test]
    fn desynchronized_board_is_reported() {
        let mut board = Board::standard();
        let mut log = MoveLog::new();
        let pawn = *board.piece_at(sq("e2")).unwrap();
        log.record(sq("e2"), sq("e4"), &pawn, None, None, Actions::NONE)
            .unwrap();
        board.take(sq("e2"));

        assert_eq!(
            log.reconstruct_previous_position(&board),
            Err(LogError::Desynchronized { square: sq("e4") })
        );
        assert_eq!(log.len(), 1);
    }
}
