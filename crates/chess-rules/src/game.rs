//! Game session.
//!
//! [`Game`] owns the board and the move log and drives one ply at a time:
//! ask the rule engine, apply the move, record it, then look for check and
//! checkmate on the side that has to reply.

use crate::config::{ConfigError, GameConfig};
use crate::log::{Action, Actions, LogError, MoveLog};
use crate::rules::{self, RuleEngine};
use crate::{Board, Piece};
use chess_core::{CastleSide, CheckMark, Color, PieceKind, Square};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Reasons a ply or an undo is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("it is {0}'s turn")]
    NotYourTurn(Color),

    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("a pawn reaching the last rank must be promoted")]
    PromotionRequired,

    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),

    #[error("only a pawn reaching the last rank can be promoted")]
    PromotionNotAllowed,

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Where the game stands for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "color", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    /// The given side is in check.
    Check(Color),
    /// The given side is checkmated.
    Checkmate(Color),
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Check(color) => write!(f, "{} is in check", color),
            GameStatus::Checkmate(color) => write!(f, "{} is checkmated", color),
        }
    }
}

/// Result of one applied ply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyOutcome {
    pub notation: String,
    pub status: GameStatus,
    pub captured: Option<PieceKind>,
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    log: MoveLog,
    /// Side that has been checkmated, once the game is over.
    checkmated: Option<Color>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::standard())
    }

    /// A game from a custom position. White moves first.
    pub fn from_board(board: Board) -> Self {
        let mut game = Game {
            board,
            log: MoveLog::new(),
            checkmated: None,
        };
        game.refresh_check_flags();
        game.detect_checkmate();
        game
    }

    /// A game from the position described by a configuration.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_board(config.build_board()?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.log.side_to_move()
    }

    /// Notation of every ply so far.
    pub fn history(&self) -> impl Iterator<Item = &str> + '_ {
        self.log.history()
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.board.king(self.side_to_move()).in_check()
    }

    pub fn is_over(&self) -> bool {
        self.checkmated.is_some()
    }

    pub fn status(&self) -> GameStatus {
        match self.checkmated {
            Some(color) => GameStatus::Checkmate(color),
            None if self.is_check() => GameStatus::Check(self.side_to_move()),
            None => GameStatus::InProgress,
        }
    }

    /// Legality of `from -> to` for whichever piece stands on `from`.
    pub fn is_legal(&mut self, from: Square, to: Square) -> bool {
        RuleEngine::new(&mut self.board, &self.log).is_legal(from, to)
    }

    /// Every legal `(from, to)` pair for the side to move.
    pub fn legal_moves(&mut self) -> Vec<(Square, Square)> {
        if self.is_over() {
            return Vec::new();
        }
        let pieces = self.board.squares_of(self.side_to_move());
        let mut engine = RuleEngine::new(&mut self.board, &self.log);
        let mut moves = Vec::new();
        for from in pieces {
            for to in Square::all() {
                if engine.is_legal(from, to) {
                    moves.push((from, to));
                }
            }
        }
        moves
    }

    /// Plays one ply.
    ///
    /// `promotion` must name the new piece when a pawn reaches its last rank
    /// and must be `None` otherwise.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<PlyOutcome, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let mover = *self
            .board
            .piece_at(from)
            .ok_or(GameError::EmptySquare(from))?;
        let side = self.side_to_move();
        if mover.color() != side {
            return Err(GameError::NotYourTurn(side));
        }
        if !self.is_legal(from, to) {
            tracing::trace!(%from, %to, "illegal move");
            return Err(GameError::IllegalMove { from, to });
        }

        let promotes = mover.kind() == PieceKind::Pawn && to.rank() == side.promotion_rank();
        match (promotes, promotion) {
            (true, None) => return Err(GameError::PromotionRequired),
            (true, Some(kind)) if !kind.is_promotion_target() => {
                return Err(GameError::InvalidPromotion(kind))
            }
            (false, Some(_)) => return Err(GameError::PromotionNotAllowed),
            _ => {}
        }

        let mut actions = Actions::NONE;
        let mut captured: Option<Piece> = None;

        if mover.kind() == PieceKind::King && from.delta(to).0.abs() == 2 {
            let castle = CastleSide::from_king_step(from.file(), to.file());
            self.castle_rook(from, to, castle);
            actions.insert(match castle {
                CastleSide::Short => Action::ShortCastling,
                CastleSide::Long => Action::LongCastling,
            });
        } else if let Some(victim_sq) = rules::en_passant_victim(&self.board, from, to) {
            captured = self.board.take(victim_sq);
            actions.insert(Action::EnPassant);
        } else if let Some(victim) = self.board.take(to) {
            captured = Some(victim);
            actions.insert(Action::Capture);
        }

        let mut moved = mover;
        moved.set_moved(true);
        let promoted = match promotion.filter(|_| promotes) {
            Some(kind) => {
                actions.insert(Action::Promotion);
                Some(self.board.create(side, kind))
            }
            None => None,
        };
        self.board.move_piece(from, to, promoted.unwrap_or(moved));

        self.refresh_check_flags();
        let opponent = side.opposite();
        if self.board.king(opponent).in_check() {
            actions.insert(Action::Check);
        }

        self.log
            .record(from, to, &mover, captured.as_ref(), promoted.as_ref(), actions)?;
        if self.detect_checkmate() {
            self.log.annotate_last(CheckMark::Checkmate);
        }
        self.board.release();

        let notation = self.log.last_move().unwrap_or_default().to_string();
        tracing::debug!(%from, %to, %notation, "ply applied");

        Ok(PlyOutcome {
            notation,
            status: self.status(),
            captured: captured.map(|piece| piece.kind()),
        })
    }

    /// Tap-style input.
    ///
    /// Tapping one of your own pieces selects it. Tapping any other square
    /// while a piece is selected tries to move it there, promoting to a queen
    /// when needed. Returns the outcome when a ply was played.
    pub fn touch(&mut self, square: Square) -> Result<Option<PlyOutcome>, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let side = self.side_to_move();
        let own_piece = self
            .board
            .piece_at(square)
            .is_some_and(|piece| piece.color() == side);
        if own_piece {
            self.board.pick_up(square);
            return Ok(None);
        }

        let Some(from) = self
            .board
            .in_hand()
            .and_then(|id| self.board.coordinates_of(id))
        else {
            return Ok(None);
        };

        let promotion = self
            .board
            .piece_at(from)
            .filter(|piece| piece.kind() == PieceKind::Pawn && square.rank() == side.promotion_rank())
            .map(|_| PieceKind::Queen);

        let outcome = self.play(from, square, promotion);
        self.board.release();
        outcome.map(Some)
    }

    /// Takes back the last ply.
    pub fn undo(&mut self) -> Result<(), GameError> {
        let writes = self.log.reconstruct_previous_position(&self.board)?;
        for (square, piece) in writes {
            self.board.place(square, piece);
        }
        self.refresh_check_flags();
        self.checkmated = None;
        self.board.release();
        tracing::debug!(ply = self.log.current_move(), "ply undone");
        Ok(())
    }

    /// Moves the rook half of a castling move.
    fn castle_rook(&mut self, from: Square, to: Square, side: CastleSide) {
        let home = Square::new(side.rook_file(), from.rank());
        let target = from.between(to).first().copied();
        if let (Some(home), Some(target)) = (home, target) {
            if let Some(mut rook) = self.board.take(home) {
                rook.set_moved(true);
                self.board.place(target, Some(rook));
            }
        }
    }

    /// Sets each king's check flag from a fresh attack test.
    fn refresh_check_flags(&mut self) {
        for color in Color::ALL {
            let king_sq = self.board.king_square(color);
            let attacked = rules::is_attacked(&self.board, king_sq, color);
            if let Some(king) = self.board.piece_at_mut(king_sq) {
                king.set_in_check(attacked);
            }
        }
    }

    /// Checks whether the side to move is mated and records the result.
    fn detect_checkmate(&mut self) -> bool {
        let side = self.side_to_move();
        let mated = RuleEngine::new(&mut self.board, &self.log).is_checkmate(side);
        if mated {
            tracing::debug!(%side, "checkmate");
            self.checkmated = Some(side);
        }
        mated
    }
}
