//! Move-log notation.
//!
//! Every applied ply is exported as a compact string:
//!
//! ```text
//! <Piece><file><rank>[x<Captured> | e.p.]<file><rank>[=<Promoted>][+ | #]
//! ```
//!
//! Files and ranks are written as single digits `0`-`7` (a1 is `00`), piece
//! letters are `P N B R Q K`. Castling is written as `0-0` (short) or `0-0-0`
//! (long) with nothing else attached. Examples: `P4143`, `N01xP22`,
//! `P44e.p.35`, `P16=Q17#`.

use crate::{PieceKind, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Token for short (king side) castling.
pub const SHORT_CASTLE: &str = "0-0";
/// Token for long (queen side) castling.
pub const LONG_CASTLE: &str = "0-0-0";
/// Marker between start square and captured piece letter.
pub const CAPTURE_MARK: char = 'x';
/// Marker written instead of a capture for en passant.
pub const EN_PASSANT_MARK: &str = "e.p.";
/// Marker preceding the promoted piece letter.
pub const PROMOTION_MARK: char = '=';
/// Trailing check marker.
pub const CHECK_MARK: char = '+';
/// Trailing checkmate marker.
pub const CHECKMATE_MARK: char = '#';

/// Errors that can occur when parsing notation text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty notation")]
    Empty,

    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),

    #[error("expected two square digits, got {0:?}")]
    InvalidSquare(String),

    #[error("unexpected trailing text {0:?}")]
    Trailing(String),
}

/// Which side of the board the king castles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Toward the h-file.
    Short,
    /// Toward the a-file.
    Long,
}

impl CastleSide {
    /// File the rook starts on.
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::Short => 7,
            CastleSide::Long => 0,
        }
    }

    /// Side implied by a king travelling from `from_file` to `to_file`.
    pub const fn from_king_step(from_file: u8, to_file: u8) -> Self {
        if to_file > from_file {
            CastleSide::Short
        } else {
            CastleSide::Long
        }
    }

    /// Log token of this castle, `0-0` or `0-0-0`.
    pub const fn token(self) -> &'static str {
        match self {
            CastleSide::Short => SHORT_CASTLE,
            CastleSide::Long => LONG_CASTLE,
        }
    }
}

/// What a move removed from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capture {
    /// A regular capture on the destination square.
    Piece(PieceKind),
    /// An en passant capture; the victim is always a pawn.
    EnPassant,
}

/// Check status the move left the opponent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckMark {
    #[default]
    None,
    Check,
    Checkmate,
}

/// Structured form of one notation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    Castle(CastleSide),
    Move {
        piece: PieceKind,
        from: Square,
        capture: Option<Capture>,
        to: Square,
        promotion: Option<PieceKind>,
        check: CheckMark,
    },
}

impl Notation {
    /// Returns true for a pawn move of two ranks along one file with no capture or promotion.
    ///
    /// These are the moves that open an en passant capture for the reply.
    pub fn is_pawn_double_step(&self) -> bool {
        match *self {
            Notation::Move {
                piece: PieceKind::Pawn,
                from,
                capture: None,
                to,
                promotion: None,
                ..
            } => {
                let (df, dr) = from.delta(to);
                df == 0 && dr.abs() == 2
            }
            _ => false,
        }
    }
}

fn push_square(out: &mut String, square: Square) {
    out.push((b'0' + square.file()) as char);
    out.push((b'0' + square.rank()) as char);
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Notation::Castle(side) => f.write_str(side.token()),
            Notation::Move {
                piece,
                from,
                capture,
                to,
                promotion,
                check,
            } => {
                let mut text = String::with_capacity(10);
                text.push(piece.letter());
                push_square(&mut text, from);
                match capture {
                    Some(Capture::Piece(captured)) => {
                        text.push(CAPTURE_MARK);
                        text.push(captured.letter());
                    }
                    Some(Capture::EnPassant) => text.push_str(EN_PASSANT_MARK),
                    None => {}
                }
                push_square(&mut text, to);
                if let Some(promoted) = promotion {
                    text.push(PROMOTION_MARK);
                    text.push(promoted.letter());
                }
                match check {
                    CheckMark::Check => text.push(CHECK_MARK),
                    CheckMark::Checkmate => text.push(CHECKMATE_MARK),
                    CheckMark::None => {}
                }
                f.write_str(&text)
            }
        }
    }
}

fn take_letter(rest: &mut &str) -> Result<PieceKind, NotationError> {
    let c = rest.chars().next().ok_or(NotationError::Empty)?;
    let kind = PieceKind::from_letter(c).ok_or(NotationError::UnknownPiece(c))?;
    *rest = &rest[c.len_utf8()..];
    Ok(kind)
}

fn take_square(rest: &mut &str) -> Result<Square, NotationError> {
    let bytes = rest.as_bytes();
    let invalid = || NotationError::InvalidSquare(rest.chars().take(2).collect());
    if bytes.len() < 2 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
        return Err(invalid());
    }
    let square = Square::new(bytes[0] - b'0', bytes[1] - b'0').ok_or_else(invalid)?;
    *rest = &rest[2..];
    Ok(square)
}

impl FromStr for Notation {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => return Err(NotationError::Empty),
            SHORT_CASTLE => return Ok(Notation::Castle(CastleSide::Short)),
            LONG_CASTLE => return Ok(Notation::Castle(CastleSide::Long)),
            _ => {}
        }

        let mut rest = s;
        let piece = take_letter(&mut rest)?;
        let from = take_square(&mut rest)?;

        let capture = if let Some(r) = rest.strip_prefix(EN_PASSANT_MARK) {
            rest = r;
            Some(Capture::EnPassant)
        } else if let Some(r) = rest.strip_prefix(CAPTURE_MARK) {
            rest = r;
            Some(Capture::Piece(take_letter(&mut rest)?))
        } else {
            None
        };

        let to = take_square(&mut rest)?;

        let promotion = match rest.strip_prefix(PROMOTION_MARK) {
            Some(r) => {
                rest = r;
                Some(take_letter(&mut rest)?)
            }
            None => None,
        };

        let check = match rest {
            "" => CheckMark::None,
            "+" => CheckMark::Check,
            "#" => CheckMark::Checkmate,
            other => return Err(NotationError::Trailing(other.to_string())),
        };

        Ok(Notation::Move {
            piece,
            from,
            capture,
            to,
            promotion,
            check,
        })
    }
}
