//! Core types for chess.
//!
//! This crate provides the plain value types shared by the rules engine:
//! - [`Color`] for sides and move parity
//! - [`Square`] for board coordinates
//! - [`PieceKind`] for the six piece kinds
//! - [`Notation`] for the textual move-log format

mod color;
pub mod notation;
mod piece;
mod square;

pub use color::Color;
pub use notation::{CastleSide, Capture, CheckMark, Notation, NotationError};
pub use piece::PieceKind;
pub use square::{ParseSquareError, Square};
