//! Rules engine for standard chess.
//!
//! This crate provides:
//! - [`Board`] - the 8x8 grid of [`Piece`] values with O(1) king lookup
//! - [`RuleEngine`] - move legality, attack detection, check and checkmate
//! - [`MoveLog`] - per-ply records, exported notation and one-ply undo
//! - [`Game`] - a session tying the three together
//! - [`GameConfig`] - custom starting positions loaded from TOML
//!
//! # Example
//!
//! ```
//! use chess_rules::{Game, GameStatus};
//! use chess_core::{Color, Square};
//!
//! let sq = |s| Square::from_algebraic(s).unwrap();
//! let mut game = Game::new();
//! game.play(sq("f2"), sq("f3"), None).unwrap();
//! game.play(sq("e7"), sq("e5"), None).unwrap();
//! game.play(sq("g2"), sq("g4"), None).unwrap();
//! let outcome = game.play(sq("d8"), sq("h4"), None).unwrap();
//!
//! assert_eq!(outcome.notation, "Q3773#");
//! assert_eq!(game.status(), GameStatus::Checkmate(Color::White));
//! ```

mod board;
pub mod config;
mod game;
pub mod log;
mod piece;
pub mod rules;

pub use board::{Board, Placement, SetupError};
pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameError, GameStatus, PlyOutcome};
pub use log::{Action, Actions, LogError, MoveLog, MoveRecord};
pub use piece::{Piece, PieceId, Role};
pub use rules::RuleEngine;
