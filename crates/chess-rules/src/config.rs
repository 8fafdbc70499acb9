//! Game setup loaded from TOML.
//!
//! ```toml
//! [setup]
//! layout = "empty"
//!
//! [[setup.pieces]]
//! square = "e1"
//! color = "white"
//! kind = "king"
//! ```

use crate::board::{Board, Placement, SetupError};
use chess_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or applying a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A piece names a square that does not exist.
    #[error("Invalid square: {0:?}")]
    InvalidSquare(String),
    /// The resulting position is not a valid board.
    #[error("Invalid setup: {0}")]
    Setup(#[from] SetupError),
}

/// Starting layout the extra pieces are added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// The usual 32 pieces.
    #[default]
    Standard,
    /// Nothing; the pieces list must supply both kings.
    Empty,
}

/// One piece placed by the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PieceConfig {
    /// Algebraic square, e.g. `"e1"`.
    pub square: String,
    pub color: Color,
    pub kind: PieceKind,
    #[serde(default)]
    pub moved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SetupConfig {
    #[serde(default)]
    pub layout: Layout,
    /// Placed after the layout; a piece on an occupied square replaces it.
    #[serde(default)]
    pub pieces: Vec<PieceConfig>,
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    #[serde(default)]
    pub setup: SetupConfig,
}

impl GameConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Final list of placements: the layout, overridden square by square by
    /// the configured pieces.
    pub fn placements(&self) -> Result<Vec<Placement>, ConfigError> {
        let mut by_square: BTreeMap<Square, Placement> = match self.setup.layout {
            Layout::Standard => Board::standard_placements()
                .into_iter()
                .map(|placement| (placement.square, placement))
                .collect(),
            Layout::Empty => BTreeMap::new(),
        };

        for piece in &self.setup.pieces {
            let square: Square = piece.square.parse().map_err(|_| {
                tracing::warn!(square = %piece.square, "rejected setup square");
                ConfigError::InvalidSquare(piece.square.clone())
            })?;
            by_square.insert(
                square,
                Placement {
                    square,
                    color: piece.color,
                    kind: piece.kind,
                    moved: piece.moved,
                },
            );
        }

        Ok(by_square.into_values().collect())
    }

    /// Builds the configured board.
    pub fn build_board(&self) -> Result<Board, ConfigError> {
        let placements = self.placements()?;
        Board::from_placements(&placements).map_err(|err| {
            tracing::warn!(%err, "rejected setup");
            ConfigError::Setup(err)
        })
    }
}
