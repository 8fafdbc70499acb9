//! Chess Replay - plays a list of moves through the rules engine.
//!
//! Prints the notation of every ply and the final board, or the same
//! information as JSON with `--json`.

use anyhow::{bail, Context};
use chess_core::{PieceKind, Square};
use chess_rules::{Game, GameConfig, GameStatus};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Chess Replay - replays moves and prints the move log.
#[derive(Parser)]
#[command(name = "chess-replay")]
#[command(about = "Replays a list of moves and prints the move log")]
struct Args {
    /// TOML file describing the starting position
    #[arg(long)]
    setup: Option<PathBuf>,

    /// Take back the last ply after replaying
    #[arg(long)]
    undo: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Moves as `<from><to>[promotion]`, e.g. `e2e4` or `e7e8q`
    moves: Vec<String>,
}

#[derive(Serialize)]
struct ReplayJson<'a> {
    moves: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    undone: Option<String>,
    status: GameStatus,
    placement: String,
}

/// Parses `e2e4` / `e7e8q` into squares and an optional promotion.
fn parse_move(text: &str) -> anyhow::Result<(Square, Square, Option<PieceKind>)> {
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        bail!("expected <from><to>[promotion], got {text:?}");
    }
    let from: Square = text[0..2]
        .parse()
        .with_context(|| format!("bad origin in {text:?}"))?;
    let to: Square = text[2..4]
        .parse()
        .with_context(|| format!("bad destination in {text:?}"))?;
    let promotion = match text[4..].chars().next() {
        Some(c) => Some(
            PieceKind::from_letter(c.to_ascii_uppercase())
                .with_context(|| format!("unknown promotion piece {c:?}"))?,
        ),
        None => None,
    };
    Ok((from, to, promotion))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut game = match &args.setup {
        Some(path) => {
            tracing::info!("Loading setup from {:?}", path);
            let config = GameConfig::load(path)
                .with_context(|| format!("failed to load setup {}", path.display()))?;
            Game::from_config(&config)?
        }
        None => Game::new(),
    };

    for text in &args.moves {
        let (from, to, promotion) = parse_move(text)?;
        let outcome = game
            .play(from, to, promotion)
            .with_context(|| format!("move {text} rejected"))?;
        tracing::info!("{} -> {} ({})", text, outcome.notation, outcome.status);
    }

    let undone = if args.undo {
        let last = game.log().last_move().map(str::to_string);
        game.undo().context("undo failed")?;
        tracing::info!("Undid {:?}", last);
        last
    } else {
        None
    };

    if args.json {
        let report = ReplayJson {
            moves: game.history().collect(),
            undone,
            status: game.status(),
            placement: game.board().placement(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (ply, notation) in game.history().enumerate() {
            println!("{:>3}. {}", ply + 1, notation);
        }
        if let Some(last) = undone {
            println!("undone: {}", last);
        }
        println!();
        println!("{}", game.board());
        println!("{}", game.status());
    }

    Ok(())
}
