//! Replay command - rebuild a game from its record
//!
//! ## Architecture (3-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_record(), replay_record(), report_state()
//! - Level 3: summarize() and formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hive_core::{Color, Feature, Game, GameRecord, PlacedPiece, Winner};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// Game record JSON file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also list every piece on the board
    #[arg(long)]
    pub board: bool,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// What a replayed game looks like from the outside
#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub features: Vec<Feature>,
    pub actions: usize,
    pub turn: u32,
    pub active: Color,
    pub over: bool,
    pub winner: Option<Winner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pieces: Option<Vec<PlacedPiece>>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run replay command
///
/// 1. Load the record
/// 2. Replay it through the rules
/// 3. Report the final state
pub fn run(args: ReplayArgs) -> Result<()> {
    let record = load_record(&args.file)?;

    tracing::info!(
        "Replaying {} ({} actions)",
        args.file.display(),
        record.actions.len()
    );

    let game = replay_record(&record)?;

    report_state(&game, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read and parse a record file
pub fn load_record(path: &Path) -> Result<GameRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read game record: {}", path.display()))?;

    GameRecord::from_json(&json)
        .with_context(|| format!("Failed to parse game record: {}", path.display()))
}

fn replay_record(record: &GameRecord) -> Result<Game> {
    record.replay().context("Game record does not replay")
}

fn report_state(game: &Game, args: &ReplayArgs) -> Result<()> {
    let summary = summarize(game, args.board);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text_summary(&summary);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

pub fn summarize(game: &Game, with_board: bool) -> GameSummary {
    GameSummary {
        features: game.features().iter().collect(),
        actions: game.history().len(),
        turn: game.turn(),
        active: game.active_color(),
        over: game.over(),
        winner: game.winner().ok(),
        pieces: with_board.then(|| game.board().pieces().to_vec()),
    }
}

fn outcome_line(summary: &GameSummary) -> String {
    match summary.winner {
        Some(Winner::Tie) => "tie".to_string(),
        Some(winner) => format!("{} wins", winner),
        None => "in progress".to_string(),
    }
}

fn print_text_summary(summary: &GameSummary) {
    let features: Vec<String> = summary.features.iter().map(|f| format!("{:?}", f)).collect();
    let features_line = if features.is_empty() {
        "none".to_string()
    } else {
        features.join(", ")
    };

    println!("\n=== Replay ===");
    println!("Features: {}", features_line);
    println!("Actions:  {}", summary.actions);
    println!("Turn:     {}", summary.turn);
    println!("To act:   {}", summary.active);
    println!("Outcome:  {}", outcome_line(summary));

    if let Some(pieces) = &summary.pieces {
        println!("\nBoard:");
        for placed in pieces {
            println!("  {} at {}", placed.piece, placed.coordinate);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::{Coordinate, Features, ORIGIN};

    fn opened() -> Game {
        let mut game = Game::new(Features::none());
        game.place("wQ".parse().unwrap(), ORIGIN).unwrap();
        game.place("bQ".parse().unwrap(), Coordinate::new(0, 1, -1, 0)).unwrap();
        game
    }

    #[test]
    fn test_summarize_in_progress() {
        let summary = summarize(&opened(), false);
        assert_eq!(summary.actions, 2);
        assert_eq!(summary.turn, 2);
        assert_eq!(summary.active, Color::White);
        assert!(!summary.over);
        assert!(summary.pieces.is_none());
        assert_eq!(outcome_line(&summary), "in progress");
    }

    #[test]
    fn test_summarize_with_board() {
        let summary = summarize(&opened(), true);
        let pieces = summary.pieces.clone().unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].piece.to_string(), "wQ1");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["active"], "white");
        assert_eq!(json["winner"], serde_json::Value::Null);
        assert_eq!(json["pieces"][1]["coordinate"], serde_json::json!([0, 1, -1, 0]));
    }

    #[test]
    fn test_load_record_missing_file() {
        let err = load_record(Path::new("/nonexistent/game.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read game record"));
    }

    #[test]
    fn test_outcome_line() {
        let mut summary = summarize(&opened(), false);
        summary.winner = Some(Winner::Black);
        assert_eq!(outcome_line(&summary), "black wins");
        summary.winner = Some(Winner::Tie);
        assert_eq!(outcome_line(&summary), "tie");
    }
}
