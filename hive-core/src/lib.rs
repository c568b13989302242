//! Hive Core - Rules engine for the Hive tile-stacking game
//!
//! This crate provides the game logic for Hive:
//! - Packed cube coordinates with a height axis
//! - Piece encoding, player inventories and optional expansion features
//! - Neighbor formations used to detect pinned and suffocated pieces
//! - Movement validation with a bounded best-first search
//! - The turn state machine, history and replayable game records

pub mod coordinate;
pub mod pieces;
pub mod error;
pub mod features;
pub mod inventory;
pub mod formation;
pub mod board;
pub mod action;
pub mod path;
pub mod game;
pub mod record;

// Re-exports for convenient access
pub use coordinate::{Coordinate, ABOVE, NEIGHBOR_OFFSETS, ORIGIN};
pub use pieces::{Color, Instance, Piece, Species, SPECIES, ZERO_PIECE};
pub use error::{BoardError, GameError, GameResult, RuleError, StateError};
pub use features::{Feature, Features};
pub use inventory::Inventory;
pub use formation::{Formation, Shape};
pub use board::{Board, PlacedPiece};
pub use action::{Action, ActionKind};
pub use path::{MovementProfile, PathValidator};
pub use game::{Game, Winner};
pub use record::{GameRecord, ReplayError};
