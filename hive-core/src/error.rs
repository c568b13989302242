//! Error types for the rules engine
//!
//! Two taxonomies: [`StateError`] for caller misuse or impossible states, and
//! [`RuleError`] for actions the rules of the game reject. Rule errors are
//! meant to be shown to the player verbatim; neither kind invalidates the game.

use thiserror::Error;

/// Conflicts raised by the board itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("a piece already occupies the coordinate")]
    Occupied,

    #[error("no piece exists at the coordinate")]
    InvalidCoordinate,
}

/// Caller misuse or corrupted call sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("the specified coordinate is invalid")]
    InvalidCoordinate,

    #[error("there isn't a declared winner as the game is not over")]
    GameNotOver,

    #[error("the game is over and no further actions are accepted")]
    GameOver,

    #[error("an unknown piece was encountered")]
    UnknownPiece,

    #[error("encountered an unknown board error")]
    UnknownBoard(#[source] BoardError),

    #[error("the action requires a feature that is not enabled for this game")]
    FeatureDisabled,
}

/// Actions that are well formed but disallowed by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("the first piece to be placed must be placed at origin")]
    FirstPieceMustBeAtOrigin,

    #[error("a player may only act on their turn")]
    NotPlayersTurn,

    #[error("attempted to take piece that has none left to take")]
    NoPieceAvailable,

    #[error("the player must place their queen by the fourth turn")]
    MustPlaceQueen,

    #[error("a piece must be placed on the surface of the board")]
    MustPlacePieceOnSurface,

    #[error("tournament rules: a player may not place their queen on the first turn")]
    MayNotPlaceQueenOnFirstTurn,

    #[error("the player may not place a piece where it will touch an opponents piece after the first turn")]
    MayNotPlaceTouchingOpponentsPiece,

    #[error("may not place a piece where another piece exists")]
    MayNotPlaceAPieceOnAPiece,

    #[error("the players queen must be placed before a placed piece may move")]
    MustPlaceQueenToMove,

    #[error("this piece is pinned and may not move")]
    PiecePinned,

    #[error("this piece is paralyzed and may not move")]
    PieceParalyzed,

    #[error("the piece is already paralyzed and may not be stunned again this turn")]
    PieceAlreadyParalyzed,

    #[error("the distance for the movement is too great for this piece")]
    MovementDistanceTooGreat,

    #[error("this piece may not climb onto the hive")]
    MayNotClimb,

    #[error("the destination is not supported by a piece below it")]
    UnsupportedDestination,

    #[error("a grasshopper must jump in a straight line over at least one piece")]
    IllegalJump,

    #[error("only a pill bug, or a mosquito touching one, may move another piece")]
    NotAPillBug,

    #[error("a pill bug may only move a piece between cells adjacent to itself")]
    NotAdjacentToPillBug,
}

/// Error returned by every game action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl GameError {
    pub fn is_rule(&self) -> bool {
        matches!(self, GameError::Rule(_))
    }

    pub fn is_state(&self) -> bool {
        matches!(self, GameError::State(_))
    }
}

/// Result type alias for game actions
pub type GameResult<T> = Result<T, GameError>;
