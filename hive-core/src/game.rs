//! Game state and the turn state machine

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::action::{Action, ActionKind};
use crate::board::Board;
use crate::coordinate::{Coordinate, ORIGIN};
use crate::error::{BoardError, GameError, GameResult, RuleError, StateError};
use crate::features::{Feature, Features};
use crate::inventory::Inventory;
use crate::path::PathValidator;
use crate::pieces::{Color, Instance, Piece, Species};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Turn by which each player must have placed their queen
const QUEEN_DEADLINE_TURN: u32 = 4;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Outcome of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Tie,
    Black,
    White,
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Winner::Black,
            Color::White => Winner::White,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Tie => f.write_str("tie"),
            Winner::Black => f.write_str("black"),
            Winner::White => f.write_str("white"),
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// A single game of Hive
#[derive(Clone, Debug)]
pub struct Game {
    /// Starts at 1, incremented after black acts
    turn: u32,
    active: Color,
    white: Inventory,
    black: Inventory,
    board: Board,
    white_queen: Option<Coordinate>,
    black_queen: Option<Coordinate>,
    /// Latched once a queen suffocates
    outcome: Option<Winner>,
    history: Vec<Action>,
    /// Coordinate -> rounds until the piece there may move again
    paralyzed: FxHashMap<Coordinate, u8>,
    features: Features,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Features::none())
    }
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, white to act, inventories seeded for the enabled features
    pub fn new(features: Features) -> Self {
        let inventory = Inventory::for_features(features);
        Self {
            turn: 1,
            active: Color::White,
            white: inventory,
            black: inventory,
            board: Board::new(),
            white_queen: None,
            black_queen: None,
            outcome: None,
            history: Vec::new(),
            paralyzed: FxHashMap::default(),
            features,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn active_color(&self) -> Color {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn inventory(&self, color: Color) -> Inventory {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Where a color's queen sits, once placed
    pub fn queen(&self, color: Color) -> Option<Coordinate> {
        match color {
            Color::White => self.white_queen,
            Color::Black => self.black_queen,
        }
    }

    pub fn is_paralyzed(&self, coordinate: Coordinate) -> bool {
        self.paralyzed.contains_key(&coordinate)
    }

    /// Owned copy of every committed action, oldest first
    pub fn history(&self) -> Vec<Action> {
        self.history.clone()
    }

    /// True once either queen is surrounded
    pub fn over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Result<Winner, StateError> {
        self.outcome.ok_or(StateError::GameNotOver)
    }

    /// Both queens were surrounded by the same action
    pub fn is_tie(&self) -> bool {
        self.outcome == Some(Winner::Tie)
    }

    // ========================================================================
    // PLACE
    // ========================================================================

    /// Take `piece` from the active player's inventory and put it on the board.
    ///
    /// The committed piece gets the next free instance of its species, so
    /// `wA` placed twice lands as `wA1` then `wA2`.
    pub fn place(&mut self, piece: Piece, coordinate: Coordinate) -> GameResult<()> {
        self.try_place(piece, coordinate).inspect_err(|err| {
            trace!(%piece, %coordinate, %err, "placement rejected");
        })
    }

    fn try_place(&mut self, piece: Piece, coordinate: Coordinate) -> GameResult<()> {
        self.ensure_running()?;

        if self.history.is_empty() && coordinate != ORIGIN {
            return Err(RuleError::FirstPieceMustBeAtOrigin.into());
        }

        let color = piece.color().ok_or(StateError::UnknownPiece)?;
        if color != self.active {
            return Err(RuleError::NotPlayersTurn.into());
        }

        let species = piece.species().ok_or(StateError::UnknownPiece)?;
        let inventory = self.inventory(color);
        let remaining = inventory.take(species)?;

        if self.turn >= QUEEN_DEADLINE_TURN && inventory.has_queen() && species != Species::Queen {
            return Err(RuleError::MustPlaceQueen.into());
        }

        if coordinate.h() != 0 {
            return Err(RuleError::MustPlacePieceOnSurface.into());
        }

        if self.features.contains(Feature::TournamentQueensRule)
            && self.turn == 1
            && species == Species::Queen
        {
            return Err(RuleError::MayNotPlaceQueenOnFirstTurn.into());
        }

        if self.turn > 1 && self.touches_opponent(coordinate, color) {
            return Err(RuleError::MayNotPlaceTouchingOpponentsPiece.into());
        }

        let placed = numbered(color, species, remaining);
        self.board.place(placed, coordinate).map_err(board_error)?;

        match color {
            Color::White => self.white = remaining,
            Color::Black => self.black = remaining,
        }
        if species == Species::Queen {
            self.set_queen(color, coordinate);
        }
        self.history.push(Action::placed(placed, coordinate));
        debug!(turn = self.turn, piece = %placed, %coordinate, "placed");

        self.finish_action();
        Ok(())
    }

    fn touches_opponent(&self, coordinate: Coordinate, color: Color) -> bool {
        self.board
            .neighbors(coordinate)
            .slots()
            .iter()
            .any(|p| p.color() == Some(color.opponent()))
    }

    // ========================================================================
    // MOVE
    // ========================================================================

    /// Move the piece at `src` to `dst` under its species' movement rules
    pub fn move_piece(&mut self, src: Coordinate, dst: Coordinate) -> GameResult<()> {
        self.try_move(src, dst).inspect_err(|err| {
            trace!(%src, %dst, %err, "move rejected");
        })
    }

    fn try_move(&mut self, src: Coordinate, dst: Coordinate) -> GameResult<()> {
        if src == dst {
            return Err(StateError::InvalidCoordinate.into());
        }
        self.ensure_running()?;

        let piece = self.board.cell(src).ok_or(StateError::InvalidCoordinate)?;

        let color = piece.color().ok_or(StateError::UnknownPiece)?;
        if color != self.active {
            return Err(RuleError::NotPlayersTurn.into());
        }

        if self.queen(color).is_none() {
            return Err(RuleError::MustPlaceQueenToMove.into());
        }

        if self.board.neighbors(src).is_pinned() {
            return Err(RuleError::PiecePinned.into());
        }

        if self.features.contains(Feature::PillBugPiece) && self.is_paralyzed(src) {
            return Err(RuleError::PieceParalyzed.into());
        }

        let path = PathValidator::new(&self.board).validate(src, dst, piece)?;
        self.board.move_piece(src, dst).map_err(board_error)?;

        if piece.is_queen() {
            self.set_queen(color, dst);
        }
        self.history.push(Action::moved(piece, src, dst));
        debug!(turn = self.turn, %piece, %src, %dst, steps = path.len().saturating_sub(1), "moved");

        self.finish_action();
        Ok(())
    }

    // ========================================================================
    // PILL BUG
    // ========================================================================

    /// Have the pill bug at `pill_bug` carry an adjacent piece from `src` to
    /// another empty cell `dst` next to it. The carried piece is paralyzed
    /// for the opponent's next action.
    pub fn relocate(
        &mut self,
        pill_bug: Coordinate,
        src: Coordinate,
        dst: Coordinate,
    ) -> GameResult<()> {
        self.try_relocate(pill_bug, src, dst).inspect_err(|err| {
            trace!(%pill_bug, %src, %dst, %err, "relocation rejected");
        })
    }

    fn try_relocate(
        &mut self,
        pill_bug: Coordinate,
        src: Coordinate,
        dst: Coordinate,
    ) -> GameResult<()> {
        self.ensure_running()?;

        if !self.features.contains(Feature::PillBugPiece) {
            return Err(StateError::FeatureDisabled.into());
        }

        let carrier = self.board.cell(pill_bug).ok_or(StateError::InvalidCoordinate)?;
        let color = carrier.color().ok_or(StateError::UnknownPiece)?;
        if color != self.active {
            return Err(RuleError::NotPlayersTurn.into());
        }
        if !self.acts_as_pill_bug(pill_bug, carrier) {
            return Err(RuleError::NotAPillBug.into());
        }

        let target = self.board.cell(src).ok_or(StateError::InvalidCoordinate)?;
        if !src.is_adjacent(pill_bug) || src.h() != 0 {
            return Err(RuleError::NotAdjacentToPillBug.into());
        }
        if !dst.is_adjacent(pill_bug) || dst.h() != 0 {
            return Err(RuleError::NotAdjacentToPillBug.into());
        }
        if self.board.is_occupied(dst) {
            return Err(RuleError::MayNotPlaceAPieceOnAPiece.into());
        }

        if self.is_paralyzed(pill_bug) || self.is_paralyzed(src) {
            return Err(RuleError::PieceParalyzed.into());
        }
        if !self.board.neighbors(src).above().is_zero() {
            return Err(RuleError::PiecePinned.into());
        }
        if self.queen(color).is_none() {
            return Err(RuleError::MustPlaceQueenToMove.into());
        }
        if self.paralyzed.contains_key(&dst) {
            return Err(RuleError::PieceAlreadyParalyzed.into());
        }

        self.board.move_piece(src, dst).map_err(board_error)?;

        // Black's action is followed by a tick, so it needs one extra round
        let rounds = match color {
            Color::White => 1,
            Color::Black => 2,
        };
        self.paralyzed.insert(dst, rounds);

        if let Some(owner) = target.color().filter(|_| target.is_queen()) {
            self.set_queen(owner, dst);
        }
        self.history.push(Action::relocated(target, src, dst));
        debug!(turn = self.turn, %carrier, piece = %target, %src, %dst, "relocated");

        self.finish_action();
        Ok(())
    }

    /// A pill bug, or a mosquito touching one, can carry pieces
    fn acts_as_pill_bug(&self, coordinate: Coordinate, piece: Piece) -> bool {
        if piece.is_pill_bug() {
            return true;
        }
        piece.is_mosquito()
            && coordinate.h() == 0
            && self.board.neighbors(coordinate).planar().iter().any(|p| p.is_pill_bug())
    }

    /// Pieces next to both cells that could have carried a piece between them
    fn carriers(&self, src: Coordinate, dst: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        src.neighbors().filter(move |&c| {
            c.is_adjacent(dst)
                && self
                    .board
                    .cell(c)
                    .is_some_and(|p| p.color() == Some(self.active) && self.acts_as_pill_bug(c, p))
        })
    }

    // ========================================================================
    // REPLAY
    // ========================================================================

    /// Feed a recorded action back through the matching mutator
    pub fn apply(&mut self, action: Action) -> GameResult<()> {
        match action.kind() {
            ActionKind::Placed => self.place(action.piece(), action.dst()),
            ActionKind::Moved => self.move_piece(action.src(), action.dst()),
            ActionKind::Relocated => {
                let candidates: Vec<_> = self.carriers(action.src(), action.dst()).collect();
                let mut last: GameResult<()> = Err(RuleError::NotAPillBug.into());
                for pill_bug in candidates {
                    last = self.relocate(pill_bug, action.src(), action.dst());
                    if last.is_ok() {
                        break;
                    }
                }
                last
            }
        }
    }

    // ========================================================================
    // TURN HANDLING
    // ========================================================================

    fn ensure_running(&self) -> Result<(), StateError> {
        if self.over() {
            return Err(StateError::GameOver);
        }
        Ok(())
    }

    fn set_queen(&mut self, color: Color, coordinate: Coordinate) {
        match color {
            Color::White => self.white_queen = Some(coordinate),
            Color::Black => self.black_queen = Some(coordinate),
        }
    }

    /// Settle the outcome, then hand the turn over
    fn finish_action(&mut self) {
        self.outcome = self.evaluate_outcome();
        if let Some(winner) = self.outcome {
            info!(turn = self.turn, %winner, "game over");
        }
        self.toggle_turn();
    }

    fn toggle_turn(&mut self) {
        match self.active {
            Color::White => self.active = Color::Black,
            Color::Black => {
                self.tick_paralyzed();
                self.active = Color::White;
                self.turn += 1;
            }
        }
    }

    /// Count down every paralysis and free the expired ones
    fn tick_paralyzed(&mut self) {
        self.paralyzed.retain(|_, rounds| {
            *rounds -= 1;
            *rounds > 0
        });
    }

    fn evaluate_outcome(&self) -> Option<Winner> {
        let suffocating = |queen: Option<Coordinate>| {
            queen.is_some_and(|c| self.board.neighbors(c.planar()).is_suffocating())
        };
        match (suffocating(self.white_queen), suffocating(self.black_queen)) {
            (true, true) => Some(Winner::Tie),
            (true, false) => Some(Winner::Black),
            (false, true) => Some(Winner::White),
            (false, false) => None,
        }
    }
}

/// The piece as it lands on the board, numbered by how many of its species
/// have left the inventory
fn numbered(color: Color, species: Species, remaining: Inventory) -> Piece {
    let taken = species.info().population as u32 - remaining.count(species);
    let instance = Instance::from_bits(taken as u8).unwrap_or(Instance::A);
    Piece::new(color, species, instance)
}

fn board_error(err: BoardError) -> GameError {
    match err {
        BoardError::Occupied => RuleError::MayNotPlaceAPieceOnAPiece.into(),
        other => StateError::UnknownBoard(other).into(),
    }
}
