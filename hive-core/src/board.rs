//! The playing surface: which piece sits at which coordinate
//!
//! Cells are kept in placement order so renderers can iterate them, with a
//! coordinate index beside them for O(1) lookups and moves.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, ABOVE, NEIGHBOR_OFFSETS};
use crate::error::BoardError;
use crate::formation::{Formation, ABOVE_SLOT};
use crate::pieces::{Piece, ZERO_PIECE};

/// A piece and where it sits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub coordinate: Coordinate,
}

/// Occupied coordinates (sparse representation)
#[derive(Clone, Debug, Default)]
pub struct Board {
    /// Placement order, read by renderers
    cells: Vec<PlacedPiece>,

    /// Coordinate -> index into `cells`
    index: FxHashMap<Coordinate, usize>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a piece on an empty coordinate. No rules are checked here.
    pub fn place(&mut self, piece: Piece, coordinate: Coordinate) -> Result<(), BoardError> {
        if self.index.contains_key(&coordinate) {
            return Err(BoardError::Occupied);
        }
        self.cells.push(PlacedPiece { piece, coordinate });
        self.index.insert(coordinate, self.cells.len() - 1);
        Ok(())
    }

    /// Relocate the piece at `src` to the empty coordinate `dst`
    pub fn move_piece(&mut self, src: Coordinate, dst: Coordinate) -> Result<(), BoardError> {
        let idx = *self.index.get(&src).ok_or(BoardError::InvalidCoordinate)?;
        if self.index.contains_key(&dst) {
            return Err(BoardError::Occupied);
        }
        self.index.remove(&src);
        self.cells[idx].coordinate = dst;
        self.index.insert(dst, idx);
        Ok(())
    }

    /// Get piece at coordinate
    pub fn cell(&self, coordinate: Coordinate) -> Option<Piece> {
        self.index.get(&coordinate).map(|&idx| self.cells[idx].piece)
    }

    pub fn is_occupied(&self, coordinate: Coordinate) -> bool {
        self.index.contains_key(&coordinate)
    }

    /// The six planar neighbors and the cell above. Empty cells are `ZERO_PIECE`.
    pub fn neighbors(&self, coordinate: Coordinate) -> Formation {
        let mut slots = [ZERO_PIECE; 7];
        for (slot, offset) in slots.iter_mut().zip(NEIGHBOR_OFFSETS) {
            *slot = self.cell(coordinate.add(offset)).unwrap_or(ZERO_PIECE);
        }
        slots[ABOVE_SLOT] = self.cell(coordinate.add(ABOVE)).unwrap_or(ZERO_PIECE);
        Formation::new(slots)
    }

    /// Number of pieces stacked in the hex column of `coordinate`
    pub fn column_height(&self, coordinate: Coordinate) -> i8 {
        let mut cell = coordinate.planar();
        let mut height = 0;
        while self.is_occupied(cell) {
            height += 1;
            cell = cell.add(ABOVE);
        }
        height
    }

    /// The piece on top of the hex column of `coordinate`
    pub fn top(&self, coordinate: Coordinate) -> Option<Piece> {
        let height = self.column_height(coordinate);
        if height == 0 {
            return None;
        }
        let base = coordinate.planar();
        self.cell(Coordinate::new(base.x(), base.y(), base.z(), height - 1))
    }

    /// Read-only snapshot for renderers
    pub fn pieces(&self) -> &[PlacedPiece] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
