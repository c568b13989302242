//! History entries
//!
//! An action is packed into 96 bits:
//!
//! ```text
//!    Act   |          Piece           |
//! 11111111|11111111|11111111|11111111|
//!
//!            Source Coordinate        |         Destination Coordinate
//! 11111111|11111111|11111111|11111111|11111111|11111111|11111111|11111111
//! ```
//!
//! The piece's reserved low byte is dropped to make room for the act.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, ORIGIN};
use crate::pieces::Piece;

/// What kind of action was taken
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ActionKind {
    Placed = 0,
    Moved = 1,
    /// Moved by an adjacent pill bug
    Relocated = 2,
}

impl ActionKind {
    fn from_bits(bits: u8) -> ActionKind {
        match bits {
            0 => ActionKind::Placed,
            1 => ActionKind::Moved,
            _ => ActionKind::Relocated,
        }
    }
}

/// One immutable history entry
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ActionRecord", into = "ActionRecord")]
pub struct Action {
    act: u32,
    transition: u64,
}

impl Action {
    pub fn new(kind: ActionKind, piece: Piece, src: Coordinate, dst: Coordinate) -> Self {
        Self {
            act: (kind as u32) << 24 | piece.bits() >> 8,
            transition: (src.bits() as u64) << 32 | dst.bits() as u64,
        }
    }

    /// A placement has no source
    pub fn placed(piece: Piece, dst: Coordinate) -> Self {
        Self::new(ActionKind::Placed, piece, ORIGIN, dst)
    }

    pub fn moved(piece: Piece, src: Coordinate, dst: Coordinate) -> Self {
        Self::new(ActionKind::Moved, piece, src, dst)
    }

    pub fn relocated(piece: Piece, src: Coordinate, dst: Coordinate) -> Self {
        Self::new(ActionKind::Relocated, piece, src, dst)
    }

    pub fn kind(&self) -> ActionKind {
        ActionKind::from_bits((self.act >> 24) as u8)
    }

    pub fn piece(&self) -> Piece {
        Piece::from_bits(self.act << 8)
    }

    pub fn src(&self) -> Coordinate {
        Coordinate::from_bits((self.transition >> 32) as u32)
    }

    pub fn dst(&self) -> Coordinate {
        Coordinate::from_bits(self.transition as u32)
    }

    pub fn was_placed(&self) -> bool {
        self.kind() == ActionKind::Placed
    }

    pub fn was_moved(&self) -> bool {
        matches!(self.kind(), ActionKind::Moved | ActionKind::Relocated)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind())
            .field("piece", &self.piece())
            .field("src", &self.src())
            .field("dst", &self.dst())
            .finish()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ActionKind::Placed => write!(f, "{} placed at {}", self.piece(), self.dst()),
            ActionKind::Moved => write!(f, "{} moved {} -> {}", self.piece(), self.src(), self.dst()),
            ActionKind::Relocated => {
                write!(f, "{} relocated {} -> {}", self.piece(), self.src(), self.dst())
            }
        }
    }
}

/// Unpacked form used on the wire
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct ActionRecord {
    kind: ActionKind,
    piece: Piece,
    #[serde(default = "origin")]
    src: Coordinate,
    dst: Coordinate,
}

fn origin() -> Coordinate {
    ORIGIN
}

impl From<ActionRecord> for Action {
    fn from(r: ActionRecord) -> Self {
        Action::new(r.kind, r.piece, r.src, r.dst)
    }
}

impl From<Action> for ActionRecord {
    fn from(a: Action) -> Self {
        ActionRecord {
            kind: a.kind(),
            piece: a.piece(),
            src: a.src(),
            dst: a.dst(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{Color, Instance, Species};

    #[test]
    fn test_fields_survive_packing() {
        let piece = Piece::new(Color::Black, Species::Spider, Instance::B);
        let src = Coordinate::new(-3, 1, 2, 0);
        let dst = Coordinate::new(-2, 1, 1, 1);

        let action = Action::moved(piece, src, dst);
        assert_eq!(action.kind(), ActionKind::Moved);
        assert_eq!(action.piece(), piece);
        assert_eq!(action.src(), src);
        assert_eq!(action.dst(), dst);
        assert!(action.was_moved() && !action.was_placed());
    }

    #[test]
    fn test_placed_has_zero_source() {
        let piece = Piece::new(Color::White, Species::Queen, Instance::A);
        let action = Action::placed(piece, Coordinate::new(1, -1, 0, 0));
        assert!(action.was_placed());
        assert_eq!(action.src(), ORIGIN);
    }

    #[test]
    fn test_json_shape() {
        let piece = Piece::new(Color::White, Species::Ant, Instance::C);
        let action = Action::placed(piece, Coordinate::new(0, -1, 1, 0));
        let json = serde_json::to_value(action).unwrap();
        assert_eq!(json["kind"], "placed");
        assert_eq!(json["piece"], "wA3");
        assert_eq!(json["dst"], serde_json::json!([0, -1, 1, 0]));

        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_source_defaults_for_placements() {
        let json = r#"{"kind":"placed","piece":"bQ","dst":[1,-1,0,0]}"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(action.src(), ORIGIN);
        assert_eq!(action.piece().to_string(), "bQ1");
    }
}
