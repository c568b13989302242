//! Neighbor formations around a single cell
//!
//! A formation is the six planar neighbors (N, NE, SE, S, SW, NW) plus the
//! cell stacked above. Pinning only depends on which planar slots are
//! occupied, so those six are folded into a bit field with N as bit 5 and NW
//! as bit 0:
//!
//! ```text
//!             N  NE SE S  SW NW  DEC
//!   Chevron:  1  0  1  0  1  0   42
//! Spaceship:  1  1  1  0  1  0   58
//! Butterfly:  1  1  0  1  1  0   54
//! ```
//!
//! A shape pins the piece under any rotation, so the table holds every
//! distinct rotation of each shape:
//!
//! ```text
//!   CHEVRON        SPACESHIP      BUTTERFLY
//!  010101 (21)    010111 (23)    011011 (27)
//!  101010 (42)    011101 (29)    101101 (45)
//!                 101011 (43)    110110 (54)
//!                 101110 (46)
//!                 110101 (53)
//!                 111010 (58)
//! ```

use crate::pieces::{Piece, ZERO_PIECE};

/// Index of the stacked-above slot
pub const ABOVE_SLOT: usize = 6;

/// Named pinning shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Chevron,
    Spaceship,
    Butterfly,
}

/// Every rotation of every pinning shape
const PINNING_SHAPES: [(u8, Shape); 11] = [
    (21, Shape::Chevron),
    (42, Shape::Chevron),
    (23, Shape::Spaceship),
    (29, Shape::Spaceship),
    (43, Shape::Spaceship),
    (46, Shape::Spaceship),
    (53, Shape::Spaceship),
    (58, Shape::Spaceship),
    (27, Shape::Butterfly),
    (45, Shape::Butterfly),
    (54, Shape::Butterfly),
];

/// Seven-neighbor snapshot around a coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formation([Piece; 7]);

impl Formation {
    pub fn new(slots: [Piece; 7]) -> Self {
        Self(slots)
    }

    pub fn slots(&self) -> &[Piece; 7] {
        &self.0
    }

    /// The six planar neighbors in clockwise order
    pub fn planar(&self) -> &[Piece] {
        &self.0[..ABOVE_SLOT]
    }

    pub fn above(&self) -> Piece {
        self.0[ABOVE_SLOT]
    }

    /// Occupied planar slots. The above slot is not a contact.
    pub fn contacts(&self) -> usize {
        self.planar().iter().filter(|p| !p.is_zero()).count()
    }

    /// Planar occupancy with N as bit 5 down to NW as bit 0
    pub fn bit_field(&self) -> u8 {
        self.planar()
            .iter()
            .fold(0u8, |field, p| (field << 1) | u8::from(!p.is_zero()))
    }

    /// A queen is suffocating when all six sides are covered
    pub fn is_suffocating(&self) -> bool {
        self.contacts() == 6
    }

    /// A piece is pinned when something sits on it, when five or more sides
    /// are covered, or when its neighbors form a pinning shape.
    pub fn is_pinned(&self) -> bool {
        if self.above() != ZERO_PIECE {
            return true;
        }
        if self.contacts() >= 5 {
            return true;
        }
        self.shape().is_some()
    }

    pub fn can_slide(&self) -> bool {
        !self.is_pinned()
    }

    /// The pinning shape the planar neighbors form, if any
    pub fn shape(&self) -> Option<Shape> {
        let mut field = self.bit_field();
        for _ in 0..3 {
            if let Some(&(_, shape)) = PINNING_SHAPES.iter().find(|(bits, _)| *bits == field) {
                return Some(shape);
            }
            field = rotate_right_lower6(field);
        }
        None
    }
}

/// Rotate the lower six bits of `x` right by one
pub fn rotate_right_lower6(x: u8) -> u8 {
    let mut n = (x & 0b11_1111) >> 1;
    if x & 1 != 0 {
        n |= 1 << 5;
    }
    n
}
