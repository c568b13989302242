//! Hex board geometry with packed cube coordinates plus stack height
//!
//! A coordinate is four signed axes packed into one `u32`, one byte each:
//!
//! ```text
//!     X        Y        Z        H
//! 11111111|11111111|11111111|11111111
//! ```
//!
//! Each byte is sign-magnitude, NOT two's complement: the top bit is the sign
//! flag and the low seven bits hold the magnitude. The representable range per
//! axis is therefore -127..=127. X, Y and Z are cube coordinates over the hex
//! plane (X + Y + Z = 0); H is the height of a piece in a stack.

use std::fmt;

use serde::{Deserialize, Serialize};

const SIGN_BIT: u8 = 0b1000_0000;
const MAGNITUDE: u8 = 0b0111_1111;

/// Packed hex position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i8; 4]", into = "[i8; 4]")]
pub struct Coordinate(u32);

/// The center of the board, where the first piece is placed
pub const ORIGIN: Coordinate = Coordinate(0);

/// Planar neighbor offsets, clockwise
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const NEIGHBOR_OFFSETS: [Coordinate; 6] = [
    Coordinate::new(0, 1, -1, 0),  // N
    Coordinate::new(1, 0, -1, 0),  // NE
    Coordinate::new(1, -1, 0, 0),  // SE
    Coordinate::new(0, -1, 1, 0),  // S
    Coordinate::new(-1, 0, 1, 0),  // SW
    Coordinate::new(-1, 1, 0, 0),  // NW
];

/// Offset of the cell stacked directly on top
pub const ABOVE: Coordinate = Coordinate::new(0, 0, 0, 1);

pub const NORTH: usize = 0;
pub const NORTH_EAST: usize = 1;
pub const SOUTH_EAST: usize = 2;
pub const SOUTH: usize = 3;
pub const SOUTH_WEST: usize = 4;
pub const NORTH_WEST: usize = 5;

const fn encode_axis(v: i8) -> u8 {
    if v < 0 {
        SIGN_BIT | (v.unsigned_abs() & MAGNITUDE)
    } else {
        v as u8
    }
}

const fn decode_axis(b: u8) -> i8 {
    let magnitude = (b & MAGNITUDE) as i8;
    if b & SIGN_BIT != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Clamp an intermediate sum back into the representable range
fn clamp_axis(v: i16) -> i8 {
    v.clamp(-(MAGNITUDE as i16), MAGNITUDE as i16) as i8
}

impl Coordinate {
    /// Pack four axes. Each axis must be within -127..=127.
    pub const fn new(x: i8, y: i8, z: i8, h: i8) -> Self {
        debug_assert!(x != i8::MIN && y != i8::MIN && z != i8::MIN && h != i8::MIN);
        Self(
            (encode_axis(x) as u32) << 24
                | (encode_axis(y) as u32) << 16
                | (encode_axis(z) as u32) << 8
                | encode_axis(h) as u32,
        )
    }

    /// Rebuild a coordinate from its packed form
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Packed form, also used as the map key
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn x(self) -> i8 {
        decode_axis((self.0 >> 24) as u8)
    }

    pub const fn y(self) -> i8 {
        decode_axis((self.0 >> 16) as u8)
    }

    pub const fn z(self) -> i8 {
        decode_axis((self.0 >> 8) as u8)
    }

    pub const fn h(self) -> i8 {
        decode_axis(self.0 as u8)
    }

    /// Component-wise addition, saturating at the edge of the representable range
    pub fn add(self, other: Coordinate) -> Coordinate {
        Coordinate::new(
            clamp_axis(self.x() as i16 + other.x() as i16),
            clamp_axis(self.y() as i16 + other.y() as i16),
            clamp_axis(self.z() as i16 + other.z() as i16),
            clamp_axis(self.h() as i16 + other.h() as i16),
        )
    }

    /// Same hex on the table surface
    pub fn planar(self) -> Coordinate {
        Coordinate::new(self.x(), self.y(), self.z(), 0)
    }

    /// The cell this one rests on. Saturates at the surface.
    pub fn below(self) -> Coordinate {
        Coordinate::new(self.x(), self.y(), self.z(), self.h().saturating_sub(1).max(0))
    }

    /// Get neighbor in direction (0-5), at the same height
    pub fn neighbor(self, direction: usize) -> Coordinate {
        self.add(NEIGHBOR_OFFSETS[direction % 6])
    }

    /// The six planar neighbors in clockwise order starting at north
    pub fn neighbors(self) -> impl Iterator<Item = Coordinate> {
        NEIGHBOR_OFFSETS.into_iter().map(move |offset| self.add(offset))
    }

    /// Hex distance over the plane, ignoring height
    pub fn distance(self, other: Coordinate) -> u32 {
        let dx = (self.x() as i32 - other.x() as i32).unsigned_abs();
        let dy = (self.y() as i32 - other.y() as i32).unsigned_abs();
        let dz = (self.z() as i32 - other.z() as i32).unsigned_abs();
        (dx + dy + dz) / 2
    }

    /// True when both coordinates share a hex edge (height ignored)
    pub fn is_adjacent(self, other: Coordinate) -> bool {
        self.distance(other) == 1
    }
}

/// Decoded input is clamped, so `-128` reads as `-127`
impl From<[i8; 4]> for Coordinate {
    fn from(axes: [i8; 4]) -> Self {
        let [x, y, z, h] = axes.map(|v| v.max(-127));
        Coordinate::new(x, y, z, h)
    }
}

impl From<Coordinate> for [i8; 4] {
    fn from(c: Coordinate) -> Self {
        [c.x(), c.y(), c.z(), c.h()]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x(), self.y(), self.z(), self.h())
    }
}
