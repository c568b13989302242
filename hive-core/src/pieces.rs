//! Piece encoding and species definitions
//!
//! A piece is packed into one `u32`:
//!
//! ```text
//!   Color  | Species | Instance | Reserved
//! 11111111|11111111|11111111|11111111
//! ```
//!
//! A zero byte means "none" for that field. The all-zero value is
//! [`ZERO_PIECE`], the empty-cell sentinel returned by neighbor lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Black = 1,
    White = 2,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn from_bits(bits: u8) -> Option<Color> {
        match bits {
            1 => Some(Color::Black),
            2 => Some(Color::White),
            _ => None,
        }
    }

    /// Single-letter prefix used in piece notation
    pub fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Bug species
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Species {
    Queen = 1,
    Beetle = 2,
    Grasshopper = 3,
    Spider = 4,
    Ant = 5,
    Mosquito = 6,
    Ladybug = 7,
    PillBug = 8,
}

/// Static description of a species
#[derive(Clone, Debug)]
pub struct SpeciesInfo {
    pub species: Species,
    pub letter: char,
    pub name: &'static str,
    /// Pieces of this species each player starts with
    pub population: u8,
    /// Expansion pieces only exist when their feature is enabled
    pub expansion: bool,
}

impl SpeciesInfo {
    const fn new(
        species: Species,
        letter: char,
        name: &'static str,
        population: u8,
        expansion: bool,
    ) -> Self {
        Self {
            species,
            letter,
            name,
            population,
            expansion,
        }
    }
}

/// All 8 species, indexed by `species as usize - 1`
pub static SPECIES: [SpeciesInfo; 8] = [
    SpeciesInfo::new(Species::Queen, 'Q', "Queen", 1, false),
    SpeciesInfo::new(Species::Beetle, 'B', "Beetle", 2, false),
    SpeciesInfo::new(Species::Grasshopper, 'G', "Grasshopper", 3, false),
    SpeciesInfo::new(Species::Spider, 'S', "Spider", 2, false),
    SpeciesInfo::new(Species::Ant, 'A', "Ant", 3, false),
    SpeciesInfo::new(Species::Mosquito, 'M', "Mosquito", 1, true),
    SpeciesInfo::new(Species::Ladybug, 'L', "Ladybug", 1, true),
    SpeciesInfo::new(Species::PillBug, 'P', "Pill Bug", 1, true),
];

impl Species {
    pub fn from_bits(bits: u8) -> Option<Species> {
        SPECIES.get((bits as usize).wrapping_sub(1)).map(|info| info.species)
    }

    pub fn from_letter(letter: char) -> Option<Species> {
        SPECIES.iter().find(|info| info.letter == letter).map(|info| info.species)
    }

    pub fn info(self) -> &'static SpeciesInfo {
        &SPECIES[self as usize - 1]
    }

    /// Every species in table order
    pub fn all() -> impl Iterator<Item = Species> {
        SPECIES.iter().map(|info| info.species)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

/// Disambiguates otherwise identical pieces (Ant 1/2/3)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Instance {
    A = 1,
    B = 2,
    C = 3,
}

impl Instance {
    pub fn from_bits(bits: u8) -> Option<Instance> {
        match bits {
            1 => Some(Instance::A),
            2 => Some(Instance::B),
            3 => Some(Instance::C),
            _ => None,
        }
    }
}

/// Packed piece value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Piece(u32);

/// The empty-cell sentinel. Never placeable.
pub const ZERO_PIECE: Piece = Piece(0);

impl Piece {
    pub const fn new(color: Color, species: Species, instance: Instance) -> Self {
        Self((color as u32) << 24 | (species as u32) << 16 | (instance as u32) << 8)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn color(self) -> Option<Color> {
        Color::from_bits((self.0 >> 24) as u8)
    }

    pub fn species(self) -> Option<Species> {
        Species::from_bits((self.0 >> 16) as u8)
    }

    pub fn instance(self) -> Option<Instance> {
        Instance::from_bits((self.0 >> 8) as u8)
    }

    pub fn is_zero(self) -> bool {
        self == ZERO_PIECE
    }

    pub fn is_black(self) -> bool {
        self.color() == Some(Color::Black)
    }

    pub fn is_white(self) -> bool {
        self.color() == Some(Color::White)
    }

    pub fn is_queen(self) -> bool {
        self.species() == Some(Species::Queen)
    }

    pub fn is_beetle(self) -> bool {
        self.species() == Some(Species::Beetle)
    }

    pub fn is_grasshopper(self) -> bool {
        self.species() == Some(Species::Grasshopper)
    }

    pub fn is_spider(self) -> bool {
        self.species() == Some(Species::Spider)
    }

    pub fn is_ant(self) -> bool {
        self.species() == Some(Species::Ant)
    }

    pub fn is_mosquito(self) -> bool {
        self.species() == Some(Species::Mosquito)
    }

    pub fn is_ladybug(self) -> bool {
        self.species() == Some(Species::Ladybug)
    }

    pub fn is_pill_bug(self) -> bool {
        self.species() == Some(Species::PillBug)
    }
}

impl fmt::Display for Piece {
    /// Short notation: color letter, species letter, instance number (`wQ`, `bA2`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.color(), self.species()) {
            (Some(color), Some(species)) => {
                write!(f, "{}{}", color.letter(), species.info().letter)?;
                if let Some(instance) = self.instance() {
                    write!(f, "{}", instance as u8)?;
                }
                Ok(())
            }
            _ => write!(f, "--"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePieceError {
    #[error("piece notation is empty")]
    Empty,

    #[error("unknown color in piece notation: {0:?}")]
    UnknownColor(String),

    #[error("unknown species in piece notation: {0:?}")]
    UnknownSpecies(String),

    #[error("unknown instance in piece notation: {0:?}")]
    UnknownInstance(String),
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    /// Parse `wQ`, `bA2`, `wB1`. A missing instance number means instance 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();

        let color = match chars.next() {
            None => return Err(ParsePieceError::Empty),
            Some('w') | Some('W') => Color::White,
            Some('b') | Some('B') => Color::Black,
            Some(_) => return Err(ParsePieceError::UnknownColor(s.to_string())),
        };

        let species = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .and_then(Species::from_letter)
            .ok_or_else(|| ParsePieceError::UnknownSpecies(s.to_string()))?;

        let instance = match chars.as_str() {
            "" => Instance::A,
            rest => rest
                .parse::<u8>()
                .ok()
                .and_then(Instance::from_bits)
                .ok_or_else(|| ParsePieceError::UnknownInstance(s.to_string()))?,
        };

        Ok(Piece::new(color, species, instance))
    }
}

impl TryFrom<String> for Piece {
    type Error = ParsePieceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Piece> for String {
    fn from(p: Piece) -> Self {
        p.to_string()
    }
}
