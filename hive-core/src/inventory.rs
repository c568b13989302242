//! Pieces a player has not yet placed
//!
//! The inventory is a 16-bit value:
//!
//! ```text
//!   . Unused  (Q)ueen  (A)nt x3  (G)rasshopper x3  (B)eetle x2
//!   (S)pider x2  (M)osquito  (L)adybug  (P)ill bug
//!
//!   ..QA|AAGG|GBBS|SMLP
//! ```
//!
//! A count is the number of set bits in a species' field. Taking a piece
//! returns a new inventory with exactly one bit cleared: the highest set bit
//! of the field for multi-count species, the single bit otherwise.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::features::{Feature, Features};
use crate::pieces::Species;

const QUEEN_MASK: u16 = 0b0010_0000_0000_0000;
const ANTS_MASK: u16 = 0b0001_1100_0000_0000;
const GRASSHOPPERS_MASK: u16 = 0b0000_0011_1000_0000;
const BEETLES_MASK: u16 = 0b0000_0000_0110_0000;
const SPIDERS_MASK: u16 = 0b0000_0000_0001_1000;
const MOSQUITO_MASK: u16 = 0b0000_0000_0000_0100;
const LADYBUG_MASK: u16 = 0b0000_0000_0000_0010;
const PILL_BUG_MASK: u16 = 0b0000_0000_0000_0001;

const BASE_GAME: u16 = QUEEN_MASK | ANTS_MASK | GRASSHOPPERS_MASK | BEETLES_MASK | SPIDERS_MASK;

/// Immutable per-player piece pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory(u16);

impl Inventory {
    /// Every piece, expansions included
    pub const fn full() -> Self {
        Self(BASE_GAME | MOSQUITO_MASK | LADYBUG_MASK | PILL_BUG_MASK)
    }

    /// Base game pieces plus the expansion pieces the features enable
    pub fn for_features(features: Features) -> Self {
        let mut bits = BASE_GAME;
        if features.contains(Feature::MosquitoPiece) {
            bits |= MOSQUITO_MASK;
        }
        if features.contains(Feature::LadybugPiece) {
            bits |= LADYBUG_MASK;
        }
        if features.contains(Feature::PillBugPiece) {
            bits |= PILL_BUG_MASK;
        }
        Self(bits)
    }

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn has_queen(self) -> bool {
        self.0 & QUEEN_MASK != 0
    }

    pub fn ant_count(self) -> u32 {
        (self.0 & ANTS_MASK).count_ones()
    }

    pub fn grasshopper_count(self) -> u32 {
        (self.0 & GRASSHOPPERS_MASK).count_ones()
    }

    pub fn beetle_count(self) -> u32 {
        (self.0 & BEETLES_MASK).count_ones()
    }

    pub fn spider_count(self) -> u32 {
        (self.0 & SPIDERS_MASK).count_ones()
    }

    pub fn has_mosquito(self) -> bool {
        self.0 & MOSQUITO_MASK != 0
    }

    pub fn has_ladybug(self) -> bool {
        self.0 & LADYBUG_MASK != 0
    }

    pub fn has_pill_bug(self) -> bool {
        self.0 & PILL_BUG_MASK != 0
    }

    /// Remaining pieces of a species
    pub fn count(self, species: Species) -> u32 {
        (self.0 & mask(species)).count_ones()
    }

    /// Species with at least one piece left, in table order
    pub fn available(self) -> impl Iterator<Item = Species> {
        Species::all().filter(move |&s| self.count(s) > 0)
    }

    pub fn take_queen(self) -> Result<Self, RuleError> {
        self.take_from(QUEEN_MASK)
    }

    pub fn take_ant(self) -> Result<Self, RuleError> {
        self.take_from(ANTS_MASK)
    }

    pub fn take_grasshopper(self) -> Result<Self, RuleError> {
        self.take_from(GRASSHOPPERS_MASK)
    }

    pub fn take_beetle(self) -> Result<Self, RuleError> {
        self.take_from(BEETLES_MASK)
    }

    pub fn take_spider(self) -> Result<Self, RuleError> {
        self.take_from(SPIDERS_MASK)
    }

    pub fn take_mosquito(self) -> Result<Self, RuleError> {
        self.take_from(MOSQUITO_MASK)
    }

    pub fn take_ladybug(self) -> Result<Self, RuleError> {
        self.take_from(LADYBUG_MASK)
    }

    pub fn take_pill_bug(self) -> Result<Self, RuleError> {
        self.take_from(PILL_BUG_MASK)
    }

    /// Dispatch to the `take_*` for a species
    pub fn take(self, species: Species) -> Result<Self, RuleError> {
        match species {
            Species::Queen => self.take_queen(),
            Species::Ant => self.take_ant(),
            Species::Grasshopper => self.take_grasshopper(),
            Species::Beetle => self.take_beetle(),
            Species::Spider => self.take_spider(),
            Species::Mosquito => self.take_mosquito(),
            Species::Ladybug => self.take_ladybug(),
            Species::PillBug => self.take_pill_bug(),
        }
    }

    fn take_from(self, field_mask: u16) -> Result<Self, RuleError> {
        let field = self.0 & field_mask;
        if field == 0 {
            return Err(RuleError::NoPieceAvailable);
        }
        let highest = 1u16 << (15 - field.leading_zeros());
        Ok(Self(self.0 & !highest))
    }
}

fn mask(species: Species) -> u16 {
    match species {
        Species::Queen => QUEEN_MASK,
        Species::Ant => ANTS_MASK,
        Species::Grasshopper => GRASSHOPPERS_MASK,
        Species::Beetle => BEETLES_MASK,
        Species::Spider => SPIDERS_MASK,
        Species::Mosquito => MOSQUITO_MASK,
        Species::Ladybug => LADYBUG_MASK,
        Species::PillBug => PILL_BUG_MASK,
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queen: {}, Ant(s): {}, Grasshopper(s): {}, Beetle(s): {}, Spider(s): {}, Mosquito: {}, Ladybug: {}, Pill Bug: {}",
            self.has_queen(),
            self.ant_count(),
            self.grasshopper_count(),
            self.beetle_count(),
            self.spider_count(),
            self.has_mosquito(),
            self.has_ladybug(),
            self.has_pill_bug()
        )
    }
}
