//! Optional rules toggled when a game is created

use serde::{Deserialize, Serialize};

/// Rules beyond the base game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Feature {
    LadybugPiece = 1 << 0,
    PillBugPiece = 1 << 1,
    MosquitoPiece = 1 << 2,
    TournamentQueensRule = 1 << 3,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::LadybugPiece,
        Feature::PillBugPiece,
        Feature::MosquitoPiece,
        Feature::TournamentQueensRule,
    ];
}

/// Fixed-size set of enabled features
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Feature>", into = "Vec<Feature>")]
pub struct Features(u8);

impl Features {
    /// Base game only
    pub const fn none() -> Self {
        Self(0)
    }

    /// Every expansion piece plus tournament rules
    pub fn all() -> Self {
        Feature::ALL.into_iter().collect()
    }

    pub fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature as u8)
    }

    pub fn contains(self, feature: Feature) -> bool {
        self.0 & feature as u8 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |&f| self.contains(f))
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Features::none(), Features::with)
    }
}

impl From<Vec<Feature>> for Features {
    fn from(features: Vec<Feature>) -> Self {
        features.into_iter().collect()
    }
}

impl From<Features> for Vec<Feature> {
    fn from(features: Features) -> Self {
        features.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_set() {
        let features = Features::none().with(Feature::PillBugPiece);
        assert!(features.contains(Feature::PillBugPiece));
        assert!(!features.contains(Feature::LadybugPiece));
        assert!(Features::none().is_empty());
        assert_eq!(Features::all().iter().count(), 4);
    }

    #[test]
    fn test_serde_as_list() {
        let features: Features = [Feature::MosquitoPiece, Feature::TournamentQueensRule]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&features).unwrap();
        assert_eq!(json, r#"["mosquito_piece","tournament_queens_rule"]"#);
        let back: Features = serde_json::from_str(&json).unwrap();
        assert_eq!(back, features);
    }
}
