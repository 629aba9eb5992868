use strum::{EnumIter, EnumString, FromRepr, IntoStaticStr};

use crate::error::{Error, Result};

/// Difficulty tier of a beatmap, stored on disk as either its rank or its name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    FromRepr,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum DifficultyRank {
    Easy = 1,
    Normal = 3,
    Hard = 5,
    Expert = 7,
    ExpertPlus = 9,
}

impl DifficultyRank {
    pub fn from_rank(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Parse a numeric rank from a document, rejecting anything outside the enumerated set.
    pub fn from_rank_value(value: u64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(Self::from_rank)
            .ok_or_else(|| Error::InvalidDifficultyRank(value.to_string()))
    }

    /// Parse the difficulty name used on disk (e.g. "ExpertPlus").
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| Error::InvalidDifficultyRank(name.to_string()))
    }

    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Label shown in game when a difficulty has no custom label.
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
            Self::ExpertPlus => "Expert+",
        }
    }
}

impl std::fmt::Display for DifficultyRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.default_label())
    }
}
