use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::map::DifficultyRank;

/// Which way a value was moved to fit its bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Raised(f64),
    Lowered(f64),
}

impl Adjustment {
    pub fn value(&self) -> f64 {
        match self {
            Self::Raised(value) | Self::Lowered(value) => *value,
        }
    }
}

/// Optional inclusive bounds for one difficulty rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClampBounds {
    #[serde(rename = "Minimum", alias = "minimum", default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(rename = "Maximum", alias = "maximum", default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl ClampBounds {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    /// The value `value` must be moved to, or `None` if it is within bounds.
    pub fn check(&self, value: f64) -> Option<Adjustment> {
        if let Some(minimum) = self.minimum
            && value < minimum
        {
            return Some(Adjustment::Raised(minimum));
        }
        if let Some(maximum) = self.maximum
            && value > maximum
        {
            return Some(Adjustment::Lowered(maximum));
        }
        None
    }
}

/// Bounds keyed by difficulty rank, serialized with the rank as a string ("9").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClampTable(BTreeMap<String, ClampBounds>);

impl ClampTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, rank: DifficultyRank, bounds: ClampBounds) -> Self {
        self.0.insert(rank.rank().to_string(), bounds);
        self
    }

    /// Bounds configured for `rank`; unconfigured ranks are unconstrained.
    pub fn bounds(&self, rank: DifficultyRank) -> Option<&ClampBounds> {
        self.0.get(&rank.rank().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check() {
        let bounds = ClampBounds::new(17.0, 19.0);
        assert_eq!(bounds.check(16.0), Some(Adjustment::Raised(17.0)));
        assert_eq!(bounds.check(20.5), Some(Adjustment::Lowered(19.0)));
        assert_eq!(bounds.check(17.0), None);
        assert_eq!(bounds.check(19.0), None);
    }

    #[test]
    fn test_one_sided_bounds() {
        let bounds = ClampBounds {
            minimum: None,
            maximum: Some(700.0),
        };
        assert_eq!(bounds.check(10.0), None);
        assert_eq!(bounds.check(800.0), Some(Adjustment::Lowered(700.0)));
    }

    #[test]
    fn test_table_lookup_by_rank() {
        let table = ClampTable::new().with_bounds(DifficultyRank::ExpertPlus, ClampBounds::new(18.0, 20.0));
        assert!(table.bounds(DifficultyRank::ExpertPlus).is_some());
        assert!(table.bounds(DifficultyRank::Expert).is_none());
    }

    #[test]
    fn test_table_accepts_both_key_cases() {
        let table: ClampTable =
            serde_json::from_str(r#"{"7": {"Minimum": 600}, "9": {"minimum": 500, "maximum": 650}}"#).unwrap();
        assert_eq!(table.bounds(DifficultyRank::Expert).unwrap().minimum, Some(600.0));
        assert_eq!(
            table.bounds(DifficultyRank::ExpertPlus),
            Some(&ClampBounds::new(500.0, 650.0))
        );
    }
}
