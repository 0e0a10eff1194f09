//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::CivError;

/// Unique identifier for settlements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SettlementId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for population groups (districts and villages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a single population unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulationId(pub Uuid);

impl PopulationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PopulationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Game turn counter
pub type Turn = u32;

/// Tile address in the world grid.
///
/// Rows are bounded; columns wrap around the world cylinder. Locations
/// produced by the grid always carry a normalized column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Settlement size ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum PopulationCenterSize {
    #[default]
    Tiny = 1,
    Small = 2,
    Medium = 3,
    Large = 4,
    Huge = 5,
    Enourmous = 6,
}

impl PopulationCenterSize {
    pub const ALL: [PopulationCenterSize; 6] = [
        PopulationCenterSize::Tiny,
        PopulationCenterSize::Small,
        PopulationCenterSize::Medium,
        PopulationCenterSize::Large,
        PopulationCenterSize::Huge,
        PopulationCenterSize::Enourmous,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Result<Self, CivError> {
        Self::ALL
            .get((ordinal as usize).wrapping_sub(1))
            .copied()
            .ok_or(CivError::InvalidSize(ordinal))
    }

    /// Settlements of this size or larger get an outskirts ring
    pub fn has_outskirts(self) -> bool {
        self >= PopulationCenterSize::Medium
    }
}

impl fmt::Display for PopulationCenterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PopulationCenterSize::Tiny => "tiny",
            PopulationCenterSize::Small => "small",
            PopulationCenterSize::Medium => "medium",
            PopulationCenterSize::Large => "large",
            PopulationCenterSize::Huge => "huge",
            PopulationCenterSize::Enourmous => "enourmous",
        };
        f.write_str(name)
    }
}

impl FromStr for PopulationCenterSize {
    type Err = CivError;

    /// Accepts either the ordinal (`"3"`) or the name (`"medium"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<u8>() {
            return Self::from_ordinal(ordinal);
        }
        Self::ALL
            .into_iter()
            .find(|size| size.to_string().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CivError::Config(format!("unknown settlement size '{trimmed}'")))
    }
}

/// Kind of population group inside a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopulationGroupType {
    District,
    Village,
}

/// Work assignment of a population unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Assignment {
    #[default]
    Unassigned,
    Worker,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_equality_and_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<Location, &str> = HashMap::new();
        map.insert(Location::new(24, 1), "babylon");
        assert_eq!(map.get(&Location::new(24, 1)), Some(&"babylon"));
        assert_ne!(Location::new(24, 1), Location::new(1, 24));
    }

    #[test]
    fn test_size_ordinals() {
        for (idx, size) in PopulationCenterSize::ALL.iter().enumerate() {
            assert_eq!(size.ordinal() as usize, idx + 1);
            assert_eq!(PopulationCenterSize::from_ordinal(idx as u8 + 1).unwrap(), *size);
        }
    }

    #[test]
    fn test_size_ordinal_out_of_range() {
        assert!(matches!(
            PopulationCenterSize::from_ordinal(0),
            Err(CivError::InvalidSize(0))
        ));
        assert!(matches!(
            PopulationCenterSize::from_ordinal(7),
            Err(CivError::InvalidSize(7))
        ));
    }

    #[test]
    fn test_size_ordering() {
        assert!(PopulationCenterSize::Enourmous > PopulationCenterSize::Huge);
        assert!(PopulationCenterSize::Medium > PopulationCenterSize::Small);
        assert!(!PopulationCenterSize::Small.has_outskirts());
        assert!(PopulationCenterSize::Medium.has_outskirts());
    }

    #[test]
    fn test_size_from_str() {
        assert_eq!("medium".parse::<PopulationCenterSize>().unwrap(), PopulationCenterSize::Medium);
        assert_eq!("LARGE".parse::<PopulationCenterSize>().unwrap(), PopulationCenterSize::Large);
        assert_eq!("6".parse::<PopulationCenterSize>().unwrap(), PopulationCenterSize::Enourmous);
        assert!("colossal".parse::<PopulationCenterSize>().is_err());
    }
}
