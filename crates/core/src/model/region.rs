//! Fixed state-to-region classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sales region derived from a shipping state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    West,
    East,
    South,
    Other,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::West => "West",
            Region::East => "East",
            Region::South => "South",
            Region::Other => "Other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "West" => Ok(Region::West),
            "East" => Ok(Region::East),
            "South" => Ok(Region::South),
            "Other" => Ok(Region::Other),
            other => Err(format!("unknown region: {}", other)),
        }
    }
}

/// Map a state code to its region. Unknown or missing states are `Other`.
pub fn region_for_state(state: Option<&str>) -> Region {
    match state {
        Some("CA") | Some("OR") | Some("WA") => Region::West,
        Some("NY") | Some("NJ") | Some("PA") => Region::East,
        Some("TX") | Some("AZ") | Some("NM") => Region::South,
        _ => Region::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_mapping() {
        assert_eq!(region_for_state(Some("CA")), Region::West);
        assert_eq!(region_for_state(Some("OR")), Region::West);
        assert_eq!(region_for_state(Some("WA")), Region::West);
        assert_eq!(region_for_state(Some("NY")), Region::East);
        assert_eq!(region_for_state(Some("NJ")), Region::East);
        assert_eq!(region_for_state(Some("PA")), Region::East);
        assert_eq!(region_for_state(Some("TX")), Region::South);
        assert_eq!(region_for_state(Some("AZ")), Region::South);
        assert_eq!(region_for_state(Some("NM")), Region::South);
    }

    #[test]
    fn test_unknown_state_is_other() {
        assert_eq!(region_for_state(Some("IL")), Region::Other);
        assert_eq!(region_for_state(Some("")), Region::Other);
        assert_eq!(region_for_state(None), Region::Other);
    }

    #[test]
    fn test_round_trip_str() {
        for region in [Region::West, Region::East, Region::South, Region::Other] {
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
        }
    }
}
