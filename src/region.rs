//! Forecast regions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DWD partregion id. For regions without subdivisions the feed reports a
/// partregion id of `-1`; those are keyed by their region id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub i64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl From<i64> for RegionId {
    fn from(id: i64) -> Self {
        RegionId(id)
    }
}

impl FromStr for RegionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RegionId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub partregion_name: Option<String>,
}

impl Region {
    /// "Region - Partregion", or just the region name.
    pub fn label(&self) -> String {
        match &self.partregion_name {
            Some(part) => format!("{} - {}", self.name, part),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_label() {
        let mut region = Region {
            id: RegionId(11),
            name: "Schleswig-Holstein und Hamburg".to_string(),
            partregion_name: Some("Inseln und Marschen".to_string()),
        };
        assert_eq!(region.label(), "Schleswig-Holstein und Hamburg - Inseln und Marschen");

        region.partregion_name = None;
        assert_eq!(region.label(), "Schleswig-Holstein und Hamburg");
    }

    #[test]
    fn test_region_id_display_is_zero_padded() {
        assert_eq!(RegionId(7).to_string(), "07");
        assert_eq!(RegionId(121).to_string(), "121");
    }

    #[test]
    fn test_region_id_from_str() {
        assert_eq!(" 41".parse::<RegionId>(), Ok(RegionId(41)));
        assert!("north".parse::<RegionId>().is_err());
    }
}
