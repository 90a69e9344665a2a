//! Severity codes as published by the feed and the internal level scale.

use serde::Serialize;
use std::fmt;

/// Feed code meaning "no forecast available".
pub const NO_DATA_CODE: &str = "-1";

/// Description always registered for [`NO_DATA_CODE`].
pub const NO_DATA_DESCRIPTION: &str = "n/a";

/// Feed codes in ascending order of load. The index of a code is its level.
const LEVEL_CODES: [&str; 7] = ["0", "0-1", "1", "1-2", "2", "2-3", "3"];

/// Normalized pollen load, `0..7` (0 = none, 6 = high).
///
/// "Unknown" is expressed as `Option<SeverityLevel>::None`, never as a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SeverityLevel(u8);

impl SeverityLevel {
    /// Number of levels on the scale.
    pub const COUNT: u8 = LEVEL_CODES.len() as u8;

    pub const MIN: SeverityLevel = SeverityLevel(0);
    pub const MAX: SeverityLevel = SeverityLevel(Self::COUNT - 1);

    /// Returns the level for `value`, or `None` if it lies outside the scale.
    pub fn new(value: u8) -> Option<Self> {
        (value < Self::COUNT).then_some(SeverityLevel(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Maps a feed code onto the scale. The no-data code and codes outside the
    /// scale yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        LEVEL_CODES
            .iter()
            .position(|c| *c == code.trim())
            .map(|i| SeverityLevel(i as u8))
    }

    /// The feed code this level was derived from.
    pub fn code(self) -> &'static str {
        LEVEL_CODES[self.0 as usize]
    }

    /// All levels in ascending order.
    pub fn all() -> impl Iterator<Item = SeverityLevel> {
        (0..Self::COUNT).map(SeverityLevel)
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mapping() {
        assert_eq!(SeverityLevel::from_code("0"), SeverityLevel::new(0));
        assert_eq!(SeverityLevel::from_code("0-1"), SeverityLevel::new(1));
        assert_eq!(SeverityLevel::from_code("1-2"), SeverityLevel::new(3));
        assert_eq!(SeverityLevel::from_code("2-3"), SeverityLevel::new(5));
        assert_eq!(SeverityLevel::from_code("3"), SeverityLevel::new(6));
    }

    #[test]
    fn test_unmapped_codes_are_unknown() {
        assert_eq!(SeverityLevel::from_code(NO_DATA_CODE), None);
        assert_eq!(SeverityLevel::from_code("4"), None);
        assert_eq!(SeverityLevel::from_code(""), None);
        assert_eq!(SeverityLevel::from_code("keine Belastung"), None);
    }

    #[test]
    fn test_level_code_round_trip() {
        for level in SeverityLevel::all() {
            assert_eq!(SeverityLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(SeverityLevel::all().count(), 7);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(SeverityLevel::new(6), Some(SeverityLevel::MAX));
        assert_eq!(SeverityLevel::new(7), None);
    }
}
