//! Pollen kinds and forecast horizons.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight pollen kinds covered by the DWD forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollenType {
    #[serde(alias = "birke")]
    Birch,
    #[serde(alias = "graeser")]
    Grasses,
    #[serde(alias = "esche")]
    Ash,
    #[serde(alias = "erle")]
    Alder,
    #[serde(alias = "hasel")]
    Hazel,
    #[serde(alias = "beifuss")]
    Mugwort,
    #[serde(alias = "ambrosia")]
    Ragweed,
    #[serde(alias = "roggen")]
    Rye,
}

impl PollenType {
    pub const ALL: [PollenType; 8] = [
        PollenType::Birch,
        PollenType::Grasses,
        PollenType::Ash,
        PollenType::Alder,
        PollenType::Hazel,
        PollenType::Mugwort,
        PollenType::Ragweed,
        PollenType::Rye,
    ];

    /// Key used in the feed's `Pollen` map.
    pub fn feed_name(self) -> &'static str {
        match self {
            PollenType::Birch => "Birke",
            PollenType::Grasses => "Graeser",
            PollenType::Ash => "Esche",
            PollenType::Alder => "Erle",
            PollenType::Hazel => "Hasel",
            PollenType::Mugwort => "Beifuss",
            PollenType::Ragweed => "Ambrosia",
            PollenType::Rye => "Roggen",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            PollenType::Birch => "birch",
            PollenType::Grasses => "grasses",
            PollenType::Ash => "ash",
            PollenType::Alder => "alder",
            PollenType::Hazel => "hazel",
            PollenType::Mugwort => "mugwort",
            PollenType::Ragweed => "ragweed",
            PollenType::Rye => "rye",
        }
    }

    /// Resolves a feed key or an English name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|p| {
            p.feed_name().eq_ignore_ascii_case(name) || p.english_name().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for PollenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pollen type '{0}'")]
pub struct ParsePollenError(String);

impl FromStr for PollenType {
    type Err = ParsePollenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParsePollenError(s.to_string()))
    }
}

/// Forecast horizon relative to the feed's last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOffset {
    Today,
    Tomorrow,
    #[serde(rename = "dayafter_tomorrow", alias = "dayafter_to", alias = "day_after_tomorrow")]
    DayAfterTomorrow,
}

impl DayOffset {
    pub const ALL: [DayOffset; 3] = [DayOffset::Today, DayOffset::Tomorrow, DayOffset::DayAfterTomorrow];

    pub fn days(self) -> u64 {
        match self {
            DayOffset::Today => 0,
            DayOffset::Tomorrow => 1,
            DayOffset::DayAfterTomorrow => 2,
        }
    }

    /// Calendar date this offset points at when counted from `base`.
    pub fn date_from(self, base: NaiveDate) -> NaiveDate {
        base.checked_add_days(Days::new(self.days())).unwrap_or(NaiveDate::MAX)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOffset::Today => "today",
            DayOffset::Tomorrow => "tomorrow",
            DayOffset::DayAfterTomorrow => "dayafter_tomorrow",
        }
    }
}

impl fmt::Display for DayOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day '{0}', expected today, tomorrow or dayafter_tomorrow")]
pub struct ParseDayError(String);

impl FromStr for DayOffset {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "0" => Ok(DayOffset::Today),
            "tomorrow" | "1" => Ok(DayOffset::Tomorrow),
            "dayafter_tomorrow" | "day_after_tomorrow" | "dayafter_to" | "2" => {
                Ok(DayOffset::DayAfterTomorrow)
            }
            _ => Err(ParseDayError(s.to_string())),
        }
    }
}
