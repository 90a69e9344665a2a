//! Wire format of the DWD pollen feed (`s31fg.json`).
//!
//! ```json
//! {
//!   "last_update": "2024-04-04 11:00 Uhr",
//!   "next_update": "2024-04-05 11:00 Uhr",
//!   "legend": { "id1": "0", "id1_desc": "keine Belastung", ... },
//!   "content": [
//!     { "region_id": 10, "region_name": "...", "partregion_id": 11,
//!       "partregion_name": "...",
//!       "Pollen": { "Birke": { "today": "1", "tomorrow": "1-2", "dayafter_to": "2" } } }
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::MalformedFeedError;
use crate::pollen::DayOffset;
use crate::region::{Region, RegionId};

/// Default public endpoint of the forecast.
pub const DWD_POLLEN_URL: &str =
    "https://opendata.dwd.de/climate_environment/health/alerts/s31fg.json";

/// Fixed timestamp format of `last_update` / `next_update`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M Uhr";

/// Partregion id the feed uses for regions that are not subdivided.
const NO_PARTREGION: i64 = -1;

/// Undecoded feed body as returned by the fetcher.
pub type RawPayload = serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RawFeed {
    pub last_update: String,
    #[serde(default)]
    pub next_update: Option<String>,
    pub legend: BTreeMap<String, String>,
    pub content: Vec<RawRegion>,
}

#[derive(Debug, Deserialize)]
pub struct RawRegion {
    #[serde(default)]
    pub region_id: Option<i64>,
    pub region_name: String,
    pub partregion_id: i64,
    #[serde(default)]
    pub partregion_name: Option<String>,
    #[serde(rename = "Pollen", default)]
    pub pollen: BTreeMap<String, RawForecast>,
}

/// Codes of one pollen kind for the three forecast days. Any of them may be
/// missing.
#[derive(Debug, Default, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub today: Option<String>,
    #[serde(default)]
    pub tomorrow: Option<String>,
    #[serde(default, alias = "dayafter_tomorrow")]
    pub dayafter_to: Option<String>,
}

impl RawFeed {
    /// Decodes the top-level structure of a payload.
    pub fn from_payload(payload: &RawPayload) -> Result<Self, MalformedFeedError> {
        RawFeed::deserialize(payload).map_err(MalformedFeedError::Structure)
    }
}

impl RawRegion {
    pub fn id(&self) -> RegionId {
        match (self.partregion_id, self.region_id) {
            (NO_PARTREGION, Some(region_id)) => RegionId(region_id),
            (partregion_id, _) => RegionId(partregion_id),
        }
    }

    pub fn to_region(&self) -> Region {
        let partregion_name = self
            .partregion_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Region {
            id: self.id(),
            name: self.region_name.trim().to_string(),
            partregion_name,
        }
    }
}

impl RawForecast {
    pub fn code(&self, day: DayOffset) -> Option<&str> {
        match day {
            DayOffset::Today => self.today.as_deref(),
            DayOffset::Tomorrow => self.tomorrow.as_deref(),
            DayOffset::DayAfterTomorrow => self.dayafter_to.as_deref(),
        }
    }
}

/// Lists every region present in the feed, in feed order.
pub fn list_regions(payload: &RawPayload) -> Result<Vec<Region>, MalformedFeedError> {
    let feed = RawFeed::from_payload(payload)?;
    Ok(feed.content.iter().map(RawRegion::to_region).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> RawPayload {
        json!({
            "last_update": "2024-04-04 11:00 Uhr",
            "legend": { "id1": "0", "id1_desc": "keine Belastung" },
            "content": [
                {
                    "region_id": 10,
                    "region_name": "Schleswig-Holstein und Hamburg",
                    "partregion_id": 11,
                    "partregion_name": "Inseln und Marschen",
                    "Pollen": { "Birke": { "today": "0", "tomorrow": "0-1", "dayafter_to": "1" } }
                },
                {
                    "region_id": 50,
                    "region_name": "Brandenburg und Berlin",
                    "partregion_id": -1,
                    "partregion_name": "",
                    "Pollen": {}
                }
            ]
        })
    }

    #[test]
    fn test_from_payload() {
        let feed = RawFeed::from_payload(&payload()).unwrap();
        assert_eq!(feed.content.len(), 2);
        assert_eq!(feed.next_update, None);

        let birke = &feed.content[0].pollen["Birke"];
        assert_eq!(birke.code(DayOffset::Today), Some("0"));
        assert_eq!(birke.code(DayOffset::DayAfterTomorrow), Some("1"));
    }

    #[test]
    fn test_missing_content_is_structure_error() {
        let result = RawFeed::from_payload(&json!({
            "last_update": "2024-04-04 11:00 Uhr",
            "legend": {}
        }));
        assert!(matches!(result, Err(MalformedFeedError::Structure(_))));
    }

    #[test]
    fn test_wrong_legend_shape_is_structure_error() {
        let result = RawFeed::from_payload(&json!({
            "last_update": "2024-04-04 11:00 Uhr",
            "legend": ["0", "1"],
            "content": []
        }));
        assert!(matches!(result, Err(MalformedFeedError::Structure(_))));
    }

    #[test]
    fn test_dayafter_tomorrow_alias() {
        let forecast: RawForecast =
            serde_json::from_value(json!({ "today": "1", "dayafter_tomorrow": "2" })).unwrap();
        assert_eq!(forecast.code(DayOffset::Tomorrow), None);
        assert_eq!(forecast.code(DayOffset::DayAfterTomorrow), Some("2"));
    }

    #[test]
    fn test_list_regions_uses_region_id_fallback() {
        let regions = list_regions(&payload()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].id, RegionId(11));
        assert_eq!(regions[0].label(), "Schleswig-Holstein und Hamburg - Inseln und Marschen");
        assert_eq!(regions[1].id, RegionId(50));
        assert_eq!(regions[1].partregion_name, None);
        assert_eq!(regions[1].label(), "Brandenburg und Berlin");
    }
}
