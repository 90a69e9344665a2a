//! Turns a raw feed payload into a [`FeedSnapshot`].

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::error::MalformedFeedError;
use crate::feed::{RawFeed, RawPayload, RawRegion, TIMESTAMP_FORMAT};
use crate::legend::Legend;
use crate::pollen::{DayOffset, PollenType};
use crate::region::RegionId;
use crate::severity::SeverityLevel;
use crate::snapshot::{DayForecast, FeedSnapshot, PollenReading, RegionForecast};
use crate::stats::LevelAccumulator;

/// Builds a snapshot covering the tracked regions present in `payload`.
///
/// Tracked regions missing from the feed are left out. Fails if the payload
/// lacks `last_update`, `legend` or `content`, if a timestamp cannot be
/// parsed, or if the feed uses a code its own legend does not describe.
pub fn transform(
    payload: &RawPayload,
    tracked: &BTreeSet<RegionId>,
) -> Result<FeedSnapshot, MalformedFeedError> {
    let feed = RawFeed::from_payload(payload)?;

    let last_update = parse_timestamp(&feed.last_update)?;
    let next_update = feed.next_update.as_deref().and_then(|raw| {
        parse_timestamp(raw)
            .inspect_err(|e| warn!(error = %e, "Ignoring unparsable next_update"))
            .ok()
    });

    let legend = Legend::from_raw(&feed.legend);
    debug!(entries = legend.len(), "Legend built");

    let mut regions = BTreeMap::new();

    for raw_region in &feed.content {
        let id = raw_region.id();
        if !tracked.contains(&id) {
            continue;
        }

        let mut days = BTreeMap::new();
        for day in DayOffset::ALL {
            let date = day.date_from(last_update.date());
            days.insert(date, build_day(raw_region, id, day, &legend)?);
        }

        debug!(region = %id, "Region forecast built");
        regions.insert(
            id,
            RegionForecast {
                region: raw_region.to_region(),
                days,
            },
        );
    }

    for id in tracked.iter().filter(|id| !regions.contains_key(*id)) {
        warn!(region = %id, "Tracked region not present in feed");
    }

    Ok(FeedSnapshot {
        legend,
        last_update,
        next_update,
        regions,
    })
}

/// Parses the feed's `YYYY-MM-DD HH:MM Uhr` timestamps.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, MalformedFeedError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|source| {
        MalformedFeedError::Timestamp {
            value: raw.to_string(),
            source,
        }
    })
}

fn build_day(
    raw_region: &RawRegion,
    id: RegionId,
    day: DayOffset,
    legend: &Legend,
) -> Result<DayForecast, MalformedFeedError> {
    let mut readings = BTreeMap::new();
    let mut acc = LevelAccumulator::default();

    for (name, forecast) in &raw_region.pollen {
        let Some(pollen) = PollenType::from_name(name) else {
            debug!(region = %id, pollen = %name, "Skipping unknown pollen type");
            continue;
        };
        let Some(code) = forecast.code(day) else {
            continue;
        };

        let description = legend
            .describe(code)
            .ok_or_else(|| MalformedFeedError::UnknownCode {
                code: code.to_string(),
                region: id,
                pollen,
            })?
            .to_string();
        let level = SeverityLevel::from_code(code);
        acc.push(level);

        readings.insert(
            pollen,
            PollenReading {
                code: code.trim().to_string(),
                description,
                level,
            },
        );
    }

    Ok(DayForecast {
        readings,
        statistics: acc.finish(legend),
    })
}
