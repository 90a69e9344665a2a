//! Immutable result of one successful fetch-transform cycle, and its read API.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::legend::Legend;
use crate::pollen::{DayOffset, PollenType};
use crate::region::{Region, RegionId};
use crate::severity::SeverityLevel;
use crate::stats::{DayStatistics, Stat, Statistic};

/// One pollen kind on one day in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollenReading {
    /// Code as published by the feed.
    pub code: String,
    pub description: String,
    pub level: Option<SeverityLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayForecast {
    pub readings: BTreeMap<PollenType, PollenReading>,
    pub statistics: DayStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionForecast {
    pub region: Region,
    pub days: BTreeMap<NaiveDate, DayForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub(crate) legend: Legend,
    pub(crate) last_update: NaiveDateTime,
    pub(crate) next_update: Option<NaiveDateTime>,
    pub(crate) regions: BTreeMap<RegionId, RegionForecast>,
}

impl FeedSnapshot {
    pub fn last_update(&self) -> NaiveDateTime {
        self.last_update
    }

    pub fn next_update(&self) -> Option<NaiveDateTime> {
        self.next_update
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Calendar date of a forecast horizon, counted from the feed's own
    /// last-update date rather than the host clock.
    pub fn forecast_date(&self, day: DayOffset) -> NaiveDate {
        day.date_from(self.last_update.date())
    }

    pub fn region(&self, region: RegionId) -> Option<&Region> {
        self.regions.get(&region).map(|r| &r.region)
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionForecast> {
        self.regions.values()
    }

    pub fn dates(&self, region: RegionId) -> Vec<NaiveDate> {
        self.regions
            .get(&region)
            .map(|r| r.days.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn day(&self, region: RegionId, date: NaiveDate) -> Option<&DayForecast> {
        self.regions.get(&region)?.days.get(&date)
    }

    pub fn get_reading(
        &self,
        region: RegionId,
        date: NaiveDate,
        pollen: PollenType,
    ) -> Option<&PollenReading> {
        self.day(region, date)?.readings.get(&pollen)
    }

    /// Severity of a pollen kind. `None` if the region, day or pollen is not
    /// in the snapshot, or the feed reported no data for it.
    pub fn get_value(
        &self,
        region: RegionId,
        date: NaiveDate,
        pollen: PollenType,
    ) -> Option<SeverityLevel> {
        self.get_reading(region, date, pollen)?.level
    }

    /// `None` means the region-day is unavailable; a present statistic may
    /// still carry an unknown level.
    pub fn get_statistic(&self, region: RegionId, date: NaiveDate, stat: Stat) -> Option<&Statistic> {
        self.day(region, date).map(|d| d.statistics.get(stat))
    }
}
