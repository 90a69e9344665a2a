//! Flattening a snapshot into report rows, and rendering them.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::pollen::{DayOffset, PollenType};
use crate::region::RegionId;
use crate::severity::SeverityLevel;
use crate::snapshot::FeedSnapshot;
use crate::stats::Stat;

/// What a report row measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Pollen(PollenType),
    Stat(Stat),
}

/// One value as a host sensor would expose it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub region: RegionId,
    pub region_label: String,
    pub day: DayOffset,
    pub date: NaiveDate,
    pub subject: Subject,
    pub level: Option<SeverityLevel>,
    /// Code as published by the feed; only set for pollen rows.
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub available: bool,
    pub last_update: NaiveDateTime,
    pub rows: Vec<ReportRow>,
}

/// Builds rows for every selected region, day and pollen kind, followed by
/// the min/max/avg statistics of each region-day. Regions absent from the
/// snapshot produce no rows.
pub fn build_report(
    snapshot: &FeedSnapshot,
    available: bool,
    regions: &[RegionId],
    pollen: &[PollenType],
    days: &[DayOffset],
) -> Report {
    let mut rows = Vec::new();

    for &region in regions {
        let Some(info) = snapshot.region(region) else {
            debug!(region = %region, "Region unavailable, no rows");
            continue;
        };
        let label = info.label();

        for &day in days {
            let date = snapshot.forecast_date(day);
            let row = |subject: Subject, suffix: &str| ReportRow {
                name: format!("dwd_pollen_{}_{}_{}", region, day, suffix),
                region,
                region_label: label.clone(),
                day,
                date,
                subject,
                level: None,
                code: None,
                description: None,
            };

            for &p in pollen {
                let mut r = row(Subject::Pollen(p), p.english_name());
                if let Some(reading) = snapshot.get_reading(region, date, p) {
                    r.level = reading.level;
                    r.code = Some(reading.code.clone());
                    r.description = Some(reading.description.clone());
                }
                rows.push(r);
            }

            for stat in Stat::ALL {
                let mut r = row(Subject::Stat(stat), stat.as_str());
                if let Some(s) = snapshot.get_statistic(region, date, stat) {
                    r.level = s.level;
                    r.description = s.description.clone();
                }
                rows.push(r);
            }
        }
    }

    Report {
        available,
        last_update: snapshot.last_update(),
        rows,
    }
}

/// Logs every row on its own line.
pub fn print_rows(report: &Report) {
    info!(
        available = report.available,
        last_update = %report.last_update,
        rows = report.rows.len(),
        "Pollen report"
    );
    for row in &report.rows {
        let level = row
            .level
            .map_or_else(|| "unknown".to_string(), |l| l.to_string());
        info!(
            date = %row.date,
            region = %row.region_label,
            "{} = {} ({})",
            row.name,
            level,
            row.description.as_deref().unwrap_or("-")
        );
    }
}

/// Renders the report as pretty-printed JSON.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
