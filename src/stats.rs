//! Per region-day statistics over the severity levels of all pollen kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::legend::Legend;
use crate::severity::SeverityLevel;

/// Which statistic of a region-day to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Min,
    Max,
    Avg,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Min, Stat::Max, Stat::Avg];

    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Min => "min",
            Stat::Max => "max",
            Stat::Avg => "avg",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown statistic '{0}', expected min, max or avg")]
pub struct ParseStatError(String);

impl FromStr for Stat {
    type Err = ParseStatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Stat::Min),
            "max" => Ok(Stat::Max),
            "avg" | "average" => Ok(Stat::Avg),
            _ => Err(ParseStatError(s.to_string())),
        }
    }
}

/// A single statistic with its legend description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistic {
    pub level: Option<SeverityLevel>,
    pub description: Option<String>,
}

impl Statistic {
    fn resolve(level: Option<SeverityLevel>, legend: &Legend) -> Self {
        let description = level
            .and_then(|l| legend.describe_level(l))
            .map(str::to_string);
        Statistic { level, description }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayStatistics {
    pub min: Statistic,
    pub max: Statistic,
    pub avg: Statistic,
    /// Unrounded average level.
    pub mean: Option<f64>,
}

impl DayStatistics {
    pub fn get(&self, stat: Stat) -> &Statistic {
        match stat {
            Stat::Min => &self.min,
            Stat::Max => &self.max,
            Stat::Avg => &self.avg,
        }
    }
}

/// Running min/max/sum over the known levels of one region-day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelAccumulator {
    min: Option<SeverityLevel>,
    max: Option<SeverityLevel>,
    sum: u32,
    count: u32,
}

impl LevelAccumulator {
    /// Adds a level. Unknown levels do not participate.
    pub fn push(&mut self, level: Option<SeverityLevel>) {
        let Some(level) = level else {
            return;
        };
        self.min = Some(self.min.map_or(level, |m| m.min(level)));
        self.max = Some(self.max.map_or(level, |m| m.max(level)));
        self.sum += u32::from(level.value());
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| f64::from(self.sum) / f64::from(self.count))
    }

    /// Average rounded half-to-even onto the level scale.
    pub fn rounded_average(&self) -> Option<SeverityLevel> {
        if self.count == 0 {
            return None;
        }
        let rounded = round_half_even(self.sum, self.count);
        SeverityLevel::new(u8::try_from(rounded).ok()?)
    }

    pub fn finish(&self, legend: &Legend) -> DayStatistics {
        DayStatistics {
            min: Statistic::resolve(self.min, legend),
            max: Statistic::resolve(self.max, legend),
            avg: Statistic::resolve(self.rounded_average(), legend),
            mean: self.mean(),
        }
    }
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
/// `denominator` must be non-zero.
fn round_half_even(numerator: u32, denominator: u32) -> u32 {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);

    match twice_remainder.cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn level(v: u8) -> Option<SeverityLevel> {
        SeverityLevel::new(v)
    }

    fn legend() -> Legend {
        let raw: BTreeMap<String, String> = [
            ("id1", "0"),
            ("id1_desc", "keine Belastung"),
            ("id3", "1"),
            ("id3_desc", "geringe Belastung"),
            ("id4", "1-2"),
            ("id4_desc", "geringe bis mittlere Belastung"),
            ("id5", "2"),
            ("id5_desc", "mittlere Belastung"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Legend::from_raw(&raw)
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(3, 2), 2); // 1.5
        assert_eq!(round_half_even(5, 2), 2); // 2.5
        assert_eq!(round_half_even(7, 2), 4); // 3.5
        assert_eq!(round_half_even(4, 3), 1); // 1.33
        assert_eq!(round_half_even(5, 3), 2); // 1.67
        assert_eq!(round_half_even(6, 3), 2);
        assert_eq!(round_half_even(0, 4), 0);
    }

    #[test]
    fn test_empty_accumulator_is_all_none() {
        let mut acc = LevelAccumulator::default();
        acc.push(None);
        acc.push(None);

        let stats = acc.finish(&legend());
        assert_eq!(stats, DayStatistics::default());
        assert_eq!(stats.mean, None);
    }

    #[test]
    fn test_min_max_avg() {
        let mut acc = LevelAccumulator::default();
        for v in [2, 4, 3] {
            acc.push(level(v));
        }
        acc.push(None);

        let stats = acc.finish(&legend());
        assert_eq!(acc.count(), 3);
        assert_eq!(stats.min.level, level(2));
        assert_eq!(stats.min.description.as_deref(), Some("geringe Belastung"));
        assert_eq!(stats.max.level, level(4));
        assert_eq!(stats.max.description.as_deref(), Some("mittlere Belastung"));
        assert_eq!(stats.avg.level, level(3));
        assert_eq!(stats.avg.description.as_deref(), Some("geringe bis mittlere Belastung"));
        assert_eq!(stats.mean, Some(3.0));
    }

    #[test]
    fn test_avg_without_legend_entry_has_no_description() {
        let mut acc = LevelAccumulator::default();
        acc.push(level(0));
        acc.push(level(2));

        let stats = acc.finish(&legend());
        // "0-1" is not described by this legend.
        assert_eq!(stats.avg.level, level(1));
        assert_eq!(stats.avg.description, None);
    }

    #[test]
    fn test_min_le_avg_le_max() {
        let samples: &[&[u8]] = &[&[0, 6], &[1, 2], &[5, 5, 6], &[0, 0, 1, 6], &[3]];
        for sample in samples {
            let mut acc = LevelAccumulator::default();
            for v in *sample {
                acc.push(level(*v));
            }
            let stats = acc.finish(&Legend::default());
            assert!(stats.min.level <= stats.avg.level, "{sample:?}");
            assert!(stats.avg.level <= stats.max.level, "{sample:?}");
        }
    }

    #[test]
    fn test_stat_parse() {
        assert_eq!("AVG".parse::<Stat>(), Ok(Stat::Avg));
        assert_eq!("min".parse::<Stat>(), Ok(Stat::Min));
        assert!("median".parse::<Stat>().is_err());
    }

    #[test]
    fn test_day_statistics_get() {
        let stats = DayStatistics {
            max: Statistic {
                level: level(6),
                description: Some("hohe Belastung".to_string()),
            },
            ..Default::default()
        };
        assert_eq!(stats.get(Stat::Max).level, level(6));
        assert_eq!(stats.get(Stat::Min).level, None);
    }
}
