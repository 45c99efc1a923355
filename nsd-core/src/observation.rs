use chrono::{DateTime, FixedOffset, NaiveDateTime};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SnowDriftError;

/// Share of incomplete hours above which a series is reported as suspect.
pub const INCOMPLETE_WARNING_RATIO: f64 = 0.1;

/// One hour of reanalysis meteorology at a single location.
///
/// Missing values are carried as `NaN`; see [`MissingValuePolicy`] for how
/// they are resolved before the series reaches the transport model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    pub timestamp: DateTime<FixedOffset>,
    /// Air temperature at 2 m, degrees Celsius
    pub temperature: f64,
    /// Precipitation accumulated over the hour, mm water equivalent
    pub precipitation: f64,
    /// Wind speed at 10 m, m/s
    pub wind_speed: f64,
    /// Compass bearing the wind blows from, degrees (0 = North)
    pub wind_direction: f64,
}

impl HourlyObservation {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        temperature: f64,
        precipitation: f64,
        wind_speed: f64,
        wind_direction: f64,
    ) -> Self {
        HourlyObservation {
            timestamp,
            temperature,
            precipitation,
            wind_speed,
            wind_direction,
        }
    }

    /// An hour with every measurement missing, used as a gap placeholder.
    pub fn missing(timestamp: DateTime<FixedOffset>) -> Self {
        HourlyObservation::new(timestamp, f64::NAN, f64::NAN, f64::NAN, f64::NAN)
    }

    /// True when all four measurements are finite numbers.
    pub fn is_complete(&self) -> bool {
        self.temperature.is_finite()
            && self.precipitation.is_finite()
            && self.wind_speed.is_finite()
            && self.wind_direction.is_finite()
    }

    /// Wall-clock time in the series' own offset.
    pub fn local_time(&self) -> NaiveDateTime {
        self.timestamp.naive_local()
    }

    /// The same hour made calm and dry so it adds nothing to any total.
    fn zero_contribution(&self) -> Self {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        HourlyObservation {
            timestamp: self.timestamp,
            temperature: finite_or_zero(self.temperature),
            precipitation: 0.0,
            wind_speed: 0.0,
            wind_direction: finite_or_zero(self.wind_direction),
        }
    }
}

/// Column views over an hourly series.
pub trait HourlySeries {
    fn wind_speeds(&self) -> Vec<f64>;
    fn wind_directions(&self) -> Vec<f64>;
    fn incomplete_hours(&self) -> usize;
    /// Observations whose local time falls inside `[start, end]`.
    fn within(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<HourlyObservation>;
}

impl HourlySeries for [HourlyObservation] {
    fn wind_speeds(&self) -> Vec<f64> {
        self.iter().map(|o| o.wind_speed).collect()
    }

    fn wind_directions(&self) -> Vec<f64> {
        self.iter().map(|o| o.wind_direction).collect()
    }

    fn incomplete_hours(&self) -> usize {
        self.iter().filter(|o| !o.is_complete()).count()
    }

    fn within(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<HourlyObservation> {
        self.iter()
            .filter(|o| {
                let t = o.local_time();
                start <= t && t <= end
            })
            .copied()
            .collect()
    }
}

/// How hours with a missing measurement are treated by the estimator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissingValuePolicy {
    /// Keep the hour but let it contribute nothing (calm and dry).
    #[default]
    ZeroContribution,
    /// Drop the hour from the series entirely.
    ExcludeHour,
}

impl MissingValuePolicy {
    /// Resolve missing values so every measurement in the returned series is finite.
    pub fn apply(self, observations: &[HourlyObservation]) -> Vec<HourlyObservation> {
        let incomplete = observations.incomplete_hours();
        if incomplete > 0 {
            let ratio = incomplete as f64 / observations.len() as f64;
            if ratio > INCOMPLETE_WARNING_RATIO {
                warn!(
                    "{} of {} hours have missing measurements ({:.1}%), policy {}",
                    incomplete,
                    observations.len(),
                    ratio * 100.0,
                    self
                );
            } else {
                debug!(
                    "{} of {} hours have missing measurements, policy {}",
                    incomplete,
                    observations.len(),
                    self
                );
            }
        }
        match self {
            MissingValuePolicy::ZeroContribution => observations
                .iter()
                .map(|o| {
                    if o.is_complete() {
                        *o
                    } else {
                        o.zero_contribution()
                    }
                })
                .collect(),
            MissingValuePolicy::ExcludeHour => observations
                .iter()
                .filter(|o| o.is_complete())
                .copied()
                .collect(),
        }
    }
}

impl fmt::Display for MissingValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValuePolicy::ZeroContribution => write!(f, "zero"),
            MissingValuePolicy::ExcludeHour => write!(f, "exclude"),
        }
    }
}

impl FromStr for MissingValuePolicy {
    type Err = SnowDriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zero" => Ok(MissingValuePolicy::ZeroContribution),
            "exclude" => Ok(MissingValuePolicy::ExcludeHour),
            other => Err(SnowDriftError::InvalidParameter(format!(
                "unknown missing value policy '{other}', expected 'zero' or 'exclude'"
            ))),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{HourlyObservation, HourlySeries, MissingValuePolicy};
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};

    pub(crate) fn hour(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        offset.from_local_datetime(&naive).unwrap()
    }

    /// `count` consecutive hours starting at `start`, all with the same weather.
    pub(crate) fn constant_series(
        start: DateTime<FixedOffset>,
        count: i64,
        temperature: f64,
        precipitation: f64,
        wind_speed: f64,
        wind_direction: f64,
    ) -> Vec<HourlyObservation> {
        (0..count)
            .map(|i| {
                HourlyObservation::new(
                    start + Duration::hours(i),
                    temperature,
                    precipitation,
                    wind_speed,
                    wind_direction,
                )
            })
            .collect()
    }

    #[test]
    fn test_is_complete() {
        let t = hour(2020, 1, 1, 0);
        assert!(HourlyObservation::new(t, -3.0, 0.5, 7.0, 270.0).is_complete());
        assert!(!HourlyObservation::new(t, -3.0, f64::NAN, 7.0, 270.0).is_complete());
        assert!(!HourlyObservation::missing(t).is_complete());
    }

    #[test]
    fn test_zero_contribution_policy_keeps_hours() {
        let t = hour(2020, 1, 1, 0);
        let series = vec![
            HourlyObservation::new(t, -3.0, 0.5, 7.0, 270.0),
            HourlyObservation::new(t + Duration::hours(1), -3.0, 0.5, 7.0, f64::NAN),
            HourlyObservation::missing(t + Duration::hours(2)),
        ];
        let resolved = MissingValuePolicy::ZeroContribution.apply(&series);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0], series[0]);
        assert_eq!(resolved[1].wind_speed, 0.0);
        assert_eq!(resolved[1].precipitation, 0.0);
        assert_eq!(resolved[1].temperature, -3.0);
        assert!(resolved.iter().all(|o| o.is_complete()));
    }

    #[test]
    fn test_exclude_policy_drops_hours() {
        let t = hour(2020, 1, 1, 0);
        let series = vec![
            HourlyObservation::new(t, -3.0, 0.5, 7.0, 270.0),
            HourlyObservation::missing(t + Duration::hours(1)),
        ];
        let resolved = MissingValuePolicy::ExcludeHour.apply(&series);
        assert_eq!(resolved, vec![series[0]]);
    }

    #[test]
    fn test_within_is_inclusive() {
        let series = constant_series(hour(2020, 1, 1, 0), 5, 0.0, 0.0, 1.0, 0.0);
        let start = hour(2020, 1, 1, 1).naive_local();
        let end = hour(2020, 1, 1, 3).naive_local();
        assert_eq!(series.within(start, end).len(), 3);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "Zero".parse::<MissingValuePolicy>().unwrap(),
            MissingValuePolicy::ZeroContribution
        );
        assert_eq!(
            "exclude".parse::<MissingValuePolicy>().unwrap(),
            MissingValuePolicy::ExcludeHour
        );
        assert!("drop".parse::<MissingValuePolicy>().is_err());
    }
}
