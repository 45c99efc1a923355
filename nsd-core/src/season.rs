use crate::{error::SnowDriftError, observation::HourlyObservation};
use chrono::{NaiveDate, NaiveDateTime};
use nsd_utils::dates::{season_bounds, season_start_year};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A snow season runs from July 1 to June 30 of the following year, so a
/// whole winter is always counted in one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Season {
    pub start_year: i32,
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Season { start_year }
    }

    /// The season a calendar date belongs to.
    pub fn containing(date: &NaiveDate) -> Self {
        Season::new(season_start_year(date))
    }

    /// Every season from `first` to `last` start year, inclusive.
    pub fn range(first: i32, last: i32) -> Vec<Season> {
        (first..=last).map(Season::new).collect()
    }

    /// Jul 1 00:00:00 through Jun 30 23:59:59, local wall time.
    ///
    /// Returns `None` only for years outside chrono's supported range.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        season_bounds(self.start_year)
    }

    pub fn contains(&self, time: &NaiveDateTime) -> bool {
        Season::containing(&time.date()) == *self
    }

    /// Number of hours in a gap-free season (8760, or 8784 when it holds Feb 29).
    pub fn expected_hours(&self) -> i64 {
        match self.bounds() {
            Some((start, end)) => (end - start).num_hours() + 1,
            None => 0,
        }
    }

    /// Share of the season's hours that `observed_hours` covers, in [0, 1].
    pub fn coverage(&self, observed_hours: usize) -> f64 {
        let expected = self.expected_hours();
        if expected == 0 {
            return 0.0;
        }
        (observed_hours as f64 / expected as f64).min(1.0)
    }

    /// Split a series into seasons. Each observation lands in exactly one
    /// season and seasons without observations are absent.
    pub fn partition(observations: &[HourlyObservation]) -> BTreeMap<Season, Vec<HourlyObservation>> {
        let mut seasons: BTreeMap<Season, Vec<HourlyObservation>> = BTreeMap::new();
        for obs in observations {
            seasons
                .entry(Season::containing(&obs.local_time().date()))
                .or_default()
                .push(*obs);
        }
        seasons
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, i64::from(self.start_year) + 1)
    }
}

impl FromStr for Season {
    type Err = SnowDriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SnowDriftError::InvalidSeason(s.to_string());
        let (first, second) = s.trim().split_once('-').ok_or_else(invalid)?;
        let first: i32 = first.parse().map_err(|_| invalid())?;
        let second: i32 = second.parse().map_err(|_| invalid())?;
        if first.checked_add(1) != Some(second) {
            return Err(invalid());
        }
        Ok(Season::new(first))
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Season;
    use crate::observation::tests::{constant_series, hour};
    use chrono::NaiveDate;

    #[test]
    fn test_label_round_trip() {
        let season = Season::new(2015);
        assert_eq!(season.to_string(), "2015-2016");
        assert_eq!("2015-2016".parse::<Season>().unwrap(), season);
        assert!("2015-2017".parse::<Season>().is_err());
        assert!("2015".parse::<Season>().is_err());
        assert!("abcd-efgh".parse::<Season>().is_err());
    }

    #[test]
    fn test_label_at_year_limit() {
        let last = Season::new(i32::MAX);
        assert_eq!(last.to_string(), "2147483647-2147483648");
        assert!(last.bounds().is_none());
        assert_eq!(last.expected_hours(), 0);
        assert!("2147483647-0".parse::<Season>().is_err());
        assert!("2147483647-2147483648".parse::<Season>().is_err());
    }

    #[test]
    fn test_containing() {
        let jul1 = NaiveDate::from_ymd_opt(2020, 7, 1).unwrap();
        let jun30 = NaiveDate::from_ymd_opt(2020, 6, 30).unwrap();
        assert_eq!(Season::containing(&jul1), Season::new(2020));
        assert_eq!(Season::containing(&jun30), Season::new(2019));
    }

    #[test]
    fn test_bounds_and_contains() {
        let season = Season::new(2019);
        let (start, end) = season.bounds().unwrap();
        assert!(season.contains(&start));
        assert!(season.contains(&end));
        assert!(!season.contains(&(end + chrono::Duration::seconds(1))));
        assert!(!season.contains(&(start - chrono::Duration::seconds(1))));
    }

    #[test]
    fn test_expected_hours() {
        // 2019-2020 holds Feb 29 2020
        assert_eq!(Season::new(2019).expected_hours(), 8784);
        assert_eq!(Season::new(2020).expected_hours(), 8760);
        assert!((Season::new(2020).coverage(4380) - 0.5).abs() < 1e-12);
        assert_eq!(Season::new(2020).coverage(9000), 1.0);
    }

    #[test]
    fn test_partition() {
        // 48 hours straddling the Jul 1 boundary
        let series = constant_series(hour(2020, 6, 30, 0), 48, 0.0, 0.0, 5.0, 90.0);
        let seasons = Season::partition(&series);
        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[&Season::new(2019)].len(), 24);
        assert_eq!(seasons[&Season::new(2020)].len(), 24);
        let total: usize = seasons.values().map(|v| v.len()).sum();
        assert_eq!(total, series.len());
    }

    #[test]
    fn test_range() {
        let seasons = Season::range(2015, 2017);
        assert_eq!(
            seasons,
            vec![Season::new(2015), Season::new(2016), Season::new(2017)]
        );
        assert!(Season::range(2018, 2017).is_empty());
    }
}
