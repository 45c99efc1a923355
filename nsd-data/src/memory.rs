use chrono::NaiveDateTime;
use nsd_core::{
    observation::{HourlyObservation, HourlySeries},
    provider::{Location, WeatherSeriesProvider},
};
use std::collections::HashMap;

use crate::resample::sort_and_dedup;

/// Hourly series held in memory, keyed by location name.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    series: HashMap<String, Vec<HourlyObservation>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        InMemoryProvider::default()
    }

    /// Store the series for a location, replacing any previous one.
    pub fn insert(&mut self, location: &Location, observations: Vec<HourlyObservation>) {
        self.series
            .insert(location.name.clone(), sort_and_dedup(&observations));
    }

    pub fn with_series(mut self, location: &Location, observations: Vec<HourlyObservation>) -> Self {
        self.insert(location, observations);
        self
    }

    /// Names of the stored locations, sorted.
    pub fn location_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        names
    }

    /// The full stored series for a location.
    pub fn series(&self, location: &Location) -> Option<&[HourlyObservation]> {
        self.series.get(&location.name).map(|v| v.as_slice())
    }
}

impl WeatherSeriesProvider for InMemoryProvider {
    fn hourly_observations(
        &self,
        location: &Location,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> anyhow::Result<Vec<HourlyObservation>> {
        match self.series.get(&location.name) {
            Some(series) => Ok(series.within(start, end)),
            None => anyhow::bail!("No weather series loaded for {}", location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryProvider;
    use chrono::{Duration, FixedOffset, TimeZone};
    use nsd_core::observation::HourlyObservation;
    use nsd_core::provider::{Location, WeatherSeriesProvider};

    fn series() -> Vec<HourlyObservation> {
        let start = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2021, 6, 30, 22, 0, 0)
            .unwrap();
        (0..4)
            .rev()
            .map(|i| HourlyObservation::new(start + Duration::hours(i), 8.0, 0.0, 3.0, 180.0))
            .collect()
    }

    #[test]
    fn test_range_is_inclusive_and_sorted() {
        let bergen = Location::new("Bergen", 60.39, 5.32);
        let provider = InMemoryProvider::new().with_series(&bergen, series());
        let start = chrono::NaiveDate::from_ymd_opt(2021, 6, 30)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let end = start + Duration::hours(1);
        let got = provider.hourly_observations(&bergen, start, end).unwrap();
        assert_eq!(got.len(), 2);
        assert!(got[0].timestamp < got[1].timestamp);
        assert_eq!(provider.series(&bergen).unwrap().len(), 4);
        assert_eq!(provider.location_names(), vec!["Bergen".to_string()]);
    }

    #[test]
    fn test_unknown_location() {
        let provider = InMemoryProvider::new();
        let start = chrono::NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let result =
            provider.hourly_observations(&Location::new("Oslo", 59.91, 10.75), start, start);
        assert!(result.is_err());
    }
}
