use crate::{error::SnowDriftError, observation::HourlyObservation};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point for which hourly meteorology can be requested.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable name, also the key providers store series under
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Location {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.3}, {:.3})",
            self.name, self.latitude, self.longitude
        )
    }
}

/// Norwegian electricity price areas and the city used as their weather reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceArea {
    NO1,
    NO2,
    NO3,
    NO4,
    NO5,
}

impl PriceArea {
    pub const ALL: [PriceArea; 5] = [
        PriceArea::NO1,
        PriceArea::NO2,
        PriceArea::NO3,
        PriceArea::NO4,
        PriceArea::NO5,
    ];

    pub fn city(self) -> &'static str {
        match self {
            PriceArea::NO1 => "Oslo",
            PriceArea::NO2 => "Kristiansand",
            PriceArea::NO3 => "Trondheim",
            PriceArea::NO4 => "Tromsø",
            PriceArea::NO5 => "Bergen",
        }
    }

    pub fn location(self) -> Location {
        let (latitude, longitude) = match self {
            PriceArea::NO1 => (59.91, 10.75),
            PriceArea::NO2 => (58.15, 7.99),
            PriceArea::NO3 => (63.43, 10.40),
            PriceArea::NO4 => (69.65, 18.96),
            PriceArea::NO5 => (60.39, 5.32),
        };
        Location::new(self.city(), latitude, longitude)
    }
}

impl fmt::Display for PriceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for PriceArea {
    type Err = SnowDriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        PriceArea::ALL
            .into_iter()
            .find(|area| area.to_string() == code)
            .ok_or_else(|| SnowDriftError::InvalidParameter(format!("price area '{s}' not found")))
    }
}

/// Source of hourly meteorology for a location.
///
/// Implementations return every observation whose local wall time lies in
/// `[start, end]`, sorted by time, with all timestamps in one offset. An empty
/// vector means no data for the range; errors are reserved for failures of
/// the source itself.
pub trait WeatherSeriesProvider {
    fn hourly_observations(
        &self,
        location: &Location,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> anyhow::Result<Vec<HourlyObservation>>;
}

impl<P: WeatherSeriesProvider + ?Sized> WeatherSeriesProvider for &P {
    fn hourly_observations(
        &self,
        location: &Location,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> anyhow::Result<Vec<HourlyObservation>> {
        (**self).hourly_observations(location, start, end)
    }
}

impl<P: WeatherSeriesProvider + ?Sized> WeatherSeriesProvider for Box<P> {
    fn hourly_observations(
        &self,
        location: &Location,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> anyhow::Result<Vec<HourlyObservation>> {
        (**self).hourly_observations(location, start, end)
    }
}
