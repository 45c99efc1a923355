//! Seasonal and directional aggregation over a weather provider.
//!
//! A season without observations has no transport value (`None`) rather than
//! zero, so averages and charts can tell "calm" from "unknown".

use crate::{
    observation::{HourlyObservation, MissingValuePolicy},
    provider::{Location, WeatherSeriesProvider},
    season::Season,
    sector::SectorRose,
    transport::{estimate_sector_transport, estimate_transport, TablerParameters},
};
use anyhow::Context;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Seasons covering less than this share of their hours are reported.
pub const MIN_SEASON_COVERAGE: f64 = 0.9;

fn season_observations<P: WeatherSeriesProvider + ?Sized>(
    provider: &P,
    location: &Location,
    season: Season,
) -> anyhow::Result<Vec<HourlyObservation>> {
    let (start, end) = season
        .bounds()
        .with_context(|| format!("season {season} is outside the supported date range"))?;
    let observations = provider
        .hourly_observations(location, start, end)
        .with_context(|| format!("loading {season} for {}", location.name))?;
    if observations.is_empty() {
        debug!("No observations for {} in {}", location.name, season);
    } else {
        let coverage = season.coverage(observations.len());
        if coverage < MIN_SEASON_COVERAGE {
            warn!(
                "Season {} for {} covers {:.1}% of its hours",
                season,
                location.name,
                coverage * 100.0
            );
        }
    }
    Ok(observations)
}

/// Qt (kg/m) for one season at one location, `None` when the provider has no
/// observations in the season.
pub fn estimate_seasonal_transport<P: WeatherSeriesProvider + ?Sized>(
    provider: &P,
    location: &Location,
    season: Season,
    params: &TablerParameters,
    policy: MissingValuePolicy,
) -> anyhow::Result<Option<f64>> {
    let observations = season_observations(provider, location, season)?;
    Ok(estimate_transport(&observations, params, policy).map(|estimate| estimate.qt))
}

/// Qt per season, keyed by season in chronological order.
pub fn seasonal_transport<P: WeatherSeriesProvider + ?Sized>(
    provider: &P,
    location: &Location,
    seasons: &[Season],
    params: &TablerParameters,
    policy: MissingValuePolicy,
) -> anyhow::Result<BTreeMap<Season, Option<f64>>> {
    let mut result = BTreeMap::new();
    for season in seasons {
        let qt = estimate_seasonal_transport(provider, location, *season, params, policy)?;
        result.insert(*season, qt);
    }
    info!(
        "Computed {} of {} seasons for {}",
        result.values().filter(|qt| qt.is_some()).count(),
        seasons.len(),
        location.name
    );
    Ok(result)
}

/// Mean Qt over the seasons that have a value.
pub fn mean_transport(per_season: &BTreeMap<Season, Option<f64>>) -> Option<f64> {
    let defined: Vec<f64> = per_season.values().filter_map(|qt| *qt).collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

/// Element-wise mean of the sector roses of every (location, season) pair
/// that has observations. Nothing to average gives an all-zero rose.
pub fn average_sector_transport<P: WeatherSeriesProvider + ?Sized>(
    provider: &P,
    locations: &[Location],
    seasons: &[Season],
    policy: MissingValuePolicy,
) -> anyhow::Result<SectorRose> {
    let mut roses = Vec::new();
    for location in locations {
        for season in seasons {
            let observations = season_observations(provider, location, *season)?;
            if observations.is_empty() {
                continue;
            }
            roses.push(estimate_sector_transport(&observations, policy));
        }
    }
    debug!("Averaging {} sector roses", roses.len());
    Ok(SectorRose::mean(&roses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::tests::{constant_series, hour};
    use crate::observation::HourlySeries;
    use crate::sector::Sector;
    use crate::transport::compute_potential_transport;
    use chrono::NaiveDateTime;

    struct FixedSeries(Vec<HourlyObservation>);

    impl WeatherSeriesProvider for FixedSeries {
        fn hourly_observations(
            &self,
            location: &Location,
            start: NaiveDateTime,
            end: NaiveDateTime,
        ) -> anyhow::Result<Vec<HourlyObservation>> {
            if location.name != "Hemsedal" {
                anyhow::bail!("unknown location {}", location.name);
            }
            Ok(self.0.within(start, end))
        }
    }

    fn hemsedal() -> Location {
        Location::new("Hemsedal", 60.86, 8.55)
    }

    /// Two winter days in season 2019-2020 and three in 2021-2022.
    fn provider() -> FixedSeries {
        let mut series = constant_series(hour(2020, 1, 1, 0), 48, -5.0, 1.0, 10.0, 45.0);
        series.extend(constant_series(hour(2022, 2, 1, 0), 72, -2.0, 0.5, 8.0, 270.0));
        FixedSeries(series)
    }

    #[test]
    fn test_estimate_seasonal_transport() {
        let params = TablerParameters::default();
        let policy = MissingValuePolicy::default();
        let qt = estimate_seasonal_transport(
            &provider(),
            &hemsedal(),
            Season::new(2019),
            &params,
            policy,
        )
        .unwrap()
        .unwrap();
        let expected = compute_potential_transport(&[10.0; 48]) * (1.0 - 0.14f64.powf(10.0));
        assert!((qt - expected).abs() < 1e-9);
    }

    #[test]
    fn test_season_without_data_has_no_result() {
        let params = TablerParameters::default();
        let qt = estimate_seasonal_transport(
            &provider(),
            &hemsedal(),
            Season::new(2020),
            &params,
            MissingValuePolicy::default(),
        )
        .unwrap();
        assert!(qt.is_none());
    }

    #[test]
    fn test_provider_failure_is_an_error() {
        let params = TablerParameters::default();
        let result = estimate_seasonal_transport(
            &provider(),
            &Location::new("Nowhere", 0.0, 0.0),
            Season::new(2019),
            &params,
            MissingValuePolicy::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_season_beyond_calendar_is_an_error() {
        let params = TablerParameters::default();
        let err = estimate_seasonal_transport(
            &provider(),
            &hemsedal(),
            Season::new(i32::MAX),
            &params,
            MissingValuePolicy::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("2147483647-2147483648"));
    }

    #[test]
    fn test_seasonal_transport_and_mean() {
        let params = TablerParameters::default();
        let per_season = seasonal_transport(
            &provider(),
            &hemsedal(),
            &Season::range(2019, 2021),
            &params,
            MissingValuePolicy::default(),
        )
        .unwrap();
        let labels: Vec<String> = per_season.keys().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["2019-2020", "2020-2021", "2021-2022"]);
        assert!(per_season[&Season::new(2020)].is_none());

        let a = per_season[&Season::new(2019)].unwrap();
        let b = per_season[&Season::new(2021)].unwrap();
        let mean = mean_transport(&per_season).unwrap();
        assert!((mean - (a + b) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_transport_of_nothing() {
        let mut per_season = BTreeMap::new();
        per_season.insert(Season::new(2000), None);
        assert_eq!(mean_transport(&per_season), None);
        assert_eq!(mean_transport(&BTreeMap::new()), None);
    }

    #[test]
    fn test_average_sector_transport() {
        let rose = average_sector_transport(
            &provider(),
            &[hemsedal()],
            &Season::range(2019, 2021),
            MissingValuePolicy::default(),
        )
        .unwrap();
        // two seasons with data; the empty 2020-2021 does not dilute the mean
        let ne = compute_potential_transport(&[10.0; 48]) / 2.0;
        let w = compute_potential_transport(&[8.0; 72]) / 2.0;
        assert!((rose.get(Sector::NE) - ne).abs() < 1e-9);
        assert!((rose.get(Sector::W) - w).abs() < 1e-9);
        assert!((rose.total() - (ne + w)).abs() < 1e-9);
    }

    #[test]
    fn test_average_sector_transport_without_data() {
        let rose = average_sector_transport(
            &provider(),
            &[hemsedal()],
            &Season::range(2010, 2012),
            MissingValuePolicy::default(),
        )
        .unwrap();
        assert_eq!(rose, SectorRose::zero());
        let none = average_sector_transport(&provider(), &[], &[], MissingValuePolicy::default())
            .unwrap();
        assert_eq!(none, SectorRose::zero());
    }
}
