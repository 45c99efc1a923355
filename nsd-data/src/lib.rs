//! Weather series providers and data preparation for the snow drift model.
//!
//! This crate sits on the provider side of the estimator: it holds hourly
//! series in memory, caches provider requests, makes gaps in a series
//! explicit and optionally fills them before `nsd-core` sees the data.

pub mod cache;
pub mod hour_range;
pub mod memory;
pub mod records;

/// Make missing hours explicit in an hourly series.
pub mod resample {
    use crate::hour_range::HourRange;
    use chrono::{DateTime, FixedOffset};
    use log::debug;
    use nsd_core::observation::HourlyObservation;
    use std::collections::BTreeMap;

    /// Sort a series by time, dropping repeated timestamps (the first one wins).
    pub fn sort_and_dedup(observations: &[HourlyObservation]) -> Vec<HourlyObservation> {
        let mut by_time: BTreeMap<DateTime<FixedOffset>, HourlyObservation> = BTreeMap::new();
        for obs in observations {
            by_time.entry(obs.timestamp).or_insert(*obs);
        }
        by_time.into_values().collect()
    }

    /// Insert an all-missing placeholder for every hour between the first and
    /// last observation that has no observation of its own.
    ///
    /// Input need not be sorted; output is sorted and free of duplicates.
    pub fn fill_missing_hours(observations: &[HourlyObservation]) -> Vec<HourlyObservation> {
        let sorted = sort_and_dedup(observations);
        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (first.timestamp, last.timestamp),
            _ => return Vec::new(),
        };

        let mut by_time: BTreeMap<DateTime<FixedOffset>, HourlyObservation> =
            sorted.into_iter().map(|obs| (obs.timestamp, obs)).collect();
        let mut inserted = 0usize;
        for hour in HourRange(first, last) {
            by_time.entry(hour).or_insert_with(|| {
                inserted += 1;
                HourlyObservation::missing(hour)
            });
        }
        if inserted > 0 {
            debug!("Inserted {} missing hours between {} and {}", inserted, first, last);
        }
        by_time.into_values().collect()
    }

}

/// Linear interpolation for filling gaps in hourly observation data.
pub mod interpolation {
    use nsd_core::observation::HourlyObservation;

    /// Linearly interpolate between two values at fraction `f` in [0, 1].
    pub fn interpolate_value(start: f64, end: f64, f: f64) -> f64 {
        start + (end - start) * f
    }

    /// Interpolate two compass bearings along the shorter arc.
    pub fn interpolate_bearing(start: f64, end: f64, f: f64) -> f64 {
        let delta = (end - start + 540.0).rem_euclid(360.0) - 180.0;
        (start + delta * f).rem_euclid(360.0)
    }

    fn column(observations: &[HourlyObservation], field: fn(&HourlyObservation) -> f64) -> Vec<f64> {
        observations.iter().map(field).collect()
    }

    /// Fill each `NaN` run of `values` that lies between two finite values.
    /// Leading and trailing runs stay `NaN`. `times` are the positions of the
    /// values (seconds) and weight the interpolation.
    fn fill_column(values: &mut [f64], times: &[i64], interpolate: fn(f64, f64, f64) -> f64) {
        let mut previous: Option<usize> = None;
        for i in 0..values.len() {
            if !values[i].is_finite() {
                continue;
            }
            if let Some(p) = previous {
                if i - p > 1 {
                    let span = (times[i] - times[p]) as f64;
                    for j in (p + 1)..i {
                        let f = if span > 0.0 {
                            (times[j] - times[p]) as f64 / span
                        } else {
                            0.0
                        };
                        values[j] = interpolate(values[p], values[i], f);
                    }
                }
            }
            previous = Some(i);
        }
    }

    /// Fill missing measurements of a time-sorted series by linear
    /// interpolation between the nearest complete neighbours of each column.
    ///
    /// Gaps at the start or end of the series cannot be bracketed and are left
    /// missing for the estimator's missing value policy to resolve.
    pub fn interpolate_missing(observations: &[HourlyObservation]) -> Vec<HourlyObservation> {
        let times: Vec<i64> = observations.iter().map(|o| o.timestamp.timestamp()).collect();
        let mut temperature = column(observations, |o| o.temperature);
        let mut precipitation = column(observations, |o| o.precipitation);
        let mut wind_speed = column(observations, |o| o.wind_speed);
        let mut wind_direction = column(observations, |o| o.wind_direction);
        fill_column(&mut temperature, &times, interpolate_value);
        fill_column(&mut precipitation, &times, interpolate_value);
        fill_column(&mut wind_speed, &times, interpolate_value);
        fill_column(&mut wind_direction, &times, interpolate_bearing);

        observations
            .iter()
            .enumerate()
            .map(|(i, obs)| {
                HourlyObservation::new(
                    obs.timestamp,
                    temperature[i],
                    precipitation[i],
                    wind_speed[i],
                    wind_direction[i],
                )
            })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Duration, FixedOffset, TimeZone};

        fn series(values: &[(f64, f64)]) -> Vec<HourlyObservation> {
            let start = FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2022, 2, 1, 0, 0, 0)
                .unwrap();
            values
                .iter()
                .enumerate()
                .map(|(i, (speed, dir))| {
                    let t = start + Duration::hours(i as i64);
                    HourlyObservation::new(t, -1.0, 0.0, *speed, *dir)
                })
                .collect()
        }

        #[test]
        fn test_interpolate_speed_gap() {
            let nan = f64::NAN;
            let gappy = series(&[(4.0, 90.0), (nan, nan), (nan, nan), (10.0, 90.0)]);
            let filled = interpolate_missing(&gappy);
            assert!((filled[1].wind_speed - 6.0).abs() < 1e-12);
            assert!((filled[2].wind_speed - 8.0).abs() < 1e-12);
            assert!((filled[2].wind_direction - 90.0).abs() < 1e-12);
            assert!(filled.iter().all(|o| o.is_complete()));
        }

        #[test]
        fn test_direction_takes_short_way_round() {
            let nan = f64::NAN;
            let filled = interpolate_missing(&series(&[(5.0, 350.0), (5.0, nan), (5.0, 10.0)]));
            assert!(filled[1].wind_direction.abs() < 1e-9);
            assert!((interpolate_bearing(10.0, 350.0, 0.25) - 5.0).abs() < 1e-9);
        }

        #[test]
        fn test_edges_stay_missing() {
            let nan = f64::NAN;
            let filled = interpolate_missing(&series(&[(nan, 0.0), (3.0, 0.0), (nan, 0.0)]));
            assert!(filled[0].wind_speed.is_nan());
            assert_eq!(filled[1].wind_speed, 3.0);
            assert!(filled[2].wind_speed.is_nan());
        }

        #[test]
        fn test_interpolate_value() {
            assert_eq!(interpolate_value(7.0, 16.0, 0.0), 7.0);
            assert_eq!(interpolate_value(7.0, 16.0, 1.0), 16.0);
        }
    }
}
