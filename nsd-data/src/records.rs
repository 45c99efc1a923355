//! CSV form of hourly observations as handed over by a weather provider.
//!
//! # CSV Format
//!
//! Has headers: `timestamp,temperature,precipitation,wind_speed,wind_direction`
//!
//! ```text
//! timestamp,temperature,precipitation,wind_speed,wind_direction
//! 2021-01-01T00:00:00+01:00,-6.1,0.2,9.4,268
//! 2021-01-01T01:00:00+01:00,-6.3,,9.9,271
//! ```
//!
//! Timestamps are RFC 3339 and must share one offset. An empty measurement
//! cell is a missing value.

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use log::{info, warn};
use nsd_core::{
    observation::{HourlyObservation, HourlySeries},
    provider::Location,
};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

use crate::interpolation::interpolate_missing;
use crate::memory::InMemoryProvider;
use crate::resample::fill_missing_hours;

#[derive(Debug, Serialize, Deserialize)]
struct ObservationRecord {
    timestamp: DateTime<FixedOffset>,
    temperature: Option<f64>,
    precipitation: Option<f64>,
    wind_speed: Option<f64>,
    wind_direction: Option<f64>,
}

impl From<ObservationRecord> for HourlyObservation {
    fn from(record: ObservationRecord) -> Self {
        let value = |v: Option<f64>| v.unwrap_or(f64::NAN);
        HourlyObservation::new(
            record.timestamp,
            value(record.temperature),
            value(record.precipitation),
            value(record.wind_speed),
            value(record.wind_direction),
        )
    }
}

impl From<&HourlyObservation> for ObservationRecord {
    fn from(obs: &HourlyObservation) -> Self {
        let value = |v: f64| if v.is_finite() { Some(v) } else { None };
        ObservationRecord {
            timestamp: obs.timestamp,
            temperature: value(obs.temperature),
            precipitation: value(obs.precipitation),
            wind_speed: value(obs.wind_speed),
            wind_direction: value(obs.wind_direction),
        }
    }
}

/// Parse hourly observations from CSV.
pub fn read_observations<R: Read>(reader: R) -> anyhow::Result<Vec<HourlyObservation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for (line, result) in rdr.deserialize::<ObservationRecord>().enumerate() {
        // header is line 1
        let record = result.with_context(|| format!("invalid observation on line {}", line + 2))?;
        observations.push(record.into());
    }

    let offsets = observations
        .iter()
        .map(|o: &HourlyObservation| o.timestamp.offset().local_minus_utc())
        .collect::<std::collections::BTreeSet<_>>();
    if offsets.len() > 1 {
        warn!(
            "Observations use {} different UTC offsets; season boundaries follow each row's own offset",
            offsets.len()
        );
    }
    Ok(observations)
}

/// Write hourly observations as CSV, missing values as empty cells.
pub fn write_observations<W: Write>(writer: W, observations: &[HourlyObservation]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for obs in observations {
        wtr.serialize(ObservationRecord::from(obs))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Load a CSV file holding the series of a single location.
///
/// Absent hours between the first and last row become explicit missing
/// hours; with `interpolate` set, bracketed gaps are then filled linearly.
pub fn load_location_file<P: AsRef<Path>>(
    path: P,
    location: &Location,
    interpolate: bool,
) -> anyhow::Result<InMemoryProvider> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening weather series {}", path.display()))?;
    let raw = read_observations(file)
        .with_context(|| format!("reading weather series {}", path.display()))?;
    let mut observations = fill_missing_hours(&raw);
    if interpolate {
        observations = interpolate_missing(&observations);
    }
    info!(
        "Loaded {} hours for {} from {} ({} rows, {} incomplete hours)",
        observations.len(),
        location.name,
        path.display(),
        raw.len(),
        observations.incomplete_hours()
    );
    Ok(InMemoryProvider::new().with_series(location, observations))
}
