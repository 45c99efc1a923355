//! Snow transport after Tabler (2003), "Controlling Blowing and Drifting
//! Snow with Snow Fences and Road Design".
//!
//! Wind speeds are hourly means at 10 m. All transport quantities are in kg
//! per metre of width perpendicular to the wind.

use crate::{
    error::{Result, SnowDriftError},
    observation::{HourlyObservation, HourlySeries, MissingValuePolicy},
    sector::{Sector, SectorRose},
};
use log::debug;
use serde::Serialize;
use std::fmt;

/// Length of one observation interval, seconds.
pub const HOUR_SECONDS: f64 = 3600.0;

/// Exponent of the wind speed in the saltation flux relation.
pub const WIND_EXPONENT: f64 = 3.8;

/// Empirical constant converting Σ u^3.8 · dt into kg/m.
pub const TRANSPORT_CONSTANT: f64 = 233_847.0;

/// Precipitation falls as snow below this air temperature, °C.
pub const SNOWFALL_TEMPERATURE: f64 = 1.0;

/// Base of the fetch saturation curve.
const FETCH_DECAY_BASE: f64 = 0.14;

/// Calibration of the Tabler model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TablerParameters {
    /// T: maximum transport distance, m
    pub transport_distance: f64,
    /// F: fetch distance, m
    pub fetch_distance: f64,
    /// theta: fraction of snowfall water equivalent available for relocation
    pub relocation_coefficient: f64,
}

impl TablerParameters {
    pub fn new(transport_distance: f64, fetch_distance: f64, relocation_coefficient: f64) -> Self {
        TablerParameters {
            transport_distance,
            fetch_distance,
            relocation_coefficient,
        }
    }
}

impl Default for TablerParameters {
    /// Literature values: T = 3000 m, F = 30 km, theta = 0.5.
    fn default() -> Self {
        TablerParameters::new(3000.0, 30000.0, 0.5)
    }
}

/// Which limit governs the controlling transport rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlRegime {
    WindControlled,
    SnowfallControlled,
}

impl fmt::Display for ControlRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlRegime::WindControlled => write!(f, "Wind controlled"),
            ControlRegime::SnowfallControlled => write!(f, "Snowfall controlled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransportEstimate {
    /// Potential wind-driven transport, kg/m
    pub qupot: f64,
    /// Snowfall-limited transport potential, kg/m
    pub qspot: f64,
    /// Relocatable snow water equivalent, mm
    pub srwe: f64,
    /// Controlling transport, kg/m
    pub qinf: f64,
    /// Transport accumulated over the fetch, kg/m
    pub qt: f64,
    pub control: ControlRegime,
}

/// Transport contributed by one hour of wind.
fn hourly_transport(wind_speed: f64) -> f64 {
    if !wind_speed.is_finite() || wind_speed <= 0.0 {
        return 0.0;
    }
    wind_speed.powf(WIND_EXPONENT) * HOUR_SECONDS / TRANSPORT_CONSTANT
}

/// Qupot: Σ u^3.8 · dt / 233847 over the hourly wind speeds.
pub fn compute_potential_transport(hourly_wind_speeds: &[f64]) -> f64 {
    hourly_wind_speeds.iter().map(|u| hourly_transport(*u)).sum()
}

/// Potential transport binned by the direction the wind blew from.
///
/// Hours without a finite direction are left out of the rose, so its total
/// equals `compute_potential_transport` only when every direction is finite.
/// Resolve gaps with a [`MissingValuePolicy`] first to keep the two in step.
pub fn compute_sector_transport(
    hourly_wind_speeds: &[f64],
    hourly_wind_dirs: &[f64],
) -> Result<SectorRose> {
    if hourly_wind_speeds.len() != hourly_wind_dirs.len() {
        return Err(SnowDriftError::MisalignedInput {
            speeds: hourly_wind_speeds.len(),
            directions: hourly_wind_dirs.len(),
        });
    }
    let mut rose = SectorRose::zero();
    for (u, direction) in hourly_wind_speeds.iter().zip(hourly_wind_dirs) {
        if !direction.is_finite() {
            continue;
        }
        rose.add(Sector::from_bearing(*direction), hourly_transport(*u));
    }
    Ok(rose)
}

/// Total snowfall water equivalent (mm): precipitation of the hours colder than 1 °C.
pub fn compute_snow_water_equivalent(observations: &[HourlyObservation]) -> f64 {
    observations
        .iter()
        .filter(|o| o.temperature < SNOWFALL_TEMPERATURE && o.precipitation.is_finite())
        .map(|o| o.precipitation)
        .sum()
}

/// Run the Tabler model for one period.
pub fn compute_transport(
    params: &TablerParameters,
    swe_total: f64,
    hourly_wind_speeds: &[f64],
) -> TransportEstimate {
    let t = params.transport_distance;
    let qupot = compute_potential_transport(hourly_wind_speeds);
    let qspot = 0.5 * t * swe_total;
    let srwe = params.relocation_coefficient * swe_total;

    let (qinf, control) = if qupot > qspot {
        (0.5 * t * srwe, ControlRegime::SnowfallControlled)
    } else {
        (qupot, ControlRegime::WindControlled)
    };

    let qt = qinf * (1.0 - FETCH_DECAY_BASE.powf(params.fetch_distance / t));
    TransportEstimate {
        qupot,
        qspot,
        srwe,
        qinf,
        qt,
        control,
    }
}

/// Resolve missing values with `policy`, then run the model on the series.
/// Returns `None` when there is nothing to estimate from.
pub fn estimate_transport(
    observations: &[HourlyObservation],
    params: &TablerParameters,
    policy: MissingValuePolicy,
) -> Option<TransportEstimate> {
    if observations.is_empty() {
        return None;
    }
    let resolved = policy.apply(observations);
    if resolved.is_empty() {
        return None;
    }
    let swe_total = compute_snow_water_equivalent(&resolved);
    let estimate = compute_transport(params, swe_total, &resolved.wind_speeds());
    debug!(
        "{} hours, Swe {:.1} mm, Qupot {:.0} kg/m, Qt {:.0} kg/m ({})",
        resolved.len(),
        swe_total,
        estimate.qupot,
        estimate.qt,
        estimate.control
    );
    Some(estimate)
}

/// Sector rose of a series after resolving missing values with `policy`.
pub fn estimate_sector_transport(
    observations: &[HourlyObservation],
    policy: MissingValuePolicy,
) -> SectorRose {
    let resolved = policy.apply(observations);
    let mut rose = SectorRose::zero();
    for obs in &resolved {
        rose.add(
            Sector::from_bearing(obs.wind_direction),
            hourly_transport(obs.wind_speed),
        );
    }
    rose
}
