//! Shared command arguments and loading of the input series.

use clap::{Args, ValueEnum};
use log::debug;
use nsd_core::{
    observation::MissingValuePolicy,
    provider::{Location, PriceArea},
    transport::TablerParameters,
};
use nsd_data::{memory::InMemoryProvider, records};
use std::path::PathBuf;

/// How hours with missing measurements are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingMode {
    /// Count the hour as calm and dry
    Zero,
    /// Leave the hour out
    Exclude,
    /// Interpolate across the gap, counting unbracketed hours as calm and dry
    Interpolate,
}

#[derive(Args, Debug, Clone)]
pub struct SeriesArgs {
    /// Hourly observations CSV: timestamp,temperature,precipitation,wind_speed,wind_direction
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Price area whose reference city the series belongs to (NO1-NO5)
    #[arg(long)]
    pub area: Option<PriceArea>,

    /// Site name used in reports when no price area is given
    #[arg(long, default_value = "site")]
    pub name: String,

    /// Site latitude in decimal degrees
    #[arg(long, default_value_t = 0.0)]
    pub latitude: f64,

    /// Site longitude in decimal degrees
    #[arg(long, default_value_t = 0.0)]
    pub longitude: f64,

    /// Treatment of hours with missing measurements
    #[arg(long, value_enum, default_value_t = MissingMode::Zero)]
    pub missing: MissingMode,
}

impl SeriesArgs {
    pub fn location(&self) -> Location {
        match self.area {
            Some(area) => area.location(),
            None => Location::new(self.name.clone(), self.latitude, self.longitude),
        }
    }

    /// Policy the estimator applies after any interpolation.
    pub fn policy(&self) -> MissingValuePolicy {
        match self.missing {
            MissingMode::Exclude => MissingValuePolicy::ExcludeHour,
            MissingMode::Zero | MissingMode::Interpolate => MissingValuePolicy::ZeroContribution,
        }
    }

    /// Read the input file, make absent hours explicit and interpolate if asked.
    pub fn load(&self) -> anyhow::Result<(Location, InMemoryProvider)> {
        let location = self.location();
        let provider = records::load_location_file(
            &self.input,
            &location,
            self.missing == MissingMode::Interpolate,
        )?;
        debug!("Missing value handling for {}: {:?}", location, self.missing);
        Ok((location, provider))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// T: maximum transport distance in metres
    #[arg(short = 'T', long, default_value_t = 3000.0)]
    pub transport_distance: f64,

    /// F: fetch distance in metres
    #[arg(short = 'F', long, default_value_t = 30000.0)]
    pub fetch_distance: f64,

    /// Relocation coefficient theta, fraction of snowfall available for drifting
    #[arg(long, default_value_t = 0.5)]
    pub theta: f64,
}

impl ModelArgs {
    pub fn parameters(&self) -> TablerParameters {
        TablerParameters::new(self.transport_distance, self.fetch_distance, self.theta)
    }
}
