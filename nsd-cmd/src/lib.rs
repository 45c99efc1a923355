//! Command implementations for NSD CLI.
//!
//! Provides subcommands for seasonal snow drift estimates, directional
//! transport roses, single-range estimates and snow fence sizing.

use clap::Subcommand;
use nsd_core::season::Season;

pub mod fence;
pub mod input;
pub mod report;

use input::{ModelArgs, SeriesArgs};

#[derive(Subcommand)]
pub enum Command {
    /// Snow transport per season (July-June) with the average directional rose
    Drift {
        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// First season, by its starting year (2015 for 2015-2016)
        #[arg(long)]
        first_season: i32,

        /// Last season, by its starting year
        #[arg(long)]
        last_season: i32,

        /// Also size a snow fence for the mean transport (Wyoming, Slat-and-wire, Solid)
        #[arg(long)]
        fence_type: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Average directional distribution of snow transport over seasons
    Rose {
        #[command(flatten)]
        series: SeriesArgs,

        /// First season, by its starting year
        #[arg(long)]
        first_season: i32,

        /// Last season, by its starting year
        #[arg(long)]
        last_season: i32,

        /// Print the rose as JSON
        #[arg(long)]
        json: bool,
    },

    /// Full Tabler estimate for an arbitrary date range
    Estimate {
        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// First day (YYYY-MM-DD), inclusive
        #[arg(long, value_parser = nsd_utils::dates::parse_date)]
        start: chrono::NaiveDate,

        /// Last day (YYYY-MM-DD), inclusive
        #[arg(long, value_parser = nsd_utils::dates::parse_date)]
        end: chrono::NaiveDate,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Snow fence height needed to store a given transport
    Fence {
        /// Snow transport Qt in kg/m
        #[arg(long)]
        qt: f64,

        /// Wyoming, Slat-and-wire or Solid
        #[arg(long)]
        fence_type: String,
    },

    /// List the price area reference locations (NO1-NO5)
    Areas,
}

fn seasons(first: i32, last: i32) -> anyhow::Result<Vec<Season>> {
    if last < first {
        anyhow::bail!("Last season ({last}) must not precede first season ({first})");
    }
    Ok(Season::range(first, last))
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Drift {
            series,
            model,
            first_season,
            last_season,
            fence_type,
            json,
        } => {
            let seasons = seasons(first_season, last_season)?;
            report::run_drift(&series, &model, &seasons, fence_type.as_deref(), json)
        }
        Command::Rose {
            series,
            first_season,
            last_season,
            json,
        } => {
            let seasons = seasons(first_season, last_season)?;
            report::run_rose(&series, &seasons, json)
        }
        Command::Estimate {
            series,
            model,
            start,
            end,
            json,
        } => report::run_estimate(&series, &model, start, end, json),
        Command::Fence { qt, fence_type } => fence::run_fence(qt, &fence_type),
        Command::Areas => fence::run_areas(),
    }
}

#[cfg(test)]
mod tests {
    use super::seasons;

    #[test]
    fn test_season_selection() {
        assert_eq!(seasons(2015, 2020).unwrap().len(), 6);
        assert!(seasons(2020, 2015).is_err());
    }
}
