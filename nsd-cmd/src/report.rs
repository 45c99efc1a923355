//! Seasonal drift, rose and range reports.

use crate::input::{ModelArgs, SeriesArgs};
use chrono::NaiveDate;
use log::info;
use nsd_core::{
    fence::FenceType,
    observation::MissingValuePolicy,
    provider::{Location, WeatherSeriesProvider},
    season::Season,
    seasonal::{average_sector_transport, mean_transport, seasonal_transport},
    sector::SectorRose,
    transport::{estimate_transport, TablerParameters, TransportEstimate},
};
use nsd_data::cache::CachedProvider;
use nsd_utils::{dates::day_bounds, units::kg_to_tonnes};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SeasonRow {
    pub season: Season,
    pub qt_kg_per_m: Option<f64>,
    pub qt_tonnes_per_m: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FenceSizing {
    pub fence_type: FenceType,
    pub height_m: f64,
}

#[derive(Debug, Serialize)]
pub struct DriftReport {
    pub location: Location,
    pub parameters: TablerParameters,
    pub seasons: Vec<SeasonRow>,
    pub mean_qt_kg_per_m: Option<f64>,
    pub rose: SectorRose,
    pub dominant_sector: Option<String>,
    pub fence: Option<FenceSizing>,
}

#[derive(Debug, Serialize)]
pub struct RangeReport {
    pub location: Location,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub parameters: TablerParameters,
    pub estimate: Option<TransportEstimate>,
}

/// Seasonal Qt, its mean, the average rose and optional fence sizing.
pub fn drift_report<P: WeatherSeriesProvider>(
    provider: &P,
    location: &Location,
    seasons: &[Season],
    params: &TablerParameters,
    policy: MissingValuePolicy,
    fence_type: Option<&str>,
) -> anyhow::Result<DriftReport> {
    // fail on a bad fence name before any work is done
    let fence_type = fence_type
        .map(|name| name.parse::<FenceType>())
        .transpose()?;

    let cached = CachedProvider::new(provider);
    let per_season = seasonal_transport(&cached, location, seasons, params, policy)?;
    let mean = mean_transport(&per_season);
    let rose = average_sector_transport(&cached, std::slice::from_ref(location), seasons, policy)?;
    info!(
        "Drift report for {}: {} provider requests, {} served from cache",
        location.name,
        cached.misses(),
        cached.hits()
    );

    let fence = match (fence_type, mean) {
        (Some(fence_type), Some(qt)) => Some(FenceSizing {
            fence_type,
            height_m: fence_type.required_height(qt),
        }),
        _ => None,
    };

    Ok(DriftReport {
        location: location.clone(),
        parameters: *params,
        seasons: per_season
            .into_iter()
            .map(|(season, qt)| SeasonRow {
                season,
                qt_kg_per_m: qt,
                qt_tonnes_per_m: qt.map(kg_to_tonnes),
            })
            .collect(),
        mean_qt_kg_per_m: mean,
        rose,
        dominant_sector: rose.dominant().map(|sector| sector.to_string()),
        fence,
    })
}

fn format_tonnes(qt: Option<f64>) -> String {
    match qt {
        Some(qt) => format!("{:>10.1}", kg_to_tonnes(qt)),
        None => format!("{:>10}", "no data"),
    }
}

fn print_rose(rose: &SectorRose) {
    println!("{:<6}{:>14}", "Sector", "tonnes/m");
    for (sector, value) in rose.iter() {
        println!("{:<6}{:>14.2}", sector.label(), kg_to_tonnes(value));
    }
    match rose.dominant() {
        Some(sector) => println!("Dominant sector: {sector}"),
        None => println!("No snow transport in the selected seasons"),
    }
}

fn print_drift(report: &DriftReport) {
    println!("Snow drift for {} (July-June seasons)", report.location);
    println!("{:<12}{:>10}", "Season", "Qt t/m");
    for row in &report.seasons {
        println!("{:<12}{}", row.season.to_string(), format_tonnes(row.qt_kg_per_m));
    }
    println!("{:<12}{}", "Mean", format_tonnes(report.mean_qt_kg_per_m));
    println!();
    print_rose(&report.rose);
    if let Some(fence) = &report.fence {
        println!();
        println!(
            "{} fence height for mean transport: {:.2} m",
            fence.fence_type, fence.height_m
        );
    }
}

pub fn run_drift(
    series: &SeriesArgs,
    model: &ModelArgs,
    seasons: &[Season],
    fence_type: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let (location, provider) = series.load()?;
    let report = drift_report(
        &provider,
        &location,
        seasons,
        &model.parameters(),
        series.policy(),
        fence_type,
    )?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_drift(&report);
    }
    Ok(())
}

pub fn run_rose(series: &SeriesArgs, seasons: &[Season], json: bool) -> anyhow::Result<()> {
    let (location, provider) = series.load()?;
    let rose = average_sector_transport(
        &provider,
        std::slice::from_ref(&location),
        seasons,
        series.policy(),
    )?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rose)?);
    } else {
        println!("Average directional snow transport for {location}");
        print_rose(&rose);
    }
    Ok(())
}

/// Tabler estimate over whole days `start` to `end`.
pub fn range_report<P: WeatherSeriesProvider>(
    provider: &P,
    location: &Location,
    start: NaiveDate,
    end: NaiveDate,
    params: &TablerParameters,
    policy: MissingValuePolicy,
) -> anyhow::Result<RangeReport> {
    if end < start {
        anyhow::bail!("End date {end} precedes start date {start}");
    }
    let (from, to) = day_bounds(&start, &end)
        .ok_or_else(|| anyhow::anyhow!("Date range {start} to {end} is out of range"))?;
    let observations = provider.hourly_observations(location, from, to)?;
    Ok(RangeReport {
        location: location.clone(),
        start,
        end,
        parameters: *params,
        estimate: estimate_transport(&observations, params, policy),
    })
}

pub fn run_estimate(
    series: &SeriesArgs,
    model: &ModelArgs,
    start: NaiveDate,
    end: NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    let (location, provider) = series.load()?;
    let report = range_report(
        &provider,
        &location,
        start,
        end,
        &model.parameters(),
        series.policy(),
    )?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("Snow transport for {} from {} to {}", location, start, end);
    match report.estimate {
        Some(estimate) => {
            println!("Qupot {:>12.1} kg/m", estimate.qupot);
            println!("Qspot {:>12.1} kg/m", estimate.qspot);
            println!("Srwe  {:>12.1} mm", estimate.srwe);
            println!("Qinf  {:>12.1} kg/m", estimate.qinf);
            println!("Qt    {:>12.1} kg/m", estimate.qt);
            println!("{}", estimate.control);
        }
        None => println!("No observations in range"),
    }
    Ok(())
}
