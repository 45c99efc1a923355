//! Shared utility functions for NSD crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    /// Month in which a snow season starts (July).
    pub const SEASON_START_MONTH: u32 = 7;

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Get the snow season for a given date.
    /// A season runs Jul 1 to Jun 30.
    /// e.g., Jul 1 2022 -> season 2022, Jun 30 2023 -> season 2022
    pub fn season_start_year(date: &NaiveDate) -> i32 {
        let month = date.month();
        let year = date.year();
        if month >= SEASON_START_MONTH {
            year
        } else {
            year - 1
        }
    }

    /// First and last second of the season starting in `start_year`:
    /// Jul 1 00:00:00 through Jun 30 23:59:59 of the following year.
    pub fn season_bounds(start_year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = NaiveDate::from_ymd_opt(start_year, SEASON_START_MONTH, 1)?
            .and_hms_opt(0, 0, 0)?;
        let end = NaiveDate::from_ymd_opt(start_year.checked_add(1)?, 6, 30)?
            .and_hms_opt(23, 59, 59)?;
        Some((start, end))
    }

    /// Inclusive range covering whole days: `start` 00:00:00 to `end` 23:59:59.
    pub fn day_bounds(start: &NaiveDate, end: &NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((start.and_hms_opt(0, 0, 0)?, end.and_hms_opt(23, 59, 59)?))
    }

}

/// Unit conversions
pub mod units {
    /// Kilograms in one metric tonne.
    pub const KG_PER_TONNE: f64 = 1000.0;

    /// Convert a transport value from kg/m to tonnes/m
    pub fn kg_to_tonnes(value: f64) -> f64 {
        value / KG_PER_TONNE
    }
}
