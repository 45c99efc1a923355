use chrono::{DateTime, FixedOffset, TimeDelta};
use std::mem::replace;

/// An hourly iterator that yields each timestamp from the start
/// through the end (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct HourRange(pub DateTime<FixedOffset>, pub DateTime<FixedOffset>);

impl Iterator for HourRange {
    type Item = DateTime<FixedOffset>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + TimeDelta::hours(1);
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HourRange;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn at(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2022, 1, 1, hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_hour_range_iteration() {
        let hours: Vec<_> = HourRange(at(0), at(4)).collect();
        assert_eq!(hours.len(), 5);
        assert_eq!(hours[0], at(0));
        assert_eq!(hours[4], at(4));
    }

    #[test]
    fn test_hour_range_single_hour() {
        assert_eq!(HourRange(at(7), at(7)).count(), 1);
    }

    #[test]
    fn test_hour_range_empty() {
        assert_eq!(HourRange(at(5), at(4)).count(), 0);
    }
}
