use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// inclusive range of calendar dates, start never after end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::DateOrder { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// parse both ends in YYYY-MM-DD
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        DateRange::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// whole days, so any intraday timestamp on the end date is included
    pub fn include(&self, ts: &NaiveDateTime) -> bool {
        let d = ts.date();
        self.start <= d && d <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::DateFormat(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() -> Result<()> {
        let r = DateRange::parse("2024-01-03", "2024-01-05")?;
        assert_eq!(NaiveDate::from_ymd_opt(2024, 1, 3), Some(r.start()));
        assert_eq!(NaiveDate::from_ymd_opt(2024, 1, 5), Some(r.end()));
        assert_eq!("2024-01-03 to 2024-01-05", r.to_string());
        // single day
        DateRange::parse("2024-01-03", "2024-01-03")?;
        // unpadded fields
        let r = DateRange::parse("2024-1-3", "2024-1-5")?;
        assert_eq!("2024-01-03 to 2024-01-05", r.to_string());
        Ok(())
    }

    #[test]
    fn test_parse_range_errors() {
        assert!(matches!(
            DateRange::parse("2024-01-05", "2024-01-03"),
            Err(Error::DateOrder { .. })
        ));
        for bad in &["2024/01/03", "2024-02-30", "", "yesterday", "2024-01-03 10:00"] {
            assert!(
                matches!(DateRange::parse(bad, "2024-12-31"), Err(Error::DateFormat(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_include() -> Result<()> {
        let r = DateRange::parse("2024-01-03", "2024-01-05")?;
        let ts = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        assert!(r.include(&ts("2024-01-03 00:00:00")));
        assert!(r.include(&ts("2024-01-05 19:55:00")));
        assert!(!r.include(&ts("2024-01-02 23:59:59")));
        assert!(!r.include(&ts("2024-01-06 00:00:00")));
        Ok(())
    }
}
