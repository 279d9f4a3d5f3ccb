use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SchoolError;
use crate::service::holiday_calendar::DateRange;

/// A billing month, written `YYYY-MM` on the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeeMonth {
    first_day: NaiveDate,
}

impl FeeMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn containing(day: NaiveDate) -> Self {
        Self {
            first_day: day.with_day(1).unwrap_or(day),
        }
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day.pred_opt().unwrap_or(self.first_day)
    }

    pub fn next(&self) -> Self {
        Self {
            first_day: self
                .first_day
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first_day),
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.first_day, self.last_day()).unwrap_or(DateRange::single(self.first_day))
    }

    /// Months from `start` to `end` inclusive.
    pub fn span(start: FeeMonth, end: FeeMonth) -> Vec<FeeMonth> {
        let mut out = Vec::new();
        let mut cur = start;
        while cur <= end {
            out.push(cur);
            let next = cur.next();
            if next == cur {
                break;
            }
            cur = next;
        }
        out
    }
}

impl fmt::Display for FeeMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.first_day.year(), self.first_day.month())
    }
}

impl FromStr for FeeMonth {
    type Err = SchoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchoolError::validation(format!("invalid month `{s}`, expected YYYY-MM"));
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        FeeMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for FeeMonth {
    type Error = SchoolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for FeeMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeeMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats() {
        let m: FeeMonth = "2025-02".parse().unwrap();
        assert_eq!(m.to_string(), "2025-02");
        assert_eq!(m.last_day(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        let leap: FeeMonth = "2024-02".parse().unwrap();
        assert_eq!(leap.range().days(), 29);
    }

    #[test]
    fn rejects_malformed_months() {
        for bad in ["2025-13", "2025-1", "25-01", "2025/01", "", "abcd-ef"] {
            assert!(bad.parse::<FeeMonth>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn december_rolls_into_next_year() {
        let dec: FeeMonth = "2025-12".parse().unwrap();
        assert_eq!(dec.next().to_string(), "2026-01");
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn span_covers_session_months() {
        let start = FeeMonth::containing(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
        let end = FeeMonth::containing(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let months = FeeMonth::span(start, end);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].to_string(), "2025-04");
        assert_eq!(months[11].to_string(), "2026-03");
    }
}
