//! Holiday date arithmetic: status against today, inclusive day counts,
//! display ranges and reconciliation against arbitrary date windows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Inclusive calendar-date range. `end >= start` is checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        days_off(self.start, self.end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        DateRange::new(self.start.max(other.start), self.end.min(other.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayStatus {
    Active,
    Upcoming,
    Past,
}

impl HolidayStatus {
    fn rank(self) -> u8 {
        match self {
            HolidayStatus::Active => 0,
            HolidayStatus::Upcoming => 1,
            HolidayStatus::Past => 2,
        }
    }
}

pub fn classify(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> HolidayStatus {
    if start <= today && today <= end {
        HolidayStatus::Active
    } else if today < start {
        HolidayStatus::Upcoming
    } else {
        HolidayStatus::Past
    }
}

/// `|end - start| + 1`, so a single-day holiday counts as one day.
pub fn days_off(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}

/// Human-readable range. Cross-year ranges spell out both years.
pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        start.format("%-d %b %Y").to_string()
    } else if start.year() == end.year() {
        format!("{} - {}", start.format("%-d %b"), end.format("%-d %b %Y"))
    } else {
        format!("{} - {}", start.format("%-d %b %Y"), end.format("%-d %b %Y"))
    }
}

/// Ordering for holiday lists: active first, then upcoming with the nearest
/// first, then past with the most recent first.
pub fn display_order(
    a: (NaiveDate, NaiveDate),
    b: (NaiveDate, NaiveDate),
    today: NaiveDate,
) -> Ordering {
    let sa = classify(a.0, a.1, today);
    let sb = classify(b.0, b.1, today);
    sa.rank().cmp(&sb.rank()).then_with(|| match sa {
        HolidayStatus::Past => b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)),
        _ => a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)),
    })
}

/// Days of `holiday` falling inside `window`, inclusive. Zero when disjoint.
pub fn overlap_days(holiday: &DateRange, window: &DateRange) -> i64 {
    holiday.intersect(window).map_or(0, |r| r.days())
}

/// Merges overlapping or adjacent ranges into a sorted, disjoint list.
pub fn merge_ranges(mut ranges: Vec<DateRange>) -> Vec<DateRange> {
    ranges.sort_by_key(|r| (r.start, r.end));
    let mut merged: Vec<DateRange> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end.succ_opt().unwrap_or(last.end) => {
                last.end = last.end.max(r.end);
            }
            _ => merged.push(r),
        }
    }
    merged
}

/// Holiday days inside `window`, counting overlapping holidays once.
pub fn holiday_days_in(window: &DateRange, holidays: &[DateRange]) -> i64 {
    let clipped = holidays.iter().filter_map(|h| h.intersect(window)).collect();
    merge_ranges(clipped).iter().map(DateRange::days).sum()
}

/// Calendar days of `window` not covered by any holiday.
pub fn working_days(window: &DateRange, holidays: &[DateRange]) -> i64 {
    window.days() - holiday_days_in(window, holidays)
}
