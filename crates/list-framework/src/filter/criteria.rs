//! The normalized filter snapshot handed to subscribers.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Inclusive day-aligned bounds of a date filter.
///
/// Both bounds are always present together; a half-open selection never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(rename = "startDate")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Builds a range from two picked instants, in either order.
    ///
    /// The earlier one is moved to 00:00:00.000 of its day, the later one to
    /// 23:59:59.999 of its day.
    pub fn from_selection(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        let (first, last) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

pub fn end_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(instant) + Duration::milliseconds(86_399_999)
}

/// Keys the flat serialized form already uses. A facet cannot take one of them.
pub const RESERVED_KEYS: [&str; 3] = ["search", "startDate", "endDate"];

/// Full snapshot of the filter inputs, emitted once per debounce window.
///
/// Serializes flat, the way list endpoints usually receive it:
/// `{"search": "...", "startDate": "...", "endDate": "...", "<facet>": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub search: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    /// Only facets that are set appear here; an unset facet is absent, not `""`.
    #[serde(flatten)]
    pub facets: BTreeMap<String, String>,
}

impl FilterCriteria {
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.range.map(|r| r.start)
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.range.map(|r| r.end)
    }

    pub fn facet(&self, key: &str) -> Option<&str> {
        self.facets.get(key).map(String::as_str)
    }

    /// True when no filter of any kind is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.range.is_none() && self.facets.is_empty()
    }
}
