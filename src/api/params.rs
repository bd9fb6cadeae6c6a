//! Query parameter parsing for the population endpoint.
//!
//! Every field is parsed independently and falls back to its default on bad
//! input; a malformed field never fails the request.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::config::defaults::DEFAULT_WINDOW_HOURS;
use crate::export::ExportRange;

/// Raw query parameters as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationQuery {
    pub start_datetime: Option<String>,
    pub end_datetime: Option<String>,
    pub metrics: Option<String>,
}

impl PopulationQuery {
    pub fn from_map(mut params: HashMap<String, String>) -> Self {
        Self {
            start_datetime: params.remove("start_datetime"),
            end_datetime: params.remove("end_datetime"),
            metrics: params.remove("metrics"),
        }
    }
}

/// The `metrics` argument, with each way of asking for "everything" kept
/// distinct from an actual list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsParam {
    /// Missing, or an empty string.
    Absent,
    /// Brackets with nothing usable inside, e.g. `[]`.
    Empty,
    /// A bracketed list, e.g. `[a,b,c]`.
    Listed(Vec<String>),
    /// No bracket pair; the raw value is kept for logging.
    Malformed(String),
}

impl MetricsParam {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Absent;
        };

        let inner = raw
            .find('[')
            .and_then(|open| raw[open + 1..].find(']').map(|close| &raw[open + 1..open + 1 + close]));
        let Some(inner) = inner else {
            return Self::Malformed(raw.to_string());
        };

        let names: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();
        if names.is_empty() {
            Self::Empty
        } else {
            Self::Listed(names)
        }
    }

    /// Metric overrides for the export request; empty means the default set.
    pub fn overrides(&self) -> Vec<String> {
        match self {
            Self::Listed(names) => names.clone(),
            Self::Absent | Self::Empty | Self::Malformed(_) => Vec::new(),
        }
    }
}

/// Parsed and defaulted population parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationParams {
    pub range: ExportRange,
    pub metrics: MetricsParam,
}

impl PopulationParams {
    /// Parse `query` against a single `now` snapshot.
    ///
    /// Defaults: `end = now`, `start = now - 1h`. A start after the end is
    /// passed through unchanged.
    pub fn parse(query: &PopulationQuery, now: NaiveDateTime) -> Self {
        let default_start = now - Duration::hours(DEFAULT_WINDOW_HOURS);

        let start = parse_field(query.start_datetime.as_deref(), "start_datetime")
            .unwrap_or(default_start);
        let end = parse_field(query.end_datetime.as_deref(), "end_datetime").unwrap_or(now);

        let metrics = MetricsParam::parse(query.metrics.as_deref());
        if let MetricsParam::Malformed(raw) = &metrics {
            warn!(metrics = %raw, "Got bad list of metrics, defaulting to all");
        }

        Self {
            range: ExportRange::new(start, end),
            metrics,
        }
    }
}

fn parse_field(raw: Option<&str>, field: &str) -> Option<NaiveDateTime> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse_iso8601(raw);
    if parsed.is_none() {
        warn!(field, value = %raw, "Invalid datetime, using default");
    }
    parsed
}

/// Parse an ISO-8601 timestamp into naive UTC.
///
/// Accepts RFC 3339 with an offset, naive date-times with `T` or a space
/// separator (optional seconds fraction), and bare dates (midnight).
pub fn parse_iso8601(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
