//! Time handling for seismogram requests.
//!
//! Request times come in three shapes: absolute UTC instants, bare numeric
//! offsets in seconds, and offsets relative to the arrival of a seismic
//! phase. [`TimeSpec`] carries all three; resolution into absolute times
//! happens in the protocol crate once the origin time and travel times are
//! known.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing request times.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid phase specification: {0}")]
    InvalidPhase(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),
}

/// The reference origin used when a request does not name one.
pub fn epoch() -> DateTime<Utc> {
    Utc.from_utc_datetime(&NaiveDateTime::default())
}

/// Parse an absolute UTC time.
///
/// Accepts RFC 3339 (`2024-01-15T12:00:00Z`), naive date-times with optional
/// fractional seconds (assumed UTC) and plain dates.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Parse a finite floating point number of seconds.
pub fn parse_seconds(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shift `time` by a (possibly fractional, possibly negative) number of
/// seconds. Returns `None` if the result is not representable.
pub fn add_seconds(time: DateTime<Utc>, seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1e6).round();
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }
    time.checked_add_signed(Duration::microseconds(micros as i64))
}

/// Signed number of seconds from `earlier` to `later`.
pub fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let delta = later.signed_duration_since(earlier);
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// Format a time the way it appears in filenames and log lines.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// "N seconds relative to the arrival of phase P".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseOffset {
    /// Seismic phase name, e.g. `P`, `PKiKP`, `Pdiff`.
    pub phase: String,
    /// Offset in seconds from the phase arrival.
    pub offset: f64,
}

impl PhaseOffset {
    pub fn new(phase: impl Into<String>, offset: f64) -> Self {
        Self {
            phase: phase.into(),
            offset,
        }
    }

    /// Parse `PHASE`, `PHASE+SECONDS` or `PHASE-SECONDS`.
    ///
    /// A space is accepted in place of `+` since an unescaped `+` in a query
    /// string decodes to a space.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let s = s.trim();

        let (phase, offset) = match s.find(['+', '-', ' ']) {
            Some(idx) => {
                let sign = if s[idx..].starts_with('-') { -1.0 } else { 1.0 };
                let raw_offset = &s[idx + 1..];
                let offset = parse_seconds(raw_offset)
                    .ok_or_else(|| TimeParseError::InvalidOffset(raw_offset.trim().to_string()))?;
                (s[..idx].trim(), sign * offset)
            }
            None => (s, 0.0),
        };

        if !is_valid_phase_name(phase) {
            return Err(TimeParseError::InvalidPhase(s.to_string()));
        }

        Ok(Self::new(phase, offset))
    }
}

fn is_valid_phase_name(phase: &str) -> bool {
    let mut chars = phase.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '\'' | '^' | '_'))
}

/// A start or end time as given in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeSpec {
    /// An absolute instant.
    Absolute { time: DateTime<Utc> },
    /// Seconds relative to some reference (origin time or start time).
    Offset { seconds: f64 },
    /// Seconds relative to a phase arrival.
    PhaseRelative(PhaseOffset),
}

impl TimeSpec {
    pub fn absolute(time: DateTime<Utc>) -> Self {
        TimeSpec::Absolute { time }
    }

    pub fn offset(seconds: f64) -> Self {
        TimeSpec::Offset { seconds }
    }

    pub fn phase(phase: impl Into<String>, offset: f64) -> Self {
        TimeSpec::PhaseRelative(PhaseOffset::new(phase, offset))
    }

    /// Parse a time setting.
    ///
    /// Tried in order: number of seconds, absolute time, phase-relative time.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeParseError::InvalidFormat(String::new()));
        }

        if let Some(seconds) = parse_seconds(s) {
            return Ok(TimeSpec::offset(seconds));
        }

        if let Ok(time) = parse_datetime(s) {
            return Ok(TimeSpec::absolute(time));
        }

        PhaseOffset::parse(s).map(TimeSpec::PhaseRelative)
    }

    /// The absolute time, if this is one.
    pub fn as_absolute(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeSpec::Absolute { time } => Some(*time),
            _ => None,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, TimeSpec::Absolute { .. })
    }

    pub fn is_phase_relative(&self) -> bool {
        matches!(self, TimeSpec::PhaseRelative(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2010, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(parse_datetime("2010-03-04T05:06:07Z").unwrap(), expected);
        assert_eq!(parse_datetime("2010-03-04T05:06:07").unwrap(), expected);
        assert_eq!(
            parse_datetime("2010-03-04").unwrap(),
            Utc.with_ymd_and_hms(2010, 3, 4, 0, 0, 0).unwrap()
        );
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_parse_datetime_fractional() {
        let t = parse_datetime("2010-03-04T05:06:07.250").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_time_spec_number_is_offset() {
        assert_eq!(TimeSpec::parse("60").unwrap(), TimeSpec::offset(60.0));
        assert_eq!(TimeSpec::parse("-12.5").unwrap(), TimeSpec::offset(-12.5));
    }

    #[test]
    fn test_time_spec_rejects_non_finite() {
        // "inf" falls through to the phase parser and is then a phase name.
        assert!(matches!(
            TimeSpec::parse("inf").unwrap(),
            TimeSpec::PhaseRelative(_)
        ));
        assert!(TimeSpec::parse("NaN+1").is_ok());
        assert!(TimeSpec::parse("").is_err());
    }

    #[test]
    fn test_time_spec_absolute() {
        let spec = TimeSpec::parse("2012-01-01T00:00:00Z").unwrap();
        assert!(spec.is_absolute());
    }

    #[test]
    fn test_time_spec_phase_relative() {
        assert_eq!(TimeSpec::parse("P").unwrap(), TimeSpec::phase("P", 0.0));
        assert_eq!(TimeSpec::parse("P-10").unwrap(), TimeSpec::phase("P", -10.0));
        assert_eq!(TimeSpec::parse("PKiKP+2.5").unwrap(), TimeSpec::phase("PKiKP", 2.5));
        // '+' decoded from a query string as a space
        assert_eq!(TimeSpec::parse("S 20").unwrap(), TimeSpec::phase("S", 20.0));
    }

    #[test]
    fn test_time_spec_invalid_phase() {
        assert!(matches!(
            TimeSpec::parse("P+abc"),
            Err(TimeParseError::InvalidOffset(_))
        ));
        assert!(matches!(
            TimeSpec::parse("10P"),
            Err(TimeParseError::InvalidPhase(_))
        ));
        assert!(TimeSpec::parse("P?").is_err());
    }

    #[test]
    fn test_add_seconds() {
        let t = epoch();
        assert_eq!(add_seconds(t, 60.0).unwrap().timestamp(), 60);
        assert_eq!(
            add_seconds(t, 1.5).unwrap().timestamp_subsec_millis(),
            500
        );
        assert!(add_seconds(t, f64::NAN).is_none());
        assert!(add_seconds(t, 1e300).is_none());
    }

    #[test]
    fn test_seconds_between() {
        let a = epoch();
        let b = add_seconds(a, 3600.25).unwrap();
        assert!((seconds_between(a, b) - 3600.25).abs() < 1e-9);
        assert!((seconds_between(b, a) + 3600.25).abs() < 1e-9);
    }

    #[test]
    fn test_format_timestamp() {
        let t = Utc.with_ymd_and_hms(2015, 6, 1, 12, 30, 45).unwrap();
        assert_eq!(format_timestamp(&t), "2015-06-01T12:30:45.000000Z");
    }
}
