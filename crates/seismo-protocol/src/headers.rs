//! Response metadata derived from validated request parameters.

use chrono::{DateTime, Utc};
use seismo_common::time::format_timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format of the seismograms endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A single MiniSEED file.
    Miniseed,
    /// A ZIP archive of SAC files.
    Saczip,
}

impl OutputFormat {
    /// Parse the `format` query value.
    pub fn from_query_param(s: &str) -> Option<Self> {
        match s {
            "miniseed" => Some(OutputFormat::Miniseed),
            "saczip" => Some(OutputFormat::Saczip),
            _ => None,
        }
    }

    /// Get the Content-Type header value for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Miniseed => "application/octet-stream",
            OutputFormat::Saczip => "application/zip",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Miniseed => "mseed",
            OutputFormat::Saczip => "zip",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Miniseed => f.write_str("miniseed"),
            OutputFormat::Saczip => f.write_str("saczip"),
        }
    }
}

/// Content headers of a seismogram download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub content_type: &'static str,
    pub content_disposition: String,
    pub filename: String,
}

/// Build the content headers for a download.
///
/// The filename is `<label>_<timestamp>.<ext>`, with `default_label` used
/// when `label` is absent or empty and colons in the timestamp replaced by
/// underscores.
pub fn build_headers(
    format: OutputFormat,
    label: Option<&str>,
    default_label: &str,
    now: DateTime<Utc>,
) -> ResponseHeaders {
    let label = label.filter(|l| !l.is_empty()).unwrap_or(default_label);
    let filename = format!(
        "{}_{}.{}",
        label,
        format_timestamp(&now).replace(':', "_"),
        format.extension()
    );

    ResponseHeaders {
        content_type: format.content_type(),
        content_disposition: format!("attachment; filename={}", filename),
        filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 2, 3, 4, 5, 6).unwrap()
    }

    #[test]
    fn test_miniseed_headers() {
        let headers = build_headers(OutputFormat::Miniseed, None, "instaseis_seismogram", now());

        assert_eq!(headers.content_type, "application/octet-stream");
        assert_eq!(
            headers.filename,
            "instaseis_seismogram_2016-02-03T04_05_06.000000Z.mseed"
        );
        assert_eq!(
            headers.content_disposition,
            "attachment; filename=instaseis_seismogram_2016-02-03T04_05_06.000000Z.mseed"
        );
    }

    #[test]
    fn test_saczip_with_label() {
        let headers = build_headers(OutputFormat::Saczip, Some("quake"), "default", now());

        assert_eq!(headers.content_type, "application/zip");
        assert!(headers.filename.starts_with("quake_"));
        assert!(headers.filename.ends_with(".zip"));
        assert!(!headers.filename.contains(':'));
    }

    #[test]
    fn test_empty_label_uses_default() {
        let headers = build_headers(OutputFormat::Saczip, Some(""), "default", now());
        assert!(headers.filename.starts_with("default_"));
    }

    #[test]
    fn test_format_from_query_param() {
        assert_eq!(OutputFormat::from_query_param("miniseed"), Some(OutputFormat::Miniseed));
        assert_eq!(OutputFormat::from_query_param("saczip"), Some(OutputFormat::Saczip));
        assert_eq!(OutputFormat::from_query_param("sac"), None);
        assert_eq!(OutputFormat::from_query_param("MINISEED"), None);
    }
}
