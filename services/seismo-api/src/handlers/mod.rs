//! HTTP request handlers for the seismogram API.

pub mod health;
pub mod landing;
pub mod seismograms;
pub mod traveltime;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use seismo_protocol::{ExceptionResponse, RawParameters, SeismoError};
use url::form_urlencoded;

use crate::metrics::record_error;

/// JSON error body with the given status.
pub fn error_response(status: StatusCode, exc: ExceptionResponse) -> Response {
    let json = serde_json::to_string(&exc).unwrap_or_default();
    (status, [(header::CONTENT_TYPE, "application/json")], json).into_response()
}

/// Map a request error to its HTTP response and count it.
pub fn seismo_error_response(err: &SeismoError) -> Response {
    record_error(err.kind());
    tracing::debug!(kind = err.kind(), error = %err, "Rejected request");

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, err.to_exception())
}

/// Decode a raw query string into parameters, keeping repeated keys.
///
/// Invalid percent-escapes and UTF-8 are decoded lossily so that every
/// malformed query still reaches validation.
pub fn raw_parameters(query: Option<&str>) -> RawParameters {
    let query = query.unwrap_or_default();
    RawParameters::from_pairs(
        form_urlencoded::parse(query.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_parameters_decodes_plus_and_escapes() {
        let raw = raw_parameters(Some("starttime=P+10&label=a%20b&dt=1&dt=2"));
        assert_eq!(raw.get("starttime"), Some(&["P 10".to_string()][..]));
        assert_eq!(raw.get("label"), Some(&["a b".to_string()][..]));
        assert_eq!(raw.get("dt").map(|values| values.len()), Some(2));
    }

    #[test]
    fn test_raw_parameters_malformed_input() {
        let raw = raw_parameters(Some("label=%ZZ%FF&&=x"));
        assert_eq!(raw.get("label"), Some(&["%ZZ\u{FFFD}".to_string()][..]));
        assert_eq!(raw_parameters(None).keys().count(), 0);
    }
}
