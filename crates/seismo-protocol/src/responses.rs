//! Response bodies that are not seismogram data.

use serde::{Deserialize, Serialize};

/// Exception response for errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    /// Exception type identifier.
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Detailed error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ExceptionResponse {
    /// Create a new exception response.
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status: Some(status),
            detail: Some(detail.into()),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Create a 400 Bad Request exception.
    pub fn bad_request(type_: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(type_, 400, detail).with_title("Bad Request")
    }

    /// Create a 404 Not Found exception.
    pub fn not_found(type_: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(type_, 404, detail).with_title("Not Found")
    }

    /// Create a 500 Internal Server Error exception.
    pub fn internal_error(type_: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(type_, 500, detail).with_title("Internal Server Error")
    }

    /// Create a 503 Service Unavailable exception.
    pub fn service_unavailable(type_: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(type_, 503, detail).with_title("Service Unavailable")
    }
}

/// Body of the root endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerDescription {
    #[serde(rename = "type")]
    pub type_: String,
    pub version: String,
}

impl ServerDescription {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            type_: crate::SERVER_NAME.to_string(),
            version: version.into(),
        }
    }
}

/// Body of the travel time endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelTimeResponse {
    pub travel_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_bad_request() {
        let exc = ExceptionResponse::bad_request("invalid-value", "dt must be positive");

        assert_eq!(exc.status, Some(400));
        assert_eq!(exc.title, Some("Bad Request".to_string()));
    }

    #[test]
    fn test_exception_serialization() {
        let exc = ExceptionResponse::not_found("capability-unavailable", "no travel times");

        let json = serde_json::to_string(&exc).unwrap();
        assert!(json.contains("\"type\":\"capability-unavailable\""));
        assert!(json.contains("\"status\":404"));
        assert!(json.contains("\"title\":\"Not Found\""));
    }

    #[test]
    fn test_server_description() {
        let json = serde_json::to_string(&ServerDescription::new("0.1.0")).unwrap();
        assert_eq!(json, r#"{"type":"SeismoServer","version":"0.1.0"}"#);
    }
}
