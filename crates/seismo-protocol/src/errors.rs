//! Request error types.

use thiserror::Error;

use crate::responses::ExceptionResponse;

/// Errors that can occur while validating and resolving a request.
///
/// Every variant is terminal for the request it belongs to.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeismoError {
    /// Query keys not present in the endpoint schema.
    #[error("The following unknown parameters have been passed: {}", quote_list(.0))]
    UnknownParameters(Vec<String>),

    /// Query keys given more than once.
    #[error("Duplicate parameters: {}", quote_list(.0))]
    DuplicateParameters(Vec<String>),

    /// A required parameter without a value.
    #[error("Required parameter '{0}' not given.")]
    MissingParameter(String),

    /// A value that could not be coerced to the parameter's type.
    #[error("{message}")]
    InvalidParameter { name: String, message: String },

    /// A coerced value violating a range or cross-field rule.
    #[error("{0}")]
    InvalidValue(String),

    /// Requested start lies at or after the end of the available data.
    #[error("The `starttime` must be before the seismogram ends.")]
    StartTimeAfterDataEnds,

    /// Requested start more than one hour before the data starts.
    #[error("The seismogram can start at the maximum one hour before the origin time.")]
    StartTimeTooEarly,

    /// Requested end outside the available data.
    #[error("The end time of the seismograms lies outside the allowed range.")]
    EndTimeOutOfRange,

    /// Any other inconsistency in the requested window.
    #[error("{0}")]
    InvalidTimeWindow(String),

    /// Source or receiver incompatible with the database.
    #[error("{0}")]
    InvalidGeometry(String),

    /// Unknown seismic phase.
    #[error("Invalid phase name: {0}")]
    InvalidPhase(String),

    /// The travel time calculation itself failed.
    #[error("Failed to calculate travel time due to: {0}")]
    TravelTimeFailed(String),

    /// A feature this server is not configured for.
    #[error("{0}")]
    CapabilityUnavailable(String),

    /// No seismogram extraction backend is attached.
    #[error("{0}")]
    ExtractionUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn quote_list(items: &[String]) -> String {
    let mut sorted: Vec<&String> = items.iter().collect();
    sorted.sort();
    sorted
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SeismoError {
    /// Build a coercion failure for `name`.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        SeismoError::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SeismoError::CapabilityUnavailable(_) => 404,
            SeismoError::ExtractionUnavailable(_) => 503,
            SeismoError::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Stable machine-readable identifier of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            SeismoError::UnknownParameters(_) => "unknown-parameter",
            SeismoError::DuplicateParameters(_) => "duplicate-parameter",
            SeismoError::MissingParameter(_) => "missing-required",
            SeismoError::InvalidParameter { .. } => "type-coercion",
            SeismoError::InvalidValue(_) => "invalid-value",
            SeismoError::StartTimeAfterDataEnds => "starttime-after-data-ends",
            SeismoError::StartTimeTooEarly => "starttime-too-early",
            SeismoError::EndTimeOutOfRange => "endtime-out-of-range",
            SeismoError::InvalidTimeWindow(_) => "invalid-time-window",
            SeismoError::InvalidGeometry(_) => "invalid-geometry",
            SeismoError::InvalidPhase(_) => "invalid-phase",
            SeismoError::TravelTimeFailed(_) => "travel-time-failed",
            SeismoError::CapabilityUnavailable(_) => "capability-unavailable",
            SeismoError::ExtractionUnavailable(_) => "extraction-unavailable",
            SeismoError::Internal(_) => "internal-error",
        }
    }

    /// Convert to an ExceptionResponse.
    pub fn to_exception(&self) -> ExceptionResponse {
        let detail = self.to_string();
        match self.status_code() {
            404 => ExceptionResponse::not_found(self.kind(), detail),
            500 => ExceptionResponse::internal_error(self.kind(), detail),
            503 => ExceptionResponse::service_unavailable(self.kind(), detail),
            _ => ExceptionResponse::bad_request(self.kind(), detail),
        }
    }
}
