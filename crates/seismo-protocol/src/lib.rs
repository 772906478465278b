//! Seismogram request protocol.
//!
//! This crate turns raw query strings into requests a seismogram database
//! can serve. It is transport agnostic; the HTTP layer lives in the service.
//!
//! # Pipeline
//!
//! - [`schema`]: per-endpoint parameter schemas and their validation
//! - [`window`]: time window resolution against the seismogram extent
//! - [`traveltime`]: phase arrival lookup for phase-relative times
//! - [`geometry`]: source/receiver checks against the database
//! - [`headers`]: content headers of the download
//!
//! # Example
//!
//! ```rust
//! use seismo_protocol::{RawParameters, SeismogramsQuery};
//!
//! let raw = RawParameters::from_pairs([
//!     ("sourcelatitude", "10"),
//!     ("sourcelongitude", "20"),
//!     ("receiverlatitude", "30"),
//!     ("receiverlongitude", "40"),
//!     ("format", "miniseed"),
//! ]);
//! let args = SeismogramsQuery::validator().validate(&raw).unwrap();
//! let query = SeismogramsQuery::from_args(&args).unwrap();
//! assert_eq!(query.components, "ZNE");
//! ```

pub mod errors;
pub mod geometry;
pub mod headers;
pub mod queries;
pub mod responses;
pub mod schema;
pub mod traveltime;
pub mod window;

// Re-export commonly used types
pub use errors::SeismoError;
pub use geometry::validate_geometry;
pub use headers::{build_headers, OutputFormat, ResponseHeaders};
pub use queries::{SeismogramsQuery, TravelTimeQuery, Units};
pub use responses::{ExceptionResponse, ServerDescription, TravelTimeResponse};
pub use schema::{
    ParamKind, ParamValue, ParameterSchema, ParameterSpec, ParameterValidator, RawParameters,
    ValidatedArgs,
};
pub use traveltime::{get_travel_time, TravelTimeError, TravelTimeProvider};
pub use window::{
    resolve_time_window, AbsoluteWindow, ExtentProvider, ResolvedWindow, TimeSettings,
};

/// Name reported in the `Server` header and on the landing route.
pub const SERVER_NAME: &str = "SeismoServer";
