//! Common types shared across the seismogram services.

pub mod extent;
pub mod geo;
pub mod info;
pub mod time;

pub use extent::{ExtentRequest, SeismogramExtent};
pub use geo::{Receiver, Source};
pub use info::{DatabaseInfo, DatabaseMetadata, MetadataError};
pub use time::{PhaseOffset, TimeParseError, TimeSpec};
