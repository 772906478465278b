//! Physical time extent of simulated seismograms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The maximal absolute time range a seismogram can cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeismogramExtent {
    pub starttime: DateTime<Utc>,
    pub endtime: DateTime<Utc>,
}

impl SeismogramExtent {
    pub fn new(starttime: DateTime<Utc>, endtime: DateTime<Utc>) -> Self {
        Self { starttime, endtime }
    }

    /// Whether `time` lies within the extent, bounds included.
    pub fn contains(&self, time: &DateTime<Utc>) -> bool {
        time >= &self.starttime && time <= &self.endtime
    }
}

/// Parameters of an extent query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentRequest {
    pub origin_time: DateTime<Utc>,
    /// Requested output sampling interval; `None` keeps the database's.
    pub dt: Option<f64>,
    /// Width of the resampling kernel in samples.
    pub kernelwidth: u32,
    pub remove_source_shift: bool,
    pub reconvolve_stf: bool,
}

impl ExtentRequest {
    /// The raw physical extent: source shift kept, no source time function
    /// reconvolution.
    pub fn unshifted(origin_time: DateTime<Utc>, dt: Option<f64>, kernelwidth: u32) -> Self {
        Self {
            origin_time,
            dt,
            kernelwidth,
            remove_source_shift: false,
            reconvolve_stf: false,
        }
    }
}
