//! Source and receiver geometry.

use serde::{Deserialize, Serialize};

/// A point source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub latitude: f64,
    pub longitude: f64,
    pub depth_in_m: f64,
}

impl Source {
    pub fn new(latitude: f64, longitude: f64, depth_in_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            depth_in_m,
        }
    }
}

/// A receiver (station).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub latitude: f64,
    pub longitude: f64,
    /// `None` when the request did not state a depth.
    pub depth_in_m: Option<f64>,
    pub network: String,
    pub station: String,
    pub location: String,
}

impl Receiver {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            depth_in_m: None,
            network: String::new(),
            station: String::new(),
            location: String::new(),
        }
    }

    pub fn with_depth(mut self, depth_in_m: f64) -> Self {
        self.depth_in_m = Some(depth_in_m);
        self
    }

    pub fn with_codes(
        mut self,
        network: impl Into<String>,
        station: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        self.network = network.into();
        self.station = station.into();
        self.location = location.into();
        self
    }
}
