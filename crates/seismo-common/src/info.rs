//! Static properties of an opened seismogram database.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in database metadata.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetadataError {
    #[error("Invalid database metadata: {0}")]
    Invalid(String),
}

/// Metadata as read from the simulation output (or from configuration when
/// no reader is wired in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    /// Name of the background velocity model, e.g. `prem_iso`.
    #[serde(default)]
    pub velocity_model: String,

    /// Dominant period of the simulation in seconds.
    #[serde(default)]
    pub period: Option<f64>,

    /// Planet radius in meters.
    pub planet_radius: f64,

    /// Smallest radius covered by the simulation, in meters.
    pub min_radius: f64,

    /// Largest radius covered by the simulation, in meters.
    pub max_radius: f64,

    /// Fixed source depth in kilometers. Only meaningful for forward
    /// databases.
    #[serde(default)]
    pub source_depth: Option<f64>,

    /// Sampling interval of the stored seismograms in seconds.
    pub dt: f64,

    /// Number of samples per stored seismogram.
    pub npts: u64,

    /// Shift of the source time function peak relative to the first sample,
    /// in seconds.
    #[serde(default)]
    pub src_shift: f64,
}

/// Database properties handed to request validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Reciprocal (receiver at the surface, free source depth) or forward
    /// (fixed source depth).
    pub is_reciprocal: bool,

    /// Component tags present in the database, e.g. `["PX", "PZ"]`.
    pub components: Vec<String>,

    pub velocity_model: String,
    pub period: Option<f64>,
    pub planet_radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub source_depth: Option<f64>,
    pub dt: f64,
    pub npts: u64,
    pub src_shift: f64,
}

impl DatabaseInfo {
    /// Combine layout facts with metadata, checking the metadata is coherent
    /// for the database type.
    pub fn new(
        is_reciprocal: bool,
        components: Vec<String>,
        metadata: DatabaseMetadata,
    ) -> Result<Self, MetadataError> {
        if !(metadata.dt > 0.0 && metadata.dt.is_finite()) {
            return Err(MetadataError::Invalid(format!(
                "dt must be positive, got {}",
                metadata.dt
            )));
        }
        if metadata.npts == 0 {
            return Err(MetadataError::Invalid("npts must be at least 1".to_string()));
        }
        if !(metadata.min_radius >= 0.0
            && metadata.min_radius < metadata.max_radius
            && metadata.max_radius <= metadata.planet_radius)
        {
            return Err(MetadataError::Invalid(format!(
                "radii must satisfy 0 <= min_radius < max_radius <= planet_radius, got {} / {} / {}",
                metadata.min_radius, metadata.max_radius, metadata.planet_radius
            )));
        }
        if !is_reciprocal && metadata.source_depth.is_none() {
            return Err(MetadataError::Invalid(
                "forward databases require a source_depth".to_string(),
            ));
        }

        Ok(Self {
            is_reciprocal,
            components,
            velocity_model: metadata.velocity_model,
            period: metadata.period,
            planet_radius: metadata.planet_radius,
            min_radius: metadata.min_radius,
            max_radius: metadata.max_radius,
            source_depth: if is_reciprocal { None } else { metadata.source_depth },
            dt: metadata.dt,
            npts: metadata.npts,
            src_shift: metadata.src_shift,
        })
    }

    /// Length of a stored seismogram in seconds.
    pub fn length(&self) -> f64 {
        (self.npts.saturating_sub(1)) as f64 * self.dt
    }

    /// Shallowest admissible source depth in meters (reciprocal databases).
    pub fn min_source_depth(&self) -> f64 {
        self.planet_radius - self.max_radius
    }

    /// Deepest admissible source depth in meters (reciprocal databases).
    pub fn max_source_depth(&self) -> f64 {
        self.planet_radius - self.min_radius
    }
}
