//! Common database fixtures.
//!
//! Radii follow PREM: a 6371 km planet with the core-mantle boundary at
//! 3480 km.

use chrono::{DateTime, TimeZone, Utc};
use seismo_common::{DatabaseInfo, DatabaseMetadata};

pub const PLANET_RADIUS: f64 = 6_371_000.0;
pub const CMB_RADIUS: f64 = 3_480_000.0;

/// Metadata of a reciprocal database covering the whole mantle.
///
/// 2 s sampling, 1801 samples (one hour), 30 s source shift.
pub fn reciprocal_metadata() -> DatabaseMetadata {
    DatabaseMetadata {
        velocity_model: "prem_iso".to_string(),
        period: Some(10.0),
        planet_radius: PLANET_RADIUS,
        min_radius: CMB_RADIUS,
        max_radius: PLANET_RADIUS,
        source_depth: None,
        dt: 2.0,
        npts: 1801,
        src_shift: 30.0,
    }
}

/// Metadata of a forward database with a fixed source at `depth_km`.
pub fn forward_metadata(depth_km: f64) -> DatabaseMetadata {
    DatabaseMetadata {
        source_depth: Some(depth_km),
        ..reciprocal_metadata()
    }
}

pub fn reciprocal_info() -> DatabaseInfo {
    DatabaseInfo::new(
        true,
        vec!["PX".to_string(), "PZ".to_string()],
        reciprocal_metadata(),
    )
    .expect("valid reciprocal fixture")
}

pub fn forward_info(depth_km: f64) -> DatabaseInfo {
    DatabaseInfo::new(
        false,
        ["MZZ", "MXX_P_MYY", "MXZ_MYZ", "MXY_MXX_M_MYY"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        forward_metadata(depth_km),
    )
    .expect("valid forward fixture")
}

/// A fixed origin time used across tests: 2010-03-04T05:06:07Z.
pub fn origin_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2010, 3, 4, 5, 6, 7)
        .single()
        .expect("valid fixture time")
}
