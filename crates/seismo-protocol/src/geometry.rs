//! Source/receiver geometry checks against database constraints.

use seismo_common::{DatabaseInfo, Receiver, Source};

use crate::errors::SeismoError;

/// Check that a source and receiver can be served by the database.
///
/// Reciprocal databases need the receiver at the surface and the source
/// within the simulated radius range. Forward databases only serve their
/// single, fixed source depth.
pub fn validate_geometry(
    source: &Source,
    receiver: &Receiver,
    info: &DatabaseInfo,
) -> Result<(), SeismoError> {
    if info.is_reciprocal {
        if let Some(depth) = receiver.depth_in_m {
            if depth != 0.0 {
                return Err(SeismoError::InvalidGeometry(
                    "Receiver must be at the surface for reciprocal databases.".to_string(),
                ));
            }
        }

        let min_depth = info.min_source_depth();
        let max_depth = info.max_source_depth();
        if !(min_depth <= source.depth_in_m && source.depth_in_m <= max_depth) {
            return Err(SeismoError::InvalidGeometry(format!(
                "Source depth must be within the database range: {:.1} - {:.1} meters.",
                min_depth, max_depth
            )));
        }
    } else {
        let depth_km = info.source_depth.ok_or_else(|| {
            SeismoError::Internal("forward database without a source depth".to_string())
        })?;
        if source.depth_in_m != depth_km * 1000.0 {
            return Err(SeismoError::InvalidGeometry(format!(
                "Source depth must be: {:.1} km",
                depth_km
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{forward_info, reciprocal_info};

    fn receiver() -> Receiver {
        Receiver::new(10.0, 10.0)
    }

    #[test]
    fn test_reciprocal_surface_source_passes() {
        let src = Source::new(0.0, 0.0, 0.0);
        assert!(validate_geometry(&src, &receiver(), &reciprocal_info()).is_ok());
    }

    #[test]
    fn test_reciprocal_deepest_source_passes() {
        let src = Source::new(0.0, 0.0, 2_891_000.0);
        assert!(validate_geometry(&src, &receiver(), &reciprocal_info()).is_ok());
    }

    #[test]
    fn test_reciprocal_source_too_deep() {
        let src = Source::new(0.0, 0.0, 7_000_000.0);
        let err = validate_geometry(&src, &receiver(), &reciprocal_info()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Source depth must be within the database range: 0.0 - 2891000.0 meters."
        );
    }

    #[test]
    fn test_reciprocal_source_above_surface() {
        let src = Source::new(0.0, 0.0, -1.0);
        assert!(validate_geometry(&src, &receiver(), &reciprocal_info()).is_err());
    }

    #[test]
    fn test_reciprocal_receiver_must_be_at_surface() {
        let src = Source::new(0.0, 0.0, 1000.0);
        let buried = receiver().with_depth(10.0);
        let err = validate_geometry(&src, &buried, &reciprocal_info()).unwrap_err();
        assert!(err.to_string().contains("Receiver must be at the surface"));

        let surface = receiver().with_depth(0.0);
        assert!(validate_geometry(&src, &surface, &reciprocal_info()).is_ok());
    }

    #[test]
    fn test_forward_exact_depth_passes() {
        let src = Source::new(0.0, 0.0, 10_000.0);
        assert!(validate_geometry(&src, &receiver(), &forward_info(10.0)).is_ok());
    }

    #[test]
    fn test_forward_depth_mismatch() {
        let src = Source::new(0.0, 0.0, 10_001.0);
        let err = validate_geometry(&src, &receiver(), &forward_info(10.0)).unwrap_err();
        assert_eq!(err.to_string(), "Source depth must be: 10.0 km");
        assert_eq!(err.kind(), "invalid-geometry");
    }

    #[test]
    fn test_forward_ignores_receiver_depth() {
        let src = Source::new(0.0, 0.0, 10_000.0);
        let buried = receiver().with_depth(500.0);
        assert!(validate_geometry(&src, &buried, &forward_info(10.0)).is_ok());
    }
}
