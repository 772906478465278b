//! Travel time lookup.

use seismo_common::{Receiver, Source};
use thiserror::Error;
use tracing::debug;

use crate::errors::SeismoError;

/// Failures reported by a travel time backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TravelTimeError {
    /// The backend does not know the phase.
    #[error("Invalid phase name: {0}")]
    InvalidPhase(String),

    /// Anything else, e.g. the phase does not arrive at this distance.
    #[error("{0}")]
    Computation(String),
}

/// Computes the arrival time of a seismic phase.
pub trait TravelTimeProvider: Send + Sync {
    /// Seconds between the origin time and the arrival of `phase` at the
    /// receiver.
    fn travel_time(
        &self,
        source: &Source,
        receiver: &Receiver,
        phase: &str,
    ) -> Result<f64, TravelTimeError>;
}

/// Look up a travel time, mapping backend failures to request errors.
///
/// Without a provider every phase-relative request fails with
/// [`SeismoError::CapabilityUnavailable`].
pub fn get_travel_time(
    provider: Option<&dyn TravelTimeProvider>,
    source: &Source,
    receiver: &Receiver,
    phase: &str,
) -> Result<f64, SeismoError> {
    let provider = provider.ok_or_else(|| {
        SeismoError::CapabilityUnavailable(
            "Server does not support travel time calculations.".to_string(),
        )
    })?;

    match provider.travel_time(source, receiver, phase) {
        Ok(tt) if tt.is_finite() => {
            debug!(phase, travel_time = tt, "Computed travel time");
            Ok(tt)
        }
        Ok(tt) => Err(SeismoError::TravelTimeFailed(format!(
            "non-finite travel time {} for phase {}",
            tt, phase
        ))),
        Err(TravelTimeError::InvalidPhase(_)) => Err(SeismoError::InvalidPhase(phase.to_string())),
        Err(TravelTimeError::Computation(msg)) => {
            if msg.to_lowercase().starts_with("invalid phase name") {
                Err(SeismoError::InvalidPhase(phase.to_string()))
            } else {
                Err(SeismoError::TravelTimeFailed(msg))
            }
        }
    }
}
