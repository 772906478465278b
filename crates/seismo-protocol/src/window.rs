//! Time window resolution.
//!
//! Turns the `origintime`/`starttime`/`endtime` of a request into a window
//! that the database can serve. Absolute and numeric times are resolved and
//! bounds-checked against the seismogram extent right away; phase-relative
//! times stay symbolic until [`ResolvedWindow::resolve_phases`] has travel
//! times for them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use seismo_common::time::{add_seconds, epoch, seconds_between};
use seismo_common::{ExtentRequest, PhaseOffset, Receiver, SeismogramExtent, Source, TimeSpec};
use tracing::debug;

use crate::errors::SeismoError;
use crate::traveltime::{get_travel_time, TravelTimeProvider};

/// How far before the data start a request may begin, in seconds.
pub const MAX_LEAD_SECONDS: f64 = 3600.0;

/// Answers "which absolute times can a seismogram cover".
#[async_trait]
pub trait ExtentProvider: Send + Sync {
    async fn extent(&self, request: &ExtentRequest) -> Result<SeismogramExtent, SeismoError>;
}

/// Time related request parameters, as validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSettings {
    pub origintime: Option<DateTime<Utc>>,
    pub starttime: Option<TimeSpec>,
    pub endtime: Option<TimeSpec>,
    /// Requested sampling interval; `None` keeps the database's.
    pub dt: Option<f64>,
    pub kernelwidth: u32,
}

/// Result of [`resolve_time_window`].
///
/// `starttime` is absolute or phase-relative. `endtime` is absolute,
/// phase-relative, or a numeric offset from a phase-relative start.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWindow {
    pub origintime: DateTime<Utc>,
    pub starttime: TimeSpec,
    pub endtime: TimeSpec,
    pub extent: SeismogramExtent,
}

/// A fully absolute window, clipped to the available data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteWindow {
    pub starttime: DateTime<Utc>,
    pub endtime: DateTime<Utc>,
}

fn shift(time: DateTime<Utc>, seconds: f64) -> Result<DateTime<Utc>, SeismoError> {
    add_seconds(time, seconds).ok_or_else(|| {
        SeismoError::InvalidTimeWindow(format!(
            "Shifting {} by {} seconds leaves the supported time range.",
            time, seconds
        ))
    })
}

fn check_start(start: DateTime<Utc>, extent: &SeismogramExtent) -> Result<(), SeismoError> {
    if start >= extent.endtime {
        return Err(SeismoError::StartTimeAfterDataEnds);
    }
    if seconds_between(start, extent.starttime) > MAX_LEAD_SECONDS {
        return Err(SeismoError::StartTimeTooEarly);
    }
    Ok(())
}

/// Resolve the requested times against the seismogram extent.
///
/// 1. a missing origin time defaults to the epoch
/// 2. a missing start time defaults to the origin time
/// 3. a numeric start time is an offset from the origin time
/// 4. a numeric end time is an offset from the start time, if that is
///    absolute by now; otherwise it stays an offset from the phase arrival
/// 5. the unshifted extent is queried for the origin time
/// 6. a missing end time defaults to the end of the extent
/// 7. absolute times are checked against the extent
pub async fn resolve_time_window(
    settings: &TimeSettings,
    provider: &dyn ExtentProvider,
) -> Result<ResolvedWindow, SeismoError> {
    let origintime = settings.origintime.unwrap_or_else(epoch);

    let starttime = match &settings.starttime {
        None => TimeSpec::absolute(origintime),
        Some(TimeSpec::Offset { seconds }) => TimeSpec::absolute(shift(origintime, *seconds)?),
        Some(other) => other.clone(),
    };

    let endtime = match (&settings.endtime, starttime.as_absolute()) {
        (Some(TimeSpec::Offset { seconds }), Some(start)) => {
            Some(TimeSpec::absolute(shift(start, *seconds)?))
        }
        (other, _) => other.clone(),
    };

    let request = ExtentRequest::unshifted(origintime, settings.dt, settings.kernelwidth);
    let extent = provider.extent(&request).await?;
    debug!(
        origintime = %origintime,
        extent_start = %extent.starttime,
        extent_end = %extent.endtime,
        "Queried seismogram extent"
    );

    let endtime = endtime.unwrap_or(TimeSpec::absolute(extent.endtime));

    if let Some(start) = starttime.as_absolute() {
        check_start(start, &extent)?;
    }
    if let Some(end) = endtime.as_absolute() {
        if !extent.contains(&end) {
            return Err(SeismoError::EndTimeOutOfRange);
        }
    }

    Ok(ResolvedWindow {
        origintime,
        starttime,
        endtime,
        extent,
    })
}

impl ResolvedWindow {
    /// The maximal admissible window, used for final clipping.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.extent.starttime, self.extent.endtime)
    }

    /// Whether a travel time is needed to finish resolution.
    pub fn needs_travel_times(&self) -> bool {
        self.starttime.is_phase_relative() || self.endtime.is_phase_relative()
    }

    fn phase_time(
        &self,
        phase: &PhaseOffset,
        source: &Source,
        receiver: &Receiver,
        provider: Option<&dyn TravelTimeProvider>,
    ) -> Result<DateTime<Utc>, SeismoError> {
        let tt = get_travel_time(provider, source, receiver, &phase.phase)?;
        shift(self.origintime, tt + phase.offset)
    }

    /// Replace phase-relative times by absolute ones and clip the end to the
    /// extent.
    pub fn resolve_phases(
        &self,
        source: &Source,
        receiver: &Receiver,
        provider: Option<&dyn TravelTimeProvider>,
    ) -> Result<AbsoluteWindow, SeismoError> {
        let starttime = match &self.starttime {
            TimeSpec::Absolute { time } => *time,
            TimeSpec::Offset { seconds } => shift(self.origintime, *seconds)?,
            TimeSpec::PhaseRelative(phase) => {
                self.phase_time(phase, source, receiver, provider)?
            }
        };

        let endtime = match &self.endtime {
            TimeSpec::Absolute { time } => *time,
            TimeSpec::Offset { seconds } => shift(starttime, *seconds)?,
            TimeSpec::PhaseRelative(phase) => {
                self.phase_time(phase, source, receiver, provider)?
            }
        };

        if starttime >= endtime {
            return Err(SeismoError::InvalidTimeWindow(
                "The `endtime` must be after the `starttime`.".to_string(),
            ));
        }
        check_start(starttime, &self.extent)?;

        Ok(AbsoluteWindow {
            starttime,
            endtime: endtime.min(self.extent.endtime),
        })
    }
}
