//! Physical time extent of the seismograms a database can produce.

use seismo_common::time::add_seconds;
use seismo_common::{DatabaseInfo, ExtentRequest, SeismogramExtent};

use crate::error::{DatabaseError, DbResult};

/// Compute the time range covered by a seismogram for the given request.
///
/// The first sample sits `src_shift` seconds before the origin time unless
/// the shift is removed. Resampling to a different `dt` loses the trailing
/// `kernelwidth` database samples to the interpolation kernel and truncates
/// to a whole number of output samples.
pub fn seismogram_times(info: &DatabaseInfo, request: &ExtentRequest) -> DbResult<SeismogramExtent> {
    if request.remove_source_shift && request.reconvolve_stf {
        return Err(DatabaseError::InvalidExtent(
            "'remove_source_shift' and 'reconvolve_stf' are mutually exclusive".to_string(),
        ));
    }

    let mut length = info.length();

    if let Some(dt) = request.dt {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(DatabaseError::InvalidExtent(format!(
                "dt must be positive, got {}",
                dt
            )));
        }
        if dt != info.dt {
            let usable = length - f64::from(request.kernelwidth) * info.dt;
            if usable <= 0.0 {
                return Err(DatabaseError::InvalidExtent(format!(
                    "seismograms of {} s are too short for a kernel width of {}",
                    length, request.kernelwidth
                )));
            }
            length = (usable / dt).floor() * dt;
        }
    }

    let shift = if request.remove_source_shift {
        0.0
    } else {
        -info.src_shift
    };

    let starttime = add_seconds(request.origin_time, shift)
        .ok_or_else(|| DatabaseError::InvalidExtent("origin time out of range".to_string()))?;
    let endtime = add_seconds(starttime, length)
        .ok_or_else(|| DatabaseError::InvalidExtent("origin time out of range".to_string()))?;

    Ok(SeismogramExtent::new(starttime, endtime))
}
