//! Wind speed height and shelter adjustments.

use crate::error::{RTempError, Result};

/// TVA power-law exponent for wind height correction.
pub const TVA_EXPONENT: f64 = 0.15;

/// Refers a wind speed measured at `measured_height` to `target_height` [m].
///
/// `speed·(target/measured)^0.15`. Both heights must be positive.
pub fn adjust_for_height(wind_speed: f64, measured_height: f64, target_height: f64) -> Result<f64> {
    if measured_height <= 0.0 || target_height <= 0.0 {
        return Err(RTempError::InvalidHeight {
            measured: measured_height,
            target: target_height,
        });
    }
    Ok(wind_speed * (target_height / measured_height).powf(TVA_EXPONENT))
}

/// Scales wind speed by a shelter factor (1 = open water, 0 = fully sheltered).
pub fn apply_shelter_factor(wind_speed: f64, shelter_factor: f64) -> Result<f64> {
    if shelter_factor < 0.0 {
        return Err(RTempError::InvalidParameter {
            name: "wind_shelter_factor",
            value: shelter_factor,
            reason: "must be non-negative",
        });
    }
    Ok(wind_speed * shelter_factor)
}
