//! Per-pixel Doppler and limb-darkening kinematics.
//!
//! Two small functions sit between the geometry and the integrator: the
//! relativistic wavelength-shift factor for a line-of-sight velocity, and
//! the linear limb-darkening weight for a surface normal angle.

use thiserror::Error;

use crate::constants::SI;

/// Speed of light in km/s, the working unit of the synthesis pipeline.
pub const SPEED_OF_LIGHT_KM_S: f64 = SI::SPEED_OF_LIGHT * 1e-3;

/// Errors from velocity-domain violations.
#[derive(Debug, Error)]
pub enum KinematicsError {
    /// |v| ≥ c has no Doppler factor; the square root below goes negative.
    #[error("line-of-sight velocity {0} km/s is at or beyond the speed of light")]
    SuperluminalVelocity(f64),
}

/// Relativistic longitudinal Doppler-shift factor.
///
/// Multiplying a rest-frame wavelength by this factor gives the observed
/// wavelength. Positive velocities recede from the observer and redshift
/// (factor > 1); `doppler_shift(0.0)` is exactly 1.
///
/// # Arguments
/// * `v_los_km_s` - Line-of-sight velocity in km/s, |v| < c
///
/// # Returns
/// The factor (1 + β)/√(1 − β²) with β = v/c, or
/// `KinematicsError::SuperluminalVelocity` outside the domain
pub fn doppler_shift(v_los_km_s: f64) -> Result<f64, KinematicsError> {
    let beta = v_los_km_s / SPEED_OF_LIGHT_KM_S;
    if beta.abs() >= 1.0 {
        return Err(KinematicsError::SuperluminalVelocity(v_los_km_s));
    }
    Ok((1.0 + beta) / (1.0 - beta * beta).sqrt())
}

/// Linear limb-darkening weight 1 − u·(1 − μ).
///
/// μ is the cosine of the angle between the line of sight and the local
/// surface normal, valid on [0, 1]. Back-facing points (μ < 0) must be
/// culled by the caller; this function does not check.
///
/// # Arguments
/// * `u` - Limb-darkening coefficient in [0, 1]
/// * `mu` - Cosine of the viewing angle from the local normal
pub fn limb_darkening(u: f64, mu: f64) -> f64 {
    1.0 - u * (1.0 - mu)
}
