//! Rotation-frame to observer-frame coordinate transform.
//!
//! The star's rotation axis is tilted with respect to the observer's line
//! of sight. Transforming a surface coordinate into the observer's frame
//! goes through Cartesian space: spherical → unit vector → rotation about
//! the axis perpendicular to both the rotation axis projection and the
//! line of sight → back to spherical.

use healgrid::ang2vec;
use nalgebra::{Rotation3, Vector3};

/// Transform a rotation-frame coordinate into the observer frame.
///
/// Recovering spherical coordinates uses `arccos` for the colatitude
/// (the rotated z stays within [−1, 1] up to rounding, which the clamp
/// absorbs) and `atan2` for the longitude so the full (−π, π] range keeps
/// the correct quadrant. The transform never divides by sin θ, so the
/// poles are not special.
///
/// # Arguments
/// * `theta0` - Rotation-frame colatitude in radians
/// * `phi0` - Rotation-frame longitude in radians
/// * `alpha` - Tilt angle in radians (π/2 − inclination)
///
/// # Returns
/// Observer-frame `(θ, φ)` with θ ∈ [0, π] and φ ∈ (−π, π]
pub fn rotate_to_observer(theta0: f64, phi0: f64, alpha: f64) -> (f64, f64) {
    let tilted = Rotation3::from_axis_angle(&Vector3::y_axis(), alpha) * ang2vec(theta0, phi0);

    let theta = tilted.z.clamp(-1.0, 1.0).acos();
    let phi = tilted.y.atan2(tilted.x);
    (theta, phi)
}
