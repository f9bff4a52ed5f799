//! Unit vectors and angular separation on the sphere.

use nalgebra::Vector3;

/// Unit Cartesian vector for a spherical coordinate.
///
/// # Arguments
/// * `theta` - Colatitude in radians, 0 at the north pole
/// * `phi` - Longitude in radians
pub fn ang2vec(theta: f64, phi: f64) -> Vector3<f64> {
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Angular separation between two points on the sphere.
///
/// Computed from the dot product of the unit vectors, with the cosine
/// clamped so rounding near coincident or antipodal points cannot leave
/// the arccos domain.
///
/// # Arguments
/// * `a` - First point as (colatitude, longitude) in radians
/// * `b` - Second point as (colatitude, longitude) in radians
///
/// # Returns
/// The separation angle in [0, π]
pub fn angular_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let cos_sep = ang2vec(a.0, a.1).dot(&ang2vec(b.0, b.1));
    cos_sep.clamp(-1.0, 1.0).acos()
}
