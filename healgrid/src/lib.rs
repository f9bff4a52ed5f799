//! Equal-area pixelization of the sphere in RING ordering.
//!
//! This crate provides the pixel grid that surface-map consumers index
//! into: a sphere divided into 12·nside² equal-area pixels arranged on
//! iso-latitude rings, with nside a power of two. Pixel centers are
//! derived on demand from `(nside, index)`; nothing is precomputed or
//! stored.
//!
//! # Modules
//!
//! - [`ring`]: pixel counts and index to (colatitude, longitude) mapping
//! - [`sphere`]: unit vectors and angular separation on the sphere
//!
//! # Conventions
//!
//! Colatitude θ ∈ [0, π] is measured from the north pole; longitude
//! φ ∈ (−π, π] increases eastward. All angles are radians.

pub mod ring;
pub mod sphere;

pub use ring::{nside_from_npix, npix, pix2ang, pixel_angles, GridError};
pub use sphere::{ang2vec, angular_distance};
