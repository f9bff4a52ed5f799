//! RING-ordering pixel indexing for the 12·nside² equal-area scheme.
//!
//! Pixels are numbered north to south along iso-latitude rings. The grid
//! has three regions: a north polar cap whose rings hold 4·i pixels
//! (ring i counted from the pole), an equatorial belt of rings with
//! 4·nside pixels each, and a south polar cap mirroring the north one.
//! All pixels cover the same solid angle, which is what makes a plain
//! sum over pixel contributions an area-weighted integral.

use std::f64::consts::{PI, TAU};

use thiserror::Error;

/// Errors for pixel-count / resolution mismatches.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The pixel count is not 12·nside² for any power-of-two nside.
    #[error("pixel count {0} is not 12*nside^2 for a power-of-two nside")]
    InvalidPixelCount(usize),
}

/// Number of pixels in a grid of the given resolution.
///
/// # Arguments
/// * `nside` - Resolution parameter, a power of two
///
/// # Returns
/// The pixel count 12·nside²
pub fn npix(nside: u32) -> usize {
    12 * (nside as usize) * (nside as usize)
}

/// Recover the resolution parameter from a pixel count.
///
/// Inverts `npix` as nside = round(√(npix/12)) and rejects counts that
/// do not correspond to a valid grid.
///
/// # Arguments
/// * `npix` - Total pixel count
///
/// # Returns
/// The nside whose grid has exactly `npix` pixels, or
/// `GridError::InvalidPixelCount`
pub fn nside_from_npix(npix: usize) -> Result<u32, GridError> {
    let nside = (npix as f64 / 12.0).sqrt().round() as u64;
    if nside == 0 || !nside.is_power_of_two() || 12 * nside * nside != npix as u64 {
        return Err(GridError::InvalidPixelCount(npix));
    }
    Ok(nside as u32)
}

/// Colatitude and longitude of a pixel center.
///
/// # Arguments
/// * `nside` - Resolution parameter
/// * `ipix` - Pixel index in RING ordering, `0..npix(nside)`
///
/// # Returns
/// `(θ, φ)` with θ ∈ [0, π] and φ ∈ (−π, π]
///
/// # Panics
/// An out-of-range pixel index is a programming error and panics.
pub fn pix2ang(nside: u32, ipix: usize) -> (f64, f64) {
    let total = npix(nside);
    assert!(
        ipix < total,
        "pixel index {ipix} out of range for nside {nside} ({total} pixels)"
    );

    let ns = nside as usize;
    let ncap = 2 * ns * (ns - 1);
    let nside_f = nside as f64;

    let (z, mut phi) = if ipix < ncap {
        // North polar cap: ring i (from the pole) holds 4*i pixels.
        let iring = (1 + (1 + 2 * ipix as u64).isqrt() as usize) / 2;
        let iphi = ipix + 1 - 2 * iring * (iring - 1);
        let z = 1.0 - (iring * iring) as f64 / (3.0 * nside_f * nside_f);
        let phi = (iphi as f64 - 0.5) * PI / (2.0 * iring as f64);
        (z, phi)
    } else if ipix < total - ncap {
        // Equatorial belt: rings of 4*nside pixels, alternate rings
        // offset by half a pixel width.
        let ip = ipix - ncap;
        let iring = ip / (4 * ns) + ns;
        let iphi = ip % (4 * ns) + 1;
        let fodd = if (iring + ns) & 1 == 1 { 1.0 } else { 0.5 };
        let z = (2.0 * nside_f - iring as f64) * 2.0 / (3.0 * nside_f);
        let phi = (iphi as f64 - fodd) * PI / (2.0 * nside_f);
        (z, phi)
    } else {
        // South polar cap, mirror of the north one.
        let ip = total - ipix;
        let iring = (1 + (2 * ip as u64 - 1).isqrt() as usize) / 2;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        let z = -1.0 + (iring * iring) as f64 / (3.0 * nside_f * nside_f);
        let phi = (iphi as f64 - 0.5) * PI / (2.0 * iring as f64);
        (z, phi)
    };

    if phi > PI {
        phi -= TAU;
    }

    (z.acos(), phi)
}

/// Pixel-center coordinates for every pixel of a grid, in index order.
pub fn pixel_angles(nside: u32) -> Vec<(f64, f64)> {
    (0..npix(nside)).map(|ipix| pix2ang(nside, ipix)).collect()
}
