//! Surface brightness maps with circular spot features.
//!
//! A [`SurfaceMap`] holds one intensity per pixel of a `healgrid` grid,
//! in pixel-index order. Maps start uniform at 1.0; spots are circular
//! regions (by angular distance from a center) that either set or scale
//! the intensities they cover. Intensities are non-negative, 0 meaning
//! fully dark.

use ndarray::Array1;

use healgrid::{angular_distance, npix, nside_from_npix, pixel_angles, GridError};

/// Per-pixel surface brightness of a star, indexed in RING order.
#[derive(Debug, Clone)]
pub struct SurfaceMap {
    nside: u32,
    values: Array1<f64>,
}

impl SurfaceMap {
    /// A uniform sphere of intensity 1.0.
    pub fn uniform(nside: u32) -> Self {
        Self {
            nside,
            values: Array1::ones(npix(nside)),
        }
    }

    /// A uniform sphere with one circular region set to `intensity`.
    ///
    /// The region covers every pixel whose center lies within
    /// `radius` (angular distance, radians) of `(theta, phi)`.
    ///
    /// # Arguments
    /// * `nside` - Grid resolution
    /// * `theta` - Spot-center colatitude in radians
    /// * `phi` - Spot-center longitude in radians
    /// * `radius` - Spot radius in radians
    /// * `intensity` - Intensity assigned inside the spot, 0 = fully dark
    pub fn spot(nside: u32, theta: f64, phi: f64, radius: f64, intensity: f64) -> Self {
        let mut map = Self::uniform(nside);
        for ipix in map.pixels_within(theta, phi, radius) {
            map.values[ipix] = intensity;
        }
        map
    }

    /// Scale the intensities inside a circular region by `intensity`.
    ///
    /// Multiplies rather than sets, so repeated calls compose: overlapping
    /// spots darken (or brighten) each other's intersection.
    pub fn add_spot(&mut self, theta: f64, phi: f64, radius: f64, intensity: f64) {
        for ipix in self.pixels_within(theta, phi, radius) {
            self.values[ipix] *= intensity;
        }
    }

    /// Adopt an existing intensity array, deriving the resolution from its
    /// length.
    ///
    /// # Arguments
    /// * `values` - One intensity per pixel, length 12·nside²
    ///
    /// # Returns
    /// The map, or `GridError::InvalidPixelCount` if the length fits no
    /// power-of-two nside
    pub fn from_values(values: Array1<f64>) -> Result<Self, GridError> {
        let nside = nside_from_npix(values.len())?;
        Ok(Self { nside, values })
    }

    /// Grid resolution parameter.
    pub fn nside(&self) -> u32 {
        self.nside
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the map has no pixels.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Per-pixel intensities in RING order.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Indices of pixels whose centers fall inside the circle.
    fn pixels_within(&self, theta: f64, phi: f64, radius: f64) -> Vec<usize> {
        pixel_angles(self.nside)
            .into_iter()
            .enumerate()
            .filter(|&(_, center)| angular_distance((theta, phi), center) < radius)
            .map(|(ipix, _)| ipix)
            .collect()
    }
}
