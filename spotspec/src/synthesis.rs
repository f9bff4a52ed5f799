//! Spectral integrator: per-pixel synthesis of the observed spectrum.
//!
//! Given a surface brightness map, a rest-frame line profile, and the
//! observation parameters, [`observe_spectrum`] assembles the spectrum an
//! observer sees: every pixel of the visible hemisphere contributes the
//! line profile shifted by that pixel's line-of-sight velocity, weighted
//! by its brightness, projected area, and limb darkening.
//!
//! The pixel contributions are independent and combine only by summation,
//! so the accumulation runs as a rayon map-reduce with per-thread
//! accumulator arrays. Contribution order changes nothing but the
//! low-order floating-point bits.

use std::f64::consts::{FRAC_PI_2, TAU};

use log::debug;
use ndarray::Array1;
use rayon::prelude::*;
use thiserror::Error;

use healgrid::pixel_angles;

use crate::kinematics::{doppler_shift, limb_darkening, KinematicsError};
use crate::rotation::rotate_to_observer;
use crate::surface::SurfaceMap;

/// Errors from line-profile construction.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("wavelength and intensity arrays differ in length ({wavelengths} vs {intensities})")]
    MismatchedLengths {
        wavelengths: usize,
        intensities: usize,
    },
    #[error("a line profile needs at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[error("wavelengths must be strictly ascending (violated at index {0})")]
    NotAscending(usize),
}

/// Errors from spectral synthesis.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("output resolution must be at least 1")]
    ZeroResolution,
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
    /// The accumulated flux has no positive maximum (nothing on the
    /// visible hemisphere contributes), so normalization would divide by
    /// zero.
    #[error("no visible pixel contributes flux; cannot normalize an all-zero spectrum")]
    DegenerateSpectrum,
}

/// Rest-frame line profile assumed identical at every surface point.
#[derive(Debug, Clone)]
pub struct LineProfile {
    wavelengths_nm: Vec<f64>,
    intensities: Vec<f64>,
}

impl LineProfile {
    /// Build a profile from paired wavelength/intensity samples.
    ///
    /// # Arguments
    /// * `wavelengths_nm` - Rest-frame wavelengths in nm, strictly ascending
    /// * `intensities` - Intensity at each wavelength, same length
    pub fn new(wavelengths_nm: Vec<f64>, intensities: Vec<f64>) -> Result<Self, ProfileError> {
        if wavelengths_nm.len() != intensities.len() {
            return Err(ProfileError::MismatchedLengths {
                wavelengths: wavelengths_nm.len(),
                intensities: intensities.len(),
            });
        }
        if wavelengths_nm.len() < 2 {
            return Err(ProfileError::TooFewSamples(wavelengths_nm.len()));
        }
        for i in 1..wavelengths_nm.len() {
            // NaN fails this comparison too, so non-finite input cannot
            // sneak past as "sorted".
            if !(wavelengths_nm[i] > wavelengths_nm[i - 1]) {
                return Err(ProfileError::NotAscending(i));
            }
        }
        Ok(Self {
            wavelengths_nm,
            intensities,
        })
    }

    /// A Gaussian absorption line on a unit continuum.
    ///
    /// Samples 1 − depth·exp(−(λ−λ0)²/2σ²) on a uniform grid spanning
    /// ±`half_span_nm` around the center.
    ///
    /// # Arguments
    /// * `center_nm` - Line center λ0 in nm
    /// * `sigma_nm` - Gaussian width in nm, > 0
    /// * `depth` - Absorption depth at line center, 1 = saturated
    /// * `half_span_nm` - Half-width of the sampled wavelength window
    /// * `samples` - Number of grid points, ≥ 2
    pub fn gaussian_absorption(
        center_nm: f64,
        sigma_nm: f64,
        depth: f64,
        half_span_nm: f64,
        samples: usize,
    ) -> Self {
        assert!(sigma_nm > 0.0, "Gaussian width must be positive");
        assert!(samples >= 2, "profile needs at least 2 samples");
        assert!(half_span_nm > 0.0, "wavelength window must be positive");

        let step = 2.0 * half_span_nm / (samples - 1) as f64;
        let wavelengths_nm: Vec<f64> = (0..samples)
            .map(|k| center_nm - half_span_nm + step * k as f64)
            .collect();
        let intensities = wavelengths_nm
            .iter()
            .map(|&wl| {
                let d = (wl - center_nm) / sigma_nm;
                1.0 - depth * (-0.5 * d * d).exp()
            })
            .collect();

        Self {
            wavelengths_nm,
            intensities,
        }
    }

    /// Rest-frame wavelengths in nm.
    pub fn wavelengths_nm(&self) -> &[f64] {
        &self.wavelengths_nm
    }

    /// Intensity samples.
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }
}

/// Viewing geometry and synthesis parameters for one observation.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Equatorial rotation velocity in km/s, |v| ≪ c.
    pub v_rot_km_s: f64,
    /// Angle between rotation axis and line of sight: 0 pole-on, π/2
    /// equator-on.
    pub inclination_rad: f64,
    /// Fraction of a rotation period since the reference epoch; periodic
    /// with period 1.0.
    pub phase: f64,
    /// Linear limb-darkening coefficient u in [0, 1].
    pub limb_darkening_u: f64,
    /// Number of points in the output wavelength grid.
    pub output_resolution: usize,
    /// Divide the flux by its maximum before returning.
    pub normalize: bool,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            v_rot_km_s: 0.0,
            inclination_rad: FRAC_PI_2,
            phase: 0.0,
            limb_darkening_u: 0.0,
            output_resolution: 1000,
            normalize: true,
        }
    }
}

/// One synthesized spectrum: ascending wavelength grid and matching flux.
#[derive(Debug, Clone)]
pub struct ObservedSpectrum {
    /// Observed wavelengths in nm, ascending, length = output resolution.
    pub wavelengths_nm: Array1<f64>,
    /// Flux at each observed wavelength.
    pub flux: Array1<f64>,
}

/// Synthesize the spectrum of a rotating star seen by a distant observer.
///
/// Every pixel of the map is carried through the same pipeline: rotate
/// the surface longitude by the phase, compute the line-of-sight velocity
/// of rigid-body rotation under the given inclination, tilt the
/// coordinate into the observer frame, cull the hidden hemisphere
/// (observer-frame longitude outside (−π/2, π/2)), and add the pixel's
/// Doppler-shifted, limb-darkened, area-weighted line profile onto the
/// output grid. The grid spans the extremal blue/red shifts achievable at
/// the given rotation speed.
///
/// # Arguments
/// * `map` - Surface brightness map
/// * `profile` - Rest-frame line profile
/// * `obs` - Viewing geometry and output parameters
///
/// # Returns
/// The observed spectrum, or an error for an invalid resolution, a
/// superluminal rotation velocity, or a degenerate all-zero flux under
/// normalization
pub fn observe_spectrum(
    map: &SurfaceMap,
    profile: &LineProfile,
    obs: &Observation,
) -> Result<ObservedSpectrum, SynthesisError> {
    if obs.output_resolution == 0 {
        return Err(SynthesisError::ZeroResolution);
    }

    let rest_wavelengths = profile.wavelengths_nm();
    let intensities = profile.intensities();

    // Extremal shift bounds for the output grid; this also rejects a
    // superluminal v_rot before any per-pixel work (|v_los| <= |v_rot|).
    let wl_lo = rest_wavelengths[0] * doppler_shift(-obs.v_rot_km_s)?;
    let wl_hi = rest_wavelengths[rest_wavelengths.len() - 1] * doppler_shift(obs.v_rot_km_s)?;
    let observed_wavelengths = Array1::linspace(wl_lo, wl_hi, obs.output_resolution);

    let tilt = FRAC_PI_2 - obs.inclination_rad;
    // Projection of the rotational velocity field onto the line of sight.
    let axis_projection = tilt.cos();

    let angles = pixel_angles(map.nside());
    let values = map.values();
    debug!(
        "synthesizing {} output samples from {} pixels (phase {}, inclination {} rad)",
        obs.output_resolution,
        angles.len(),
        obs.phase,
        obs.inclination_rad
    );

    let mut flux = angles
        .par_iter()
        .enumerate()
        .try_fold(
            || Array1::<f64>::zeros(obs.output_resolution),
            |mut acc, (ipix, &(theta0, phi0))| {
                let phi0 = phi0 + obs.phase * TAU;
                let v_los = obs.v_rot_km_s * axis_projection * theta0.sin() * phi0.sin();

                let (theta, phi) = rotate_to_observer(theta0, phi0, tilt);

                // Strictly the observer-facing hemisphere.
                if phi > -FRAC_PI_2 && phi < FRAC_PI_2 {
                    let factor = doppler_shift(v_los)?;
                    // Cosine from the sub-observer point, doubling as the
                    // projected-area weight.
                    let mu = theta.sin() * phi.cos();
                    let weight = values[ipix] * limb_darkening(obs.limb_darkening_u, mu) * mu;

                    // Sampling the profile shifted by `factor` at an output
                    // wavelength is the same linear interpolation as
                    // sampling the rest-frame profile at wavelength/factor.
                    for (slot, &wl) in acc.iter_mut().zip(observed_wavelengths.iter()) {
                        *slot += weight * interp_clamped(wl / factor, rest_wavelengths, intensities);
                    }
                }
                Ok::<_, SynthesisError>(acc)
            },
        )
        .try_reduce(
            || Array1::zeros(obs.output_resolution),
            |a, b| Ok(a + b),
        )?;

    if obs.normalize {
        let max_flux = flux
            .iter()
            .copied()
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(0.0);
        if !(max_flux > 0.0) {
            return Err(SynthesisError::DegenerateSpectrum);
        }
        flux.mapv_inplace(|v| v / max_flux);
    }

    Ok(ObservedSpectrum {
        wavelengths_nm: observed_wavelengths,
        flux,
    })
}

/// Linear interpolation of `ys` over ascending `xs`, clamped to the
/// boundary values outside the domain.
fn interp_clamped(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }

    let idx = match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap()) {
        Ok(exact_idx) => return ys[exact_idx],
        Err(insert_idx) => insert_idx,
    };

    let t = (x - xs[idx - 1]) / (xs[idx] - xs[idx - 1]);
    ys[idx - 1] + t * (ys[idx] - ys[idx - 1])
}
