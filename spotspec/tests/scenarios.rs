//! End-to-end synthesis scenarios exercising the public API.
//!
//! These tests check the observable properties of the pipeline as a
//! whole: phase behavior, hemisphere culling, profile passthrough, and
//! rotational broadening.

use approx::assert_relative_eq;
use ndarray::Array1;
use std::f64::consts::{FRAC_PI_2, PI};

use healgrid::{npix, pix2ang};
use spotspec::{observe_spectrum, LineProfile, Observation, SurfaceMap, SynthesisError};

/// Rectangular emission profile of the given full width centered on
/// `center_nm`, sampled on a wider uniform grid.
fn rectangular_profile(center_nm: f64, width_nm: f64, samples: usize) -> LineProfile {
    let half_span = width_nm * 2.0;
    let step = 2.0 * half_span / (samples - 1) as f64;
    let wavelengths: Vec<f64> = (0..samples)
        .map(|k| center_nm - half_span + step * k as f64)
        .collect();
    let intensities = wavelengths
        .iter()
        .map(|&wl| {
            if (wl - center_nm).abs() <= width_nm / 2.0 {
                1.0
            } else {
                0.0
            }
        })
        .collect();
    LineProfile::new(wavelengths, intensities).unwrap()
}

/// Width of the region where `flux` dips below the half-depth threshold,
/// in grid units of `wavelengths`.
fn absorption_width_nm(wavelengths: &Array1<f64>, flux: &Array1<f64>) -> f64 {
    let max = flux.iter().cloned().fold(f64::MIN, f64::max);
    let min = flux.iter().cloned().fold(f64::MAX, f64::min);
    let threshold = 0.5 * (max + min);

    let step = wavelengths[1] - wavelengths[0];
    let below = flux.iter().filter(|&&v| v < threshold).count();
    below as f64 * step
}

#[test]
fn no_rotation_means_no_phase_dependence() {
    let map = SurfaceMap::spot(8, FRAC_PI_2, -FRAC_PI_2, PI / 4.0, 0.1);
    let profile = LineProfile::gaussian_absorption(656.28, 0.01, 0.8, 0.04, 400);

    let reference = observe_spectrum(
        &map,
        &profile,
        &Observation {
            phase: 0.0,
            ..Observation::default()
        },
    )
    .unwrap();

    for phase in [0.125, 0.25, 0.6, 0.875] {
        let shifted = observe_spectrum(
            &map,
            &profile,
            &Observation {
                phase,
                ..Observation::default()
            },
        )
        .unwrap();
        for (a, b) in reference.flux.iter().zip(shifted.flux.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }
}

#[test]
fn synthesis_is_periodic_in_phase() {
    let map = SurfaceMap::spot(8, FRAC_PI_2, -FRAC_PI_2, PI / 4.0, 0.1);
    let profile = LineProfile::gaussian_absorption(656.28, 0.01, 0.8, 0.04, 400);

    for phase in [0.0, 0.3, 0.71] {
        for inclination in [FRAC_PI_2, PI / 4.0] {
            let base = Observation {
                v_rot_km_s: 20.0,
                inclination_rad: inclination,
                phase,
                normalize: false,
                ..Observation::default()
            };
            let wrapped = Observation {
                phase: phase + 1.0,
                ..base.clone()
            };

            let a = observe_spectrum(&map, &profile, &base).unwrap();
            let b = observe_spectrum(&map, &profile, &wrapped).unwrap();
            for (x, y) in a.flux.iter().zip(b.flux.iter()) {
                assert_relative_eq!(x, y, epsilon = 1e-8);
            }
        }
    }
}

#[test]
fn hidden_hemisphere_contributes_nothing() {
    // Brightness only well inside the far hemisphere: at phase 0 and
    // equator-on inclination the observer frame equals the rotation
    // frame, so these pixels sit outside the (-pi/2, pi/2) visibility
    // window. The margin keeps the test away from pixels whose centers
    // land exactly on the cutoff longitude.
    let nside = 8;
    let values = Array1::from_iter((0..npix(nside)).map(|ipix| {
        let (_, phi) = pix2ang(nside, ipix);
        if phi.abs() >= FRAC_PI_2 + 0.2 {
            1.0
        } else {
            0.0
        }
    }));
    let map = SurfaceMap::from_values(values).unwrap();
    let profile = LineProfile::gaussian_absorption(500.0, 0.01, 0.5, 0.05, 200);

    let unnormalized = observe_spectrum(
        &map,
        &profile,
        &Observation {
            v_rot_km_s: 10.0,
            normalize: false,
            ..Observation::default()
        },
    )
    .unwrap();
    assert!(unnormalized.flux.iter().all(|&v| v == 0.0));

    // Normalizing an all-zero spectrum is the degenerate-result error,
    // not a silent NaN array.
    let degenerate = observe_spectrum(
        &map,
        &profile,
        &Observation {
            v_rot_km_s: 10.0,
            normalize: true,
            ..Observation::default()
        },
    );
    assert!(matches!(degenerate, Err(SynthesisError::DegenerateSpectrum)));
}

#[test]
fn uniform_star_at_rest_passes_rectangle_through() {
    // Uniform map, equator-on, no rotation, no limb darkening: the output
    // is the input rectangle, resampled and rescaled.
    let map = SurfaceMap::uniform(8);
    let width = 0.4;
    let center = 656.28;
    let profile = rectangular_profile(center, width, 801);

    let spectrum = observe_spectrum(
        &map,
        &profile,
        &Observation {
            output_resolution: 801,
            ..Observation::default()
        },
    )
    .unwrap();

    for (&wl, &f) in spectrum.wavelengths_nm.iter().zip(spectrum.flux.iter()) {
        let offset = (wl - center).abs();
        if offset < 0.4 * width {
            assert_relative_eq!(f, 1.0, epsilon = 1e-9);
        } else if offset > 0.6 * width {
            assert_relative_eq!(f, 0.0, epsilon = 1e-9);
        }
    }

    // Still centered: the flux is symmetric about the line center.
    let n = spectrum.flux.len();
    for k in 0..n / 4 {
        assert_relative_eq!(
            spectrum.flux[k],
            spectrum.flux[n - 1 - k],
            epsilon = 1e-6
        );
    }
}

#[test]
fn rotation_broadens_a_narrow_line() {
    let v_rot = 50.0;
    let center = 656.28;
    let map = SurfaceMap::spot(16, FRAC_PI_2, -FRAC_PI_2, PI / 4.0, 0.9);
    let profile = LineProfile::gaussian_absorption(center, 0.01, 0.8, 0.3, 1201);

    let at_rest = observe_spectrum(
        &map,
        &profile,
        &Observation {
            v_rot_km_s: 0.0,
            output_resolution: 1201,
            ..Observation::default()
        },
    )
    .unwrap();
    let spinning = observe_spectrum(
        &map,
        &profile,
        &Observation {
            v_rot_km_s: v_rot,
            output_resolution: 1201,
            ..Observation::default()
        },
    )
    .unwrap();

    let width_rest = absorption_width_nm(&at_rest.wavelengths_nm, &at_rest.flux);
    let width_spun = absorption_width_nm(&spinning.wavelengths_nm, &spinning.flux);

    assert!(
        width_spun > 3.0 * width_rest,
        "no broadening: {width_rest} nm at rest vs {width_spun} nm spinning"
    );

    // The broadened width is of order 2 * lambda0 * v/c.
    let rotational_scale = 2.0 * center * v_rot / spotspec::kinematics::SPEED_OF_LIGHT_KM_S;
    assert!(
        width_spun < 3.0 * rotational_scale,
        "broadening {width_spun} nm far exceeds the rotational scale {rotational_scale} nm"
    );
}
