//! Doppler-imaging spectral synthesis for spotted stellar surfaces
//!
//! This crate forward-models the spectrum of a rotating star whose surface
//! brightness is given per pixel on a `healgrid` sphere. Each visible pixel
//! contributes the rest-frame line profile, Doppler-shifted by its
//! line-of-sight velocity and weighted by brightness, projected area, and
//! limb darkening; the sum over pixels is the observed spectrum.

pub mod constants;
pub mod kinematics;
pub mod rotation;
pub mod surface;
pub mod synthesis;

// Re-exports for easier access
pub use kinematics::{doppler_shift, limb_darkening, KinematicsError};
pub use rotation::rotate_to_observer;
pub use surface::SurfaceMap;
pub use synthesis::{
    observe_spectrum, LineProfile, Observation, ObservedSpectrum, ProfileError, SynthesisError,
};
