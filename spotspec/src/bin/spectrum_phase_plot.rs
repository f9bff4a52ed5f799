//! Plot Doppler-broadened spectra of a spotted star over a rotation.
//!
//! This tool paints a circular spot onto a uniform stellar surface,
//! sweeps the rotation phase, and plots the synthesized spectra for each
//! requested inclination, plus a scatter view of the surface map itself.
//!
//! Usage:
//! ```
//! cargo run --bin spectrum_phase_plot -- [OPTIONS]
//! ```
//!
//! See --help for detailed options.

use clap::Parser;
use log::info;
use plotters::prelude::*;
use std::error::Error;

use healgrid::pixel_angles;
use spotspec::{observe_spectrum, LineProfile, Observation, ObservedSpectrum, SurfaceMap};

/// Command line arguments for the phase-sweep plot
#[derive(Parser, Debug)]
#[command(
    name = "Spectrum Phase Plotter",
    about = "Plots rotationally broadened spectra of a spotted star across a full rotation",
    long_about = None
)]
struct Args {
    /// Surface grid resolution (power of two)
    #[arg(long, default_value_t = 64)]
    nside: u32,

    /// Spot center colatitude in degrees
    #[arg(long, default_value_t = 90.0)]
    spot_theta: f64,

    /// Spot center longitude in degrees
    #[arg(long, default_value_t = -90.0)]
    spot_phi: f64,

    /// Spot radius in degrees
    #[arg(long, default_value_t = 45.0)]
    spot_radius: f64,

    /// Spot intensity (0 = fully dark)
    #[arg(long, default_value_t = 0.1)]
    spot_intensity: f64,

    /// Equatorial rotation velocity in km/s
    #[arg(short, long, default_value_t = 20.0)]
    v_rot: f64,

    /// Rest-frame line center in nm
    #[arg(long, default_value_t = 656.28)]
    line_center: f64,

    /// Gaussian line width sigma in nm
    #[arg(long, default_value_t = 0.01)]
    line_sigma: f64,

    /// Absorption depth at line center
    #[arg(long, default_value_t = 0.8)]
    line_depth: f64,

    /// Half-width of the sampled wavelength window in nm
    #[arg(long, default_value_t = 0.04)]
    half_span: f64,

    /// Number of rest-frame profile samples
    #[arg(long, default_value_t = 1000)]
    profile_samples: usize,

    /// Number of phase steps across one rotation
    #[arg(long, default_value_t = 8)]
    phases: usize,

    /// Inclinations to plot, in degrees
    #[arg(long, num_args = 1.., default_values_t = vec![90.0, 45.0, 0.0])]
    inclinations: Vec<f64>,

    /// Output directory for the generated plots
    #[arg(short, long, default_value = "plots")]
    output_dir: String,
}

/// Map a [0, 1] ramp position to a hot (black-red-yellow-white) color
fn hot_color(t: f64) -> RGBColor {
    let r = (3.0 * t).clamp(0.0, 1.0);
    let g = (3.0 * t - 1.0).clamp(0.0, 1.0);
    let b = (3.0 * t - 2.0).clamp(0.0, 1.0);
    RGBColor(
        (r * 255.0).min(255.0) as u8,
        (g * 255.0).min(255.0) as u8,
        (b * 255.0).min(255.0) as u8,
    )
}

/// Render the surface map as a longitude/colatitude scatter plot
fn plot_surface_map(map: &SurfaceMap, path: &str) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1024, 576)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Star surface with spot", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-180.0..180.0, 0.0..180.0)?;

    chart
        .configure_mesh()
        .x_desc("Longitude (deg)")
        .y_desc("Colatitude (deg)")
        .draw()?;

    let angles = pixel_angles(map.nside());
    chart.draw_series(
        angles
            .iter()
            .zip(map.values().iter())
            .map(|(&(theta, phi), &value)| {
                let shade = (value.clamp(0.0, 1.0) * 255.0) as u8;
                let color = RGBColor(shade, shade.saturating_sub(60), 0);
                Circle::new((phi.to_degrees(), theta.to_degrees()), 2, color.filled())
            }),
    )?;

    root.present()?;
    Ok(())
}

/// Plot one phase sweep of spectra for a fixed inclination
fn plot_phase_sweep(
    spectra: &[(f64, ObservedSpectrum)],
    inclination_deg: f64,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    let (mut flux_min, mut flux_max) = (f64::MAX, f64::MIN);
    for (_, spectrum) in spectra {
        for &f in spectrum.flux.iter() {
            flux_min = flux_min.min(f);
            flux_max = flux_max.max(f);
        }
    }
    let margin = 0.05 * (flux_max - flux_min).max(f64::EPSILON);

    let first = &spectra[0].1.wavelengths_nm;
    let (wl_min, wl_max) = (first[0], first[first.len() - 1]);

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("i = {inclination_deg:.0} deg"),
            ("sans-serif", 30),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(wl_min..wl_max, (flux_min - margin)..(flux_max + margin))?;

    chart
        .configure_mesh()
        .x_label_formatter(&|x| format!("{x:.2}"))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .x_desc("Wavelength (nm)")
        .y_desc("Flux")
        .draw()?;

    let n = spectra.len();
    for (k, (phase, spectrum)) in spectra.iter().enumerate() {
        let color = hot_color(k as f64 / n as f64);
        chart
            .draw_series(LineSeries::new(
                spectrum
                    .wavelengths_nm
                    .iter()
                    .zip(spectrum.flux.iter())
                    .map(|(&wl, &f)| (wl, f)),
                &color,
            ))?
            .label(format!("phase {phase:.3}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    std::fs::create_dir_all(&args.output_dir)?;

    let map = SurfaceMap::spot(
        args.nside,
        args.spot_theta.to_radians(),
        args.spot_phi.to_radians(),
        args.spot_radius.to_radians(),
        args.spot_intensity,
    );
    let profile = LineProfile::gaussian_absorption(
        args.line_center,
        args.line_sigma,
        args.line_depth,
        args.half_span,
        args.profile_samples,
    );

    let map_path = format!("{}/surface_map.png", args.output_dir);
    plot_surface_map(&map, &map_path)?;
    info!("surface map rendered to {map_path}");

    for &inclination_deg in &args.inclinations {
        let mut spectra = Vec::with_capacity(args.phases);
        for k in 0..args.phases {
            let phase = k as f64 / args.phases as f64;
            let obs = Observation {
                v_rot_km_s: args.v_rot,
                inclination_rad: inclination_deg.to_radians(),
                phase,
                normalize: false,
                ..Observation::default()
            };
            spectra.push((phase, observe_spectrum(&map, &profile, &obs)?));
        }

        let path = format!(
            "{}/spectrum_rotation_{:.0}.png",
            args.output_dir, inclination_deg
        );
        plot_phase_sweep(&spectra, inclination_deg, &path)?;
        info!(
            "phase sweep at i = {inclination_deg:.0} deg rendered to {path}"
        );
    }

    println!(
        "Wrote {} plot(s) to {}",
        args.inclinations.len() + 1,
        args.output_dir
    );
    Ok(())
}
