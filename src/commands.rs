use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use wavescope_core::pixel_buf::{AdjustParams, OverlayParams, PixelBuf};
use wavescope_core::pipeline::Pipeline;
use wavescope_core::waveform::Waveform;
use wavescope_core::{io, overlay};

/// Preview viewport size; with `--viewport` a source is fitted to it
/// before processing, matching what the on-screen preview shows.
const VIEWPORT_WIDTH: u32 = 600;
const VIEWPORT_HEIGHT: u32 = 450;

#[derive(Parser)]
#[command(name = "wavescope")]
#[command(version, about = "Waveform preview and color correction for adb captures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the per-column RGB waveform of an image
    Waveform {
        input: PathBuf,

        /// Emit the full curves as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Fit the image to the 600x450 viewport before analysis
        #[arg(long)]
        viewport: bool,
    },

    /// Apply white balance, luminance and per-channel gain
    Adjust {
        input: PathBuf,

        /// Output image (png or jpeg, by extension)
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// White balance percentage (100 = neutral, >100 warms)
        #[arg(long, value_name = "PCT", default_value_t = 100.0)]
        white_balance: f32,

        /// Luminance percentage (100 = neutral)
        #[arg(long, value_name = "PCT", default_value_t = 100.0)]
        luminance: f32,

        /// Red gain percentage
        #[arg(long, value_name = "PCT", default_value_t = 100.0)]
        red: f32,

        /// Green gain percentage
        #[arg(long, value_name = "PCT", default_value_t = 100.0)]
        green: f32,

        /// Blue gain percentage
        #[arg(long, value_name = "PCT", default_value_t = 100.0)]
        blue: f32,

        /// Write the recomputed waveform of the result as JSON
        #[arg(long, value_name = "FILE")]
        waveform_json: Option<PathBuf>,

        /// Fit the image to the 600x450 viewport before processing
        #[arg(long)]
        viewport: bool,
    },

    /// Composite the circular ring overlay
    Overlay {
        input: PathBuf,

        /// Output image (png or jpeg, by extension)
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// Base ring radius in pixels (10-150)
        #[arg(long, value_name = "PX", default_value_t = 50)]
        radius: u32,

        /// Radius scale in percent (10-100)
        #[arg(long, value_name = "PCT", default_value_t = 50)]
        radius_percent: u32,

        /// Edge smoothing strength (0-10, 0 = hard edge)
        #[arg(long, value_name = "N", default_value_t = 5)]
        smooth: u32,

        /// Fit the image to the 600x450 viewport before processing
        #[arg(long)]
        viewport: bool,
    },

    /// Drive the connected device over adb
    Capture {
        #[command(subcommand)]
        action: CaptureAction,
    },
}

#[derive(Subcommand)]
enum CaptureAction {
    /// Launch the camera app on the device
    Connect,
    /// Press the shutter
    Shutter,
    /// Pull the most recent JPEG into the capture folder
    Pull {
        #[arg(long, value_name = "DIR", default_value = "ImageCapture")]
        dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Waveform {
            input,
            json,
            viewport,
        } => cmd_waveform(&input, json, viewport),
        Commands::Adjust {
            input,
            out,
            white_balance,
            luminance,
            red,
            green,
            blue,
            waveform_json,
            viewport,
        } => {
            let params = AdjustParams {
                white_balance,
                luminance,
                red,
                green,
                blue,
            }
            .clamped();
            cmd_adjust(&input, &out, &params, waveform_json.as_deref(), viewport)
        }
        Commands::Overlay {
            input,
            out,
            radius,
            radius_percent,
            smooth,
            viewport,
        } => {
            let params = OverlayParams {
                base_radius: radius,
                radius_percent,
                smoothing: smooth,
            }
            .clamped();
            cmd_overlay(&input, &out, &params, viewport)
        }
        Commands::Capture { action } => cmd_capture(action),
    }
}

fn load(input: &Path, viewport: bool) -> Result<PixelBuf> {
    let buf = io::load_image(input)?;
    if viewport {
        io::resize_exact(&buf, VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    } else {
        Ok(buf)
    }
}

fn cmd_waveform(input: &Path, json: bool, viewport: bool) -> Result<()> {
    let buf = load(input, viewport)?;
    let waveform = Waveform::compute(&buf)?;

    if json {
        println!("{}", serde_json::to_string(&waveform)?);
        return Ok(());
    }

    for (name, curve) in [
        ("red", &waveform.red),
        ("green", &waveform.green),
        ("blue", &waveform.blue),
    ] {
        let min = curve.iter().copied().fold(f32::INFINITY, f32::min);
        let max = curve.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mean = curve.iter().sum::<f32>() / curve.len() as f32;
        println!("{name:>5}: min {min:7.2}  mean {mean:7.2}  max {max:7.2}");
    }
    Ok(())
}

fn cmd_adjust(
    input: &Path,
    out: &Path,
    params: &AdjustParams,
    waveform_json: Option<&Path>,
    viewport: bool,
) -> Result<()> {
    // The source buffer stays untouched; every apply starts from it.
    let source = load(input, viewport)?;
    let adjusted = Pipeline::new().process(&source, params)?;
    io::save_image(&adjusted, out)?;
    info!(out = %out.display(), "adjusted image written");

    if let Some(path) = waveform_json {
        let waveform = Waveform::compute(&adjusted)?;
        let json = serde_json::to_vec(&waveform)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write waveform: {}", path.display()))?;
        info!(path = %path.display(), "waveform written");
    }
    Ok(())
}

fn cmd_overlay(input: &Path, out: &Path, params: &OverlayParams, viewport: bool) -> Result<()> {
    let buf = load(input, viewport)?;
    // The ring is a view-level annotation; the waveform is deliberately
    // not recomputed for it.
    let composited = overlay::apply(&buf, params);
    io::save_image(&composited, out)?;
    info!(out = %out.display(), radius = params.effective_radius(), "overlay written");
    Ok(())
}

fn cmd_capture(action: CaptureAction) -> Result<()> {
    match action {
        CaptureAction::Connect => {
            wavescope_adb::bridge::launch_camera()?;
            println!("Camera successfully launched via adb.");
        }
        CaptureAction::Shutter => {
            wavescope_adb::bridge::trigger_shutter()?;
            println!("Image captured via adb.");
        }
        CaptureAction::Pull { dir } => match wavescope_adb::bridge::pull_latest(&dir)? {
            Some(path) => println!("Image successfully downloaded: {}", path.display()),
            None => println!("No images found in the DCIM folder."),
        },
    }
    Ok(())
}
