use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info};

use crate::listing;

const REMOTE_DCIM: &str = "/sdcard/DCIM";
const LISTING_FILE: &str = "files.txt";

/// Launch the camera app on the connected device.
pub fn launch_camera() -> Result<()> {
    let output = run_adb(&[
        "shell",
        "am",
        "start",
        "-a",
        "android.media.action.IMAGE_CAPTURE",
    ])?;
    check(&output, "failed to launch the camera over adb")?;
    info!("camera launched on device");
    Ok(())
}

/// Press the shutter on the connected device (KEYCODE_CAMERA).
pub fn trigger_shutter() -> Result<()> {
    let output = run_adb(&["shell", "input", "keyevent", "27"])?;
    check(&output, "failed to trigger the shutter over adb")?;
    info!("shutter triggered on device");
    Ok(())
}

/// List the device's DCIM tree and pull the most recent JPEG into
/// `capture_dir`, naming it `captured_image_<YYYYMMDD_HHMMSS>.jpg`.
///
/// The raw listing is persisted next to the captures as `files.txt`.
/// A device without any JPEGs yields `Ok(None)`: informational, not an
/// error.
pub fn pull_latest(capture_dir: &Path) -> Result<Option<PathBuf>> {
    fs::create_dir_all(capture_dir)
        .with_context(|| format!("failed to create capture dir: {}", capture_dir.display()))?;

    let output = run_adb(&["shell", "ls", "-R", REMOTE_DCIM])?;
    check(&output, "failed to list the device DCIM folder")?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    let listing_path = capture_dir.join(LISTING_FILE);
    fs::write(&listing_path, stdout.as_bytes())
        .with_context(|| format!("failed to write listing: {}", listing_path.display()))?;

    let Some(remote) = listing::latest_jpeg(&stdout) else {
        info!("no JPEGs found in the device DCIM folder");
        return Ok(None);
    };

    let local = capture_dir.join(capture_file_name(Local::now()));
    let local_arg = local.to_string_lossy();
    let output = run_adb(&["pull", remote.as_str(), local_arg.as_ref()])?;
    check(&output, "failed to pull the capture from the device")?;

    info!(remote = %remote, local = %local.display(), "capture pulled");
    Ok(Some(local))
}

fn run_adb(args: &[&str]) -> Result<Output> {
    debug!(?args, "running adb");
    Command::new("adb")
        .args(args)
        .output()
        .context("failed to run adb (is it installed and on PATH?)")
}

/// adb reports some failures through stderr with a zero exit status, so
/// both are checked.
fn check(output: &Output, what: &str) -> Result<()> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() || stderr.contains("Error") {
        bail!("{what}: {}", stderr.trim());
    }
    Ok(())
}

fn capture_file_name<Tz: TimeZone>(now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("captured_image_{}.jpg", now.format("%Y%m%d_%H%M%S"))
}
