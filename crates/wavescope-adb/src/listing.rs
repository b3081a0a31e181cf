/// Parse `adb shell ls -R` output and pick the capture to pull.
///
/// The recursive listing interleaves directory headers (lines ending with
/// `:`) with the entries of that directory. The last `.jpg` encountered
/// wins, which on a device DCIM tree is the most recent capture.
pub fn latest_jpeg(listing: &str) -> Option<String> {
    let mut current_dir: Option<&str> = None;
    let mut latest = None;

    for line in listing.lines() {
        let line = line.trim();
        if let Some(dir) = line.strip_suffix(':') {
            current_dir = Some(dir);
        } else if line.ends_with(".jpg")
            && let Some(dir) = current_dir
        {
            latest = Some(format!("{dir}/{line}"));
        }
    }

    latest
}
