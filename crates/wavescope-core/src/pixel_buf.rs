use serde::{Deserialize, Serialize};

/// Interleaved 8-bit image buffer, RGB or RGBA.
///
/// The working representation for all transforms. Samples are stored as
/// [R, G, B, R, G, B, ...] (or with a trailing A per pixel) and stay in
/// the 0..=255 domain. Buffers are never mutated in place by an
/// adjustment; every transform produces a fresh buffer so the original
/// stays available as the adjustment source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuf {
    pub width: u32,
    pub height: u32,
    /// 3 (RGB) or 4 (RGBA) interleaved channels.
    pub channels: u8,
    pub data: Vec<u8>,
}

impl PixelBuf {
    /// Zeroed RGB buffer (black).
    pub fn new_rgb(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: 3,
            data: vec![0; (width * height * 3) as usize],
        }
    }

    /// Zeroed RGBA buffer (fully transparent).
    pub fn new_rgba(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            channels: 4,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn from_data(width: u32, height: u32, channels: u8, data: Vec<u8>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            channels == 3 || channels == 4,
            "expected 3 (RGB) or 4 (RGBA) channels, got {channels}"
        );
        let expected = (width * height * channels as u32) as usize;
        anyhow::ensure!(
            data.len() == expected,
            "expected {expected} samples for {width}x{height}x{channels}, got {}",
            data.len()
        );
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// RGBA copy of this buffer, with alpha = 255 added when absent.
    pub fn to_rgba(&self) -> Self {
        if self.has_alpha() {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.pixel_count() * 4);
        for pixel in self.data.chunks_exact(3) {
            data.extend_from_slice(pixel);
            data.push(255);
        }
        Self {
            width: self.width,
            height: self.height,
            channels: 4,
            data,
        }
    }
}

/// f32 RGB working buffer used inside the adjustment pipeline.
///
/// Samples stay in the 0..=255 domain so the chain of per-channel scale
/// factors composes without intermediate quantization; the result is
/// quantized exactly once at the end of the pipeline.
#[derive(Clone, Debug)]
pub struct WorkingBuf {
    pub width: u32,
    pub height: u32,
    /// Flat RGB data: [R, G, B, R, G, B, ...].
    pub data: Vec<f32>,
}

impl WorkingBuf {
    /// Lift a PixelBuf into f32. Alpha, when present, is dropped: the
    /// color adjuster operates on RGB only.
    pub fn from_pixel_buf(buf: &PixelBuf) -> Self {
        let channels = buf.channels as usize;
        let mut data = Vec::with_capacity(buf.pixel_count() * 3);
        for pixel in buf.data.chunks_exact(channels) {
            data.push(pixel[0] as f32);
            data.push(pixel[1] as f32);
            data.push(pixel[2] as f32);
        }
        Self {
            width: buf.width,
            height: buf.height,
            data,
        }
    }

    /// Quantize back to 8-bit RGB: floor, then clamp to 0..=255.
    ///
    /// Truncation (not round-half-up) is the documented rounding mode and
    /// what the tests assume: 255 at 50% luminance becomes 127.
    pub fn quantize(self) -> PixelBuf {
        let data = self
            .data
            .iter()
            .map(|&v| v.clamp(0.0, 255.0).floor() as u8)
            .collect();
        PixelBuf {
            width: self.width,
            height: self.height,
            channels: 3,
            data,
        }
    }
}

pub const PARAM_MIN: f32 = 50.0;
pub const PARAM_MAX: f32 = 150.0;
pub const PARAM_NEUTRAL: f32 = 100.0;

/// Global color adjustment parameters, all percentages with 100 = neutral.
///
/// The control surface clamps values into 50..=150 before they reach the
/// pipeline; the pipeline assumes in-range inputs but still clamps output
/// samples.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AdjustParams {
    /// Skews red vs. blue gain in opposite directions around neutral.
    pub white_balance: f32,
    pub luminance: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Default for AdjustParams {
    fn default() -> Self {
        Self {
            white_balance: PARAM_NEUTRAL,
            luminance: PARAM_NEUTRAL,
            red: PARAM_NEUTRAL,
            green: PARAM_NEUTRAL,
            blue: PARAM_NEUTRAL,
        }
    }
}

impl AdjustParams {
    /// Clamp every field into the legal 50..=150 range.
    pub fn clamped(self) -> Self {
        Self {
            white_balance: self.white_balance.clamp(PARAM_MIN, PARAM_MAX),
            luminance: self.luminance.clamp(PARAM_MIN, PARAM_MAX),
            red: self.red.clamp(PARAM_MIN, PARAM_MAX),
            green: self.green.clamp(PARAM_MIN, PARAM_MAX),
            blue: self.blue.clamp(PARAM_MIN, PARAM_MAX),
        }
    }
}

pub const RADIUS_MIN: u32 = 10;
pub const RADIUS_MAX: u32 = 150;
pub const RADIUS_PERCENT_MIN: u32 = 10;
pub const RADIUS_PERCENT_MAX: u32 = 100;
pub const SMOOTHING_MAX: u32 = 10;

/// Parameters for the circular ring overlay.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OverlayParams {
    /// Base ring radius in pixels, 10..=150.
    pub base_radius: u32,
    /// Radius scale in percent, 10..=100.
    pub radius_percent: u32,
    /// Gaussian blur strength for the ring edge, 0..=10. 0 = hard edge.
    pub smoothing: u32,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            base_radius: 50,
            radius_percent: 50,
            smoothing: 5,
        }
    }
}

impl OverlayParams {
    /// Effective radius: floor(base_radius * percent / 100).
    pub fn effective_radius(&self) -> u32 {
        self.base_radius * self.radius_percent / 100
    }

    pub fn clamped(self) -> Self {
        Self {
            base_radius: self.base_radius.clamp(RADIUS_MIN, RADIUS_MAX),
            radius_percent: self
                .radius_percent
                .clamp(RADIUS_PERCENT_MIN, RADIUS_PERCENT_MAX),
            smoothing: self.smoothing.min(SMOOTHING_MAX),
        }
    }
}
