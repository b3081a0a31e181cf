use tracing::debug;

use crate::pixel_buf::{OverlayParams, PixelBuf};

/// Ring outline stroke width in pixels.
const STROKE_WIDTH: f32 = 5.0;

/// Composite a translucent circular ring onto the image (source-over).
///
/// A transparent layer the size of the image gets an opaque white ring
/// outline centered at (W/2, H/2) with the effective radius. With
/// smoothing > 0 the ring coverage is blurred by a Gaussian whose sigma
/// equals the smoothing value; higher values give a softer edge. A radius
/// reaching past the canvas simply clips, it is not an error.
///
/// The output is always RGBA; the base is promoted with alpha 255 first
/// when needed. This transform does not feed the waveform display.
pub fn apply(buf: &PixelBuf, params: &OverlayParams) -> PixelBuf {
    let radius = params.effective_radius() as f32;
    debug!(radius, smoothing = params.smoothing, "rendering ring overlay");

    let mut coverage = ring_coverage(buf.width as usize, buf.height as usize, radius);
    if params.smoothing > 0 {
        gaussian_blur(
            &mut coverage,
            buf.width as usize,
            buf.height as usize,
            params.smoothing as f32,
        );
    }
    composite_white_ring(&buf.to_rgba(), &coverage)
}

/// Per-pixel coverage of the ring outline: 1.0 inside the stroke band,
/// 0.0 elsewhere. The layer color is uniform white, so coverage is the
/// only plane worth materializing.
fn ring_coverage(width: usize, height: usize, radius: f32) -> Vec<f32> {
    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;
    let half_stroke = STROKE_WIDTH / 2.0;

    let mut coverage = vec![0.0_f32; width * height];
    for y in 0..height {
        let dy = y as f32 - cy;
        for x in 0..width {
            let dx = x as f32 - cx;
            let dist = (dx * dx + dy * dy).sqrt();
            if (dist - radius).abs() <= half_stroke {
                coverage[y * width + x] = 1.0;
            }
        }
    }
    coverage
}

/// Separable Gaussian blur of the coverage plane. Pixels outside the
/// canvas count as transparent.
fn gaussian_blur(plane: &mut [f32], width: usize, height: usize, sigma: f32) {
    let kernel = gaussian_kernel(sigma);
    let reach = (kernel.len() / 2) as i64;

    let mut tmp = vec![0.0_f32; plane.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = x as i64 + k as i64 - reach;
                if (0..width as i64).contains(&sx) {
                    acc += plane[y * width + sx as usize] * weight;
                }
            }
            tmp[y * width + x] = acc;
        }
    }
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = y as i64 + k as i64 - reach;
                if (0..height as i64).contains(&sy) {
                    acc += tmp[sy as usize * width + x] * weight;
                }
            }
            plane[y * width + x] = acc;
        }
    }
}

/// Normalized 1-D Gaussian kernel truncated at three sigma.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let reach = (3.0 * sigma).ceil() as i64;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-reach..=reach)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let total: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= total;
    }
    kernel
}

/// Source-over composite of a uniform white layer with the given coverage
/// onto an RGBA base.
fn composite_white_ring(base: &PixelBuf, coverage: &[f32]) -> PixelBuf {
    let mut data = Vec::with_capacity(coverage.len() * 4);
    for (pixel, &a) in base.data.chunks_exact(4).zip(coverage) {
        let a = a.clamp(0.0, 1.0);
        let inv = 1.0 - a;
        for &channel in pixel {
            data.push((255.0 * a + channel as f32 * inv).round() as u8);
        }
    }
    PixelBuf {
        width: base.width,
        height: base.height,
        channels: 4,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuf {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        PixelBuf::from_data(width, height, 3, data).unwrap()
    }

    fn params(base_radius: u32, radius_percent: u32, smoothing: u32) -> OverlayParams {
        OverlayParams {
            base_radius,
            radius_percent,
            smoothing,
        }
    }

    #[test]
    fn output_is_rgba_with_same_dimensions() {
        let buf = solid(64, 48, [9, 9, 9]);
        let out = apply(&buf, &OverlayParams::default());
        assert_eq!(out.width, 64);
        assert_eq!(out.height, 48);
        assert_eq!(out.channels, 4);
        assert_eq!(out.data.len(), 64 * 48 * 4);
    }

    #[test]
    fn hard_edge_without_smoothing() {
        let buf = solid(100, 100, [10, 20, 30]);
        let out = apply(&buf, &params(50, 50, 0));
        for pixel in out.data.chunks_exact(4) {
            assert!(
                pixel == [10, 20, 30, 255] || pixel == [255, 255, 255, 255],
                "smoothing=0 should leave only base or pure white pixels, got {pixel:?}"
            );
        }
    }

    #[test]
    fn ring_sits_at_effective_radius() {
        let buf = solid(100, 100, [0, 0, 0]);
        let out = apply(&buf, &params(50, 50, 0)); // effective radius 25
        let idx = |x: usize, y: usize| (y * 100 + x) * 4;

        // On the circle, due east of center (50, 50).
        assert_eq!(
            &out.data[idx(75, 50)..idx(75, 50) + 4],
            &[255, 255, 255, 255][..]
        );
        // Center stays untouched.
        assert_eq!(&out.data[idx(50, 50)..idx(50, 50) + 4], &[0, 0, 0, 255][..]);
        // Far corner stays untouched.
        assert_eq!(&out.data[idx(2, 2)..idx(2, 2) + 4], &[0, 0, 0, 255][..]);
    }

    #[test]
    fn smoothing_softens_progressively() {
        let buf = solid(100, 100, [0, 0, 0]);
        let blended = |smoothing: u32| {
            apply(&buf, &params(50, 50, smoothing))
                .data
                .chunks_exact(4)
                .filter(|p| p[0] != 0 && p[0] != 255)
                .count()
        };
        let none = blended(0);
        let soft = blended(2);
        let softer = blended(8);
        assert_eq!(none, 0);
        assert!(soft > 0, "smoothing should produce partial coverage");
        assert!(
            softer > soft,
            "stronger smoothing should blend more pixels: {softer} vs {soft}"
        );
    }

    #[test]
    fn oversized_radius_clips_without_panic() {
        let buf = solid(40, 30, [5, 5, 5]);
        let out = apply(&buf, &params(150, 100, 3));
        assert_eq!(out.pixel_count(), 40 * 30);
    }

    #[test]
    fn rgba_base_keeps_its_alpha_outside_the_ring() {
        let base = PixelBuf::from_data(3, 1, 4, vec![1, 2, 3, 100, 4, 5, 6, 200, 7, 8, 9, 50])
            .unwrap();
        // Radius far outside a 3x1 canvas band: nothing drawn.
        let out = apply(&base, &params(150, 100, 0));
        assert_eq!(out.data, base.data);
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for sigma in [1.0_f32, 3.0, 10.0] {
            let kernel = gaussian_kernel(sigma);
            let total: f32 = kernel.iter().sum();
            assert!((total - 1.0).abs() < 1e-4, "sigma={sigma} sum={total}");
            assert_eq!(kernel.len() % 2, 1);
            let mid = kernel.len() / 2;
            for i in 0..mid {
                assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-6);
            }
            assert!(kernel[mid] >= kernel[0]);
        }
    }
}
