use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::pixel_buf::PixelBuf;

/// Per-column mean brightness curves, one per channel.
///
/// The diagnostic is a video-engineering style "waveform scope": for each
/// image column, the arithmetic mean of that channel's samples over all
/// rows. It is not a histogram. Each curve has exactly `width` entries and
/// every value lies in 0..=255.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Waveform {
    pub red: Vec<f32>,
    pub green: Vec<f32>,
    pub blue: Vec<f32>,
}

impl Waveform {
    /// Column-wise channel average over all rows.
    ///
    /// Pure function of the buffer; recomputed in full after every change,
    /// never cached across frames. Alpha, when present, is ignored.
    pub fn compute(buf: &PixelBuf) -> Result<Waveform> {
        ensure!(
            buf.width > 0 && buf.height > 0,
            "cannot compute waveform of an empty {}x{} buffer",
            buf.width,
            buf.height
        );

        let width = buf.width as usize;
        let channels = buf.channels as usize;
        let mut sums = vec![[0.0_f64; 3]; width];

        for row in buf.data.chunks_exact(width * channels) {
            for (x, pixel) in row.chunks_exact(channels).enumerate() {
                sums[x][0] += pixel[0] as f64;
                sums[x][1] += pixel[1] as f64;
                sums[x][2] += pixel[2] as f64;
            }
        }

        let inv_height = 1.0 / buf.height as f64;
        let mut red = Vec::with_capacity(width);
        let mut green = Vec::with_capacity(width);
        let mut blue = Vec::with_capacity(width);
        for sum in &sums {
            red.push((sum[0] * inv_height) as f32);
            green.push((sum[1] * inv_height) as f32);
            blue.push((sum[2] * inv_height) as f32);
        }

        Ok(Waveform { red, green, blue })
    }

    /// Number of columns covered by each curve.
    pub fn width(&self) -> usize {
        self.red.len()
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

    #[test]
    fn curve_length_equals_width() {
        let buf = solid(37, 9, [1, 2, 3]);
        let wf = Waveform::compute(&buf).unwrap();
        assert_eq!(wf.width(), 37);
        assert_eq!(wf.red.len(), 37);
        assert_eq!(wf.green.len(), 37);
        assert_eq!(wf.blue.len(), 37);
    }

    #[test]
    fn uniform_buffer_gives_constant_curves() {
        let buf = solid(16, 8, [200, 64, 10]);
        let wf = Waveform::compute(&buf).unwrap();
        assert!(wf.red.iter().all(|&v| v == 200.0));
        assert!(wf.green.iter().all(|&v| v == 64.0));
        assert!(wf.blue.iter().all(|&v| v == 10.0));
    }

    #[test]
    fn solid_red_viewport_scenario() {
        let buf = solid(600, 450, [255, 0, 0]);
        let wf = Waveform::compute(&buf).unwrap();
        assert_eq!(wf.width(), 600);
        assert!(wf.red.iter().all(|&v| v == 255.0));
        assert!(wf.green.iter().all(|&v| v == 0.0));
        assert!(wf.blue.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn values_stay_in_sample_range() {
        // Pseudo-random-ish fill without pulling in a RNG.
        let width = 24_u32;
        let height = 13_u32;
        let data: Vec<u8> = (0..width * height * 3)
            .map(|i| ((i * 97 + 31) % 256) as u8)
            .collect();
        let buf = PixelBuf::from_data(width, height, 3, data).unwrap();
        let wf = Waveform::compute(&buf).unwrap();
        for curve in [&wf.red, &wf.green, &wf.blue] {
            assert!(curve.iter().all(|&v| (0.0..=255.0).contains(&v)));
        }
    }

    #[test]
    fn column_means_are_per_column() {
        // 2x2: left column red 0 and 255, right column red 100 and 100.
        let data = vec![
            0, 0, 0, 100, 0, 0, //
            255, 0, 0, 100, 0, 0,
        ];
        let buf = PixelBuf::from_data(2, 2, 3, data).unwrap();
        let wf = Waveform::compute(&buf).unwrap();
        assert_eq!(wf.red, vec![127.5, 100.0]);
        assert_eq!(wf.green, vec![0.0, 0.0]);
    }

    #[test]
    fn alpha_is_ignored() {
        let rgb = solid(4, 4, [50, 100, 150]);
        let rgba = rgb.to_rgba();
        let wf_rgb = Waveform::compute(&rgb).unwrap();
        let wf_rgba = Waveform::compute(&rgba).unwrap();
        assert_eq!(wf_rgb.red, wf_rgba.red);
        assert_eq!(wf_rgb.green, wf_rgba.green);
        assert_eq!(wf_rgb.blue, wf_rgba.blue);
    }

    #[test]
    fn empty_buffer_fails_fast() {
        let buf = PixelBuf::from_data(0, 0, 3, vec![]).unwrap();
        let err = Waveform::compute(&buf).unwrap_err();
        assert!(err.to_string().contains("empty"));

        let buf = PixelBuf::from_data(5, 0, 3, vec![]).unwrap();
        assert!(Waveform::compute(&buf).is_err());
    }
}
