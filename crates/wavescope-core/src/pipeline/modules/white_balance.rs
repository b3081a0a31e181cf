use anyhow::Result;

use crate::pixel_buf::{AdjustParams, WorkingBuf};
use crate::pipeline::module::ProcessingModule;

/// Single-scalar white balance: skews red and blue gain in opposite
/// directions around the neutral point, leaving green untouched.
///
/// `factor = (white_balance - 100) / 100`; red is scaled by `1 + factor`,
/// blue by `1 - factor`. At 100 the module is an exact no-op.
pub struct WhiteBalance;

impl ProcessingModule for WhiteBalance {
    fn name(&self) -> &str {
        "white_balance"
    }

    fn process(&self, mut input: WorkingBuf, params: &AdjustParams) -> Result<WorkingBuf> {
        let (red_mul, blue_mul) = wb_multipliers(params.white_balance);
        if red_mul == 1.0 && blue_mul == 1.0 {
            return Ok(input);
        }

        for pixel in input.data.chunks_exact_mut(3) {
            pixel[0] *= red_mul;
            pixel[2] *= blue_mul;
        }

        Ok(input)
    }
}

/// (red, blue) multipliers for a white-balance percentage.
pub fn wb_multipliers(white_balance: f32) -> (f32, f32) {
    let factor = (white_balance - 100.0) / 100.0;
    (1.0 + factor, 1.0 - factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray() -> WorkingBuf {
        WorkingBuf {
            width: 1,
            height: 1,
            data: vec![128.0, 128.0, 128.0],
        }
    }

    #[test]
    fn neutral_is_identity() {
        let buf = gray();
        let expected = buf.data.clone();
        let result = WhiteBalance
            .process(buf, &AdjustParams::default())
            .unwrap();
        assert_eq!(result.data, expected);
    }

    #[test]
    fn warm_boosts_red_reduces_blue() {
        let params = AdjustParams {
            white_balance: 150.0,
            ..Default::default()
        };
        let result = WhiteBalance.process(gray(), &params).unwrap();
        assert_eq!(result.data[0], 192.0); // 128 * 1.5
        assert_eq!(result.data[1], 128.0); // green untouched
        assert_eq!(result.data[2], 64.0); // 128 * 0.5
    }

    #[test]
    fn cool_reduces_red_boosts_blue() {
        let params = AdjustParams {
            white_balance: 50.0,
            ..Default::default()
        };
        let result = WhiteBalance.process(gray(), &params).unwrap();
        assert_eq!(result.data[0], 64.0);
        assert_eq!(result.data[1], 128.0);
        assert_eq!(result.data[2], 192.0);
    }

    #[test]
    fn multipliers_move_strictly_with_white_balance() {
        let mut prev_red = 0.0_f32;
        let mut prev_blue = f32::MAX;
        for wb in (50..=150).step_by(10) {
            let (red, blue) = wb_multipliers(wb as f32);
            assert!(red > prev_red, "red multiplier should rise with wb={wb}");
            assert!(blue < prev_blue, "blue multiplier should fall with wb={wb}");
            prev_red = red;
            prev_blue = blue;
        }
    }

    #[test]
    fn multipliers_at_neutral() {
        let (red, blue) = wb_multipliers(100.0);
        assert_eq!(red, 1.0);
        assert_eq!(blue, 1.0);
    }
}
