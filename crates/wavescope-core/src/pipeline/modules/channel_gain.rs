use anyhow::Result;

use crate::pixel_buf::{AdjustParams, WorkingBuf};
use crate::pipeline::module::ProcessingModule;

/// Independent per-channel gain: channel c is scaled by `param_c / 100`.
pub struct ChannelGain;

impl ProcessingModule for ChannelGain {
    fn name(&self) -> &str {
        "channel_gain"
    }

    fn process(&self, mut input: WorkingBuf, params: &AdjustParams) -> Result<WorkingBuf> {
        let gains = [
            params.red / 100.0,
            params.green / 100.0,
            params.blue / 100.0,
        ];
        if gains == [1.0, 1.0, 1.0] {
            return Ok(input);
        }

        for pixel in input.data.chunks_exact_mut(3) {
            pixel[0] *= gains[0];
            pixel[1] *= gains[1];
            pixel[2] *= gains[2];
        }

        Ok(input)
    }
}
