use anyhow::Result;

use crate::pixel_buf::{AdjustParams, WorkingBuf};
use crate::pipeline::module::ProcessingModule;

/// Global brightness: scales all three channels by `luminance / 100`.
pub struct Luminance;

impl ProcessingModule for Luminance {
    fn name(&self) -> &str {
        "luminance"
    }

    fn process(&self, mut input: WorkingBuf, params: &AdjustParams) -> Result<WorkingBuf> {
        let scale = params.luminance / 100.0;
        if scale == 1.0 {
            return Ok(input);
        }

        for v in &mut input.data {
            *v *= scale;
        }

        Ok(input)
    }
}
