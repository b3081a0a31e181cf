pub mod module;
pub mod modules;

use anyhow::Result;
use tracing::debug;

use crate::pixel_buf::{AdjustParams, PixelBuf, WorkingBuf};
use module::ProcessingModule;

/// Color adjustment pipeline.
///
/// ```text
/// original u8 -> f32 -> White Balance -> Luminance -> Channel Gain -> floor/clamp -> u8
/// ```
///
/// Each module scales channels of an f32 working buffer in the 0..=255
/// domain; the result is quantized once at the end (floor, clamp). The
/// pipeline is always fed the untouched original buffer, so repeated
/// applications with different parameters are independent, never
/// cumulative. Output is RGB regardless of source alpha.
pub struct Pipeline {
    modules: Vec<Box<dyn ProcessingModule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            modules: vec![
                Box::new(modules::WhiteBalance),
                Box::new(modules::Luminance),
                Box::new(modules::ChannelGain),
            ],
        }
    }

    /// Run the full adjustment chain on a source image.
    pub fn process(&self, source: &PixelBuf, params: &AdjustParams) -> Result<PixelBuf> {
        let mut current = WorkingBuf::from_pixel_buf(source);
        for module in &self.modules {
            debug!(module = module.name(), "processing");
            current = module.process(current, params)?;
        }
        Ok(current.quantize())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
