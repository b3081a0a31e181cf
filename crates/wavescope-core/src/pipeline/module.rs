use anyhow::Result;

use crate::pixel_buf::{AdjustParams, WorkingBuf};

/// A single step in the color adjustment pipeline.
pub trait ProcessingModule: Send + Sync {
    fn name(&self) -> &str;
    fn process(&self, input: WorkingBuf, params: &AdjustParams) -> Result<WorkingBuf>;
}
