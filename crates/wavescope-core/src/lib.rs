pub mod io;
pub mod overlay;
pub mod pipeline;
pub mod pixel_buf;
pub mod waveform;
