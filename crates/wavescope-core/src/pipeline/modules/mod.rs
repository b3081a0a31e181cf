mod channel_gain;
mod luminance;
mod white_balance;

pub use channel_gain::ChannelGain;
pub use luminance::Luminance;
pub use white_balance::WhiteBalance;
