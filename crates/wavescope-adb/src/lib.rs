pub mod bridge;
pub mod listing;
