pub mod config;
pub mod progress;
pub mod snapshot;
pub mod stats;
pub mod streak;
pub mod validate;
