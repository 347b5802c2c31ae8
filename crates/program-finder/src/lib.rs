pub mod config;
pub mod error;
pub mod requirements;
pub mod search;
pub mod telemetry;
