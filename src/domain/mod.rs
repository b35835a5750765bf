// Domain layer - Panel payloads, snapshots and pure derived views
pub mod apod;
pub mod asteroid;
pub mod error;
pub mod iss;
pub mod mars_weather;
pub mod panel;
pub mod snapshot;
pub mod telemetry;
pub mod units;
