pub mod app;
pub mod cache;
pub mod error;
pub mod probes;
pub mod redis;
pub mod telemetry;

#[cfg(feature = "axum")]
pub mod api;

#[cfg(feature = "axum")]
pub mod prometheus;

#[cfg(test)]
mod tests;
