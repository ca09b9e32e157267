/// Error types for metric sampling and the display transport

use thiserror::Error;

/// Failures reading a single metric
///
/// None of these abort a refresh; the sampler logs them and keeps the previous value.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("temperature sensor unavailable at {path}: {reason}")]
    SensorUnavailable { path: String, reason: String },

    #[error("no address found for interface {0}")]
    InterfaceNotFound(String),

    #[error("failed to read CPU counters: {0}")]
    CpuCounters(String),
}

/// Failures talking to the physical display
///
/// These are fatal for the render loop.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to open I2C bus {path}: {reason}")]
    Bus { path: String, reason: String },

    #[error("display initialization failed: {0}")]
    Init(String),

    #[error("display transport error: {0}")]
    Transport(String),

    #[error("unsupported display size {width}x{height}")]
    UnsupportedSize { width: u32, height: u32 },
}
