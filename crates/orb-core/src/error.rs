//! Error types for core containers

use thiserror::Error;

/// Core container error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Sample rate must be finite and positive
    #[error("Invalid sample rate: {0} (must be finite and greater than zero)")]
    InvalidSampleRate(f64),

    /// Zero channels or zero samples
    #[error("Empty signal: channel count and sample count must both be non-zero")]
    EmptySignal,

    /// Ragged channel data
    #[error("Channel length mismatch: expected {expected} samples, got {got}")]
    ChannelLengthMismatch { expected: usize, got: usize },
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
