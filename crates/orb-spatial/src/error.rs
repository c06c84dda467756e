//! Error types for spherical array processing

use orb_core::CoreError;
use orb_dsp::DspError;
use thiserror::Error;

/// Spherical array processing error types
#[derive(Error, Debug)]
pub enum SpatialError {
    /// Hankel function kind must be 1 or 2
    #[error("Invalid Hankel kind: {0} (must be 1 or 2, for first or second kind)")]
    InvalidHankelKind(u8),

    /// Unknown regularization strategy
    #[error("Invalid regularization type: {0} (choose 'soft', 'hard' or 'tikhonov')")]
    InvalidRegularization(String),

    /// Array radius must be a finite positive value
    #[error("Invalid array radius: {0} m (must be finite and greater than zero)")]
    InvalidRadius(f64),

    /// Gain limit must be finite
    #[error("Invalid gain limit: {0} dB (must be a finite value)")]
    InvalidLimit(f64),

    /// Filter design needs at least the DC and one more bin
    #[error("Frequency grid too short: got {0} bins, need at least 2")]
    FrequencyGridTooShort(usize),

    /// DSP primitive failed
    #[error(transparent)]
    Dsp(#[from] DspError),

    /// Container construction failed
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for spherical array operations
pub type SpatialResult<T> = Result<T, SpatialError>;
