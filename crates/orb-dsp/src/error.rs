//! Error types for DSP primitives

use orb_core::CoreError;
use thiserror::Error;

/// DSP primitive error types
#[derive(Error, Debug)]
pub enum DspError {
    /// Half-spectrum bin count does not match the requested output length
    #[error("Spectrum length mismatch: {n_samples} samples require {expected} bins, got {got}")]
    SpectrumLengthMismatch {
        expected: usize,
        got: usize,
        n_samples: usize,
    },

    /// FFT backend reported a processing failure
    #[error("FFT processing failed: {0}")]
    Fft(String),

    /// Container construction failed
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;
