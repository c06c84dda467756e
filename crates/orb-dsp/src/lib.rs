//! orb-dsp: Offline DSP primitives for the Orbis spherical audio engine
//!
//! Deterministic, single-pass building blocks for filter design and
//! application:
//! - `fft` - per-channel real FFT / inverse real FFT on multichannel matrices
//! - `convolution` - full-length linear convolution (FFT-accelerated)
//! - `shift` - fractional time shift with cyclic wraparound
//!
//! Everything here operates on whole signals at once; there is no streaming
//! state and every function is a pure mapping from inputs to outputs.

pub mod convolution;
pub mod fft;
pub mod shift;

mod error;

pub use convolution::convolve_full;
pub use error::{DspError, DspResult};
pub use fft::{irfft, rfft, rfft_frequencies};
pub use shift::fractional_time_shift;
