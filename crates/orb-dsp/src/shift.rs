//! Fractional time shift with cyclic wraparound
//!
//! Shifts every channel of a signal by a (possibly fractional) number of
//! samples by applying a linear phase ramp in the frequency domain. The
//! shift is cyclic: energy pushed past the right edge reappears at the left
//! edge, consistent with inverse-FFT periodicity. This is the primitive that
//! renders an inverse-FFT impulse response causal by rotating it to the
//! middle of its window.

use std::f64::consts::TAU;

use orb_core::Signal;
use rustfft::num_complex::Complex;

use crate::error::DspResult;
use crate::fft;

/// Shift all channels of `signal` by `shift_samples` with cyclic wraparound
///
/// Positive shifts delay the signal. Fractional shifts are exact in the
/// band-limited sense (sinc interpolation through the phase ramp).
pub fn fractional_time_shift(signal: &Signal, shift_samples: f64) -> DspResult<Signal> {
    let n_samples = signal.n_samples();
    let mut spectra = fft::rfft(signal.data())?;

    for mut row in spectra.rows_mut() {
        for (bin, value) in row.iter_mut().enumerate() {
            let phase = -TAU * bin as f64 * shift_samples / n_samples as f64;
            *value *= Complex::from_polar(1.0, phase);
        }
    }

    let data = fft::irfft(spectra.view(), n_samples)?;
    Ok(Signal::new(data, signal.sample_rate())?)
}
