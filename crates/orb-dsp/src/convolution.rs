//! Full-length linear convolution
//!
//! Offline convolution used to apply a designed FIR filter to a recorded
//! channel. Always returns the full result of length `a + b - 1`; callers
//! pick the trimming convention that suits them. Short sequences are
//! convolved directly, longer ones through zero-padded real FFTs.

use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

/// Below this length the direct O(a*b) evaluation wins over FFT setup
const DIRECT_CONVOLUTION_THRESHOLD: usize = 32;

/// Full linear convolution of two sequences
///
/// Output length is `a.len() + b.len() - 1`; an empty input yields an empty
/// output.
pub fn convolve_full(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    if a.len().min(b.len()) <= DIRECT_CONVOLUTION_THRESHOLD {
        convolve_direct(a, b)
    } else {
        convolve_fft(a, b)
    }
}

fn convolve_direct(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

fn convolve_fft(a: &[f64], b: &[f64]) -> Vec<f64> {
    let out_len = a.len() + b.len() - 1;
    let fft_size = out_len.next_power_of_two();
    let n_bins = fft_size / 2 + 1;

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let ifft = planner.plan_fft_inverse(fft_size);

    let mut a_padded = vec![0.0; fft_size];
    a_padded[..a.len()].copy_from_slice(a);
    let mut a_spectrum = vec![Complex::new(0.0, 0.0); n_bins];
    fft.process(&mut a_padded, &mut a_spectrum).ok();

    let mut b_padded = vec![0.0; fft_size];
    b_padded[..b.len()].copy_from_slice(b);
    let mut b_spectrum = vec![Complex::new(0.0, 0.0); n_bins];
    fft.process(&mut b_padded, &mut b_spectrum).ok();

    // Multiply spectra in place, then transform back
    for (x, &y) in a_spectrum.iter_mut().zip(&b_spectrum) {
        *x *= y;
    }
    a_spectrum[0].im = 0.0;
    a_spectrum[n_bins - 1].im = 0.0;

    let mut result = vec![0.0; fft_size];
    ifft.process(&mut a_spectrum, &mut result).ok();

    let norm = 1.0 / fft_size as f64;
    result.truncate(out_len);
    for sample in &mut result {
        *sample *= norm;
    }
    result
}
