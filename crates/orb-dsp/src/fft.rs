//! Real FFT helpers on multichannel matrices
//!
//! Thin wrappers around `realfft` that transform every channel (row) of a
//! `channels x samples` matrix at once. Conventions match the usual
//! scientific ones: the forward transform is unscaled and returns the
//! half-spectrum (`samples / 2 + 1` bins), the inverse transform scales by
//! `1 / samples`.

use ndarray::{Array2, ArrayView2};
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

use crate::error::{DspError, DspResult};

/// Forward real FFT of every channel
///
/// Input is `channels x samples`; output is `channels x (samples / 2 + 1)`
/// complex half-spectra, unscaled.
pub fn rfft(data: ArrayView2<'_, f64>) -> DspResult<Array2<Complex<f64>>> {
    let n_samples = data.ncols();
    let n_bins = n_samples / 2 + 1;

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_samples);

    let mut spectra = Array2::zeros((data.nrows(), n_bins));
    let mut time_scratch = vec![0.0; n_samples];
    let mut bin_scratch = vec![Complex::new(0.0, 0.0); n_bins];

    for (ch, row) in data.rows().into_iter().enumerate() {
        for (dst, &src) in time_scratch.iter_mut().zip(row.iter()) {
            *dst = src;
        }
        fft.process(&mut time_scratch, &mut bin_scratch)
            .map_err(|e| DspError::Fft(e.to_string()))?;
        for (bin, &value) in bin_scratch.iter().enumerate() {
            spectra[[ch, bin]] = value;
        }
    }

    Ok(spectra)
}

/// Inverse real FFT of every channel
///
/// Input is `channels x (n_samples / 2 + 1)` half-spectra; output is
/// `channels x n_samples` real samples, scaled by `1 / n_samples`. The
/// imaginary parts of the DC bin and (for even lengths) the Nyquist bin are
/// discarded, as the Hermitian symmetry of a real signal requires.
pub fn irfft(spectra: ArrayView2<'_, Complex<f64>>, n_samples: usize) -> DspResult<Array2<f64>> {
    let n_bins = n_samples / 2 + 1;
    if spectra.ncols() != n_bins {
        return Err(DspError::SpectrumLengthMismatch {
            expected: n_bins,
            got: spectra.ncols(),
            n_samples,
        });
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(n_samples);

    let mut data = Array2::zeros((spectra.nrows(), n_samples));
    let mut bin_scratch = vec![Complex::new(0.0, 0.0); n_bins];
    let mut time_scratch = vec![0.0; n_samples];
    let scale = 1.0 / n_samples as f64;

    for (ch, row) in spectra.rows().into_iter().enumerate() {
        for (dst, &src) in bin_scratch.iter_mut().zip(row.iter()) {
            *dst = src;
        }
        bin_scratch[0].im = 0.0;
        if n_samples % 2 == 0 {
            bin_scratch[n_bins - 1].im = 0.0;
        }
        ifft.process(&mut bin_scratch, &mut time_scratch)
            .map_err(|e| DspError::Fft(e.to_string()))?;
        for (bin, &value) in time_scratch.iter().enumerate() {
            data[[ch, bin]] = value * scale;
        }
    }

    Ok(data)
}

/// Bin frequencies of a real FFT, in Hz
///
/// Returns `n_samples / 2 + 1` ascending frequencies from DC to Nyquist,
/// the grid a filter of length `n_samples` is designed on.
pub fn rfft_frequencies(n_samples: usize, sample_rate: f64) -> Vec<f64> {
    let step = sample_rate / n_samples as f64;
    (0..=n_samples / 2).map(|k| k as f64 * step).collect()
}
