//! EMA radial filter design
//!
//! Designs the per-mode inverse filters that undo the rigid sphere's
//! scattering response so equatorial-array recordings can be encoded to
//! spherical harmonics. The chain per design call:
//! 1. modal scattering coefficients from the spherical Hankel derivative
//! 2. per-degree forward response via equator spherical-harmonic weights
//! 3. regularized inversion (soft / hard / Tikhonov)
//! 4. inverse real FFT and half-length cyclic rotation to a causal FIR bank
//!
//! Every step is a deterministic single pass; the result depends only on
//! the frequency grid and the configuration.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use orb_core::Signal;
use orb_dsp::{fft, shift};

use crate::error::{SpatialError, SpatialResult};
use crate::hankel::{self, HankelKind};
use crate::regularization::{self, RegularizationKind};
use crate::sh;

/// Speed of sound used by default, in m/s
pub const DEFAULT_SPEED_OF_SOUND: f64 = 343.0;

/// Default design sample rate, in Hz
pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

/// Nudge added to every kR argument, keeping the DC bin (and other exact
/// roots) off the Hankel-derivative singularities
const KR_NUDGE: f64 = 5.0 * f64::EPSILON;

/// Configuration of one radial filter design call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadialFilterConfig {
    /// Array radius in meters
    pub radius: f64,
    /// Maximum spherical-harmonic order resolved by the array
    pub order: usize,
    /// Gain limit in dB handed to the regularization stage
    pub limit_db: f64,
    /// Regularization strategy
    pub regularization: RegularizationKind,
    /// Hankel function kind (second kind for the usual incoming convention)
    pub hankel_kind: HankelKind,
    /// Sample rate the FIR bank is designed for, in Hz
    pub sample_rate: f64,
    /// Speed of sound in m/s
    pub speed_of_sound: f64,
}

impl RadialFilterConfig {
    /// New configuration with the conventional defaults: second-kind Hankel
    /// functions, 48 kHz, 343 m/s
    pub fn new(
        radius: f64,
        order: usize,
        limit_db: f64,
        regularization: RegularizationKind,
    ) -> Self {
        Self {
            radius,
            order,
            limit_db,
            regularization,
            hankel_kind: HankelKind::Second,
            sample_rate: DEFAULT_SAMPLE_RATE,
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
        }
    }

    /// Override the Hankel function kind
    pub fn with_hankel_kind(mut self, kind: HankelKind) -> Self {
        self.hankel_kind = kind;
        self
    }

    /// Override the design sample rate
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Override the speed of sound
    pub fn with_speed_of_sound(mut self, speed_of_sound: f64) -> Self {
        self.speed_of_sound = speed_of_sound;
        self
    }

    /// Validate before any numeric work; violations are fatal to the call
    fn validate(&self, n_bins: usize) -> SpatialResult<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SpatialError::InvalidRadius(self.radius));
        }
        if !self.limit_db.is_finite() {
            return Err(SpatialError::InvalidLimit(self.limit_db));
        }
        if n_bins < 2 {
            return Err(SpatialError::FrequencyGridTooShort(n_bins));
        }
        Ok(())
    }
}

/// Design the causal time-domain radial filter bank for an EMA
///
/// `frequencies` is the ascending grid the filters are designed on,
/// typically `rfft_frequencies(filter_length, sample_rate)`. The returned
/// signal has `2 * order + 1` channels (circular degrees `-N..=N`) and
/// `2 * (frequencies.len() - 1)` samples per channel, tagged with the
/// configured sample rate.
pub fn design_radial_filters(
    frequencies: &[f64],
    config: &RadialFilterConfig,
) -> SpatialResult<Signal> {
    config.validate(frequencies.len())?;

    let order = config.order;
    let n_bins = frequencies.len();
    let n_modes = 2 * order + 1;

    // Dimensionless scattering argument kR, nudged off exact zeros
    let kr: Vec<f64> = frequencies
        .iter()
        .map(|&f| TAU * f / config.speed_of_sound * config.radius + KR_NUDGE)
        .collect();

    // Modal scattering coefficients b_n = -4*pi*i^n * (i/(kR)^2) / h_n'(kR)
    let mut modal = Array2::<Complex<f64>>::zeros((order + 1, n_bins));
    for n in 0..=order {
        let h_prime = hankel::spherical_hankel_derivative(n, config.hankel_kind, &kr);
        let i_pow_n = Complex::i().powu(n as u32);
        for (bin, (&kr_bin, hp)) in kr.iter().zip(h_prime.iter()).enumerate() {
            modal[[n, bin]] = -4.0 * PI * i_pow_n * (Complex::i() / (kr_bin * kr_bin)) / *hp;
        }
    }
    let patched = patch_nan_bins(&mut modal);
    if patched > 0 {
        log::debug!("patched {patched} NaN bins in the modal coefficients");
    }

    // Per-degree forward response: sum b_{n'} * Y_{n'}^m(equator)^2 over
    // the orders n' >= |m| that contribute to circular degree m
    let mut mode_response = Array2::<Complex<f64>>::zeros((n_modes, n_bins));
    for m in -(order as i32)..=(order as i32) {
        let row = (m + order as i32) as usize;
        for n_prime in (m.unsigned_abs() as usize)..=order {
            let y = sh::sph_harm(m, n_prime, 0.0, FRAC_PI_2);
            let weight = y * y;
            for bin in 0..n_bins {
                let contribution = modal[[n_prime, bin]] * weight;
                mode_response[[row, bin]] += contribution;
            }
        }
    }

    // Regularized inversion; Tikhonov inverts the forward response itself
    let mut inverse = match config.regularization {
        RegularizationKind::Tikhonov => {
            regularization::tikhonov_inverse(&mode_response, config.limit_db)
        }
        kind => {
            let mut inverted = mode_response.mapv(|x| x.inv());
            match kind {
                RegularizationKind::Soft => {
                    regularization::soft_limit(&mut inverted, config.limit_db)
                }
                _ => regularization::hard_limit(&mut inverted, config.limit_db),
            }
            inverted
        }
    };
    let patched = patch_nan_bins(&mut inverse);
    if patched > 0 {
        log::debug!("patched {patched} NaN bins after inversion");
    }

    // Causal FIR synthesis: back to the time domain, then rotate the
    // symmetric impulse response by half the filter length
    let n_samples = 2 * (n_bins - 1);
    let impulse_responses = fft::irfft(inverse.view(), n_samples)?;
    let bank = Signal::new(impulse_responses, config.sample_rate)?;
    Ok(shift::fractional_time_shift(&bank, n_samples as f64 / 2.0)?)
}

/// Replace NaN bins by the magnitude of the circularly-next bin
///
/// Singularities of the scattering response (typically the DC bin, where
/// kR collapses to the nudge) surface as NaN. Each NaN bin takes the
/// magnitude of the bin one step up the frequency axis, wrapping at the top
/// of the grid; neighbor values are read from the pre-patch data, so
/// consecutive NaN bins are not healed from each other. A heuristic, not a
/// physical derivation, but it matches the established design practice for
/// these filters. Returns the number of patched bins.
fn patch_nan_bins(data: &mut Array2<Complex<f64>>) -> usize {
    let n_bins = data.ncols();
    let snapshot = data.clone();
    let mut patched = 0;

    for row in 0..data.nrows() {
        for bin in 0..n_bins {
            if !data[[row, bin]].is_nan() {
                continue;
            }
            let neighbor = snapshot[[row, (bin + 1) % n_bins]];
            data[[row, bin]] = Complex::new(neighbor.norm(), 0.0);
            patched += 1;
        }
    }
    patched
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use orb_dsp::rfft_frequencies;

    fn short_grid() -> Vec<f64> {
        rfft_frequencies(256, 48000.0)
    }

    #[test]
    fn test_validation_rejects_bad_radius() {
        let config =
            RadialFilterConfig::new(f64::NAN, 3, 40.0, RegularizationKind::Tikhonov);
        assert!(matches!(
            design_radial_filters(&short_grid(), &config),
            Err(SpatialError::InvalidRadius(_))
        ));

        let config = RadialFilterConfig::new(-0.1, 3, 40.0, RegularizationKind::Tikhonov);
        assert!(matches!(
            design_radial_filters(&short_grid(), &config),
            Err(SpatialError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_limit() {
        let config = RadialFilterConfig::new(
            0.0875,
            3,
            f64::INFINITY,
            RegularizationKind::Tikhonov,
        );
        assert!(matches!(
            design_radial_filters(&short_grid(), &config),
            Err(SpatialError::InvalidLimit(_))
        ));
    }

    #[test]
    fn test_validation_rejects_short_grid() {
        let config = RadialFilterConfig::new(0.0875, 3, 40.0, RegularizationKind::Soft);
        assert!(matches!(
            design_radial_filters(&[0.0], &config),
            Err(SpatialError::FrequencyGridTooShort(1))
        ));
    }

    #[test]
    fn test_validation_happens_before_numeric_work() {
        // A bad radius fails even on a grid that would be expensive
        let frequencies = rfft_frequencies(1 << 20, 48000.0);
        let config =
            RadialFilterConfig::new(f64::INFINITY, 7, 40.0, RegularizationKind::Hard);
        assert!(design_radial_filters(&frequencies, &config).is_err());
    }

    #[test]
    fn test_bank_shape_and_metadata() {
        let config = RadialFilterConfig::new(0.0875, 3, 40.0, RegularizationKind::Tikhonov);
        let bank = design_radial_filters(&short_grid(), &config).unwrap();
        assert_eq!(bank.n_channels(), 7);
        assert_eq!(bank.n_samples(), 256);
        assert_eq!(bank.sample_rate(), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_config_overrides() {
        let config = RadialFilterConfig::new(0.05, 2, 20.0, RegularizationKind::Soft)
            .with_hankel_kind(HankelKind::First)
            .with_sample_rate(44100.0)
            .with_speed_of_sound(340.0);
        assert_eq!(config.hankel_kind, HankelKind::First);
        assert_eq!(config.sample_rate, 44100.0);
        assert_eq!(config.speed_of_sound, 340.0);

        let bank = design_radial_filters(&short_grid(), &config).unwrap();
        assert_eq!(bank.sample_rate(), 44100.0);
    }

    #[test]
    fn test_patch_replaces_nan_with_next_bin_magnitude() {
        let mut data = Array2::from_shape_vec(
            (1, 4),
            vec![
                Complex::new(f64::NAN, 0.0),
                Complex::new(3.0, -4.0),
                Complex::new(1.0, 0.0),
                Complex::new(0.5, 0.0),
            ],
        )
        .unwrap();

        let patched = patch_nan_bins(&mut data);
        assert_eq!(patched, 1);
        // |3 - 4i| = 5, taken as a real value
        assert_abs_diff_eq!(data[[0, 0]].re, 5.0, epsilon = 1e-15);
        assert_abs_diff_eq!(data[[0, 0]].im, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_patch_wraps_at_grid_top() {
        let mut data = Array2::from_shape_vec(
            (1, 3),
            vec![
                Complex::new(0.0, 2.0),
                Complex::new(1.0, 0.0),
                Complex::new(f64::NAN, f64::NAN),
            ],
        )
        .unwrap();

        patch_nan_bins(&mut data);
        // The top bin wraps around to the DC bin's magnitude
        assert_abs_diff_eq!(data[[0, 2]].re, 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_patch_reads_pre_patch_values() {
        // Two adjacent NaNs: the first sees the second (still NaN), the
        // second sees the clean bin after it.
        let mut data = Array2::from_shape_vec(
            (1, 3),
            vec![
                Complex::new(f64::NAN, 0.0),
                Complex::new(f64::NAN, 0.0),
                Complex::new(2.0, 0.0),
            ],
        )
        .unwrap();

        patch_nan_bins(&mut data);
        assert!(data[[0, 0]].re.is_nan());
        assert_abs_diff_eq!(data[[0, 1]].re, 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_patch_ignores_finite_and_infinite_bins() {
        // Only NaN is patched; an overflowed-but-not-NaN bin passes through
        // untouched.
        let mut data = Array2::from_shape_vec(
            (1, 2),
            vec![Complex::new(f64::INFINITY, 0.0), Complex::new(1.0, 1.0)],
        )
        .unwrap();

        assert_eq!(patch_nan_bins(&mut data), 0);
        assert!(data[[0, 0]].re.is_infinite());
        assert_eq!(data[[0, 1]], Complex::new(1.0, 1.0));
    }
}
