//! EMA soundfield decoder - array signals to ambisonic signals
//!
//! Turns raw equatorial-array recordings into spherical-harmonic domain
//! signals in three passes:
//! 1. circular-harmonic projection of the ring channels (azimuthal Fourier
//!    sums over the microphone positions)
//! 2. radial filtering: each circular mode convolved with its designed FIR
//!    filter, trimmed back to the input length
//! 3. expansion of the filtered modes onto the full spherical-harmonic
//!    channel set, ACN-ordered
//!
//! The decoder trusts its caller on geometry: the microphone azimuths must
//! describe the channels of the signal it is handed, and the filter bank
//! must have been designed for the same order. Neither is validated here;
//! a mismatch yields garbage output, not an error.

use std::f64::consts::FRAC_PI_2;

use ndarray::Array2;
use rayon::prelude::*;

use orb_core::{Sample, Signal};
use orb_dsp::convolution;

use crate::error::SpatialResult;
use crate::sh;

/// ACN channel index for order `n` and degree `m`
pub fn acn_index(order: usize, degree: i32) -> usize {
    let n = order as i32;
    (n * n + n + degree) as usize
}

/// Order and degree for an ACN channel index
pub fn acn_to_order_degree(acn: usize) -> (usize, i32) {
    let order = (acn as f64).sqrt().floor() as usize;
    let degree = acn as i32 - (order * order + order) as i32;
    (order, degree)
}

/// Decoder from equatorial-array recordings to ambisonic signals
#[derive(Debug, Clone)]
pub struct SoundfieldDecoder {
    /// Maximum spherical-harmonic order
    order: usize,
    /// Microphone azimuths in radians, one per array channel
    azimuths: Vec<f64>,
}

impl SoundfieldDecoder {
    /// New decoder for the given order and ring geometry
    pub fn new(order: usize, azimuths: Vec<f64>) -> Self {
        Self { order, azimuths }
    }

    /// Maximum spherical-harmonic order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of circular modes, `2N + 1`
    pub fn circular_modes(&self) -> usize {
        2 * self.order + 1
    }

    /// Number of ambisonic output channels, `(N + 1)^2`
    pub fn output_channels(&self) -> usize {
        (self.order + 1) * (self.order + 1)
    }

    /// Decode array signals into ambisonic signals
    ///
    /// `radial_filters` is the bank produced by the filter designer for the
    /// same order and geometry. The output carries `(N + 1)^2` channels of
    /// the input's length and sample rate.
    pub fn decode(&self, signals: &Signal, radial_filters: &Signal) -> SpatialResult<Signal> {
        let circular = self.project_circular_harmonics(signals);
        let filtered = apply_radial_filters(&circular, radial_filters, signals.n_samples());
        let ambisonic = self.expand_to_spherical_harmonics(&filtered);
        Ok(Signal::new(ambisonic, signals.sample_rate())?)
    }

    /// Circular-harmonic surface decomposition of the ring channels
    ///
    /// Degree `m < 0` projects onto `sqrt(2) * sin(|m| * alpha)`, `m = 0`
    /// onto the constant, `m > 0` onto `sqrt(2) * cos(m * alpha)`, each
    /// averaged over the microphones.
    fn project_circular_harmonics(&self, signals: &Signal) -> Array2<Sample> {
        let order = self.order as i32;
        let n_mics = signals.n_channels();
        let scale = 1.0 / n_mics as f64;

        let mut weights = Array2::<Sample>::zeros((self.circular_modes(), n_mics));
        for m in -order..=order {
            let row = (m + order) as usize;
            for (mic, &alpha) in self.azimuths.iter().take(n_mics).enumerate() {
                let basis = match m.cmp(&0) {
                    std::cmp::Ordering::Less => {
                        std::f64::consts::SQRT_2 * (m.unsigned_abs() as f64 * alpha).sin()
                    }
                    std::cmp::Ordering::Equal => 1.0,
                    std::cmp::Ordering::Greater => {
                        std::f64::consts::SQRT_2 * (m as f64 * alpha).cos()
                    }
                };
                weights[[row, mic]] = scale * basis;
            }
        }

        weights.dot(&signals.data())
    }

    /// Expand filtered circular modes onto the ACN spherical-harmonic set
    ///
    /// Channel `n^2 + n + m` is the circular mode `m` scaled by
    /// `(-1)^m * Y_n^{|m|}(pi/2, 0)`; the sign factor is the
    /// Condon-Shortley correction for evaluating the harmonic at the
    /// unsigned degree.
    fn expand_to_spherical_harmonics(&self, modes: &Array2<Sample>) -> Array2<Sample> {
        let n_samples = modes.ncols();
        let mut output = Array2::<Sample>::zeros((self.output_channels(), n_samples));

        for n in 0..=self.order {
            for m in -(n as i32)..=(n as i32) {
                let equator = sh::sph_harm(m.abs(), n, 0.0, FRAC_PI_2).re;
                let parity = if m % 2 == 0 { 1.0 } else { -1.0 };
                let gain = parity * equator;

                let src = (m + self.order as i32) as usize;
                let dst = acn_index(n, m);
                for sample in 0..n_samples {
                    output[[dst, sample]] = gain * modes[[src, sample]];
                }
            }
        }
        output
    }
}

/// Convolve each circular mode with its radial filter, keeping the leading
/// `n_samples` of the full convolution so output length matches input
/// length regardless of filter length
fn apply_radial_filters(
    modes: &Array2<Sample>,
    radial_filters: &Signal,
    n_samples: usize,
) -> Array2<Sample> {
    let rows: Vec<Vec<Sample>> = (0..modes.nrows())
        .into_par_iter()
        .map(|mode| {
            let input = modes.row(mode).to_vec();
            let filter = radial_filters.channel(mode).to_vec();
            let mut full = convolution::convolve_full(&input, &filter);
            full.truncate(n_samples);
            full
        })
        .collect();

    let mut filtered = Array2::<Sample>::zeros((modes.nrows(), n_samples));
    for (mode, row) in rows.into_iter().enumerate() {
        for (sample, value) in row.into_iter().enumerate() {
            filtered[[mode, sample]] = value;
        }
    }
    filtered
}
