//! Multichannel time-domain signal container
//!
//! `Signal` is the container handed between all pipeline stages: a fixed
//! `channels x samples` matrix of f64 samples plus the sample rate it was
//! recorded or designed at. Shapes are validated at construction; after that
//! every stage treats the value as immutable and produces a fresh one.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{CoreError, CoreResult};
use crate::Sample;

/// Immutable multichannel time-domain signal
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Sample data, `channels x samples`, row-major
    data: Array2<Sample>,
    /// Sample rate in Hz
    sample_rate: f64,
}

impl Signal {
    /// Create a signal from a `channels x samples` matrix
    pub fn new(data: Array2<Sample>, sample_rate: f64) -> CoreResult<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(CoreError::InvalidSampleRate(sample_rate));
        }
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(CoreError::EmptySignal);
        }
        Ok(Self { data, sample_rate })
    }

    /// Create a signal from per-channel sample vectors
    ///
    /// All channels must carry the same number of samples.
    pub fn from_channels(channels: Vec<Vec<Sample>>, sample_rate: f64) -> CoreResult<Self> {
        let n_channels = channels.len();
        let n_samples = channels.first().map(Vec::len).unwrap_or(0);
        if n_channels == 0 || n_samples == 0 {
            return Err(CoreError::EmptySignal);
        }

        let mut data = Array2::zeros((n_channels, n_samples));
        for (ch, samples) in channels.iter().enumerate() {
            if samples.len() != n_samples {
                return Err(CoreError::ChannelLengthMismatch {
                    expected: n_samples,
                    got: samples.len(),
                });
            }
            for (i, &s) in samples.iter().enumerate() {
                data[[ch, i]] = s;
            }
        }

        Self::new(data, sample_rate)
    }

    /// Number of channels
    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples per channel
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.n_samples() as f64 / self.sample_rate
    }

    /// Full sample matrix, `channels x samples`
    pub fn data(&self) -> ArrayView2<'_, Sample> {
        self.data.view()
    }

    /// One channel's samples
    ///
    /// Panics if `channel` is out of range, like any matrix row access.
    pub fn channel(&self, channel: usize) -> ArrayView1<'_, Sample> {
        self.data.row(channel)
    }

    /// Consume the signal, returning the raw sample matrix
    pub fn into_data(self) -> Array2<Sample> {
        self.data
    }
}
