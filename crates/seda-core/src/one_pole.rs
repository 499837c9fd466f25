//! One-pole lowpass filter.
//!
//! The simplest IIR lowpass, 6 dB/octave:
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//! ```
//!
//! with `coeff = exp(-2π * freq / sample_rate)`. Used for high-frequency
//! rolloff on delay feedback paths and tone shaping.

use crate::math::flush_denormal;
use libm::expf;

/// One-pole (6 dB/oct) lowpass.
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl OnePole {
    /// Creates a lowpass with the given cutoff.
    ///
    /// `freq_hz` should lie in `(0, sample_rate / 2)`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
        };
        filter.recalculate();
        filter
    }

    /// Sets the cutoff frequency.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate();
    }

    /// Updates the sample rate, keeping the cutoff frequency.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Clears the filter state.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    fn recalculate(&mut self) {
        self.coeff = expf(-core::f32::consts::TAU * self.freq / self.sample_rate);
    }
}
