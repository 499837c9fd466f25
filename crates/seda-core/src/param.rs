//! Smoothed parameters for zipper-free control changes.
//!
//! A one-pole lowpass on the control value:
//!
//! ```text
//! y[n] = y[n-1] + coeff * (target - y[n-1])
//! ```
//!
//! Block-based engines read controls once per block, so alongside the
//! per-sample [`advance`](SmoothedParam::advance) there is a closed-form
//! [`advance_block`](SmoothedParam::advance_block) that applies `n` steps of
//! the recurrence in one multiply.

use libm::{expf, powf};

/// Control value with built-in exponential smoothing.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Creates a smoothed parameter.
    ///
    /// `smoothing_time_ms` is the one-pole time constant; 0 disables
    /// smoothing entirely.
    pub fn new(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate,
            smoothing_time_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Sets the value the parameter smooths towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Sets the value and snaps to it immediately.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Advances one sample and returns the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Advances `n` samples at once and returns the smoothed value.
    ///
    /// Applies the per-sample recurrence `n` times in closed form: after
    /// `n` steps the remaining distance to the target shrinks by
    /// `(1 - coeff)^n`.
    #[inline]
    pub fn advance_block(&mut self, n: usize) -> f32 {
        let remaining = powf(1.0 - self.coeff, n as f32);
        self.current = self.target - (self.target - self.current) * remaining;
        self.current
    }

    /// Current smoothed value, without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jumps the smoothed value to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Updates the sample rate, keeping the smoothing time.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    // coeff = 1 - exp(-1 / (tau * fs)): one time constant reaches 63.2% of
    // the target, five reach 99.3%.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples_per_tau = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples_per_tau);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_to_target() {
        let mut param = SmoothedParam::new(0.0, 48000.0, 10.0);
        param.set_target(1.0);
        for _ in 0..48000 {
            param.advance();
        }
        assert!((param.get() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn zero_smoothing_is_instant() {
        let mut param = SmoothedParam::new(0.0, 48000.0, 0.0);
        param.set_target(0.7);
        assert_eq!(param.advance(), 0.7);
    }

    #[test]
    fn block_advance_matches_sample_advance() {
        let mut per_sample = SmoothedParam::new(0.0, 48000.0, 20.0);
        let mut per_block = per_sample.clone();
        per_sample.set_target(5.0);
        per_block.set_target(5.0);

        for _ in 0..64 {
            per_sample.advance();
        }
        per_block.advance_block(64);

        assert!(
            (per_sample.get() - per_block.get()).abs() < 1e-4,
            "per-sample {} vs closed form {}",
            per_sample.get(),
            per_block.get()
        );
    }

    #[test]
    fn snap_to_target() {
        let mut param = SmoothedParam::new(0.0, 48000.0, 50.0);
        param.set_target(2.0);
        param.snap_to_target();
        assert_eq!(param.get(), 2.0);
    }
}
