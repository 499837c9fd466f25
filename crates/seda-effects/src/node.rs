//! One delay line of the feedback network.
//!
//! A [`DelayNode`] couples a crossfading delay buffer with a one-pole
//! lowpass whose coefficients are rederived every block from the target
//! decay rate, the quantized delay length, and the brightness control. The
//! single recurrence
//!
//! ```text
//! y[n] = b0 * x[n] + a1 * y[n-1]
//! ```
//!
//! realizes both the per-line exponential energy decay (the
//! `exp(beta * prime)` factor in `b0`, derived from the RT60 target) and
//! the high-frequency damping (`a1`, derived from the cutoff control).

use libm::expf;
use seda_core::{CrossfadeRingBuffer, PrimeTable, flush_denormal};

/// 1/sqrt(8): normalizes the eight-path feedback matrix so total loop gain
/// stays at or below unity (Jot's criterion for a bounded network).
pub(crate) const FRAC_1_SQRT_8: f32 = 0.353_553_39;

/// A single feedback delay line with per-block lowpass reconfiguration.
#[derive(Debug, Clone)]
pub struct DelayNode {
    buffer: CrossfadeRingBuffer,
    delay_samples: usize,
    b0: f32,
    a1: f32,
    y1: f32,
}

impl DelayNode {
    /// Creates a node with a delay buffer of `buffer_len` samples.
    pub fn new(buffer_len: usize) -> Self {
        Self {
            buffer: CrossfadeRingBuffer::new(buffer_len),
            delay_samples: 0,
            b0: -FRAC_1_SQRT_8,
            a1: 0.0,
            y1: 0.0,
        }
    }

    /// Rederives the delay length and filter coefficients for this block.
    ///
    /// The requested length snaps to the nearest prime at or below it.
    /// `cutoff_coef` arrives pre-divided by the room-size prime, which is
    /// what keeps `|a1| < 1` for every node: the derivation, not a clamp,
    /// is the stability guarantee.
    pub fn configure(
        &mut self,
        beta: f32,
        delay_samples: f32,
        cutoff_coef: f32,
        block_size: usize,
        primes: &PrimeTable,
    ) {
        let prime = primes.nearest_at_or_below(delay_samples as usize);
        // The tap circulates through the network with one block of latency,
        // repaid here so the loop measures exactly `prime` samples
        // end-to-end.
        self.delay_samples = prime - block_size;
        let prime = prime as f32;
        self.a1 = prime * cutoff_coef;
        self.b0 = FRAC_1_SQRT_8 * expf(beta * prime) * (self.a1 - 1.0);
    }

    /// Appends one feedback sample. This is the network's re-injection
    /// point.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer.write(sample);
    }

    /// Crossfade-reads one block at the configured length, then filters it
    /// in place.
    pub fn process_into(&mut self, out: &mut [f32]) {
        self.buffer.crossfade_read(self.delay_samples, out);
        for sample in out.iter_mut() {
            self.y1 = flush_denormal(self.b0 * *sample + self.a1 * self.y1);
            *sample = self.y1;
        }
    }

    /// Clears the delay buffer and filter state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.y1 = 0.0;
    }

    #[cfg(test)]
    pub(crate) fn coefficients(&self) -> (f32, f32) {
        (self.b0, self.a1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const BLOCK: usize = 16;

    fn engine_style_cutoff(primes: &PrimeTable, room: f32, brightness: f32) -> f32 {
        expf(-core::f32::consts::TAU * brightness) / primes.nearest_at_or_below(room as usize) as f32
    }

    #[test]
    fn feedback_coefficient_stays_stable() {
        let primes = PrimeTable::new(7600);
        let mut node = DelayNode::new(8192);
        // worst case: minimum damping, node length equal to the room size
        let room = 7552.0;
        let cutoff = engine_style_cutoff(&primes, room, 0.1134);
        node.configure(-6.9078 / (0.8 * 48000.0), room, cutoff, BLOCK, &primes);
        let (_, a1) = node.coefficients();
        assert!(a1.abs() < 1.0, "a1 must stay below unity, got {a1}");
        assert!(a1 > 0.0);
    }

    #[test]
    fn shorter_lines_damp_less() {
        // a1 scales with each line's own prime, so shorter lines keep more
        // brightness relative to the longest line
        let primes = PrimeTable::new(7600);
        let cutoff = engine_style_cutoff(&primes, 4000.0, 0.25);
        let beta = -6.9078 / (4.0 * 48000.0);

        let mut long = DelayNode::new(8192);
        let mut short = DelayNode::new(8192);
        long.configure(beta, 4000.0, cutoff, BLOCK, &primes);
        short.configure(beta, 4000.0 / 1.5, cutoff, BLOCK, &primes);
        assert!(short.coefficients().1 < long.coefficients().1);
    }

    #[test]
    fn impulse_emerges_after_prime_minus_block() {
        let primes = PrimeTable::new(7600);
        let mut node = DelayNode::new(8192);
        // room 192 quantizes to prime 191
        node.configure(-1e-5, 192.0, 1e-5, BLOCK, &primes);
        let (b0, _) = node.coefficients();

        let mut out = vec![0.0f32; BLOCK];
        // warm-up block settles the crossfade offset at its configured value
        for _ in 0..BLOCK {
            node.write(0.0);
        }
        node.process_into(&mut out);

        let mut first_nonzero = None;
        for block in 0..32 {
            for i in 0..BLOCK {
                node.write(if block == 0 && i == 0 { 1.0 } else { 0.0 });
            }
            node.process_into(&mut out);
            if first_nonzero.is_none()
                && let Some(pos) = out.iter().position(|s| s.abs() > 1e-9)
            {
                first_nonzero = Some(block * BLOCK + pos);
                assert!((out[pos] - b0).abs() < 1e-6);
            }
        }
        // the impulse was written at absolute sample 0; with the read
        // offset at prime - BLOCK it surfaces when 191 samples separate
        // the write cursor from the tap
        let expected = 191 + 1 - BLOCK;
        assert_eq!(first_nonzero, Some(expected));
    }

    #[test]
    fn reset_silences_the_node() {
        let primes = PrimeTable::new(7600);
        let mut node = DelayNode::new(8192);
        node.configure(-1e-4, 500.0, 1e-4, BLOCK, &primes);
        for _ in 0..64 {
            node.write(0.5);
        }
        node.reset();
        let mut out = [1.0f32; BLOCK];
        node.process_into(&mut out);
        assert!(out.iter().all(|s| s.abs() < 1e-12));
    }
}
