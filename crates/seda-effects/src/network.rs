//! Eight delay lines coupled by an orthogonal feedback matrix.
//!
//! The injection matrix is a Walsh-Hadamard sign pattern: every node's
//! input is a distinct +/-1 combination of all eight node outputs, rows are
//! mutually orthogonal, and M * M' = 8 * I exactly. The 1/sqrt(8)
//! normalization that makes the scaled matrix orthonormal lives inside each
//! node's feed-forward gain, so the loop is energy-bounded no matter how
//! many paths are active. Which sign pattern is used only shapes the stereo
//! image; orthogonality is what guarantees stability.

use alloc::vec;
use alloc::vec::Vec;
use seda_core::PrimeTable;

use crate::node::DelayNode;

/// Number of delay lines in the network.
pub const NODE_COUNT: usize = 8;

/// Capacity of each node's delay buffer in samples.
const NODE_BUFFER_LEN: usize = 8192;

/// Ratio between adjacent delay-line lengths: (3/2)^(-1/7). The eight
/// lengths span a 3:2 range from longest to shortest, avoiding harmonically
/// related delay times between lines.
const LENGTH_RATIO: f32 = 0.943_722_06;

/// Injection matrix rows (node inputs) over node outputs.
const FEEDBACK_SIGNS: [[f32; NODE_COUNT]; NODE_COUNT] = [
    [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
];

/// Which pre-delay channel seeds each node's injection row. Alternating
/// sources decorrelate the left and right tails.
const INJECT_LEFT: [bool; NODE_COUNT] = [true, false, false, true, false, true, true, false];

/// The diffuse reverb core: eight [`DelayNode`]s and their coupling.
///
/// Data flows in three per-block phases driven by the engine:
/// [`inject`](Self::inject) writes each node's new input (matrix row over
/// the previous block's outputs plus the pre-delayed dry signal), the
/// engine mixes the previous outputs into the wet signal, and
/// [`advance`](Self::advance) produces the next block of node outputs.
#[derive(Debug, Clone)]
pub struct FeedbackNetwork {
    nodes: [DelayNode; NODE_COUNT],
    outputs: [Vec<f32>; NODE_COUNT],
}

impl FeedbackNetwork {
    /// Creates the network for a fixed block size.
    pub fn new(block_size: usize) -> Self {
        Self {
            nodes: core::array::from_fn(|_| DelayNode::new(NODE_BUFFER_LEN)),
            outputs: core::array::from_fn(|_| vec![0.0; block_size]),
        }
    }

    /// Reconfigures all eight nodes for this block.
    ///
    /// Node 0 requests `room_size_samples`; each subsequent node requests
    /// the previous length times [`LENGTH_RATIO`].
    pub fn configure(
        &mut self,
        beta: f32,
        room_size_samples: f32,
        cutoff_coef: f32,
        primes: &PrimeTable,
    ) {
        let block_size = self.outputs[0].len();
        let mut delay_samples = room_size_samples;
        for node in &mut self.nodes {
            node.configure(beta, delay_samples, cutoff_coef, block_size, primes);
            delay_samples *= LENGTH_RATIO;
        }
    }

    /// Writes one block of inputs into every node.
    ///
    /// Node `n` receives its sign row applied to the previous block's eight
    /// outputs plus the pre-delayed dry sample from its assigned channel.
    pub fn inject(&mut self, pre_left: &[f32], pre_right: &[f32]) {
        debug_assert_eq!(pre_left.len(), self.outputs[0].len());
        let len = pre_left.len();
        for (n, node) in self.nodes.iter_mut().enumerate() {
            let source = if INJECT_LEFT[n] { pre_left } else { pre_right };
            let signs = &FEEDBACK_SIGNS[n];
            for i in 0..len {
                let mut acc = source[i];
                for (sign, output) in signs.iter().zip(self.outputs.iter()) {
                    acc += sign * output[i];
                }
                node.write(acc);
            }
        }
    }

    /// Runs every node's crossfade-read and filter pass, producing the
    /// outputs the next block will mix and re-inject.
    pub fn advance(&mut self) {
        for (node, output) in self.nodes.iter_mut().zip(self.outputs.iter_mut()) {
            node.process_into(output);
        }
    }

    /// Left composite tap: sum of the even-indexed node outputs at `i`.
    #[inline]
    pub fn left_tap(&self, i: usize) -> f32 {
        self.outputs[0][i] + self.outputs[2][i] + self.outputs[4][i] + self.outputs[6][i]
    }

    /// Right composite tap: sum of the odd-indexed node outputs at `i`.
    #[inline]
    pub fn right_tap(&self, i: usize) -> f32 {
        self.outputs[1][i] + self.outputs[3][i] + self.outputs[5][i] + self.outputs[7][i]
    }

    /// Output block of node `n` from the last [`advance`](Self::advance).
    pub fn output(&self, n: usize) -> &[f32] {
        &self.outputs[n]
    }

    /// Clears all node state and the held output blocks.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
        for output in &mut self.outputs {
            output.fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_orthogonal() {
        // M * M' = 8 * I, so the 1/sqrt(8)-scaled matrix is orthonormal
        for (r, row) in FEEDBACK_SIGNS.iter().enumerate() {
            for (c, col) in FEEDBACK_SIGNS.iter().enumerate() {
                let dot: f32 = row.iter().zip(col.iter()).map(|(a, b)| a * b).sum();
                let expected = if r == c { 8.0 } else { 0.0 };
                assert!(
                    (dot - expected).abs() < 1e-6,
                    "rows {r} and {c}: dot {dot}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn scaled_matrix_preserves_energy() {
        let v = [0.3f32, -0.7, 0.1, 0.9, -0.2, 0.5, -0.4, 0.6];
        let scale = crate::node::FRAC_1_SQRT_8;
        let mut mixed = [0.0f32; NODE_COUNT];
        for (out, row) in mixed.iter_mut().zip(FEEDBACK_SIGNS.iter()) {
            *out = scale * row.iter().zip(v.iter()).map(|(s, x)| s * x).sum::<f32>();
        }
        let before: f32 = v.iter().map(|x| x * x).sum();
        let after: f32 = mixed.iter().map(|x| x * x).sum();
        assert!(
            (before - after).abs() < 1e-5,
            "energy {before} became {after}"
        );
    }

    #[test]
    fn rows_are_distinct_combinations() {
        for r in 0..NODE_COUNT {
            for c in (r + 1)..NODE_COUNT {
                assert_ne!(FEEDBACK_SIGNS[r], FEEDBACK_SIGNS[c]);
            }
        }
    }

    #[test]
    fn injection_sources_use_both_channels_equally() {
        let lefts = INJECT_LEFT.iter().filter(|&&l| l).count();
        assert_eq!(lefts, NODE_COUNT / 2);
    }

    #[test]
    fn impulse_circulates_and_stays_finite() {
        let block = 32;
        let primes = PrimeTable::new(7600);
        let mut network = FeedbackNetwork::new(block);
        let beta = -6.9078 / (2.0 * 48000.0);
        let cutoff = libm::expf(-core::f32::consts::TAU * 0.25)
            / primes.nearest_at_or_below(2000) as f32;
        network.configure(beta, 2000.0, cutoff, &primes);

        let mut impulse = vec![0.0f32; block];
        impulse[0] = 1.0;
        let silence = vec![0.0f32; block];

        network.inject(&impulse, &silence);
        network.advance();
        let mut energy_seen = false;
        for _ in 0..400 {
            network.inject(&silence, &silence);
            for i in 0..block {
                let l = network.left_tap(i);
                let r = network.right_tap(i);
                assert!(l.is_finite() && r.is_finite());
                if l.abs() > 1e-6 || r.abs() > 1e-6 {
                    energy_seen = true;
                }
            }
            network.advance();
        }
        assert!(energy_seen, "the tail should carry energy");
    }
}
