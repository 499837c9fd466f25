//! Property-based tests for seda-core primitives.
//!
//! Randomized checks of the ring buffer read/write contract, the crossfade
//! convexity invariant, prime quantization, and parameter smoothing.

use proptest::prelude::*;
use seda_core::{CrossfadeRingBuffer, PrimeTable, RingBuffer, SmoothedParam};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Writing N samples then reading at offset k returns the sample
    /// written N-1-k writes ago, for every valid head-relative offset.
    #[test]
    fn ring_buffer_read_back(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=64),
        capacity in 64usize..=256,
    ) {
        let mut buf = RingBuffer::new(capacity);
        for &s in &samples {
            buf.write(s);
        }
        for (k, &expected) in samples.iter().rev().enumerate() {
            prop_assert_eq!(buf.read(k), expected);
        }
    }

    /// write_block is observationally identical to repeated write.
    #[test]
    fn block_write_equivalence(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=48),
        prefill in prop::collection::vec(-1.0f32..=1.0f32, 0..=80),
    ) {
        let mut blockwise = RingBuffer::new(64);
        let mut samplewise = RingBuffer::new(64);
        for &s in &prefill {
            blockwise.write(s);
            samplewise.write(s);
        }
        blockwise.write_block(&samples);
        for &s in &samples {
            samplewise.write(s);
        }
        for k in 0..64 {
            prop_assert_eq!(blockwise.read(k), samplewise.read(k));
        }
    }

    /// Interpolated reads stay within the two bracketing samples.
    #[test]
    fn interpolation_is_bounded(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 8..=32),
        offset in 0.0f32..6.0,
    ) {
        let mut buf = RingBuffer::new(32);
        for &s in &samples {
            buf.write(s);
        }
        let lo = buf.read(offset as usize).min(buf.read(offset as usize + 1));
        let hi = buf.read(offset as usize).max(buf.read(offset as usize + 1));
        let v = buf.interpolate(offset);
        prop_assert!(v >= lo - 1e-6 && v <= hi + 1e-6);
    }

    /// During a crossfade every output sample is a convex combination of
    /// the two underlying taps, so it never exceeds either in magnitude.
    #[test]
    fn crossfade_never_exceeds_sources(
        signal in prop::collection::vec(-1.0f32..=1.0f32, 96..=128),
        old_offset in 0usize..=32,
        new_offset in 0usize..=32,
    ) {
        let mut buf = CrossfadeRingBuffer::new(256);
        for &s in &signal {
            buf.write(s);
        }
        // settle the old offset with an initial fade
        let mut scratch = [0.0f32; 16];
        buf.crossfade_read(old_offset, &mut scratch);

        let len = 16;
        let mut old_tap = [0.0f32; 16];
        let mut new_tap = [0.0f32; 16];
        for i in 0..len {
            old_tap[i] = buf.read(old_offset + len - i);
            new_tap[i] = buf.read(new_offset + len - i);
        }

        let mut out = [0.0f32; 16];
        buf.crossfade_read(new_offset, &mut out);
        for i in 0..len {
            let lo = old_tap[i].min(new_tap[i]);
            let hi = old_tap[i].max(new_tap[i]);
            prop_assert!(out[i] >= lo - 1e-6 && out[i] <= hi + 1e-6);
        }
    }

    /// nearest_at_or_below always returns a prime no greater than its
    /// input, and is the identity on primes.
    #[test]
    fn prime_quantization(n in 2usize..7600) {
        let table = PrimeTable::new(7600);
        let p = table.nearest_at_or_below(n);
        prop_assert!(p <= n);
        prop_assert!(table.is_prime(p));
        if table.is_prime(n) {
            prop_assert_eq!(p, n);
        }
    }

    /// Smoothed parameters approach their target monotonically in distance.
    #[test]
    fn smoothing_never_overshoots(
        initial in -10.0f32..10.0,
        target in -10.0f32..10.0,
    ) {
        let mut param = SmoothedParam::new(initial, 48000.0, 10.0);
        param.set_target(target);
        let mut dist = (initial - target).abs();
        for _ in 0..2000 {
            param.advance();
            let next = (param.get() - target).abs();
            prop_assert!(next <= dist + 1e-6);
            dist = next;
        }
    }
}
