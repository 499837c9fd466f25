//! Circular sample buffers for delay-based effects.
//!
//! [`RingBuffer`] is the plain variant: a fixed-capacity circular store with
//! head-relative indexed reads, block writes, and linear interpolation.
//!
//! [`CrossfadeRingBuffer`] adds a persistent read offset that can only move
//! by crossfading from the old offset to a new one across an output block.
//! That blend is the sole mechanism by which a delay length ever changes, so
//! arbitrary length jumps between blocks never produce a click.
//!
//! Offsets are head-relative: offset 0 is the most recently written sample,
//! offset `k` is the sample written `k` steps before it. Offsets at or past
//! the capacity are a contract violation at the call site; they are checked
//! with `debug_assert!` only, never in release builds.

use alloc::vec;
use alloc::vec::Vec;

/// Fixed-capacity circular sample store.
///
/// The buffer is allocated once in [`new`](Self::new) and never reallocates.
/// A monotonically advancing write cursor wraps at the capacity.
///
/// # Example
///
/// ```rust
/// use seda_core::RingBuffer;
///
/// let mut buf = RingBuffer::new(512);
/// buf.write(1.0);
/// buf.write(2.0);
/// assert_eq!(buf.read(0), 2.0); // most recent
/// assert_eq!(buf.read(1), 1.0); // one step back
/// ```
#[derive(Debug, Clone)]
pub struct RingBuffer {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl RingBuffer {
    /// Creates a ring buffer holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Returns the fixed capacity in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Appends one sample, advancing the write cursor.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Appends a contiguous block, wrapping at the capacity.
    ///
    /// Contract: `samples.len() <= capacity()`.
    pub fn write_block(&mut self, samples: &[f32]) {
        debug_assert!(samples.len() <= self.buffer.len());
        let len = self.buffer.len();
        let head = (len - self.write_pos).min(samples.len());
        self.buffer[self.write_pos..self.write_pos + head].copy_from_slice(&samples[..head]);
        let rest = samples.len() - head;
        if rest > 0 {
            self.buffer[..rest].copy_from_slice(&samples[head..]);
        }
        self.write_pos = (self.write_pos + samples.len()) % len;
    }

    /// Reads the sample written `offset` steps before the most recent write.
    ///
    /// Offset 0 is the most recently written sample. Contract:
    /// `offset < capacity()`.
    #[inline]
    pub fn read(&self, offset: usize) -> f32 {
        debug_assert!(offset < self.buffer.len(), "read offset out of range");
        let len = self.buffer.len();
        self.buffer[(self.write_pos + len - 1 - offset) % len]
    }

    /// Fills `out` with consecutive head-relative samples ending `offset`
    /// steps back.
    ///
    /// `out[out.len() - 1]` is `read(offset)`, earlier elements step further
    /// back in time. Contract: `offset + out.len() <= capacity()`.
    pub fn read_block(&self, offset: usize, out: &mut [f32]) {
        debug_assert!(offset + out.len() <= self.buffer.len());
        let len = out.len();
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.read(offset + len - 1 - i);
        }
    }

    /// Linearly interpolates between the two integer offsets bracketing
    /// `offset`.
    ///
    /// An integral `offset` returns `read(offset)` exactly. Contract:
    /// `offset` in `[0, capacity() - 1)`.
    #[inline]
    pub fn interpolate(&self, offset: f32) -> f32 {
        debug_assert!(offset >= 0.0);
        let idx = offset as usize;
        let frac = offset - idx as f32;
        let newer = self.read(idx);
        let older = self.read(idx + 1);
        newer + (older - newer) * frac
    }

    /// Zeroes the buffer and rewinds the write cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Ring buffer with a crossfading read offset.
///
/// Holds a "current read offset" between blocks.
/// [`crossfade_read`](Self::crossfade_read) blends the old and the
/// requested offset linearly across one output block, then commits the new
/// offset. Between
/// transitions it behaves as a plain delayed read; during a transition
/// every output sample is a convex combination of two valid reads, so the
/// output never exceeds either source in magnitude.
///
/// Used both for the reverb pre-delay and for each feedback node's tap.
#[derive(Debug, Clone)]
pub struct CrossfadeRingBuffer {
    inner: RingBuffer,
    read_offset: usize,
}

impl CrossfadeRingBuffer {
    /// Creates a crossfade buffer holding `capacity` samples, read offset 0.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RingBuffer::new(capacity),
            read_offset: 0,
        }
    }

    /// Returns the fixed capacity in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// The delay length currently being read.
    #[inline]
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// Appends one sample. See [`RingBuffer::write`].
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.inner.write(sample);
    }

    /// Appends a block. See [`RingBuffer::write_block`].
    pub fn write_block(&mut self, samples: &[f32]) {
        self.inner.write_block(samples);
    }

    /// Head-relative read. See [`RingBuffer::read`].
    #[inline]
    pub fn read(&self, offset: usize) -> f32 {
        self.inner.read(offset)
    }

    /// Produces one output block while fading the read offset from its
    /// current value to `new_offset`, then commits `new_offset`.
    ///
    /// For `L = out.len()`:
    ///
    /// ```text
    /// out[i] = read(old + L - i) * (1 - i/L) + read(new + L - i) * (i/L)
    /// ```
    ///
    /// so the first output sample is purely the old tap and the last is one
    /// step short of purely the new tap. Call after writing the current
    /// input block. Contract: `max(old, new) + L < capacity()`.
    pub fn crossfade_read(&mut self, new_offset: usize, out: &mut [f32]) {
        let len = out.len();
        debug_assert!(self.read_offset.max(new_offset) + len < self.capacity());
        let step = 1.0 / len as f32;
        for (i, slot) in out.iter_mut().enumerate() {
            let x1 = i as f32 * step;
            let x0 = 1.0 - x1;
            *slot = self.inner.read(self.read_offset + len - i) * x0
                + self.inner.read(new_offset + len - i) * x1;
        }
        self.read_offset = new_offset;
    }

    /// Zeroes the buffer and resets the read offset.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.read_offset = 0;
    }
}
