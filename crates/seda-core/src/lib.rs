//! Seda Core - DSP primitives for block-based audio effects
//!
//! Foundational building blocks for a fixed-block-size effects pipeline with
//! hard per-block deadlines. Everything here is real-time safe: buffers are
//! allocated once at construction and the processing paths never allocate,
//! lock, or do unbounded work.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for stereo block effects
//! - [`ControlInfo`] - Runtime discovery of named, range-described controls
//!
//! ## Buffers
//!
//! - [`RingBuffer`] - Fixed-capacity circular store with head-relative reads
//! - [`CrossfadeRingBuffer`] - Ring buffer whose read offset only ever moves
//!   through a block-length linear crossfade (click-free delay changes)
//!
//! ## Timing
//!
//! - [`TapTempo`] - Tap-driven period estimator for tempo-synced effects
//!
//! ## Utilities
//!
//! - [`PrimeTable`] - Sieve-backed prime lookup for delay-length quantization
//! - [`DcBlocker`] / [`StereoDcBlocker`] - DC offset removal
//! - [`OnePole`] - 6 dB/oct lowpass for damping and tone shaping
//! - [`SmoothedParam`] - Zipper-free parameter smoothing
//! - Math helpers: [`db_to_linear`], [`soft_clip`], [`flush_denormal`], ...
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets. Disable the
//! default `std` feature:
//!
//! ```toml
//! [dependencies]
//! seda-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod control;
pub mod dc_blocker;
pub mod effect;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod primes;
pub mod ring_buffer;
pub mod tap_tempo;

// Re-export main types at crate root
pub use control::{ControlDescriptor, ControlInfo, ControlUnit};
pub use dc_blocker::{DcBlocker, StereoDcBlocker};
pub use effect::Effect;
pub use math::{db_to_linear, flush_denormal, linear_to_db, soft_clip};
pub use one_pole::OnePole;
pub use param::SmoothedParam;
pub use primes::PrimeTable;
pub use ring_buffer::{CrossfadeRingBuffer, RingBuffer};
pub use tap_tempo::TapTempo;
