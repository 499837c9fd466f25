//! Seda Effects - block-based audio effects built on seda-core
//!
//! - [`FdnReverb`] - Eight-line feedback delay network reverb with
//!   prime-quantized delay lengths, crossfaded size changes, and
//!   tempo-synced pre-delay
//! - [`PingPongDelay`] - Tempo-synced stereo delay with cross-channel
//!   feedback and loop mode
//!
//! Both effects implement [`seda_core::Effect`] for block processing and
//! [`seda_core::ControlInfo`] for named-control discovery.
//!
//! ## Example
//!
//! ```rust
//! use seda_core::{ControlInfo, Effect};
//! use seda_effects::FdnReverb;
//!
//! let mut reverb = FdnReverb::new(48000.0, 64);
//! let size = reverb.find_control("Size").unwrap();
//! reverb.set_control(size, 4000.0);
//!
//! let mut left = [0.0f32; 64];
//! let mut right = [0.0f32; 64];
//! reverb.process_block(&mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod network;
pub mod node;
pub mod ping_pong;
pub mod reverb;

// Re-export main types at crate root
pub use network::FeedbackNetwork;
pub use node::DelayNode;
pub use ping_pong::PingPongDelay;
pub use reverb::FdnReverb;
