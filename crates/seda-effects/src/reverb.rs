//! Feedback delay network reverb.
//!
//! Eight prime-length delay lines coupled through an orthogonal feedback
//! matrix (Jot's generalized reverberator), each with a one-pole lowpass
//! rederived every block from the reverb-time and brightness controls. Room
//! size changes and the tempo-synced pre-delay move exclusively through
//! crossfading delay reads, so parameter jumps of any magnitude stay
//! click-free.
//!
//! Reference: J.-M. Jot and A. Chaigne, "Digital delay networks for
//! designing artificial reverberators", AES 90th Convention, 1991.

use alloc::vec;
use alloc::vec::Vec;
use libm::{expf, sqrtf};
use seda_core::{
    ControlDescriptor, ControlInfo, ControlUnit, CrossfadeRingBuffer, Effect, PrimeTable,
    SmoothedParam, StereoDcBlocker, TapTempo,
};

use crate::network::FeedbackNetwork;

/// Shortest supported room size in samples.
pub const MIN_ROOM_SIZE: f32 = 192.0;
/// Longest supported room size in samples.
pub const MAX_ROOM_SIZE: f32 = 7552.0;
/// Shortest RT60 in seconds.
pub const MIN_REVERB_TIME: f32 = 0.8;
/// Longest RT60 in seconds.
pub const MAX_REVERB_TIME: f32 = 16.0;
/// Darkest brightness setting.
pub const MIN_BRIGHTNESS: f32 = 0.1134;
/// Brightest brightness setting.
pub const MAX_BRIGHTNESS: f32 = 0.4975;

/// Button id: tap tempo entry.
pub const BUTTON_TAP: usize = 0;
/// Button id: force the pre-delay to zero.
pub const BUTTON_PREDELAY_CLEAR: usize = 1;

/// Pre-delay buffer capacity per channel, in samples.
const MAX_PREDELAY: usize = 32768;
/// Prime table covers every length up to the maximum room size.
const PRIME_TABLE_LEN: usize = 7600;
/// Tap-tempo trigger window in samples.
const TRIGGER_WINDOW: u32 = 65536;
/// ln(10^3): RT60 means amplitude falls to 10^-3 over the reverb time.
const RT60_LN: f32 = 6.907_755_3;
/// sqrt(8), the wet make-up counterpart of the matrix normalization.
const SQRT_8: f32 = 2.828_427_1;

/// Eight-line FDN reverb with tempo-synced pre-delay.
///
/// Built for a fixed sample rate and block size; every buffer is allocated
/// in [`new`](Self::new) and the block path never allocates.
///
/// # Example
///
/// ```rust
/// use seda_core::Effect;
/// use seda_effects::FdnReverb;
///
/// let mut reverb = FdnReverb::new(48000.0, 64);
/// let mut left = [0.0f32; 64];
/// let mut right = [0.0f32; 64];
/// left[0] = 1.0;
/// reverb.process_block(&mut left, &mut right);
/// ```
pub struct FdnReverb {
    sample_rate: f32,
    block_size: usize,
    primes: PrimeTable,
    tempo: TapTempo,
    dc: StereoDcBlocker,
    network: FeedbackNetwork,

    predelay_left: CrossfadeRingBuffer,
    predelay_right: CrossfadeRingBuffer,
    pre_left: Vec<f32>,
    pre_right: Vec<f32>,

    room_size: SmoothedParam,
    reverb_time: SmoothedParam,
    brightness: SmoothedParam,
    wet: SmoothedParam,
    predelay_amount: f32,

    // one-pole smoothing state for the wet taps, one per channel
    left_tail: f32,
    right_tail: f32,

    // published tail RMS per channel
    meter_left: f32,
    meter_right: f32,

    // tempo pulse blinks at the pre-delay period
    pulse_elapsed: usize,
    pulse: bool,
}

impl FdnReverb {
    /// Creates the reverb for a fixed sample rate and block size.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is 0 or too large for the shortest supported
    /// delay line (the per-block loop-latency compensation must leave a
    /// positive tap length).
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        let primes = PrimeTable::new(PRIME_TABLE_LEN);
        let shortest_line = primes.nearest_at_or_below((MIN_ROOM_SIZE / 1.5) as usize);
        assert!(
            block_size > 0 && block_size < shortest_line,
            "block size {block_size} must be in 1..{shortest_line}"
        );

        let default_period = (sample_rate * 60.0 / 120.0) as u32;
        Self {
            sample_rate,
            block_size,
            primes,
            tempo: TapTempo::new(TRIGGER_WINDOW, default_period),
            dc: StereoDcBlocker::new(),
            network: FeedbackNetwork::new(block_size),
            predelay_left: CrossfadeRingBuffer::new(MAX_PREDELAY),
            predelay_right: CrossfadeRingBuffer::new(MAX_PREDELAY),
            pre_left: vec![0.0; block_size],
            pre_right: vec![0.0; block_size],
            room_size: SmoothedParam::new(2400.0, sample_rate, 20.0),
            reverb_time: SmoothedParam::new(4.0, sample_rate, 20.0),
            brightness: SmoothedParam::new(0.25, sample_rate, 20.0),
            wet: SmoothedParam::new(0.5, sample_rate, 10.0),
            predelay_amount: 0.0,
            left_tail: 0.0,
            right_tail: 0.0,
            meter_left: 0.0,
            meter_right: 0.0,
            pulse_elapsed: 0,
            pulse: false,
        }
    }

    /// Tail RMS of the last block, per channel, for host-side metering.
    pub fn tail_levels(&self) -> (f32, f32) {
        (self.meter_left, self.meter_right)
    }

    /// Gate that blinks at the current pre-delay period.
    pub fn tempo_pulse(&self) -> bool {
        self.pulse
    }

    /// Current pre-delay target in samples, folded into the supported
    /// range.
    fn predelay_samples(&self) -> usize {
        let mut t = (self.tempo.period() * TRIGGER_WINDOW as f32) as usize;
        // fold slow tempi down by octaves so the pre-delay stays musically
        // related to the tapped period
        while t > MAX_PREDELAY {
            t >>= 1;
        }
        // crossfade reads reach one block past the offset
        t.min(MAX_PREDELAY - self.block_size - 1)
    }

    fn update_pulse(&mut self, block_len: usize, predelay: usize) {
        self.pulse_elapsed += block_len;
        if predelay > 0 && self.pulse_elapsed >= predelay {
            self.pulse_elapsed -= predelay;
            self.pulse = true;
        } else if self.pulse_elapsed > predelay / 4 {
            self.pulse = false;
        }
    }
}

impl Effect for FdnReverb {
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len();
        debug_assert_eq!(len, self.block_size);
        debug_assert_eq!(len, right.len());

        self.tempo.clock(len as u32);
        self.tempo
            .set_speed((self.predelay_amount * TapTempo::SPEED_RANGE as f32) as i32);
        self.dc.process_block(left, right);

        let room_size = self.room_size.advance_block(len);
        let time_samples = self.reverb_time.advance_block(len) * self.sample_rate;
        let mut cutoff_coef = expf(-core::f32::consts::TAU * self.brightness.advance_block(len));
        let wet = self.wet.advance_block(len);

        let dry_coef = 1.0 - wet;
        let (wet_coef0, wet_coef1) = if wet > 0.0 {
            // make-up gain against the loudness loss of a small room with a
            // long decay; wet_coef1 one-pole smooths the wet tap
            let makeup = wet * SQRT_8 * (1.0 - expf(-10.0 * room_size / (time_samples * 0.125)));
            (makeup, -cutoff_coef * makeup)
        } else {
            (0.0, 0.0)
        };
        // dividing by the room-size prime bounds every node's feedback
        // coefficient below unity; see DelayNode::configure
        cutoff_coef /= self.primes.nearest_at_or_below(room_size as usize) as f32;

        let beta = -RT60_LN / time_samples;
        self.network
            .configure(beta, room_size, cutoff_coef, &self.primes);

        let predelay = self.predelay_samples();
        self.predelay_left.write_block(left);
        self.predelay_right.write_block(right);
        self.predelay_left.crossfade_read(predelay, &mut self.pre_left);
        self.predelay_right
            .crossfade_read(predelay, &mut self.pre_right);
        self.update_pulse(len, predelay);

        // each node's new input: its matrix row over the previous block's
        // outputs plus its pre-delayed dry channel
        self.network.inject(&self.pre_left, &self.pre_right);

        let mut tail = self.left_tail;
        let mut acc = 0.0f32;
        for (i, sample) in left.iter_mut().enumerate() {
            let tap = self.network.left_tap(i);
            *sample = dry_coef * *sample + wet_coef0 * tap + wet_coef1 * tail;
            tail = tap;
            acc += tap * tap;
        }
        self.left_tail = tail;
        self.meter_left = sqrtf(acc / len as f32);

        let mut tail = self.right_tail;
        let mut acc = 0.0f32;
        for (i, sample) in right.iter_mut().enumerate() {
            let tap = self.network.right_tap(i);
            *sample = dry_coef * *sample + wet_coef0 * tap + wet_coef1 * tail;
            tail = tap;
            acc += tap * tap;
        }
        self.right_tail = tail;
        self.meter_right = sqrtf(acc / len as f32);

        self.network.advance();
    }

    fn on_button(&mut self, id: usize, pressed: bool, sample_offset: usize) {
        match id {
            BUTTON_TAP => {
                self.tempo.trigger(pressed, sample_offset as u32);
                self.pulse = pressed;
                self.pulse_elapsed = 0;
            }
            BUTTON_PREDELAY_CLEAR => {
                if pressed {
                    self.tempo.set_limit(0);
                }
            }
            _ => {}
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.room_size.set_sample_rate(sample_rate);
        self.reverb_time.set_sample_rate(sample_rate);
        self.brightness.set_sample_rate(sample_rate);
        self.wet.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.dc.reset();
        self.network.reset();
        self.predelay_left.clear();
        self.predelay_right.clear();
        self.pre_left.fill(0.0);
        self.pre_right.fill(0.0);
        self.room_size.snap_to_target();
        self.reverb_time.snap_to_target();
        self.brightness.snap_to_target();
        self.wet.snap_to_target();
        self.left_tail = 0.0;
        self.right_tail = 0.0;
        self.meter_left = 0.0;
        self.meter_right = 0.0;
        self.pulse_elapsed = 0;
    }
}

impl ControlInfo for FdnReverb {
    fn control_count(&self) -> usize {
        5
    }

    fn control_info(&self, index: usize) -> Option<ControlDescriptor> {
        match index {
            0 => Some(ControlDescriptor {
                name: "Size",
                unit: ControlUnit::Samples,
                min: MIN_ROOM_SIZE,
                max: MAX_ROOM_SIZE,
                default: 2400.0,
            }),
            1 => Some(ControlDescriptor {
                name: "Time",
                unit: ControlUnit::Seconds,
                min: MIN_REVERB_TIME,
                max: MAX_REVERB_TIME,
                default: 4.0,
            }),
            2 => Some(ControlDescriptor {
                name: "Brightness",
                unit: ControlUnit::None,
                min: MIN_BRIGHTNESS,
                max: MAX_BRIGHTNESS,
                default: 0.25,
            }),
            3 => Some(ControlDescriptor {
                name: "Dry/Wet",
                unit: ControlUnit::None,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            4 => Some(ControlDescriptor {
                name: "Pre-delay",
                unit: ControlUnit::None,
                min: 0.0,
                max: 1.0,
                default: 0.0,
            }),
            _ => None,
        }
    }

    fn control(&self, index: usize) -> f32 {
        match index {
            0 => self.room_size.target(),
            1 => self.reverb_time.target(),
            2 => self.brightness.target(),
            3 => self.wet.target(),
            4 => self.predelay_amount,
            _ => 0.0,
        }
    }

    fn set_control(&mut self, index: usize, value: f32) {
        let Some(desc) = self.control_info(index) else {
            return;
        };
        let value = desc.clamp(value);
        match index {
            0 => self.room_size.set_target(value),
            1 => self.reverb_time.set_target(value),
            2 => self.brightness.set_target(value),
            3 => self.wet.set_target(value),
            4 => self.predelay_amount = value,
            _ => {}
        }
    }

    fn output_count(&self) -> usize {
        2
    }

    fn output_name(&self, index: usize) -> Option<&'static str> {
        match index {
            0 => Some("Tail L"),
            1 => Some("Tail R"),
            _ => None,
        }
    }

    fn output(&self, index: usize) -> f32 {
        match index {
            0 => self.meter_left,
            1 => self.meter_right,
            _ => 0.0,
        }
    }
}
