//! Tempo-synced ping-pong delay.
//!
//! Stereo feedback delay whose time is the product of the tapped tempo and
//! a musical ratio. Feedback crosses channels (left echoes reappear on the
//! right and vice versa) and the right delay line runs at twice the left
//! line's length for a wide, staggered bounce. Delay-length changes blend
//! old and new read offsets linearly across each block, the same crossfade
//! idea the reverb uses, so tempo changes never click.
//!
//! Holding the loop button freezes the buffer: feedback becomes unity and
//! the input is muted, turning the delay into a looper.

use seda_core::{
    ControlDescriptor, ControlInfo, ControlUnit, Effect, OnePole, RingBuffer, SmoothedParam,
    StereoDcBlocker, TapTempo, flush_denormal, soft_clip,
};

/// Button id: tap tempo entry.
pub const BUTTON_TAP: usize = 0;
/// Button id: hold to freeze the buffer.
pub const BUTTON_LOOP: usize = 1;

/// Tap-tempo trigger window; also the left delay buffer length.
const TRIGGER_WINDOW: u32 = 1 << 17;

/// Musical divisors and multipliers applied to the tapped period.
const RATIOS: [f32; 9] = [
    1.0 / 4.0,
    1.0 / 3.0,
    1.0 / 2.0,
    3.0 / 4.0,
    1.0,
    3.0 / 2.0,
    2.0,
    3.0,
    4.0,
];

/// Cutoff of the lowpass that rounds off the repeats.
const TONE_HZ: f32 = 12000.0;

/// Tempo-synced stereo ping-pong delay with loop mode.
pub struct PingPongDelay {
    tempo: TapTempo,
    dc: StereoDcBlocker,
    delay_left: RingBuffer,
    delay_right: RingBuffer,
    tone_left: OnePole,
    tone_right: OnePole,

    feedback: SmoothedParam,
    mix: SmoothedParam,
    tempo_amount: f32,
    ratio_index: usize,

    // committed read offsets; new offsets blend in across one block
    delay_l: usize,
    delay_r: usize,
    looping: bool,
}

impl PingPongDelay {
    /// Creates the delay for the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let default_period = (sample_rate * 60.0 / 120.0) as u32;
        Self {
            tempo: TapTempo::new(TRIGGER_WINDOW, default_period),
            dc: StereoDcBlocker::new(),
            delay_left: RingBuffer::new(TRIGGER_WINDOW as usize),
            delay_right: RingBuffer::new(TRIGGER_WINDOW as usize * 2),
            tone_left: OnePole::new(sample_rate, TONE_HZ),
            tone_right: OnePole::new(sample_rate, TONE_HZ),
            feedback: SmoothedParam::new(0.5, sample_rate, 20.0),
            mix: SmoothedParam::new(0.5, sample_rate, 10.0),
            tempo_amount: 0.5,
            ratio_index: 4,
            delay_l: 0,
            delay_r: 0,
            looping: false,
        }
    }

    /// Delay time for the current ratio as a fraction of the buffers.
    fn delay_fraction(&self) -> f32 {
        (self.tempo.period() * RATIOS[self.ratio_index]).clamp(0.0001, 0.9999)
    }
}

impl Effect for PingPongDelay {
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len();
        debug_assert_eq!(len, right.len());

        self.tempo.clock(len as u32);
        self.tempo
            .set_speed((self.tempo_amount * TapTempo::SPEED_RANGE as f32) as i32);

        let (feedback, input_gain) = if self.looping {
            (1.0, 0.0)
        } else {
            (self.feedback.advance_block(len), 1.0)
        };
        let mix = self.mix.advance_block(len);
        let dry = 1.0 - mix;

        self.dc.process_block(left, right);

        let fraction = self.delay_fraction();
        let new_l = (fraction * (self.delay_left.capacity() - 1) as f32) as usize;
        let new_r = (fraction * (self.delay_right.capacity() - 1) as f32) as usize;

        let step = 1.0 / len as f32;
        for n in 0..len {
            let x1 = n as f32 * step;
            let x0 = 1.0 - x1;
            let echo_l = self.delay_left.read(self.delay_l) * x0 + self.delay_left.read(new_l) * x1;
            let echo_r =
                self.delay_right.read(self.delay_r) * x0 + self.delay_right.read(new_r) * x1;

            // the cross-write is the ping pong
            self.delay_right
                .write(flush_denormal(feedback * echo_l + input_gain * left[n]));
            self.delay_left
                .write(flush_denormal(feedback * echo_r + input_gain * right[n]));

            left[n] = soft_clip(self.tone_left.process(echo_l * mix + left[n] * dry));
            right[n] = soft_clip(self.tone_right.process(echo_r * mix + right[n] * dry));
        }
        self.delay_l = new_l;
        self.delay_r = new_r;
    }

    fn on_button(&mut self, id: usize, pressed: bool, sample_offset: usize) {
        match id {
            BUTTON_TAP => self.tempo.trigger(pressed, sample_offset as u32),
            BUTTON_LOOP => self.looping = pressed,
            _ => {}
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.tone_left.set_sample_rate(sample_rate);
        self.tone_right.set_sample_rate(sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.mix.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.dc.reset();
        self.delay_left.clear();
        self.delay_right.clear();
        self.tone_left.reset();
        self.tone_right.reset();
        self.feedback.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ControlInfo for PingPongDelay {
    fn control_count(&self) -> usize {
        4
    }

    fn control_info(&self, index: usize) -> Option<ControlDescriptor> {
        match index {
            0 => Some(ControlDescriptor {
                name: "Tempo",
                unit: ControlUnit::None,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            1 => Some(ControlDescriptor {
                name: "Feedback",
                unit: ControlUnit::None,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            2 => Some(ControlDescriptor {
                name: "Ratio",
                unit: ControlUnit::None,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            3 => Some(ControlDescriptor {
                name: "Dry/Wet",
                unit: ControlUnit::None,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            }),
            _ => None,
        }
    }

    fn control(&self, index: usize) -> f32 {
        match index {
            0 => self.tempo_amount,
            1 => self.feedback.target(),
            2 => self.ratio_index as f32 / RATIOS.len() as f32,
            3 => self.mix.target(),
            _ => 0.0,
        }
    }

    fn set_control(&mut self, index: usize, value: f32) {
        let Some(desc) = self.control_info(index) else {
            return;
        };
        let value = desc.clamp(value);
        match index {
            0 => self.tempo_amount = value,
            1 => self.feedback.set_target(value),
            2 => {
                self.ratio_index = ((value * RATIOS.len() as f32) as usize).min(RATIOS.len() - 1);
            }
            3 => self.mix.set_target(value),
            _ => {}
        }
    }
}
