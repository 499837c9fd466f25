//! Tap-driven tempo estimation.
//!
//! Measures the interval between button taps in samples and exposes it as a
//! period that tempo-synced effects turn into delay lengths. A speed knob
//! rescales the tapped period proportionally, with a small dead-band so ADC
//! jitter on the knob does not creep the tempo.
//!
//! All state is integer; nothing here allocates.

/// Tap tempo period estimator.
///
/// `window` is the longest interval (in samples) that counts as a tap pair;
/// two presses further apart than the window start a fresh measurement
/// instead of setting an absurdly slow tempo. [`period`](Self::period)
/// reports the current estimate as a fraction of that window.
#[derive(Debug, Clone)]
pub struct TapTempo {
    window: u32,
    period_samples: u32,
    elapsed: u32,
    speed: i32,
    pressed: bool,
}

impl TapTempo {
    /// Knob range used by [`set_speed`](Self::set_speed) (12-bit ADC).
    pub const SPEED_RANGE: i32 = 4096;

    /// ADC jitter dead-band; speed changes smaller than this are ignored.
    const SPEED_DEADBAND: i32 = 16;

    /// Creates an estimator with the given trigger window and initial
    /// period, both in samples.
    pub fn new(window: u32, default_period: u32) -> Self {
        Self {
            window,
            period_samples: default_period.clamp(1, window),
            elapsed: window,
            speed: Self::SPEED_RANGE / 2,
            pressed: false,
        }
    }

    /// Advances the internal sample counter by one block.
    pub fn clock(&mut self, samples: u32) {
        if self.elapsed < self.window {
            self.elapsed += samples;
        }
    }

    /// Registers a tap button edge.
    ///
    /// `sample_offset` is the press position inside the current block, so
    /// the measured interval is sample-accurate even though taps arrive at
    /// block granularity. Only the press edge measures; the release edge is
    /// tracked solely to reject repeats.
    pub fn trigger(&mut self, pressed: bool, sample_offset: u32) {
        if pressed && !self.pressed {
            if self.elapsed < self.window {
                self.period_samples = (self.elapsed + sample_offset).clamp(1, self.window);
            }
            self.elapsed = 0;
        }
        self.pressed = pressed;
    }

    /// Rescales the period from a raw knob value in `[0, 4096)`.
    ///
    /// Centre leaves the tapped tempo untouched; moving the knob scales the
    /// period proportionally to the change.
    pub fn set_speed(&mut self, raw: i32) {
        if (self.speed - raw).abs() > Self::SPEED_DEADBAND {
            let delta = i64::from(self.period_samples) * i64::from(self.speed - raw) / 2048;
            let next = i64::from(self.period_samples) + delta;
            self.period_samples = next.clamp(1, i64::from(self.window)) as u32;
            self.speed = raw;
        }
    }

    /// Current period as a fraction of the trigger window, in `[0, 1]`.
    pub fn period(&self) -> f32 {
        self.period_samples as f32 / self.window as f32
    }

    /// Current period in samples.
    pub fn period_samples(&self) -> u32 {
        self.period_samples
    }

    /// Forces the period directly, bypassing tap measurement.
    ///
    /// Unlike tap measurement this accepts 0, which is how a tempo-synced
    /// pre-delay is forced silent.
    pub fn set_limit(&mut self, samples: u32) {
        self.period_samples = samples.min(self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_pair_sets_period() {
        let mut tempo = TapTempo::new(65536, 24000);
        tempo.trigger(true, 0);
        tempo.trigger(false, 0);
        for _ in 0..100 {
            tempo.clock(120); // 12000 samples between taps
        }
        tempo.trigger(true, 0);
        assert_eq!(tempo.period_samples(), 12000);
        assert!((tempo.period() - 12000.0 / 65536.0).abs() < 1e-6);
    }

    #[test]
    fn taps_beyond_window_do_not_measure() {
        let mut tempo = TapTempo::new(1000, 500);
        tempo.trigger(true, 0);
        tempo.trigger(false, 0);
        tempo.clock(5000); // saturates at the window
        tempo.trigger(true, 0);
        assert_eq!(tempo.period_samples(), 500, "stale tap must not measure");
    }

    #[test]
    fn sample_offset_refines_the_interval() {
        let mut tempo = TapTempo::new(65536, 24000);
        tempo.trigger(true, 0);
        tempo.trigger(false, 0);
        tempo.clock(6400);
        tempo.trigger(true, 37);
        assert_eq!(tempo.period_samples(), 6437);
    }

    #[test]
    fn held_button_is_one_tap() {
        let mut tempo = TapTempo::new(65536, 24000);
        tempo.trigger(true, 0);
        tempo.clock(100);
        tempo.trigger(true, 0); // still held, no new edge
        tempo.clock(100);
        tempo.trigger(false, 0);
        tempo.clock(800);
        tempo.trigger(true, 0);
        assert_eq!(tempo.period_samples(), 1000);
    }

    #[test]
    fn speed_knob_scales_period() {
        let mut tempo = TapTempo::new(65536, 8192);
        // knob starts centred at 2048; moving to 1024 adds period/2
        tempo.set_speed(1024);
        assert_eq!(tempo.period_samples(), 8192 + 4096);
        // tiny wiggles inside the dead-band change nothing
        let before = tempo.period_samples();
        tempo.set_speed(1030);
        assert_eq!(tempo.period_samples(), before);
    }

    #[test]
    fn set_limit_forces_period() {
        let mut tempo = TapTempo::new(65536, 8192);
        tempo.set_limit(0);
        assert_eq!(tempo.period_samples(), 0);
        assert_eq!(tempo.period(), 0.0);
        tempo.set_limit(123);
        assert_eq!(tempo.period_samples(), 123);
    }
}
