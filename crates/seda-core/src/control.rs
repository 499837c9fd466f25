//! Control introspection for effects.
//!
//! The host owns a set of named float controls per effect; [`ControlInfo`]
//! lets it discover them at runtime, clamp values to their declared range
//! at configuration time, and read back the numeric output slots (meters)
//! an effect publishes each block. Range clamping happens here, at the
//! control boundary, never inside the block-processing path.

/// Display/formatting unit for a control value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlUnit {
    /// Delay or buffer lengths in samples.
    Samples,
    /// Time in seconds.
    Seconds,
    /// Dimensionless value, typically normalized.
    None,
}

impl ControlUnit {
    /// Unit suffix for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ControlUnit::Samples => " smp",
            ControlUnit::Seconds => " s",
            ControlUnit::None => "",
        }
    }
}

/// Metadata describing one control: display name, unit, and valid range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlDescriptor {
    /// Display name, also used for name-based lookup.
    pub name: &'static str,
    /// Unit for formatting.
    pub unit: ControlUnit,
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
    /// Value on construction and reset.
    pub default: f32,
}

impl ControlDescriptor {
    /// Clamps a value into this control's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Runtime discovery and manipulation of an effect's controls.
///
/// Controls are indexed `0..control_count()`; the index order is stable for
/// the life of the effect. Implementations clamp in `set_control`.
pub trait ControlInfo {
    /// Number of input controls.
    fn control_count(&self) -> usize;

    /// Descriptor for control `index`, or `None` out of range.
    fn control_info(&self, index: usize) -> Option<ControlDescriptor>;

    /// Current value of control `index` (0.0 out of range).
    fn control(&self, index: usize) -> f32;

    /// Sets control `index`, clamping to the descriptor range. Out-of-range
    /// indices are ignored.
    fn set_control(&mut self, index: usize, value: f32);

    /// Finds a control index by name, case-insensitively.
    fn find_control(&self, name: &str) -> Option<usize> {
        (0..self.control_count()).find(|&i| {
            self.control_info(i)
                .is_some_and(|d| d.name.eq_ignore_ascii_case(name))
        })
    }

    /// Number of numeric output slots the effect writes each block.
    fn output_count(&self) -> usize {
        0
    }

    /// Display name of output slot `index`.
    fn output_name(&self, index: usize) -> Option<&'static str> {
        let _ = index;
        None
    }

    /// Value of output slot `index` as of the last processed block.
    fn output(&self, index: usize) -> f32 {
        let _ = index;
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        depth: f32,
    }

    impl ControlInfo for Fixture {
        fn control_count(&self) -> usize {
            1
        }
        fn control_info(&self, index: usize) -> Option<ControlDescriptor> {
            (index == 0).then_some(ControlDescriptor {
                name: "Depth",
                unit: ControlUnit::None,
                min: 0.0,
                max: 1.0,
                default: 0.5,
            })
        }
        fn control(&self, index: usize) -> f32 {
            if index == 0 { self.depth } else { 0.0 }
        }
        fn set_control(&mut self, index: usize, value: f32) {
            if index == 0 {
                self.depth = self.control_info(0).unwrap().clamp(value);
            }
        }
    }

    #[test]
    fn clamping_and_lookup() {
        let mut fx = Fixture { depth: 0.5 };
        fx.set_control(0, 7.0);
        assert_eq!(fx.control(0), 1.0);
        fx.set_control(99, 0.1); // ignored
        assert_eq!(fx.find_control("depth"), Some(0));
        assert_eq!(fx.find_control("DEPTH"), Some(0));
        assert_eq!(fx.find_control("nope"), None);
    }

    #[test]
    fn output_defaults() {
        let fx = Fixture { depth: 0.0 };
        assert_eq!(fx.output_count(), 0);
        assert_eq!(fx.output(0), 0.0);
        assert!(fx.output_name(0).is_none());
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(ControlUnit::Samples.suffix(), " smp");
        assert_eq!(ControlUnit::Seconds.suffix(), " s");
        assert_eq!(ControlUnit::None.suffix(), "");
    }
}
