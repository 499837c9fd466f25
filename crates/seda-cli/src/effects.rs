//! Effect construction and parameter plumbing for the CLI host.

use anyhow::{Context, bail};
use seda_core::{ControlInfo, Effect};
use seda_effects::{FdnReverb, PingPongDelay};

/// An effect the CLI can both process audio with and configure by name.
pub trait EffectWithControls: Effect + ControlInfo {}

impl<T: Effect + ControlInfo> EffectWithControls for T {}

/// Names accepted by [`create_effect`].
pub const EFFECT_NAMES: [&str; 2] = ["reverb", "pingpong"];

/// Instantiates an effect by name.
pub fn create_effect(
    name: &str,
    sample_rate: f32,
    block_size: usize,
) -> anyhow::Result<Box<dyn EffectWithControls>> {
    match name {
        "reverb" => Ok(Box::new(FdnReverb::new(sample_rate, block_size))),
        "pingpong" => Ok(Box::new(PingPongDelay::new(sample_rate))),
        other => bail!(
            "unknown effect '{other}' (expected one of: {})",
            EFFECT_NAMES.join(", ")
        ),
    }
}

/// Applies `name=value` pairs to an effect's controls.
pub fn apply_params(
    effect: &mut dyn EffectWithControls,
    params: &[(String, String)],
) -> anyhow::Result<()> {
    for (name, value) in params {
        let index = effect
            .find_control(name)
            .with_context(|| format!("no control named '{name}'"))?;
        let value: f32 = value
            .parse()
            .with_context(|| format!("invalid value '{value}' for control '{name}'"))?;
        effect.set_control(index, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_known_effects() {
        for name in EFFECT_NAMES {
            assert!(create_effect(name, 48000.0, 64).is_ok(), "{name}");
        }
        assert!(create_effect("flanger", 48000.0, 64).is_err());
    }

    #[test]
    fn applies_named_params() {
        let mut effect = create_effect("reverb", 48000.0, 64).unwrap();
        apply_params(
            &mut *effect,
            &[("size".into(), "5000".into()), ("time".into(), "2.5".into())],
        )
        .unwrap();
        let size = effect.find_control("Size").unwrap();
        assert_eq!(effect.control(size), 5000.0);
    }

    #[test]
    fn rejects_unknown_params() {
        let mut effect = create_effect("reverb", 48000.0, 64).unwrap();
        assert!(apply_params(&mut *effect, &[("bogus".into(), "1".into())]).is_err());
        assert!(apply_params(&mut *effect, &[("size".into(), "abc".into())]).is_err());
    }
}
