//! Effect and control listing command.

use crate::effects::{EFFECT_NAMES, create_effect};
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show controls for a single effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let names: Vec<&str> = match &args.effect {
        Some(name) => vec![name.as_str()],
        None => EFFECT_NAMES.to_vec(),
    };

    for name in names {
        let effect = create_effect(name, 48000.0, 64)?;
        println!("{name}");
        for i in 0..effect.control_count() {
            if let Some(desc) = effect.control_info(i) {
                println!(
                    "  {:<12} {:>9.4} .. {:<9.4} (default {}{})",
                    desc.name,
                    desc.min,
                    desc.max,
                    desc.default,
                    desc.unit.suffix()
                );
            }
        }
        for i in 0..effect.output_count() {
            if let Some(output_name) = effect.output_name(i) {
                println!("  {output_name:<12} (output)");
            }
        }
        println!();
    }
    Ok(())
}
