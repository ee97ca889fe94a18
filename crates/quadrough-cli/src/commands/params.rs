//! Control surface listing.

use clap::Args;
use quadrough_core::{DistortionMode, ParamId, ParamUnit};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for a single control id (e.g., DRIVE)
    id: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    match args.id {
        Some(name) => {
            let id = ParamId::from_string_id(&name)
                .ok_or_else(|| anyhow::anyhow!("Unknown control: '{}'", name))?;
            print_details(id);
        }
        None => print_table(),
    }
    Ok(())
}

fn print_table() {
    println!("Controls:\n");
    println!(
        "  {:<9} {:<16} {:>8} {:>8} {:>10}",
        "ID", "NAME", "MIN", "MAX", "DEFAULT"
    );
    for id in ParamId::ALL {
        let desc = id.descriptor();
        println!(
            "  {:<9} {:<16} {:>8} {:>8} {:>10}",
            id.string_id(),
            desc.name,
            desc.display(desc.min).to_string(),
            desc.display(desc.max).to_string(),
            desc.display(desc.default).to_string(),
        );
    }
    println!("\nUse `quadrough params <ID>` for details.");
}

fn print_details(id: ParamId) {
    let desc = id.descriptor();
    println!("{} ({})", desc.name, id.string_id());
    println!("  Range:   {} to {}", desc.display(desc.min), desc.display(desc.max));
    println!("  Default: {}", desc.display(desc.default));
    match desc.unit {
        ParamUnit::Choice => {
            println!("  Values:");
            for mode in DistortionMode::ALL {
                println!("    {} = {}", mode.index(), mode.name());
            }
        }
        ParamUnit::Toggle => println!("  Values:  0 = off, 1 = on"),
        ParamUnit::Decibels | ParamUnit::Percent => {}
    }
}
