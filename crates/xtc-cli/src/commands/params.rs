//! Parameter listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use serde::Serialize;
use xtc_core::{ParamDescriptor, ParamFlags, ParamUnit};
use xtc_effects::CrosstalkParams;

#[derive(Args)]
pub struct ParamsArgs {
    /// Print machine-readable JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// One parameter as exposed to scripts.
#[derive(Debug, Serialize)]
struct ParamEntry {
    index: usize,
    id: u32,
    string_id: &'static str,
    name: &'static str,
    short_name: &'static str,
    unit: &'static str,
    min: f32,
    max: f32,
    default: f32,
    step: f32,
    automatable: bool,
    stepped: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<&'static str>,
}

impl ParamEntry {
    fn new(index: usize, desc: &'static ParamDescriptor) -> Self {
        Self {
            index,
            id: desc.id.0,
            string_id: desc.string_id,
            name: desc.name,
            short_name: desc.short_name,
            unit: match desc.unit {
                ParamUnit::Decibels => "dB",
                ParamUnit::Milliseconds => "ms",
                ParamUnit::None => "",
            },
            min: desc.min,
            max: desc.max,
            default: desc.default,
            step: desc.step,
            automatable: desc.flags.contains(ParamFlags::AUTOMATABLE),
            stepped: desc.flags.contains(ParamFlags::STEPPED),
            labels: desc.value_labels.to_vec(),
        }
    }
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let store = CrosstalkParams::new();
    let entries: Vec<ParamEntry> = store
        .descriptors()
        .iter()
        .enumerate()
        .map(|(index, desc)| ParamEntry::new(index, desc))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Crosstalk Parameters");
    println!("====================");
    println!();
    println!(
        "  {:5}  {:12}  {:6}  {:18}  {:12}  {}",
        "Index", "Name", "ID", "String ID", "Default", "Range"
    );
    println!(
        "  {:5}  {:12}  {:6}  {:18}  {:12}  {}",
        "-----", "----", "--", "---------", "-------", "-----"
    );

    for (entry, desc) in entries.iter().zip(store.descriptors()) {
        let range = if entry.labels.is_empty() {
            format!(
                "{} to {}",
                desc.format_value(desc.min),
                desc.format_value(desc.max)
            )
        } else {
            entry.labels.join(" | ")
        };
        println!(
            "  {:5}  {:12}  {:6}  {:18}  {:12}  {}",
            entry.index,
            entry.name,
            entry.id,
            entry.string_id,
            desc.format_value(desc.default),
            range
        );
    }

    println!();
    println!("Example:");
    println!("  xtc process input.wav output.wav --attenuation -2.5 --delay 0.08 --filter-type 1");

    Ok(())
}
