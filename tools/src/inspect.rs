//! The `inspect` subcommand

use crate::utils::iter_files;
use anyhow::{Context, Result};
use clap::Args;
use sampler::akp::Program;
use std::path::{Path, PathBuf};

/// Arguments for the `inspect` subcommand
#[derive(Args)]
#[clap(author, version, about = "Inspect .akp program files, or entire directories of them", long_about = None)]
pub struct InspectArgs {
    /// The path(s) to inspect
    path: Vec<PathBuf>,

    /// Search folders recursively
    #[clap(short, long)]
    recursive: bool,
}

/// Inspect .akp program files for their contents
pub fn inspect(args: &InspectArgs) -> Result<()> {
    for entry in iter_files(&args.path, args.recursive, &["akp"]) {
        print(entry.path())?;
    }

    Ok(())
}

fn print(path: &Path) -> Result<()> {
    let program = Program::from_path(path).context("Reading the program from file failed")?;

    println!(
        "{:<32} prg {:3} | loudness {:3} | bend +{}/-{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        program.program_number(),
        program.output.loudness,
        program.tune.pitch_bend_up,
        program.tune.pitch_bend_down,
    );

    for (index, keygroup) in program.keygroups.iter().enumerate() {
        let zones: Vec<&str> = keygroup
            .zones
            .iter()
            .map(|zone| zone.sample_name.as_str())
            .filter(|name| !name.is_empty())
            .collect();

        println!(
            "{index:>3} | {:3}..{:3} | {}",
            keygroup.kloc.low_note,
            keygroup.kloc.high_note,
            zones.join(", ")
        );
    }

    Ok(())
}
