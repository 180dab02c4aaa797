//! The `apply` subcommand

use crate::utils::check_for_overwrite;
use anyhow::{Context, Result};
use clap::Args;
use sampler::akp::{Program, ProgramUpdate};
use std::{fs, path::PathBuf};

/// Arguments for the `apply` subcommand
#[derive(Args)]
#[clap(author, version, about = "Apply a JSON partial update to an .akp program", long_about = None)]
pub struct ApplyArgs {
    /// The program file to edit
    program: PathBuf,

    /// The JSON document holding the partial update
    update: PathBuf,

    /// Where to write the result; defaults to editing the program in place
    #[clap(short, long)]
    output: Option<PathBuf>,
}

/// Apply a JSON partial update to an .akp program
pub fn apply(args: ApplyArgs) -> Result<()> {
    let mut program =
        Program::from_path(&args.program).context("Reading the program from file failed")?;

    let json = fs::read_to_string(&args.update).context(format!(
        "Could not read {}",
        args.update.to_string_lossy()
    ))?;
    let update = ProgramUpdate::from_json(&json).context(format!(
        "{} does not hold a valid update",
        args.update.to_string_lossy()
    ))?;

    program
        .apply(&update)
        .context("Applying the update failed")?;

    let path = args.output.unwrap_or(args.program);
    if check_for_overwrite(&path)? {
        program.to_path(&path).context(format!(
            "Could not write the program to {}",
            path.to_string_lossy()
        ))?;

        println!(
            "Wrote {} ({} keygroup(s))",
            path.to_string_lossy(),
            program.keygroup_count()
        );
    }

    Ok(())
}
