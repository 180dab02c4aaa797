//! The `export` subcommand

use crate::utils::{check_for_overwrite, iter_files};
use anyhow::{Context, Result};
use clap::Args;
use sampler::akp::Program;
use std::{env::current_dir, fs, path::PathBuf};

/// Arguments for the `export` subcommand
#[derive(Args)]
#[clap(author, version, about = "Export .akp programs to their JSON form", long_about = None)]
pub struct ExportArgs {
    /// The program file(s) or folder(s) to export
    path: Vec<PathBuf>,

    /// The destination folder for the JSON documents
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Search folders recursively
    #[clap(short, long)]
    recursive: bool,
}

/// Export .akp programs to their JSON form
pub fn export(args: ExportArgs) -> Result<()> {
    let folder = match args.output {
        Some(folder) => folder,
        None => current_dir().context("Could not fetch current working directory")?,
    };
    fs::create_dir_all(&folder).context("Could not create output directory")?;

    for entry in iter_files(&args.path, args.recursive, &["akp"]) {
        let source = entry.path();
        let program = Program::from_path(source).context(format!(
            "Could not read the program from {}",
            source.to_string_lossy()
        ))?;

        let json = program.to_json().context("Could not serialize to JSON")?;

        let path = folder
            .join(source.file_name().unwrap_or_default())
            .with_extension("json");

        if check_for_overwrite(&path)? {
            fs::write(&path, json).context(format!(
                "Could not write JSON to {}",
                path.to_string_lossy()
            ))?;

            println!(
                "{} => {}",
                source.to_string_lossy(),
                path.to_string_lossy()
            );
        }
    }

    Ok(())
}
