//! The `import` subcommand

use crate::utils::{check_for_overwrite, iter_files};
use anyhow::{Context, Result};
use clap::Args;
use sampler::akp::Program;
use std::{env::current_dir, fs, path::PathBuf};

/// Arguments for the `import` subcommand
#[derive(Args)]
#[clap(author, version, about = "Build .akp programs from their JSON form", long_about = None)]
pub struct ImportArgs {
    /// The JSON document(s) or folder(s) to import
    path: Vec<PathBuf>,

    /// The destination folder for the program files
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Search folders recursively
    #[clap(short, long)]
    recursive: bool,
}

/// Build .akp programs from their JSON form
pub fn import(args: ImportArgs) -> Result<()> {
    let folder = match args.output {
        Some(folder) => folder,
        None => current_dir().context("Could not fetch current working directory")?,
    };
    fs::create_dir_all(&folder).context("Could not create output directory")?;

    for entry in iter_files(&args.path, args.recursive, &["json"]) {
        let source = entry.path();
        let json = fs::read_to_string(source).context(format!(
            "Could not read {}",
            source.to_string_lossy()
        ))?;

        let program = Program::from_json(&json).context(format!(
            "{} does not hold a valid program",
            source.to_string_lossy()
        ))?;

        let path = folder
            .join(source.file_name().unwrap_or_default())
            .with_extension("akp");

        if check_for_overwrite(&path)? {
            program.to_path(&path).context(format!(
                "Could not write the program to {}",
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
