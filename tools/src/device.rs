//! The `pull` and `push` subcommands: vendor disk tool wrappers
//!
//! Disk-image access goes through the external `akairead`/`akaiwrite`
//! binaries. These wrappers only move whole files: the codec never sees a
//! disk image, just the fully-read program bytes the vendor tools produce.
//! Pushing validates the program by parsing it first, so a broken file
//! never reaches a disk image.

use anyhow::{ensure, Context, Result};
use clap::Args;
use sampler::akp::Program;
use std::{fs, path::PathBuf, process::Command};
use which::which;

/// Arguments for the `pull` subcommand
#[derive(Args)]
#[clap(author, version, about = "Read a program out of a disk image via akairead", long_about = None)]
pub struct PullArgs {
    /// The disk image to read from
    image: PathBuf,

    /// The program name on the image
    name: String,

    /// Where to place the .akp file; defaults to <NAME>.akp
    #[clap(short, long)]
    output: Option<PathBuf>,
}

/// Read a program out of a disk image via akairead
pub fn pull(args: PullArgs) -> Result<()> {
    let tool = which("akairead").context("Could not locate the akairead binary in PATH")?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&args.name).with_extension("akp"));

    let status = Command::new(tool)
        .arg("-i")
        .arg(&args.image)
        .arg(&args.name)
        .arg("-o")
        .arg(&output)
        .status()
        .context("Could not run akairead")?;
    ensure!(status.success(), "akairead exited with {status}");

    // Check what came off the image before calling it a success
    let program =
        Program::from_path(&output).context("akairead produced an unreadable program")?;

    println!(
        "Pulled {} ({} keygroup(s))",
        output.to_string_lossy(),
        program.keygroup_count()
    );

    Ok(())
}

/// Arguments for the `push` subcommand
#[derive(Args)]
#[clap(author, version, about = "Write a program into a disk image via akaiwrite", long_about = None)]
pub struct PushArgs {
    /// The disk image to write to
    image: PathBuf,

    /// The .akp file(s) to push
    program: Vec<PathBuf>,
}

/// Write a program into a disk image via akaiwrite
pub fn push(args: PushArgs) -> Result<()> {
    let tool = which("akaiwrite").context("Could not locate the akaiwrite binary in PATH")?;

    for path in &args.program {
        // Parse-validate before anything touches the image
        let bytes = fs::read(path).context(format!("Could not read {}", path.to_string_lossy()))?;
        Program::parse(&bytes).context(format!(
            "{} is not a valid program, refusing to push it",
            path.to_string_lossy()
        ))?;

        let status = Command::new(&tool)
            .arg("-i")
            .arg(&args.image)
            .arg(path)
            .status()
            .context("Could not run akaiwrite")?;
        ensure!(status.success(), "akaiwrite exited with {status}");

        println!("Pushed {}", path.to_string_lossy());
    }

    Ok(())
}
