use anyhow::{Context, Result};
use clap::Parser;
use sampler::akp::Program;
use std::path::PathBuf;

#[derive(Parser)]
enum Cli {
    List { paths: Vec<PathBuf> },
}

fn main() -> Result<()> {
    match Cli::parse() {
        Cli::List { paths } => list(&paths),
    }
}

fn list(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let program = Program::from_path(path).context("Parsing the program failed")?;

        println!(
            "{:<24} | prg {:3} | {} keygroup(s)",
            path.file_name().unwrap_or_default().to_string_lossy(),
            program.program_number(),
            program.keygroup_count()
        );

        for (index, keygroup) in program.keygroups.iter().enumerate() {
            println!(
                "  {index:>2} | {:3}..{:3} | {}",
                keygroup.kloc.low_note,
                keygroup.kloc.high_note,
                keygroup.zones[0].sample_name
            );
        }
    }

    Ok(())
}
