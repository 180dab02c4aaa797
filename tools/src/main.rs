use anyhow::Result;
use clap::Parser;

use sampler_tools::apply::{apply, ApplyArgs};
use sampler_tools::device::{pull, push, PullArgs, PushArgs};
use sampler_tools::export::{export, ExportArgs};
use sampler_tools::import::{import, ImportArgs};
use sampler_tools::inspect::{inspect, InspectArgs};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
enum Cli {
    Inspect(InspectArgs),
    Export(ExportArgs),
    Import(ImportArgs),
    Apply(ApplyArgs),
    Pull(PullArgs),
    Push(PushArgs),
}

fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")?.start()?;

    match Cli::parse_from(wild::args()) {
        Cli::Inspect(args) => inspect(&args),
        Cli::Export(args) => export(args),
        Cli::Import(args) => import(args),
        Cli::Apply(args) => apply(args),
        Cli::Pull(args) => pull(args),
        Cli::Push(args) => push(args),
    }
}
