use anyhow::Result;
use clap::Parser;

use rsdlc_tools::app_ids::{app_ids, AppIdsArgs};
use rsdlc_tools::convert::{convert, ConvertArgs};
use rsdlc_tools::inspect::{inspect, InspectArgs};
use rsdlc_tools::new::{new, NewArgs};
use rsdlc_tools::tone::{tone, ToneArgs};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
enum Cli {
    AppIds(AppIdsArgs),
    New(NewArgs),
    Inspect(InspectArgs),
    Tone(ToneArgs),
    Convert(ConvertArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse_from(wild::args()) {
        Cli::AppIds(args) => app_ids(&args),
        Cli::New(args) => new(args),
        Cli::Inspect(args) => inspect(&args),
        Cli::Tone(args) => tone(args),
        Cli::Convert(args) => convert(args),
    }
}
