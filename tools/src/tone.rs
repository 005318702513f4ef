//! The `tone` subcommand

use crate::utils::pedal_catalog;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rsdlc::{package::PackageData, template};
use std::path::{Path, PathBuf};

/// Arguments for the `tone` subcommand
#[derive(Args)]
#[clap(author, version, about = "Add, rename or remove tones in a package template", long_about = None)]
pub struct ToneArgs {
    /// The template to edit
    template: PathBuf,

    #[clap(subcommand)]
    command: ToneCommand,
}

#[derive(Subcommand)]
enum ToneCommand {
    /// Add a tone with a default amp and cabinet
    Add {
        /// A JSON pedal catalog to use instead of the built-in one
        #[clap(long)]
        pedals: Option<PathBuf>,
    },

    /// Rename a tone; arrangements using it follow along
    Rename { name: String, new_name: String },

    /// Remove a tone; arrangements using it fall back to the first tone
    Remove { name: String },
}

/// Add, rename or remove tones in a package template
pub fn tone(args: ToneArgs) -> Result<()> {
    let mut package = load(&args.template)?;

    match args.command {
        ToneCommand::Add { pedals } => {
            let catalog = pedal_catalog(pedals.as_ref())?;
            let tone = package
                .add_tone(&catalog)
                .context("Could not create a new tone")?;

            println!("Added tone '{}'", tone.name);
        }
        ToneCommand::Rename { name, new_name } => {
            package
                .rename_tone(&name, &new_name)
                .context(format!("Could not rename tone '{name}'"))?;

            println!("Renamed tone '{name}' to '{new_name}'");
        }
        ToneCommand::Remove { name } => {
            package
                .remove_tone(&name)
                .context(format!("Could not remove tone '{name}'"))?;

            println!("Removed tone '{name}'");
        }
    }

    template::save(&package, &args.template).context(format!(
        "Could not write template to {}",
        args.template.to_string_lossy()
    ))
}

fn load(path: &Path) -> Result<PackageData> {
    template::load(path).context(format!(
        "Could not read template {}",
        path.to_string_lossy()
    ))
}
