use crate::utils::{check_paths_exist, has_extension, iter_files};
use anyhow::{Context, Result};
use clap::Args;
use rsdlc::{package::PackageData, template};
use std::path::{Path, PathBuf};

#[derive(Args)]
#[clap(author, version, about = "Inspect package templates, or entire directories of them", long_about = None)]
pub struct InspectArgs {
    /// The path(s) to inspect
    paths: Vec<PathBuf>,

    /// Search folders recursively
    #[clap(short, long)]
    recursive: bool,
}

pub fn inspect(args: &InspectArgs) -> Result<()> {
    check_paths_exist(&args.paths)?;
    let paths: Vec<_> = iter_files(&args.paths, args.recursive)
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, template::EXTENSION))
        .collect();

    if let Some((last, rest)) = paths.split_last() {
        for path in rest {
            print(path)?;
            println!();
        }

        print(last)?;
    }

    Ok(())
}

fn print(path: &Path) -> Result<()> {
    let package = template::load(path)
        .context(format!("Reading the template {} failed", path.display()))?;

    println!(
        "{:<32}{} | app {}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        package.name,
        package.app_id
    );
    print_package(&package);

    Ok(())
}

fn print_package(package: &PackageData) {
    let info = &package.song_info;
    println!(
        "  {} - {} ({}, {}) {} bpm",
        info.artist, info.song_display_name, info.album, info.song_year, info.average_tempo
    );
    println!("  Audio     {}", package.ogg_path.display());
    if !package.album_art_path.as_os_str().is_empty() {
        println!("  Album art {}", package.album_art_path.display());
    }

    for (index, arrangement) in package.arrangements().iter().enumerate() {
        println!(
            "{index:>3} | {:<6} | {:<12} | {}",
            arrangement.arrangement_type,
            arrangement.tone_name.as_deref().unwrap_or("-"),
            arrangement.song_xml.file.display()
        );
    }

    for tone in package.tones() {
        let pedals = tone
            .pedals
            .iter()
            .map(|(slot, pedal)| format!("{slot}: {}", pedal.pedal_key))
            .collect::<Vec<_>>()
            .join(", ");

        println!("  Tone {:<12} {pedals}", tone.name);
    }
}
