//! The `convert` subcommand

use crate::utils::{ask, check_paths_exist, iter_files};
use anyhow::{bail, Context, Error, Result};
use clap::Args;
use log::warn;
use rsdlc::{
    convert::{Converter, Decision, Mismatch, PackageCodec},
    platform::{GamePlatform, GameVersion, Platform},
    song_app_id::SongAppIds,
};
use std::{
    path::{Path, PathBuf},
    process::Command,
};

/// Arguments for the `convert` subcommand
#[derive(Args)]
#[clap(
    author,
    version,
    about = "Convert built packages from one platform to another",
    long_about = "Convert built packages from one platform to another.\n\nThe actual conversion is done by an external codec program, which is called once per package as `<codec> <file> <source platform> <target platform> <app id>`. Any output on stdout, or a non-zero exit status, counts as an error for that package."
)]
pub struct ConvertArgs {
    /// The packages (or folders of packages) to convert
    #[clap(required = true)]
    paths: Vec<PathBuf>,

    /// Walk folders recursively
    #[clap(short, long)]
    recursive: bool,

    /// The platform the packages were built for
    #[clap(long)]
    from: GamePlatform,

    /// The platform to convert the packages to
    #[clap(long)]
    to: GamePlatform,

    #[clap(short, long, default_value = "RS2014")]
    game_version: GameVersion,

    /// The app id for the converted packages; defaults to the catalog's default song
    #[clap(long)]
    app_id: Option<String>,

    /// The program that converts a single package
    #[clap(long)]
    codec: PathBuf,

    /// Convert packages even if their name doesn't match the source platform
    #[clap(long, conflicts_with = "skip")]
    force: bool,

    /// Leave out packages whose name doesn't match the source platform
    #[clap(long)]
    skip: bool,
}

/// Convert built packages from one platform to another
pub fn convert(args: ConvertArgs) -> Result<()> {
    let source = Platform::new(args.from, args.game_version);
    let target = Platform::new(args.to, args.game_version);

    let app_id = match args.app_id {
        Some(app_id) => app_id,
        None => SongAppIds::instance()
            .default_for(args.game_version)
            .map(|song| song.app_id.to_owned())
            .ok_or_else(|| Error::msg(format!("No default app id for {}", args.game_version)))?,
    };

    check_paths_exist(&args.paths)?;
    let files: Vec<_> = iter_files(&args.paths, args.recursive)
        .map(|entry| entry.into_path())
        .collect();
    if files.is_empty() {
        bail!("No packages found to convert");
    }

    let converter = Converter::new(ProgramCodec {
        program: args.codec,
    });

    let result = if args.force {
        converter.convert(&files, source, target, &app_id, Decision::Force)
    } else if args.skip {
        converter.convert(&files, source, target, &app_id, Decision::Skip)
    } else {
        converter.convert(&files, source, target, &app_id, ask_to_force)
    };
    let report = result.context("Could not start the conversion")?;

    for path in &report.converted {
        println!("{} => {}", path.to_string_lossy(), target.platform);
    }
    println!("{report}");

    Ok(())
}

fn ask_to_force(mismatch: &Mismatch) -> Decision {
    match ask(&format!("{mismatch}\nForce try to convert this package?")) {
        Ok(true) => Decision::Force,
        Ok(false) => Decision::Skip,
        Err(err) => {
            warn!("{err:#}");
            Decision::Skip
        }
    }
}

/// A codec that runs an external program for every package
struct ProgramCodec {
    program: PathBuf,
}

impl PackageCodec for ProgramCodec {
    fn convert(
        &self,
        source_file: &Path,
        source: Platform,
        target: Platform,
        app_id: &str,
    ) -> Result<(), String> {
        let output = Command::new(&self.program)
            .arg(source_file)
            .arg(source.platform.label())
            .arg(target.platform.label())
            .arg(app_id)
            .output()
            .map_err(|err| format!("Could not run {}: {err}", self.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = [stdout, stderr.trim()]
                .into_iter()
                .find(|text| !text.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| output.status.to_string());

            Err(reason)
        } else if !stdout.is_empty() {
            Err(stdout.to_owned())
        } else {
            Ok(())
        }
    }
}
