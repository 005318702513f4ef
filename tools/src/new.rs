//! The `new` subcommand

use crate::utils::{check_for_overwrite, pedal_catalog};
use anyhow::{Context, Error, Result};
use clap::Args;
use rsdlc::{
    arrangement::{Arrangement, ArrangementType},
    package::PackageFields,
    platform::GameVersion,
    song_app_id::SongAppIds,
    template,
    tone::Tone,
};
use std::{path::PathBuf, str::FromStr};

/// Arguments for the `new` subcommand
#[derive(Args)]
#[clap(author, version, about = "Create a new package template", long_about = None)]
pub struct NewArgs {
    /// Where to write the template (conventionally *.dlc.json)
    output: PathBuf,

    /// Internal package name; spaces become underscores
    #[clap(short, long)]
    name: String,

    /// The song title shown in game
    #[clap(short, long)]
    title: String,

    #[clap(long)]
    album: String,

    #[clap(long)]
    artist: String,

    #[clap(long)]
    year: String,

    /// Average tempo in beats per minute
    #[clap(long)]
    tempo: String,

    /// The app id to tie the package to; defaults to the catalog's default song
    #[clap(long)]
    app_id: Option<String>,

    /// The song audio (ogg)
    #[clap(long)]
    ogg: PathBuf,

    /// Album art (dds)
    #[clap(long)]
    album_art: Option<PathBuf>,

    /// An arrangement as TYPE,SONG_FILE,SONG_XML (e.g. Lead,lead.sng,lead.xml)
    #[clap(short, long = "arrangement")]
    arrangements: Vec<ArrangementArg>,

    /// A JSON pedal catalog to use instead of the built-in one
    #[clap(long)]
    pedals: Option<PathBuf>,
}

/// Create a new package template
pub fn new(args: NewArgs) -> Result<()> {
    let catalog = pedal_catalog(args.pedals.as_ref())?;
    let tone = Tone::create([], &catalog).context("Could not create the default tone")?;

    let app_id = match args.app_id {
        Some(app_id) => app_id,
        None => SongAppIds::instance()
            .default_for(GameVersion::RS2014)
            .map(|song| song.app_id.to_owned())
            .unwrap_or_default(),
    };

    let fields = PackageFields {
        name: args.name,
        song_display_name: args.title,
        album: args.album,
        artist: args.artist,
        year: args.year,
        average_tempo: args.tempo,
        app_id,
        album_art_path: args.album_art.unwrap_or_default(),
        ogg_path: args.ogg,
        arrangements: args
            .arrangements
            .into_iter()
            .map(|arg| Arrangement::new(arg.arrangement_type, arg.song_file, arg.song_xml))
            .collect(),
        tones: vec![tone],
    };

    let package = fields.build().map_err(|err| {
        Error::new(err).context("One or more fields are missing information")
    })?;

    if check_for_overwrite(&args.output)? {
        template::save(&package, &args.output).context(format!(
            "Could not write template to {}",
            args.output.to_string_lossy()
        ))?;

        println!("Wrote {}", args.output.to_string_lossy());
    }

    Ok(())
}

/// An arrangement given on the command line
#[derive(Debug, PartialEq, Eq)]
struct ArrangementArg {
    arrangement_type: ArrangementType,
    song_file: PathBuf,
    song_xml: PathBuf,
}

impl FromStr for ArrangementArg {
    type Err = Error;

    fn from_str(str: &str) -> Result<Self, Self::Err> {
        let mut parts = str.splitn(3, ',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(song_file), Some(song_xml)) => Ok(Self {
                arrangement_type: kind.trim().parse()?,
                song_file: PathBuf::from(song_file.trim()),
                song_xml: PathBuf::from(song_xml.trim()),
            }),
            _ => Err(Error::msg("Expected TYPE,SONG_FILE,SONG_XML")),
        }
    }
}
