//! The `app-ids` subcommand

use anyhow::Result;
use clap::Args;
use rsdlc::{platform::GameVersion, song_app_id::SongAppIds};

/// Arguments for the `app-ids` subcommand
#[derive(Args)]
#[clap(author, version, about = "List the songs packages can take an app id from", long_about = None)]
pub struct AppIdsArgs {
    /// The game version to list songs for
    #[clap(short, long, default_value = "RS2014")]
    game_version: GameVersion,
}

/// List the songs packages can take an app id from
pub fn app_ids(args: &AppIdsArgs) -> Result<()> {
    let catalog = SongAppIds::instance();
    let default = catalog.default_for(args.game_version);

    for song in catalog.select(args.game_version) {
        let marker = if Some(song) == default { '*' } else { ' ' };
        println!("{marker} {:>8} | {}", song.app_id, song.name);
    }

    Ok(())
}
