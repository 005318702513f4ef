//! The catalog of songs a custom package can borrow an application id from
//!
//! Custom packages have to be tied to a song entry the game already knows about. The
//! game identifies those entries by their (store) application id, which differs per
//! game version.

use crate::platform::GameVersion;
use std::{fmt, sync::OnceLock};
use thiserror::Error;

/// A song entry in the host game's catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongAppId {
    /// The title shown for the song
    pub name: &'static str,

    /// The application id tying a package to this song
    pub app_id: &'static str,

    /// The game version the id is valid for
    pub version: GameVersion,
}

impl fmt::Display for SongAppId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.app_id)
    }
}

/// The read-only, process-wide song catalog
///
/// ```
/// # use rsdlc::{platform::GameVersion, song_app_id::SongAppIds};
/// let catalog = SongAppIds::instance();
/// let song = catalog.lookup("248750", GameVersion::RS2014)?;
/// assert_eq!(song.name, "Cherub Rock");
/// # Ok::<(), rsdlc::song_app_id::NotFoundError>(())
/// ```
pub struct SongAppIds {
    songs: Vec<SongAppId>,
}

impl SongAppIds {
    /// The application id pre-selected for RS2014 packages (Cherub Rock)
    pub const DEFAULT_RS2014: &'static str = "248750";

    /// Access the catalog, initializing it on first use
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<SongAppIds> = OnceLock::new();
        INSTANCE.get_or_init(|| Self {
            songs: CATALOG
                .iter()
                .map(|&(name, app_id, version)| SongAppId {
                    name,
                    app_id,
                    version,
                })
                .collect(),
        })
    }

    /// Iterate over all songs for a game version, in catalog order
    pub fn select(&self, version: GameVersion) -> impl Iterator<Item = &SongAppId> + Clone {
        self.songs.iter().filter(move |song| song.version == version)
    }

    /// Find the song with an exact application id and game version
    pub fn lookup(&self, app_id: &str, version: GameVersion) -> Result<&SongAppId, NotFoundError> {
        self.songs
            .iter()
            .find(|song| song.app_id == app_id && song.version == version)
            .ok_or_else(|| NotFoundError {
                app_id: app_id.to_owned(),
                version,
            })
    }

    /// The song a fresh package for this version should point at
    ///
    /// This is the well-known default for RS2014, and the first catalog entry otherwise.
    pub fn default_for(&self, version: GameVersion) -> Option<&SongAppId> {
        match version {
            GameVersion::RS2014 => self.lookup(Self::DEFAULT_RS2014, version).ok(),
            _ => self.select(version).next(),
        }
    }
}

/// No song in the catalog matched an application id lookup
#[derive(Debug, Error, PartialEq, Eq)]
#[error("No song with app id {app_id} for {version}")]
pub struct NotFoundError {
    pub app_id: String,
    pub version: GameVersion,
}

const CATALOG: &[(&str, &str, GameVersion)] = &[
    ("Cherub Rock", "248750", GameVersion::RS2014),
    ("Hail to the King", "258077", GameVersion::RS2014),
    ("Sweet Child O' Mine", "258341", GameVersion::RS2014),
    ("Paranoid", "258349", GameVersion::RS2014),
    ("Back in Black", "258725", GameVersion::RS2014),
    ("Highway to Hell", "258728", GameVersion::RS2014),
    ("Smells Like Teen Spirit", "259068", GameVersion::RS2014),
    ("Seven Nation Army", "259070", GameVersion::RS2014),
    ("Go With the Flow", "206102", GameVersion::RS2012),
    ("In Bloom", "206103", GameVersion::RS2012),
    ("Slither", "206113", GameVersion::RS2012),
    ("Unglued", "206117", GameVersion::RS2012),
];
