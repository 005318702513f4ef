//! Arrangements: one instrument or vocal part of a song

use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};
use thiserror::Error;

/// The part an [`Arrangement`] represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrangementType {
    Lead,
    Rhythm,
    Combo,
    Bass,
    Vocal,
}

impl ArrangementType {
    pub const ALL: [ArrangementType; 5] = [
        Self::Lead,
        Self::Rhythm,
        Self::Combo,
        Self::Bass,
        Self::Vocal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Rhythm => "Rhythm",
            Self::Combo => "Combo",
            Self::Bass => "Bass",
            Self::Vocal => "Vocal",
        }
    }
}

impl fmt::Display for ArrangementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ArrangementType {
    type Err = UnknownArrangementType;

    fn from_str(str: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(str))
            .ok_or_else(|| UnknownArrangementType(str.to_owned()))
    }
}

/// A string didn't name any [`ArrangementType`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown arrangement type '{0}'")]
pub struct UnknownArrangementType(pub String);

/// A reference to a file an arrangement is built from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SongFile {
    pub file: PathBuf,
}

impl SongFile {
    pub fn new<P>(file: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { file: file.into() }
    }
}

/// One part of a song: its notation, compiled song data and the tone it's played with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    #[serde(default)]
    pub name: String,

    pub arrangement_type: ArrangementType,

    /// The compiled song data
    pub song_file: SongFile,

    /// The notation source
    pub song_xml: SongFile,

    /// The tone this part is played with, by name
    ///
    /// Templates written before tones existed don't carry this, in which case it is
    /// pointed at the package's first tone on load.
    #[serde(default)]
    pub tone_name: Option<String>,
}

impl Arrangement {
    pub fn new<P, Q>(arrangement_type: ArrangementType, song_file: P, song_xml: Q) -> Self
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        Self {
            name: arrangement_type.to_string(),
            arrangement_type,
            song_file: SongFile::new(song_file),
            song_xml: SongFile::new(song_xml),
            tone_name: None,
        }
    }

    /// Builder-style helper to assign a tone
    pub fn with_tone<S>(mut self, tone_name: S) -> Self
    where
        S: Into<String>,
    {
        self.tone_name = Some(tone_name.into());
        self
    }

    pub fn is_vocal(&self) -> bool {
        self.arrangement_type == ArrangementType::Vocal
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.tone_name {
            Some(tone) => write!(f, "{} - {} ({tone})", self.arrangement_type, self.name),
            None => write!(f, "{} - {}", self.arrangement_type, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type() {
        assert_eq!("bass".parse(), Ok(ArrangementType::Bass));
        assert_eq!("Vocal".parse(), Ok(ArrangementType::Vocal));
        assert_eq!(
            "Keys".parse::<ArrangementType>(),
            Err(UnknownArrangementType("Keys".to_owned()))
        );
    }

    #[test]
    fn new() {
        let arrangement = Arrangement::new(ArrangementType::Vocal, "v.sng", "v.xml").with_tone("Clean");

        assert!(arrangement.is_vocal());
        assert_eq!(arrangement.name, "Vocal");
        assert_eq!(arrangement.song_xml.file, PathBuf::from("v.xml"));
        assert_eq!(arrangement.to_string(), "Vocal - Vocal (Clean)");
    }
}
