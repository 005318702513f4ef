//! The package aggregate: everything needed to build one custom song package
//!
//! A [`PackageData`] is only ever constructed whole. Fresh packages come out of
//! [`PackageFields::build()`], which validates raw user input in a fixed order; saved
//! ones come out of [`template::load()`](crate::template::load). After that, all edits
//! to tones and arrangements go through methods on [`PackageData`], so the package
//! invariants are checked in one place:
//!
//! * tone names are unique (exact, case-sensitive)
//! * there is always at least one tone
//! * at most one arrangement is a vocal part
//! * every arrangement points at a tone that exists

use crate::{
    arrangement::{Arrangement, SongFile},
    tone::{
        pedal::{PedalCatalog, PedalSetting},
        ConfigurationError, Tone,
    },
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};
use thiserror::Error;

/// Song metadata shown in game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongInfo {
    pub song_display_name: String,
    pub album: String,
    pub artist: String,
    pub song_year: i32,
    pub average_tempo: i32,
}

/// A complete, valid custom song package project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageData {
    /// Internal name, never containing spaces
    pub name: String,

    pub app_id: String,
    pub song_info: SongInfo,

    /// Album art (DDS); may be empty
    #[serde(default)]
    pub album_art_path: PathBuf,

    /// The song audio (ogg)
    pub ogg_path: PathBuf,

    #[serde(default)]
    arrangements: Vec<Arrangement>,
    tones: Vec<Tone>,
}

impl PackageData {
    pub fn arrangements(&self) -> &[Arrangement] {
        &self.arrangements
    }

    /// Mutable access to the arrangements' file references, song file then xml per arrangement
    ///
    /// Types and tones stay behind the checked editing methods.
    pub fn song_files_mut(&mut self) -> impl Iterator<Item = &mut SongFile> {
        self.arrangements
            .iter_mut()
            .flat_map(|arrangement| [&mut arrangement.song_file, &mut arrangement.song_xml])
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Iterate over the names of all tones, in order
    pub fn tone_names(&self) -> impl Iterator<Item = &str> {
        self.tones.iter().map(|tone| tone.name.as_str())
    }

    /// Find a tone by its exact name
    pub fn tone(&self, name: &str) -> Option<&Tone> {
        self.tones.iter().find(|tone| tone.name == name)
    }

    /// Find a tone by its exact name, for editing its pedals
    ///
    /// Use [`PackageData::rename_tone()`] to change the name.
    pub fn pedals_mut(&mut self, name: &str) -> Option<&mut BTreeMap<String, PedalSetting>> {
        self.tones
            .iter_mut()
            .find(|tone| tone.name == name)
            .map(|tone| &mut tone.pedals)
    }

    /// Append a freshly created tone with a unique default name
    pub fn add_tone(&mut self, catalog: &PedalCatalog) -> Result<&Tone, ConfigurationError> {
        let tone = Tone::create(self.tone_names(), catalog)?;
        debug!("Adding tone '{}'", tone.name);

        self.tones.push(tone);
        Ok(&self.tones[self.tones.len() - 1])
    }

    /// Append an existing tone, as long as its name is not taken yet
    pub fn push_tone(&mut self, tone: Tone) -> Result<(), EditError> {
        validate_tone_name(&tone.name)?;
        if self.tone(&tone.name).is_some() {
            return Err(EditError::DuplicateToneName(tone.name));
        }

        self.tones.push(tone);
        Ok(())
    }

    /// Rename a tone, repointing every arrangement that used the old name
    pub fn rename_tone(&mut self, old_name: &str, new_name: &str) -> Result<(), EditError> {
        let index = self.tone_index(old_name)?;
        if old_name == new_name {
            return Ok(());
        }

        validate_tone_name(new_name)?;
        if self.tone(new_name).is_some() {
            return Err(EditError::DuplicateToneName(new_name.to_owned()));
        }

        self.tones[index].name = new_name.to_owned();
        for arrangement in &mut self.arrangements {
            if arrangement.tone_name.as_deref() == Some(old_name) {
                arrangement.tone_name = Some(new_name.to_owned());
            }
        }

        debug!("Renamed tone '{old_name}' to '{new_name}'");
        Ok(())
    }

    /// Remove a tone, repointing its arrangements to the (new) first tone
    ///
    /// The last remaining tone can't be removed.
    pub fn remove_tone(&mut self, name: &str) -> Result<Tone, EditError> {
        let index = self.tone_index(name)?;
        if self.tones.len() == 1 {
            return Err(EditError::LastTone);
        }

        let tone = self.tones.remove(index);
        let first = self.tones[0].name.clone();
        for arrangement in &mut self.arrangements {
            if arrangement.tone_name.as_deref() == Some(name) {
                arrangement.tone_name = Some(first.clone());
            }
        }

        debug!("Removed tone '{name}', arrangements fall back to '{first}'");
        Ok(tone)
    }

    /// Add an arrangement, keeping vocal parts exclusive
    ///
    /// An arrangement without a (valid) tone is assigned the first tone.
    pub fn add_arrangement(&mut self, mut arrangement: Arrangement) -> Result<(), EditError> {
        if arrangement.is_vocal() && self.arrangements.iter().any(Arrangement::is_vocal) {
            return Err(EditError::MultipleVocals);
        }

        if !self.has_tone(arrangement.tone_name.as_deref()) {
            arrangement.tone_name = self.tones.first().map(|tone| tone.name.clone());
        }

        self.arrangements.push(arrangement);
        Ok(())
    }

    /// Remove the arrangement at `index`
    pub fn remove_arrangement(&mut self, index: usize) -> Result<Arrangement, EditError> {
        if index >= self.arrangements.len() {
            return Err(EditError::ArrangementOutOfRange(index));
        }

        Ok(self.arrangements.remove(index))
    }

    /// Assign an existing tone to the arrangement at `index`
    pub fn set_arrangement_tone(&mut self, index: usize, tone_name: &str) -> Result<(), EditError> {
        self.tone_index(tone_name)?;

        let arrangement = self
            .arrangements
            .get_mut(index)
            .ok_or(EditError::ArrangementOutOfRange(index))?;
        arrangement.tone_name = Some(tone_name.to_owned());

        Ok(())
    }

    /// Point every arrangement with an absent or unknown tone at the first tone
    pub(crate) fn repoint_dangling_tones(&mut self) {
        let Some(first) = self.tones.first().map(|tone| tone.name.clone()) else {
            return;
        };

        for index in 0..self.arrangements.len() {
            if !self.has_tone(self.arrangements[index].tone_name.as_deref()) {
                debug!(
                    "Arrangement '{}' has no valid tone, using '{first}'",
                    self.arrangements[index].name
                );
                self.arrangements[index].tone_name = Some(first.clone());
            }
        }
    }

    /// Verify the invariants of a package that didn't come through the builder
    pub(crate) fn check(&self) -> Result<(), EditError> {
        if self.tones.is_empty() {
            return Err(EditError::NoTones);
        }

        for (index, tone) in self.tones.iter().enumerate() {
            if self.tones[..index].iter().any(|other| other.name == tone.name) {
                return Err(EditError::DuplicateToneName(tone.name.clone()));
            }
        }

        if self.arrangements.iter().filter(|arr| arr.is_vocal()).count() > 1 {
            return Err(EditError::MultipleVocals);
        }

        Ok(())
    }

    fn has_tone(&self, name: Option<&str>) -> bool {
        name.is_some_and(|name| self.tone(name).is_some())
    }

    fn tone_index(&self, name: &str) -> Result<usize, EditError> {
        self.tones
            .iter()
            .position(|tone| tone.name == name)
            .ok_or_else(|| EditError::ToneNotFound(name.to_owned()))
    }
}

fn validate_tone_name(name: &str) -> Result<(), EditError> {
    if name.is_empty() {
        Err(EditError::EmptyToneName)
    } else {
        Ok(())
    }
}

/// Raw, unvalidated input for a [`PackageData`]
///
/// Text fields are kept as typed by the user; [`PackageFields::build()`] turns them
/// into a package or tells which field is wrong.
#[derive(Debug, Clone, Default)]
pub struct PackageFields {
    pub name: String,
    pub song_display_name: String,
    pub album: String,
    pub artist: String,
    pub year: String,
    pub average_tempo: String,
    pub app_id: String,
    pub album_art_path: PathBuf,
    pub ogg_path: PathBuf,
    pub arrangements: Vec<Arrangement>,
    pub tones: Vec<Tone>,
}

impl PackageFields {
    /// Validate the fields and assemble a [`PackageData`]
    ///
    /// Checks run in a fixed order and the first failure is returned, so a UI can
    /// always focus the same field for the same input. On success spaces in the
    /// internal name are replaced by underscores.
    pub fn build(self) -> Result<PackageData, BuildError> {
        if self.name.is_empty() {
            return Err(BuildError::MissingName);
        }
        if self.song_display_name.is_empty() {
            return Err(BuildError::MissingDisplayName);
        }
        if self.album.is_empty() {
            return Err(BuildError::MissingAlbum);
        }
        if self.artist.is_empty() {
            return Err(BuildError::MissingArtist);
        }
        let song_year = parse_integer(&self.year).ok_or(BuildError::InvalidYear)?;
        let average_tempo = parse_integer(&self.average_tempo).ok_or(BuildError::InvalidTempo)?;
        if self.app_id.is_empty() {
            return Err(BuildError::MissingAppId);
        }
        if !self.ogg_path.is_file() {
            return Err(BuildError::MissingAudio(self.ogg_path));
        }
        if self.arrangements.iter().filter(|arr| arr.is_vocal()).count() > 1 {
            return Err(BuildError::MultipleVocals);
        }
        if self.tones.is_empty() {
            return Err(BuildError::NoTones);
        }

        let mut package = PackageData {
            name: self.name.replace(' ', "_"),
            app_id: self.app_id,
            song_info: SongInfo {
                song_display_name: self.song_display_name,
                album: self.album,
                artist: self.artist,
                song_year,
                average_tempo,
            },
            album_art_path: self.album_art_path,
            ogg_path: self.ogg_path,
            arrangements: self.arrangements,
            tones: self.tones,
        };
        package.repoint_dangling_tones();

        Ok(package)
    }
}

fn parse_integer(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

/// The input field a [`BuildError`] is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    SongDisplayName,
    Album,
    Artist,
    Year,
    AverageTempo,
    AppId,
    OggPath,
    Arrangements,
    Tones,
}

/// A [`PackageFields`] could not be turned into a [`PackageData`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("The package name is missing")]
    MissingName,

    #[error("The song display name is missing")]
    MissingDisplayName,

    #[error("The album is missing")]
    MissingAlbum,

    #[error("The artist is missing")]
    MissingArtist,

    #[error("The year is not a whole number")]
    InvalidYear,

    #[error("The average tempo is not a whole number")]
    InvalidTempo,

    #[error("The application id is missing")]
    MissingAppId,

    #[error("The audio file {} does not exist", .0.display())]
    MissingAudio(PathBuf),

    #[error("Multiple vocal arrangements found")]
    MultipleVocals,

    #[error("A package needs at least one tone")]
    NoTones,
}

impl BuildError {
    /// The field the user should be pointed at
    pub fn field(&self) -> Field {
        match self {
            Self::MissingName => Field::Name,
            Self::MissingDisplayName => Field::SongDisplayName,
            Self::MissingAlbum => Field::Album,
            Self::MissingArtist => Field::Artist,
            Self::InvalidYear => Field::Year,
            Self::InvalidTempo => Field::AverageTempo,
            Self::MissingAppId => Field::AppId,
            Self::MissingAudio(_) => Field::OggPath,
            Self::MultipleVocals => Field::Arrangements,
            Self::NoTones => Field::Tones,
        }
    }
}

/// An edit to an existing [`PackageData`] was rejected; the package is unchanged
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("There is no tone named '{0}'")]
    ToneNotFound(String),

    #[error("A tone named '{0}' already exists")]
    DuplicateToneName(String),

    #[error("Tone names can't be empty")]
    EmptyToneName,

    #[error("The last tone of a package can't be removed")]
    LastTone,

    #[error("A package needs at least one tone")]
    NoTones,

    #[error("A package can only have one vocal arrangement")]
    MultipleVocals,

    #[error("There is no arrangement at index {0}")]
    ArrangementOutOfRange(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::ArrangementType;
    use tempfile::NamedTempFile;

    fn tone(name: &str) -> Tone {
        let mut tone = Tone::create([], PedalCatalog::builtin()).unwrap();
        tone.name = name.to_owned();
        tone
    }

    fn fields(ogg: &NamedTempFile) -> PackageFields {
        PackageFields {
            name: "My Song".to_owned(),
            song_display_name: "My Song".to_owned(),
            album: "Album".to_owned(),
            artist: "Artist".to_owned(),
            year: "2013".to_owned(),
            average_tempo: " 120 ".to_owned(),
            app_id: "248750".to_owned(),
            album_art_path: PathBuf::new(),
            ogg_path: ogg.path().to_owned(),
            arrangements: vec![
                Arrangement::new(ArrangementType::Lead, "lead.sng", "lead.xml").with_tone("A"),
                Arrangement::new(ArrangementType::Rhythm, "rhythm.sng", "rhythm.xml")
                    .with_tone("A"),
                Arrangement::new(ArrangementType::Bass, "bass.sng", "bass.xml").with_tone("B"),
            ],
            tones: vec![tone("A"), tone("B")],
        }
    }

    #[test]
    fn build() {
        let ogg = NamedTempFile::new().unwrap();
        let package = fields(&ogg).build().unwrap();

        assert_eq!(package.name, "My_Song");
        assert_eq!(package.song_info.song_display_name, "My Song");
        assert_eq!(package.song_info.song_year, 2013);
        assert_eq!(package.song_info.average_tempo, 120);
        assert_eq!(package.arrangements().len(), 3);
        assert_eq!(package.tones().len(), 2);
    }

    #[test]
    fn build_validation_order() {
        let ogg = NamedTempFile::new().unwrap();

        let mut input = fields(&ogg);
        input.name.clear();
        input.year = "nineteen".to_owned();
        assert_eq!(input.build().unwrap_err().field(), Field::Name);

        let mut input = fields(&ogg);
        input.artist.clear();
        input.app_id.clear();
        assert_eq!(input.build(), Err(BuildError::MissingArtist));

        let mut input = fields(&ogg);
        input.year = "19x9".to_owned();
        input.average_tempo = "fast".to_owned();
        assert_eq!(input.build(), Err(BuildError::InvalidYear));

        let mut input = fields(&ogg);
        input.average_tempo = "fast".to_owned();
        assert_eq!(input.build(), Err(BuildError::InvalidTempo));

        let mut input = fields(&ogg);
        input.app_id.clear();
        assert_eq!(input.build(), Err(BuildError::MissingAppId));

        let mut input = fields(&ogg);
        input.ogg_path = ogg.path().with_extension("missing");
        assert_eq!(input.build().unwrap_err().field(), Field::OggPath);
    }

    #[test]
    fn build_rejects_multiple_vocals() {
        let ogg = NamedTempFile::new().unwrap();

        let mut input = fields(&ogg);
        input
            .arrangements
            .push(Arrangement::new(ArrangementType::Vocal, "v1.sng", "v1.xml"));
        input
            .arrangements
            .push(Arrangement::new(ArrangementType::Vocal, "v2.sng", "v2.xml"));
        assert_eq!(input.build(), Err(BuildError::MultipleVocals));
    }

    #[test]
    fn build_repoints_dangling_tones() {
        let ogg = NamedTempFile::new().unwrap();

        let mut input = fields(&ogg);
        input.arrangements[1].tone_name = Some("Gone".to_owned());
        input.arrangements[2].tone_name = None;

        let package = input.build().unwrap();
        assert_eq!(package.arrangements()[1].tone_name.as_deref(), Some("A"));
        assert_eq!(package.arrangements()[2].tone_name.as_deref(), Some("A"));
    }

    #[test]
    fn add_tone_is_unique() {
        let ogg = NamedTempFile::new().unwrap();

        let mut input = fields(&ogg);
        input.tones = vec![tone("Default"), tone("Default 1")];
        let mut package = input.build().unwrap();

        let added = package.add_tone(PedalCatalog::builtin()).unwrap();
        assert_eq!(added.name, "Default 2");
        assert_eq!(package.tones().len(), 3);
    }

    #[test]
    fn rename_tone_propagates() {
        let ogg = NamedTempFile::new().unwrap();
        let mut package = fields(&ogg).build().unwrap();

        package.rename_tone("A", "C").unwrap();
        assert_eq!(package.tones()[0].name, "C");
        assert_eq!(package.arrangements()[0].tone_name.as_deref(), Some("C"));
        assert_eq!(package.arrangements()[1].tone_name.as_deref(), Some("C"));
        assert_eq!(package.arrangements()[2].tone_name.as_deref(), Some("B"));
        assert!(package
            .arrangements()
            .iter()
            .all(|arr| arr.tone_name.as_deref() != Some("A")));

        assert_eq!(
            package.rename_tone("C", "B"),
            Err(EditError::DuplicateToneName("B".to_owned()))
        );
        assert_eq!(package.rename_tone("C", ""), Err(EditError::EmptyToneName));
        assert_eq!(
            package.rename_tone("A", "D"),
            Err(EditError::ToneNotFound("A".to_owned()))
        );
        assert_eq!(package.rename_tone("C", "C"), Ok(()));
    }

    #[test]
    fn remove_tone_repoints_to_first() {
        let ogg = NamedTempFile::new().unwrap();
        let mut package = fields(&ogg).build().unwrap();

        let removed = package.remove_tone("A").unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(package.tones().len(), 1);
        assert!(package
            .arrangements()
            .iter()
            .all(|arr| arr.tone_name.as_deref() == Some("B")));
    }

    #[test]
    fn remove_last_tone_is_refused() {
        let ogg = NamedTempFile::new().unwrap();

        let mut input = fields(&ogg);
        input.tones.truncate(1);
        let mut package = input.build().unwrap();

        assert_eq!(package.remove_tone("A"), Err(EditError::LastTone));
        assert_eq!(package.tones().len(), 1);
    }

    #[test]
    fn arrangements() {
        let ogg = NamedTempFile::new().unwrap();
        let mut package = fields(&ogg).build().unwrap();

        let vocals = Arrangement::new(ArrangementType::Vocal, "v.sng", "v.xml");
        package.add_arrangement(vocals.clone()).unwrap();
        assert_eq!(package.arrangements()[3].tone_name.as_deref(), Some("A"));
        assert_eq!(package.add_arrangement(vocals), Err(EditError::MultipleVocals));

        package.set_arrangement_tone(3, "B").unwrap();
        assert_eq!(package.arrangements()[3].tone_name.as_deref(), Some("B"));
        assert_eq!(
            package.set_arrangement_tone(3, "Z"),
            Err(EditError::ToneNotFound("Z".to_owned()))
        );

        let removed = package.remove_arrangement(3).unwrap();
        assert!(removed.is_vocal());
        assert_eq!(
            package.remove_arrangement(3),
            Err(EditError::ArrangementOutOfRange(3))
        );
    }

    #[test]
    fn song_files_only_expose_paths() {
        let ogg = NamedTempFile::new().unwrap();
        let mut package = fields(&ogg).build().unwrap();
        package
            .add_arrangement(Arrangement::new(ArrangementType::Vocal, "v.sng", "v.xml"))
            .unwrap();

        for song_file in package.song_files_mut() {
            song_file.file = PathBuf::from("moved").join(&song_file.file);
        }

        assert_eq!(package.song_files_mut().count(), 8);
        assert_eq!(
            package.arrangements()[0].song_xml.file,
            PathBuf::from("moved/lead.xml")
        );
        assert_eq!(package.arrangements()[2].tone_name.as_deref(), Some("B"));
        assert_eq!(
            package
                .arrangements()
                .iter()
                .filter(|arrangement| arrangement.is_vocal())
                .count(),
            1
        );
        assert_eq!(package.check(), Ok(()));
    }
}
