//! Saving and loading package projects as portable template files
//!
//! A template is a pretty-printed JSON document with one key per [`PackageData`] field.
//! Asset paths inside it are stored [relative](uri) to the directory holding the template,
//! so a project folder keeps working after it's moved to another location or machine.
//!
//! ```no_run
//! # use rsdlc::template;
//! let package = template::load("cherub_rock.dlc.json")?;
//! template::save(&package, "backup/cherub_rock.dlc.json")?;
//! # Ok::<(), rsdlc::template::TemplateError>(())
//! ```

pub mod uri;

use crate::package::{EditError, PackageData};
use log::{debug, info};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{absolute, Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;
use uri::{clean, relative_uri, resolve_uri};

/// The conventional extension for template files
pub const EXTENSION: &str = "dlc.json";

/// Write a package to a template file
///
/// The package itself is left untouched: paths are made relative on a copy that only
/// exists for serialization. The document is written to a temporary file next to the
/// destination and then renamed over it, so an existing template is either replaced
/// whole or left as it was.
pub fn save<P>(package: &PackageData, path: P) -> Result<(), TemplateError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let base_dir = base_dir(path)?;

    let mut relative = package.clone();
    map_paths(&mut relative, |file| {
        let uri = relative_uri(&base_dir, &absolute(file)?);
        debug!("{} => {uri}", file.display());
        Ok(PathBuf::from(uri))
    })?;

    let json = serde_json::to_string_pretty(&relative)?;

    let mut file = NamedTempFile::new_in(&base_dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
    }
    file.persist(path).map_err(|err| err.error)?;

    info!("Saved template {}", path.display());
    Ok(())
}

/// Read a package from a template file
///
/// Relative asset paths are resolved against the template's directory. Arrangements that
/// don't name a tone (or name one that doesn't exist) get the first tone.
pub fn load<P>(path: P) -> Result<PackageData, TemplateError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut package: PackageData = serde_json::from_reader(reader)?;

    let base_dir = base_dir(path)?;
    map_paths(&mut package, |file| {
        Ok(resolve_uri(&base_dir, &file.to_string_lossy()))
    })?;

    package.repoint_dangling_tones();
    package.check()?;

    info!("Loaded template {}", path.display());
    Ok(package)
}

/// The absolute, dot-free directory a template's relative paths are anchored to
fn base_dir(path: &Path) -> Result<PathBuf, io::Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => absolute(parent)?,
        _ => absolute(".")?,
    };

    Ok(clean(&dir))
}

/// Rewrite every non-empty asset path in a package
fn map_paths<F>(package: &mut PackageData, mut map: F) -> Result<(), io::Error>
where
    F: FnMut(&Path) -> Result<PathBuf, io::Error>,
{
    let mut apply = |file: &mut PathBuf| -> Result<(), io::Error> {
        if !file.as_os_str().is_empty() {
            *file = map(file.as_path())?;
        }
        Ok(())
    };

    apply(&mut package.album_art_path)?;
    apply(&mut package.ogg_path)?;
    for song_file in package.song_files_mut() {
        apply(&mut song_file.file)?;
    }

    Ok(())
}

/// Errors that can occur saving or loading a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Any failure that has to do with I/O
    #[error("Something failed with I/O")]
    Io(#[from] io::Error),

    /// The template was not valid JSON, or not shaped like a package
    #[error("The template could not be (de)serialized")]
    Json(#[from] serde_json::Error),

    /// The template parsed, but describes a package that breaks its invariants
    #[error("The template describes an invalid package")]
    Invalid(#[from] EditError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arrangement::{Arrangement, ArrangementType},
        package::PackageFields,
        tone::{pedal::PedalCatalog, Tone},
    };
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn package(dir: &Path, album_art: bool) -> Result<PackageData> {
        let assets = dir.join("My Song 100%");
        fs::create_dir_all(&assets)?;
        fs::write(assets.join("audio file.ogg"), b"OggS")?;

        let mut clean = Tone::create([], PedalCatalog::builtin())?;
        clean.name = "Clean".to_owned();
        let mut lead = Tone::create([], PedalCatalog::builtin())?;
        lead.name = "Lead".to_owned();

        let fields = PackageFields {
            name: "My Song".to_owned(),
            song_display_name: "My Song".to_owned(),
            album: "Album".to_owned(),
            artist: "Artist".to_owned(),
            year: "1993".to_owned(),
            average_tempo: "130".to_owned(),
            app_id: "248750".to_owned(),
            album_art_path: if album_art {
                dir.join("art").join("cover 50%.dds")
            } else {
                PathBuf::new()
            },
            ogg_path: assets.join("audio file.ogg"),
            arrangements: vec![
                Arrangement::new(
                    ArrangementType::Lead,
                    assets.join("lead.sng"),
                    assets.join("lead arr.xml"),
                )
                .with_tone("Lead"),
                Arrangement::new(
                    ArrangementType::Bass,
                    dir.join("bass.sng"),
                    dir.join("bass.xml"),
                )
                .with_tone("Clean"),
            ],
            tones: vec![clean, lead],
        };

        Ok(fields.build()?)
    }

    #[test]
    fn round_trip() -> Result<()> {
        let temp = tempdir()?;
        let dir = absolute(temp.path())?;
        let package = package(&dir, true)?;
        let before = package.clone();

        let path = dir.join("templates").join("song.dlc.json");
        fs::create_dir_all(path.parent().unwrap())?;
        save(&package, &path)?;

        // The live package keeps its absolute paths
        assert_eq!(package, before);

        let text = fs::read_to_string(&path)?;
        assert!(text.contains("../My%20Song%20100%25/audio%20file.ogg"));
        assert!(text.contains("../art/cover%2050%25.dds"));
        assert!(!text.contains(&*dir.to_string_lossy()));

        assert_eq!(load(&path)?, package);
        Ok(())
    }

    #[test]
    fn moved_project_resolves_against_new_location() -> Result<()> {
        let temp = tempdir()?;
        let dir = absolute(temp.path())?;
        let package = package(&dir, true)?;

        save(&package, dir.join("song.dlc.json"))?;

        let moved = dir.join("moved");
        fs::create_dir_all(&moved)?;
        fs::copy(dir.join("song.dlc.json"), moved.join("song.dlc.json"))?;

        let loaded = load(moved.join("song.dlc.json"))?;
        assert_eq!(
            loaded.ogg_path,
            moved.join("My Song 100%").join("audio file.ogg")
        );
        assert_eq!(loaded.arrangements()[1].song_xml.file, moved.join("bass.xml"));
        Ok(())
    }

    #[test]
    fn save_through_parent_segments() -> Result<()> {
        let temp = tempdir()?;
        let dir = absolute(temp.path())?;
        let package = package(&dir, true)?;
        fs::create_dir_all(dir.join("sub"))?;

        save(&package, dir.join("sub").join("..").join("song.dlc.json"))?;

        let text = fs::read_to_string(dir.join("song.dlc.json"))?;
        assert!(text.contains("\"My%20Song%20100%25/audio%20file.ogg\""));
        assert!(!text.contains(".."));

        assert_eq!(load(dir.join("song.dlc.json"))?, package);
        assert_eq!(load(dir.join("sub").join("..").join("song.dlc.json"))?, package);
        Ok(())
    }

    #[test]
    fn overwrite_replaces_whole_file() -> Result<()> {
        let temp = tempdir()?;
        let dir = absolute(temp.path())?;
        let mut package = package(&dir, false)?;

        let path = dir.join("song.dlc.json");
        fs::write(&path, "x".repeat(64 * 1024))?;
        save(&package, &path)?;
        assert_eq!(load(&path)?, package);

        package.add_tone(PedalCatalog::builtin())?;
        save(&package, &path)?;
        assert_eq!(load(&path)?, package);

        // Only the template is left in its folder
        let names: Vec<_> = fs::read_dir(&dir)?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<_, _>>()?;
        let json = names
            .iter()
            .filter(|name| name.to_string_lossy().ends_with(".json"))
            .count();
        assert_eq!(json, 1);
        assert!(!names.iter().any(|name| name.to_string_lossy().starts_with(".tmp")));
        Ok(())
    }

    #[test]
    fn save_into_missing_folder_fails() -> Result<()> {
        let temp = tempdir()?;
        let dir = absolute(temp.path())?;
        let package = package(&dir, false)?;

        let path = dir.join("missing").join("song.dlc.json");
        assert!(matches!(save(&package, &path), Err(TemplateError::Io(_))));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn empty_album_art() -> Result<()> {
        let temp = tempdir()?;
        let dir = absolute(temp.path())?;
        let package = package(&dir, false)?;

        let path = dir.join("song.dlc.json");
        save(&package, &path)?;

        let loaded = load(&path)?;
        assert!(loaded.album_art_path.as_os_str().is_empty());
        assert_eq!(loaded, package);
        Ok(())
    }

    #[test]
    fn missing_tone_defaults_to_first() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("old.dlc.json");
        fs::write(
            &path,
            r#"{
                "name": "Old",
                "app_id": "248750",
                "song_info": {
                    "song_display_name": "Old",
                    "album": "Album",
                    "artist": "Artist",
                    "song_year": 2012,
                    "average_tempo": 100
                },
                "ogg_path": "old%20song.ogg",
                "arrangements": [
                    {
                        "arrangement_type": "Lead",
                        "song_file": { "file": "lead.sng" },
                        "song_xml": { "file": "lead.xml" }
                    }
                ],
                "tones": [{ "name": "Crunch" }, { "name": "Clean" }],
                "unknown_field": true
            }"#,
        )?;

        let package = load(&path)?;
        assert_eq!(package.arrangements()[0].tone_name.as_deref(), Some("Crunch"));
        assert_eq!(package.tones()[0].volume, -12.0);
        assert_eq!(
            package.ogg_path,
            absolute(dir.path())?.join("old song.ogg")
        );
        assert!(package.album_art_path.as_os_str().is_empty());
        Ok(())
    }

    #[test]
    fn invalid_templates() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.dlc.json");

        fs::write(&path, "{ not json")?;
        assert!(matches!(load(&path), Err(TemplateError::Json(_))));

        fs::write(
            &path,
            r#"{
                "name": "Empty",
                "app_id": "1",
                "song_info": {
                    "song_display_name": "E", "album": "A", "artist": "A",
                    "song_year": 1, "average_tempo": 1
                },
                "ogg_path": "e.ogg",
                "tones": []
            }"#,
        )?;
        assert!(matches!(
            load(&path),
            Err(TemplateError::Invalid(EditError::NoTones))
        ));

        assert!(matches!(
            load(dir.path().join("missing.dlc.json")),
            Err(TemplateError::Io(_))
        ));
        Ok(())
    }
}
