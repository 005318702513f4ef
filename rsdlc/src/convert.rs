//! Re-targeting built packages from one platform to another
//!
//! The byte-level conversion is done by a [`PackageCodec`] supplied by the caller. The
//! [`Converter`] wraps it with the checks around a batch of packages:
//!
//! * converting to the same platform, or from/to [`GamePlatform::None`](crate::platform::GamePlatform::None),
//!   aborts the whole batch before any file is touched
//! * each file's name is checked against the source platform's naming convention; a
//!   [`MismatchPrompt`] decides whether a mismatching file is forced through or skipped
//! * a codec failure is recorded for that file and the batch moves on
//!
//! ```
//! # use rsdlc::{convert::{Converter, Decision}, platform::{GamePlatform, GameVersion, Platform}};
//! # use std::path::Path;
//! let codec = |_file: &Path, _: Platform, _: Platform, _: &str| -> Result<(), String> {
//!     Ok(())
//! };
//!
//! let report = Converter::new(codec).convert(
//!     ["cherub_rock_p.psarc"],
//!     Platform::new(GamePlatform::Pc, GameVersion::RS2014),
//!     Platform::new(GamePlatform::XBox360, GameVersion::RS2014),
//!     "248750",
//!     Decision::Skip,
//! )?;
//!
//! assert!(report.is_success());
//! println!("{report}");
//! # Ok::<(), rsdlc::convert::ConvertError>(())
//! ```

use crate::platform::{Platform, PlatformError};
use log::{debug, info, warn};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// The low-level converter for a single package file
pub trait PackageCodec {
    /// Convert one package, returning a human-readable message on failure
    fn convert(
        &self,
        source_file: &Path,
        source: Platform,
        target: Platform,
        app_id: &str,
    ) -> Result<(), String>;
}

impl<F> PackageCodec for F
where
    F: Fn(&Path, Platform, Platform, &str) -> Result<(), String>,
{
    fn convert(
        &self,
        source_file: &Path,
        source: Platform,
        target: Platform,
        app_id: &str,
    ) -> Result<(), String> {
        self(source_file, source, target, app_id)
    }
}

/// What to do with a file that doesn't follow the source platform's naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Try to convert it anyway
    Force,

    /// Leave it out of the batch
    Skip,
}

/// A file name that didn't match the source platform's convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: PathBuf,
    pub platform: Platform,
    pub expected_token: &'static str,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = self.path.file_name().unwrap_or_default().to_string_lossy();
        write!(
            f,
            "Source package '{name}' doesn't look like a {} package (expected the name to end in '{}')",
            self.platform.platform, self.expected_token
        )
    }
}

/// Asks whether a mismatching file should be forced through or skipped
pub trait MismatchPrompt {
    fn decide(&mut self, mismatch: &Mismatch) -> Decision;
}

impl<F> MismatchPrompt for F
where
    F: FnMut(&Mismatch) -> Decision,
{
    fn decide(&mut self, mismatch: &Mismatch) -> Decision {
        self(mismatch)
    }
}

/// Always make the same decision
impl MismatchPrompt for Decision {
    fn decide(&mut self, _: &Mismatch) -> Decision {
        *self
    }
}

/// Converts batches of packages with a [`PackageCodec`]
pub struct Converter<C> {
    codec: C,
}

impl<C> Converter<C>
where
    C: PackageCodec,
{
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Convert a batch of package files from `source` to `target`
    ///
    /// Only the upfront platform checks produce an `Err`. Whatever goes wrong for an
    /// individual file ends up in the returned [`ConversionReport`].
    pub fn convert<I, P, M>(
        &self,
        files: I,
        source: Platform,
        target: Platform,
        app_id: &str,
        mut prompt: M,
    ) -> Result<ConversionReport, ConvertError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        M: MismatchPrompt,
    {
        if source == target {
            return Err(ConvertError::SamePlatform(source));
        }

        target.naming_tokens()?;
        let expected_token = source.suffix_token()?;

        info!("Converting packages from {source} to {target}");
        let mut report = ConversionReport::new(source, target);

        for file in files {
            let path = file.as_ref();

            if !source.matches_naming(path)? {
                let mismatch = Mismatch {
                    path: path.to_owned(),
                    platform: source,
                    expected_token,
                };
                warn!("{mismatch}");

                match prompt.decide(&mismatch) {
                    Decision::Skip => {
                        debug!("Skipping {}", path.display());
                        report.skipped.push(path.to_owned());
                        continue;
                    }
                    Decision::Force => report.messages.push(FileMessage {
                        path: path.to_owned(),
                        kind: MessageKind::Mismatch,
                        message: mismatch.to_string(),
                    }),
                }
            }

            debug!("Converting {}", path.display());
            match self.codec.convert(path, source, target, app_id) {
                Ok(()) => report.converted.push(path.to_owned()),
                Err(message) => {
                    warn!("Converting {} failed: {message}", path.display());
                    report.messages.push(FileMessage {
                        path: path.to_owned(),
                        kind: MessageKind::Failed,
                        message,
                    });
                }
            }
        }

        info!(
            "Converted {} package(s), skipped {}, {} message(s)",
            report.converted.len(),
            report.skipped.len(),
            report.messages.len()
        );

        Ok(report)
    }
}

/// The kind of problem a [`FileMessage`] reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The file was forced through despite its name
    Mismatch,

    /// The codec failed to convert the file
    Failed,
}

/// A problem with one file of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMessage {
    pub path: PathBuf,
    pub kind: MessageKind,
    pub message: String,
}

impl fmt::Display for FileMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            MessageKind::Mismatch => write!(f, "{}", self.message),
            MessageKind::Failed => write!(
                f,
                "{}: {}",
                self.path.file_name().unwrap_or_default().to_string_lossy(),
                self.message
            ),
        }
    }
}

/// The outcome of a conversion batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub source: Platform,
    pub target: Platform,

    /// Files the codec converted successfully
    pub converted: Vec<PathBuf>,

    /// Files left out because of their name
    pub skipped: Vec<PathBuf>,

    /// Per-file problems, in the order the files were processed
    pub messages: Vec<FileMessage>,
}

impl ConversionReport {
    fn new(source: Platform, target: Platform) -> Self {
        Self {
            source,
            target,
            converted: Vec::new(),
            skipped: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Did every attempted file convert without any message?
    pub fn is_success(&self) -> bool {
        self.messages.is_empty()
    }

    /// The messages for files the codec failed on
    pub fn failures(&self) -> impl Iterator<Item = &FileMessage> {
        self.messages
            .iter()
            .filter(|message| message.kind == MessageKind::Failed)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DLC was converted from '{}' to '{}'",
            self.source.platform, self.target.platform
        )?;

        if self.is_success() {
            return write!(f, ".");
        }

        write!(f, " with errors. See below:")?;
        for message in &self.messages {
            write!(f, "\n{message}")?;
        }

        Ok(())
    }
}

/// Reasons a whole conversion batch is refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Source and target are the same platform
    #[error("The source and target platform should be different ({0})")]
    SamePlatform(Platform),

    /// The source or target has no known naming convention
    #[error("The platform can't be converted from or to")]
    UnknownPlatform(#[from] PlatformError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{GamePlatform, GameVersion};
    use std::cell::RefCell;

    /// A codec that records its calls and fails for file names containing "bad"
    #[derive(Default)]
    struct RecordingCodec {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl PackageCodec for RecordingCodec {
        fn convert(&self, file: &Path, _: Platform, _: Platform, _: &str) -> Result<(), String> {
            self.calls.borrow_mut().push(file.to_owned());

            if file.to_string_lossy().contains("bad") {
                Err("Could not read the package header".to_owned())
            } else {
                Ok(())
            }
        }
    }

    fn rs2014(platform: GamePlatform) -> Platform {
        Platform::new(platform, GameVersion::RS2014)
    }

    #[test]
    fn same_platform_is_refused() {
        let converter = Converter::new(RecordingCodec::default());

        let result = converter.convert(
            ["a_p.psarc", "b_p.psarc"],
            rs2014(GamePlatform::Pc),
            rs2014(GamePlatform::Pc),
            "248750",
            Decision::Force,
        );

        assert_eq!(
            result,
            Err(ConvertError::SamePlatform(rs2014(GamePlatform::Pc)))
        );
        assert!(converter.codec.calls.borrow().is_empty());
    }

    #[test]
    fn unknown_target_is_refused() {
        let converter = Converter::new(RecordingCodec::default());

        let result = converter.convert(
            ["a_p.psarc"],
            rs2014(GamePlatform::Pc),
            Platform::none(),
            "248750",
            Decision::Force,
        );

        assert_eq!(
            result,
            Err(ConvertError::UnknownPlatform(PlatformError::NoConvention(
                GamePlatform::None
            )))
        );
        assert!(converter.codec.calls.borrow().is_empty());
    }

    #[test]
    fn batch_partial_failure() {
        let converter = Converter::new(RecordingCodec::default());

        let report = converter
            .convert(
                ["one_p.psarc", "bad_p.psarc", "three_p.psarc"],
                rs2014(GamePlatform::Pc),
                rs2014(GamePlatform::Mac),
                "248750",
                Decision::Skip,
            )
            .unwrap();

        assert_eq!(converter.codec.calls.borrow().len(), 3);
        assert_eq!(
            report.converted,
            vec![PathBuf::from("one_p.psarc"), PathBuf::from("three_p.psarc")]
        );
        assert!(!report.is_success());

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, PathBuf::from("bad_p.psarc"));

        assert_eq!(
            report.to_string(),
            "DLC was converted from 'Pc' to 'Mac' with errors. See below:\n\
             bad_p.psarc: Could not read the package header"
        );
    }

    #[test]
    fn success_summary() {
        let converter = Converter::new(RecordingCodec::default());

        let report = converter
            .convert(
                ["song_xbox"],
                rs2014(GamePlatform::XBox360),
                rs2014(GamePlatform::Pc),
                "248750",
                Decision::Skip,
            )
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.to_string(), "DLC was converted from 'XBox360' to 'Pc'.");
    }

    #[test]
    fn mismatch_skip_and_force() {
        let converter = Converter::new(RecordingCodec::default());
        let mut asked = Vec::new();

        let report = converter
            .convert(
                ["song_p", "song", "other"],
                rs2014(GamePlatform::Pc),
                rs2014(GamePlatform::PS3),
                "248750",
                |mismatch: &Mismatch| {
                    asked.push(mismatch.path.clone());
                    if mismatch.path == Path::new("song") {
                        Decision::Skip
                    } else {
                        Decision::Force
                    }
                },
            )
            .unwrap();

        assert_eq!(asked, vec![PathBuf::from("song"), PathBuf::from("other")]);
        assert_eq!(report.skipped, vec![PathBuf::from("song")]);
        assert_eq!(
            *converter.codec.calls.borrow(),
            vec![PathBuf::from("song_p"), PathBuf::from("other")]
        );

        // A forced file converts, but its mismatch is still reported
        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].kind, MessageKind::Mismatch);
        assert_eq!(report.failures().count(), 0);
        assert!(report.messages[0].message.contains("'other'"));
    }

    #[test]
    fn ps3_sources() {
        let converter = Converter::new(RecordingCodec::default());

        let report = converter
            .convert(
                ["song_ps3.psarc.edat", "song_ps3.psarc"],
                rs2014(GamePlatform::PS3),
                rs2014(GamePlatform::Pc),
                "248750",
                Decision::Skip,
            )
            .unwrap();

        assert_eq!(report.converted, vec![PathBuf::from("song_ps3.psarc.edat")]);
        assert_eq!(report.skipped, vec![PathBuf::from("song_ps3.psarc")]);
    }

    #[test]
    fn closure_codec() {
        let codec = |file: &Path, _: Platform, target: Platform, app_id: &str| {
            if target.platform == GamePlatform::Mac && app_id.is_empty() {
                Err(format!("{} needs an app id", file.display()))
            } else {
                Ok(())
            }
        };

        let report = Converter::new(codec)
            .convert(
                ["song_p.psarc"],
                rs2014(GamePlatform::Pc),
                rs2014(GamePlatform::Mac),
                "",
                Decision::Force,
            )
            .unwrap();

        assert_eq!(report.failures().count(), 1);
    }
}
