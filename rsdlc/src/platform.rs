//! Target systems and their file-naming conventions

use std::{
    fmt,
    path::Path,
    str::FromStr,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of system a package is built for
///
/// [`GamePlatform::None`] is a sentinel for "nothing selected". It has no naming
/// convention and is never a valid conversion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePlatform {
    Pc,
    Mac,
    XBox360,
    PS3,
    None,
}

impl GamePlatform {
    /// Every concrete platform, in the order they are usually presented
    pub const ALL: [GamePlatform; 4] = [Self::Pc, Self::Mac, Self::XBox360, Self::PS3];

    /// The label used for display and parsing
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pc => "Pc",
            Self::Mac => "Mac",
            Self::XBox360 => "XBox360",
            Self::PS3 => "PS3",
            Self::None => "None",
        }
    }

    /// The naming convention for this kind of platform, or `None` for the sentinel
    fn convention(&self) -> Option<&'static Convention> {
        match self {
            Self::Pc => Some(&PC),
            Self::Mac => Some(&MAC),
            Self::XBox360 => Some(&XBOX360),
            Self::PS3 => Some(&PS3),
            Self::None => None,
        }
    }
}

impl fmt::Display for GamePlatform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for GamePlatform {
    type Err = ParseLabelError;

    fn from_str(str: &str) -> Result<Self, Self::Err> {
        [Self::Pc, Self::Mac, Self::XBox360, Self::PS3, Self::None]
            .into_iter()
            .find(|platform| platform.label().eq_ignore_ascii_case(str))
            .ok_or_else(|| ParseLabelError(str.to_owned()))
    }
}

/// The edition of the game a package targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameVersion {
    RS2012,
    RS2014,
    None,
}

impl GameVersion {
    /// The label used for display and parsing
    pub fn label(&self) -> &'static str {
        match self {
            Self::RS2012 => "RS2012",
            Self::RS2014 => "RS2014",
            Self::None => "None",
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for GameVersion {
    type Err = ParseLabelError;

    fn from_str(str: &str) -> Result<Self, Self::Err> {
        [Self::RS2012, Self::RS2014, Self::None]
            .into_iter()
            .find(|version| version.label().eq_ignore_ascii_case(str))
            .ok_or_else(|| ParseLabelError(str.to_owned()))
    }
}

/// Per-platform file naming data
struct Convention {
    /// Directory name, audio folder name and filename suffix, in that order
    tokens: [&'static str; 3],

    /// The extension of a built package, if the platform uses one
    package_extension: Option<&'static str>,

    /// An extra container extension wrapped around the package (PS3 `.edat`)
    container_extension: Option<&'static str>,
}

const PC: Convention = Convention {
    tokens: ["Windows", "Generic", "_p"],
    package_extension: Some("psarc"),
    container_extension: None,
};

const MAC: Convention = Convention {
    tokens: ["Mac", "MacOS", "_m"],
    package_extension: Some("psarc"),
    container_extension: None,
};

const XBOX360: Convention = Convention {
    tokens: ["XBox360", "XBox360", "_xbox"],
    package_extension: None,
    container_extension: None,
};

const PS3: Convention = Convention {
    tokens: ["PS3", "PS3", "_ps3"],
    package_extension: Some("psarc"),
    container_extension: Some("edat"),
};

/// A (platform kind, game version) pair
///
/// Two platforms are only equal when both the kind and the version match.
///
/// ```
/// # use rsdlc::platform::{GamePlatform, GameVersion, Platform};
/// let pc = Platform::new(GamePlatform::Pc, GameVersion::RS2014);
/// assert_eq!(pc.suffix_token()?, "_p");
/// assert!(pc.matches_naming("cherub_rock_p.psarc")?);
/// # Ok::<(), rsdlc::platform::PlatformError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub platform: GamePlatform,
    pub version: GameVersion,
}

impl Platform {
    /// Index of the filename-suffix token in [`Platform::naming_tokens()`]
    pub const SUFFIX_TOKEN_INDEX: usize = 2;

    pub fn new(platform: GamePlatform, version: GameVersion) -> Self {
        Self { platform, version }
    }

    /// The "nothing selected" platform
    pub fn none() -> Self {
        Self::new(GamePlatform::None, GameVersion::None)
    }

    /// The ordered naming-convention tokens for this platform
    ///
    /// Index 2 is the filename suffix used to recognise packages built for it.
    pub fn naming_tokens(&self) -> Result<&'static [&'static str], PlatformError> {
        Ok(&self.convention()?.tokens)
    }

    /// The filename suffix packages for this platform carry (e.g. `_p`)
    pub fn suffix_token(&self) -> Result<&'static str, PlatformError> {
        Ok(self.naming_tokens()?[Self::SUFFIX_TOKEN_INDEX])
    }

    /// The extension of a built package on this platform, if any
    pub fn package_extension(&self) -> Result<Option<&'static str>, PlatformError> {
        Ok(self.convention()?.package_extension)
    }

    /// Does a file name follow this platform's naming convention?
    ///
    /// The final extension is ignored, after which the name must end in the
    /// platform's [suffix token](Platform::suffix_token).
    pub fn matches_naming<P>(&self, path: P) -> Result<bool, PlatformError>
    where
        P: AsRef<Path>,
    {
        self.matches_token(path, self.suffix_token()?)
    }

    /// Does a file name end in `token`, following this platform's naming rules?
    ///
    /// PS3 packages live inside an extra container, so a PS3 name is stripped of the
    /// `.edat` container extension and then of the nested `.psarc` extension before
    /// comparing. Other platforms only lose their final extension.
    pub fn matches_token<P>(&self, path: P, token: &str) -> Result<bool, PlatformError>
    where
        P: AsRef<Path>,
    {
        let convention = self.convention()?;
        let path = path.as_ref();

        let stem = match convention.container_extension {
            Some(container) => {
                if !has_extension(path, container) {
                    return Ok(false);
                }

                let inner = Path::new(path.file_stem().unwrap_or_default());
                match convention.package_extension {
                    Some(extension) if has_extension(inner, extension) => {
                        inner.file_stem().unwrap_or_default()
                    }
                    _ => inner.as_os_str(),
                }
            }
            None => path.file_stem().unwrap_or_default(),
        };

        Ok(stem.to_string_lossy().ends_with(token))
    }

    fn convention(&self) -> Result<&'static Convention, PlatformError> {
        self.platform
            .convention()
            .ok_or(PlatformError::NoConvention(self.platform))
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.platform, self.version)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    match path.extension() {
        Some(ext) => ext.eq_ignore_ascii_case(extension),
        None => false,
    }
}

/// Errors for operations that need a concrete platform
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The sentinel [`GamePlatform::None`] was used where a real platform is required
    #[error("Platform {0} has no naming convention")]
    NoConvention(GamePlatform),
}

/// A platform or version label could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown label '{0}'")]
pub struct ParseLabelError(pub String);
