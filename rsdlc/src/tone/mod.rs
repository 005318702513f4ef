//! Tones: named effect chains assignable to arrangements

pub mod pedal;

use pedal::{PedalCatalog, PedalSetting};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A named chain of pedal settings
///
/// Every slot (e.g. `Amp`, `Cabinet`, `PrePedal1`) holds at most one [`PedalSetting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub name: String,

    #[serde(default = "Tone::default_volume")]
    pub volume: f32,

    #[serde(default)]
    pub pedals: BTreeMap<String, PedalSetting>,
}

impl Tone {
    /// The name new tones start from
    pub const DEFAULT_NAME: &'static str = "Default";

    /// The catalog key of the amp every new tone starts with
    pub const DEFAULT_AMP: &'static str = "Amp_Fusion";

    /// The catalog key of the cabinet every new tone starts with
    pub const DEFAULT_CABINET: &'static str = "Cab_2X12_Fusion_57_Cone";

    /// Create a tone whose name doesn't clash with any of `existing_names`
    ///
    /// The tone is named `Default`, or `Default 1`, `Default 2`, ... when that is already
    /// taken. It starts out with the default amp and cabinet from `catalog`.
    pub fn create<'a, I>(existing_names: I, catalog: &PedalCatalog) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let setting = |key: &'static str| {
            catalog
                .get(key)
                .map(|pedal| pedal.make_pedal_setting())
                .ok_or(ConfigurationError::MissingPedal(key))
        };

        let amp = setting(Self::DEFAULT_AMP)?;
        let cabinet = setting(Self::DEFAULT_CABINET)?;

        let mut pedals = BTreeMap::new();
        pedals.insert("Amp".to_owned(), amp);
        pedals.insert("Cabinet".to_owned(), cabinet);

        Ok(Self {
            name: unique_name(existing_names),
            volume: Self::default_volume(),
            pedals,
        })
    }

    fn default_volume() -> f32 {
        -12.0
    }
}

/// Find the first of `Default`, `Default 1`, `Default 2`, ... not in `existing_names`
///
/// Comparison is exact and case-sensitive.
pub fn unique_name<'a, I>(existing_names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let existing: Vec<&str> = existing_names.into_iter().collect();

    let mut name = Tone::DEFAULT_NAME.to_owned();
    let mut index = 0;
    while existing.contains(&name.as_str()) {
        index += 1;
        name = format!("{} {index}", Tone::DEFAULT_NAME);
    }

    name
}

/// The library was set up with data it can't work with
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A pedal every tone depends on is not in the catalog
    #[error("The pedal catalog has no entry for {0}")]
    MissingPedal(&'static str),
}
