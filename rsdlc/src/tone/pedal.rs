//! The read-only pedal catalog tones are built from

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
    sync::OnceLock,
};
use thiserror::Error;

/// A single adjustable parameter on a [`Pedal`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knob {
    pub key: String,
    pub name: String,
    pub min_value: f32,
    pub max_value: f32,
    pub default_value: f32,
}

/// A catalog entry describing one amp, cabinet, pedal or rack effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pedal {
    pub key: String,
    pub name: String,

    /// The slot family this pedal goes into (`Amps`, `Cabinets`, `Pedals`, `Racks`)
    #[serde(rename = "type")]
    pub pedal_type: String,

    #[serde(default)]
    pub knobs: Vec<Knob>,
}

impl Pedal {
    /// Instantiate a fresh setting for this pedal, with every knob at its default
    pub fn make_pedal_setting(&self) -> PedalSetting {
        PedalSetting {
            pedal_key: self.key.clone(),
            pedal_type: self.pedal_type.clone(),
            knob_values: self
                .knobs
                .iter()
                .map(|knob| (knob.key.clone(), knob.default_value))
                .collect(),
        }
    }
}

/// An instance of a [`Pedal`] with its own knob values
///
/// Settings are plain values. Two tones built from the same catalog entry each own
/// a separate copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedalSetting {
    pub pedal_key: String,
    pub pedal_type: String,

    #[serde(default)]
    pub knob_values: BTreeMap<String, f32>,
}

/// A read-only table of [`Pedal`]s keyed by their identifier
#[derive(Debug, Clone, Default)]
pub struct PedalCatalog {
    pedals: HashMap<String, Pedal>,
}

impl PedalCatalog {
    /// Build a catalog from a set of pedals
    pub fn new<I>(pedals: I) -> Self
    where
        I: IntoIterator<Item = Pedal>,
    {
        Self {
            pedals: pedals
                .into_iter()
                .map(|pedal| (pedal.key.clone(), pedal))
                .collect(),
        }
    }

    /// The catalog that ships with the library
    pub fn builtin() -> &'static Self {
        static INSTANCE: OnceLock<PedalCatalog> = OnceLock::new();
        INSTANCE.get_or_init(|| Self::new(builtin_pedals()))
    }

    /// Deserialize a catalog from a JSON array of pedals
    pub fn from_reader<R>(reader: R) -> Result<Self, CatalogReadError>
    where
        R: Read,
    {
        let pedals: Vec<Pedal> = serde_json::from_reader(reader)?;
        Ok(Self::new(pedals))
    }

    /// Deserialize a catalog from a JSON file on disk
    pub fn from_path<P>(path: P) -> Result<Self, CatalogReadError>
    where
        P: AsRef<Path>,
    {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Look up a pedal by its exact key
    pub fn get(&self, key: &str) -> Option<&Pedal> {
        self.pedals.get(key)
    }

    /// The number of pedals in the catalog
    pub fn len(&self) -> usize {
        self.pedals.len()
    }

    /// Does the catalog contain no pedals at all?
    pub fn is_empty(&self) -> bool {
        self.pedals.is_empty()
    }
}

/// Errors that can occur reading a [`PedalCatalog`]
#[derive(Debug, Error)]
pub enum CatalogReadError {
    /// Opening or reading the file failed
    #[error("Reading the pedal catalog failed")]
    Io(#[from] io::Error),

    /// The contents were not a valid list of pedals
    #[error("Parsing the pedal catalog failed")]
    Json(#[from] serde_json::Error),
}

fn knob(key: &str, name: &str, min_value: f32, max_value: f32, default_value: f32) -> Knob {
    Knob {
        key: key.to_owned(),
        name: name.to_owned(),
        min_value,
        max_value,
        default_value,
    }
}

fn pedal(key: &str, name: &str, pedal_type: &str, knobs: Vec<Knob>) -> Pedal {
    Pedal {
        key: key.to_owned(),
        name: name.to_owned(),
        pedal_type: pedal_type.to_owned(),
        knobs,
    }
}

fn builtin_pedals() -> Vec<Pedal> {
    vec![
        pedal(
            "Amp_Fusion",
            "Fusion",
            "Amps",
            vec![
                knob("Amp_Fusion_Gain", "Gain", 0.0, 100.0, 50.0),
                knob("Amp_Fusion_Bass", "Bass", 0.0, 100.0, 50.0),
                knob("Amp_Fusion_Mid", "Mid", 0.0, 100.0, 50.0),
                knob("Amp_Fusion_Treble", "Treble", 0.0, 100.0, 50.0),
            ],
        ),
        pedal(
            "Amp_Classic",
            "Classic",
            "Amps",
            vec![
                knob("Amp_Classic_Gain", "Gain", 0.0, 100.0, 35.0),
                knob("Amp_Classic_Tone", "Tone", 0.0, 100.0, 60.0),
            ],
        ),
        pedal("Cab_2X12_Fusion_57_Cone", "2x12 Fusion 57 Cone", "Cabinets", vec![]),
        pedal("Cab_4X12_Classic_57_Cone", "4x12 Classic 57 Cone", "Cabinets", vec![]),
        pedal(
            "Pedal_Overdrive",
            "Overdrive",
            "Pedals",
            vec![
                knob("Pedal_Overdrive_Drive", "Drive", 0.0, 100.0, 40.0),
                knob("Pedal_Overdrive_Level", "Level", 0.0, 100.0, 50.0),
            ],
        ),
        pedal(
            "Rack_Reverb",
            "Studio Reverb",
            "Racks",
            vec![knob("Rack_Reverb_Mix", "Mix", 0.0, 100.0, 25.0)],
        ),
    ]
}
