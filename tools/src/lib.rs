//! # rsdlc tools
//!
//! Command-line access to the [`rsdlc`] library: create and edit package templates, look
//! up app ids, and convert built packages between platforms.
//!
//! ## App ids
//!
//! ```console
//! > rsdlc-tools app-ids
//! *   248750 | Cherub Rock
//!     258077 | Hail to the King
//!     258341 | Sweet Child O' Mine
//! ```
//!
//! ## New
//!
//! ```console
//! > rsdlc-tools new song/cherub_rock.dlc.json -n "Cherub Rock" -t "Cherub Rock" \
//!     --album "Siamese Dream" --artist "The Smashing Pumpkins" --year 1993 --tempo 120 \
//!     --ogg song/audio.ogg -a Lead,song/lead.sng,song/lead.xml
//! Wrote song/cherub_rock.dlc.json
//! ```
//!
//! ## Inspect
//!
//! ```console
//! > rsdlc-tools inspect song
//! cherub_rock.dlc.json            Cherub_Rock | app 248750
//!   The Smashing Pumpkins - Cherub Rock (Siamese Dream, 1993) 120 bpm
//!   Audio     /home/me/song/audio.ogg
//!   0 | Lead   | Default      | /home/me/song/lead.xml
//!   Tone Default      Amp: Amp_Fusion, Cabinet: Cab_2X12_Fusion_57_Cone
//! ```
//!
//! ## Tone
//!
//! ```console
//! > rsdlc-tools tone song/cherub_rock.dlc.json add
//! Added tone 'Default 1'
//! > rsdlc-tools tone song/cherub_rock.dlc.json rename "Default 1" Crunch
//! Renamed tone 'Default 1' to 'Crunch'
//! ```
//!
//! ## Convert
//!
//! ```console
//! > rsdlc-tools convert --from pc --to xbox360 --codec ./psarc-codec cherub_rock_p.psarc
//! cherub_rock_p.psarc => XBox360
//! DLC was converted from 'Pc' to 'XBox360'.
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

pub mod app_ids;
pub mod convert;
pub mod inspect;
pub mod new;
pub mod tone;
pub(crate) mod utils;
