//! Authoring custom song packages and moving them between platforms
//!
//! A custom song package bundles a song's audio, album art and per-instrument
//! arrangements, together with the tones those arrangements are played with. This crate
//! contains:
//!
//! * the [package model](package) and the rules that keep it valid
//! * [templates](template): portable project files that can be saved and reloaded
//! * [platform](platform) naming conventions and batch [conversion](convert) of built
//!   packages between PC, Mac, Xbox 360 and PS3
//!
//! The byte-level container formats are not handled here; conversion delegates to a
//! [`PackageCodec`](convert::PackageCodec) supplied by the caller.

pub mod arrangement;
pub mod convert;
pub mod package;
pub mod platform;
pub mod song_app_id;
pub mod template;
pub mod tone;
