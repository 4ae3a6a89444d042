//! # millstream-settings
//!
//! Configuration file handling for millstream. Settings are organized into
//! logical sections (connection, host loop) and persisted as JSON.

pub mod config;

pub use config::{ConnectionSettings, HostSettings, Settings};
