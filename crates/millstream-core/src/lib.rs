//! # millstream-core
//!
//! Core types shared by the millstream crates: the machine status data model
//! and the common error/result types.

pub mod error;
pub mod status;

pub use error::{Error, Result};
pub use status::MachineStatus;
