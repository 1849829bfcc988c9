//! Shared types for the cronstep workspace: the error type used by every
//! crate and the TOML-backed tooling configuration.

pub mod config;
pub mod error;

pub use error::{Error, Exhaustion, Result};
