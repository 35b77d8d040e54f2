//! stubcraft library
//!
//! Turns declarative field specifications into generated source files by
//! deriving validation rules and substituting them into stub templates.

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod scaffold;

pub use config::StubcraftConfig;
pub use error::GenerationError;
