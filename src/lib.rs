//! coderbot: templated code, test, documentation and story scaffolding.
//!
//! The core is the [`emitter::Emitter`], which maps an [`models::InputPayload`]
//! and a set of requested [`models::ArtifactKind`]s to files on disk. Payloads
//! are loaded through [`models::InputPayload::read_text`] and
//! [`models::InputPayload::discover`]; the [`commands`] module wires these
//! together for the binary.

pub mod clock;
pub mod commands;
pub mod config;
pub mod emitter;
pub mod error;
pub mod fs;
pub mod models;
pub mod stories;

pub use error::{Error, Result};
