//! Domain models for coderbot.
//!
//! # Core Concepts
//!
//! - [`InputPayload`]: What drives generation. Either a block of story text
//!   read from a file, or a source directory with the files discovered in it.
//! - [`ArtifactKind`]: One of code, unit tests or documentation. Kinds are
//!   always evaluated in that order.
//! - [`ArtifactRequest`]: The set of kinds a caller asked for. Code is never
//!   produced for a directory payload, even when requested.
//! - [`ArtifactResult`]: A file that was actually written, with its bytes.
//! - [`RunSummary`]: The ordered `(kind, path)` list reported back to the caller.

mod artifact;
mod payload;
mod summary;

pub use artifact::*;
pub use payload::*;
pub use summary::*;
