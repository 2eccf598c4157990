//! The artifact emitter: payload + requested kinds → templated files.

pub mod listing;
pub mod templates;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::fs::{self, Filesystem};
use crate::models::*;

pub use listing::{EXCERPT_CHARS, LISTING_LIMIT};

/// Knobs that shape rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Files shown before `- ... and N more files`.
    pub listing_limit: usize,
    /// Characters of input text kept in excerpts.
    pub excerpt_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            listing_limit: LISTING_LIMIT,
            excerpt_chars: EXCERPT_CHARS,
        }
    }
}

/// Renders and writes artifacts.
///
/// Stateless between calls. The clock and filesystem are injected so a run
/// with a [`FixedClock`](crate::clock::FixedClock) and a
/// [`MemoryFilesystem`](crate::fs::MemoryFilesystem) is fully deterministic.
#[derive(Clone)]
pub struct Emitter {
    fs: Arc<dyn Filesystem>,
    clock: Arc<dyn Clock>,
    limits: Limits,
}

impl Emitter {
    pub fn new(fs: Arc<dyn Filesystem>, clock: Arc<dyn Clock>) -> Self {
        Self {
            fs,
            clock,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Write one artifact per requested kind that applies to `payload` and
    /// return what was produced.
    pub fn emit(
        &self,
        payload: &InputPayload,
        requested: &ArtifactRequest,
        output_prefix: &Path,
    ) -> Result<RunSummary> {
        let results = self.emit_with(payload, requested, output_prefix, |_| {})?;
        Ok(RunSummary::from(results.as_slice()))
    }

    /// Like [`emit`](Self::emit), calling `on_written` after each file lands.
    ///
    /// On a write failure the error is returned immediately; files written
    /// before it stay on disk and have already been passed to `on_written`.
    pub fn emit_with<F>(
        &self,
        payload: &InputPayload,
        requested: &ArtifactRequest,
        output_prefix: &Path,
        mut on_written: F,
    ) -> Result<Vec<ArtifactResult>>
    where
        F: FnMut(&ArtifactResult),
    {
        let timestamp = self.clock.timestamp();
        let mut results = Vec::new();

        for kind in requested.iter().filter(|kind| !kind.applies_to(payload)) {
            debug!(kind = kind.as_str(), "kind does not apply to payload, skipping");
        }

        for kind in requested.applicable(payload) {
            let Some(content) = self.render(kind, payload, &timestamp) else {
                continue;
            };

            let path = kind.output_path(output_prefix);
            self.write(&path, content.as_bytes())?;
            info!(kind = kind.as_str(), path = %path.display(), "artifact written");

            let result = ArtifactResult {
                kind,
                path,
                content: content.into_bytes(),
            };
            on_written(&result);
            results.push(result);
        }

        Ok(results)
    }

    /// Render the content of `kind` for `payload`, or `None` when the kind
    /// has no meaning for that payload mode.
    pub fn render(&self, kind: ArtifactKind, payload: &InputPayload, timestamp: &str) -> Option<String> {
        let limits = self.limits;
        let rendered = match (kind, payload) {
            (ArtifactKind::Code, InputPayload::Text { text, .. }) => {
                let excerpt = listing::excerpt(text, limits.excerpt_chars);
                templates::story_code(timestamp, &listing::commented(&excerpt))
            }
            (ArtifactKind::Code, InputPayload::Directory { .. }) => return None,
            (ArtifactKind::UnitTest, InputPayload::Text { .. }) => templates::story_tests(timestamp),
            (ArtifactKind::UnitTest, InputPayload::Directory { root, files }) => {
                let lines = listing::file_listing(files, limits.listing_limit);
                templates::directory_tests(timestamp, root, &lines)
            }
            (ArtifactKind::Documentation, InputPayload::Text { text, .. }) => {
                let excerpt = listing::excerpt(text, limits.excerpt_chars);
                templates::story_docs(timestamp, &excerpt)
            }
            (ArtifactKind::Documentation, InputPayload::Directory { root, files }) => {
                let lines = listing::file_listing(files, limits.listing_limit);
                templates::directory_docs(timestamp, root, &lines)
            }
        };
        Some(rendered)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write_creating_parents(self.fs.as_ref(), path, contents).map_err(|source| {
            Error::WriteFailure {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}
