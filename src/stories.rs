//! Story generation from an epic description.
//!
//! Produces a fixed three-story breakdown with the epic text as its heading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::fs::{self, Filesystem};

/// Number of progress steps reported while generating stories.
pub const PROGRESS_STEPS: usize = 3;

/// Writes story documents.
#[derive(Clone)]
pub struct StoryWriter {
    fs: Arc<dyn Filesystem>,
    clock: Arc<dyn Clock>,
}

impl StoryWriter {
    pub fn new(fs: Arc<dyn Filesystem>, clock: Arc<dyn Clock>) -> Self {
        Self { fs, clock }
    }

    /// Default output file inside `dir`, named after the current time.
    pub fn default_output(&self, dir: &Path) -> PathBuf {
        dir.join(format!("jira_story_{}.txt", self.clock.unix_millis()))
    }

    /// Render the story document and write it to `output_file`, creating the
    /// parent directory if needed.
    pub fn write(&self, epic: &str, output_file: &Path) -> Result<String> {
        let document = render_stories(epic, &self.clock.timestamp());
        fs::write_creating_parents(self.fs.as_ref(), output_file, document.as_bytes()).map_err(
            |source| Error::WriteFailure {
                path: output_file.to_path_buf(),
                source,
            },
        )?;

        info!(path = %output_file.display(), "stories written");
        Ok(document)
    }
}

pub fn render_stories(epic: &str, timestamp: &str) -> String {
    format!(
        r#"# Jira Stories Generated from Epic Requirements

## Epic: {epic}

### Story 1: User Authentication
**Description**: As a user, I want to be able to authenticate securely so that I can access my authorized features.
**Acceptance Criteria**:
- User can login with username and password
- Forgot password functionality is available
- Session timeout after 30 minutes of inactivity

### Story 2: Data Management
**Description**: As a user, I want to manage my data effectively so that I can keep my information up to date.
**Acceptance Criteria**:
- User can create new records
- User can edit existing records
- User can delete records with confirmation

### Story 3: Reporting
**Description**: As a manager, I want to generate reports based on available data so that I can make informed decisions.
**Acceptance Criteria**:
- User can select date range for the report
- Report can be exported as PDF or CSV
- Visual graphs and charts are included

Generated on: {timestamp}
"#
    )
}
