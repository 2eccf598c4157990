use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ArtifactKind, ArtifactResult};

/// One produced artifact in a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// What a run produced, in evaluation order.
///
/// Lives for a single invocation: built by the emitter, printed, dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub entries: Vec<SummaryEntry>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ArtifactKind, path: PathBuf) {
        self.entries.push(SummaryEntry { kind, path });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn path_of(&self, kind: ArtifactKind) -> Option<&PathBuf> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| &e.path)
    }

    /// Human-readable report, one `- Generated <label>: <path>` line per artifact.
    pub fn render(&self) -> String {
        let mut output = String::from("Generation complete!\n");
        for entry in &self.entries {
            output.push_str(&format!(
                "- Generated {}: {}\n",
                entry.kind.as_str(),
                entry.path.display()
            ));
        }
        output
    }
}

impl From<&[ArtifactResult]> for RunSummary {
    fn from(results: &[ArtifactResult]) -> Self {
        Self {
            entries: results
                .iter()
                .map(|r| SummaryEntry {
                    kind: r.kind,
                    path: r.path.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_each_artifact() {
        let mut summary = RunSummary::new();
        summary.push(ArtifactKind::Code, PathBuf::from("out/x_code.py"));
        summary.push(ArtifactKind::Documentation, PathBuf::from("out/x_docs.md"));
        assert_eq!(
            summary.render(),
            "Generation complete!\n- Generated code: out/x_code.py\n- Generated documentation: out/x_docs.md\n"
        );
    }

    #[test]
    fn serializes_kinds_in_snake_case() {
        let mut summary = RunSummary::new();
        summary.push(ArtifactKind::UnitTest, PathBuf::from("out/y_tests.py"));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"entries": [{"kind": "unit_test", "path": "out/y_tests.py"}]})
        );
    }
}
