use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::InputPayload;

/// A kind of generated artifact.
///
/// The derived ordering is the evaluation order: Code → UnitTest → Documentation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Code,
    UnitTest,
    Documentation,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [Self::Code, Self::UnitTest, Self::Documentation];

    /// Label used in console reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::UnitTest => "tests",
            Self::Documentation => "documentation",
        }
    }

    /// Suffix appended to the output prefix.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Code => "_code.py",
            Self::UnitTest => "_tests.py",
            Self::Documentation => "_docs.md",
        }
    }

    /// Destination of this kind for a given prefix, e.g. `out/x` → `out/x_code.py`.
    pub fn output_path(&self, prefix: &Path) -> PathBuf {
        let mut name = prefix.as_os_str().to_os_string();
        name.push(self.file_suffix());
        PathBuf::from(name)
    }

    /// Whether this kind can be produced from the payload's mode.
    pub fn applies_to(&self, payload: &InputPayload) -> bool {
        !matches!(
            (self, payload),
            (Self::Code, InputPayload::Directory { .. })
        )
    }
}

/// The set of kinds a caller asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRequest {
    kinds: BTreeSet<ArtifactKind>,
}

impl ArtifactRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        ArtifactKind::ALL.into_iter().collect()
    }

    /// Build a request from the three command-line switches.
    pub fn from_flags(code: bool, unit_test: bool, docs: bool) -> Self {
        let mut request = Self::new();
        if code {
            request.insert(ArtifactKind::Code);
        }
        if unit_test {
            request.insert(ArtifactKind::UnitTest);
        }
        if docs {
            request.insert(ArtifactKind::Documentation);
        }
        request
    }

    pub fn with(mut self, kind: ArtifactKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: ArtifactKind) {
        self.kinds.insert(kind);
    }

    pub fn contains(&self, kind: ArtifactKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Requested kinds in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Requested kinds that apply to `payload`, in evaluation order.
    pub fn applicable<'a>(
        &'a self,
        payload: &'a InputPayload,
    ) -> impl Iterator<Item = ArtifactKind> + 'a {
        self.iter().filter(move |kind| kind.applies_to(payload))
    }
}

impl FromIterator<ArtifactKind> for ArtifactRequest {
    fn from_iter<I: IntoIterator<Item = ArtifactKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// An artifact that was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactResult {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Exactly the bytes written.
    pub content: Vec<u8>,
}
