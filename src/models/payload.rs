use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::fs::Filesystem;

/// The input driving a run.
///
/// Immutable once loaded. Loading is the only step that checks the input
/// exists; the emitter trusts whatever payload it is handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPayload {
    /// A story or requirements document.
    Text { source: PathBuf, text: String },
    /// A source tree. `files` are relative to `root`, in discovery order.
    Directory { root: PathBuf, files: Vec<PathBuf> },
}

impl InputPayload {
    /// Wrap text that did not come from a file.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            source: PathBuf::new(),
            text: text.into(),
        }
    }

    /// Read a text payload from `path`.
    pub fn read_text(fs: &dyn Filesystem, path: &Path) -> Result<Self> {
        if !fs.is_file(path) {
            return Err(Error::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs
            .read_to_string(path)
            .map_err(|source| Error::InputUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), chars = text.chars().count(), "read text payload");
        Ok(Self::Text {
            source: path.to_path_buf(),
            text,
        })
    }

    /// Recursively discover files under `root` whose extension is one of
    /// `extensions` (without the leading dot).
    pub fn discover(fs: &dyn Filesystem, root: &Path, extensions: &[String]) -> Result<Self> {
        if !fs.is_dir(root) {
            return Err(Error::InputNotFound {
                path: root.to_path_buf(),
            });
        }
        let walked = fs.walk_files(root).map_err(|source| Error::InputUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let files: Vec<PathBuf> = walked
            .into_iter()
            .filter(|path| has_extension(path, extensions))
            .map(|path| match path.strip_prefix(root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => path,
            })
            .collect();

        if files.is_empty() {
            return Err(Error::NoMatchingFiles {
                root: root.to_path_buf(),
                extensions: extensions.to_vec(),
            });
        }
        debug!(root = %root.display(), count = files.len(), "discovered source files");

        Ok(Self::Directory {
            root: root.to_path_buf(),
            files,
        })
    }

    /// Where the payload came from, for reporting.
    pub fn origin(&self) -> &Path {
        match self {
            Self::Text { source, .. } => source,
            Self::Directory { root, .. } => root,
        }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|wanted| wanted == ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFilesystem;

    fn exts() -> Vec<String> {
        vec!["py".to_string(), "js".to_string(), "ts".to_string()]
    }

    #[test]
    fn read_text_missing_file() {
        let fs = MemoryFilesystem::new();
        let err = InputPayload::read_text(&fs, Path::new("stories.txt")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }

    #[test]
    fn read_text_loads_contents() {
        let fs = MemoryFilesystem::new();
        fs.add_file("stories.txt", "Login feature needed");
        let payload = InputPayload::read_text(&fs, Path::new("stories.txt")).unwrap();
        assert_eq!(
            payload,
            InputPayload::Text {
                source: PathBuf::from("stories.txt"),
                text: "Login feature needed".to_string(),
            }
        );
    }

    #[test]
    fn read_text_rejects_invalid_utf8() {
        let fs = MemoryFilesystem::new();
        fs.add_file("blob.txt", vec![0xff, 0xfe, 0x00]);
        let err = InputPayload::read_text(&fs, Path::new("blob.txt")).unwrap_err();
        assert!(matches!(err, Error::InputUnreadable { .. }));
    }

    #[test]
    fn discover_filters_and_relativizes() {
        let fs = MemoryFilesystem::new();
        fs.add_file("proj/main.py", "");
        fs.add_file("proj/README.md", "");
        fs.add_file("proj/web/app.ts", "");
        fs.add_file("proj/web/app.tsx", "");
        fs.add_file("proj/lib/util.js", "");

        let payload = InputPayload::discover(&fs, Path::new("proj"), &exts()).unwrap();
        let InputPayload::Directory { files, .. } = payload else {
            panic!("expected directory payload");
        };
        assert_eq!(
            files,
            vec![
                PathBuf::from("main.py"),
                PathBuf::from("web/app.ts"),
                PathBuf::from("lib/util.js"),
            ]
        );
    }

    #[test]
    fn discover_missing_directory() {
        let fs = MemoryFilesystem::new();
        let err = InputPayload::discover(&fs, Path::new("nowhere"), &exts()).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }

    #[test]
    fn discover_without_matches() {
        let fs = MemoryFilesystem::new();
        fs.add_file("proj/notes.txt", "");
        let err = InputPayload::discover(&fs, Path::new("proj"), &exts()).unwrap_err();
        assert!(matches!(err, Error::NoMatchingFiles { .. }));
    }
}
