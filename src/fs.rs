//! Filesystem capability used by payload loading and artifact writing.
//!
//! [`OsFilesystem`] is what the binary uses. [`MemoryFilesystem`] keeps
//! everything in a map so emission can be checked byte-for-byte without
//! touching disk.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;
use walkdir::WalkDir;

/// The filesystem operations a run needs.
pub trait Filesystem: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate `path` and write `contents`.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Every regular file below `root`, recursively, in the order the
    /// filesystem yields them. Returned paths are joined onto `root`.
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .map(|entry| {
                entry.map(|e| e.file_type().is_file().then(|| e.into_path()))
            });
        Ok(readable_files(entries).collect())
    }
}

/// Keep the files of a walk, skipping entries that could not be read.
fn readable_files<E, I>(entries: I) -> impl Iterator<Item = PathBuf>
where
    E: std::fmt::Display,
    I: IntoIterator<Item = Result<Option<PathBuf>, E>>,
{
    entries.into_iter().filter_map(|entry| match entry {
        Ok(file) => file,
        Err(e) => {
            warn!(error = %e, "skipping unreadable entry during discovery");
            None
        }
    })
}

/// Write `contents` to `path`, creating missing parent directories first.
pub fn write_creating_parents(fs: &dyn Filesystem, path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !fs.is_dir(parent) {
            fs.create_dir_all(parent)?;
        }
    }
    fs.write(path, contents)
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Insertion order doubles as discovery order.
    files: Vec<(PathBuf, Vec<u8>)>,
    dirs: Vec<PathBuf>,
    denied: Vec<PathBuf>,
}

impl MemoryState {
    fn file_index(&self, path: &Path) -> Option<usize> {
        self.files.iter().position(|(p, _)| p == path)
    }

    fn has_dir(&self, path: &Path) -> bool {
        path.parent().is_none() || self.dirs.iter().any(|d| d == path)
    }

    fn is_denied(&self, path: &Path) -> bool {
        self.denied.iter().any(|d| path.starts_with(d))
    }

    fn mkdirs(&mut self, path: &Path) -> io::Result<()> {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if matches!(component, Component::RootDir | Component::Prefix(_)) {
                continue;
            }
            if self.file_index(&current).is_some() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} is a file", current.display()),
                ));
            }
            if !self.has_dir(&current) {
                self.dirs.push(current.clone());
            }
        }
        Ok(())
    }
}

/// An in-memory filesystem for deterministic tests.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.state.lock().expect("filesystem lock poisoned");
        if let Some(parent) = path.parent() {
            let _ = state.mkdirs(parent);
        }
        let contents = contents.into();
        match state.file_index(path) {
            Some(i) => state.files[i].1 = contents,
            None => state.files.push((path.to_path_buf(), contents)),
        }
    }

    /// Seed an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().expect("filesystem lock poisoned");
        let _ = state.mkdirs(path.as_ref());
    }

    /// Make every write at or below `path` fail with `PermissionDenied`.
    pub fn deny_writes(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().expect("filesystem lock poisoned");
        state.denied.push(path.as_ref().to_path_buf());
    }

    /// Contents of a file as UTF-8, if it exists.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let state = self.state.lock().expect("filesystem lock poisoned");
        state
            .file_index(path.as_ref())
            .map(|i| String::from_utf8_lossy(&state.files[i].1).into_owned())
    }

    /// All file paths in insertion order.
    pub fn paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock().expect("filesystem lock poisoned");
        state.files.iter().map(|(p, _)| p.clone()).collect()
    }
}

impl Filesystem for MemoryFilesystem {
    fn is_file(&self, path: &Path) -> bool {
        let state = self.state.lock().expect("filesystem lock poisoned");
        state.file_index(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.lock().expect("filesystem lock poisoned");
        state.has_dir(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.state.lock().expect("filesystem lock poisoned");
        let i = state
            .file_index(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;
        String::from_utf8(state.files[i].1.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().expect("filesystem lock poisoned");
        if state.is_denied(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        state.mkdirs(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock().expect("filesystem lock poisoned");
        if state.is_denied(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        if state.has_dir(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a directory", path.display()),
            ));
        }
        let parent = path.parent().unwrap_or(Path::new(""));
        if !state.has_dir(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", parent.display()),
            ));
        }
        match state.file_index(path) {
            Some(i) => state.files[i].1 = contents.to_vec(),
            None => state.files.push((path.to_path_buf(), contents.to_vec())),
        }
        Ok(())
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.lock().expect("filesystem lock poisoned");
        if !state.has_dir(root) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
        }
        Ok(state
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(root) && p.as_path() != root)
            .map(|(p, _)| p.clone())
            .collect())
    }
}
