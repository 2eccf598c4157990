//! Excerpt and file-listing helpers shared by the templates.

use std::path::{Component, Path};

/// Default number of files shown before the listing is truncated.
pub const LISTING_LIMIT: usize = 10;

/// Default number of characters kept from the input text.
pub const EXCERPT_CHARS: usize = 200;

/// The first `max_chars` characters of `text` followed by `...`.
///
/// The marker is appended even when nothing was cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut excerpt: String = text.chars().take(max_chars).collect();
    excerpt.push_str("...");
    excerpt
}

/// Rewrite newlines so every line of `text` continues a `#` comment.
pub fn commented(text: &str) -> String {
    text.replace('\n', "\n# ")
}

/// Render `files` as `- <path>` lines, at most `limit` of them, followed by
/// `- ... and N more files` when the list was cut.
pub fn file_listing(files: &[impl AsRef<Path>], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = files
        .iter()
        .take(limit)
        .map(|path| format!("- {}", display_path(path.as_ref())))
        .collect();
    if files.len() > limit {
        lines.push(format!("- ... and {} more files", files.len() - limit));
    }
    lines
}

/// Forward-slash form of a relative path, independent of platform.
pub fn display_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
