//! Mapping from source files to topic paths.
//!
//! A file's topic path is its path relative to the source root, with the
//! extension of the final segment removed and directory separators mapped to
//! `/`. An optional topic root is prepended.

use std::path::{Component, Path};

/// Remove everything from the last `.` of `name` onwards.
///
/// A leading dot is part of the name, so `.env` stays `.env`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Join a topic root and a relative topic path, skipping empty parts.
pub fn join_topic(topic_root: &str, path: &str) -> String {
    let root = topic_root.trim_matches('/');
    let path = path.trim_matches('/');
    match (root.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => root.to_string(),
        (false, false) => format!("{root}/{path}"),
    }
}

/// Derive the topic path fed by `file`.
///
/// `source_root` is the configured source path. When it names the file
/// itself, the topic is the file's own stem. Returns `None` when `file` is
/// not below `source_root` or has no usable name.
pub fn derive_topic_path(source_root: &Path, file: &Path, topic_root: &str) -> Option<String> {
    let relative = file.strip_prefix(source_root).ok()?;
    let relative = if relative.as_os_str().is_empty() {
        Path::new(file.file_name()?)
    } else {
        relative
    };

    let mut segments = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;

    let last = segments.pop()?;
    let stem = strip_extension(&last);
    if stem.is_empty() {
        return None;
    }
    segments.push(stem.to_string());

    Some(join_topic(topic_root, &segments.join("/")))
}
