//! Local filesystem access for file ingestion

use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Immediate children of one directory, split by kind and sorted by name
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

/// List a directory (non-recursive, immediate children only)
///
/// Symlinks are followed; entries that are neither regular files nor
/// directories are skipped.
pub async fn list_directory(path: &Path) -> Result<DirListing> {
    let mut listing = DirListing::default();

    let mut entries = tokio::fs::read_dir(path)
        .await
        .with_context(|| format!("Failed to read directory: {}", path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let entry_path = entry.path();
        let metadata = match tokio::fs::metadata(&entry_path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry_path.display(), e);
                continue;
            }
        };

        if metadata.is_file() {
            listing.files.push(entry_path);
        } else if metadata.is_dir() {
            listing.dirs.push(entry_path);
        }
    }

    // Sort for consistent ordering
    listing.files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    listing.dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!(
        "Listed {} files and {} directories in: {}",
        listing.files.len(),
        listing.dirs.len(),
        path.display()
    );

    Ok(listing)
}

/// Read a whole file into memory
pub async fn read_file(path: &Path) -> Result<Bytes> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(Bytes::from(contents))
}

pub async fn remove_file(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path)
        .await
        .with_context(|| format!("Failed to delete file: {}", path.display()))
}
