//! The import pipeline: walk, dedup, upload, optional delete.
//!
//! Each file goes through `discovered -> filtered | hashed -> duplicate |
//! uploaded`, and the whole run is fail-fast: the first error on any file
//! aborts the run. That is the original contract of the tool, batch
//! operators rely on a non-zero exit meaning "something was left undone".

use crate::catalog::CatalogStore;
use crate::hashing::compute_md5;
use crate::uploader::{MediaUploader, UploadError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extensions imported when none are given on the command line.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &[".flac", ".m4a", ".mp3", ".ogg", ".opus", ".wav"];

/// Errors that can occur during an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("provided path {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("provided path {0} is not a file")]
    NotAFile(PathBuf),

    #[error("provided track type {0} does not exist")]
    UnknownTrackType(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("catalog lookup failed: {0}")]
    Catalog(#[source] anyhow::Error),

    #[error("could not hash {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub uploaded: usize,
    pub duplicates: usize,
    pub deleted: usize,
}

/// Drives a single import run over a directory tree.
pub struct Importer<'a> {
    catalog: &'a dyn CatalogStore,
    uploader: &'a dyn MediaUploader,
    delete_after_upload: bool,
    delete_if_exists: bool,
}

impl<'a> Importer<'a> {
    pub fn new(
        catalog: &'a dyn CatalogStore,
        uploader: &'a dyn MediaUploader,
        delete_after_upload: bool,
        delete_if_exists: bool,
    ) -> Self {
        Self {
            catalog,
            uploader,
            delete_after_upload,
            delete_if_exists,
        }
    }

    /// Import every allowed file under `path`.
    ///
    /// Validates the track type before touching the filesystem, then walks
    /// the tree in file-name order. Errors abort the run immediately.
    pub fn run(
        &self,
        path: &Path,
        track_type: Option<&str>,
        allowed_extensions: &[String],
    ) -> Result<ImportStats, ImportError> {
        if let Some(track_type) = track_type {
            let exists = self
                .catalog
                .track_type_exists(track_type)
                .map_err(ImportError::Catalog)?;
            if !exists {
                return Err(ImportError::UnknownTrackType(track_type.to_string()));
            }
        }

        let allowed_extensions = normalize_extensions(allowed_extensions);

        if !path.is_dir() {
            return Err(ImportError::NotADirectory(path.to_path_buf()));
        }

        let mut stats = ImportStats::default();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            if !has_allowed_extension(entry.path(), &allowed_extensions) {
                continue;
            }
            self.handle_file(entry.path(), track_type, &mut stats)?;
        }

        Ok(stats)
    }

    fn handle_file(
        &self,
        path: &Path,
        track_type: Option<&str>,
        stats: &mut ImportStats,
    ) -> Result<(), ImportError> {
        debug!("handling file {:?}", path);

        if !path.is_file() {
            return Err(ImportError::NotAFile(path.to_path_buf()));
        }

        let md5 = compute_md5(path).map_err(|source| ImportError::Hash {
            path: path.to_path_buf(),
            source,
        })?;

        let exists = self
            .catalog
            .file_exists_by_hash(&md5)
            .map_err(ImportError::Catalog)?;
        if exists {
            info!("found matching md5sum, ignoring {:?}", path);
            stats.duplicates += 1;
            if self.delete_if_exists {
                self.delete_file(path, stats)?;
            }
            return Ok(());
        }

        self.uploader.upload(path, track_type)?;
        info!("uploaded {:?}", path);
        stats.uploaded += 1;

        if self.delete_after_upload {
            self.delete_file(path, stats)?;
        }

        Ok(())
    }

    fn delete_file(&self, path: &Path, stats: &mut ImportStats) -> Result<(), ImportError> {
        info!("deleting {:?}", path);
        std::fs::remove_file(path).map_err(|source| ImportError::Delete {
            path: path.to_path_buf(),
            source,
        })?;
        stats.deleted += 1;
        Ok(())
    }
}

/// Normalize an extension allow-list: lowercase, leading dot.
fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| {
            let ext = ext.to_lowercase();
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            }
        })
        .collect()
}

/// Compare a path's lowercased extension (with leading dot) to the allow-list.
fn has_allowed_extension(path: &Path, allowed_extensions: &[String]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()));

    match ext {
        Some(ext) => allowed_extensions.iter().any(|allowed| *allowed == ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_extensions() {
        assert_eq!(
            normalize_extensions(&strings(&["mp3", ".FLAC", "Ogg"])),
            strings(&[".mp3", ".flac", ".ogg"])
        );
    }

    #[test]
    fn test_has_allowed_extension() {
        let allowed = strings(&[".mp3", ".flac"]);
        assert!(has_allowed_extension(Path::new("a/track.mp3"), &allowed));
        assert!(has_allowed_extension(Path::new("a/TRACK.MP3"), &allowed));
        assert!(has_allowed_extension(Path::new("b.flac"), &allowed));
        assert!(!has_allowed_extension(Path::new("a/track.wav"), &allowed));
        assert!(!has_allowed_extension(Path::new("a/track"), &allowed));
        assert!(!has_allowed_extension(Path::new("a/.mp3"), &allowed));
    }

    #[test]
    fn test_default_allowed_extensions_are_normalized() {
        let normalized = normalize_extensions(
            &DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        );
        assert_eq!(
            normalized,
            strings(&[".flac", ".m4a", ".mp3", ".ogg", ".opus", ".wav"])
        );
    }
}
