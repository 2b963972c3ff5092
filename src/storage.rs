//! Resolution of stored upload URLs to files on disk.

use crate::extraction::DocumentLocation;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

const UPLOAD_PREFIX: &str = "/uploads/";

/// Errors raised while locating a stored lecture file.
#[derive(Debug, Error)]
pub enum LocateError {
    /// The URL does not point at a file inside the uploads directory.
    #[error("Lecture file not found: {0}")]
    NotAnUpload(String),
    /// The URL is well formed but nothing exists on disk.
    #[error("File missing on server: {0}")]
    Missing(String),
}

/// Maps `/uploads/<name>` file URLs onto a directory on disk.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory backing the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `file_url` to a readable document, rejecting anything that escapes the root.
    pub fn locate(
        &self,
        file_url: &str,
        mime_hint: Option<&str>,
    ) -> Result<DocumentLocation, LocateError> {
        let relative = file_url
            .strip_prefix(UPLOAD_PREFIX)
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| LocateError::NotAnUpload(file_url.to_string()))?;

        let relative = Path::new(relative);
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(LocateError::NotAnUpload(file_url.to_string()));
        }

        let path = self.root.join(relative);
        if !path.is_file() {
            return Err(LocateError::Missing(file_url.to_string()));
        }

        let location = DocumentLocation::new(path);
        Ok(match mime_hint {
            Some(hint) => location.with_mime_hint(hint),
            None => location,
        })
    }
}
