//! PDF loading.
//!
//! Documents are read fully into memory. A missing path is reported as
//! [`CollateError::FileNotFound`] (or [`CollateError::NotAFile`]) so the
//! collator can skip the entry; a file that exists but does not parse is
//! [`CollateError::FailedToLoadPdf`] and aborts the run. A well-formed
//! document without pages loads normally with `page_count == 0`.

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{CollateError, Result};

/// A parsed input document.
#[derive(Debug)]
pub struct LoadedPdf {
    pub document: Document,
    pub path: PathBuf,
    pub page_count: usize,
    pub file_size: u64,
    pub load_time: Duration,
}

/// Check that `path` names an existing regular file.
pub fn check_path_exists(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(CollateError::not_a_file(path.to_path_buf())),
        Err(_) => Err(CollateError::file_not_found(path.to_path_buf())),
    }
}

/// Loads covers and index documents.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Load the document at `path`.
    ///
    /// # Errors
    ///
    /// Recoverable errors for a missing path or a directory;
    /// [`CollateError::FailedToLoadPdf`] for anything lopdf cannot read.
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        check_path_exists(path)?;

        let start = Instant::now();
        let document = Document::load(path)
            .map_err(|e| CollateError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;

        let page_count = document.get_pages().len();
        if page_count == 0 {
            log::warn!("{} has no pages", path.display());
        }

        let loaded = LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            file_size: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            load_time: start.elapsed(),
        };
        log::debug!(
            "Loaded {} ({} pages, {}) in {:?}",
            path.display(),
            loaded.page_count,
            super::format_file_size(loaded.file_size),
            loaded.load_time
        );
        Ok(loaded)
    }
}
