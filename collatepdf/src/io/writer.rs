//! Writing the collated document.
//!
//! The document is serialized into `.name.tmp` next to the destination and
//! renamed into place afterwards. A run that fails part way leaves whatever
//! was at the destination before.
//!
//! ```no_run
//! use collatepdf::io::PdfWriter;
//! # fn run(mut doc: lopdf::Document) -> collatepdf::Result<()> {
//! let stats = PdfWriter::new()
//!     .compress(false)
//!     .save_with_stats(&mut doc, "bundle.pdf".as_ref())?;
//! println!("{} pages, {}", stats.page_count, stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{CollateError, Result};

/// What happened when a document was written.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    pub output_path: PathBuf,
    pub page_count: usize,
    pub file_size: u64,
    pub write_time: Duration,
    pub compressed: bool,
}

impl WriteStatistics {
    /// File size for display, e.g. `12.40 KB`.
    pub fn format_file_size(&self) -> String {
        super::format_file_size(self.file_size)
    }
}

/// Atomic PDF writer.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    compress: bool,
    create_dirs: bool,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self {
            compress: true,
            create_dirs: true,
        }
    }
}

impl PdfWriter {
    /// Writer that compresses streams and creates missing directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to compress content streams before writing.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Whether missing parent directories of the output are created.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Write `doc` to `path`.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).map(|_| ())
    }

    /// Write `doc` to `path` and report size and timing.
    ///
    /// # Errors
    ///
    /// [`CollateError::FailedToCreateOutput`] when the directory or the
    /// temporary file cannot be created, [`CollateError::FailedToWrite`] when
    /// serialization or the rename fails. The temporary file is removed
    /// on failure.
    pub fn save_with_stats(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        if self.create_dirs {
            create_parent_dirs(path)?;
        }
        if self.compress {
            doc.compress();
        }

        let tmp = temp_path(path);
        let written = serialize(doc, &tmp).and_then(|()| {
            fs::rename(&tmp, path).map_err(|source| CollateError::FailedToWrite {
                path: path.to_path_buf(),
                source,
            })
        });
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                log::debug!("Could not remove {}: {cleanup}", tmp.display());
            }
            return Err(err);
        }

        let stats = WriteStatistics {
            output_path: path.to_path_buf(),
            page_count: doc.get_pages().len(),
            file_size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            write_time: start.elapsed(),
            compressed: self.compress,
        };
        log::info!(
            "Wrote {} ({} pages, {})",
            path.display(),
            stats.page_count,
            stats.format_file_size()
        );
        Ok(stats)
    }

    /// Fail early if `path` obviously cannot receive the output.
    ///
    /// Runs before any input is read so a bad `-o` is reported first.
    pub fn can_write(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            return Err(CollateError::invalid_config(format!(
                "Output path is a directory: {}",
                path.display()
            )));
        }

        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };
        if !parent.exists() {
            return if self.create_dirs {
                Ok(())
            } else {
                Err(CollateError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )))
            };
        }
        if fs::metadata(parent)?.permissions().readonly() {
            return Err(CollateError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }
        Ok(())
    }
}

/// Sibling used while writing: `out/bundle.pdf` becomes `out/.bundle.pdf.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| "output".as_ref()));
    name.push(".tmp");
    path.with_file_name(name)
}

fn create_parent_dirs(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|source| CollateError::FailedToCreateOutput {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn serialize(doc: &mut Document, tmp: &Path) -> Result<()> {
    let failed = |source| CollateError::FailedToWrite {
        path: tmp.to_path_buf(),
        source,
    };
    let file = File::create(tmp).map_err(|source| CollateError::FailedToCreateOutput {
        path: tmp.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    doc.save_to(&mut out).map_err(|e| failed(std::io::Error::other(e)))?;
    out.flush().map_err(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collate::PageAccumulator;
    use crate::config::PageSize;
    use crate::render::Font;
    use tempfile::TempDir;

    fn blank_document(pages: usize) -> Document {
        let mut acc = PageAccumulator::new(PageSize::A4);
        for _ in 0..pages {
            acc.add_blank_page();
        }
        acc.into_document(&Font::default()).unwrap()
    }

    #[test]
    fn test_save_reloads() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("bundle.pdf");

        PdfWriter::new().save(&mut blank_document(3), &out).unwrap();

        assert!(!temp_path(&out).exists());
        assert_eq!(Document::load(&out).unwrap().get_pages().len(), 3);
    }

    #[test]
    fn test_statistics() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("bundle.pdf");

        let stats = PdfWriter::new()
            .compress(false)
            .save_with_stats(&mut blank_document(2), &out)
            .unwrap();

        assert_eq!(stats.output_path, out);
        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.file_size, fs::metadata(&out).unwrap().len());
        assert!(!stats.compressed);
    }

    #[test]
    fn test_missing_directories_created() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a").join("b").join("bundle.pdf");

        PdfWriter::new().save(&mut blank_document(1), &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_failure_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("bundle.pdf");
        fs::write(&out, b"previous").unwrap();
        // a directory where the temporary file should go
        fs::create_dir(temp_path(&out)).unwrap();

        let err = PdfWriter::new()
            .save(&mut blank_document(1), &out)
            .unwrap_err();

        assert!(matches!(err, CollateError::FailedToCreateOutput { .. }));
        assert_eq!(fs::read(&out).unwrap(), b"previous");
    }

    #[test]
    fn test_can_write() {
        let dir = TempDir::new().unwrap();
        let writer = PdfWriter::new();

        assert!(writer.can_write(&dir.path().join("bundle.pdf")).is_ok());
        assert!(writer.can_write(&dir.path().join("new/bundle.pdf")).is_ok());
        assert!(writer.can_write(dir.path()).is_err());

        let strict = PdfWriter::new().create_dirs(false);
        assert!(strict.can_write(&dir.path().join("new/bundle.pdf")).is_err());
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("out/collated.pdf")),
            PathBuf::from("out/.collated.pdf.tmp")
        );
    }
}
