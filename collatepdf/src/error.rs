//! Error types for collatepdf.
//!
//! Errors fall into a few broad classes:
//!
//! - **Input errors**: missing files, unreadable or corrupted PDFs
//! - **Index errors**: malformed configuration directives in the index file
//! - **Configuration errors**: invalid values, missing font files
//! - **Output errors**: the collated document could not be written
//!
//! Only a missing index document is recovered from (the entry is skipped);
//! everything else aborts the run.

use std::io;
use std::path::PathBuf;

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, CollateError>;

/// Everything that can stop a collation run.
#[derive(Debug, thiserror::Error)]
pub enum CollateError {
    /// An index entry, cover or index file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// An index entry names a directory or other non-file.
    #[error("Not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// lopdf could not parse the file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf { path: PathBuf, reason: String },

    #[error("Font file not found: {}\n  Hint: pass the path to a .ttf or .otf file", path.display())]
    FontNotFound { path: PathBuf },

    /// The font could not be read, ttf-parser rejected it, or it has no Unicode cmap.
    #[error("Invalid font file: {}\n  Reason: {reason}", path.display())]
    InvalidFont { path: PathBuf, reason: String },

    #[error("Failed to read index file: {}\n  Reason: {source}", path.display())]
    FailedToReadIndex { path: PathBuf, source: io::Error },

    /// A `# PARAMS.key = value` line with an unknown key or a bad value.
    #[error("Invalid directive at line {line_number}: {details}")]
    InvalidDirective {
        /// 1-based, counting blank and comment lines.
        line_number: usize,
        details: String,
    },

    /// The output directory or temporary file could not be created.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput { path: PathBuf, source: io::Error },

    /// Serializing into the temporary file or renaming it failed.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite { path: PathBuf, source: io::Error },

    /// Building or editing PDF objects failed.
    #[error("PDF operation failed: {reason}")]
    Pdf { reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("{message}")]
    Other { message: String },
}

impl From<lopdf::Error> for CollateError {
    fn from(err: lopdf::Error) -> Self {
        Self::pdf(err.to_string())
    }
}

impl CollateError {
    /// `path` does not exist.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// `path` exists but is a directory or special file.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// lopdf refused `path`; `reason` is its message.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Directive error at 1-based `line_number` of the index.
    pub fn invalid_directive(line_number: usize, details: impl Into<String>) -> Self {
        Self::InvalidDirective {
            line_number,
            details: details.into(),
        }
    }

    /// Object-level failure while building the output.
    pub fn pdf(reason: impl Into<String>) -> Self {
        Self::Pdf {
            reason: reason.into(),
        }
    }

    /// Bad configuration value from a directive, `--set` or a flag.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Anything without a more specific variant.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the collator may skip the index entry that caused this.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FileNotFound { .. } | Self::NotAFile { .. })
    }

    /// Process exit code: 1 usage, 2 missing input, 3 unreadable input,
    /// 5 output, 6 internal PDF failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FontNotFound { .. } => 2,
            Self::FailedToReadIndex { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::InvalidFont { .. } => 3,
            Self::InvalidDirective { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::Pdf { .. } => 6,
            Self::Other { .. } => 1,
        }
    }
}
