//! collatepdf - Bundle PDF files into one printable document.
//!
//! A plain-text index lists the documents, divider pages and blank pages to
//! include. Every content page is resized to one page format and gets a
//! banner with its page number and source name. A table of contents lists
//! where each document and divider starts, and blank pages can be inserted
//! so that sections begin on a right-hand page when printed duplex.
//!
//! # Examples
//!
//! ```no_run
//! use collatepdf::collate::Assembler;
//! use collatepdf::config::Config;
//! use collatepdf::index::Index;
//! use collatepdf::render::Font;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = Index::load(Path::new("index.txt"))?;
//!
//! let mut config = Config::default();
//! config.apply_all(index.settings());
//! config.validate()?;
//!
//! let font = Font::load(&config.font_source())?;
//! let (assembly, stats) = Assembler::new(&config, &font).run(&index)?;
//! println!("{} pages, {}", assembly.total_pages, stats.format_file_size());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod collate;
pub mod config;
pub mod error;
pub mod index;
pub mod io;
pub mod output;
pub mod render;
pub mod utils;

pub use config::Config;
pub use error::{CollateError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
