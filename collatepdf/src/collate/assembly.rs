//! Final document assembly: cover, table of contents, body.

use lopdf::{Document, Object, dictionary};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{Collator, PageAccumulator};
use crate::config::Config;
use crate::error::Result;
use crate::index::Index;
use crate::io::{PdfReader, PdfWriter, WriteStatistics};
use crate::render::{Font, Renderer};

/// An assembled document that has not necessarily been written yet.
#[derive(Debug)]
pub struct Assembly {
    /// The final document.
    pub document: Document,

    /// Table of contents lines as rendered.
    pub toc: Vec<String>,

    /// Index documents that did not exist.
    pub skipped: Vec<PathBuf>,

    /// Pages taken by the cover, duplex padding included.
    pub cover_pages: usize,

    /// Pages preceding the body.
    pub first_page: usize,

    /// Pages in the final document.
    pub total_pages: usize,

    /// Documents collated into the body.
    pub documents: usize,

    /// Time spent building the document.
    pub build_time: Duration,
}

/// Builds the final document from an index.
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    config: &'a Config,
    font: &'a Font,
    reader: PdfReader,
    writer: PdfWriter,
}

impl<'a> Assembler<'a> {
    /// Assembler for a fully resolved configuration and its loaded font.
    pub fn new(config: &'a Config, font: &'a Font) -> Self {
        Self {
            config,
            font,
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
        }
    }

    /// Use `writer` for the output file.
    pub fn with_writer(mut self, writer: PdfWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Build the final document in memory.
    ///
    /// The cover comes first, padded to an even page count in duplex mode.
    /// The body is numbered as if the table of contents (and its duplex
    /// padding page) already preceded it.
    ///
    /// # Errors
    ///
    /// A missing or unreadable cover, and any non-recoverable collation error.
    pub fn assemble(&self, index: &Index) -> Result<Assembly> {
        let start = Instant::now();
        let config = self.config;
        let renderer = Renderer::new(config, self.font);

        let mut output = PageAccumulator::new(config.page_size);

        if let Some(cover) = &config.cover_file {
            let loaded = self.reader.load(cover)?;
            log::info!("Adding cover {} ({} pages)", cover.display(), loaded.page_count);
            output.import_document(loaded.document)?;
            output.ensure_even(config.duplex);
        }
        let cover_pages = output.page_count();

        let toc_pages = if config.duplex { 2 } else { 1 };
        let first_page = cover_pages + toc_pages;

        if index.is_empty() {
            log::warn!("Index lists no documents, dividers or blank pages");
        }

        let collation = Collator::new(renderer).collate(index.content(), first_page)?;

        output.add_layer_page(renderer.toc(&collation.toc)?)?;
        output.ensure_even(config.duplex);
        debug_assert_eq!(output.page_count(), first_page);

        output.append(collation.body, self.font)?;
        let total_pages = output.page_count();

        let mut document = output.into_document(self.font)?;
        set_producer(&mut document);

        log::info!(
            "Assembled {total_pages} page(s), body starting at page {}",
            first_page + 1
        );

        Ok(Assembly {
            document,
            toc: collation.toc,
            skipped: collation.skipped,
            cover_pages,
            first_page,
            total_pages,
            documents: collation.documents,
            build_time: start.elapsed(),
        })
    }

    /// Write an assembled document to `path`.
    pub fn write(&self, assembly: &mut Assembly, path: &Path) -> Result<WriteStatistics> {
        self.writer.save_with_stats(&mut assembly.document, path)
    }

    /// Assemble `index` and write it to the configured output file.
    pub fn run(&self, index: &Index) -> Result<(Assembly, WriteStatistics)> {
        self.writer.can_write(&self.config.output_file)?;
        let mut assembly = self.assemble(index)?;
        let stats = self.write(&mut assembly, &self.config.output_file)?;
        Ok((assembly, stats))
    }
}

fn set_producer(doc: &mut Document) {
    let producer = format!("collatepdf {}", env!("CARGO_PKG_VERSION"));
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal(producer),
    });
    doc.trailer.set("Info", info_id);
}
