//! Walks an index and builds the collated body.

use std::path::{Path, PathBuf};

use super::PageAccumulator;
use super::normalize::resize_page;
use crate::error::Result;
use crate::index::{IndexEntry, pretty_name};
use crate::io::PdfReader;
use crate::render::{Renderer, page_label};

/// Outcome of collating an index.
#[derive(Debug)]
pub struct Collation {
    /// Body pages in index order.
    pub body: PageAccumulator,

    /// Table of contents lines; empty strings are spacers before dividers.
    pub toc: Vec<String>,

    /// Index documents that did not exist and were left out.
    pub skipped: Vec<PathBuf>,

    /// Number of the last body page in the final document.
    pub last_page: usize,

    /// Documents included.
    pub documents: usize,

    /// Divider pages rendered.
    pub dividers: usize,
}

impl Collation {
    /// TOC lines that reference a page.
    pub fn toc_entries(&self) -> impl Iterator<Item = &str> {
        self.toc.iter().map(String::as_str).filter(|line| !line.is_empty())
    }
}

/// Turns index entries into overlaid, uniformly sized body pages.
#[derive(Debug, Clone)]
pub struct Collator<'a> {
    renderer: Renderer<'a>,
    reader: PdfReader,
}

impl<'a> Collator<'a> {
    /// Create a collator.
    ///
    /// # Arguments
    ///
    /// * `renderer` - Draws dividers and banners; its configuration supplies
    ///   the page size, duplex mode and `root_dir` for index paths
    pub fn new(renderer: Renderer<'a>) -> Self {
        Self {
            renderer,
            reader: PdfReader::new(),
        }
    }

    /// Collate `entries` into a fresh body.
    ///
    /// `first_page` is the number of pages that precede the body in the final
    /// document. The running counter starts there and always holds the
    /// number of the last page emitted.
    ///
    /// Directives are ignored here; they must already be applied to the
    /// configuration. A document that does not exist is logged and skipped.
    ///
    /// # Errors
    ///
    /// Any failure other than a missing document: unreadable PDFs, rendering
    /// or compositing errors.
    pub fn collate<'e, I>(&self, entries: I, first_page: usize) -> Result<Collation>
    where
        I: IntoIterator<Item = &'e IndexEntry>,
    {
        let config = self.renderer.config();
        let mut collation = Collation {
            body: PageAccumulator::new(config.page_size),
            toc: Vec::new(),
            skipped: Vec::new(),
            last_page: first_page,
            documents: 0,
            dividers: 0,
        };

        for entry in entries {
            match entry {
                IndexEntry::Blank => {
                    collation.body.add_blank_page();
                    collation.last_page += 1;
                }
                IndexEntry::Divider(title) => self.add_divider(&mut collation, title)?,
                IndexEntry::Document(path) => self.add_document(&mut collation, path)?,
                IndexEntry::Directive { .. } => {}
            }
        }

        log::info!(
            "Collated {} document(s) and {} divider(s) into {} page(s)",
            collation.documents,
            collation.dividers,
            collation.body.page_count()
        );

        Ok(collation)
    }

    fn add_divider(&self, collation: &mut Collation, title: &str) -> Result<()> {
        collation.last_page += collation.body.ensure_even(self.renderer.config().duplex);

        let n = collation.last_page + 1;
        let page_id = collation.body.add_layer_page(self.renderer.divider(title)?)?;
        collation
            .body
            .composite(page_id, self.renderer.overlay(&page_label(n, ""))?)?;

        collation.toc.push(String::new());
        collation.toc.push(page_label(n, title));
        collation.last_page += 1;
        collation.dividers += 1;
        Ok(())
    }

    fn add_document(&self, collation: &mut Collation, path: &Path) -> Result<()> {
        let config = self.renderer.config();
        let resolved = config.resolve_input(path);

        let loaded = match self.reader.load(&resolved) {
            Ok(loaded) => loaded,
            Err(err) if err.is_recoverable() => {
                log::warn!("Skipping {}: {err}", resolved.display());
                collation.skipped.push(resolved);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let pretty = pretty_name(&path.to_string_lossy(), true);
        collation
            .toc
            .push(page_label(collation.last_page + 1, &pretty));
        collation.documents += 1;

        // listed in the TOC, contributes no pages
        if loaded.page_count == 0 {
            return Ok(());
        }

        let page_ids = collation.body.import_document(loaded.document)?;
        for (i, page_id) in page_ids.iter().enumerate() {
            resize_page(collation.body.document_mut(), *page_id, config.page_size)?;
            let label = page_label(collation.last_page + i + 1, &pretty);
            collation
                .body
                .composite(*page_id, self.renderer.overlay(&label)?)?;
        }

        log::debug!("Added {} page(s) from {}", page_ids.len(), resolved.display());
        collation.last_page += page_ids.len();
        Ok(())
    }
}
