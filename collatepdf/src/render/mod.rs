//! Drawing generated pages: overlay banners, divider titles and the table
//! of contents.
//!
//! Every renderer produces a [`Layer`]: an encoded content stream plus the
//! resources it refers to. Layers are moved into
//! [`PageAccumulator::composite`](crate::collate::PageAccumulator::composite),
//! which consumes them.

mod canvas;
mod divider;
pub mod font;
pub mod metrics;
mod overlay;
mod toc;

pub use canvas::{Canvas, Paint};
pub use font::{EmbeddedFont, Font, GlyphUsage};

use std::collections::BTreeSet;

use crate::config::Config;
use crate::error::Result;

/// Resource name of the text font inside generated content.
pub const FONT_RESOURCE: &str = "FCollate";

/// Resource name of the graphics state setting fill opacity `milli / 1000`.
pub fn alpha_resource(milli: u16) -> String {
    format!("GSCollate{milli}")
}

/// A rendered, page-sized content stream and the resources it uses.
#[derive(Debug)]
pub struct Layer {
    pub(crate) content: Vec<u8>,
    pub(crate) glyphs: GlyphUsage,
    pub(crate) uses_font: bool,
    pub(crate) alphas: BTreeSet<u16>,
}

impl Layer {
    /// Encoded content stream.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Embedded-font glyphs drawn by this layer.
    pub fn glyphs(&self) -> &GlyphUsage {
        &self.glyphs
    }

    /// True if the layer draws text.
    pub fn uses_font(&self) -> bool {
        self.uses_font
    }

    /// Fill opacities used, in thousandths.
    pub fn alphas(&self) -> impl Iterator<Item = u16> + '_ {
        self.alphas.iter().copied()
    }
}

/// Renders generated content with one configuration and one font.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    config: &'a Config,
    font: &'a Font,
}

impl<'a> Renderer<'a> {
    /// Create a renderer.
    ///
    /// # Arguments
    ///
    /// * `config` - Layout, styles and page size for generated pages
    /// * `font` - Font loaded from `config.font_source()`
    pub fn new(config: &'a Config, font: &'a Font) -> Self {
        Self { config, font }
    }

    /// Configuration the renderer lays pages out with.
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Font used for all generated text.
    pub fn font(&self) -> &'a Font {
        self.font
    }

    /// Banner with `text`, composited onto content and divider pages.
    pub fn overlay(&self, text: &str) -> Result<Layer> {
        overlay::render(&self.config.overlay, self.font, text)
    }

    /// Full divider page for a `/`-separated title.
    pub fn divider(&self, title: &str) -> Result<Layer> {
        divider::render(&self.config.divider, self.config.page_size, self.font, title)
    }

    /// Table of contents page.
    pub fn toc<S: AsRef<str>>(&self, entries: &[S]) -> Result<Layer> {
        toc::render(&self.config.toc, self.font, entries)
    }
}

/// Label drawn in the banner of page `n`.
///
/// ```
/// assert_eq!(collatepdf::render::page_label(3, "doc1"), "p. 3 — doc1");
/// assert_eq!(collatepdf::render::page_label(2, ""), "p. 2");
/// ```
pub fn page_label(n: usize, name: &str) -> String {
    if name.is_empty() {
        format!("p. {n}")
    } else {
        format!("p. {n} — {name}")
    }
}
