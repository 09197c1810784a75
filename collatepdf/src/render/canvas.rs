//! A small recording canvas over lopdf content operations.
//!
//! Everything drawn is wrapped in `q`/`Q` so a layer never leaks graphics
//! state into the page it is composited onto.

use lopdf::Object;
use lopdf::content::{Content, Operation};
use std::collections::BTreeSet;

use super::font::{Font, GlyphUsage};
use super::{FONT_RESOURCE, Layer, alpha_resource};
use crate::config::Color;
use crate::error::Result;

/// How a path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Fill with the current fill color (`f`).
    Fill,
    /// Outline with the current stroke color (`S`).
    Stroke,
    /// Fill, then outline (`B`).
    FillStroke,
}

impl Paint {
    fn operator(self) -> &'static str {
        match self {
            Self::Fill => "f",
            Self::Stroke => "S",
            Self::FillStroke => "B",
        }
    }
}

/// Records drawing operations for one page-sized layer.
pub struct Canvas<'a> {
    font: &'a Font,
    font_size: f32,
    operations: Vec<Operation>,
    glyphs: GlyphUsage,
    uses_font: bool,
    alphas: BTreeSet<u16>,
}

impl<'a> Canvas<'a> {
    /// Create an empty canvas drawing text in `font` at 12 pt.
    ///
    /// # Arguments
    ///
    /// * `font` - Font used by every string drawn on this canvas
    pub fn new(font: &'a Font) -> Self {
        Self {
            font,
            font_size: 12.0,
            operations: vec![Operation::new("q", vec![])],
            glyphs: GlyphUsage::new(),
            uses_font: false,
            alphas: BTreeSet::new(),
        }
    }

    /// Set the size, in points, of text drawn from now on.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Set the RGB color used for fills and text.
    pub fn set_fill_color(&mut self, color: Color) {
        self.operations.push(Operation::new(
            "rg",
            vec![color.r.into(), color.g.into(), color.b.into()],
        ));
    }

    /// Set the RGB color used for outlines.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.operations.push(Operation::new(
            "RG",
            vec![color.r.into(), color.g.into(), color.b.into()],
        ));
    }

    /// Set the fill opacity through an `ExtGState` resource.
    ///
    /// `alpha` is clamped to `0..=1` and rounded to thousandths, so nearby
    /// values share one graphics state.
    pub fn set_fill_alpha(&mut self, alpha: f32) {
        let milli = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u16;
        self.alphas.insert(milli);
        self.operations.push(Operation::new(
            "gs",
            vec![Object::Name(alpha_resource(milli).into_bytes())],
        ));
    }

    /// Add a rectangle with its lower-left corner at (`x`, `y`).
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Lower-left corner in points
    /// * `width`, `height` - Size in points
    /// * `paint` - Whether to fill, stroke or both
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        self.operations.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.operations.push(Operation::new(paint.operator(), vec![]));
    }

    /// Draw `text` with its baseline starting at (`x`, `y`).
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        self.uses_font = true;
        let operand = self.font.encode(text, &mut self.glyphs);
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    self.font_size.into(),
                ],
            ),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![operand]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Draw `text` horizontally centred on `center_x`.
    pub fn draw_centred_string(&mut self, center_x: f32, y: f32, text: &str) {
        let x = center_x - self.string_width(text) / 2.0;
        self.draw_string(x, y, text);
    }

    /// Width of `text` at the current font size.
    pub fn string_width(&self, text: &str) -> f32 {
        self.font.string_width(text, self.font_size)
    }

    /// Encode the recorded operations into a layer.
    pub fn finish(mut self) -> Result<Layer> {
        self.operations.push(Operation::new("Q", vec![]));
        let content = Content {
            operations: self.operations,
        }
        .encode()?;

        Ok(Layer {
            content,
            glyphs: self.glyphs,
            uses_font: self.uses_font,
            alphas: self.alphas,
        })
    }
}
