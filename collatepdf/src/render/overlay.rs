use super::{Canvas, Font, Layer, Paint};
use crate::config::OverlayStyle;
use crate::error::Result;

/// Translucent banner rectangle with `text` on top.
pub(super) fn render(style: &OverlayStyle, font: &Font, text: &str) -> Result<Layer> {
    let mut canvas = Canvas::new(font);
    canvas.set_font_size(style.font_size);
    canvas.set_stroke_color(style.edge);
    canvas.set_fill_color(style.background);
    canvas.set_fill_alpha(style.opacity);
    canvas.rect(style.x, style.y, style.width, style.height, Paint::FillStroke);
    canvas.set_fill_color(style.text);
    canvas.draw_string(style.text_x, style.text_y, text);
    canvas.finish()
}
