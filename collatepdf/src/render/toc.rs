use super::{Canvas, Font, Layer};
use crate::config::TocStyle;
use crate::error::Result;

/// Heading plus one line per entry, descending by `line_step`.
///
/// There is no pagination; entries that fall below the page are still
/// drawn and a warning is logged.
pub(super) fn render<S: AsRef<str>>(style: &TocStyle, font: &Font, entries: &[S]) -> Result<Layer> {
    let mut canvas = Canvas::new(font);
    canvas.set_font_size(style.font_size);
    canvas.draw_string(style.x, style.title_y, &style.title);

    let mut y = style.first_line_y;
    let mut overflow = 0usize;
    for entry in entries {
        let entry = entry.as_ref();
        if y < 0.0 {
            overflow += 1;
        }
        if !entry.is_empty() {
            canvas.draw_string(style.x, y, entry);
        }
        y -= style.line_step;
    }

    if overflow > 0 {
        log::warn!(
            "Table of contents overflows the page: {overflow} of {} entries fall below the bottom edge",
            entries.len()
        );
    }

    canvas.finish()
}
