use super::{Canvas, Font, Layer};
use crate::config::{DividerStyle, PageSize};
use crate::error::Result;

/// Title lines of a divider, split on `/`.
///
/// Spaces around a `/` stay on the lines and count towards their width
/// when centring.
pub(super) fn title_lines(title: &str) -> Vec<&str> {
    title.split('/').collect()
}

/// One page with the title block centred both ways.
///
/// The first baseline sits at `(h + n * size) / 2`; each following line is
/// `size * line_spacing` lower.
pub(super) fn render(
    style: &DividerStyle,
    page: PageSize,
    font: &Font,
    title: &str,
) -> Result<Layer> {
    let lines = title_lines(title);
    let size = style.font_size;
    let total_height = lines.len() as f32 * size;
    let start_y = (page.height + total_height) / 2.0;

    let mut canvas = Canvas::new(font);
    canvas.set_font_size(size);
    for (i, line) in lines.iter().enumerate() {
        let y = start_y - i as f32 * size * style.line_spacing;
        canvas.draw_centred_string(page.width / 2.0, y, line);
    }

    log::debug!("Rendered divider `{title}` ({} lines)", lines.len());
    canvas.finish()
}
