use std::fmt;
use std::path::PathBuf;

use super::value::{
    Color, PageSize, parse_bool, parse_color, parse_length, parse_number, parse_page_size,
    parse_string,
};
use super::FontSource;
use crate::error::{CollateError, Result};

/// One whitelisted configuration assignment, already coerced to its type.
///
/// Settings come from `# PARAMS.key = value` lines in the index and from
/// `--set key=value` on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    PageFormat(PageSize),
    IndexFile(PathBuf),
    OutputFile(PathBuf),
    CoverFile(Option<PathBuf>),
    RootDir(Option<PathBuf>),
    Font(FontSource),
    Duplex(bool),
    TocTitle(String),
    TocFontSize(f32),
    TocX(f32),
    TocTitleY(f32),
    TocY(f32),
    TocLineStep(f32),
    DividerFontSize(f32),
    DividerLineSpacing(f32),
    OverlayFontSize(f32),
    OverlayBgColor(Color),
    OverlayEdgeColor(Color),
    OverlayTextColor(Color),
    OverlayOpacity(f32),
    OverlayWidth(f32),
    OverlayHeight(f32),
    OverlayX(f32),
    OverlayY(f32),
    OverlayTextX(f32),
    OverlayTextY(f32),
}

impl Setting {
    /// Every key accepted by [`Setting::parse`].
    pub const KEYS: &'static [&'static str] = &[
        "page_format",
        "index_file",
        "output_file",
        "cover_file",
        "root_dir",
        "font",
        "duplex",
        "toc_title",
        "toc_font_size",
        "toc_x",
        "toc_title_y",
        "toc_y",
        "toc_line_step",
        "divider_font_size",
        "divider_line_spacing",
        "overlay_font_size",
        "overlay_bgcolor",
        "overlay_edgecolor",
        "overlay_textcolor",
        "overlay_opacity",
        "overlay_w",
        "overlay_h",
        "overlay_x",
        "overlay_y",
        "overlay_x_text",
        "overlay_y_text",
    ];

    /// Coerce `value` to the type of `key`.
    ///
    /// # Errors
    ///
    /// [`CollateError::InvalidConfig`] when the key is not whitelisted or the
    /// value does not parse as the key's type.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let key = key.trim();
        let value = value.trim();

        let setting = match key {
            "page_format" => parse_page_size(value).map(Self::PageFormat),
            "index_file" => required_path(value).map(Self::IndexFile),
            "output_file" => required_path(value).map(Self::OutputFile),
            "cover_file" => Ok(Self::CoverFile(optional_path(value))),
            "root_dir" => Ok(Self::RootDir(optional_path(value))),
            "font" => {
                return FontSource::parse(&parse_string(value)).map(Self::Font);
            }
            "duplex" => parse_bool(value).map(Self::Duplex),
            "toc_title" => Ok(Self::TocTitle(parse_string(value))),
            "toc_font_size" => parse_number(value).map(Self::TocFontSize),
            "toc_x" => parse_length(value).map(Self::TocX),
            "toc_title_y" => parse_length(value).map(Self::TocTitleY),
            "toc_y" => parse_length(value).map(Self::TocY),
            "toc_line_step" => parse_length(value).map(Self::TocLineStep),
            "divider_font_size" => parse_number(value).map(Self::DividerFontSize),
            "divider_line_spacing" => parse_number(value).map(Self::DividerLineSpacing),
            "overlay_font_size" => parse_number(value).map(Self::OverlayFontSize),
            "overlay_bgcolor" => parse_color(value).map(Self::OverlayBgColor),
            "overlay_edgecolor" => parse_color(value).map(Self::OverlayEdgeColor),
            "overlay_textcolor" => parse_color(value).map(Self::OverlayTextColor),
            "overlay_opacity" => parse_number(value).and_then(|n| {
                if (0.0..=1.0).contains(&n) {
                    Ok(Self::OverlayOpacity(n))
                } else {
                    Err(format!("opacity must be between 0 and 1, got {n}"))
                }
            }),
            "overlay_w" => parse_length(value).map(Self::OverlayWidth),
            "overlay_h" => parse_length(value).map(Self::OverlayHeight),
            "overlay_x" => parse_length(value).map(Self::OverlayX),
            "overlay_y" => parse_length(value).map(Self::OverlayY),
            "overlay_x_text" => parse_length(value).map(Self::OverlayTextX),
            "overlay_y_text" => parse_length(value).map(Self::OverlayTextY),
            _ => {
                return Err(CollateError::invalid_config(format!(
                    "unknown parameter `{key}`"
                )));
            }
        };

        setting.map_err(|message| CollateError::invalid_config(format!("{key}: {message}")))
    }

    /// Parse `key = value` (or `key=value`).
    pub fn parse_assignment(text: &str) -> Result<Self> {
        let (key, value) = text.split_once('=').ok_or_else(|| {
            CollateError::invalid_config(format!("expected `key = value`, got `{}`", text.trim()))
        })?;
        Self::parse(key, value)
    }

    /// The directive key this setting was parsed from.
    pub fn key(&self) -> &'static str {
        match self {
            Self::PageFormat(_) => "page_format",
            Self::IndexFile(_) => "index_file",
            Self::OutputFile(_) => "output_file",
            Self::CoverFile(_) => "cover_file",
            Self::RootDir(_) => "root_dir",
            Self::Font(_) => "font",
            Self::Duplex(_) => "duplex",
            Self::TocTitle(_) => "toc_title",
            Self::TocFontSize(_) => "toc_font_size",
            Self::TocX(_) => "toc_x",
            Self::TocTitleY(_) => "toc_title_y",
            Self::TocY(_) => "toc_y",
            Self::TocLineStep(_) => "toc_line_step",
            Self::DividerFontSize(_) => "divider_font_size",
            Self::DividerLineSpacing(_) => "divider_line_spacing",
            Self::OverlayFontSize(_) => "overlay_font_size",
            Self::OverlayBgColor(_) => "overlay_bgcolor",
            Self::OverlayEdgeColor(_) => "overlay_edgecolor",
            Self::OverlayTextColor(_) => "overlay_textcolor",
            Self::OverlayOpacity(_) => "overlay_opacity",
            Self::OverlayWidth(_) => "overlay_w",
            Self::OverlayHeight(_) => "overlay_h",
            Self::OverlayX(_) => "overlay_x",
            Self::OverlayY(_) => "overlay_y",
            Self::OverlayTextX(_) => "overlay_x_text",
            Self::OverlayTextY(_) => "overlay_y_text",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.key())?;
        match self {
            Self::PageFormat(size) => write!(f, "{size}"),
            Self::IndexFile(path) | Self::OutputFile(path) => write!(f, "{}", path.display()),
            Self::CoverFile(path) | Self::RootDir(path) => match path {
                Some(path) => write!(f, "{}", path.display()),
                None => write!(f, "(none)"),
            },
            Self::Font(FontSource::Builtin(font)) => write!(f, "{}", font.base_name()),
            Self::Font(FontSource::TrueType(path)) => write!(f, "{}", path.display()),
            Self::Duplex(on) => write!(f, "{on}"),
            Self::TocTitle(title) => write!(f, "{title:?}"),
            Self::OverlayBgColor(color)
            | Self::OverlayEdgeColor(color)
            | Self::OverlayTextColor(color) => write!(f, "{color}"),
            Self::TocFontSize(n)
            | Self::TocX(n)
            | Self::TocTitleY(n)
            | Self::TocY(n)
            | Self::TocLineStep(n)
            | Self::DividerFontSize(n)
            | Self::DividerLineSpacing(n)
            | Self::OverlayFontSize(n)
            | Self::OverlayOpacity(n)
            | Self::OverlayWidth(n)
            | Self::OverlayHeight(n)
            | Self::OverlayX(n)
            | Self::OverlayY(n)
            | Self::OverlayTextX(n)
            | Self::OverlayTextY(n) => write!(f, "{n}"),
        }
    }
}

fn required_path(value: &str) -> std::result::Result<PathBuf, String> {
    let path = parse_string(value);
    if path.is_empty() {
        Err("expected a path".to_string())
    } else {
        Ok(PathBuf::from(path))
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    let path = parse_string(value);
    match path.as_str() {
        "" | "None" | "none" => None,
        _ => Some(PathBuf::from(path)),
    }
}
