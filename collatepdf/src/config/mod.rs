//! Configuration for collatepdf.
//!
//! A [`Config`] is built once per run: it starts from [`Config::default`],
//! then every `# PARAMS.key = value` directive found in the index is applied
//! in file order, and finally the command-line flags override whatever the
//! index set. The finished value is passed by reference to the collation
//! engine and the renderers; nothing reads configuration from global state.
//!
//! # Examples
//!
//! ```
//! use collatepdf::config::{Config, Setting};
//!
//! let mut config = Config::default();
//! config.apply(&Setting::parse_assignment("overlay_opacity = 0.5").unwrap());
//! assert_eq!(config.overlay.opacity, 0.5);
//! ```

mod setting;
pub mod value;

pub use setting::Setting;
pub use value::{Color, PageSize, POINTS_PER_INCH};

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{CollateError, Result};

/// Fonts that need no embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuiltinFont {
    /// Helvetica, WinAnsi encoded.
    Helvetica,
    /// Courier, WinAnsi encoded.
    Courier,
}

impl BuiltinFont {
    /// PostScript name used as `BaseFont`.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::Courier => "Courier",
        }
    }

    /// Look up a builtin font by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "helvetica" => Some(Self::Helvetica),
            "courier" => Some(Self::Courier),
            _ => None,
        }
    }
}

/// Where the text font comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSource {
    /// One of the standard PDF fonts.
    Builtin(BuiltinFont),
    /// A TrueType/OpenType file embedded into the output.
    TrueType(PathBuf),
}

impl Default for FontSource {
    fn default() -> Self {
        Self::Builtin(BuiltinFont::Helvetica)
    }
}

impl FontSource {
    /// Interpret a font value: a path ending in `.ttf`/`.otf` or a builtin name.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let path = Path::new(value);
        let is_font_file = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf"))
            .unwrap_or(false);

        if is_font_file {
            return Ok(Self::TrueType(path.to_path_buf()));
        }

        BuiltinFont::from_name(value).map(Self::Builtin).ok_or_else(|| {
            CollateError::invalid_config(format!(
                "Unknown font `{value}`. Use Helvetica, Courier or a path to a .ttf/.otf file"
            ))
        })
    }
}

/// Table of contents layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocStyle {
    /// Heading drawn above the entries.
    pub title: String,
    /// Font size for heading and entries.
    pub font_size: f32,
    /// Left edge of every line.
    pub x: f32,
    /// Baseline of the heading.
    pub title_y: f32,
    /// Baseline of the first entry.
    pub first_line_y: f32,
    /// Vertical distance between entries.
    pub line_step: f32,
}

impl Default for TocStyle {
    fn default() -> Self {
        Self {
            title: "Table of contents".to_string(),
            font_size: 12.0,
            x: 1.0 * POINTS_PER_INCH,
            title_y: 10.5 * POINTS_PER_INCH,
            first_line_y: 10.25 * POINTS_PER_INCH,
            line_step: 0.25 * POINTS_PER_INCH,
        }
    }
}

/// Divider page layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividerStyle {
    /// Font size of the title lines.
    pub font_size: f32,
    /// Baseline distance as a multiple of the font size.
    pub line_spacing: f32,
}

impl Default for DividerStyle {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            line_spacing: 1.5,
        }
    }
}

/// Banner composited onto every content and divider page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStyle {
    /// Font size of the banner text.
    pub font_size: f32,
    /// Rectangle fill.
    pub background: Color,
    /// Rectangle stroke.
    pub edge: Color,
    /// Text fill.
    pub text: Color,
    /// Fill opacity, 0 (transparent) to 1 (opaque).
    pub opacity: f32,
    /// Rectangle left edge.
    pub x: f32,
    /// Rectangle bottom edge.
    pub y: f32,
    /// Rectangle width.
    pub width: f32,
    /// Rectangle height.
    pub height: f32,
    /// Text start.
    pub text_x: f32,
    /// Text baseline.
    pub text_y: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            background: Color::new(0.3, 0.6, 0.9),
            edge: Color::WHITE,
            text: Color::BLACK,
            opacity: 0.9,
            x: 0.6 * POINTS_PER_INCH,
            y: 11.21 * POINTS_PER_INCH,
            width: 500.0,
            height: 20.0,
            text_x: 0.65 * POINTS_PER_INCH,
            text_y: 11.29 * POINTS_PER_INCH,
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Geometry of every generated and normalized page.
    pub page_size: PageSize,
    /// Index used when none is given on the command line.
    pub index_file: PathBuf,
    /// Output used when none is given on the command line.
    pub output_file: PathBuf,
    /// Document placed before the table of contents.
    pub cover_file: Option<PathBuf>,
    /// Base directory for relative paths listed in the index.
    pub root_dir: Option<PathBuf>,
    /// Text font.
    pub font: FontSource,
    /// Pad with blank pages so dividers and sections start on odd pages.
    pub duplex: bool,
    /// Table of contents layout.
    pub toc: TocStyle,
    /// Divider layout.
    pub divider: DividerStyle,
    /// Banner layout.
    pub overlay: OverlayStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            index_file: PathBuf::from("index.txt"),
            output_file: PathBuf::from("collated.pdf"),
            cover_file: None,
            root_dir: None,
            font: FontSource::default(),
            duplex: false,
            toc: TocStyle::default(),
            divider: DividerStyle::default(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl Config {
    /// Apply one setting.
    pub fn apply(&mut self, setting: &Setting) {
        match setting.clone() {
            Setting::PageFormat(size) => self.page_size = size,
            Setting::IndexFile(path) => self.index_file = path,
            Setting::OutputFile(path) => self.output_file = path,
            Setting::CoverFile(path) => self.cover_file = path,
            Setting::RootDir(path) => self.root_dir = path,
            Setting::Font(font) => self.font = font,
            Setting::Duplex(duplex) => self.duplex = duplex,
            Setting::TocTitle(title) => self.toc.title = title,
            Setting::TocFontSize(size) => self.toc.font_size = size,
            Setting::TocX(x) => self.toc.x = x,
            Setting::TocTitleY(y) => self.toc.title_y = y,
            Setting::TocY(y) => self.toc.first_line_y = y,
            Setting::TocLineStep(step) => self.toc.line_step = step,
            Setting::DividerFontSize(size) => self.divider.font_size = size,
            Setting::DividerLineSpacing(spacing) => self.divider.line_spacing = spacing,
            Setting::OverlayFontSize(size) => self.overlay.font_size = size,
            Setting::OverlayBgColor(color) => self.overlay.background = color,
            Setting::OverlayEdgeColor(color) => self.overlay.edge = color,
            Setting::OverlayTextColor(color) => self.overlay.text = color,
            Setting::OverlayOpacity(opacity) => self.overlay.opacity = opacity,
            Setting::OverlayWidth(width) => self.overlay.width = width,
            Setting::OverlayHeight(height) => self.overlay.height = height,
            Setting::OverlayX(x) => self.overlay.x = x,
            Setting::OverlayY(y) => self.overlay.y = y,
            Setting::OverlayTextX(x) => self.overlay.text_x = x,
            Setting::OverlayTextY(y) => self.overlay.text_y = y,
        }
    }

    /// Apply settings in order; later ones win.
    pub fn apply_all<'a, I>(&mut self, settings: I)
    where
        I: IntoIterator<Item = &'a Setting>,
    {
        for setting in settings {
            self.apply(setting);
        }
    }

    /// Resolve a path listed in the index against `root_dir`.
    pub fn resolve_input(&self, path: &Path) -> PathBuf {
        match &self.root_dir {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// The font to load.
    ///
    /// A relative font file is resolved against `root_dir` the same way
    /// index documents are.
    pub fn font_source(&self) -> FontSource {
        match &self.font {
            FontSource::TrueType(path) => FontSource::TrueType(self.resolve_input(path)),
            builtin => builtin.clone(),
        }
    }

    /// Check value ranges that the directive parser cannot see in isolation.
    ///
    /// # Errors
    ///
    /// Returns [`CollateError::InvalidConfig`] for non-positive sizes or an
    /// opacity outside `0..=1`.
    pub fn validate(&self) -> Result<()> {
        if self.page_size.width <= 0.0 || self.page_size.height <= 0.0 {
            return Err(CollateError::invalid_config(
                "Page format must have a positive width and height",
            ));
        }

        let font_sizes = [
            ("toc_font_size", self.toc.font_size),
            ("divider_font_size", self.divider.font_size),
            ("overlay_font_size", self.overlay.font_size),
        ];
        for (key, size) in font_sizes {
            if size <= 0.0 {
                return Err(CollateError::invalid_config(format!(
                    "{key} must be positive, got {size}"
                )));
            }
        }

        if self.toc.line_step <= 0.0 {
            return Err(CollateError::invalid_config("toc_line_step must be positive"));
        }

        if !(0.0..=1.0).contains(&self.overlay.opacity) {
            return Err(CollateError::invalid_config(format!(
                "overlay_opacity must be between 0 and 1, got {}",
                self.overlay.opacity
            )));
        }

        Ok(())
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| CollateError::other(format!("Failed to serialize configuration: {err}")))
    }
}
