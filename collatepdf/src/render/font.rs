//! Text fonts: the standard Helvetica/Courier pair, or a TrueType/OpenType
//! file embedded as a composite (Type0) font.
//!
//! Embedded fonts are addressed by glyph id (`Identity-H`), so every string
//! drawn with one records which glyphs it used. Those glyphs feed the `W`
//! widths array and the `ToUnicode` map written when the document is
//! finished.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::metrics;
use crate::config::{BuiltinFont, FontSource};
use crate::error::{CollateError, Result};

/// Glyphs drawn with an embedded font, by glyph id.
pub type GlyphUsage = BTreeMap<u16, char>;

#[derive(Debug, Clone, Copy)]
struct Glyph {
    id: u16,
    advance: u16,
}

/// An embedded TrueType/OpenType program and the metrics needed to draw it.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    path: PathBuf,
    data: Vec<u8>,
    base_name: String,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
    is_cff: bool,
    glyphs: HashMap<char, Glyph>,
    missing: Glyph,
}

impl EmbeddedFont {
    /// Read and parse a font file.
    ///
    /// # Errors
    ///
    /// [`CollateError::FontNotFound`] if the file is missing,
    /// [`CollateError::InvalidFont`] if it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CollateError::FontNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path).map_err(|e| CollateError::InvalidFont {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_bytes(path, data)
    }

    fn from_bytes(path: &Path, data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| CollateError::InvalidFont {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|code| {
                    let Some(c) = char::from_u32(code) else {
                        return;
                    };
                    if let Some(id) = subtable.glyph_index(code) {
                        let advance = face.glyph_hor_advance(id).unwrap_or(0);
                        glyphs.entry(c).or_insert(Glyph { id: id.0, advance });
                    }
                });
            }
        }

        if glyphs.is_empty() {
            return Err(CollateError::InvalidFont {
                path: path.to_path_buf(),
                reason: "font has no Unicode character map".to_string(),
            });
        }

        let missing = Glyph {
            id: 0,
            advance: face.glyph_hor_advance(ttf_parser::GlyphId(0)).unwrap_or(0),
        };
        let bbox = face.global_bounding_box();
        let ascent = face.ascender();

        let base_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(sanitize_font_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        log::debug!(
            "Loaded font {} ({} glyphs mapped)",
            path.display(),
            glyphs.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            base_name,
            units_per_em: face.units_per_em().max(1),
            ascent,
            descent: face.descender(),
            cap_height: face.capital_height().unwrap_or(ascent),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            is_cff: face.tables().cff.is_some(),
            glyphs,
            missing,
            data,
        })
    }

    fn glyph(&self, c: char) -> Glyph {
        self.glyphs.get(&c).copied().unwrap_or(self.missing)
    }

    /// Scale font units to 1/1000 em.
    fn to_pdf_units(&self, value: i32) -> i32 {
        value * 1000 / i32::from(self.units_per_em)
    }

    /// Path the font was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sanitized PostScript-style name.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    fn write_objects(&self, doc: &mut Document, font_id: ObjectId, used: &GlyphUsage) {
        let bbox: Vec<Object> = self
            .bbox
            .iter()
            .map(|v| Object::Integer(self.to_pdf_units(i32::from(*v)).into()))
            .collect();

        let (file_key, file_stream) = if self.is_cff {
            (
                "FontFile3",
                Stream::new(dictionary! { "Subtype" => "OpenType" }, self.data.clone()),
            )
        } else {
            (
                "FontFile2",
                Stream::new(
                    dictionary! { "Length1" => self.data.len() as i64 },
                    self.data.clone(),
                ),
            )
        };
        let file_id = doc.add_object(file_stream);

        let mut descriptor = dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.base_name.as_bytes().to_vec()),
            "Flags" => 32,
            "FontBBox" => bbox,
            "ItalicAngle" => 0,
            "Ascent" => self.to_pdf_units(self.ascent.into()) as i64,
            "Descent" => self.to_pdf_units(self.descent.into()) as i64,
            "CapHeight" => self.to_pdf_units(self.cap_height.into()) as i64,
            "StemV" => 80,
        };
        descriptor.set(file_key, file_id);
        let descriptor_id = doc.add_object(descriptor);

        let mut widths = Vec::with_capacity(used.len() * 2);
        for gid in used.keys() {
            let advance = self
                .glyphs
                .values()
                .find(|g| g.id == *gid)
                .map(|g| g.advance)
                .unwrap_or(self.missing.advance);
            widths.push(Object::Integer(i64::from(*gid)));
            widths.push(Object::Array(vec![Object::Integer(i64::from(
                self.to_pdf_units(advance.into()),
            ))]));
        }

        let mut descendant = dictionary! {
            "Type" => "Font",
            "Subtype" => if self.is_cff { "CIDFontType0" } else { "CIDFontType2" },
            "BaseFont" => Object::Name(self.base_name.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "W" => widths,
        };
        if !self.is_cff {
            descendant.set("CIDToGIDMap", "Identity");
        }
        let descendant_id = doc.add_object(descendant);

        let to_unicode_id = doc.add_object(Stream::new(
            Dictionary::new(),
            to_unicode_cmap(used).into_bytes(),
        ));

        doc.objects.insert(
            font_id,
            Object::Dictionary(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => Object::Name(self.base_name.as_bytes().to_vec()),
                "Encoding" => "Identity-H",
                "DescendantFonts" => vec![descendant_id.into()],
                "ToUnicode" => to_unicode_id,
            }),
        );
    }
}

/// The font used for every piece of generated text.
#[derive(Debug, Clone)]
pub enum Font {
    /// A standard font, not embedded.
    Builtin(BuiltinFont),
    /// A font program embedded into the output.
    Embedded(Box<EmbeddedFont>),
}

impl Default for Font {
    fn default() -> Self {
        Self::Builtin(BuiltinFont::Helvetica)
    }
}

impl Font {
    /// Resolve a configured font source.
    pub fn load(source: &FontSource) -> Result<Self> {
        match source {
            FontSource::Builtin(font) => Ok(Self::Builtin(*font)),
            FontSource::TrueType(path) => EmbeddedFont::load(path).map(|f| Self::Embedded(Box::new(f))),
        }
    }

    /// Name written as `BaseFont`.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Builtin(font) => font.base_name(),
            Self::Embedded(font) => font.base_name(),
        }
    }

    /// Width of `text` in points at `size`.
    pub fn string_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = match self {
            Self::Builtin(font) => {
                let width = match font {
                    BuiltinFont::Helvetica => metrics::helvetica_width,
                    BuiltinFont::Courier => metrics::courier_width,
                };
                metrics::to_win_ansi(text)
                    .into_iter()
                    .map(|b| u32::from(width(b)))
                    .sum()
            }
            Self::Embedded(font) => text
                .chars()
                .map(|c| font.to_pdf_units(font.glyph(c).advance.into()).max(0) as u32)
                .sum(),
        };
        units as f32 * size / 1000.0
    }

    /// Encode `text` as a string operand for `Tj`, recording embedded glyphs.
    pub fn encode(&self, text: &str, used: &mut GlyphUsage) -> Object {
        match self {
            Self::Builtin(_) => Object::String(metrics::to_win_ansi(text), StringFormat::Literal),
            Self::Embedded(font) => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for c in text.chars() {
                    let glyph = font.glyph(c);
                    used.entry(glyph.id).or_insert(c);
                    bytes.extend_from_slice(&glyph.id.to_be_bytes());
                }
                Object::String(bytes, StringFormat::Hexadecimal)
            }
        }
    }

    /// Decode a string operand produced by [`Font::encode`] back to text.
    pub fn decode(&self, bytes: &[u8], used: &GlyphUsage) -> String {
        match self {
            Self::Builtin(_) => bytes
                .iter()
                .map(|&b| metrics::win_ansi_char(b).unwrap_or('?'))
                .collect(),
            Self::Embedded(_) => bytes
                .chunks(2)
                .map(|pair| {
                    let gid = u16::from_be_bytes([pair[0], *pair.get(1).unwrap_or(&0)]);
                    used.get(&gid).copied().unwrap_or('?')
                })
                .collect(),
        }
    }

    /// Write the font dictionary (and any embedded objects) under `font_id`.
    pub fn write_resource(&self, doc: &mut Document, font_id: ObjectId, used: &GlyphUsage) {
        match self {
            Self::Builtin(font) => {
                doc.objects.insert(
                    font_id,
                    Object::Dictionary(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => font.base_name(),
                        "Encoding" => "WinAnsiEncoding",
                    }),
                );
            }
            Self::Embedded(font) => font.write_objects(doc, font_id, used),
        }
    }
}

fn sanitize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

fn to_unicode_cmap(used: &GlyphUsage) -> String {
    let mut out = String::new();
    out.push_str("/CIDInit /ProcSet findresource begin\n");
    out.push_str("12 dict begin\n");
    out.push_str("begincmap\n");
    out.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
    out.push_str("/CMapName /Adobe-Identity-UCS def\n");
    out.push_str("/CMapType 2 def\n");
    out.push_str("1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

    let entries: Vec<(&u16, &char)> = used.iter().collect();
    for chunk in entries.chunks(100) {
        let _ = writeln!(out, "{} beginbfchar", chunk.len());
        for (gid, c) in chunk {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            let _ = writeln!(out, "<{gid:04X}> <{hex}>");
        }
        out.push_str("endbfchar\n");
    }

    out.push_str("endcmap\n");
    out.push_str("CMapName currentdict /CMap defineresource pop\n");
    out.push_str("end\nend\n");
    out
}
