//! Typed values accepted on the right-hand side of a directive.
//!
//! Nothing here evaluates expressions: a value is a number, a length
//! (number times unit), a boolean, a quoted or bare string, a color or a
//! page size. Every parser returns a plain message on failure; callers
//! attach the key and the line number.

use serde::Serialize;
use std::fmt;

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Points per centimetre.
pub const POINTS_PER_CM: f32 = POINTS_PER_INCH / 2.54;

/// Points per millimetre.
pub const POINTS_PER_MM: f32 = POINTS_PER_CM / 10.0;

/// Result of parsing one value.
pub type ValueResult<T> = std::result::Result<T, String>;

/// RGB color with components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// `(1, 1, 1)`
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    /// `(0, 0, 0)`
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    /// Components in `0..=1`.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "red" => Self::new(1.0, 0.0, 0.0),
            "green" => Self::new(0.0, 0.5, 0.0),
            "blue" => Self::new(0.0, 0.0, 1.0),
            "yellow" => Self::new(1.0, 1.0, 0.0),
            "orange" => Self::new(1.0, 0.647, 0.0),
            "gray" | "grey" => Self::new(0.5, 0.5, 0.5),
            "lightgray" | "lightgrey" => Self::new(0.827, 0.827, 0.827),
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO 216 sizes, portrait, in points.
    pub const A3: PageSize = PageSize::new(841.8898, 1190.5513);
    pub const A4: PageSize = PageSize::new(595.2756, 841.8898);
    pub const A5: PageSize = PageSize::new(419.5276, 595.2756);
    /// US sizes, portrait.
    pub const LETTER: PageSize = PageSize::new(612.0, 792.0);
    pub const LEGAL: PageSize = PageSize::new(612.0, 1008.0);

    /// Size from width and height in points.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Same size with width and height swapped if needed so width > height.
    pub fn landscape(self) -> Self {
        if self.width < self.height {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }

    fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a3" => Some(Self::A3),
            "a4" => Some(Self::A4),
            "a5" => Some(Self::A5),
            "letter" => Some(Self::LETTER),
            "legal" => Some(Self::LEGAL),
            _ => None,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} x {:.1} pt", self.width, self.height)
    }
}

/// Parse a plain number.
pub fn parse_number(value: &str) -> ValueResult<f32> {
    let value = value.trim();
    value
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("expected a number, got `{value}`"))
}

fn unit_factor(unit: &str) -> Option<f32> {
    match unit.trim().to_ascii_lowercase().as_str() {
        "" | "pt" => Some(1.0),
        "in" | "inch" => Some(POINTS_PER_INCH),
        "cm" => Some(POINTS_PER_CM),
        "mm" => Some(POINTS_PER_MM),
        _ => None,
    }
}

/// Parse a length in points: `500`, `11.21 * inch`, `inch * 2`, `2cm`, `3 mm`.
pub fn parse_length(value: &str) -> ValueResult<f32> {
    let value = value.trim();
    let invalid = || format!("expected a length such as `72`, `1.5 * inch` or `2cm`, got `{value}`");

    if let Some((left, right)) = value.split_once('*') {
        let (left, right) = (left.trim(), right.trim());
        return match (parse_number(left), unit_factor(right)) {
            (Ok(n), Some(factor)) => Ok(n * factor),
            _ => match (unit_factor(left), parse_number(right)) {
                (Some(factor), Ok(n)) => Ok(n * factor),
                _ => Err(invalid()),
            },
        };
    }

    let split = value
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    if number.trim().is_empty() {
        return Err(invalid());
    }
    let factor = unit_factor(unit).ok_or_else(invalid)?;
    parse_number(number).map(|n| n * factor).map_err(|_| invalid())
}

/// Parse a boolean.
pub fn parse_bool(value: &str) -> ValueResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected True or False, got `{other}`")),
    }
}

/// Parse a string, removing one pair of matching `'` or `"` quotes.
pub fn parse_string(value: &str) -> String {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

fn split_tuple(value: &str) -> Option<Vec<&str>> {
    let inner = value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .or_else(|| value.strip_prefix('[').and_then(|v| v.strip_suffix(']')))?;
    Some(
        inner
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect(),
    )
}

/// Parse a color: `(r, g, b)` in `0..=1`, `#rrggbb`, or a name.
pub fn parse_color(value: &str) -> ValueResult<Color> {
    let value = value.trim();

    if let Some(parts) = split_tuple(value) {
        if parts.len() != 3 {
            return Err(format!("expected three color components, got `{value}`"));
        }
        let mut components = [0.0f32; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            let n = parse_number(part)?;
            if !(0.0..=1.0).contains(&n) {
                return Err(format!("color component {n} is outside 0..1"));
            }
            *slot = n;
        }
        return Ok(Color::new(components[0], components[1], components[2]));
    }

    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16).map(|v| f32::from(v) / 255.0)
            };
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Ok(Color::new(r, g, b));
            }
        }
        return Err(format!("expected #rrggbb, got `{value}`"));
    }

    Color::named(&parse_string(value)).ok_or_else(|| format!("unknown color `{value}`"))
}

/// Parse a page size: `A4`, `letter`, `landscape(A4)` or `(w, h)` lengths.
pub fn parse_page_size(value: &str) -> ValueResult<PageSize> {
    let value = value.trim();

    if let Some(inner) = value
        .strip_prefix("landscape(")
        .and_then(|v| v.strip_suffix(')'))
    {
        return parse_page_size(inner).map(PageSize::landscape);
    }

    if let Some(parts) = split_tuple(value) {
        if parts.len() != 2 {
            return Err(format!("expected (width, height), got `{value}`"));
        }
        let width = parse_length(parts[0])?;
        let height = parse_length(parts[1])?;
        if width <= 0.0 || height <= 0.0 {
            return Err(format!("page size must be positive, got `{value}`"));
        }
        return Ok(PageSize::new(width, height));
    }

    PageSize::named(&parse_string(value)).ok_or_else(|| {
        format!("unknown page format `{value}`; use A3, A4, A5, letter, legal or (w, h)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[rstest]
    #[case("500", 500.0)]
    #[case("11.21 * inch", 807.12)]
    #[case("0.6*inch", 43.2)]
    #[case("inch * 2", 144.0)]
    #[case("2cm", 56.6929)]
    #[case("10 mm", 28.3465)]
    #[case("12pt", 12.0)]
    #[case(".5in", 36.0)]
    fn test_parse_length(#[case] input: &str, #[case] expected: f32) {
        let got = parse_length(input).unwrap();
        assert!(close(got, expected), "{input} -> {got}");
    }

    #[rstest]
    #[case("")]
    #[case("inch")]
    #[case("12 furlongs")]
    #[case("2 * 3")]
    #[case("__import__('os')")]
    fn test_parse_length_rejects(#[case] input: &str) {
        assert!(parse_length(input).is_err());
    }

    #[rstest]
    #[case("True", true)]
    #[case("false", false)]
    #[case("yes", true)]
    #[case("off", false)]
    #[case("1", true)]
    fn test_parse_bool(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_bool(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_bool_rejects_other_words() {
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_parse_string_strips_one_quote_pair() {
        assert_eq!(parse_string("'Contents'"), "Contents");
        assert_eq!(parse_string("\"a b\""), "a b");
        assert_eq!(parse_string("bare words"), "bare words");
        assert_eq!(parse_string("'mismatched\""), "'mismatched\"");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("(.3, .6, .9)").unwrap(), Color::new(0.3, 0.6, 0.9));
        assert_eq!(parse_color("white").unwrap(), Color::WHITE);
        assert_eq!(parse_color("'black'").unwrap(), Color::BLACK);

        let hex = parse_color("#ff8000").unwrap();
        assert!(close(hex.r, 1.0) && close(hex.g, 128.0 / 255.0) && close(hex.b, 0.0));

        assert!(parse_color("(1, 2, 3)").is_err());
        assert!(parse_color("(1, 1)").is_err());
        assert!(parse_color("#12").is_err());
        assert!(parse_color("chartreuse-ish").is_err());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("A4").unwrap(), PageSize::A4);
        assert_eq!(parse_page_size("letter").unwrap(), PageSize::LETTER);

        let landscape = parse_page_size("landscape(A4)").unwrap();
        assert_eq!(landscape.width, PageSize::A4.height);

        let custom = parse_page_size("(8.5 * inch, 11 * inch)").unwrap();
        assert_eq!(custom, PageSize::LETTER);

        assert!(parse_page_size("B7").is_err());
        assert!(parse_page_size("(0, 100)").is_err());
    }
}
