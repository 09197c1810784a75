//! The index file: a plain-text manifest listing what goes into the
//! collated document, one entry per line.
//!
//! ```text
//! # comment line (ignored unless it is a PARAMS. directive)
//! # PARAMS.duplex = True
//! @ Title / Subtitle
//! path/to/file.pdf
//! # BLANK
//! # STOP
//! ```
//!
//! Entries keep file order; order is the only source of sequencing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Setting;
use crate::error::{CollateError, Result};

const STOP_MARKER: &str = "# STOP";
const BLANK_MARKER: &str = "# BLANK";
const DIVIDER_PREFIX: char = '@';
const DIRECTIVE_PREFIX: &str = "PARAMS.";

/// Separator placed between path components by [`pretty_name`].
pub const PATH_SEPARATOR: &str = " — ";

const HEADER: &str = "\
# Comments start with #.
# Empty lines are ignored.
# Index processing is stopped with `# STOP` on a line.
# PDF files are included by putting their paths on each line.
# Divider pages are included as follows: `@ Some title / Subtitle below`.

";

/// One meaningful line of the index.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEntry {
    /// A PDF included in full.
    Document(PathBuf),
    /// A divider page; `/` separates stacked title lines.
    Divider(String),
    /// One untouched blank page.
    Blank,
    /// A configuration assignment, applied before collation.
    Directive {
        /// 1-based line number in the index.
        line_number: usize,
        /// The parsed assignment.
        setting: Setting,
    },
}

impl IndexEntry {
    /// True for entries that produce pages.
    pub fn is_content(&self) -> bool {
        !matches!(self, Self::Directive { .. })
    }
}

enum Line<'a> {
    Stop,
    Empty,
    Comment,
    Entry(IndexEntry),
    Directive(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.starts_with(STOP_MARKER) {
        return Line::Stop;
    }
    if line.is_empty() {
        return Line::Empty;
    }
    if line == BLANK_MARKER {
        return Line::Entry(IndexEntry::Blank);
    }
    if let Some(title) = line.strip_prefix(DIVIDER_PREFIX) {
        return Line::Entry(IndexEntry::Divider(title.trim().to_string()));
    }
    match line.strip_prefix('#') {
        None => Line::Entry(IndexEntry::Document(PathBuf::from(line))),
        Some(body) => match body.trim_start().strip_prefix(DIRECTIVE_PREFIX) {
            Some(assignment) => Line::Directive(assignment),
            None => Line::Comment,
        },
    }
}

/// Cut a trailing `# remark` from a `key = value` assignment.
///
/// A remark starts at a `#` outside quotes that follows whitespace and is
/// not the first character of the value, so `#rrggbb` colors survive.
fn strip_inline_comment(text: &str) -> &str {
    let value_start = text.find('=').map_or(0, |eq| {
        let rest = &text[eq + 1..];
        eq + 1 + (rest.len() - rest.trim_start().len())
    });

    let mut quote = None;
    let mut prev = '=';
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '#') if i > value_start && prev.is_whitespace() => return &text[..i],
            _ => {}
        }
        prev = c;
    }
    text
}

/// A parsed index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    entries: Vec<IndexEntry>,
    stopped_at: Option<usize>,
}

impl Index {
    /// Parse index text.
    ///
    /// Lines are trimmed before classification. Parsing ends at the first
    /// line starting with `# STOP`; nothing after it is looked at.
    ///
    /// # Errors
    ///
    /// [`CollateError::InvalidDirective`] for a `# PARAMS.` line whose key is
    /// not whitelisted or whose value does not parse.
    pub fn parse(source: &str) -> Result<Self> {
        let mut index = Self::default();

        for (i, raw) in source.lines().enumerate() {
            let line_number = i + 1;
            match classify(raw.trim()) {
                Line::Stop => {
                    index.stopped_at = Some(line_number);
                    break;
                }
                Line::Empty | Line::Comment => {}
                Line::Entry(entry) => index.entries.push(entry),
                Line::Directive(assignment) => {
                    let setting = Setting::parse_assignment(strip_inline_comment(assignment))
                        .map_err(|err| match err {
                            CollateError::InvalidConfig { message } => {
                                CollateError::invalid_directive(line_number, message)
                            }
                            other => other,
                        })?;
                    index.entries.push(IndexEntry::Directive {
                        line_number,
                        setting,
                    });
                }
            }
        }

        log::debug!(
            "Parsed index: {} entries{}",
            index.entries.len(),
            index
                .stopped_at
                .map(|n| format!(", stopped at line {n}"))
                .unwrap_or_default()
        );

        Ok(index)
    }

    /// Read and parse an index file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CollateError::file_not_found(path.to_path_buf())
            } else {
                CollateError::FailedToReadIndex {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&source)
    }

    /// Build an index from entries directly.
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Self {
            entries,
            stopped_at: None,
        }
    }

    /// All entries in file order, directives included.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Configuration directives in file order.
    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.entries.iter().filter_map(|entry| match entry {
            IndexEntry::Directive { setting, .. } => Some(setting),
            _ => None,
        })
    }

    /// Entries that produce pages.
    pub fn content(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter().filter(|entry| entry.is_content())
    }

    /// Line of the `# STOP` marker, if one was found.
    pub fn stopped_at(&self) -> Option<usize> {
        self.stopped_at
    }

    /// True if the index has no content entries.
    pub fn is_empty(&self) -> bool {
        self.content().next().is_none()
    }
}

/// Human-readable name for a path.
///
/// Strips a leading `./`, drops the extension of the last component and,
/// when `replace_slashes` is set, joins the components with `" — "`.
///
/// ```
/// use collatepdf::index::pretty_name;
///
/// assert_eq!(pretty_name("a/b/c.pdf", true), "a — b — c");
/// assert_eq!(pretty_name("a/b/c.pdf", false), "a/b/c");
/// ```
pub fn pretty_name(path: &str, replace_slashes: bool) -> String {
    let mut name = path;
    while let Some(rest) = name.strip_prefix("./") {
        name = rest;
    }

    let file_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    let name = match name[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &name[..file_start + dot],
        _ => name,
    };

    if replace_slashes {
        name.replace('/', PATH_SEPARATOR)
    } else {
        name.to_string()
    }
}

fn is_pdf_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Render index text for a list of paths.
///
/// Each `.pdf` path becomes a divider titled after the file followed by the
/// path itself. Other paths are left out.
pub fn render_index<S: AsRef<str>>(paths: &[S]) -> String {
    let mut out = String::from(HEADER);
    for path in paths {
        let path: &str = path.as_ref();
        if !is_pdf_path(path) {
            continue;
        }
        out.push_str(&format!(
            "{DIVIDER_PREFIX} {}\n{path}\n\n",
            pretty_name(path, false)
        ));
    }
    out
}

/// Write an index file for `paths` to `destination`.
///
/// Returns the number of documents listed.
pub fn write_index<S: AsRef<str>>(paths: &[S], destination: &Path) -> Result<usize> {
    let listed = paths.iter().filter(|p| is_pdf_path(p.as_ref())).count();
    let skipped = paths.len() - listed;
    if skipped > 0 {
        log::debug!("Left {skipped} non-PDF path(s) out of the index");
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CollateError::FailedToCreateOutput {
            path: destination.to_path_buf(),
            source,
        })?;
    }

    fs::write(destination, render_index(paths)).map_err(|source| CollateError::FailedToWrite {
        path: destination.to_path_buf(),
        source,
    })?;

    log::info!("Wrote index with {listed} document(s) to {}", destination.display());
    Ok(listed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use rstest::rstest;

    #[rstest]
    #[case("a/b/c.pdf", true, "a — b — c")]
    #[case("a/b/c.pdf", false, "a/b/c")]
    #[case("./report.pdf", true, "report")]
    #[case("./docs/v1.2/notes", false, "docs/v1.2/notes")]
    #[case("archive.tar.pdf", true, "archive.tar")]
    #[case("README", true, "README")]
    fn test_pretty_name(#[case] path: &str, #[case] replace: bool, #[case] expected: &str) {
        assert_eq!(pretty_name(path, replace), expected);
    }

    #[test]
    fn test_parse_classifies_lines() {
        let source = "\
# a comment
@ Intro / Overview

docs/one.pdf
  # BLANK
two.pdf
";
        let index = Index::parse(source).unwrap();
        assert_eq!(
            index.entries(),
            &[
                IndexEntry::Divider("Intro / Overview".into()),
                IndexEntry::Document(PathBuf::from("docs/one.pdf")),
                IndexEntry::Blank,
                IndexEntry::Document(PathBuf::from("two.pdf")),
            ]
        );
        assert_eq!(index.stopped_at(), None);
    }

    #[test]
    fn test_nothing_after_stop_is_parsed() {
        let source = "a.pdf\n# STOP here\n# PARAMS.nonsense = !!\nb.pdf\n";
        let index = Index::parse(source).unwrap();
        assert_eq!(index.entries(), &[IndexEntry::Document(PathBuf::from("a.pdf"))]);
        assert_eq!(index.stopped_at(), Some(2));
    }

    #[test]
    fn test_blank_marker_must_match_exactly() {
        let index = Index::parse("# BLANK page please\n").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_directives_are_collected_in_order() {
        let source = "\
# PARAMS.duplex = True
# PARAMS.page_format = A4  # (8*inch, 10*inch)
#PARAMS.toc_title = 'Summary # 1'
x.pdf
";
        let index = Index::parse(source).unwrap();
        let keys: Vec<_> = index.settings().map(Setting::key).collect();
        assert_eq!(keys, vec!["duplex", "page_format", "toc_title"]);
        assert_eq!(index.content().count(), 1);

        let title = index.settings().last().cloned();
        assert_eq!(title, Some(Setting::TocTitle("Summary # 1".into())));
    }

    #[rstest]
    #[case("# PARAMS.overlay_bgcolor = #ff8000\n")]
    #[case("# PARAMS.overlay_bgcolor = #ff8000  # orange\n")]
    #[case("# PARAMS.overlay_bgcolor=#FF8000\n")]
    fn test_hex_color_is_not_a_remark(#[case] source: &str) {
        let index = Index::parse(source).unwrap();
        let expected = Color::new(1.0, f32::from(0x80u8) / 255.0, 0.0);
        assert_eq!(
            index.settings().next(),
            Some(&Setting::OverlayBgColor(expected))
        );
    }

    #[test]
    fn test_remark_needs_leading_whitespace() {
        let index = Index::parse("# PARAMS.toc_title = Part#2\n").unwrap();
        assert_eq!(
            index.settings().next(),
            Some(&Setting::TocTitle("Part#2".into()))
        );
    }

    #[test]
    fn test_unknown_directive_reports_line() {
        let err = Index::parse("a.pdf\n\n# PARAMS.overlay_z = 3\n").unwrap_err();
        match err {
            CollateError::InvalidDirective { line_number, details } => {
                assert_eq!(line_number, 3);
                assert!(details.contains("overlay_z"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_value_reports_line() {
        let err = Index::parse("# PARAMS.overlay_x = __import__('os')\n").unwrap_err();
        assert!(matches!(err, CollateError::InvalidDirective { line_number: 1, .. }));
    }

    #[test]
    fn test_render_index_skips_non_pdf() {
        let text = render_index(&["./a/b.pdf", "notes.txt", "c.PDF"]);
        assert!(text.starts_with("# Comments start with #."));
        assert!(text.contains("@ a/b\n./a/b.pdf\n\n"));
        assert!(text.contains("@ c\nc.PDF\n\n"));
        assert!(!text.contains("notes"));
    }

    #[test]
    fn test_rendered_index_parses_back() {
        let index = Index::parse(&render_index(&["one.pdf", "two.pdf"])).unwrap();
        assert_eq!(index.content().count(), 4);
        assert_eq!(index.settings().count(), 0);
    }

    #[test]
    fn test_write_index() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("index.txt");

        let listed = write_index(&["x.pdf", "y.png"], &dest).unwrap();
        assert_eq!(listed, 1);

        let written = fs::read_to_string(&dest).unwrap();
        assert!(written.ends_with("@ x\nx.pdf\n\n"));
    }

    #[test]
    fn test_load_missing_index() {
        let err = Index::load(Path::new("/nonexistent/index.txt")).unwrap_err();
        assert!(matches!(err, CollateError::FileNotFound { .. }));
    }
}
