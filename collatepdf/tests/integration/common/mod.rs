//! Shared helpers for the integration tests.
//!
//! Fixture PDFs are generated on the fly so the tests need no binary files.

use collatepdf::render::{Font, GlyphUsage};
use lopdf::content::Content;
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF with `pages` pages of `width` x `height` points.
///
/// The page tree is nested one level deep and the media box lives on the
/// intermediate node, so importing it exercises attribute inheritance.
pub fn write_pdf_sized(path: &Path, pages: usize, width: f32, height: f32) {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let node_id = doc.new_object_id();

    let mut kids = Vec::new();
    for n in 0..pages {
        let content = format!("BT /F1 12 Tf 72 72 Td (fixture page {}) Tj ET", n + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => node_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });
    doc.objects.insert(
        node_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }),
    );
    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(node_id)],
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => root_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("Failed to write fixture PDF");
}

/// Write a Letter-sized fixture PDF.
pub fn write_pdf(path: &Path, pages: usize) {
    write_pdf_sized(path, pages, 612.0, 792.0);
}

/// A scratch directory holding `doc1.pdf` (2 pages) and `doc2.pdf` (1 page).
pub fn workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_pdf(&dir.path().join("doc1.pdf"), 2);
    write_pdf(&dir.path().join("doc2.pdf"), 1);
    dir
}

/// Output path inside `dir`.
pub fn output_path(dir: &TempDir) -> PathBuf {
    dir.path().join("out").join("collated.pdf")
}

/// Last text drawn on each page, in page order.
///
/// For body pages this is the banner label; for the TOC page it is the last
/// entry. Pages without generated text yield `None`.
pub fn page_labels(doc: &Document) -> Vec<Option<String>> {
    let font = Font::default();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).ok()?;
            let top = match page.get(b"Contents").ok()? {
                Object::Array(items) if items.len() > 1 => items.last()?.as_reference().ok()?,
                _ => return None,
            };
            let stream = doc.get_object(top).ok()?.as_stream().ok()?;
            let bytes = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let content = Content::decode(&bytes).ok()?;
            let tj = content.operations.iter().rev().find(|op| op.operator == "Tj")?;
            Some(font.decode(tj.operands[0].as_str().ok()?, &GlyphUsage::new()))
        })
        .collect()
}

/// `[llx lly urx ury]` of a page's media box.
pub fn media_box(doc: &Document, page_number: u32) -> Vec<f32> {
    let pages = doc.get_pages();
    let page = doc.get_dictionary(pages[&page_number]).unwrap();
    page.get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect()
}
