//! End-to-end collation: index text in, PDF file out.

use collatepdf::collate::Assembler;
use collatepdf::config::{Config, PageSize};
use collatepdf::index::Index;
use collatepdf::render::Font;
use lopdf::Document;
use rstest::rstest;
use std::path::Path;

use crate::common::{media_box, output_path, page_labels, workspace, write_pdf, write_pdf_sized};

const SCENARIO: &str = "\
# Bundle for review
@ Intro
doc1.pdf
# BLANK
doc2.pdf
";

fn config_in(dir: &Path, output: &Path, index: &Index) -> Config {
    let mut config = Config {
        root_dir: Some(dir.to_path_buf()),
        output_file: output.to_path_buf(),
        ..Config::default()
    };
    config.apply_all(index.settings());
    config.validate().unwrap();
    config
}

#[test]
fn test_scenario_written_and_reloaded() {
    let dir = workspace();
    let output = output_path(&dir);
    let index = Index::parse(SCENARIO).unwrap();
    let config = config_in(dir.path(), &output, &index);
    let font = Font::load(&config.font_source()).unwrap();

    let (assembly, stats) = Assembler::new(&config, &font).run(&index).unwrap();
    assert_eq!(
        assembly.toc,
        vec!["", "p. 2 — Intro", "p. 3 — doc1", "p. 6 — doc2"]
    );
    assert_eq!(stats.page_count, 6);
    assert!(stats.file_size > 0);

    let doc = Document::load(&output).unwrap();
    assert_eq!(
        page_labels(&doc),
        vec![
            Some("p. 6 — doc2".to_string()),
            Some("p. 2".to_string()),
            Some("p. 3 — doc1".to_string()),
            Some("p. 4 — doc1".to_string()),
            None,
            Some("p. 6 — doc2".to_string()),
        ]
    );
}

#[test]
fn test_every_page_has_configured_geometry() {
    let dir = workspace();
    write_pdf_sized(&dir.path().join("wide.pdf"), 1, 1000.0, 400.0);
    let output = output_path(&dir);
    let index = Index::parse("wide.pdf\ndoc1.pdf\n@ End\n# BLANK\n").unwrap();
    let config = config_in(dir.path(), &output, &index);
    let font = Font::default();

    Assembler::new(&config, &font).run(&index).unwrap();

    let doc = Document::load(&output).unwrap();
    let a4 = vec![0.0, 0.0, PageSize::A4.width, PageSize::A4.height];
    for page_number in 1..=doc.get_pages().len() as u32 {
        let got = media_box(&doc, page_number);
        for (g, w) in got.iter().zip(&a4) {
            assert!((g - w).abs() < 1e-2, "page {page_number}: {got:?}");
        }
    }
}

#[test]
fn test_directive_changes_page_format() {
    let dir = workspace();
    let output = output_path(&dir);
    let index = Index::parse("# PARAMS.page_format = letter\ndoc2.pdf\n").unwrap();
    let config = config_in(dir.path(), &output, &index);
    assert_eq!(config.page_size, PageSize::LETTER);

    Assembler::new(&config, &Font::default()).run(&index).unwrap();

    let doc = Document::load(&output).unwrap();
    let body = media_box(&doc, 2);
    assert!((body[2] - 612.0).abs() < 1e-2);
    assert!((body[3] - 792.0).abs() < 1e-2);
}

#[test]
fn test_duplex_with_cover() {
    let dir = workspace();
    let cover = dir.path().join("cover.pdf");
    write_pdf(&cover, 3);
    let output = output_path(&dir);
    let index = Index::parse("# PARAMS.duplex = True\ndoc2.pdf\n@ Part two\ndoc1.pdf\n").unwrap();
    let mut config = config_in(dir.path(), &output, &index);
    config.cover_file = Some(cover);

    let (assembly, _) = Assembler::new(&config, &Font::default()).run(&index).unwrap();

    // cover 3 + pad, TOC + pad, then doc2 on page 7.
    assert_eq!(assembly.cover_pages, 4);
    assert_eq!(assembly.first_page, 6);
    assert_eq!(
        assembly.toc,
        vec!["p. 7 — doc2", "", "p. 9 — Part two", "p. 10 — doc1"]
    );

    let doc = Document::load(&output).unwrap();
    let labels = page_labels(&doc);
    assert_eq!(labels.len(), 11);
    assert_eq!(labels[3], None);
    assert_eq!(labels[5], None);
    assert_eq!(labels[6].as_deref(), Some("p. 7 — doc2"));
    assert_eq!(labels[7], None);
    assert_eq!(labels[8].as_deref(), Some("p. 9"));
    assert_eq!(labels[10].as_deref(), Some("p. 11 — doc1"));
}

#[test]
fn test_nothing_after_stop_is_used() {
    let dir = workspace();
    let output = output_path(&dir);
    let index = Index::parse("doc1.pdf\n# STOP\n# PARAMS.nonsense = 1\ndoc2.pdf\n").unwrap();
    let config = config_in(dir.path(), &output, &index);

    let (assembly, _) = Assembler::new(&config, &Font::default()).run(&index).unwrap();
    assert_eq!(assembly.toc, vec!["p. 2 — doc1"]);
    assert_eq!(assembly.total_pages, 3);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = workspace();
    let output = output_path(&dir);
    let index = Index::parse(SCENARIO).unwrap();
    let config = config_in(dir.path(), &output, &index);

    let assembly = Assembler::new(&config, &Font::default())
        .assemble(&index)
        .unwrap();
    assert_eq!(assembly.total_pages, 6);
    assert!(!output.exists());
}

#[rstest]
#[case(0, 0, 0)]
#[case(1, 0, 2)]
#[case(2, 3, 1)]
#[case(3, 1, 0)]
fn test_final_counter(#[case] documents: usize, #[case] dividers: usize, #[case] blanks: usize) {
    let dir = workspace();
    let output = output_path(&dir);

    let mut text = String::new();
    for i in 0..documents.max(dividers).max(blanks) {
        if i < documents {
            text.push_str("doc1.pdf\n");
        }
        if i < dividers {
            text.push_str(&format!("@ Section {i}\n"));
        }
        if i < blanks {
            text.push_str("# BLANK\n");
        }
    }
    let index = Index::parse(&text).unwrap();
    let config = config_in(dir.path(), &output, &index);

    let assembly = Assembler::new(&config, &Font::default())
        .assemble(&index)
        .unwrap();

    let non_spacers = assembly.toc.iter().filter(|l| !l.is_empty()).count();
    let spacers = assembly.toc.len() - non_spacers;
    assert_eq!(non_spacers, documents + dividers);
    assert_eq!(spacers, dividers);
    assert_eq!(
        assembly.total_pages,
        assembly.first_page + 2 * documents + dividers + blanks
    );
}

/// A TrueType font installed on the machine, if any.
fn system_font() -> Option<std::path::PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(std::path::PathBuf::from)
    .find(|p| p.exists())
}

#[test]
fn test_embedded_font_output_reloads() {
    let Some(font_path) = system_font() else {
        eprintln!("no system TrueType font found, skipping");
        return;
    };
    let dir = workspace();
    let output = output_path(&dir);
    let index = Index::parse(SCENARIO).unwrap();
    let mut config = config_in(dir.path(), &output, &index);
    config.font = collatepdf::config::FontSource::TrueType(font_path);
    let font = Font::load(&config.font_source()).unwrap();

    let (assembly, _) = Assembler::new(&config, &font).run(&index).unwrap();
    assert_eq!(assembly.total_pages, 6);

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 6);
    let has_type0 = doc.objects.values().any(|o| {
        o.as_dict()
            .ok()
            .and_then(|d| d.get(b"Subtype").ok())
            .and_then(|s| s.as_name().ok())
            == Some(b"Type0".as_slice())
    });
    assert!(has_type0);
}
