//! Failure modes: what aborts a run and what is skipped.

use collatepdf::collate::Assembler;
use collatepdf::config::{Config, FontSource};
use collatepdf::error::CollateError;
use collatepdf::index::Index;
use collatepdf::io::writer::temp_path;
use collatepdf::render::Font;
use lopdf::Document;
use std::fs;
use std::path::PathBuf;

use crate::common::{output_path, page_labels, workspace};

fn config_in(dir: &tempfile::TempDir) -> Config {
    Config {
        root_dir: Some(dir.path().to_path_buf()),
        output_file: output_path(dir),
        ..Config::default()
    }
}

#[test]
fn test_missing_document_matches_index_without_it() {
    let dir = workspace();
    let config = config_in(&dir);
    let font = Font::default();

    let with_missing = Index::parse("@ A\ndoc1.pdf\nghost.pdf\n# BLANK\ndoc2.pdf\n").unwrap();
    let without = Index::parse("@ A\ndoc1.pdf\n# BLANK\ndoc2.pdf\n").unwrap();

    let (a, _) = Assembler::new(&config, &font).run(&with_missing).unwrap();
    let a_labels = page_labels(&Document::load(&config.output_file).unwrap());

    let (b, _) = Assembler::new(&config, &font).run(&without).unwrap();
    let b_labels = page_labels(&Document::load(&config.output_file).unwrap());

    assert_eq!(a.toc, b.toc);
    assert_eq!(a.total_pages, b.total_pages);
    assert_eq!(a_labels, b_labels);
    assert_eq!(a.skipped, vec![dir.path().join("ghost.pdf")]);
    assert!(b.skipped.is_empty());
}

#[test]
fn test_malformed_directive_reports_line() {
    let err = Index::parse("doc1.pdf\n\n# PARAMS.overlay_opacity = lots\n").unwrap_err();
    match err {
        CollateError::InvalidDirective { line_number, .. } => assert_eq!(line_number, 3),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err_code("# PARAMS.unknown_key = 1\n"), 1);
}

fn err_code(index: &str) -> i32 {
    Index::parse(index).unwrap_err().exit_code()
}

#[test]
fn test_missing_font_is_fatal() {
    let err = Font::load(&FontSource::TrueType(PathBuf::from("/no/such/font.ttf"))).unwrap_err();
    assert!(matches!(err, CollateError::FontNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_missing_cover_writes_nothing() {
    let dir = workspace();
    let mut config = config_in(&dir);
    config.cover_file = Some(dir.path().join("no-cover.pdf"));

    let index = Index::parse("doc1.pdf\n").unwrap();
    let err = Assembler::new(&config, &Font::default()).run(&index).unwrap_err();

    assert!(matches!(err, CollateError::FileNotFound { .. }));
    assert!(!config.output_file.exists());
}

#[test]
fn test_corrupt_document_writes_nothing() {
    let dir = workspace();
    fs::write(dir.path().join("broken.pdf"), b"this is not a pdf").unwrap();
    let config = config_in(&dir);

    let index = Index::parse("doc1.pdf\nbroken.pdf\n").unwrap();
    let err = Assembler::new(&config, &Font::default()).run(&index).unwrap_err();

    assert!(matches!(err, CollateError::FailedToLoadPdf { .. }));
    assert_eq!(err.exit_code(), 3);
    assert!(!config.output_file.exists());
    assert!(!temp_path(&config.output_file).exists());
}

#[test]
fn test_output_directory_is_created() {
    let dir = workspace();
    let mut config = config_in(&dir);
    config.output_file = dir.path().join("a").join("b").join("out.pdf");

    let index = Index::parse("doc2.pdf\n").unwrap();
    Assembler::new(&config, &Font::default()).run(&index).unwrap();
    assert!(config.output_file.exists());
}

#[test]
fn test_output_path_is_directory() {
    let dir = workspace();
    let mut config = config_in(&dir);
    config.output_file = dir.path().to_path_buf();

    let index = Index::parse("doc2.pdf\n").unwrap();
    let err = Assembler::new(&config, &Font::default()).run(&index).unwrap_err();
    assert!(matches!(err, CollateError::InvalidConfig { .. }));
}

#[test]
fn test_missing_index_file() {
    let err = Index::load(&PathBuf::from("/no/such/index.txt")).unwrap_err();
    assert!(matches!(err, CollateError::FileNotFound { .. }));
}
