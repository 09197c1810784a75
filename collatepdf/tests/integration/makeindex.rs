//! Writing an index and collating from it.

use collatepdf::collate::Assembler;
use collatepdf::config::Config;
use collatepdf::index::{Index, IndexEntry, write_index};
use collatepdf::render::Font;
use collatepdf::utils::collect_index_inputs;
use std::fs;

use crate::common::{output_path, workspace};

#[test]
fn test_written_index_lists_pdfs_with_dividers() {
    let dir = workspace();
    fs::write(dir.path().join("readme.txt"), "not a pdf").unwrap();
    let index_path = dir.path().join("index.txt");

    let root = dir.path().to_string_lossy().into_owned();
    let paths: Vec<String> = collect_index_inputs([root.as_str()])
        .unwrap()
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    assert_eq!(paths.len(), 3);

    let listed = write_index(&paths, &index_path).unwrap();
    assert_eq!(listed, 2);

    let text = fs::read_to_string(&index_path).unwrap();
    assert!(text.starts_with("# "));
    assert!(!text.contains("readme"));

    let index = Index::load(&index_path).unwrap();
    let entries: Vec<_> = index.content().cloned().collect();
    assert_eq!(entries.len(), 4);
    assert!(matches!(&entries[0], IndexEntry::Divider(title) if title.ends_with("doc1")));
    assert_eq!(entries[1], IndexEntry::Document(dir.path().join("doc1.pdf")));
    assert!(matches!(&entries[2], IndexEntry::Divider(title) if title.ends_with("doc2")));
}

#[test]
fn test_generated_index_collates() {
    let dir = workspace();
    let index_path = dir.path().join("index.txt");
    write_index(&["doc1.pdf", "doc2.pdf"][..], &index_path).unwrap();

    let index = Index::load(&index_path).unwrap();
    let config = Config {
        root_dir: Some(dir.path().to_path_buf()),
        output_file: output_path(&dir),
        ..Config::default()
    };

    let (assembly, _) = Assembler::new(&config, &Font::default()).run(&index).unwrap();
    assert_eq!(
        assembly.toc,
        vec![
            "",
            "p. 2 — doc1",
            "p. 3 — doc1",
            "",
            "p. 5 — doc2",
            "p. 6 — doc2",
        ]
    );
    assert_eq!(assembly.total_pages, 6);
}
