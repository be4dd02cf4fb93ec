use std::fs;
use std::path::Path;

use mdsplit::{BlockNode, Chunk, LeadingContent};
use pipeline::{
    DocumentOutcome, MAX_INDEX_WIDTH, SplitConfig, SplitError, Splitter, WriteOutcome, chunk_dirs,
    chunk_file_name, chunk_files, write_chunks,
};
use tempfile::TempDir;

const GUIDE: &str = "# A\n\nintro\n\n## B\n\nbody1\n\n# C\n\n## D\n\nbody2\n";

fn docs_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn splits_document_into_numbered_chunk_files() {
    let docs = docs_with(&[("guide.md", GUIDE)]);
    let splitter = Splitter::new(SplitConfig::default());

    let report = splitter.split_directory(docs.path()).unwrap();

    assert_eq!(report.written(), 1);
    let dir = docs.path().join("chunks").join("guide");
    let files = chunk_files(&dir).unwrap();
    assert_eq!(names(&files), ["000", "001", "002"]);
    assert_eq!(read(&files[0]), "# A\n\nintro\n");
    assert_eq!(read(&files[1]), "# A\n\n## B\n\nbody1\n");
    assert_eq!(read(&files[2]), "# C\n\n## D\n\nbody2\n");
}

#[test]
fn second_run_skips_and_leaves_files_untouched() {
    let docs = docs_with(&[("guide.md", GUIDE)]);
    let splitter = Splitter::new(SplitConfig::default());
    splitter.split_directory(docs.path()).unwrap();

    let dir = docs.path().join("chunks").join("guide");
    let before: Vec<String> = chunk_files(&dir).unwrap().iter().map(|p| read(p)).collect();

    // Changing the source must not leak into existing output.
    fs::write(docs.path().join("guide.md"), "# Other\n\ntext\n").unwrap();
    let report = splitter.split_directory(docs.path()).unwrap();

    assert_eq!(report.written(), 0);
    assert_eq!(report.skipped(), 1);
    assert!(report.documents[0].source.is_empty());
    let after: Vec<String> = chunk_files(&dir).unwrap().iter().map(|p| read(p)).collect();
    assert_eq!(before, after);
}

#[test]
fn skipped_document_does_not_block_others() {
    let docs = docs_with(&[("a.md", "# A\n\na\n"), ("b.md", "# B\n\nb\n")]);
    fs::create_dir_all(docs.path().join("chunks").join("a")).unwrap();

    let report = Splitter::new(SplitConfig::default())
        .split_directory(docs.path())
        .unwrap();

    assert_eq!(report.documents.len(), 2);
    assert!(report.documents[0].is_skipped());
    assert_eq!(
        report.documents[1].outcome,
        DocumentOutcome::Written {
            dir: docs.path().join("chunks").join("b"),
            chunks: 1
        }
    );
}

#[test]
fn only_markdown_files_are_discovered() {
    let docs = docs_with(&[
        ("b.md", "# B\n"),
        ("a.md", "# A\n"),
        ("notes.txt", "# not markdown\n"),
        ("readme.markdown", "# nope\n"),
    ]);
    fs::create_dir_all(docs.path().join("nested.md")).unwrap();

    let found = Splitter::new(SplitConfig::default())
        .discover(docs.path())
        .unwrap();

    assert_eq!(names(&found), ["a.md", "b.md"]);
}

#[test]
fn missing_docs_directory_is_fatal() {
    let docs = tempfile::tempdir().unwrap();
    let missing = docs.path().join("absent");

    let err = Splitter::new(SplitConfig::default())
        .split_directory(&missing)
        .unwrap_err();

    assert!(matches!(err, SplitError::Io { ref path, .. } if path == &missing));
}

#[test]
fn invalid_utf8_aborts_batch_by_default() {
    let docs = docs_with(&[("b.md", "# B\n")]);
    fs::write(docs.path().join("a.md"), [0xff, 0xfe, b'#']).unwrap();

    let err = Splitter::new(SplitConfig::default())
        .split_directory(docs.path())
        .unwrap_err();

    assert!(matches!(err, SplitError::InvalidUtf8 { .. }));
    assert!(!docs.path().join("chunks").join("a").exists());
    assert!(!docs.path().join("chunks").join("b").exists());
}

#[test]
fn keep_going_records_failures_and_continues() {
    let docs = docs_with(&[("b.md", "# B\n")]);
    fs::write(docs.path().join("a.md"), [0xff, 0xfe, b'#']).unwrap();
    let config = SplitConfig {
        keep_going: true,
        ..SplitConfig::default()
    };

    let report = Splitter::new(config).split_directory(docs.path()).unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].0.ends_with("a.md"));
    assert_eq!(report.written(), 1);
}

#[test]
fn leading_content_policy_applies_to_files() {
    let source = "Preamble.\n\n# A\n\nbody\n";
    let docs = docs_with(&[("drop.md", source)]);

    let report = Splitter::new(SplitConfig::default())
        .split_directory(docs.path())
        .unwrap();
    let doc = &report.documents[0];
    assert_eq!(doc.warnings.len(), 1);
    assert_eq!(doc.source[doc.warnings[0].span.clone()].trim(), "Preamble.");

    let out = tempfile::tempdir().unwrap();
    let config = SplitConfig {
        output_dir: Some(out.path().to_path_buf()),
        leading_content: LeadingContent::Keep,
        ..SplitConfig::default()
    };
    let report = Splitter::new(config).split_directory(docs.path()).unwrap();
    assert!(report.documents[0].warnings.is_empty());

    let files = chunk_files(&out.path().join("drop")).unwrap();
    assert_eq!(names(&files), ["000", "001"]);
    assert_eq!(read(&files[0]), "Preamble.\n");
}

#[test]
fn headingless_document_gets_empty_chunk_directory() {
    let docs = docs_with(&[("plain.md", "just text\n")]);

    let report = Splitter::new(SplitConfig::default())
        .split_directory(docs.path())
        .unwrap();

    let dir = docs.path().join("chunks").join("plain");
    assert!(dir.is_dir());
    assert!(chunk_files(&dir).unwrap().is_empty());
    assert_eq!(report.documents[0].warnings.len(), 1);
}

#[test]
fn writer_names_are_gap_free() {
    let out = tempfile::tempdir().unwrap();
    let dir = out.path().join("many");
    let chunks: Vec<Chunk> = (0..12)
        .map(|i| Chunk::new(vec![BlockNode::heading(1, format!("S{}", i))]))
        .collect();

    let outcome = write_chunks(&chunks, &dir, 3).unwrap();

    let WriteOutcome::Written(files) = outcome else {
        panic!("expected chunks to be written");
    };
    let expected: Vec<String> = (0..12).map(|i| format!("{:03}", i)).collect();
    assert_eq!(names(&files), expected);
    assert_eq!(names(&chunk_files(&dir).unwrap()), expected);
}

#[test]
fn writer_skips_existing_directory() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("000"), "keep me").unwrap();
    let chunks = vec![Chunk::new(vec![BlockNode::heading(1, "New")])];

    let outcome = write_chunks(&chunks, out.path(), 3).unwrap();

    assert_eq!(outcome, WriteOutcome::Skipped);
    assert_eq!(read(&out.path().join("000")), "keep me");
}

#[test]
fn narrow_index_width_overflows_without_collisions() {
    let out = tempfile::tempdir().unwrap();
    let dir = out.path().join("wide");
    let chunks: Vec<Chunk> = (0..11)
        .map(|i| Chunk::new(vec![BlockNode::heading(2, format!("S{}", i))]))
        .collect();

    write_chunks(&chunks, &dir, 1).unwrap();

    let files = chunk_files(&dir).unwrap();
    assert_eq!(files.len(), 11);
    let listed = names(&files);
    assert_eq!(&listed[9..], ["9", "10"]);
}

#[test]
fn chunk_file_names_are_zero_padded() {
    assert_eq!(chunk_file_name(0, 3), "000");
    assert_eq!(chunk_file_name(42, 3), "042");
    assert_eq!(chunk_file_name(999, 3), "999");
    assert_eq!(chunk_file_name(1000, 3), "1000");
    assert_eq!(chunk_file_name(7, 5), "00007");
}

#[test]
fn chunk_listing_ignores_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("001"), "b").unwrap();
    fs::write(dir.path().join("000"), "a").unwrap();
    fs::create_dir(dir.path().join("002")).unwrap();

    assert_eq!(names(&chunk_files(dir.path()).unwrap()), ["000", "001"]);
}

#[test]
fn chunk_dirs_lists_documents() {
    let docs = docs_with(&[("b.md", "# B\n"), ("a.md", "# A\n")]);
    let splitter = Splitter::new(SplitConfig::default());
    splitter.split_directory(docs.path()).unwrap();

    let dirs = chunk_dirs(&splitter.output_root(docs.path())).unwrap();
    assert_eq!(names(&dirs), ["a", "b"]);

    assert!(chunk_dirs(&docs.path().join("absent")).unwrap().is_empty());
}

#[test]
fn config_file_is_discovered_and_parsed() {
    let docs = docs_with(&[(
        "mdsplit.toml",
        "output_dir = \"out\"\nleading_content = \"keep\"\nindex_width = 4\nkeep_going = true\n",
    )]);

    let config = SplitConfig::discover(docs.path()).unwrap();

    assert_eq!(config.output_dir, Some(docs.path().join("out")));
    assert_eq!(config.leading_content, LeadingContent::Keep);
    assert_eq!(config.index_width, 4);
    assert!(config.keep_going);
}

#[test]
fn config_defaults_without_file() {
    let docs = tempfile::tempdir().unwrap();
    assert_eq!(
        SplitConfig::discover(docs.path()).unwrap(),
        SplitConfig::default()
    );
}

#[test]
fn config_rejects_unknown_keys_and_zero_width() {
    let path = Path::new("mdsplit.toml");

    let err = SplitConfig::from_toml("chunk_size = 10\n", path).unwrap_err();
    assert!(matches!(err, SplitError::Config { .. }));

    let err = SplitConfig::from_toml("index_width = 0\n", path).unwrap_err();
    assert!(matches!(err, SplitError::InvalidConfig(_)));

    let err = SplitConfig::from_toml("leading_content = \"sometimes\"\n", path).unwrap_err();
    assert!(matches!(err, SplitError::Config { .. }));
}

#[test]
fn config_caps_index_width() {
    let path = Path::new("mdsplit.toml");

    let config = SplitConfig::from_toml("index_width = 20\n", path).unwrap();
    assert_eq!(config.index_width, MAX_INDEX_WIDTH);

    let err = SplitConfig::from_toml("index_width = 1000000000\n", path).unwrap_err();
    assert!(matches!(err, SplitError::InvalidConfig(_)));

    let config = SplitConfig {
        index_width: MAX_INDEX_WIDTH + 1,
        ..SplitConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn writer_rejects_oversized_index_width() {
    let out = tempfile::tempdir().unwrap();
    let dir = out.path().join("huge");
    let chunks = vec![Chunk::new(vec![BlockNode::heading(1, "A")])];

    let err = write_chunks(&chunks, &dir, 1_000_000_000).unwrap_err();

    assert!(matches!(err, SplitError::InvalidConfig(_)));
    assert!(!dir.exists());
}
