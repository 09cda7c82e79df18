use std::fs;
use std::io::Write;
use tempfile::TempDir;

use docqa_core::data_processor::{group_records, ChunkingConfig, DataProcessor};

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::new();
    let docs = processor.process_directory(dir).expect("process");

    assert_eq!(docs.len(), 1, "one small file becomes one document");
    assert_eq!(docs[0].name, "a.txt");
    assert_eq!(docs[0].chunks, vec!["Short text".to_string()]);
}

#[test]
fn process_directory_skips_non_txt_and_recurses() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("nested/b.txt"), "charlie delta").unwrap();
    fs::write(dir.join("c.md"), "echo foxtrot").unwrap();

    let docs = DataProcessor::new().process_directory(dir).expect("process");
    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    assert_ne!(docs[0].id, docs[1].id);
}

#[test]
fn invalid_utf8_is_read_lossily() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bin.txt"), [b'o', b'k', 0xff, b' ', b'x']).unwrap();
    let docs = DataProcessor::new().process_directory(tmp.path()).expect("process");
    assert_eq!(docs[0].chunks.len(), 1);
    assert!(docs[0].chunks[0].starts_with("ok"));
}

#[test]
fn records_round_trip_through_jsonl() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let text: Vec<String> = (0..25).map(|i| format!("word{i}")).collect();
    fs::write(dir.join("long.txt"), text.join(" ")).unwrap();

    let processor = DataProcessor::with_config(ChunkingConfig::new(10, 2).unwrap()).unwrap();
    let docs = processor.process_directory(dir).unwrap();
    assert_eq!(docs[0].chunks.len(), 4);

    let out = dir.join("chunks.jsonl");
    let written = processor.write_records(&docs, fs::File::create(&out).unwrap()).unwrap();
    assert_eq!(written, 4);

    let records = processor.read_records(&out).unwrap();
    assert_eq!(records[3].id, format!("{}:3", docs[0].id));
    assert_eq!(records[3].total_chunks, 4);
    assert_eq!(group_records(records), docs);
}

#[test]
fn malformed_record_line_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.jsonl");
    fs::write(&path, "{\"id\": 1}\n").unwrap();
    let err = DataProcessor::new().read_records(&path).unwrap_err();
    assert!(err.to_string().contains("bad.jsonl:1"));
}

#[test]
fn with_config_rejects_non_advancing_window() {
    let bad = ChunkingConfig { window_size: 10, overlap: 10 };
    assert!(DataProcessor::with_config(bad).is_err());
}

#[test]
fn unreadable_file_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    let files = vec![dir.join("a.txt"), dir.join("vanished.txt")];

    let docs = DataProcessor::new().process_files(&files, dir);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].name, "a.txt");
}
