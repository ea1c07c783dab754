use std::fs::File;
use std::io::Write;
use std::path::Path;

use levelsync_archive::{ArchiveInspector, ZipInspector, level_digest};
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
        } else {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
    }
    zip.finish().unwrap();
}

fn digest(data: &[u8]) -> String { level_digest(&mut &data[..]).unwrap() }

#[test]
fn test_contains_level_by_version_prefix() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("arena1.zip");
    write_zip(&archive, &[("arena1.mp", b"version two"), ("readme.txt", b"hi")]);

    let full = digest(b"version two");
    let inspector = ZipInspector::new();
    assert!(inspector.contains_level(&archive, "arena1.mp", Some(&full)));
    assert!(inspector.contains_level(&archive, "ARENA1.MP", Some(&full[..8].to_uppercase())));
    assert!(inspector.contains_level(&archive, "arena1.mp", None));
    assert!(!inspector.contains_level(&archive, "arena1.mp", Some(&digest(b"version one"))));
    assert!(!inspector.contains_level(&archive, "arena2.mp", None));
}

#[test]
fn test_contains_level_in_subdirectory() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("pack.zip");
    write_zip(&archive, &[("maps/", b""), ("maps/arena1.mp", b"nested")]);

    assert!(ZipInspector.contains_level(&archive, "arena1.mp", Some(&digest(b"nested")[..12])));
}

#[test]
fn test_corrupt_archive_is_not_a_match() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("broken.zip");
    std::fs::write(&archive, b"definitely not a zip").unwrap();

    assert!(!ZipInspector.contains_level(&archive, "arena1.mp", None));
    assert!(ZipInspector.level_files(&archive).is_err());
}

#[test]
fn test_missing_archive_is_not_a_match() {
    let dir = tempdir().unwrap();
    assert!(!ZipInspector.contains_level(&dir.path().join("gone.zip"), "arena1.mp", None));
}

#[test]
fn test_level_files_lists_only_levels() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("pack.zip");
    write_zip(
        &archive,
        &[
            ("arena1.mp", b"a"),
            ("art/", b""),
            ("art/arena1.png", b"png"),
            ("extra/Arena_Two.MP", b"b"),
        ],
    );

    let levels = ZipInspector.level_files(&archive).unwrap();
    assert_eq!(levels, vec!["arena1.mp".to_string(), "Arena_Two.MP".to_string()]);
}
