use super::*;
use proptest::prelude::*;
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

fn build_jar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

#[test]
fn test_scan_simple_manifest() {
    let manifest = b"Manifest-Version: 1.0\nMain-Class: some.App\nCreated-By: hand\n";
    assert_eq!(scan_main_class(manifest), Some("some.App".to_string()));
}

#[test]
fn test_scan_without_trailing_newline() {
    let manifest = b"Manifest-Version: 1.0\nMain-Class: some.App";
    assert_eq!(scan_main_class(manifest), Some("some.App".to_string()));
}

#[test]
fn test_scan_crlf_line_endings() {
    let manifest = b"Manifest-Version: 1.0\r\nMain-Class: some.App\r\n\r\n";
    assert_eq!(scan_main_class(manifest), Some("some.App".to_string()));
}

#[test]
fn test_scan_key_is_case_insensitive() {
    assert_eq!(
        scan_main_class(b"MAIN-CLASS: a.B\n"),
        Some("a.B".to_string())
    );
    assert_eq!(
        scan_main_class(b"main-class: a.B\n"),
        Some("a.B".to_string())
    );
}

#[test]
fn test_scan_value_case_is_preserved() {
    assert_eq!(
        scan_main_class(b"main-class: Com.Example.MAIN\n"),
        Some("Com.Example.MAIN".to_string())
    );
}

#[test]
fn test_scan_empty_manifest() {
    assert_eq!(scan_main_class(b""), None);
    assert_eq!(scan_main_class(b"\n\r\n\n"), None);
}

#[test]
fn test_scan_short_line_does_not_match() {
    // Shorter than the 12-byte prefix
    assert_eq!(scan_main_class(b"Main-Class:"), None);
    assert_eq!(scan_main_class(b"Main-Class:\nfoo"), None);
    assert_eq!(scan_main_class(b"Main"), None);
}

#[test]
fn test_scan_requires_space_after_colon() {
    assert_eq!(scan_main_class(b"Main-Class:some.App\n"), None);
}

#[test]
fn test_scan_prefix_only_gives_empty_value() {
    assert_eq!(scan_main_class(b"Main-Class: \n"), Some(String::new()));
}

#[test]
fn test_scan_first_match_wins() {
    let manifest = b"Main-Class: first.App\nMain-Class: second.App\n";
    assert_eq!(scan_main_class(manifest), Some("first.App".to_string()));
}

#[test]
fn test_scan_ignores_key_in_middle_of_line() {
    let manifest = b"X-Note: Main-Class: fake.App\n";
    assert_eq!(scan_main_class(manifest), None);
}

#[test]
fn test_scan_continuation_line_not_folded() {
    let manifest = b"Main-Class: com.example.very.long.package.na\n me.App\n";
    assert_eq!(
        scan_main_class(manifest),
        Some("com.example.very.long.package.na".to_string())
    );
}

#[test]
fn test_scan_invalid_utf8_is_lossy() {
    let manifest = b"Main-Class: caf\xff.App\n";
    assert_eq!(
        scan_main_class(manifest),
        Some("caf\u{fffd}.App".to_string())
    );
}

#[test]
fn test_archive_find_entry() {
    let bytes = build_jar(&[
        ("META-INF/MANIFEST.MF", b"Main-Class: a.B\n"),
        ("a/B.class", b"\xca\xfe\xba\xbe"),
    ]);
    let mut jar = JarArchive::from_reader(Cursor::new(bytes)).unwrap();

    assert_eq!(
        jar.find("a/B.class").unwrap(),
        Some(b"\xca\xfe\xba\xbe".to_vec())
    );
    assert_eq!(jar.main_class().unwrap(), Some("a.B".to_string()));
}

#[test]
fn test_archive_missing_entry_is_none() {
    let bytes = build_jar(&[("a/B.class", b"")]);
    let mut jar = JarArchive::from_reader(Cursor::new(bytes)).unwrap();

    assert_eq!(jar.find(MANIFEST_PATH).unwrap(), None);
    assert_eq!(jar.main_class().unwrap(), None);
}

#[test]
fn test_archive_rejects_garbage() {
    let result = JarArchive::from_reader(Cursor::new(b"not a zip file".to_vec()));
    assert!(result.is_err());
    assert!(result.err().unwrap().to_string().contains("jar archive"));
}

#[test]
fn test_detect_main_class_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.jar");
    std::fs::write(
        &path,
        build_jar(&[(
            "META-INF/MANIFEST.MF",
            b"Manifest-Version: 1.0\r\nMain-Class: com.example.Main\r\n",
        )]),
    )
    .unwrap();

    assert_eq!(
        detect_main_class(&path),
        Some("com.example.Main".to_string())
    );
}

#[test]
fn test_detect_main_class_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(detect_main_class(dir.path().join("absent.jar")), None);
}

#[test]
fn test_detect_main_class_not_a_jar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jar");
    std::fs::write(&path, b"garbage").unwrap();

    assert_eq!(detect_main_class(&path), None);
}

#[test]
fn test_detect_main_class_without_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.jar");
    std::fs::write(&path, build_jar(&[("a/B.class", b"")])).unwrap();

    assert_eq!(detect_main_class(&path), None);
}

fn other_line() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9-]{0,15}: [ -~]{0,24}"
        .prop_filter("must not declare Main-Class", |line| {
            !line.to_ascii_lowercase().starts_with("main-class: ")
        })
}

fn line_break() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\n"), Just("\r\n"), Just("\r")]
}

fn class_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}\\.[A-Z][A-Za-z0-9]{0,10}"
}

proptest! {
    #[test]
    fn prop_no_main_class_line_gives_none(
        lines in prop::collection::vec(other_line(), 0..12),
        eol in line_break(),
    ) {
        let manifest = lines.join(eol);
        prop_assert_eq!(scan_main_class(manifest.as_bytes()), None);
    }

    #[test]
    fn prop_single_main_class_is_found(
        before in prop::collection::vec(other_line(), 0..6),
        after in prop::collection::vec(other_line(), 0..6),
        class in class_name(),
        eol in line_break(),
        trailing in any::<bool>(),
    ) {
        let mut lines = before;
        lines.push(format!("Main-Class: {}", class));
        lines.extend(after);
        let mut manifest = lines.join(eol);
        if trailing {
            manifest.push_str(eol);
        }

        prop_assert_eq!(scan_main_class(manifest.as_bytes()), Some(class));
    }

    #[test]
    fn prop_first_main_class_wins(
        first in class_name(),
        rest in prop::collection::vec(class_name(), 1..4),
        filler in prop::collection::vec(other_line(), 0..4),
    ) {
        let mut lines = filler;
        lines.push(format!("Main-Class: {}", first));
        for class in &rest {
            lines.push(format!("main-class: {}", class));
        }

        prop_assert_eq!(scan_main_class(lines.join("\n").as_bytes()), Some(first));
    }
}
