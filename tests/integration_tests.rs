//! Integration tests against the public API
//!
//! These tests read the bundled example file and exercise parsing, access,
//! writing and the file level error reporting.

use ini_parser::{
    AccessError, Document, IniError, ParseError, ParserConfig, Status, Value, from_reader,
    from_slice, from_str, from_str_with_config, read_file, to_string, write_file,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ini-rust-parser-{}-{}", std::process::id(), name))
}

#[test]
fn test_example_file_top_level_entries() {
    let doc = read_file(fixture("example.ini")).expect("Failed to read example file");

    let entries = doc.entries();
    assert_eq!(entries["int_variable"].as_str().unwrap(), "42");
    assert_eq!(entries["int_variable"].as_int(0).unwrap(), 42);
    assert_eq!(entries["string_variable"].as_str().unwrap(), "hello");
    assert_eq!(entries["string_variable2"].as_str().unwrap(), "h3ll0");
    assert_eq!(
        entries["in_quoration"].as_str().unwrap(),
        "qwerty;uiop=1=2=3"
    );
    assert_eq!(entries["escaped"].as_str().unwrap(), "tab\there\nnext");
    assert!(!entries.contains("var"));
}

#[test]
fn test_example_file_sections() {
    let doc = read_file(fixture("example.ini")).unwrap();

    let section = doc.section("section").unwrap();
    assert_eq!(section["var"].as_str().unwrap(), "1337");
    assert_eq!(section["var"].as_long(0).unwrap(), 1337);
    assert!(section["enabled"].as_bool(false).unwrap());

    let another = doc.section("another").unwrap();
    assert_eq!(
        another["@using-odd_characters"].as_str().unwrap(),
        "Hello world!"
    );
    assert_eq!(another["ratio"].as_double(0.0).unwrap(), 0.75);

    assert_eq!(
        doc.section_names().collect::<Vec<_>>(),
        vec!["section", "another", "array"]
    );
}

#[test]
fn test_example_file_arrays() {
    let doc = read_file(fixture("example.ini")).unwrap();
    let array = doc.section("array").unwrap();

    let nums = array["nums"].as_vector().unwrap();
    let nums: Vec<&str> = nums.iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(nums, vec!["1", "2", "3"]);

    let nested = array["nested"].as_vector().unwrap();
    assert_eq!(nested.len(), 2);
    let first = nested[0].as_vector().unwrap();
    assert_eq!(first[0].as_str().unwrap(), "1");
    assert_eq!(first[1].as_str().unwrap(), "2");
    let second = nested[1].as_vector().unwrap();
    assert_eq!(second[0].as_str().unwrap(), "a");
    assert_eq!(second[1].as_str().unwrap(), "b");

    let multi = array["multi"].as_vector().unwrap();
    assert_eq!(multi.len(), 2);
    assert_eq!(multi[1].as_str().unwrap(), "second");
}

#[test]
fn test_example_file_json_shape() {
    let doc = read_file(fixture("example.ini")).unwrap();
    let json = serde_json::to_value(&doc).unwrap();

    assert_eq!(json["sections"]["array"]["nums"], serde_json::json!(["1", "2", "3"]));
    assert_eq!(
        json["sections"]["array"]["nested"],
        serde_json::json!([["1", "2"], ["a", "b"]])
    );
    assert_eq!(json["entries"]["int_variable"], "42");
}

#[test]
fn test_unreadable_source() {
    let result = read_file(fixture("does-not-exist.ini"));
    assert_eq!(Status::of(&result), Status::Unreadable);
    match result {
        Err(IniError::Unreadable { path, .. }) => {
            assert!(path.ends_with("does-not-exist.ini"));
        }
        other => panic!("Expected unreadable error, got {:?}", other),
    }
}

struct FailingReader;

impl std::io::Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "stream dropped",
        ))
    }
}

#[test]
fn test_failing_reader_is_unreadable() {
    let result = from_reader(FailingReader);
    assert_eq!(Status::of(&result), Status::Unreadable);
    assert!(matches!(result, Err(IniError::Read(_))));
}

#[test]
fn test_unwritable_destination() {
    let doc = from_str("a = 1\n").unwrap();
    let result = write_file(fixture("no-such-dir").join("out.ini"), &doc);
    assert_eq!(Status::of(&result), Status::Unwritable);
}

#[test]
fn test_syntax_error_status() {
    let config = ParserConfig::new().with_strict(true);
    let result = from_str_with_config("[unterminated\n", config);
    assert_eq!(Status::of(&result), Status::SyntaxError);
    assert!(matches!(
        result,
        Err(IniError::Parse(ParseError::UnterminatedSection { .. }))
    ));
}

#[test]
fn test_lenient_parse_always_succeeds() {
    let inputs = [
        "]]]\n",
        "key = \"never closed",
        "key = [[[\n",
        "[\n",
        "\\",
        "= orphan value\n",
        ";;;;\n[]\n",
    ];
    for input in inputs {
        assert!(from_str(input).is_ok(), "lenient parse failed for {:?}", input);
    }
}

#[test]
fn test_write_then_read_file() {
    let mut doc = Document::new();
    doc.entries_mut().insert("name", "demo");
    doc.entries_mut().insert("count", 3);
    let limits = doc.append_section("limits");
    limits.insert("ports", Value::vector([80, 443]));
    limits.insert("grid", Value::vector([Value::vector([1, 2]), Value::vector([3, 4])]));

    let path = scratch_file("roundtrip.ini");
    write_file(&path, &doc).unwrap();
    let back = read_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(back, doc);
}

#[test]
fn test_serialization_does_not_escape() {
    let mut doc = Document::new();
    doc.entries_mut().insert("tricky", "a;b");
    let text = to_string(&doc);
    assert_eq!(text, "tricky = a;b\n");

    // the comment marker is not protected on the way out
    let back = from_str(&text).unwrap();
    assert_eq!(back.entries()["tricky"].as_str().unwrap(), "a");
}

#[test]
fn test_byte_and_reader_input() {
    let doc = from_slice(b"[s]\nk = v\xff\n").unwrap();
    assert_eq!(
        doc.section("s").unwrap()["k"].as_str().unwrap(),
        "v\u{FFFD}"
    );

    let doc = from_reader("x = 1\n".as_bytes()).unwrap();
    assert_eq!(doc.entries()["x"].as_int(0).unwrap(), 1);
}

#[test]
fn test_access_errors_convert_into_ini_error() {
    fn lookup(doc: &Document) -> Result<i32, IniError> {
        Ok(doc.section("missing")?.get("key")?.as_int(0)?)
    }

    let doc = from_str("key = 1\n").unwrap();
    match lookup(&doc) {
        Err(IniError::Access(AccessError::MissingSection { name })) => {
            assert_eq!(name, "missing");
        }
        other => panic!("Expected missing section, got {:?}", other),
    }
}

#[test]
fn test_caller_mutation_after_parse() {
    let mut doc = from_str("[server]\nport = 80\n").unwrap();
    doc.section_mut("server").unwrap()["port"] = 8080.into();
    doc.section_mut("server").unwrap()["host"] = "localhost".into();
    doc.section_or_insert("client")["retries"] = 3.into();

    let server = doc.section("server").unwrap();
    assert_eq!(server["port"].as_int(0).unwrap(), 8080);
    assert_eq!(server["host"].as_str().unwrap(), "localhost");
    assert_eq!(doc.section("client").unwrap()["retries"].as_int(0).unwrap(), 3);
}
