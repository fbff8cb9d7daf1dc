//! Builds a document in code and writes it out
//!
//! Run with: cargo run --example build_and_write

use ini_parser::{Document, IniError, Value, from_str, to_string};

fn main() -> Result<(), IniError> {
    let mut doc = Document::new();
    doc.entries_mut()["name"] = "demo-service".into();
    doc.entries_mut()["debug"] = false.into();

    let server = doc.append_section("server");
    server["port"] = 8080.into();
    server["timeout"] = 2.5.into();
    server.insert("hosts", Value::vector(["alpha", "beta"]));
    server.insert(
        "matrix",
        Value::vector([Value::vector([1, 0]), Value::vector([0, 1])]),
    );

    let text = to_string(&doc);
    print!("{text}");

    // Clean values survive a round trip
    let back = from_str(&text)?;
    let server = back.section("server")?;
    assert_eq!(server.get("port")?.as_uint(0)?, 8080);
    assert_eq!(server.get("timeout")?.as_double(0.0)?, 2.5);
    assert!(!back.entries().get("debug")?.as_bool(true)?);
    assert_eq!(back, doc);

    Ok(())
}
