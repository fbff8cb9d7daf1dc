//! Reads a configuration file and walks its entries
//!
//! Run with: cargo run --example basic_usage -- path/to/file.ini

use ini_parser::{IniError, read_file};

fn main() -> Result<(), IniError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/example.ini".to_string());
    let doc = read_file(&path)?;

    println!("Top-level entries:");
    for (key, value) in doc.entries().iter() {
        println!("  {key} = {value}");
    }

    for (name, entries) in doc.sections() {
        println!("[{name}]");
        for (key, value) in entries.iter() {
            match value.as_vector() {
                Ok(items) => println!("  {key}: {} element array", items.len()),
                Err(_) => println!("  {key} = {value}"),
            }
        }
    }

    if let Some(section) = doc.find_section("section") {
        let var = section.get("var")?.as_int(0)?;
        println!("section.var as integer: {var}");
    }

    if let Some(array) = doc.find_section("array") {
        let nested = array.get("nested")?.as_vector()?;
        for (i, inner) in nested.iter().enumerate() {
            println!("nested[{i}] = {inner}");
        }
    }

    Ok(())
}
