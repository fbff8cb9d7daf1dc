//! # INI Rust Parser
//!
//! A parser and in-memory model for INI-style configuration text with
//! sections, comments, quoting, escapes and nested arrays.
//!
//! ## Overview
//!
//! Parsing produces a [`Document`]: one [`EntryContainer`] for the entries
//! that appear before any section header, plus one container per section.
//! Every entry holds a [`Value`], which is either a scalar (the raw text) or
//! a vector of further values. Typed accessors convert scalar text on demand.
//!
//! ## Format
//!
//! ```ini
//! ; comments run to the end of the line
//! name = demo
//! greeting = "hello; world"      ; quotes protect ; [ ] = and newlines
//! escaped = tab\there\nnewline
//!
//! [array]
//! nums = [1, 2, 3]
//! nested = [[1, 2], [a, b]]
//! ```
//!
//! A `[` that starts a line opens a section header; anywhere else it opens an
//! array literal. Values may contain `=`; keys may not.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ini_parser::from_str;
//!
//! let doc = from_str("port = 8080\n[array]\nnums = [1, 2, 3]\n")?;
//!
//! assert_eq!(doc.entries().get("port")?.as_int(0)?, 8080);
//!
//! let nums = doc.section("array")?.get("nums")?.as_vector()?;
//! assert_eq!(nums.len(), 3);
//! assert_eq!(nums[2].as_str()?, "3");
//! # Ok::<(), ini_parser::IniError>(())
//! ```
//!
//! ## Building and Writing
//!
//! ```rust
//! use ini_parser::{Document, Value, to_string};
//!
//! let mut doc = Document::new();
//! doc.entries_mut()["name"] = "demo".into();
//! doc.append_section("limits").insert("retries", 3);
//! doc.section_or_insert("limits").insert("ports", Value::vector([80, 443]));
//!
//! assert_eq!(
//!     to_string(&doc),
//!     "name = demo\n\n[limits]\nretries = 3\nports = [80, 443]\n"
//! );
//! ```
//!
//! Written values are not quoted or escaped, so text containing `=`, `;`,
//! quotes or newlines is not guaranteed to read back identically.
//!
//! ## Error Handling
//!
//! Parsing is lenient by default: unmatched brackets, unterminated quotes and
//! similar mistakes are recovered from and logged through `tracing`. Strict
//! mode reports them instead:
//!
//! ```rust
//! use ini_parser::{ParseError, ParserConfig, from_str_with_config, IniError};
//!
//! let config = ParserConfig::new().with_strict(true);
//! match from_str_with_config("key = value ]\n", config) {
//!     Err(IniError::Parse(ParseError::UnmatchedBracket { position })) => {
//!         assert_eq!(position.line, 1);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! Accessors report [`AccessError`] for non-numeric text, for the wrong
//! variant, and for missing keys or sections. An empty scalar always yields
//! the caller's default.

pub mod container;
pub mod error;
pub mod parser;
pub mod value;
pub mod writer;

use std::fs;
use std::io::Read;
use std::path::Path;

// Re-export main types and functions
pub use container::{Document, EntryContainer, Section};
pub use error::{AccessError, IniError, ParseError, Position, Status};
pub use parser::{Action, Cursor, Frame, IniParser, ParserConfig, State, transition};
pub use value::{IniArray, Value, ValueKind};
pub use writer::{to_string, to_writer, write_file};

/// Parses INI text with the default configuration
pub fn from_str(s: &str) -> Result<Document, IniError> {
    from_str_with_config(s, ParserConfig::default())
}

/// Parses INI text with a custom configuration
pub fn from_str_with_config(s: &str, config: ParserConfig) -> Result<Document, IniError> {
    Ok(IniParser::with_config(s, config).parse()?)
}

/// Parses byte-oriented input; invalid UTF-8 is replaced rather than rejected
pub fn from_slice(bytes: &[u8]) -> Result<Document, IniError> {
    from_str(&String::from_utf8_lossy(bytes))
}

/// Reads the whole stream into memory and parses it
pub fn from_reader<R: Read>(mut reader: R) -> Result<Document, IniError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(IniError::Read)?;
    from_slice(&bytes)
}

/// Reads and parses a file with the default configuration
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Document, IniError> {
    read_file_with_config(path, ParserConfig::default())
}

/// Reads and parses a file, reporting an unreadable source
pub fn read_file_with_config<P: AsRef<Path>>(
    path: P,
    config: ParserConfig,
) -> Result<Document, IniError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| IniError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    from_str_with_config(&String::from_utf8_lossy(&bytes), config)
}
