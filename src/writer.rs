//! Writing documents back to INI text
//!
//! Values are written using their plain string rendering. No quoting or
//! escaping is applied, so a value containing `=`, `;`, quotes or newlines
//! will not necessarily parse back to the same text.

use crate::container::{Document, EntryContainer};
use crate::error::IniError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Renders a document to a string
pub fn to_string(document: &Document) -> String {
    let mut out = Vec::new();
    to_writer(&mut out, document).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&out).into_owned()
}

/// Writes a document to any byte sink
///
/// Top-level entries come first, then each section as a `[name]` header
/// followed by its entries, separated from what precedes it by a blank line.
pub fn to_writer<W: Write>(mut writer: W, document: &Document) -> io::Result<()> {
    write_entries(&mut writer, document.entries())?;
    let mut first = document.entries().is_empty();

    for (name, entries) in document.sections() {
        if !first {
            writeln!(writer)?;
        }
        writeln!(writer, "[{name}]")?;
        write_entries(&mut writer, entries)?;
        first = false;
    }

    writer.flush()
}

/// Writes a document to a file, reporting an unwritable destination
pub fn write_file<P: AsRef<Path>>(path: P, document: &Document) -> Result<(), IniError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| IniError::Unwritable {
        path: path.to_path_buf(),
        source,
    })?;
    to_writer(BufWriter::new(file), document).map_err(|source| IniError::Unwritable {
        path: path.to_path_buf(),
        source,
    })
}

fn write_entries<W: Write>(writer: &mut W, entries: &EntryContainer) -> io::Result<()> {
    for (key, value) in entries.iter() {
        writeln!(writer, "{key} = {value}")?;
    }
    Ok(())
}
