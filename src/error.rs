//! Error types and position tracking for INI parsing
//!
//! Parsing itself is lenient by default and only produces a [`ParseError`]
//! when the parser runs in strict mode. Accessor failures on the entry model
//! are reported through [`AccessError`], and everything surfaces to callers of
//! the file level helpers as an [`IniError`].

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::value::ValueKind;

/// Represents a position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Byte offset from start of input (0-based)
    pub offset: usize,
}

impl Position {
    /// Creates a new position at the start of input
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Advances the position past one character
    pub fn advance(&mut self, c: char) {
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                self.column = 1;
            }
            _ => {
                self.column += 1;
            }
        }
        self.offset += c.len_utf8();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Syntax errors reported by the parser in strict mode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `]` with no open section header or array
    #[error("Unmatched ']' at {position}")]
    UnmatchedBracket { position: Position },

    /// A quoted region still open at end of input
    #[error("Unterminated quote opened at {position}")]
    UnterminatedQuote { position: Position },

    /// An array literal still open at end of input
    #[error("Unterminated array opened at {position}")]
    UnterminatedArray { position: Position },

    /// A section header not closed before the end of its line
    #[error("Unterminated section header opened at {position}")]
    UnterminatedSection { position: Position },

    /// A value given without a `key =` prefix
    #[error("Value '{text}' has no key at {position}")]
    MissingKey { text: String, position: Position },

    /// A section header naming a section that already exists
    #[error("Duplicate section '{name}' at {position}")]
    DuplicateSection { name: String, position: Position },

    /// A backslash as the last character of the input
    #[error("Dangling escape at {position}")]
    DanglingEscape { position: Position },

    /// Text between `=` and the `[` opening an array literal
    #[error("Text '{text}' before array literal at {position}")]
    TextBeforeArray { text: String, position: Position },

    /// Array nesting deeper than the configured limit
    #[error("Maximum array nesting depth of {max_depth} exceeded at {position}")]
    MaxDepthExceeded { max_depth: usize, position: Position },
}

impl ParseError {
    /// Returns the position the error was reported at
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnmatchedBracket { position }
            | ParseError::UnterminatedQuote { position }
            | ParseError::UnterminatedArray { position }
            | ParseError::UnterminatedSection { position }
            | ParseError::MissingKey { position, .. }
            | ParseError::DuplicateSection { position, .. }
            | ParseError::DanglingEscape { position }
            | ParseError::TextBeforeArray { position, .. }
            | ParseError::MaxDepthExceeded { position, .. } => *position,
        }
    }
}

/// Contract violations at the entry model boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Non-empty scalar text that does not parse as the requested type
    #[error("Cannot convert '{text}' to {target}")]
    Conversion { text: String, target: &'static str },

    /// The value holds the other variant
    #[error("Expected a {expected} value, found a {found}")]
    VariantMismatch { expected: ValueKind, found: ValueKind },

    /// Strict lookup of a key that is not present
    #[error("Key '{key}' not found")]
    MissingKey { key: String },

    /// Strict lookup of a section that is not present
    #[error("Section '{name}' not found")]
    MissingSection { name: String },
}

/// Main error type for INI operations
#[derive(Debug, Error)]
pub enum IniError {
    /// The source file could not be opened or read
    #[error("Cannot read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination file could not be opened for writing
    #[error("Cannot write '{}': {source}", path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source stream failed while being read
    #[error("Read error: {0}")]
    Read(#[source] io::Error),

    /// A destination stream failed while being written
    #[error("Write error: {0}")]
    Write(#[source] io::Error),

    /// Syntax error (strict mode only)
    #[error("Syntax error: {0}")]
    Parse(#[from] ParseError),

    /// Entry model accessor failure
    #[error("Access error: {0}")]
    Access(#[from] AccessError),
}

/// Outcome of a parse or I/O operation, as a plain status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Unreadable,
    Unwritable,
    SyntaxError,
}

impl Status {
    /// Maps any result onto the status contract
    pub fn of<T>(result: &Result<T, IniError>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(error) => error.status(),
        }
    }
}

impl IniError {
    /// Returns the status code this error corresponds to
    ///
    /// Access errors never come out of parsing or I/O; they are folded into
    /// `SyntaxError` so the contract stays closed. Callers that need to tell
    /// them apart should match [`IniError::Access`] first.
    pub fn status(&self) -> Status {
        match self {
            IniError::Unreadable { .. } | IniError::Read(_) => Status::Unreadable,
            IniError::Unwritable { .. } | IniError::Write(_) => Status::Unwritable,
            IniError::Parse(_) | IniError::Access(_) => Status::SyntaxError,
        }
    }
}
