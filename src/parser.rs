//! INI parser
//!
//! The parser is a single pass over the input, one character at a time. Its
//! lexical state is an explicit [`State`] value and every character goes
//! through the pure [`transition`] function, which returns the next state and
//! an [`Action`] for the parser to apply to its token buffer and document.
//!
//! Array literals are collected verbatim between their outer brackets and
//! handed to a small recursive sub-parser that splits on top-level commas.

use crate::container::{Document, EntryContainer};
use crate::error::{ParseError, Position};
use crate::value::{IniArray, Value};
use tracing::{debug, warn};

/// Configuration options for the parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Report malformed input as an error instead of recovering
    pub strict: bool,
    /// Maximum array nesting depth to prevent stack overflow
    pub max_depth: usize,
    /// Keep whitespace that came from a quoted region or an escape sequence
    /// when trimming keys, values and section names
    pub preserve_quoted: bool,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the maximum array nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether quoted whitespace survives trimming
    pub fn with_preserve_quoted(mut self, preserve: bool) -> Self {
        self.preserve_quoted = preserve;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: 128,
            preserve_quoted: true,
        }
    }
}

/// Structural context of the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Key or scalar value on an ordinary line
    Entry,
    /// Between a line-leading `[` and its `]`
    SectionHeader,
    /// Inside an array literal; the depth is always at least 1
    Array(usize),
}

/// Lexical state of the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Normal(Frame),
    InComment(Frame),
    InQuote(Frame),
    InEscape { frame: Frame, quoted: bool },
}

impl State {
    /// Returns the structural frame underneath the lexical state
    pub fn frame(self) -> Frame {
        match self {
            State::Normal(frame)
            | State::InComment(frame)
            | State::InQuote(frame)
            | State::InEscape { frame, .. } => frame,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        State::Normal(Frame::Entry)
    }
}

/// Facts about the parser's buffer that some transitions depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Only spaces or tabs have been seen since the last newline
    pub at_line_start: bool,
    /// A key has been closed by `=` and awaits its value
    pub has_key: bool,
    /// The current token is empty or all whitespace
    pub token_blank: bool,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Character consumed without effect
    Skip,
    /// Append a literal character to the token buffer
    Append(char),
    /// Append the decoded character of an escape sequence
    AppendEscaped(char),
    OpenQuote,
    CloseQuote,
    BeginSection,
    EndSection,
    /// A newline inside a section header
    AbandonSection,
    /// `=` closing a key name
    EndKey,
    /// Outermost `[` of an array literal
    BeginArray,
    /// Append an array delimiter (`,` or a nested `[`), starting a new token
    Delimit(char),
    /// Outermost `]` of an array literal
    EndArray,
    /// Newline ending an entry line
    CommitLine,
    /// `]` with nothing open
    StrayBracket,
}

/// Decodes the character following a backslash
pub fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        other => other,
    }
}

/// Computes the next state and side effect for one input character
pub fn transition(state: State, c: char, cursor: Cursor) -> (State, Action) {
    match state {
        // the newline ending a comment is still a line break
        State::InComment(frame) if c == '\n' => transition(State::Normal(frame), c, cursor),
        State::InComment(_) => (state, Action::Skip),
        State::InEscape { frame, quoted } => {
            let next = if quoted {
                State::InQuote(frame)
            } else {
                State::Normal(frame)
            };
            (next, Action::AppendEscaped(unescape(c)))
        }
        State::InQuote(frame) => match c {
            '"' => (State::Normal(frame), Action::CloseQuote),
            '\\' => (
                State::InEscape {
                    frame,
                    quoted: true,
                },
                Action::Skip,
            ),
            _ => (state, Action::Append(c)),
        },
        State::Normal(frame) => normal_transition(frame, c, cursor),
    }
}

fn normal_transition(frame: Frame, c: char, cursor: Cursor) -> (State, Action) {
    let stay = State::Normal(frame);
    match c {
        '\\' => (
            State::InEscape {
                frame,
                quoted: false,
            },
            Action::Skip,
        ),
        ';' => (State::InComment(frame), Action::Skip),
        '"' if cursor.token_blank => (State::InQuote(frame), Action::OpenQuote),
        '[' => match frame {
            Frame::Entry if cursor.at_line_start && !cursor.has_key => {
                (State::Normal(Frame::SectionHeader), Action::BeginSection)
            }
            Frame::Entry => (State::Normal(Frame::Array(1)), Action::BeginArray),
            Frame::SectionHeader => (stay, Action::Append(c)),
            Frame::Array(depth) => (State::Normal(Frame::Array(depth + 1)), Action::Delimit(c)),
        },
        ']' => match frame {
            Frame::Entry => (stay, Action::StrayBracket),
            Frame::SectionHeader => (State::Normal(Frame::Entry), Action::EndSection),
            Frame::Array(1) => (State::Normal(Frame::Entry), Action::EndArray),
            Frame::Array(depth) => (State::Normal(Frame::Array(depth - 1)), Action::Append(c)),
        },
        '=' if frame == Frame::Entry && !cursor.has_key => (stay, Action::EndKey),
        ',' if matches!(frame, Frame::Array(_)) => (stay, Action::Delimit(c)),
        '\n' => match frame {
            Frame::Entry => (stay, Action::CommitLine),
            Frame::SectionHeader => (State::Normal(Frame::Entry), Action::AbandonSection),
            Frame::Array(_) => (stay, Action::Append(c)),
        },
        _ => (stay, Action::Append(c)),
    }
}

/// Reports a malformation in strict mode, otherwise logs it and carries on
fn recover(config: &ParserConfig, error: ParseError) -> Result<(), ParseError> {
    if config.strict {
        Err(error)
    } else {
        warn!(%error, "recovered from malformed input");
        Ok(())
    }
}

/// INI parser over an in-memory source text
pub struct IniParser<'a> {
    input: &'a str,
    config: ParserConfig,
    state: State,
    position: Position,
    at_line_start: bool,
    pending_key: Option<String>,
    buffer: String,
    /// Byte offset in `buffer` where the current token starts
    token_start: usize,
    /// Byte range of `buffer` produced by quotes or escapes
    protected: Option<(usize, usize)>,
    /// Section currently receiving entries; `None` is the document root
    active_section: Option<String>,
    /// Where the open section header or array started
    frame_start: Position,
    quote_start: Position,
    document: Document,
}

impl<'a> IniParser<'a> {
    /// Creates a new parser with default configuration
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    /// Creates a new parser with custom configuration
    pub fn with_config(input: &'a str, config: ParserConfig) -> Self {
        Self {
            input: input.strip_prefix('\u{FEFF}').unwrap_or(input),
            config,
            state: State::default(),
            position: Position::new(),
            at_line_start: true,
            pending_key: None,
            buffer: String::new(),
            token_start: 0,
            protected: None,
            active_section: None,
            frame_start: Position::new(),
            quote_start: Position::new(),
            document: Document::new(),
        }
    }

    /// Returns the current position in the input
    pub fn current_position(&self) -> Position {
        self.position
    }

    /// Parses the whole input into a new document
    pub fn parse(mut self) -> Result<Document, ParseError> {
        self.run()?;
        Ok(self.document)
    }

    /// Parses the whole input on top of an existing document
    ///
    /// Entries overwrite existing keys and section headers replace existing
    /// sections. On error the document keeps whatever was parsed before the
    /// failure.
    pub fn parse_into(mut self, document: &mut Document) -> Result<(), ParseError> {
        self.document = std::mem::take(document);
        let result = self.run();
        *document = self.document;
        result
    }

    fn run(&mut self) -> Result<(), ParseError> {
        let input = self.input;
        for c in input.chars() {
            self.step(c)?;
            self.position.advance(c);
        }
        self.finish()
    }

    fn step(&mut self, c: char) -> Result<(), ParseError> {
        let cursor = Cursor {
            at_line_start: self.at_line_start,
            has_key: self.pending_key.is_some(),
            token_blank: self.buffer[self.token_start..]
                .chars()
                .all(char::is_whitespace),
        };
        let (next, action) = transition(self.state, c, cursor);
        self.state = next;

        self.at_line_start = match action {
            Action::CommitLine | Action::AbandonSection => true,
            Action::Append(' ' | '\t' | '\r') => {
                self.at_line_start && next == State::Normal(Frame::Entry)
            }
            _ => false,
        };

        self.apply(action)
    }

    fn apply(&mut self, action: Action) -> Result<(), ParseError> {
        match action {
            Action::Skip => {}
            Action::Append(c) => self.buffer.push(c),
            Action::AppendEscaped(c) => {
                let start = self.buffer.len();
                self.buffer.push(c);
                self.protect(start);
            }
            Action::OpenQuote => {
                self.quote_start = self.position;
                self.protect(self.buffer.len());
            }
            Action::CloseQuote => self.protect(self.buffer.len()),
            Action::BeginSection => {
                self.frame_start = self.position;
                self.reset_token();
            }
            Action::EndSection => self.end_section()?,
            Action::AbandonSection => {
                self.reset_token();
                recover(
                    &self.config,
                    ParseError::UnterminatedSection {
                        position: self.frame_start,
                    },
                )?;
            }
            Action::EndKey => {
                let key = self.take_token();
                self.pending_key = Some(key);
            }
            Action::BeginArray => {
                self.frame_start = self.position;
                let prefix = self.take_token();
                if !prefix.is_empty() {
                    recover(
                        &self.config,
                        ParseError::TextBeforeArray {
                            text: prefix,
                            position: self.position,
                        },
                    )?;
                }
            }
            Action::Delimit(c) => {
                self.buffer.push(c);
                self.token_start = self.buffer.len();
            }
            Action::EndArray => self.end_array()?,
            Action::CommitLine => self.commit_line()?,
            Action::StrayBracket => recover(
                &self.config,
                ParseError::UnmatchedBracket {
                    position: self.position,
                },
            )?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        let frame = match self.state {
            State::InEscape { frame, .. } => {
                recover(
                    &self.config,
                    ParseError::DanglingEscape {
                        position: self.position,
                    },
                )?;
                frame
            }
            State::InQuote(frame) => {
                recover(
                    &self.config,
                    ParseError::UnterminatedQuote {
                        position: self.quote_start,
                    },
                )?;
                self.protect(self.buffer.len());
                frame
            }
            State::Normal(frame) | State::InComment(frame) => frame,
        };
        self.state = State::default();

        match frame {
            Frame::Entry => self.commit_line(),
            Frame::SectionHeader => {
                self.reset_token();
                recover(
                    &self.config,
                    ParseError::UnterminatedSection {
                        position: self.frame_start,
                    },
                )
            }
            Frame::Array(_) => {
                recover(
                    &self.config,
                    ParseError::UnterminatedArray {
                        position: self.frame_start,
                    },
                )?;
                self.end_array()
            }
        }
    }

    fn end_section(&mut self) -> Result<(), ParseError> {
        let name = self.take_token();
        if self.document.has_section(&name) {
            recover(
                &self.config,
                ParseError::DuplicateSection {
                    name: name.clone(),
                    position: self.frame_start,
                },
            )?;
        }
        debug!(section = %name, "opened section");
        self.document.append_section(name.clone());
        self.active_section = Some(name);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), ParseError> {
        let text = std::mem::take(&mut self.buffer);
        self.reset_token();
        let items = ArrayParser::new(&self.config, self.frame_start).parse(&text)?;
        match self.pending_key.take() {
            Some(key) => self.commit(key, Value::from(items)),
            None => recover(
                &self.config,
                ParseError::MissingKey {
                    text: format!("[{text}]"),
                    position: self.frame_start,
                },
            )?,
        }
        Ok(())
    }

    fn commit_line(&mut self) -> Result<(), ParseError> {
        let text = self.take_token();
        match self.pending_key.take() {
            Some(key) => self.commit(key, Value::Scalar(text)),
            None if !text.is_empty() => recover(
                &self.config,
                ParseError::MissingKey {
                    text,
                    position: self.position,
                },
            )?,
            None => {}
        }
        Ok(())
    }

    fn commit(&mut self, key: String, value: Value) {
        debug!(key = %key, section = ?self.active_section, "committed entry");
        self.active_container().insert(key, value);
    }

    fn active_container(&mut self) -> &mut EntryContainer {
        match &self.active_section {
            Some(name) => self.document.section_or_insert(name),
            None => self.document.entries_mut(),
        }
    }

    /// Extends the protected range of the buffer to cover `start..len`
    fn protect(&mut self, start: usize) {
        let end = self.buffer.len();
        self.protected = Some(match self.protected {
            Some((from, _)) => (from.min(start), end),
            None => (start, end),
        });
    }

    fn reset_token(&mut self) {
        self.buffer.clear();
        self.token_start = 0;
        self.protected = None;
    }

    /// Takes the buffered token, trimmed of surrounding whitespace that was
    /// not protected by quotes or escapes
    fn take_token(&mut self) -> String {
        let text = std::mem::take(&mut self.buffer);
        let protected = self.protected.take();
        self.token_start = 0;
        match protected {
            Some((start, end)) if self.config.preserve_quoted => {
                let head = text[..start].trim_start();
                let tail = text[end..].trim_end();
                format!("{head}{}{tail}", &text[start..end])
            }
            _ => text.trim().to_string(),
        }
    }
}

/// Recursive parser for the body of an array literal
///
/// Quotes and escapes were already resolved by the scanner, so a comma or
/// bracket that came from one is indistinguishable from a structural one here.
struct ArrayParser<'c> {
    config: &'c ParserConfig,
    position: Position,
}

impl<'c> ArrayParser<'c> {
    fn new(config: &'c ParserConfig, position: Position) -> Self {
        Self { config, position }
    }

    fn parse(&self, text: &str) -> Result<IniArray, ParseError> {
        self.parse_body(text, 1)
    }

    fn parse_body(&self, text: &str, depth: usize) -> Result<IniArray, ParseError> {
        let mut items = IniArray::new();
        for element in split_elements(text) {
            let element = element.trim();
            if element.is_empty() {
                continue;
            }
            items.push(self.parse_element(element, depth)?);
        }
        Ok(items)
    }

    fn parse_element(&self, element: &str, depth: usize) -> Result<Value, ParseError> {
        let nested = element
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'));
        match nested {
            Some(inner) if depth < self.config.max_depth => {
                Ok(Value::from(self.parse_body(inner, depth + 1)?))
            }
            Some(_) => {
                recover(
                    self.config,
                    ParseError::MaxDepthExceeded {
                        max_depth: self.config.max_depth,
                        position: self.position,
                    },
                )?;
                Ok(Value::scalar(element))
            }
            None => Ok(Value::scalar(element)),
        }
    }
}

/// Splits on commas outside any nested brackets
fn split_elements(text: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                elements.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    elements.push(&text[start..]);
    elements
}
