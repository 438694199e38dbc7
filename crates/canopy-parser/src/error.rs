use std::fmt;

use crate::text::LineIndex;

/// Broad category of a parse failure.
///
/// The kind is stable API; the message wording is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Reading the input failed.
    #[error("i/o error")]
    Io,
    /// The input was empty (possibly after stripping a byte-order mark).
    #[error("empty input")]
    EmptyInput,
    /// The input does not match the JSON grammar.
    #[error("grammar error")]
    Grammar,
    /// The input is not valid UTF-8 where the grammar requires a character.
    #[error("invalid UTF-8")]
    InvalidUtf8,
    /// A malformed escape sequence inside a string.
    #[error("invalid escape")]
    InvalidEscape,
    /// A `\u` escape with invalid surrogate pairing.
    #[error("invalid surrogate")]
    Surrogate,
    /// A number literal that does not fit its category.
    #[error("number overflow")]
    NumberOverflow,
    /// A comma directly before `}` or `]`.
    #[error("trailing comma")]
    TrailingComma,
    /// A missing `:` between a member key and its value.
    #[error("missing separator")]
    MissingSeparator,
    /// A missing closing quote, brace or bracket.
    #[error("missing terminator")]
    MissingTerminator,
    /// Value nesting exceeded the configured recursion limit.
    #[error("recursion limit exceeded")]
    RecursionLimit,
}

/// A line/column position within the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-based line number.
    pub line: usize,
    /// 0-based byte offset within the line.
    pub column: usize,
}

/// A parse failure, positioned on the input byte stream.
///
/// Every error carries a [`kind`](Self::kind), a human-readable
/// [`message`](Self::message) and the byte [`index`](Self::index) where
/// the fault was detected. When the index maps into the input, a
/// [`location`](Self::location) with line and column is attached as well,
/// and `Display` renders it after the message.
#[derive(Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    index: usize,
    location: Option<Location>,
}

impl Error {
    pub(crate) fn new<S: Into<String>>(kind: ErrorKind, message: S, index: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            index,
            location: None,
        }
    }

    /// Resolve the byte index against the input's line table.
    pub(crate) fn with_location(mut self, lines: &LineIndex) -> Self {
        if self.location.is_none() {
            self.location = lines
                .line_col(self.index)
                .map(|(line, column)| Location { line, column });
        }
        self
    }

    /// The error's category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The error's message, without position information.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Byte offset into the input at which the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Line/column position, when the byte offset maps into the input.
    /// Absent for I/O errors and for string fragments parsed outside a
    /// document.
    pub fn location(&self) -> Option<Location> {
        self.location
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(Location { line, column }) => {
                write!(f, "{}: near: line: {line}: character: {column}", self.message)
            }
            None => f.write_str(&self.message),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR@{} {:?} ({})", self.index, self.message, self.kind)
    }
}

impl std::error::Error for Error {}
