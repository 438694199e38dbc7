pub(crate) mod grammar;

use std::fs;
use std::path::Path;

use canopy_tree::{Tree, TreeBuilder};

use crate::error::{Error, ErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::limit::LimitTracker;
use crate::text::LineIndex;

/// Default nesting ceiling. Deep enough for any reasonable document while
/// keeping pathological inputs from exhausting the call stack.
const DEFAULT_RECURSION_LIMIT: usize = 500;

/// Parses a JSON byte stream into a [`Tree`].
///
/// ## Example
///
/// ```rust
/// use canopy_parser::{Parser, ValueKind};
///
/// let parser = Parser::new(br#"{"numbers": [1, -2, 3.5]}"#);
/// let tree = parser.parse().expect("valid document");
///
/// assert_eq!(tree.root().kind(), ValueKind::Object);
/// assert_eq!(tree.value_count(), 5);
/// ```
///
/// The parse is strict: the first violation aborts with an [`Error`]
/// positioned on the input. A leading UTF-8 byte-order mark is stripped
/// before parsing.
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a [u8],
    lexer: Lexer<'a>,
    /// One-token lookahead.
    current: Option<Token>,
    /// The tree under construction.
    pub(crate) builder: TreeBuilder,
    /// Guard against stack exhaustion on deeply nested values.
    pub(crate) recursion_limit: LimitTracker,
}

impl<'a> Parser<'a> {
    /// Create a parser over `input`. A leading byte-order mark
    /// (`EF BB BF`) is discarded.
    pub fn new(input: &'a [u8]) -> Self {
        let input = strip_bom(input);
        Self {
            input,
            lexer: Lexer::new(input),
            current: None,
            builder: TreeBuilder::new(),
            recursion_limit: LimitTracker::new(DEFAULT_RECURSION_LIMIT),
        }
    }

    /// Configure the recursion limit to use while parsing.
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = LimitTracker::new(limit);
        self
    }

    /// Parse the input to completion.
    ///
    /// The whole input must be one JSON text: anything left over after the
    /// top-level value is an error, and so is an empty (or BOM-only)
    /// input.
    pub fn parse(mut self) -> Result<Tree, Error> {
        match self.parse_inner() {
            Ok(tree) => Ok(tree),
            Err(err) => Err(err.with_location(&LineIndex::new(self.input))),
        }
    }

    fn parse_inner(&mut self) -> Result<Tree, Error> {
        if self.input.is_empty() {
            return Err(Error::new(ErrorKind::EmptyInput, "input is empty", 0));
        }
        let root = grammar::document(self)?;
        Ok(std::mem::take(&mut self.builder).finish(root))
    }

    /// The upcoming token, without consuming it.
    pub(crate) fn peek(&mut self) -> Result<&Token, Error> {
        if self.current.is_none() {
            let token = self.lexer.next_token()?;
            return Ok(self.current.insert(token));
        }
        match &self.current {
            Some(token) => Ok(token),
            None => unreachable!("lookahead was just filled"),
        }
    }

    /// Consume and return the upcoming token.
    pub(crate) fn bump(&mut self) -> Result<Token, Error> {
        match self.current.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    /// Offset of the first unconsumed content, or `None` when the whole
    /// input has been matched. Looks at raw bytes rather than lexing, so
    /// trailing garbage reports as such instead of as a lexical error.
    pub(crate) fn rest(&mut self) -> Option<usize> {
        match &self.current {
            Some(token) if token.kind == TokenKind::Eof => None,
            Some(token) => Some(token.index),
            None => self.lexer.remaining_content(),
        }
    }

    /// Consume the `:` between a member key and its value, or fail.
    pub(crate) fn expect_colon(&mut self) -> Result<(), Error> {
        let token = self.bump()?;
        if token.kind == TokenKind::Colon {
            return Ok(());
        }
        Err(Error::new(
            ErrorKind::MissingSeparator,
            format!(
                "expected key/value name separator `:`, got {}",
                token.kind.describe()
            ),
            token.index,
        ))
    }
}

fn strip_bom(input: &[u8]) -> &[u8] {
    input
        .strip_prefix([0xEF, 0xBB, 0xBF].as_slice())
        .unwrap_or(input)
}

/// Parse an in-memory JSON byte stream.
///
/// Convenience for [`Parser::new`] + [`Parser::parse`].
pub fn parse_bytes(input: &[u8]) -> Result<Tree, Error> {
    Parser::new(input).parse()
}

/// Parse a JSON document held in a string.
pub fn parse_str(input: &str) -> Result<Tree, Error> {
    parse_bytes(input.as_bytes())
}

/// Read a file and parse its contents as one JSON text.
///
/// The whole file is read in one step; a leading byte-order mark is
/// tolerated and discarded.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        Error::new(
            ErrorKind::Io,
            format!("can't open input file: {}: {err}", path.display()),
            0,
        )
    })?;
    if bytes.is_empty() {
        return Err(Error::new(
            ErrorKind::EmptyInput,
            format!("input file is empty: {}", path.display()),
            0,
        ));
    }
    Parser::new(&bytes).parse()
}
