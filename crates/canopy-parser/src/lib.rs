#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, future_incompatible, unreachable_pub, rust_2018_idioms)]

mod error;
mod lexer;
mod limit;
mod parser;
mod text;

pub use crate::error::{Error, ErrorKind, Location};
pub use crate::lexer::parse_string_content;
pub use crate::parser::{parse_bytes, parse_file, parse_str, Parser};

// The data model the parser produces, re-exported for convenience.
pub use canopy_tree::{Number, Tree, Value, ValueIter, ValueKind};
