#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, future_incompatible, unreachable_pub, rust_2018_idioms)]

mod builder;
mod error;
mod writer;

pub use crate::builder::{Builder, Handle};
pub use crate::error::Error;
pub use crate::writer::{write, write_tree};
