#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, future_incompatible, unreachable_pub, rust_2018_idioms)]

mod builder;
mod iter;
mod tree;
mod value;

pub use crate::builder::TreeBuilder;
pub use crate::iter::ValueIter;
pub use crate::tree::{StringId, Tree, ValueId};
pub use crate::value::{Number, Value, ValueKind};
