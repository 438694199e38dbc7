use canopy_tree::ValueKind;

/// Errors produced by the [`Builder`](crate::Builder) and its factories.
///
/// Builder errors carry no input position, since there is no input byte
/// stream. The exception is [`Parse`](Self::Parse), which wraps the
/// parser's positioned error for byte-string content that failed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A handle does not refer to a live builder value. Handles go stale
    /// after [`clear`](crate::Builder::clear) and never transfer between
    /// builders.
    #[error("value handle is out of range - does not exist")]
    InvalidHandle,
    /// The parent handle of `add_to_object` was not an object.
    #[error("parent handle must refer to an object value, not {0:?}")]
    NotAnObject(ValueKind),
    /// The parent handle of `add_to_array` was not an array.
    #[error("parent handle must refer to an array value, not {0:?}")]
    NotAnArray(ValueKind),
    /// The key handle of `add_to_object` was not a string.
    #[error("object key must refer to a string value, not {0:?}")]
    KeyNotAString(ValueKind),
    /// A raw code point in the surrogate range was passed to
    /// `make_string_code_points`.
    #[error("code point {value:#06X} at index {index} is in the surrogate range [0xD800 - 0xDFFF]")]
    SurrogateCodePoint {
        /// Position within the input array.
        index: usize,
        /// The offending code point.
        value: u32,
    },
    /// A raw code point above `0x10FFFF` was passed to
    /// `make_string_code_points`.
    #[error("code point {value:#X} at index {index} is out of range (> 0x10FFFF)")]
    CodePointOutOfRange {
        /// Position within the input array.
        index: usize,
        /// The offending code point.
        value: u32,
    },
    /// `make_number_float` was given a NaN or infinity, which have no
    /// JSON rendering.
    #[error("floating point number must be finite")]
    NonFiniteNumber,
    /// Byte-string content failed to parse as the content of a JSON
    /// string.
    #[error(transparent)]
    Parse(#[from] canopy_parser::Error),
}
