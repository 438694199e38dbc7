use canopy_parser::parse_string_content;
use canopy_tree::{Number, Tree, TreeBuilder, ValueId, ValueKind};

use crate::error::Error;

/// An opaque reference to a provisional value inside a [`Builder`].
///
/// Handles are only meaningful to the builder that issued them. They are
/// invalidated by [`Builder::clear`]; a handle held across `clear` may be
/// rejected or alias a later value, exactly like a reused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(usize);

/// Byte span into the builder's shared code-point buffer.
type Span = (usize, usize);

#[derive(Debug, Clone, Copy)]
enum BuildKind {
    Object,
    Array,
    String(Span),
    Number(Number),
    True,
    False,
    Null,
}

impl BuildKind {
    fn value_kind(self) -> ValueKind {
        match self {
            BuildKind::Object => ValueKind::Object,
            BuildKind::Array => ValueKind::Array,
            BuildKind::String(_) => ValueKind::String,
            BuildKind::Number(_) => ValueKind::Number,
            BuildKind::True => ValueKind::True,
            BuildKind::False => ValueKind::False,
            BuildKind::Null => ValueKind::Null,
        }
    }
}

/// One provisional value. Children of a container form a linked chain
/// through `next`, with head/tail/count kept on the parent, so adding a
/// child is O(1) with no per-add reallocation. Slot 0 is a reserved dummy
/// so 0 can mean "no link".
#[derive(Debug, Clone)]
struct BuildValue {
    kind: BuildKind,
    key: Option<Span>,
    next: usize,
    child_head: usize,
    child_tail: usize,
    child_count: usize,
}

impl BuildValue {
    fn new(kind: BuildKind) -> Self {
        Self {
            kind,
            key: None,
            next: 0,
            child_head: 0,
            child_tail: 0,
            child_count: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Counts {
    values: usize,
    children: usize,
    numbers: usize,
    string_bytes: usize,
}

/// Builds JSON value trees from code.
///
/// Factories hand out [`Handle`]s to provisional values; `add_to_object`
/// and `add_to_array` compose them; [`build`](Self::build) freezes the
/// reachable values into a [`Tree`] of exactly the shape the parser
/// produces, so downstream consumers cannot tell the source.
///
/// Adding a child *copies* it: the copy is appended to the parent and its
/// handle returned, while the original handle stays usable, so the same
/// string or number can be added to any number of parents.
///
/// ## Example
///
/// ```rust
/// use canopy_encoder::Builder;
/// use canopy_tree::ValueKind;
///
/// let mut builder = Builder::new();
/// let array = builder.make_array();
/// let one = builder.make_number_unsigned(1);
/// builder.add_to_array(array, one)?;
/// builder.add_to_array(array, one)?;
///
/// let tree = builder.build(array)?;
/// assert_eq!(tree.root().kind(), ValueKind::Array);
/// assert_eq!(tree.root().child_count(), 2);
/// # Ok::<(), canopy_encoder::Error>(())
/// ```
#[derive(Debug)]
pub struct Builder {
    values: Vec<BuildValue>,
    /// Decoded code points of every string made so far; values reference
    /// byte spans into it.
    chars: String,
}

impl Builder {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            // The dummy keeps real indices non-zero, so 0 can terminate
            // child chains.
            values: vec![BuildValue::new(BuildKind::Null)],
            chars: String::new(),
        }
    }

    /// Reset the builder for another tree. All previously issued handles
    /// are invalidated.
    pub fn clear(&mut self) {
        self.values.truncate(1);
        self.chars.clear();
    }

    /// Make a string value from JSON string-content bytes: the bytes
    /// between the quotes of a valid JSON string literal, escape
    /// sequences and all. The content is validated by the parser's own
    /// string-content rule. Empty input makes an empty string.
    pub fn make_string_bytes(&mut self, bytes: &[u8]) -> Result<Handle, Error> {
        let decoded = parse_string_content(bytes)?;
        let span = self.push_chars(&decoded);
        Ok(self.push(BuildKind::String(span)))
    }

    /// Make a string value from raw code points; no escape interpretation
    /// is performed. Each code point must be at most `0x10FFFF` and
    /// outside the surrogate range. An empty array makes an empty string.
    pub fn make_string_code_points(&mut self, code_points: &[u32]) -> Result<Handle, Error> {
        let offset = self.chars.len();
        for (index, &value) in code_points.iter().enumerate() {
            if (0xD800..=0xDFFF).contains(&value) {
                self.chars.truncate(offset);
                return Err(Error::SurrogateCodePoint { index, value });
            }
            let Some(c) = char::from_u32(value) else {
                self.chars.truncate(offset);
                return Err(Error::CodePointOutOfRange { index, value });
            };
            self.chars.push(c);
        }
        let span = (offset, self.chars.len() - offset);
        Ok(self.push(BuildKind::String(span)))
    }

    /// Make a floating point number value. NaN and infinities are
    /// rejected: no JSON literal denotes them.
    pub fn make_number_float(&mut self, number: f64) -> Result<Handle, Error> {
        if !number.is_finite() {
            return Err(Error::NonFiniteNumber);
        }
        Ok(self.push(BuildKind::Number(Number::float(number))))
    }

    /// Make a signed integer number value. A non-negative argument
    /// promotes to an unsigned number.
    pub fn make_number_signed(&mut self, number: i64) -> Handle {
        let number = if number < 0 {
            Number::Signed(number)
        } else {
            Number::Unsigned(number as u64)
        };
        self.push(BuildKind::Number(number))
    }

    /// Make an unsigned integer number value.
    pub fn make_number_unsigned(&mut self, number: u64) -> Handle {
        self.push(BuildKind::Number(Number::Unsigned(number)))
    }

    /// Make a `true` value.
    pub fn make_true(&mut self) -> Handle {
        self.push(BuildKind::True)
    }

    /// Make a `false` value.
    pub fn make_false(&mut self) -> Handle {
        self.push(BuildKind::False)
    }

    /// Make a `null` value.
    pub fn make_null(&mut self) -> Handle {
        self.push(BuildKind::Null)
    }

    /// Make an empty object value.
    pub fn make_object(&mut self) -> Handle {
        self.push(BuildKind::Object)
    }

    /// Make an empty array value.
    pub fn make_array(&mut self) -> Handle {
        self.push(BuildKind::Array)
    }

    /// Append `(key, child)` to `object`'s member list, in insertion
    /// order. `key` must be a string handle. Duplicate keys are permitted
    /// and preserved. Returns the handle of the appended copy.
    pub fn add_to_object(
        &mut self,
        object: Handle,
        key: Handle,
        child: Handle,
    ) -> Result<Handle, Error> {
        match self.get(object)?.kind {
            BuildKind::Object => {}
            other => return Err(Error::NotAnObject(other.value_kind())),
        }
        let key_span = match self.get(key)?.kind {
            BuildKind::String(span) => span,
            other => return Err(Error::KeyNotAString(other.value_kind())),
        };
        let mut copy = self.get(child)?.clone();
        copy.next = 0;
        copy.key = Some(key_span);
        Ok(self.link_child(object.0, copy))
    }

    /// Append `child` to `array`'s element list, in insertion order.
    /// Returns the handle of the appended copy.
    pub fn add_to_array(&mut self, array: Handle, child: Handle) -> Result<Handle, Error> {
        match self.get(array)?.kind {
            BuildKind::Array => {}
            other => return Err(Error::NotAnArray(other.value_kind())),
        }
        let mut copy = self.get(child)?.clone();
        copy.next = 0;
        copy.key = None;
        Ok(self.link_child(array.0, copy))
    }

    /// Build the tree rooted at `root`.
    ///
    /// Two passes: count every reachable record, then emit them through
    /// the same arena sink the parser finalisation uses. The builder is
    /// left untouched, so further values can be added and `build` called
    /// again.
    pub fn build(&self, root: Handle) -> Result<Tree, Error> {
        self.get(root)?;
        let mut counts = Counts::default();
        self.count_walk(root.0, &mut counts);
        let mut sink = TreeBuilder::with_capacity(
            counts.values,
            counts.children,
            counts.numbers,
            counts.string_bytes,
        );
        let root_id = self.emit(root.0, true, &mut sink);
        Ok(sink.finish(root_id))
    }

    fn push(&mut self, kind: BuildKind) -> Handle {
        let handle = Handle(self.values.len());
        self.values.push(BuildValue::new(kind));
        handle
    }

    fn push_chars(&mut self, s: &str) -> Span {
        let offset = self.chars.len();
        self.chars.push_str(s);
        (offset, s.len())
    }

    fn get(&self, handle: Handle) -> Result<&BuildValue, Error> {
        if handle.0 == 0 {
            return Err(Error::InvalidHandle);
        }
        self.values.get(handle.0).ok_or(Error::InvalidHandle)
    }

    /// Append a finished copy to `parent`'s child chain.
    fn link_child(&mut self, parent: usize, copy: BuildValue) -> Handle {
        let this = self.values.len();
        self.values.push(copy);
        let tail = self.values[parent].child_tail;
        if tail == 0 {
            self.values[parent].child_head = this;
        } else {
            self.values[tail].next = this;
        }
        self.values[parent].child_tail = this;
        self.values[parent].child_count += 1;
        Handle(this)
    }

    fn span_str(&self, span: Span) -> &str {
        &self.chars[span.0..span.0 + span.1]
    }

    fn count_walk(&self, index: usize, counts: &mut Counts) {
        let value = &self.values[index];
        counts.values += 1;
        if let Some(span) = value.key {
            counts.string_bytes += span.1;
        }
        match value.kind {
            BuildKind::String(span) => counts.string_bytes += span.1,
            BuildKind::Number(_) => counts.numbers += 1,
            BuildKind::Object | BuildKind::Array => {
                counts.children += value.child_count;
                let mut child = value.child_head;
                for _ in 0..value.child_count {
                    self.count_walk(child, counts);
                    child = self.values[child].next;
                }
            }
            BuildKind::True | BuildKind::False | BuildKind::Null => {}
        }
    }

    /// Emit `index` and its reachable descendants into the sink. The
    /// sub-tree root never carries a key: a keyed tree root would violate
    /// the key-iff-object-child invariant.
    fn emit(&self, index: usize, is_root: bool, sink: &mut TreeBuilder) -> ValueId {
        let value = &self.values[index];
        let key = if is_root {
            None
        } else {
            value.key.map(|span| sink.intern(self.span_str(span)))
        };
        match value.kind {
            BuildKind::String(span) => {
                let string = sink.intern(self.span_str(span));
                sink.push_string_value(key, string)
            }
            BuildKind::Number(number) => sink.push_number_value(key, number),
            BuildKind::True => sink.push_literal(key, ValueKind::True),
            BuildKind::False => sink.push_literal(key, ValueKind::False),
            BuildKind::Null => sink.push_literal(key, ValueKind::Null),
            BuildKind::Object | BuildKind::Array => {
                let mut children = Vec::with_capacity(value.child_count);
                let mut child = value.child_head;
                for _ in 0..value.child_count {
                    children.push(self.emit(child, false, sink));
                    child = self.values[child].next;
                }
                sink.push_container(key, value.kind.value_kind(), &children)
            }
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
