use std::fmt;

use crate::iter::ValueIter;
use crate::value::{Number, Value};

/// Index of a value record within its owning [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub(crate) u32);

impl ValueId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a string within its owning [`Tree`]'s string pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumberId(pub(crate) u32);

/// A contiguous run of entries in the child-id table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChildRange {
    pub(crate) start: u32,
    pub(crate) len: u32,
}

/// Append-only store of decoded string data.
///
/// All strings of one tree share a single backing buffer; each entry is a
/// byte span into it. Entries are never deduplicated, so repeated object
/// keys stay distinct and insertion order is observable.
#[derive(Debug, Default)]
pub(crate) struct StringPool {
    data: String,
    spans: Vec<(u32, u32)>,
}

impl StringPool {
    pub(crate) fn with_capacity(bytes: usize, entries: usize) -> Self {
        Self {
            data: String::with_capacity(bytes),
            spans: Vec::with_capacity(entries),
        }
    }

    /// Offset at which the next entry will start.
    pub(crate) fn begin(&self) -> u32 {
        self.data.len() as u32
    }

    pub(crate) fn push_char(&mut self, c: char) {
        self.data.push(c);
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.data.push_str(s);
    }

    /// Close the entry opened at `start` and hand out its id.
    pub(crate) fn finish(&mut self, start: u32) -> StringId {
        let id = StringId(self.spans.len() as u32);
        self.spans.push((start, self.data.len() as u32));
        id
    }

    pub(crate) fn get(&self, id: StringId) -> &str {
        let (start, end) = self.spans[id.0 as usize];
        &self.data[start as usize..end as usize]
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Payload {
    Object(ChildRange),
    Array(ChildRange),
    String(StringId),
    Number(NumberId),
    True,
    False,
    Null,
}

/// One value record: its payload plus the member key, if the value is a
/// direct child of an object.
#[derive(Debug)]
pub(crate) struct ValueData {
    pub(crate) key: Option<StringId>,
    pub(crate) payload: Payload,
}

/// A JSON document: a root value plus every transitively reachable
/// descendant, all owned by one allocation region.
///
/// Trees are immutable once built. Dropping a tree releases its values,
/// strings, numbers and child lists in one step; [`Value`] handles and
/// iterators borrow the tree and cannot outlive it. A tree is cheap to
/// share read-only across threads once construction has finished.
pub struct Tree {
    pub(crate) values: Vec<ValueData>,
    pub(crate) children: Vec<ValueId>,
    pub(crate) strings: StringPool,
    pub(crate) numbers: Vec<Number>,
    pub(crate) root: ValueId,
}

impl Tree {
    /// The root value.
    pub fn root(&self) -> Value<'_> {
        Value::new(self, self.root)
    }

    /// Total number of values in the tree, the same count a depth-first
    /// walk from the root visits.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Depth-first iterator over every value, starting at the root.
    pub fn values(&self) -> ValueIter<'_> {
        self.root().walk()
    }

    /// Search the whole tree for values whose key equals `key`.
    /// See [`Value::find_key`].
    pub fn find_key(&self, key: &str) -> Option<ValueIter<'_>> {
        self.root().find_key(key)
    }

    /// Search the whole tree for values whose key equals the given
    /// code-point sequence. See [`Value::find_key_code_points`].
    pub fn find_key_code_points(&self, key: &[u32]) -> Option<ValueIter<'_>> {
        self.root().find_key_code_points(key)
    }

    pub(crate) fn data(&self, id: ValueId) -> &ValueData {
        &self.values[id.index()]
    }

    pub(crate) fn child_slice(&self, range: ChildRange) -> &[ValueId] {
        &self.children[range.start as usize..(range.start + range.len) as usize]
    }

    pub(crate) fn number(&self, id: NumberId) -> Number {
        self.numbers[id.0 as usize]
    }
}

impl PartialEq for Tree {
    /// Structural isomorphism: kinds, keys, payloads and child lists must
    /// match pairwise, independent of how either tree was produced.
    fn eq(&self, other: &Tree) -> bool {
        self.root() == other.root()
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.root(), f)
    }
}
