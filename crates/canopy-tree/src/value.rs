use std::fmt;

use ordered_float::OrderedFloat;

use crate::iter::ValueIter;
use crate::tree::{Payload, Tree, ValueId};

/// The seven JSON value categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// An ordered sequence of keyed members.
    Object,
    /// An ordered sequence of unkeyed elements.
    Array,
    /// A decoded Unicode string.
    String,
    /// A number, classified by its lexical category.
    Number,
    /// The literal `true`.
    True,
    /// The literal `false`.
    False,
    /// The literal `null`.
    Null,
}

/// A JSON number, tagged with the lexical category of its source literal.
///
/// `1` is `Unsigned`, `-1` is `Signed`, `1.0` is `Float`. The category is
/// part of the value: it is decided by the literal's shape, not its range,
/// and the canonical [`Display`](fmt::Display) rendering preserves it
/// across a serialise/re-parse round trip.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    /// A literal with a fraction or exponent part.
    Float(OrderedFloat<f64>),
    /// An integer literal with a leading minus.
    Signed(i64),
    /// An integer literal with no sign, fraction or exponent.
    Unsigned(u64),
}

impl Number {
    /// Wrap a double as a `Float` number.
    pub fn float(x: f64) -> Self {
        Number::Float(OrderedFloat(x))
    }

    /// The floating point payload, if this is a `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Float(x) => Some(x.into_inner()),
            _ => None,
        }
    }

    /// The signed integer payload, if this is a `Signed`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Signed(i) => Some(*i),
            _ => None,
        }
    }

    /// The unsigned integer payload, if this is an `Unsigned`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Unsigned(u) => Some(*u),
            _ => None,
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Float(x) => write!(f, "Float({:?})", x.into_inner()),
            Number::Signed(i) => write!(f, "Signed({i})"),
            Number::Unsigned(u) => write!(f, "Unsigned({u})"),
        }
    }
}

impl fmt::Display for Number {
    /// The canonical JSON literal for this number.
    ///
    /// Integers print in plain decimal. Floats print the shortest form
    /// that re-parses to the identical `f64`; a form with neither `.` nor
    /// exponent would re-classify as an integer, so such values fall back
    /// to exponent notation (`1e0`, `1e300`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Float(x) => {
                let x = x.into_inner();
                let s = x.to_string();
                if s.contains('.') {
                    f.write_str(&s)
                } else {
                    write!(f, "{x:e}")
                }
            }
            // A signed zero only ever comes from the literal `-0`; keep
            // the sign so the category survives re-parsing.
            Number::Signed(0) => f.write_str("-0"),
            Number::Signed(i) => write!(f, "{i}"),
            Number::Unsigned(u) => write!(f, "{u}"),
        }
    }
}

/// A handle to one value inside a [`Tree`].
///
/// Handles are `Copy` and borrow their tree; all accessors return data
/// borrowed from the tree's arena.
#[derive(Clone, Copy)]
pub struct Value<'a> {
    tree: &'a Tree,
    id: ValueId,
}

impl<'a> Value<'a> {
    pub(crate) fn new(tree: &'a Tree, id: ValueId) -> Self {
        Self { tree, id }
    }

    /// The value's category.
    pub fn kind(&self) -> ValueKind {
        match self.tree.data(self.id).payload {
            Payload::Object(_) => ValueKind::Object,
            Payload::Array(_) => ValueKind::Array,
            Payload::String(_) => ValueKind::String,
            Payload::Number(_) => ValueKind::Number,
            Payload::True => ValueKind::True,
            Payload::False => ValueKind::False,
            Payload::Null => ValueKind::Null,
        }
    }

    /// The member key. Present exactly when this value is a direct child
    /// of an object.
    pub fn key(&self) -> Option<&'a str> {
        self.tree
            .data(self.id)
            .key
            .map(|id| self.tree.strings.get(id))
    }

    /// The string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&'a str> {
        match self.tree.data(self.id).payload {
            Payload::String(id) => Some(self.tree.strings.get(id)),
            _ => None,
        }
    }

    /// The number payload, if this is a number value.
    pub fn as_number(&self) -> Option<Number> {
        match self.tree.data(self.id).payload {
            Payload::Number(id) => Some(self.tree.number(id)),
            _ => None,
        }
    }

    /// Number of direct children. Zero for primitives and for empty
    /// objects and arrays.
    pub fn child_count(&self) -> usize {
        self.child_ids().len()
    }

    /// Iterator over the direct children, in insertion order.
    ///
    /// Returns `None` when there is nothing to iterate: for primitive
    /// values and for empty objects and arrays alike.
    pub fn children(&self) -> Option<ValueIter<'a>> {
        let ids = self.child_ids();
        if ids.is_empty() {
            return None;
        }
        Some(ValueIter::new(self.tree, ids.to_vec()))
    }

    /// Depth-first iterator over the sub-tree rooted at this value,
    /// starting with the value itself.
    pub fn walk(&self) -> ValueIter<'a> {
        ValueIter::new(self.tree, self.walk_ids())
    }

    /// Search this sub-tree, in pre-order and including this value, for
    /// values whose key equals `key`.
    ///
    /// Returns `None` for an empty `key` and when nothing matches.
    pub fn find_key(&self, key: &str) -> Option<ValueIter<'a>> {
        if key.is_empty() {
            return None;
        }
        self.find_matching(|candidate| candidate == key)
    }

    /// Search this sub-tree for values whose key equals the given
    /// code-point sequence. Unlike [`find_key`](Self::find_key), an empty
    /// query is a valid key.
    pub fn find_key_code_points(&self, key: &[u32]) -> Option<ValueIter<'a>> {
        self.find_matching(|candidate| {
            candidate.chars().map(u32::from).eq(key.iter().copied())
        })
    }

    fn find_matching(&self, matches: impl Fn(&str) -> bool) -> Option<ValueIter<'a>> {
        let items: Vec<ValueId> = self
            .walk_ids()
            .into_iter()
            .filter(|&id| {
                self.tree
                    .data(id)
                    .key
                    .is_some_and(|key| matches(self.tree.strings.get(key)))
            })
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(ValueIter::new(self.tree, items))
    }

    fn child_ids(&self) -> &'a [ValueId] {
        match self.tree.data(self.id).payload {
            Payload::Object(range) | Payload::Array(range) => self.tree.child_slice(range),
            _ => &[],
        }
    }

    fn walk_ids(&self) -> Vec<ValueId> {
        let mut items = Vec::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            items.push(id);
            if let Payload::Object(range) | Payload::Array(range) = self.tree.data(id).payload {
                stack.extend(self.tree.child_slice(range).iter().rev());
            }
        }
        items
    }

    fn debug_fmt(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}- ", "")?;
        if let Some(key) = self.key() {
            write!(f, "{key:?}: ")?;
        }
        match self.tree.data(self.id).payload {
            Payload::Object(range) => writeln!(f, "Object({})", range.len)?,
            Payload::Array(range) => writeln!(f, "Array({})", range.len)?,
            Payload::String(id) => writeln!(f, "String({:?})", self.tree.strings.get(id))?,
            Payload::Number(id) => writeln!(f, "{:?}", self.tree.number(id))?,
            Payload::True => writeln!(f, "True")?,
            Payload::False => writeln!(f, "False")?,
            Payload::Null => writeln!(f, "Null")?,
        }
        for &child in self.child_ids() {
            Value::new(self.tree, child).debug_fmt(f, indent + 4)?;
        }
        Ok(())
    }
}

impl PartialEq for Value<'_> {
    /// Structural equality across trees: kind, key, payload and children,
    /// recursively. Arena layout and value ids are not compared.
    fn eq(&self, other: &Value<'_>) -> bool {
        if self.key() != other.key() {
            return false;
        }
        match (
            &self.tree.data(self.id).payload,
            &other.tree.data(other.id).payload,
        ) {
            (Payload::String(a), Payload::String(b)) => {
                self.tree.strings.get(*a) == other.tree.strings.get(*b)
            }
            (Payload::Number(a), Payload::Number(b)) => {
                self.tree.number(*a) == other.tree.number(*b)
            }
            (Payload::True, Payload::True)
            | (Payload::False, Payload::False)
            | (Payload::Null, Payload::Null) => true,
            (Payload::Object(a), Payload::Object(b)) | (Payload::Array(a), Payload::Array(b)) => {
                let left = self.tree.child_slice(*a);
                let right = other.tree.child_slice(*b);
                left.len() == right.len()
                    && left.iter().zip(right).all(|(&l, &r)| {
                        Value::new(self.tree, l) == Value::new(other.tree, r)
                    })
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value<'_> {
    /// An indented dump of the sub-tree rooted at this value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.debug_fmt(f, 0)
    }
}
