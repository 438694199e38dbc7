use crate::tree::{ChildRange, NumberId, Payload, StringId, StringPool, Tree, ValueData, ValueId};
use crate::value::{Number, ValueKind};

/// Low-level sink that accumulates pool entries and value records and
/// freezes them into an immutable [`Tree`].
///
/// Both front-ends of the engine drive it: the parser pushes records as
/// grammar productions close, and the encoder's `build()` pass emits its
/// counted walk through it. Values are pushed complete, children before
/// their parent; [`finish`](Self::finish) binds the root.
///
/// String data can be streamed one code point at a time into an open pool
/// entry ([`begin_string`](Self::begin_string) /
/// [`push_char`](Self::push_char) / [`finish_string`](Self::finish_string))
/// or copied whole with [`intern`](Self::intern). Entries are not
/// deduplicated.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    values: Vec<ValueData>,
    children: Vec<ValueId>,
    strings: StringPool,
    numbers: Vec<Number>,
    open_string: Option<u32>,
}

impl TreeBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty builder with pre-sized stores, for producers that have
    /// counted the records ahead of time.
    pub fn with_capacity(
        values: usize,
        children: usize,
        numbers: usize,
        string_bytes: usize,
    ) -> Self {
        Self {
            values: Vec::with_capacity(values),
            children: Vec::with_capacity(children),
            strings: StringPool::with_capacity(string_bytes, values),
            numbers: Vec::with_capacity(numbers),
            open_string: None,
        }
    }

    /// Open a string pool entry. Code points are appended with
    /// [`push_char`](Self::push_char); at most one entry is open at a time.
    pub fn begin_string(&mut self) {
        debug_assert!(self.open_string.is_none(), "string entry already open");
        self.open_string = Some(self.strings.begin());
    }

    /// Append one code point to the open string entry.
    pub fn push_char(&mut self, c: char) {
        debug_assert!(self.open_string.is_some(), "no open string entry");
        self.strings.push_char(c);
    }

    /// Close the open string entry and return its id.
    pub fn finish_string(&mut self) -> StringId {
        let start = self.open_string.take().unwrap_or_else(|| self.strings.begin());
        self.strings.finish(start)
    }

    /// Copy a complete string into the pool as one entry.
    pub fn intern(&mut self, s: &str) -> StringId {
        debug_assert!(self.open_string.is_none(), "string entry already open");
        let start = self.strings.begin();
        self.strings.push_str(s);
        self.strings.finish(start)
    }

    /// Push a string value.
    pub fn push_string_value(&mut self, key: Option<StringId>, string: StringId) -> ValueId {
        self.push(key, Payload::String(string))
    }

    /// Push a number value.
    pub fn push_number_value(&mut self, key: Option<StringId>, number: Number) -> ValueId {
        let id = NumberId(self.numbers.len() as u32);
        self.numbers.push(number);
        self.push(key, Payload::Number(id))
    }

    /// Push a `True`, `False` or `Null` value.
    pub fn push_literal(&mut self, key: Option<StringId>, kind: ValueKind) -> ValueId {
        let payload = match kind {
            ValueKind::True => Payload::True,
            ValueKind::False => Payload::False,
            ValueKind::Null => Payload::Null,
            other => panic!("push_literal called with non-literal kind {other:?}"),
        };
        self.push(key, payload)
    }

    /// Push an object or array whose children have already been pushed.
    /// The child list is copied into the contiguous child-id table.
    pub fn push_container(
        &mut self,
        key: Option<StringId>,
        kind: ValueKind,
        children: &[ValueId],
    ) -> ValueId {
        let range = ChildRange {
            start: self.children.len() as u32,
            len: children.len() as u32,
        };
        for &child in children {
            debug_assert!(child.index() < self.values.len(), "child value out of range");
            debug_assert_eq!(
                self.values[child.index()].key.is_some(),
                kind == ValueKind::Object,
                "a child has a key exactly when its parent is an object"
            );
            self.children.push(child);
        }
        let payload = match kind {
            ValueKind::Object => Payload::Object(range),
            ValueKind::Array => Payload::Array(range),
            other => panic!("push_container called with non-container kind {other:?}"),
        };
        self.push(key, payload)
    }

    /// Bind `root` and freeze the accumulated records into a [`Tree`].
    pub fn finish(self, root: ValueId) -> Tree {
        debug_assert!(root.index() < self.values.len(), "root value out of range");
        debug_assert!(self.open_string.is_none(), "unterminated string entry");
        Tree {
            values: self.values,
            children: self.children,
            strings: self.strings,
            numbers: self.numbers,
            root,
        }
    }

    fn push(&mut self, key: Option<StringId>, payload: Payload) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(ValueData { key, payload });
        id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Value, ValueIter, ValueKind};
    use pretty_assertions::assert_eq;

    fn sample() -> Tree {
        // { "a": 1, "b": [true, "x"] }
        let mut builder = TreeBuilder::new();
        let key_a = builder.intern("a");
        let a = builder.push_number_value(Some(key_a), Number::Unsigned(1));
        let t = builder.push_literal(None, ValueKind::True);
        builder.begin_string();
        builder.push_char('x');
        let x = builder.finish_string();
        let x = builder.push_string_value(None, x);
        let key_b = builder.intern("b");
        let b = builder.push_container(Some(key_b), ValueKind::Array, &[t, x]);
        let root = builder.push_container(None, ValueKind::Object, &[a, b]);
        builder.finish(root)
    }

    #[test]
    fn builds_a_tree() {
        let tree = sample();
        assert_eq!(tree.value_count(), 5);
        let root = tree.root();
        assert_eq!(root.kind(), ValueKind::Object);
        assert_eq!(root.child_count(), 2);

        let children: Vec<Value<'_>> = root.children().expect("two children").collect();
        assert_eq!(children[0].key(), Some("a"));
        assert_eq!(children[0].as_number(), Some(Number::Unsigned(1)));
        assert_eq!(children[1].key(), Some("b"));
        assert_eq!(children[1].kind(), ValueKind::Array);
    }

    #[test]
    fn walk_is_depth_first_and_complete() {
        let tree = sample();
        let kinds: Vec<ValueKind> = tree.values().map(|v| v.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ValueKind::Object,
                ValueKind::Number,
                ValueKind::Array,
                ValueKind::True,
                ValueKind::String,
            ]
        );
        assert_eq!(tree.values().len(), tree.value_count());
    }

    #[test]
    fn cursor_operations() {
        let tree = sample();
        let mut iter = tree.values();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.first().map(|v| v.kind()), Some(ValueKind::Object));
        assert_eq!(ValueIter::last(&mut iter).map(|v| v.kind()), Some(ValueKind::String));
        assert_eq!(iter.next().map(|v| v.kind()), None);
        // Exhausted; prev steps back onto the last value.
        assert_eq!(iter.prev().map(|v| v.kind()), Some(ValueKind::String));
        assert_eq!(iter.prev().map(|v| v.kind()), Some(ValueKind::True));
    }

    #[test]
    fn children_signal_for_primitives_and_empties() {
        let mut builder = TreeBuilder::new();
        let root = builder.push_container(None, ValueKind::Array, &[]);
        let tree = builder.finish(root);
        assert!(tree.root().children().is_none());
        assert_eq!(tree.root().child_count(), 0);

        let tree = sample();
        let mut iter = tree.values();
        let number = iter.find(|v| v.kind() == ValueKind::Number).expect("number");
        assert!(number.children().is_none());
    }

    #[test]
    fn find_key_is_preorder_and_includes_the_root() {
        // { "k": { "k": 1 } } built bottom-up.
        let mut builder = TreeBuilder::new();
        let inner_key = builder.intern("k");
        let one = builder.push_number_value(Some(inner_key), Number::Unsigned(1));
        let outer_key = builder.intern("k");
        let inner = builder.push_container(Some(outer_key), ValueKind::Object, &[one]);
        let root = builder.push_container(None, ValueKind::Object, &[inner]);
        let tree = builder.finish(root);

        let hits = tree.find_key("k").expect("two matches");
        assert_eq!(hits.len(), 2);
        let kinds: Vec<ValueKind> = tree.find_key("k").expect("matches").map(|v| v.kind()).collect();
        assert_eq!(kinds, vec![ValueKind::Object, ValueKind::Number]);

        // Searching from the inner object still matches the inner object
        // itself: the search root is part of the sub-tree.
        let inner = tree.root().children().expect("one child").first().expect("inner");
        let hits = inner.find_key("k").expect("matches");
        assert_eq!(hits.len(), 2);

        assert!(tree.find_key("absent").is_none());
        assert!(tree.find_key("").is_none());
    }

    #[test]
    fn find_key_code_points() {
        let mut builder = TreeBuilder::new();
        let key = builder.intern("dé");
        let v = builder.push_number_value(Some(key), Number::Signed(-1));
        let root = builder.push_container(None, ValueKind::Object, &[v]);
        let tree = builder.finish(root);

        let hits = tree.find_key_code_points(&[0x64, 0xE9]).expect("one match");
        assert_eq!(hits.len(), 1);
        assert!(tree.find_key_code_points(&[0x64]).is_none());
        // An empty code-point query is a valid (never-matching) key here.
        assert!(tree.find_key_code_points(&[]).is_none());
    }

    #[test]
    fn structural_equality_ignores_arena_layout() {
        let a = sample();
        let b = sample();
        assert_eq!(a, b);

        let mut builder = TreeBuilder::new();
        let key_a = builder.intern("a");
        let v = builder.push_number_value(Some(key_a), Number::Unsigned(2));
        let root = builder.push_container(None, ValueKind::Object, &[v]);
        let other = builder.finish(root);
        assert!(a != other);
    }

    #[test]
    fn debug_dump() {
        let tree = sample();
        let dump = format!("{tree:?}");
        assert_eq!(
            dump,
            "- Object(2)\n    - \"a\": Unsigned(1)\n    - \"b\": Array(2)\n        - True\n        - String(\"x\")\n"
        );
    }
}
