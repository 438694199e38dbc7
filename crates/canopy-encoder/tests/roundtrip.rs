//! End-to-end properties across the parser, builder and writer: whatever
//! path produced a tree, serialising and re-parsing it must yield an
//! equivalent tree.

use canopy_encoder::{write, write_tree, Builder};
use canopy_parser::{parse_str, Number, Tree, Value, ValueKind};
use pretty_assertions::assert_eq;

fn reparse(tree: &Tree) -> Tree {
    let text = write_tree(tree);
    parse_str(&text)
        .unwrap_or_else(|err| panic!("writer output must re-parse, got {err}: {text}"))
}

fn assert_key_invariant(value: Value<'_>, parent_is_object: bool) {
    assert_eq!(value.key().is_some(), parent_is_object);
    if let Some(children) = value.children() {
        let is_object = value.kind() == ValueKind::Object;
        for child in children {
            assert_key_invariant(child, is_object);
        }
    }
}

#[test]
fn parse_write_parse_is_identity() {
    let corpus: &[&str] = &[
        "null",
        "true",
        "false",
        "0",
        "-0",
        "-7",
        "2.5",
        "1e5",
        "-0.125",
        "18446744073709551615",
        "-9223372036854775808",
        r#""""#,
        r#""plain text""#,
        r#""esc \"\\ A \n ÿ""#,
        r#""😀""#,
        "[]",
        "{}",
        "[[], {}, [{}]]",
        r#"{"a":1,"b":-2,"c":1.5,"d":true,"e":null,"f":[1,2,3]}"#,
        r#"{"dup":1,"dup":2}"#,
        r#"{"nested": {"deep": [0.5, {"deeper": ["x", null, false]}]}}"#,
        r#"{"unicode é": "😀", "control": ""}"#,
    ];
    for input in corpus {
        let first = parse_str(input)
            .unwrap_or_else(|err| panic!("corpus input {input:?} failed: {err}"));
        let second = reparse(&first);
        assert_eq!(first, second, "round trip changed the tree for {input:?}");
        assert_eq!(first.value_count(), second.value_count());
        assert_key_invariant(second.root(), false);
    }
}

#[test]
fn built_trees_round_trip() {
    // {"k": [1, 65535, 18446744073709551615]}
    let mut builder = Builder::new();
    let root = builder.make_object();
    let key = builder.make_string_bytes(b"k").unwrap();
    let array = builder.make_array();
    for n in [1u64, 65_535, 18_446_744_073_709_551_615] {
        let number = builder.make_number_unsigned(n);
        builder.add_to_array(array, number).unwrap();
    }
    builder.add_to_object(root, key, array).unwrap();
    let built = builder.build(root).unwrap();

    let round_tripped = reparse(&built);
    assert_eq!(built, round_tripped);

    let numbers: Vec<Number> = round_tripped
        .find_key("k")
        .expect("key survives the round trip")
        .first()
        .expect("one match")
        .children()
        .expect("three elements")
        .filter_map(|v| v.as_number())
        .collect();
    assert_eq!(
        numbers,
        vec![
            Number::Unsigned(1),
            Number::Unsigned(65_535),
            Number::Unsigned(18_446_744_073_709_551_615),
        ]
    );
}

#[test]
fn built_trees_match_parsed_trees() {
    // Build {"s": "hi", "n": -4, "f": 0.25, "t": true, "x": null, "a": [false]}
    // and compare against the parse of its literal rendering.
    let mut builder = Builder::new();
    let root = builder.make_object();

    let key = builder.make_string_bytes(b"s").unwrap();
    let s = builder.make_string_bytes(b"hi").unwrap();
    builder.add_to_object(root, key, s).unwrap();

    let key = builder.make_string_bytes(b"n").unwrap();
    let n = builder.make_number_signed(-4);
    builder.add_to_object(root, key, n).unwrap();

    let key = builder.make_string_bytes(b"f").unwrap();
    let f = builder.make_number_float(0.25).unwrap();
    builder.add_to_object(root, key, f).unwrap();

    let key = builder.make_string_bytes(b"t").unwrap();
    let t = builder.make_true();
    builder.add_to_object(root, key, t).unwrap();

    let key = builder.make_string_bytes(b"x").unwrap();
    let x = builder.make_null();
    builder.add_to_object(root, key, x).unwrap();

    let key = builder.make_string_bytes(b"a").unwrap();
    let a = builder.make_array();
    let fal = builder.make_false();
    builder.add_to_array(a, fal).unwrap();
    builder.add_to_object(root, key, a).unwrap();

    let built = builder.build(root).unwrap();
    let parsed = parse_str(
        r#"{"s": "hi", "n": -4, "f": 0.25, "t": true, "x": null, "a": [false]}"#,
    )
    .unwrap();
    assert_eq!(built, parsed);
}

#[test]
fn code_point_strings_round_trip() {
    let mut builder = Builder::new();
    let root = builder.make_object();
    // Key and value both beyond the 7-bit range.
    let key = builder.make_string_code_points(&[0xE9, 0x20AC]).unwrap();
    let value = builder
        .make_string_code_points(&[0x1F600, 0x00, 0x7F])
        .unwrap();
    builder.add_to_object(root, key, value).unwrap();
    let built = builder.build(root).unwrap();

    let round_tripped = reparse(&built);
    assert_eq!(built, round_tripped);

    let hits = round_tripped
        .find_key_code_points(&[0xE9, 0x20AC])
        .expect("code-point key survives");
    assert_eq!(hits.len(), 1);
}

#[test]
fn writer_output_is_stable() {
    let tree = parse_str(r#"{"a":1,"b":[true,{"c":"x"}]}"#).unwrap();
    let once = write_tree(&tree);
    let twice = write_tree(&reparse(&tree));
    assert_eq!(once, twice);
}

#[test]
fn write_accepts_any_sub_tree() {
    let tree = parse_str(r#"{"outer": {"inner": [1, 2]}}"#).unwrap();
    let mut hits = tree.find_key("inner").expect("one match");
    let inner = hits.first().expect("present");
    let text = write(inner);
    let reparsed = parse_str(&text).unwrap();
    assert_eq!(reparsed.root().kind(), ValueKind::Array);
    assert_eq!(reparsed.value_count(), 3);
}
