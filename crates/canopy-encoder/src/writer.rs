use std::fmt::Write;

use canopy_tree::{Tree, Value, ValueKind};

/// Serialise the sub-tree rooted at `value` as indented JSON text.
///
/// The output is RFC 8259-conformant UTF-8 and re-parses to a tree
/// equivalent to the input. Objects and arrays open an indented block
/// (two spaces per level) with one comma-separated child per line; empty
/// containers render as `{}` and `[]`. If `value` is itself an object
/// member, its key is not emitted; keys of nested members are.
///
/// ```rust
/// use canopy_encoder::write;
///
/// let tree = canopy_parser::parse_str(r#"[1, {"a": true}]"#).unwrap();
/// assert_eq!(
///     write(tree.root()),
///     "[\n  1,\n  {\n    \"a\": true\n  }\n]"
/// );
/// ```
pub fn write(value: Value<'_>) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, true);
    out
}

/// Serialise a whole tree. Equivalent to `write(tree.root())`.
pub fn write_tree(tree: &Tree) -> String {
    write(tree.root())
}

fn write_value(out: &mut String, value: Value<'_>, depth: usize, is_root: bool) {
    if !is_root {
        if let Some(key) = value.key() {
            write_string(out, key);
            out.push_str(": ");
        }
    }
    match value.kind() {
        ValueKind::Object | ValueKind::Array => write_container(out, value, depth),
        ValueKind::String => write_string(out, value.as_str().unwrap_or_default()),
        ValueKind::Number => {
            if let Some(number) = value.as_number() {
                let _ = write!(out, "{number}");
            }
        }
        ValueKind::True => out.push_str("true"),
        ValueKind::False => out.push_str("false"),
        ValueKind::Null => out.push_str("null"),
    }
}

fn write_container(out: &mut String, value: Value<'_>, depth: usize) {
    let (open, close) = match value.kind() {
        ValueKind::Object => ('{', '}'),
        _ => ('[', ']'),
    };
    let Some(children) = value.children() else {
        out.push(open);
        out.push(close);
        return;
    };
    out.push(open);
    let inner = depth + 2;
    for (i, child) in children.enumerate() {
        if i > 0 {
            out.push(',');
        }
        break_indent(out, inner);
        write_value(out, child, inner, false);
    }
    break_indent(out, depth);
    out.push(close);
}

fn break_indent(out: &mut String, indent: usize) {
    out.push('\n');
    for _ in 0..indent {
        out.push(' ');
    }
}

/// Emit a quoted, re-escaped string. Only `\`, `"` and the control range
/// need escaping; everything else is a valid scalar value and is emitted
/// verbatim.
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{0000}'..='\u{001F}' => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            _ => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn rewrite(input: &str) -> String {
        write_tree(&canopy_parser::parse_str(input).unwrap())
    }

    #[test]
    fn primitives() {
        assert_eq!(rewrite("true"), "true");
        assert_eq!(rewrite("false"), "false");
        assert_eq!(rewrite("null"), "null");
        assert_eq!(rewrite("42"), "42");
        assert_eq!(rewrite("-42"), "-42");
        assert_eq!(rewrite("-0"), "-0");
        assert_eq!(rewrite("2.5"), "2.5");
        assert_eq!(rewrite(r#""hi""#), r#""hi""#);
    }

    #[test]
    fn indented_blocks() {
        assert_eq!(
            rewrite(r#"{"a":1,"b":[true,null]}"#),
            indoc! {r#"
                {
                  "a": 1,
                  "b": [
                    true,
                    null
                  ]
                }"#}
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(rewrite("{}"), "{}");
        assert_eq!(rewrite("[]"), "[]");
        assert_eq!(
            rewrite(r#"{"empty": {}}"#),
            indoc! {r#"
                {
                  "empty": {}
                }"#}
        );
    }

    #[test]
    fn string_escaping() {
        assert_eq!(rewrite(r#""back\\slash""#), r#""back\\slash""#);
        assert_eq!(rewrite(r#""quote\"mark""#), r#""quote\"mark""#);
        // Control characters always re-escape as uppercase \u00XX, even
        // the ones with single-letter escape forms.
        assert_eq!(rewrite(r#""line\nfeed""#), r#""line\u000Afeed""#);
        assert_eq!(rewrite(r#""\u0000""#), r#""\u0000""#);
        assert_eq!(rewrite(r#""\b""#), r#""\u0008""#);
        assert_eq!(rewrite(r#""""#), r#""""#);
        // Printable Unicode is emitted verbatim, escaped or not.
        assert_eq!(rewrite(r#""café""#), "\"café\"");
        assert_eq!(rewrite(r#""\u00E9""#), "\"é\"");
        assert_eq!(rewrite(r#""😀""#), "\"😀\"");
    }

    #[test]
    fn sub_tree_root_key_is_suppressed() {
        let tree = canopy_parser::parse_str(r#"{"a": [1, 2]}"#).unwrap();
        let mut hits = tree.find_key("a").expect("one match");
        let array = hits.first().expect("present");
        assert_eq!(
            write(array),
            indoc! {"
                [
                  1,
                  2
                ]"}
        );
    }

    #[test]
    fn number_rendering_survives_reparse() {
        assert_eq!(rewrite("18446744073709551615"), "18446744073709551615");
        assert_eq!(rewrite("-9223372036854775808"), "-9223372036854775808");
        assert_eq!(rewrite("1.5"), "1.5");
        // Integral floats keep a float rendering.
        assert_eq!(rewrite("1.0"), "1e0");
        assert_eq!(rewrite("1e300"), "1e300");
    }
}
