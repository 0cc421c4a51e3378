//! Stock resolver: what folds to a value and what stays unresolvable

use crate::box_model::{BoxNode, MapBox, Scalar};
use crate::tests::test_utils::{FUNCTIONS_ONLY, call_args, extract_with, str_of};
use pretty_assertions::assert_eq;

/// First argument of the only `css` call in `code`
fn css_object(code: &str) -> MapBox {
    let result = extract_with(code, FUNCTIONS_ONLY);
    call_args(&result, "css", 0)[0]
        .as_map()
        .cloned()
        .expect("object argument")
}

fn scalar<'m>(map: &'m MapBox, key: &str) -> Option<&'m Scalar> {
    map.get(key).and_then(BoxNode::as_scalar)
}

#[test]
fn test_scalar_literals() {
    let map = css_object(
        r#"css({ s: 'single', d: "double", n: 1.5, t: true, f: false, z: null, u: undefined });"#,
    );

    assert_eq!(scalar(&map, "s"), Some(&Scalar::String("single".into())));
    assert_eq!(scalar(&map, "d"), Some(&Scalar::String("double".into())));
    assert_eq!(scalar(&map, "n"), Some(&Scalar::Number(1.5)));
    assert_eq!(scalar(&map, "t"), Some(&Scalar::Boolean(true)));
    assert_eq!(scalar(&map, "f"), Some(&Scalar::Boolean(false)));
    assert_eq!(scalar(&map, "z"), Some(&Scalar::Null));
    assert_eq!(scalar(&map, "u"), Some(&Scalar::Undefined));
}

#[test]
fn test_numeric_forms_and_unary_operators() {
    let map = css_object(r#"css({ neg: -4, hex: 0xff, sep: 1_000, not: !0, plus: +2 });"#);

    assert_eq!(scalar(&map, "neg"), Some(&Scalar::Number(-4.0)));
    assert_eq!(scalar(&map, "hex"), Some(&Scalar::Number(255.0)));
    assert_eq!(scalar(&map, "sep"), Some(&Scalar::Number(1000.0)));
    assert_eq!(scalar(&map, "not"), Some(&Scalar::Boolean(true)));
    assert_eq!(scalar(&map, "plus"), Some(&Scalar::Number(2.0)));
}

#[test]
fn test_concatenation_folds() {
    let map = css_object(r#"css({ width: 10 + "px", sum: 1 + 2, mixed: "a" + 1 + "b" });"#);

    assert_eq!(scalar(&map, "width"), Some(&Scalar::String("10px".into())));
    assert_eq!(scalar(&map, "sum"), Some(&Scalar::Number(3.0)));
    assert_eq!(scalar(&map, "mixed"), Some(&Scalar::String("a1b".into())));
}

#[test]
fn test_plain_template_literal() {
    let map = css_object("css({ border: `1px solid ${\"red\"}` });");

    assert_eq!(scalar(&map, "border"), Some(&Scalar::String("1px solid red".into())));
}

#[test]
fn test_logical_operators_become_conditionals() {
    let map = css_object(r#"css({ and: on && "red", or: color || "blue", nullish: size ?? 2 });"#);

    let and = map.get("and").and_then(BoxNode::as_conditional).expect("conditional");
    assert_eq!(and.guard.text(), "on");
    assert_eq!(and.branches.len(), 1);
    assert_eq!(and.branches[0].as_str(), Some("red"));

    let or = map.get("or").and_then(BoxNode::as_conditional).expect("conditional");
    assert_eq!(or.guard.text(), "color");
    assert_eq!(or.branches.len(), 2);
    assert!(or.branches[0].is_unresolvable());
    assert_eq!(or.branches[1].as_str(), Some("blue"));

    let nullish = map.get("nullish").and_then(BoxNode::as_conditional).expect("conditional");
    assert_eq!(nullish.branches.len(), 2);
}

#[test]
fn test_const_bindings_and_member_access() {
    let map = css_object(
        r#"
const tokens = { colors: { primary: "blue" }, space: [0, 4, 8] };
const color = tokens.colors.primary;
css({ color, bg: tokens.colors["primary"], gap: tokens.space[2] });
"#,
    );

    assert_eq!(map.get("color").and_then(BoxNode::as_str), Some("blue"));
    assert_eq!(map.get("bg").and_then(BoxNode::as_str), Some("blue"));
    assert_eq!(scalar(&map, "gap"), Some(&Scalar::Number(8.0)));
}

#[test]
fn test_let_bindings_are_not_followed() {
    let map = css_object(
        r#"
let color = "red";
css({ color });
"#,
    );

    assert!(map.get("color").is_some_and(BoxNode::is_unresolvable));
}

#[test]
fn test_self_referencing_bindings_terminate() {
    let map = css_object(
        r#"
const a = b;
const b = a;
css({ value: a });
"#,
    );

    assert!(map.get("value").is_some_and(BoxNode::is_unresolvable));
}

#[test]
fn test_arrays_flatten_list_spreads() {
    let map = css_object(
        r#"
const base = [1, 2];
css({ sizes: [...base, 3], bad: [...unknown] });
"#,
    );

    let sizes = map.get("sizes").and_then(BoxNode::as_list).expect("list");
    let values: Vec<Option<&Scalar>> = sizes.items.iter().map(BoxNode::as_scalar).collect();
    assert_eq!(
        values,
        vec![
            Some(&Scalar::Number(1.0)),
            Some(&Scalar::Number(2.0)),
            Some(&Scalar::Number(3.0)),
        ]
    );

    let bad = map.get("bad").and_then(BoxNode::as_list).expect("list");
    assert_eq!(bad.items.len(), 1);
    assert!(bad.items[0].is_unresolvable());
}

#[test]
fn test_object_keys_and_spreads() {
    let map = css_object(
        r#"
const base = { color: "red", size: 1 };
css({ ...base, "quoted-key": 1, 42: "n", ["a" + "b"]: 2, size: 3, method() {} });
"#,
    );

    let keys: Vec<&str> = map.entries.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["color", "size", "quoted-key", "42", "ab"]);
    assert_eq!(scalar(&map, "size"), Some(&Scalar::Number(3.0)));
}

#[test]
fn test_type_wrappers_are_transparent() {
    let map = css_object(r#"css({ a: ("red" as const), b: (2 satisfies number), c: ((3)) });"#);

    assert_eq!(map.get("a").and_then(BoxNode::as_str), Some("red"));
    assert_eq!(scalar(&map, "b"), Some(&Scalar::Number(2.0)));
    assert_eq!(scalar(&map, "c"), Some(&Scalar::Number(3.0)));
}

#[test]
fn test_runtime_values_are_unresolvable() {
    let map = css_object(r#"css({ a: theme(), b: props.color, c: () => 1, d: x * 2 });"#);

    for key in ["a", "b", "c", "d"] {
        assert!(
            map.get(key).is_some_and(BoxNode::is_unresolvable),
            "{key} should be unresolvable"
        );
    }
}

#[test]
fn test_values_remember_their_path() {
    let map = css_object(r#"css({ color: "red" });"#);

    let color = map.get("color").expect("color");
    assert_eq!(color.node().text(), r#""red""#);
    let stack: Vec<&str> = color.stack().iter().map(|n| n.kind).collect();
    assert_eq!(stack, vec!["call_expression", "object", "pair"]);
}

#[test]
fn test_provenance_grows_linearly_with_source() {
    fn serialized_len(keys: usize) -> usize {
        let pairs: Vec<String> = (0..keys)
            .map(|i| format!(r#"k{i}: {{ color: "red", bg: "blue" }}"#))
            .collect();
        let code = format!("css({{ {} }});", pairs.join(", "));
        let result = extract_with(&code, FUNCTIONS_ONLY);
        serde_json::to_string(&result).expect("serializable").len()
    }

    let small = serialized_len(50);
    let large = serialized_len(200);
    assert!(large < small * 6, "{small} bytes for 50 keys, {large} for 200");
}

#[test]
fn test_deep_expressions_are_unresolvable() {
    let terms = vec![r#""x""#; 3000].join(" + ");
    let map = css_object(&format!(r#"css({{ deep: {terms}, shallow: "x" + "y" + "z" }});"#));

    assert!(map.get("deep").is_some_and(BoxNode::is_unresolvable));
    assert_eq!(map.get("shallow").and_then(BoxNode::as_str), Some("xyz"));
}

#[test]
fn test_string_escapes_decode() {
    let map = css_object(r#"css({ content: "\u2022", letter: "\x41", emoji: "\u{1F600}", lone: "\uD83D" });"#);

    assert_eq!(map.get("content").and_then(BoxNode::as_str), Some("\u{2022}"));
    assert_eq!(map.get("letter").and_then(BoxNode::as_str), Some("A"));
    assert_eq!(map.get("emoji").and_then(BoxNode::as_str), Some("\u{1F600}"));
    assert!(map.get("lone").is_some_and(BoxNode::is_unresolvable));
}

#[test]
fn test_bindings_resolve_in_their_own_function() {
    let code = r#"
function A() {
  const c = "red";
  return css({ color: c });
}
function B() {
  const c = "blue";
  return css({ color: c });
}
"#;
    let result = extract_with(code, FUNCTIONS_ONLY);

    let first = call_args(&result, "css", 0)[0].as_map().expect("map");
    let second = call_args(&result, "css", 1)[0].as_map().expect("map");
    assert_eq!(str_of(first.get("color")), Some("red"));
    assert_eq!(str_of(second.get("color")), Some("blue"));
}

#[test]
fn test_nearest_declaration_shadows_outer_binding() {
    let code = r#"
const c = "red";
function Param(c) {
  return css({ color: c });
}
function Block() {
  if (flag) {
    const c = "blue";
    css({ color: c });
  }
  let size = 1;
  css({ color: c, size });
}
"#;
    let result = extract_with(code, FUNCTIONS_ONLY);
    let param = call_args(&result, "css", 0)[0].as_map().expect("map");
    let block = call_args(&result, "css", 1)[0].as_map().expect("map");
    let body = call_args(&result, "css", 2)[0].as_map().expect("map");

    assert!(param.get("color").is_some_and(BoxNode::is_unresolvable));
    assert_eq!(str_of(block.get("color")), Some("blue"));
    assert_eq!(str_of(body.get("color")), Some("red"));
    assert!(body.get("size").is_some_and(BoxNode::is_unresolvable));
}
