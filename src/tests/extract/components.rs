//! Component (markup element) extraction: attributes, ownership, naming

use crate::box_model::{BoxNode, Scalar};
use crate::extract::{EntryKind, QueryKind};
use crate::tests::test_utils::{COMPONENTS_ONLY, component_props, extract_with, str_of};
use pretty_assertions::assert_eq;

#[test]
fn test_string_attribute_becomes_literal_prop() {
    let code = r#"const a = <Box color="red" />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let entry = result.get("Box").expect("Box entry");
    assert_eq!(entry.kind, EntryKind::Component);
    assert_eq!(entry.queries.len(), 1);
    assert_eq!(entry.queries[0].kind, QueryKind::Component);
    assert_eq!(entry.queries[0].name, "Box");

    let props = component_props(&result, "Box", 0);
    assert_eq!(str_of(props.get("color")), Some("red"));
    assert_eq!(props.node.kind, "jsx_self_closing_element");
    assert!(props.spread_conditions.is_empty());
}

#[test]
fn test_boolean_shorthand_attribute_is_true() {
    let code = r#"const a = <Box disabled />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let props = component_props(&result, "Box", 0);
    assert_eq!(
        props.get("disabled").and_then(BoxNode::as_scalar),
        Some(&Scalar::Boolean(true))
    );
}

#[test]
fn test_expression_attribute_records_provenance_stack() {
    let code = r#"const a = <Box size={4} />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let size = component_props(&result, "Box", 0)
        .get("size")
        .expect("size prop");
    assert_eq!(size.as_scalar(), Some(&Scalar::Number(4.0)));
    assert_eq!(size.node().kind, "number");
    let stack: Vec<&str> = size.stack().iter().map(|n| n.kind).collect();
    assert_eq!(stack, vec!["jsx_attribute", "jsx_expression"]);
}

#[test]
fn test_ternary_attribute_is_conditional() {
    let code = r#"const a = <Box color={dark ? "white" : "black"} />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let color = component_props(&result, "Box", 0)
        .get("color")
        .and_then(BoxNode::as_conditional)
        .expect("conditional color");
    assert_eq!(color.guard.text(), "dark");
    let branches: Vec<Option<&str>> = color.branches.iter().map(BoxNode::as_str).collect();
    assert_eq!(branches, vec![Some("white"), Some("black")]);
}

#[test]
fn test_unresolvable_attribute_is_dropped() {
    let code = r#"const a = <Box color={getColor()} bg="blue" />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let props = component_props(&result, "Box", 0);
    assert!(props.get("color").is_none());
    assert_eq!(str_of(props.get("bg")), Some("blue"));

    let entry = result.get("Box").expect("Box entry");
    assert!(!entry.props.contains("color"));
}

#[test]
fn test_unmatched_elements_are_ignored() {
    let code = r#"const a = <div color="red"><Text color="blue" /></div>;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    assert!(result.is_empty());
}

#[test]
fn test_prop_filter_limits_recorded_props() {
    let config = r#"
[components]
tags = ["Box"]
props = ["color", "bg*"]
"#;
    let code = r#"const a = <Box color="red" bgColor="blue" onClick={1} />;"#;
    let result = extract_with(code, config);

    let props = component_props(&result, "Box", 0);
    let names: Vec<&str> = props.entries.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["color", "bgColor"]);
}

#[test]
fn test_factory_name_is_the_entry_key() {
    let code = r#"const a = <Namespace.Member color="red" />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    assert!(result.contains("Namespace.Member"));
    let props = component_props(&result, "Namespace.Member", 0);
    assert_eq!(str_of(props.get("color")), Some("red"));
}

#[test]
fn test_factory_names_can_be_disabled() {
    let config = r#"
[components]
tags = ["styled.*"]
factories = false
"#;
    let code = r#"const a = <styled.div color="red" />;"#;
    let result = extract_with(code, config);

    assert!(result.is_empty());
}

#[test]
fn test_nested_element_in_attribute_owns_its_own_props() {
    let code = r#"const a = <Box header={<Box color="red" />} color="blue" />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let entry = result.get("Box").expect("Box entry");
    assert_eq!(entry.queries.len(), 2);

    // Outer element is opened first, so it is reconciled first
    let outer = component_props(&result, "Box", 0);
    assert_eq!(str_of(outer.get("color")), Some("blue"));
    assert!(outer.get("header").is_none());

    let inner = component_props(&result, "Box", 1);
    assert_eq!(str_of(inner.get("color")), Some("red"));
    assert_eq!(inner.entries.len(), 1);

    let history: Vec<Option<&str>> = entry.props.get("color").iter().map(BoxNode::as_str).collect();
    assert_eq!(history, vec![Some("red"), Some("blue")]);
}

#[test]
fn test_children_elements_are_separate_instances() {
    let code = r#"
const a = (
  <Box color="red">
    <Box color="green" />
  </Box>
);
"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let entry = result.get("Box").expect("Box entry");
    assert_eq!(entry.queries.len(), 2);
    assert_eq!(str_of(component_props(&result, "Box", 0).get("color")), Some("red"));
    assert_eq!(str_of(component_props(&result, "Box", 1).get("color")), Some("green"));
    assert_eq!(component_props(&result, "Box", 0).node.kind, "jsx_opening_element");
}

#[test]
fn test_element_without_props_still_yields_instance() {
    let code = r#"const a = <Box />;"#;
    let result = extract_with(code, COMPONENTS_ONLY);

    let entry = result.get("Box").expect("Box entry");
    assert_eq!(entry.queries.len(), 1);
    assert!(entry.props.is_empty());
    assert!(component_props(&result, "Box", 0).entries.is_empty());
}
