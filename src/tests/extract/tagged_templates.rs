//! Tagged template extraction

use crate::extract::{EntryKind, ExtractionResult, QueryKind};
use crate::tests::test_utils::extract_with;
use pretty_assertions::assert_eq;

const TEMPLATES: &str = r#"
[tagged_templates]
names = ["css", "styled", "styled.*"]
"#;

fn template_text<'r>(result: &'r ExtractionResult, name: &str) -> Option<&'r str> {
    result.get(name)?.queries.first()?.value.as_str()
}

#[test]
fn test_plain_tag() {
    let code = "const a = css`color: red;`;";
    let result = extract_with(code, TEMPLATES);

    let entry = result.get("css").expect("css entry");
    assert_eq!(entry.kind, EntryKind::Function);
    assert_eq!(entry.queries[0].kind, QueryKind::TaggedTemplate);
    assert_eq!(template_text(&result, "css"), Some("color: red;"));

    let stack: Vec<&str> = entry.queries[0].value.stack().iter().map(|n| n.kind).collect();
    assert_eq!(stack, vec!["call_expression"]);
}

#[test]
fn test_member_tag_with_folded_substitution() {
    let code = "const Button = styled.button`padding: ${4}px ${\"8\"}px;`;";
    let result = extract_with(code, TEMPLATES);

    assert_eq!(template_text(&result, "styled.button"), Some("padding: 4px 8px;"));
}

#[test]
fn test_call_tag_resolves_to_callee() {
    let code = "const Link = styled(\"a\")`margin: 0;`;";
    let result = extract_with(code, TEMPLATES);

    let names: Vec<&str> = result.names().collect();
    assert_eq!(names, vec!["styled"]);
    assert_eq!(template_text(&result, "styled"), Some("margin: 0;"));
}

#[test]
fn test_dynamic_substitution_is_unresolvable() {
    let code = "const a = css`color: ${(props) => props.color};`;";
    let result = extract_with(code, TEMPLATES);

    let entry = result.get("css").expect("css entry");
    assert_eq!(entry.queries.len(), 1);
    assert!(entry.queries[0].value.is_unresolvable());
}

#[test]
fn test_const_substitution_is_folded() {
    let code = r#"
const primary = "rebeccapurple";
const a = css`color: ${primary};`;
"#;
    let result = extract_with(code, TEMPLATES);

    assert_eq!(template_text(&result, "css"), Some("color: rebeccapurple;"));
}

#[test]
fn test_tagged_templates_are_not_calls() {
    let config = r#"
[functions]
names = ["css"]
"#;
    let code = "const a = css`color: red;`;";
    let result = extract_with(code, config);

    assert!(result.is_empty());
}

#[test]
fn test_unmatched_tags_are_ignored() {
    let code = "const q = gql`query { id }`;";
    let result = extract_with(code, TEMPLATES);

    assert!(result.is_empty());
}
