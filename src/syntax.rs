//! Tree-sitter helpers shared by the engine and the resolver

use std::iter::Peekable;
use std::str::Chars;
use tree_sitter::Node;

/// Named children, skipping comment extras
pub fn named_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

pub fn first_named_child<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() != "comment")
}

/// Strip parentheses and type-level wrappers (`as`, `satisfies`, `!`)
pub fn unwrap_expression(node: Node<'_>) -> Node<'_> {
    let mut current = node;
    while matches!(
        current.kind(),
        "parenthesized_expression" | "as_expression" | "satisfies_expression" | "non_null_expression"
    ) {
        match first_named_child(current) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

/// Source text of a node, empty if the range falls outside `source`
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Remove the surrounding quote characters of a string literal
pub fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '"' | '\'' | '`') => {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

/// Decode the escape sequences of a JavaScript string body
///
/// `None` for a malformed `\x`/`\u` escape or a code point a Rust string
/// cannot hold (lone surrogates).
pub fn unescape(body: &str) -> Option<String> {
    if !body.contains('\\') {
        return Some(body.to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => out.push(char::from_u32(hex_value(&mut chars, 2)?)?),
            'u' => {
                let unit = code_point(&mut chars)?;
                if (0xD800..0xDC00).contains(&unit) {
                    // surrogate pair spelled as two escapes
                    let mut ahead = chars.clone();
                    if ahead.next() != Some('\\') || ahead.next() != Some('u') {
                        return None;
                    }
                    let low = code_point(&mut ahead)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return None;
                    }
                    chars = ahead;
                    out.push(char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))?);
                } else {
                    out.push(char::from_u32(unit)?);
                }
            }
            // line continuation
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    Some(out)
}

/// `\uXXXX` or `\u{X...}`, after the `u`
fn code_point(chars: &mut Peekable<Chars<'_>>) -> Option<u32> {
    if chars.next_if_eq(&'{').is_none() {
        return hex_value(chars, 4);
    }
    let mut value: u32 = 0;
    let mut digits = 0;
    loop {
        match chars.next()? {
            '}' if digits > 0 => return (value <= 0x10FFFF).then_some(value),
            c => {
                value = value.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
                digits += 1;
            }
        }
    }
}

fn hex_value(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<u32> {
    let mut value = 0;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

/// Parse a numeric literal: decimal, exponent, hex/octal/binary, separators, BigInt suffix
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let cleaned = cleaned.strip_suffix('n').unwrap_or(&cleaned);

    let radix = |prefix_len: usize, radix: u32| {
        i64::from_str_radix(&cleaned[prefix_len..], radix)
            .ok()
            .map(|n| n as f64)
    };

    match cleaned.get(..2) {
        Some("0x") | Some("0X") => radix(2, 16),
        Some("0o") | Some("0O") => radix(2, 8),
        Some("0b") | Some("0B") => radix(2, 2),
        _ => cleaned.parse::<f64>().ok(),
    }
}
