//! Low-level text helpers shared by every section parser.

use crate::domain::value_objects::{MethodCall, Param};

/// Remove `/* ... */` block comments. An unterminated comment runs to the
/// end of the input.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

pub fn remove_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split on `separator` wherever the bracket depth (`()`, `[]`, `{}`) is zero.
///
/// Always yields at least one item, and a trailing separator yields a
/// trailing empty item.
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ if c == separator && depth == 0 => {
                items.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    items.push(&input[start..]);
    items
}

/// Parse a scalar parameter.
///
/// Quoted → string, `true`/`false` → bool, `null`, a dotted number → float,
/// otherwise an integer. Tokens that are none of these stay strings.
pub fn parse_scalar(token: &str) -> Param {
    if token.contains('\'') {
        return Param::Str(token.trim_matches('\'').to_string());
    }
    if token.contains('"') {
        return Param::Str(token.trim_matches('"').to_string());
    }
    match token {
        "true" => Param::Bool(true),
        "false" => Param::Bool(false),
        "null" => Param::Null,
        _ if token.contains('.') => token
            .parse::<f64>()
            .map_or_else(|_| Param::Str(token.to_string()), Param::Float),
        _ => token
            .parse::<i64>()
            .map_or_else(|_| Param::Str(token.to_string()), Param::Int),
    }
}

/// Parse a comma separated parameter list, descending into `[...]` arrays.
pub fn parse_params(input: &str) -> Vec<Param> {
    if input.is_empty() {
        return Vec::new();
    }
    split_top_level(input, ',')
        .into_iter()
        .map(|token| match token.strip_prefix('[') {
            Some(inner) => Param::Array(parse_params(inner.strip_suffix(']').unwrap_or(inner))),
            None => parse_scalar(token),
        })
        .collect()
}

/// `method(p1, p2)` → [`MethodCall`]. A token without `(` is a bare call.
pub fn parse_method(input: &str) -> MethodCall {
    match input.split_once('(') {
        Some((method, rest)) => {
            let inner = rest.strip_suffix(')').unwrap_or(rest);
            MethodCall::new(method, parse_params(inner))
        }
        None => MethodCall::bare(input),
    }
}
