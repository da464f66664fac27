//! List and range composition over a scalar parser
//!
//! Lists split on commas, ranges on a single dash. Either separator can be
//! escaped with a backslash to make it part of a value (`a\-b`, `x\,y`);
//! escapes are removed before the value reaches the scalar parser.

use super::ScalarParser;
use crate::context::ParseEnv;
use crate::error::ParseResult;
use crate::range::{OrderedRange, RangeValue};

/// Split on `separator` where it is not escaped, keeping escapes intact
pub fn split_unescaped(raw: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in raw.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&raw[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&raw[start..]);
    parts
}

/// Drop backslashes, keeping whatever each one escaped
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// `from-to` with exactly one unescaped dash and both sides non-blank
/// becomes a range; anything else is handed to the scalar parser whole.
pub fn parse_range_pair<P: ScalarParser>(
    parser: &P,
    env: &ParseEnv<'_>,
    raw: &str,
) -> ParseResult<RangeValue<P::Output>> {
    let parts = split_unescaped(raw, '-');
    if let [from, to] = parts.as_slice() {
        let (from, to) = (from.trim(), to.trim());
        if !from.is_empty() && !to.is_empty() {
            let from = parser.parse_str(env, &unescape(from))?;
            let to = parser.parse_str(env, &unescape(to))?;
            return Ok(RangeValue::Range(OrderedRange::with_order(
                from,
                to,
                parser.leave_order(),
            )));
        }
    }
    Ok(RangeValue::Scalar(parser.parse_str(env, &unescape(raw.trim()))?))
}

/// Apply `item` to each trimmed comma-separated element, stopping at the
/// first failure.
pub fn parse_items<T>(
    raw: &str,
    mut item: impl FnMut(&str) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    split_unescaped(raw, ',')
        .into_iter()
        .map(|element| item(element.trim()))
        .collect()
}
