//! Value serialization policy for dumped files.
//!
//! A value that is a valid JSON document is re-indented with one tab per
//! nesting level and followed by a newline. The re-indent only moves
//! whitespace: tokens are copied byte for byte, so key order, number
//! spelling and string escapes survive. Whitespace trailing the document is
//! kept as well. Anything that is not JSON passes through untouched.

use serde::de::IgnoredAny;
use std::borrow::Cow;

const INDENT: u8 = b'\t';

/// Render `value` the way it is written to disk.
pub fn render_value(value: &[u8]) -> Cow<'_, [u8]> {
    if serde_json::from_slice::<IgnoredAny>(value).is_err() {
        return Cow::Borrowed(value);
    }

    let trailing = value
        .iter()
        .rev()
        .take_while(|c| is_json_space(**c))
        .count();
    let (document, tail) = value.split_at(value.len() - trailing);

    let mut out = indent(document);
    out.extend_from_slice(tail);
    out.push(b'\n');
    Cow::Owned(out)
}

fn is_json_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

fn newline(out: &mut Vec<u8>, depth: usize) {
    out.push(b'\n');
    out.extend(std::iter::repeat(INDENT).take(depth));
}

/// Re-indent an already validated JSON document.
fn indent(document: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(document.len() + document.len() / 4);
    let mut depth = 0usize;
    let mut need_indent = false;
    let mut in_string = false;
    let mut escaped = false;

    for &c in document {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
            }
            continue;
        }

        if is_json_space(c) {
            continue;
        }

        // Opening bracket followed by content: indent one level deeper.
        if need_indent && c != b'}' && c != b']' {
            need_indent = false;
            depth += 1;
            newline(&mut out, depth);
        }

        match c {
            b'"' => {
                in_string = true;
                out.push(c);
            }
            b'{' | b'[' => {
                need_indent = true;
                out.push(c);
            }
            b',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            b':' => {
                out.push(c);
                out.push(b' ');
            }
            b'}' | b']' => {
                if need_indent {
                    // empty object or array stays compact
                    need_indent = false;
                } else {
                    depth = depth.saturating_sub(1);
                    newline(&mut out, depth);
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}
