//! Lexical nesting pre-scan.
//!
//! Pest and the Pratt parser both recurse once per bracket level, per prefix
//! operator and per right-associative operator. This scan runs before either
//! of them and over-approximates that recursion, so pathological input is
//! rejected before it can grow the native stack.

use crate::parser::Span;

/// Returns the position at which the lexical nesting of `source` first
/// exceeds `max_depth`, or `None` if it never does.
///
/// Depth is the number of open brackets plus, for every open bracket level,
/// the prefix operators (`+ - ~ not lambda`) and right-associative operators
/// (`** :=`) seen at that level. A comma closes the pending operators of its
/// level. A `+` or `-` that follows an operand is binary and is not counted.
pub(crate) fn find_excessive_nesting(source: &str, max_depth: usize) -> Option<Span> {
    let bytes = source.as_bytes();
    // Pending operators per open bracket level; index 0 is the top level.
    let mut levels: Vec<usize> = vec![0];
    let mut depth = 0usize;
    let mut after_operand = false;
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];
        i += 1;

        match c {
            b'(' | b'[' | b'{' => {
                levels.push(0);
                depth += 1;
                after_operand = false;
            }
            b')' | b']' | b'}' => {
                if levels.len() > 1 {
                    let pending = levels.pop().unwrap_or(0);
                    depth -= 1 + pending;
                }
                after_operand = true;
            }
            b',' => {
                if let Some(pending) = levels.last_mut() {
                    depth -= *pending;
                    *pending = 0;
                }
                after_operand = false;
            }
            b'+' | b'-' | b'~' => {
                if !after_operand {
                    bump(&mut levels, &mut depth);
                }
                after_operand = false;
            }
            b'*' if bytes.get(i) == Some(&b'*') => {
                i += 1;
                bump(&mut levels, &mut depth);
                after_operand = false;
            }
            b':' if bytes.get(i) == Some(&b'=') => {
                i += 1;
                bump(&mut levels, &mut depth);
                after_operand = false;
            }
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i, c);
                after_operand = true;
            }
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'0'..=b'9' | b'.' => {
                i = skip_number(bytes, i);
                after_operand = true;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                match &source[start..i] {
                    "not" | "lambda" => {
                        bump(&mut levels, &mut depth);
                        after_operand = false;
                    }
                    "and" | "or" => after_operand = false,
                    _ => after_operand = true,
                }
            }
            c if c.is_ascii_whitespace() => {}
            _ => after_operand = false,
        }

        if depth > max_depth {
            return Some(Span::new(start, i));
        }
    }

    None
}

fn bump(levels: &mut [usize], depth: &mut usize) {
    if let Some(pending) = levels.last_mut() {
        *pending += 1;
        *depth += 1;
    }
}

/// Skip to just past the closing quote (or the end of input).
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip the rest of a number literal, including a signed exponent.
fn skip_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' | b'_' | b'.' => i += 1,
            b'e' | b'E' => {
                i += 1;
                if matches!(bytes.get(i), Some(b'+' | b'-')) {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    i
}
