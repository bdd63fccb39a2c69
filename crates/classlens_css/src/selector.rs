//! Class-name extraction from selector lists.
//!
//! A class token is a `.` immediately followed by a CSS identifier. Tokens are
//! recognized anywhere in a selector: after combinators, in compound
//! selectors such as `input.focus.large`, and inside functional pseudo-classes
//! such as `:not(.disabled)`. Attribute selectors, strings, and comments are
//! skipped, so `[href$=".pdf"]` contributes nothing. An escaped character
//! outside a class name is skipped too: `#foo\.bar` has no class.

use crate::cursor::Cursor;
use classlens_common::ClassName;
use indexmap::IndexSet;

/// Splits a selector list at its top-level commas.
///
/// Commas inside `[...]`, `(...)`, strings, or comments do not split. Each
/// branch is trimmed; empty branches are dropped.
pub fn split_selector_list(text: &str) -> Vec<&str> {
    let mut cursor = Cursor::new(text);
    let mut branches = Vec::new();
    let mut start = 0;
    let mut nesting = 0usize;

    while !cursor.is_eof() {
        match cursor.peek() {
            b'"' | b'\'' => {
                cursor.skip_string();
            }
            b'/' if cursor.at_comment() => {
                cursor.skip_comment();
            }
            b'\\' => cursor.skip_escape(),
            b'[' | b'(' => {
                nesting += 1;
                cursor.bump();
            }
            b']' | b')' => {
                nesting = nesting.saturating_sub(1);
                cursor.bump();
            }
            b',' if nesting == 0 => {
                branches.push(&text[start..cursor.pos()]);
                cursor.bump();
                start = cursor.pos();
            }
            _ => cursor.bump(),
        }
    }
    branches.push(&text[start..]);

    branches
        .into_iter()
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .collect()
}

/// Returns the distinct class names referenced by a selector list, in order
/// of first mention.
pub fn extract_classes(selector_list: &str) -> Vec<ClassName> {
    let mut classes = IndexSet::new();
    for branch in split_selector_list(selector_list) {
        collect_classes(branch, &mut classes);
    }
    classes.into_iter().collect()
}

fn collect_classes(selector: &str, classes: &mut IndexSet<ClassName>) {
    let mut cursor = Cursor::new(selector);
    while !cursor.is_eof() {
        match cursor.peek() {
            b'"' | b'\'' => {
                cursor.skip_string();
            }
            b'/' if cursor.at_comment() => {
                cursor.skip_comment();
            }
            b'\\' => cursor.skip_escape(),
            b'[' => skip_attribute(&mut cursor),
            b'.' if starts_identifier(selector.as_bytes(), cursor.pos() + 1) => {
                let (name, end) = consume_identifier(selector, cursor.pos() + 1);
                classes.insert(ClassName::new(name));
                cursor.set_pos(end);
            }
            _ => cursor.bump(),
        }
    }
}

/// Skips an attribute selector from its `[` through the matching `]`.
fn skip_attribute(cursor: &mut Cursor<'_>) {
    cursor.bump();
    while !cursor.is_eof() {
        match cursor.peek() {
            b'"' | b'\'' => {
                cursor.skip_string();
            }
            b'\\' => cursor.skip_escape(),
            b']' => {
                cursor.bump();
                return;
            }
            _ => cursor.bump(),
        }
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-'
}

fn is_valid_escape(bytes: &[u8], at: usize) -> bool {
    bytes.get(at) == Some(&b'\\')
        && !matches!(bytes.get(at + 1), None | Some(b'\n' | b'\r' | b'\x0c'))
}

/// Returns `true` if an identifier starts at `at`.
///
/// Identifiers may not start with a digit, or with `-` followed by a digit.
fn starts_identifier(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at) {
        Some(b'-') => match bytes.get(at + 1) {
            Some(&b) if is_name_start(b) || b == b'-' => true,
            _ => is_valid_escape(bytes, at + 1),
        },
        Some(b'\\') => is_valid_escape(bytes, at),
        Some(&b) => is_name_start(b),
        None => false,
    }
}

/// Consumes an identifier starting at `at`, decoding escapes.
///
/// Returns the decoded name and the offset just past it.
fn consume_identifier(text: &str, at: usize) -> (String, usize) {
    let bytes = text.as_bytes();
    let mut name = String::new();
    let mut pos = at;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b >= 0x80 {
            // Copy the whole UTF-8 sequence.
            let Some(ch) = text[pos..].chars().next() else {
                break;
            };
            name.push(ch);
            pos += ch.len_utf8();
        } else if is_name_char(b) {
            name.push(b as char);
            pos += 1;
        } else if is_valid_escape(bytes, pos) {
            let (ch, next) = decode_escape(text, pos);
            name.push(ch);
            pos = next;
        } else {
            break;
        }
    }
    (name, pos)
}

/// Decodes the escape whose backslash is at `at`.
///
/// Hex escapes take up to six digits and swallow one following whitespace
/// character. Code points that are zero, surrogates, or out of range decode
/// to U+FFFD.
fn decode_escape(text: &str, at: usize) -> (char, usize) {
    let bytes = text.as_bytes();
    let mut pos = at + 1;

    if bytes[pos].is_ascii_hexdigit() {
        let digits_start = pos;
        while pos < bytes.len() && pos - digits_start < 6 && bytes[pos].is_ascii_hexdigit() {
            pos += 1;
        }
        let value = u32::from_str_radix(&text[digits_start..pos], 16).unwrap_or(0);
        match bytes.get(pos) {
            Some(b'\r') if bytes.get(pos + 1) == Some(&b'\n') => pos += 2,
            Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0c') => pos += 1,
            _ => {}
        }
        let ch = match value {
            0 => char::REPLACEMENT_CHARACTER,
            v => char::from_u32(v).unwrap_or(char::REPLACEMENT_CHARACTER),
        };
        return (ch, pos);
    }

    match text[pos..].chars().next() {
        Some(ch) => (ch, pos + ch.len_utf8()),
        None => (char::REPLACEMENT_CHARACTER, pos),
    }
}
