//! Directive scanner.
//!
//! Splits a run into literal text and `@<tag>{arg}` directives. Arguments are
//! balanced: a nested opener raises the depth and the matching `}` lowers it.
//! Inside arguments a backslash hides the next character from the scanner, so
//! `\}` never closes a directive.

use std::borrow::Cow;

/// One piece of a scanned run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(Cow<'a, str>),
    Directive(Directive<'a>),
}

/// A directive with its raw, still-escaped argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Directive<'a> {
    pub tag: &'a str,
    pub arg: &'a str,
}

/// Scan `input` into segments.
///
/// With `in_arg` set the input is the body of an enclosing directive:
/// backslashes escape the following character and `\}` in text segments is
/// unescaped. At the top level backslashes are ordinary text.
pub(crate) fn parse(input: &str, in_arg: bool) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if in_arg && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if let Some((tag_end, arg_start)) = opener_at(bytes, i)
            && let Some(close) = find_close(bytes, arg_start)
        {
            push_text(&mut segments, &input[text_start..i], in_arg);
            segments.push(Segment::Directive(Directive {
                tag: &input[i + 2..tag_end],
                arg: &input[arg_start..close],
            }));
            i = close + 1;
            text_start = i;
            continue;
        }
        i += 1;
    }

    push_text(&mut segments, &input[text_start..], in_arg);
    segments
}

/// Replace `\}` with `}`; every other backslash pair is kept.
pub(crate) fn unescape_arg(arg: &str) -> Cow<'_, str> {
    if arg.contains("\\}") {
        Cow::Owned(arg.replace("\\}", "}"))
    } else {
        Cow::Borrowed(arg)
    }
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str, in_arg: bool) {
    if text.is_empty() {
        return;
    }
    let text = if in_arg {
        unescape_arg(text)
    } else {
        Cow::Borrowed(text)
    };
    segments.push(Segment::Text(text));
}

/// Match `@<tag>{` at `i`; returns the end of the tag and the argument start.
fn opener_at(bytes: &[u8], i: usize) -> Option<(usize, usize)> {
    if bytes.get(i) != Some(&b'@') || bytes.get(i + 1) != Some(&b'<') {
        return None;
    }
    let tag_start = i + 2;
    let tag_end = tag_start
        + bytes[tag_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
    if tag_end == tag_start
        || bytes.get(tag_end) != Some(&b'>')
        || bytes.get(tag_end + 1) != Some(&b'{')
    {
        return None;
    }
    Some((tag_end, tag_end + 2))
}

/// Position of the `}` closing an argument that starts at `start`.
fn find_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = start;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => {
                j += 2;
                continue;
            }
            b'}' if depth == 0 => return Some(j),
            b'}' => depth -= 1,
            b'@' => {
                if let Some((_, arg_start)) = opener_at(bytes, j) {
                    depth += 1;
                    j = arg_start;
                    continue;
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}
