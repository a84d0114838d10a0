//! Shared text helpers.

use std::borrow::Cow;

/// Tab stop width used for verbatim blocks.
pub const TAB_WIDTH: usize = 8;

/// Expand tabs to spaces at multiples of `width` columns.
///
/// # Examples
///
/// ```
/// use rv_builder::detab;
///
/// assert_eq!(detab("a\tb", 4), "a   b");
/// assert_eq!(detab("no tabs", 4), "no tabs");
/// ```
#[must_use]
pub fn detab(line: &str, width: usize) -> Cow<'_, str> {
    if !line.contains('\t') || width == 0 {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len() + width);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = width - column % width;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    Cow::Owned(out)
}

/// Group lines into paragraphs separated by blank lines.
pub(crate) fn split_paragraphs<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}
