//! Recursive directive resolution.

use super::parser::{Directive, Segment, parse, unescape_arg};
use super::{InlineTag, MAX_INLINE_DEPTH};
use crate::error::InlineError;

/// Receiver of resolved inline content.
///
/// Implemented by the builder; tests use a recording stub.
pub(crate) trait InlineHandler {
    /// Append escaped literal text.
    fn text(&mut self, text: &str, out: &mut String);

    /// Append the rendering of one directive.
    ///
    /// For nesting tags `arg` is already resolved output; otherwise it is the
    /// raw argument with `\}` unescaped.
    fn directive(&mut self, tag: InlineTag, arg: &str, out: &mut String) -> Result<(), InlineError>;

    /// Record a warning.
    fn warn(&mut self, message: String);
}

/// Resolve every directive in `input`.
pub(crate) fn resolve<H: InlineHandler + ?Sized>(handler: &mut H, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    resolve_into(handler, input, false, 0, &mut out);
    out
}

/// Resolve one directive given as tag name and raw argument.
pub(crate) fn resolve_single<H: InlineHandler + ?Sized>(handler: &mut H, tag: &str, arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    resolve_directive(handler, Directive { tag, arg }, 0, &mut out);
    out
}

fn resolve_into<H: InlineHandler + ?Sized>(
    handler: &mut H,
    input: &str,
    in_arg: bool,
    depth: usize,
    out: &mut String,
) {
    for segment in parse(input, in_arg) {
        match segment {
            Segment::Text(text) => handler.text(&text, out),
            Segment::Directive(directive) => resolve_directive(handler, directive, depth, out),
        }
    }
}

fn resolve_directive<H: InlineHandler + ?Sized>(
    handler: &mut H,
    directive: Directive<'_>,
    depth: usize,
    out: &mut String,
) {
    let tag = match directive.tag.parse::<InlineTag>() {
        Ok(tag) => tag,
        Err(_) => {
            let err = InlineError::UnknownTag {
                tag: directive.tag.to_owned(),
                arg: unescape_arg(directive.arg).into_owned(),
            };
            recover(handler, &err, out);
            return;
        }
    };

    let result = if tag.nests() {
        if depth >= MAX_INLINE_DEPTH {
            handler.warn(format!(
                "inline nesting deeper than {MAX_INLINE_DEPTH} levels at @<{}>",
                directive.tag
            ));
            handler.text(&unescape_arg(directive.arg), out);
            return;
        }
        let mut inner = String::with_capacity(directive.arg.len());
        resolve_into(handler, directive.arg, true, depth + 1, &mut inner);
        handler.directive(tag, &inner, out)
    } else {
        handler.directive(tag, &unescape_arg(directive.arg), out)
    };

    if let Err(err) = result {
        recover(handler, &err, out);
    }
}

/// Replace a failed directive with its placeholder.
fn recover<H: InlineHandler + ?Sized>(handler: &mut H, err: &InlineError, out: &mut String) {
    handler.warn(err.to_string());
    handler.text(&err.placeholder(), out);
}
