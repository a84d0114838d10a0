//! Render backend trait for pluggable output formats.
//!
//! [`Builder`](crate::Builder) owns numbering, index lookups, inline
//! resolution and diagnostics, then hands finished pieces to a backend. Every
//! method writes into `out`.
//!
//! Text arguments follow one rule: captions, paragraph text, list items and
//! table cells arrive already escaped and inline-resolved. Code lines, image
//! paths and ids arrive raw and the backend escapes them itself.

use std::borrow::Cow;

use rv_book::EntryNumber;
use rv_config::Config;

/// Inline decorations that wrap their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Emphasis,
    Strong,
    Underline,
    Teletype,
    TeletypeItalic,
    TeletypeBold,
    Code,
    Superscript,
    Subscript,
    /// Emphasis dots beside the text.
    Bou,
    /// Screened background.
    Ami,
}

/// Flavor of a verbatim code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// Numbered list (`list`).
    List,
    /// Numbered list with line numbers (`listnum`).
    ListNum,
    /// Unnumbered list (`emlist`).
    EmList,
    /// Source file excerpt (`source`).
    Source,
}

/// Boxed side content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Column,
    Memo,
}

/// Caption of a numbered or unnumbered block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// Display label such as `リスト1.2` or `図`.
    pub label: Option<String>,
    /// Resolved caption text.
    pub text: String,
}

impl Caption {
    #[must_use]
    pub fn new(label: Option<String>, text: String) -> Self {
        Self { label, text }
    }
}

/// One table cell with resolved content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub header: bool,
    pub content: String,
}

/// Backend for rendering block and inline constructs.
///
/// Implementations are zero-sized types; all methods are associated
/// functions so the builder never needs a backend value.
pub trait RenderBackend {
    /// Short backend name used in logs.
    const NAME: &'static str;

    /// Separator placed between the source lines of one paragraph.
    const PARAGRAPH_JOIN: &'static str;

    /// Escape literal text.
    fn escape(text: &str) -> Cow<'_, str>;

    /// Wrap a rendered body into a complete document.
    fn document(title: &str, body: &str, config: &Config, out: &mut String);

    /// Heading. `number` is the chapter number followed by section counters
    /// when the heading is numbered; `anchor` is unique within the chapter.
    fn headline(
        level: u8,
        label: Option<&str>,
        anchor: &str,
        number: Option<&[u32]>,
        caption: &str,
        out: &mut String,
    );

    fn label(id: &str, out: &mut String);

    fn hr(out: &mut String);

    fn paragraph(text: &str, noindent: bool, out: &mut String);

    fn quote(paragraphs: &[String], out: &mut String);

    fn flushright(paragraphs: &[String], out: &mut String);

    fn boxed(kind: BoxKind, caption: Option<&str>, paragraphs: &[String], out: &mut String);

    fn unordered_list(items: &[String], out: &mut String);

    fn ordered_list(items: &[String], out: &mut String);

    /// Definition list of `(term, description)` pairs.
    fn definition_list(items: &[(String, String)], out: &mut String);

    /// Verbatim block; `lines` are detabbed but not escaped.
    fn code_block(kind: CodeKind, caption: Option<&Caption>, lines: &[String], out: &mut String);

    /// Image bound to `path`. Without a caption the image is rendered bare.
    fn image(path: &str, caption: Option<&Caption>, metric: Option<&str>, out: &mut String);

    /// Fallback for an image without a file: the raw block lines.
    fn image_dummy(id: &str, caption: Option<&Caption>, lines: &[String], out: &mut String);

    /// Table; `rows` may be empty, in which case only the caption is emitted.
    fn table(caption: Option<&Caption>, rows: &[Vec<TableCell>], out: &mut String);

    /// Footnote body.
    fn footnote(id: &str, number: &EntryNumber, content: &str, out: &mut String);

    fn bibpaper_header(id: &str, number: Option<&EntryNumber>, caption: &str, out: &mut String);

    fn bibpaper_body(id: &str, paragraphs: &[String], out: &mut String);

    /// Wrap already resolved `content`.
    fn styled(style: Style, content: &str, out: &mut String);

    fn line_break(out: &mut String);

    /// Character reference. Also written for characters the output
    /// encoding cannot represent.
    fn uchar(ch: char, out: &mut String);

    /// Ruby annotation; both parts escaped.
    fn ruby(base: &str, ruby: &str, out: &mut String);

    /// Keyword with an optional alternative reading; both parts escaped.
    fn keyword(word: &str, alt: Option<&str>, out: &mut String);

    /// Hyperlink; url and label escaped.
    fn href(url: &str, label: &str, out: &mut String);

    /// Reference to a footnote; `content` is resolved footnote text.
    fn footnote_ref(id: &str, number: &EntryNumber, content: &str, out: &mut String);

    fn bib_ref(id: &str, number: &EntryNumber, out: &mut String);

    /// Small inline image.
    fn icon(path: &str, id: &str, out: &mut String);
}
