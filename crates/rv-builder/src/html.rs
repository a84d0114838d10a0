//! HTML backend.
//!
//! Produces XHTML-style markup: self-closing `<a id="..." />` anchors,
//! `<div>` wrappers with class names for code, images and tables, and
//! full-width spaces between section numbers and captions.

use std::borrow::Cow;
use std::fmt::Write;

use rv_book::EntryNumber;
use rv_config::Config;

use crate::backend::{BoxKind, Caption, CodeKind, RenderBackend, Style, TableCell};
use crate::encoding;

/// Escape `&`, `<`, `>` and `"`.
///
/// # Examples
///
/// ```
/// use rv_builder::escape_html;
///
/// assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Reverse [`escape_html`].
///
/// Only the four entities it produces are recognized; anything else is left
/// as is.
#[must_use]
pub fn unescape_html(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let entity = [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"')]
            .into_iter()
            .find(|(name, _)| rest.starts_with(*name));
        match entity {
            Some((name, ch)) => {
                out.push(ch);
                rest = &rest[name.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// HTML render backend.
pub struct HtmlBackend;

impl HtmlBackend {
    fn caption_text(caption: &Caption) -> Cow<'_, str> {
        match &caption.label {
            Some(label) => Cow::Owned(format!("{label}: {}", caption.text)),
            None => Cow::Borrowed(&caption.text),
        }
    }

    fn paragraphs(paragraphs: &[String], class: Option<&str>, out: &mut String) {
        for paragraph in paragraphs {
            match class {
                Some(class) => {
                    let _ = writeln!(out, r#"<p class="{class}">{paragraph}</p>"#);
                }
                None => {
                    let _ = writeln!(out, "<p>{paragraph}</p>");
                }
            }
        }
    }

    fn items(tag: &str, items: &[String], out: &mut String) {
        let _ = writeln!(out, "<{tag}>");
        for item in items {
            let _ = writeln!(out, "<li>{item}</li>");
        }
        let _ = writeln!(out, "</{tag}>");
    }

    /// Image source relative to the output directory.
    fn image_src(path: &str) -> &str {
        path.strip_prefix("./").unwrap_or(path)
    }
}

impl RenderBackend for HtmlBackend {
    const NAME: &'static str = "html";
    const PARAGRAPH_JOIN: &'static str = "";

    fn escape(text: &str) -> Cow<'_, str> {
        escape_html(text)
    }

    fn document(title: &str, body: &str, config: &Config, out: &mut String) {
        let charset = encoding::charset(config.outencoding);
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="{charset}"?>"#);
        out.push_str("<!DOCTYPE html>\n");
        out.push_str(r#"<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="ja">"#);
        out.push_str("\n<head>\n");
        let _ = writeln!(out, r#"  <meta charset="{charset}" />"#);
        if let Some(stylesheet) = &config.stylesheet {
            let _ = writeln!(
                out,
                r#"  <link rel="stylesheet" type="text/css" href="{}" />"#,
                escape_html(stylesheet)
            );
        }
        let _ = writeln!(out, "  <title>{title}</title>");
        out.push_str("</head>\n<body>\n");
        out.push_str(body);
        out.push_str("</body>\n</html>\n");
    }

    fn headline(
        level: u8,
        label: Option<&str>,
        anchor: &str,
        number: Option<&[u32]>,
        caption: &str,
        out: &mut String,
    ) {
        if level > 1 {
            out.push('\n');
        }
        let _ = write!(out, "<h{level}");
        if let Some(label) = label {
            let _ = write!(out, r#" id="{}""#, escape_html(label));
        }
        let _ = write!(out, r#"><a id="{anchor}" />"#);
        match number {
            Some([chapter]) => {
                let _ = write!(out, "第{chapter}章　");
            }
            Some(parts) => {
                let dotted: Vec<String> = parts.iter().map(u32::to_string).collect();
                let _ = write!(out, "{}　", dotted.join("."));
            }
            None => {}
        }
        let _ = writeln!(out, "{caption}</h{level}>");
    }

    fn label(id: &str, out: &mut String) {
        let _ = writeln!(out, r#"<a id="{}" />"#, escape_html(id));
    }

    fn hr(out: &mut String) {
        out.push_str("<hr />\n");
    }

    fn paragraph(text: &str, noindent: bool, out: &mut String) {
        if noindent {
            let _ = writeln!(out, r#"<p class="noindent">{text}</p>"#);
        } else {
            let _ = writeln!(out, "<p>{text}</p>");
        }
    }

    fn quote(paragraphs: &[String], out: &mut String) {
        let body: Vec<String> = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        let _ = writeln!(out, "<blockquote>{}</blockquote>", body.join("\n"));
    }

    fn flushright(paragraphs: &[String], out: &mut String) {
        Self::paragraphs(paragraphs, Some("flushright"), out);
    }

    fn boxed(kind: BoxKind, caption: Option<&str>, paragraphs: &[String], out: &mut String) {
        let class = match kind {
            BoxKind::Column => "column",
            BoxKind::Memo => "memo",
        };
        let _ = writeln!(out, r#"<div class="{class}">"#);
        if let Some(caption) = caption {
            let _ = writeln!(out, r#"<p class="caption">{caption}</p>"#);
        }
        Self::paragraphs(paragraphs, None, out);
        out.push_str("</div>\n");
    }

    fn unordered_list(items: &[String], out: &mut String) {
        Self::items("ul", items, out);
    }

    fn ordered_list(items: &[String], out: &mut String) {
        Self::items("ol", items, out);
    }

    fn definition_list(items: &[(String, String)], out: &mut String) {
        out.push_str("<dl>\n");
        for (term, desc) in items {
            let _ = writeln!(out, "<dt>{term}</dt>");
            let _ = writeln!(out, "<dd>{desc}</dd>");
        }
        out.push_str("</dl>\n");
    }

    fn code_block(kind: CodeKind, caption: Option<&Caption>, lines: &[String], out: &mut String) {
        let (div, pre) = match kind {
            CodeKind::List | CodeKind::ListNum => ("caption-code", "list"),
            CodeKind::EmList => ("emlist-code", "emlist"),
            CodeKind::Source => ("source-code", "source"),
        };
        let _ = writeln!(out, r#"<div class="{div}">"#);
        if let Some(caption) = caption {
            let _ = writeln!(out, r#"<p class="caption">{}</p>"#, Self::caption_text(caption));
        }
        let _ = write!(out, r#"<pre class="{pre}">"#);
        for line in lines {
            let _ = writeln!(out, "{}", escape_html(line));
        }
        out.push_str("</pre>\n</div>\n");
    }

    fn image(path: &str, caption: Option<&Caption>, _metric: Option<&str>, out: &mut String) {
        out.push_str("<div class=\"image\">\n");
        let alt = caption.map_or("", |caption| caption.text.as_str());
        let _ = writeln!(
            out,
            r#"<img src="{}" alt="{alt}" />"#,
            escape_html(Self::image_src(path))
        );
        if let Some(caption) = caption {
            let _ = writeln!(
                out,
                "<p class=\"caption\">\n{}\n</p>",
                Self::caption_text(caption)
            );
        }
        out.push_str("</div>\n");
    }

    fn image_dummy(_id: &str, caption: Option<&Caption>, lines: &[String], out: &mut String) {
        out.push_str("<div class=\"image\">\n<pre class=\"dummyimage\">\n");
        for line in lines {
            let _ = writeln!(out, "{}", escape_html(line));
        }
        out.push_str("</pre>\n");
        if let Some(caption) = caption {
            let _ = writeln!(
                out,
                "<p class=\"caption\">\n{}\n</p>",
                Self::caption_text(caption)
            );
        }
        out.push_str("</div>\n");
    }

    fn table(caption: Option<&Caption>, rows: &[Vec<TableCell>], out: &mut String) {
        out.push_str("<div class=\"table\">\n");
        if let Some(caption) = caption {
            let _ = writeln!(out, r#"<p class="caption">{}</p>"#, Self::caption_text(caption));
        }
        if !rows.is_empty() {
            out.push_str("<table>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    let tag = if cell.header { "th" } else { "td" };
                    let _ = write!(out, "<{tag}>{}</{tag}>", cell.content);
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</table>\n");
        }
        out.push_str("</div>\n");
    }

    fn footnote(id: &str, number: &EntryNumber, content: &str, out: &mut String) {
        let _ = writeln!(
            out,
            r#"<div class="footnote"><p class="footnote">[<a id="fn-{}">*{number}</a>] {content}</p></div>"#,
            escape_html(id)
        );
    }

    fn bibpaper_header(id: &str, number: Option<&EntryNumber>, caption: &str, out: &mut String) {
        let _ = write!(out, r#"<p class="bibpaper-header" id="bib-{}">"#, escape_html(id));
        if let Some(number) = number {
            let _ = write!(out, "[{number}] ");
        }
        let _ = writeln!(out, "{caption}</p>");
    }

    fn bibpaper_body(_id: &str, paragraphs: &[String], out: &mut String) {
        out.push_str("<div class=\"bibpaper\">\n");
        Self::paragraphs(paragraphs, None, out);
        out.push_str("</div>\n");
    }

    fn styled(style: Style, content: &str, out: &mut String) {
        let (open, close) = match style {
            Style::Bold => ("<b>", "</b>"),
            Style::Italic => ("<i>", "</i>"),
            Style::Emphasis => ("<em>", "</em>"),
            Style::Strong => ("<strong>", "</strong>"),
            Style::Underline => ("<u>", "</u>"),
            Style::Teletype => ("<tt>", "</tt>"),
            Style::TeletypeItalic => ("<tt><i>", "</i></tt>"),
            Style::TeletypeBold => ("<tt><b>", "</b></tt>"),
            Style::Code => (r#"<code class="inline-code tt">"#, "</code>"),
            Style::Superscript => ("<sup>", "</sup>"),
            Style::Subscript => ("<sub>", "</sub>"),
            Style::Bou => (r#"<span class="bou">"#, "</span>"),
            Style::Ami => (r#"<span class="ami">"#, "</span>"),
        };
        out.push_str(open);
        out.push_str(content);
        out.push_str(close);
    }

    fn line_break(out: &mut String) {
        out.push_str("<br />");
    }

    fn uchar(ch: char, out: &mut String) {
        let _ = write!(out, "&#x{:x};", u32::from(ch));
    }

    fn ruby(base: &str, ruby: &str, out: &mut String) {
        let _ = write!(
            out,
            "<ruby><rb>{base}</rb><rp>（</rp><rt>{ruby}</rt><rp>）</rp></ruby>"
        );
    }

    fn keyword(word: &str, alt: Option<&str>, out: &mut String) {
        match alt {
            Some(alt) => {
                let _ = write!(out, r#"<b class="kw">{word}（{alt}）</b>"#);
            }
            None => {
                let _ = write!(out, r#"<b class="kw">{word}</b>"#);
            }
        }
    }

    fn href(url: &str, label: &str, out: &mut String) {
        let _ = write!(out, r#"<a href="{url}" class="link">{label}</a>"#);
    }

    fn footnote_ref(id: &str, number: &EntryNumber, _content: &str, out: &mut String) {
        let _ = write!(
            out,
            r##"<a href="#fn-{}" class="noteref">*{number}</a>"##,
            escape_html(id)
        );
    }

    fn bib_ref(id: &str, number: &EntryNumber, out: &mut String) {
        let _ = write!(
            out,
            r##"<a href="#bib-{}">[{number}]</a>"##,
            escape_html(id)
        );
    }

    fn icon(path: &str, id: &str, out: &mut String) {
        let _ = write!(
            out,
            r#"<img src="{}" alt="[{}]" />"#,
            escape_html(Self::image_src(path)),
            escape_html(id)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rv_book::{Book, Chapter, ImageResolution, ImageResolver, Location, StaticImages};
    use rv_config::OutputEncoding;

    use crate::Builder;
    use crate::diagnostics::Severity;

    #[test]
    fn test_escape_round_trip() {
        for text in ["plain", "a < b && c > \"d\"", "&amp; already", "&unknown;"] {
            assert_eq!(unescape_html(&escape_html(text)), text);
        }
        assert_eq!(unescape_html("&lt;&nbsp;"), "<&nbsp;");
    }

    fn config(secnolevel: u8) -> Config {
        Config {
            secnolevel,
            ..Config::default()
        }
    }

    fn book_with(chapter: Chapter) -> Book {
        let mut book = Book::new();
        book.push_chapter(chapter).unwrap();
        book
    }

    fn chapter() -> Chapter {
        Chapter::new("chap1", Some(1), "-")
    }

    fn render(secnolevel: u8, f: impl FnOnce(&mut Builder<'_, HtmlBackend>)) -> String {
        let book = book_with(chapter());
        let config = config(secnolevel);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        f(&mut builder);
        builder.raw_result().to_owned()
    }

    #[test]
    fn test_headline_level1() {
        let out = render(2, |b| b.heading(1, Some("test"), "this is test.").unwrap());
        assert_eq!(out, "<h1 id=\"test\"><a id=\"h1\" />第1章　this is test.</h1>\n");
    }

    #[test]
    fn test_headline_level1_without_secno() {
        let out = render(0, |b| b.heading(1, Some("test"), "this is test.").unwrap());
        assert_eq!(out, "<h1 id=\"test\"><a id=\"h1\" />this is test.</h1>\n");
    }

    #[test]
    fn test_headline_level1_with_inlinetag() {
        let out = render(2, |b| {
            b.heading(1, Some("test"), "this @<b>{is} test.<&\">").unwrap();
        });
        assert_eq!(
            out,
            "<h1 id=\"test\"><a id=\"h1\" />第1章　this <b>is</b> test.&lt;&amp;&quot;&gt;</h1>\n"
        );
    }

    #[test]
    fn test_headline_level2() {
        let out = render(2, |b| b.heading(2, Some("test"), "this is test.").unwrap());
        assert_eq!(out, "\n<h2 id=\"test\"><a id=\"h1-1\" />1.1　this is test.</h2>\n");
    }

    #[test]
    fn test_headline_level3() {
        let out = render(2, |b| b.heading(3, Some("test"), "this is test.").unwrap());
        assert_eq!(out, "\n<h3 id=\"test\"><a id=\"h1-0-1\" />this is test.</h3>\n");
    }

    #[test]
    fn test_headline_level3_with_secno() {
        let out = render(3, |b| b.heading(3, Some("test"), "this is test.").unwrap());
        assert_eq!(out, "\n<h3 id=\"test\"><a id=\"h1-0-1\" />1.0.1　this is test.</h3>\n");
    }

    #[test]
    fn test_headline_without_label() {
        let out = render(2, |b| b.heading(2, None, "plain").unwrap());
        assert_eq!(out, "\n<h2><a id=\"h1-1\" />1.1　plain</h2>\n");
    }

    #[test]
    fn test_headline_unnumbered_chapter() {
        let book = book_with(Chapter::new("pre", None, "Preface"));
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        builder.heading(1, None, "Preface").unwrap();
        builder.heading(2, None, "Why").unwrap();
        assert_eq!(
            builder.raw_result(),
            "<h1><a id=\"h\" />Preface</h1>\n\n<h2><a id=\"h-1\" />Why</h2>\n"
        );
    }

    #[test]
    fn test_headline_invalid_level() {
        let book = book_with(chapter());
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config)
            .with_location(Location::new("chap1.re", 3));
        let err = builder.heading(7, None, "too deep").unwrap_err();
        assert_eq!(err.to_string(), "chap1.re:3: error: invalid heading level: 7");
        assert!(builder.raw_result().is_empty());
    }

    #[test]
    fn test_label() {
        let out = render(2, |b| b.label("label_test"));
        assert_eq!(out, "<a id=\"label_test\" />\n");
    }

    #[test]
    fn test_href() {
        let book = book_with(chapter());
        let config = config(2);
        let builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        assert_eq!(
            builder.compile_href("http://github.com", Some("GitHub")),
            "<a href=\"http://github.com\" class=\"link\">GitHub</a>"
        );
        assert_eq!(
            builder.compile_href("http://github.com", None),
            "<a href=\"http://github.com\" class=\"link\">http://github.com</a>"
        );
    }

    #[test]
    fn test_inline_href_escaped_comma() {
        let mut out = String::new();
        render(2, |b| out = b.compile_inline(r"@<href>{http://x.com\,y,label}"));
        assert_eq!(out, "<a href=\"http://x.com,y\" class=\"link\">label</a>");
    }

    #[test]
    fn test_inline_raw() {
        let mut out = String::new();
        render(2, |b| out = b.inline("raw", "@<tt>{inline}"));
        assert_eq!(out, "@&lt;tt&gt;{inline}");
    }

    #[test]
    fn test_inline_in_table() {
        let out = render(2, |b| {
            b.table(
                &["@<b>{1}\t@<i>{2}", "------------", "@<b>{3}\t@<i>{4}<>&"],
                None,
                None,
            );
        });
        assert_eq!(
            out,
            "<div class=\"table\">\n<table>\n<tr><th><b>1</b></th><th><i>2</i></th></tr>\n<tr><td><b>3</b></td><td><i>4</i>&lt;&gt;&amp;</td></tr>\n</table>\n</div>\n"
        );
    }

    #[test]
    fn test_table_without_separator() {
        let out = render(2, |b| b.table(&["a\tb\tc", "d"], None, None));
        assert_eq!(
            out,
            "<div class=\"table\">\n<table>\n<tr><th>a</th><td>b</td><td>c</td></tr>\n<tr><th>d</th><td></td><td></td></tr>\n</table>\n</div>\n"
        );
    }

    #[test]
    fn test_table_caption_and_missing_id() {
        let mut ch = chapter();
        ch.register_table("t1", Some("Table")).unwrap();
        let book = book_with(ch);
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);

        builder.table(&["x"], Some("t1"), Some("Sizes"));
        builder.table::<&str>(&[], Some("t9"), Some("Lost"));

        assert_eq!(
            builder.raw_result(),
            "<div class=\"table\">\n<p class=\"caption\">表1.1: Sizes</p>\n<table>\n<tr><th>x</th></tr>\n</table>\n</div>\n<div class=\"table\">\n</div>\n"
        );
        let diagnostics = builder.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].message, "no such table: t9");
    }

    #[test]
    fn test_table_caption_without_id() {
        let book = book_with(chapter());
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);

        builder.table(&["a"], None, Some("Cap"));

        assert_eq!(
            builder.raw_result(),
            "<div class=\"table\">\n<table>\n<tr><th>a</th></tr>\n</table>\n</div>\n"
        );
        let diagnostics = builder.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].message, "table caption without id");
    }

    #[test]
    fn test_inline_br() {
        let mut out = String::new();
        render(2, |b| out = b.inline("br", ""));
        assert_eq!(out, "<br />");
    }

    #[test]
    fn test_inline_i_and_escape() {
        let mut out = String::new();
        render(2, |b| out = b.compile_inline("test @<i>{inline<&;\\ test} test2"));
        assert_eq!(out, "test <i>inline&lt;&amp;;\\ test</i> test2");
    }

    #[test]
    fn test_inline_b_and_escape() {
        let mut out = String::new();
        render(2, |b| out = b.compile_inline("test @<b>{inline<&;\\ test} test2"));
        assert_eq!(out, "test <b>inline&lt;&amp;;\\ test</b> test2");
    }

    #[test]
    fn test_inline_tt_variants() {
        let mut outs = Vec::new();
        render(2, |b| {
            for tag in ["tt", "tti", "ttb"] {
                outs.push(b.compile_inline(&format!("test @<{tag}>{{inline test}} test2")));
            }
        });
        assert_eq!(
            outs,
            vec![
                "test <tt>inline test</tt> test2",
                "test <tt><i>inline test</i></tt> test2",
                "test <tt><b>inline test</b></tt> test2",
            ]
        );
    }

    #[test]
    fn test_inline_nested() {
        let mut out = String::new();
        render(2, |b| out = b.compile_inline("@<b>{bold @<i>{and italic}}"));
        assert_eq!(out, "<b>bold <i>and italic</i></b>");
    }

    #[test]
    fn test_inline_uchar() {
        let mut out = String::new();
        render(2, |b| out = b.compile_inline("test @<uchar>{2460} test2"));
        assert_eq!(out, "test &#x2460; test2");
    }

    #[test]
    fn test_inline_uchar_invalid() {
        let book = book_with(chapter());
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        assert_eq!(builder.compile_inline("@<uchar>{zz}"), "[InvalidUchar:zz]");
        assert_eq!(builder.diagnostics()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_inline_ruby_and_kw() {
        let mut outs = Vec::new();
        render(2, |b| {
            outs.push(b.compile_inline("@<ruby>{漢字,かんじ}"));
            outs.push(b.compile_inline("@<kw>{API, Application Programming Interface}"));
            outs.push(b.compile_inline("@<kw>{API}"));
        });
        assert_eq!(
            outs,
            vec![
                "<ruby><rb>漢字</rb><rp>（</rp><rt>かんじ</rt><rp>）</rp></ruby>",
                "<b class=\"kw\">API（Application Programming Interface）</b>",
                "<b class=\"kw\">API</b>",
            ]
        );
    }

    #[test]
    fn test_inline_bou() {
        let mut out = String::new();
        render(2, |b| out = b.compile_inline("@<bou>{傍点}"));
        assert_eq!(out, "<span class=\"bou\">傍点</span>");
    }

    #[test]
    fn test_quote() {
        let out = render(2, |b| b.quote(&["foo", "bar", "", "buz"]));
        assert_eq!(out, "<blockquote><p>foobar</p>\n<p>buz</p></blockquote>\n");
    }

    #[test]
    fn test_column() {
        let out = render(2, |b| {
            b.column(&["test1", "", "test@<i>{2}"], Some("this is @<b>{test}<&>_"));
        });
        assert_eq!(
            out,
            "<div class=\"column\">\n<p class=\"caption\">this is <b>test</b>&lt;&amp;&gt;_</p>\n<p>test1</p>\n<p>test<i>2</i></p>\n</div>\n"
        );
    }

    #[test]
    fn test_memo() {
        let out = render(2, |b| {
            b.memo(&["test1", "", "test@<i>{2}"], Some("this is @<b>{test}<&>_"));
        });
        assert_eq!(
            out,
            "<div class=\"memo\">\n<p class=\"caption\">this is <b>test</b>&lt;&amp;&gt;_</p>\n<p>test1</p>\n<p>test<i>2</i></p>\n</div>\n"
        );
    }

    #[test]
    fn test_noindent() {
        let out = render(2, |b| {
            b.noindent();
            b.paragraph(&["foo", "bar"]);
            b.paragraph(&["foo2", "bar2"]);
        });
        assert_eq!(out, "<p class=\"noindent\">foobar</p>\n<p>foo2bar2</p>\n");
    }

    #[test]
    fn test_flushright() {
        let out = render(2, |b| b.flushright(&["foo", "bar", "", "buz"]));
        assert_eq!(
            out,
            "<p class=\"flushright\">foobar</p>\n<p class=\"flushright\">buz</p>\n"
        );
    }

    #[test]
    fn test_raw() {
        let out = render(2, |b| b.raw("<&>\\n"));
        assert_eq!(out, "<&>\n");
    }

    #[test]
    fn test_itemized_lists() {
        let out = render(2, |b| {
            b.ul(&["one", "@<b>{two}"]);
            b.ol(&["first"]);
            b.dl(&[("term", "desc <x>")]);
        });
        assert_eq!(
            out,
            "<ul>\n<li>one</li>\n<li><b>two</b></li>\n</ul>\n<ol>\n<li>first</li>\n</ol>\n<dl>\n<dt>term</dt>\n<dd>desc &lt;x&gt;</dd>\n</dl>\n"
        );
    }

    #[test]
    fn test_list_with_caption() {
        let mut ch = chapter();
        ch.register_list("sample", Some("Sample")).unwrap();
        let book = book_with(ch);
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        builder.list(&["if a < b {", "\treturn @<b>{x};", "}"], "sample", "Sample @<i>{code}");
        assert_eq!(
            builder.raw_result(),
            "<div class=\"caption-code\">\n<p class=\"caption\">リスト1.1: Sample <i>code</i></p>\n<pre class=\"list\">if a &lt; b {\n        return @&lt;b&gt;{x};\n}\n</pre>\n</div>\n"
        );
        assert!(builder.diagnostics().is_empty());
    }

    #[test]
    fn test_list_missing_id_renders_body() {
        let book = book_with(chapter());
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config)
            .with_location(Location::new("chap1.re", 10));
        builder.list(&["x"], "nope", "Caption");

        assert_eq!(
            builder.raw_result(),
            "<div class=\"caption-code\">\n<pre class=\"list\">x\n</pre>\n</div>\n"
        );
        assert_eq!(
            builder.diagnostics()[0].to_string(),
            "chap1.re:10: error: no such list: nope"
        );
    }

    #[test]
    fn test_listnum() {
        let mut ch = chapter();
        ch.register_list("l", None).unwrap();
        let book = book_with(ch);
        let config = config(0);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        builder.listnum(&["a", "b"], "l", "Cap");
        assert_eq!(
            builder.raw_result(),
            "<div class=\"caption-code\">\n<p class=\"caption\">リスト1: Cap</p>\n<pre class=\"list\"> 1: a\n 2: b\n</pre>\n</div>\n"
        );
    }

    #[test]
    fn test_emlist_and_source() {
        let out = render(2, |b| {
            b.emlist(&["<x>"], None);
            b.source(&["fn main() {}"], Some("main.rs"));
        });
        assert_eq!(
            out,
            "<div class=\"emlist-code\">\n<pre class=\"emlist\">&lt;x&gt;\n</pre>\n</div>\n<div class=\"source-code\">\n<p class=\"caption\">main.rs</p>\n<pre class=\"source\">fn main() {}\n</pre>\n</div>\n"
        );
    }

    fn image_book() -> Book {
        let mut ch = chapter();
        ch.register_image("sampleimg", Some("sample photo")).unwrap();
        book_with(ch)
    }

    fn sample_images() -> StaticImages {
        StaticImages::new().with_image("chap1", "sampleimg", "./images/chap1-sampleimg.png")
    }

    #[test]
    fn test_image() {
        let book = image_book();
        let config = config(2);
        let images = sample_images();
        let mut builder =
            Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config).with_images(&images);
        builder.image::<&str>(&[], "sampleimg", "sample photo", None);
        assert_eq!(
            builder.raw_result(),
            "<div class=\"image\">\n<img src=\"images/chap1-sampleimg.png\" alt=\"sample photo\" />\n<p class=\"caption\">\n図1.1: sample photo\n</p>\n</div>\n"
        );
    }

    #[test]
    fn test_image_with_metric() {
        let book = image_book();
        let config = config(2);
        let images = sample_images();
        let mut builder =
            Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config).with_images(&images);
        builder.image::<&str>(&[], "sampleimg", "sample photo", Some("scale=1.2"));
        assert_eq!(
            builder.raw_result(),
            "<div class=\"image\">\n<img src=\"images/chap1-sampleimg.png\" alt=\"sample photo\" />\n<p class=\"caption\">\n図1.1: sample photo\n</p>\n</div>\n"
        );
    }

    #[test]
    fn test_missing_image_not_strict() {
        let book = image_book();
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        builder.image(&["ascii <art>"], "missingid", "cap", None);
        assert_eq!(
            builder.raw_result(),
            "<div class=\"image\">\n<pre class=\"dummyimage\">\nascii &lt;art&gt;\n</pre>\n<p class=\"caption\">\n図: cap\n</p>\n</div>\n"
        );
        assert!(builder.diagnostics().is_empty());
    }

    #[test]
    fn test_unbound_image_strict_warns() {
        let book = image_book();
        let config = config(2);
        let mut builder =
            Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config).with_strict(true);
        builder.image(&["line"], "sampleimg", "sample photo", None);

        assert!(builder.raw_result().contains("<pre class=\"dummyimage\">\nline\n</pre>"));
        assert!(builder.raw_result().contains("図1.1: sample photo"));
        assert_eq!(builder.diagnostics()[0].message, "image not bound: sampleimg");
        assert_eq!(builder.diagnostics()[0].severity, Severity::Warning);
    }

    /// Offers candidate paths without binding any of them.
    struct CandidatesOnly;

    impl ImageResolver for CandidatesOnly {
        fn resolve(&self, chapter: &Chapter, id: &str) -> ImageResolution {
            ImageResolution {
                bound: false,
                paths: vec![format!("./images/{}-{id}.png", chapter.id())],
            }
        }
    }

    #[test]
    fn test_unbound_candidates_render_dummy() {
        let book = image_book();
        let config = config(2);
        let images = CandidatesOnly;
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config)
            .with_images(&images)
            .with_strict(true);
        builder.image(&["ascii"], "sampleimg", "cap", None);
        builder.indepimage("sampleimg", None, None);

        let out = builder.raw_result().to_owned();
        assert!(out.contains("<pre class=\"dummyimage\">\nascii\n</pre>"));
        assert!(!out.contains("<img"));
        assert_eq!(builder.inline("icon", "sampleimg"), "[UnknownImage:sampleimg]");

        let messages: Vec<&str> = builder
            .diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            &messages[..2],
            ["image not bound: sampleimg", "image not bound: sampleimg"]
        );
    }

    #[test]
    fn test_indepimage() {
        let book = image_book();
        let config = config(2);
        let images = sample_images();
        let mut builder =
            Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config).with_images(&images);
        builder.indepimage("sampleimg", Some("sample photo"), None);
        builder.indepimage("sampleimg", None, Some("scale=1.2"));
        assert_eq!(
            builder.raw_result(),
            "<div class=\"image\">\n<img src=\"images/chap1-sampleimg.png\" alt=\"sample photo\" />\n<p class=\"caption\">\n図: sample photo\n</p>\n</div>\n<div class=\"image\">\n<img src=\"images/chap1-sampleimg.png\" alt=\"\" />\n</div>\n"
        );
    }

    #[test]
    fn test_references() {
        let mut ch = chapter();
        ch.register_list("l1", None).unwrap();
        ch.register_table("t1", None).unwrap();
        ch.register_table("t2", None).unwrap();
        ch.register_image("i1", None).unwrap();
        ch.register_footnote("f1", "note").unwrap();
        let mut book = book_with(ch);
        book.push_chapter(Chapter::new("chap2", Some(2), "Second <Part>"))
            .unwrap();
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);

        assert_eq!(builder.inline("list", "l1"), "リスト1.1");
        assert_eq!(builder.inline("table", "t2"), "表1.2");
        assert_eq!(builder.inline("img", "i1"), "図1.1");
        assert_eq!(builder.inline("chap", "chap2"), "第2章");
        assert_eq!(builder.inline("chapref", "chap2"), "第2章「Second &lt;Part&gt;」");
        assert_eq!(builder.inline("title", "chap2"), "Second &lt;Part&gt;");
        assert_eq!(
            builder.inline("fn", "f1"),
            "<a href=\"#fn-f1\" class=\"noteref\">*1</a>"
        );
        assert!(builder.diagnostics().is_empty());
    }

    #[test]
    fn test_unknown_references_become_placeholders() {
        let book = Book::new();
        let ch = chapter();
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &ch, &config);

        assert_eq!(builder.inline("chapref", "doesnotexist"), "[UnknownChapter:doesnotexist]");
        assert_eq!(builder.inline("list", "x"), "[UnknownList:x]");
        assert_eq!(builder.inline("fn", "x"), "[UnknownFootnote:x]");
        assert_eq!(builder.inline("hd", "x"), "[UnknownHeadline:x]");
        assert_eq!(builder.inline("blink", "x"), "[UnknownInline:blink:x]");
        assert_eq!(
            builder.compile_inline("see @<table>{t} and @<img>{i}."),
            "see [UnknownTable:t] and [UnknownImage:i]."
        );
        assert_eq!(builder.diagnostics().len(), 7);
        assert!(
            builder
                .diagnostics()
                .iter()
                .all(|d| d.severity == Severity::Warning)
        );
    }

    #[test]
    fn test_hd_reference() {
        let mut other = Chapter::new("chap2", Some(2), "Two");
        other.register_headline("setup", vec![3], "Set @<b>{up}").unwrap();
        let mut book = book_with(chapter());
        book.push_chapter(other).unwrap();
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);

        builder.heading(1, None, "-").unwrap();
        builder.heading(2, Some("intro"), "Intro").unwrap();
        builder.heading(3, Some("deep"), "Deep").unwrap();

        assert_eq!(builder.inline("hd", "intro"), "「1.1　Intro」");
        assert_eq!(builder.inline("hd", "deep"), "「Deep」");
        assert_eq!(builder.inline("hd", "chap2|setup"), "「2.3　Set <b>up</b>」");
    }

    #[test]
    fn test_hd_self_reference_terminates() {
        let mut ch = chapter();
        ch.register_headline("loop", vec![1], "see @<hd>{loop}").unwrap();
        let book = book_with(ch);
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        assert_eq!(builder.inline("hd", "loop"), "「1.1　see 「1.1　see @&lt;hd&gt;{loop}」」");
    }

    #[test]
    fn test_footnote_and_bibpaper() {
        let mut ch = chapter();
        ch.register_footnote("f1", "body").unwrap();
        let mut book = book_with(ch);
        book.register_bibpaper("knuth", "TAOCP").unwrap();
        let config = config(2);
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);

        builder.footnote("f1", "a @<b>{note}");
        builder.bibpaper(&["Addison-Wesley"], "knuth", "TAOCP");
        builder.bibpaper::<&str>(&[], "knuth", "TAOCP");

        assert_eq!(
            builder.raw_result(),
            concat!(
                "<div class=\"footnote\"><p class=\"footnote\">[<a id=\"fn-f1\">*1</a>] a <b>note</b></p></div>\n",
                "<p class=\"bibpaper-header\" id=\"bib-knuth\">[1] TAOCP</p>\n",
                "\n",
                "<div class=\"bibpaper\">\n<p>Addison-Wesley</p>\n</div>\n",
                "\n",
                "<p class=\"bibpaper-header\" id=\"bib-knuth\">[1] TAOCP</p>\n",
                "\n",
            )
        );
        assert_eq!(builder.inline("bib", "knuth"), "<a href=\"#bib-knuth\">[1]</a>");
    }

    #[test]
    fn test_icon() {
        let book = book_with(chapter());
        let config = config(2);
        let images = StaticImages::new().with_image("chap1", "star", "./images/chap1-star.png");
        let mut builder =
            Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config).with_images(&images);
        assert_eq!(
            builder.inline("icon", "star"),
            "<img src=\"images/chap1-star.png\" alt=\"[star]\" />"
        );
        assert_eq!(builder.inline("icon", "moon"), "[UnknownImage:moon]");
    }

    #[test]
    fn test_document_wrapper() {
        let book = book_with(chapter());
        let config = Config {
            stylesheet: Some("style.css".to_owned()),
            outencoding: OutputEncoding::Sjis,
            ..Config::default()
        };
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        builder.paragraph(&["本文"]);

        let doc = builder.result();
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"Shift_JIS\"?>\n"));
        assert!(doc.contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"style.css\" />"));
        assert!(doc.contains("<title>-</title>"));
        assert!(doc.ends_with("<body>\n<p>本文</p>\n</body>\n</html>\n"));
    }

    #[test]
    fn test_render_encodes_body() {
        let book = book_with(chapter());
        let config = Config {
            outencoding: OutputEncoding::Euc,
            ..Config::default()
        };
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        builder.paragraph(&["日本語"]);

        let expected: &[u8] = b"<p>\xC6\xFC\xCB\xDC\xB8\xEC</p>\n";
        assert_eq!(&*builder.render(), expected);

        let result = builder.finish();
        assert_eq!(result.text, "<p>日本語</p>\n");
        assert_eq!(result.encoded, expected);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_render_unmappable_as_hex_reference() {
        let book = book_with(chapter());
        let config = Config {
            outencoding: OutputEncoding::Euc,
            ..Config::default()
        };
        let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
        builder.paragraph(&["a😀b"]);

        let expected: &[u8] = b"<p>a&#x1f600;b</p>\n";
        assert_eq!(&*builder.render(), expected);
    }
}
