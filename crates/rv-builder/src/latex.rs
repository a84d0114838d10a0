//! LaTeX backend.
//!
//! Emits environments and macros from the `reviewmacro` package
//! (`reviewlist`, `reviewcolumn`, `\reviewth`, ...). LaTeX numbers headings
//! and floats itself, so section numbers are only used to pick starred
//! commands for unnumbered headings.

use std::borrow::Cow;
use std::fmt::Write;

use rv_book::EntryNumber;
use rv_config::Config;

use crate::backend::{BoxKind, Caption, CodeKind, RenderBackend, Style, TableCell};

/// Escape LaTeX special characters.
///
/// # Examples
///
/// ```
/// use rv_builder::escape_latex;
///
/// assert_eq!(escape_latex("50% of $x_1"), r"50\% of \$x\_1");
/// assert_eq!(escape_latex("{a}"), r"\{a\}");
/// ```
#[must_use]
pub fn escape_latex(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '{', '}', '$', '#', '%', '&', '_', '^', '~', '|', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '{' | '}' | '$' | '#' | '%' | '&' | '_' => {
                out.push('\\');
                out.push(ch);
            }
            '^' => out.push_str(r"\textasciicircum{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '|' => out.push_str(r"\textbar{}"),
            '<' => out.push_str(r"\textless{}"),
            '>' => out.push_str(r"\textgreater{}"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// LaTeX render backend.
pub struct LatexBackend;

impl LatexBackend {
    fn caption_text(caption: &Caption) -> Cow<'_, str> {
        match &caption.label {
            Some(label) => Cow::Owned(format!("{label}: {}", caption.text)),
            None => Cow::Borrowed(&caption.text),
        }
    }

    fn environment(name: &str, paragraphs: &[String], out: &mut String) {
        let _ = writeln!(out, "\\begin{{{name}}}");
        out.push_str(&paragraphs.join("\n\n"));
        let _ = writeln!(out, "\n\\end{{{name}}}");
    }

    fn items(name: &str, items: &[String], out: &mut String) {
        let _ = writeln!(out, "\n\\begin{{{name}}}");
        for item in items {
            let _ = writeln!(out, "\\item {item}");
        }
        let _ = writeln!(out, "\\end{{{name}}}");
    }
}

impl RenderBackend for LatexBackend {
    const NAME: &'static str = "latex";
    const PARAGRAPH_JOIN: &'static str = "\n";

    fn escape(text: &str) -> Cow<'_, str> {
        escape_latex(text)
    }

    fn document(title: &str, body: &str, _config: &Config, out: &mut String) {
        out.push_str("\\documentclass[uplatex]{jsbook}\n");
        out.push_str("\\usepackage{reviewmacro}\n");
        let _ = writeln!(out, "\\title{{{title}}}");
        out.push_str("\\begin{document}\n");
        out.push_str(body);
        out.push_str("\\end{document}\n");
    }

    fn headline(
        level: u8,
        label: Option<&str>,
        _anchor: &str,
        number: Option<&[u32]>,
        caption: &str,
        out: &mut String,
    ) {
        let command = match level {
            1 => "chapter",
            2 => "section",
            3 => "subsection",
            4 => "subsubsection",
            5 => "paragraph",
            _ => "subparagraph",
        };
        let star = if number.is_some() { "" } else { "*" };
        if level > 1 {
            out.push('\n');
        }
        let _ = writeln!(out, "\\{command}{star}{{{caption}}}");
        if let Some(label) = label {
            let _ = writeln!(out, "\\label{{{}}}", escape_latex(label));
        }
    }

    fn label(id: &str, out: &mut String) {
        let _ = writeln!(out, "\\label{{{}}}", escape_latex(id));
    }

    fn hr(out: &mut String) {
        out.push_str("\\hrule\n");
    }

    fn paragraph(text: &str, noindent: bool, out: &mut String) {
        out.push('\n');
        if noindent {
            out.push_str("\\noindent\n");
        }
        let _ = writeln!(out, "{text}");
    }

    fn quote(paragraphs: &[String], out: &mut String) {
        out.push('\n');
        Self::environment("quote", paragraphs, out);
    }

    fn flushright(paragraphs: &[String], out: &mut String) {
        out.push('\n');
        Self::environment("flushright", paragraphs, out);
    }

    fn boxed(kind: BoxKind, caption: Option<&str>, paragraphs: &[String], out: &mut String) {
        let (env, head) = match kind {
            BoxKind::Column => ("reviewcolumn", "reviewcolumnhead"),
            BoxKind::Memo => ("reviewminicolumn", "reviewminicolumntitle"),
        };
        let _ = writeln!(out, "\n\\begin{{{env}}}");
        if let Some(caption) = caption {
            let _ = writeln!(out, "\\{head}{{{caption}}}");
        }
        for paragraph in paragraphs {
            let _ = writeln!(out, "\n{paragraph}");
        }
        let _ = writeln!(out, "\\end{{{env}}}");
    }

    fn unordered_list(items: &[String], out: &mut String) {
        Self::items("itemize", items, out);
    }

    fn ordered_list(items: &[String], out: &mut String) {
        Self::items("enumerate", items, out);
    }

    fn definition_list(items: &[(String, String)], out: &mut String) {
        out.push_str("\n\\begin{description}\n");
        for (term, desc) in items {
            let _ = writeln!(out, "\\item[{term}] \\mbox{{}} \\\\");
            let _ = writeln!(out, "{desc}");
        }
        out.push_str("\\end{description}\n");
    }

    fn code_block(kind: CodeKind, caption: Option<&Caption>, lines: &[String], out: &mut String) {
        let (env, head) = match kind {
            CodeKind::List | CodeKind::ListNum => ("reviewlist", "reviewlistcaption"),
            CodeKind::EmList => ("reviewemlist", "reviewemlistcaption"),
            CodeKind::Source => ("reviewsource", "reviewsourcecaption"),
        };
        out.push('\n');
        if let Some(caption) = caption {
            let _ = writeln!(out, "\\{head}{{{}}}", Self::caption_text(caption));
        }
        let _ = writeln!(out, "\\begin{{{env}}}");
        for line in lines {
            let _ = writeln!(out, "{}", escape_latex(line));
        }
        let _ = writeln!(out, "\\end{{{env}}}");
    }

    fn image(path: &str, caption: Option<&Caption>, metric: Option<&str>, out: &mut String) {
        out.push_str("\n\\begin{reviewimage}\n");
        let options = metric.unwrap_or(r"width=\maxwidth");
        let _ = writeln!(out, "\\includegraphics[{options}]{{{path}}}");
        if let Some(caption) = caption {
            let _ = writeln!(out, "\\reviewimagecaption{{{}}}", Self::caption_text(caption));
        }
        out.push_str("\\end{reviewimage}\n");
    }

    fn image_dummy(_id: &str, caption: Option<&Caption>, lines: &[String], out: &mut String) {
        out.push_str("\n\\begin{reviewdummyimage}\n");
        for line in lines {
            let _ = writeln!(out, "{}\\\\", escape_latex(line));
        }
        if let Some(caption) = caption {
            let _ = writeln!(out, "\\reviewimagecaption{{{}}}", Self::caption_text(caption));
        }
        out.push_str("\\end{reviewdummyimage}\n");
    }

    fn table(caption: Option<&Caption>, rows: &[Vec<TableCell>], out: &mut String) {
        out.push('\n');
        if let Some(caption) = caption {
            let _ = writeln!(out, "\\reviewtablecaption{{{}}}", Self::caption_text(caption));
        }
        let Some(first) = rows.first() else {
            return;
        };
        let columns = "|l".repeat(first.len());
        let _ = writeln!(out, "\\begin{{reviewtable}}{{{columns}|}}");
        out.push_str("\\hline\n");
        for row in rows {
            let cells: Vec<Cow<'_, str>> = row
                .iter()
                .map(|cell| {
                    if cell.header {
                        Cow::Owned(format!("\\reviewth{{{}}}", cell.content))
                    } else {
                        Cow::Borrowed(cell.content.as_str())
                    }
                })
                .collect();
            let _ = writeln!(out, "{} \\\\  \\hline", cells.join(" & "));
        }
        out.push_str("\\end{reviewtable}\n");
    }

    fn footnote(_id: &str, number: &EntryNumber, content: &str, out: &mut String) {
        let _ = writeln!(out, "\\footnotetext[{number}]{{{content}}}");
    }

    fn bibpaper_header(id: &str, number: Option<&EntryNumber>, caption: &str, out: &mut String) {
        if let Some(number) = number {
            let _ = write!(out, "[{number}] ");
        }
        let _ = writeln!(out, "{caption}");
        let _ = writeln!(out, "\\label{{bib:{}}}", escape_latex(id));
    }

    fn bibpaper_body(_id: &str, paragraphs: &[String], out: &mut String) {
        let _ = writeln!(out, "{}", paragraphs.join("\n\n"));
    }

    fn styled(style: Style, content: &str, out: &mut String) {
        let (open, close) = match style {
            Style::Bold | Style::Strong => (r"\textbf{", "}"),
            Style::Italic => (r"\textit{", "}"),
            Style::Emphasis => (r"\reviewem{", "}"),
            Style::Underline => (r"\reviewunderline{", "}"),
            Style::Teletype => (r"\texttt{", "}"),
            Style::TeletypeItalic => (r"\texttt{\textit{", "}}"),
            Style::TeletypeBold => (r"\texttt{\textbf{", "}}"),
            Style::Code => (r"\reviewcode{", "}"),
            Style::Superscript => (r"\textsuperscript{", "}"),
            Style::Subscript => (r"\textsubscript{", "}"),
            Style::Bou => (r"\bou{", "}"),
            Style::Ami => (r"\reviewami{", "}"),
        };
        out.push_str(open);
        out.push_str(content);
        out.push_str(close);
    }

    fn line_break(out: &mut String) {
        out.push_str("\\\\\n");
    }

    fn uchar(ch: char, out: &mut String) {
        let _ = write!(out, "\\UTF{{{:04X}}}", u32::from(ch));
    }

    fn ruby(base: &str, ruby: &str, out: &mut String) {
        let _ = write!(out, "\\ruby{{{base}}}{{{ruby}}}");
    }

    fn keyword(word: &str, alt: Option<&str>, out: &mut String) {
        match alt {
            Some(alt) => {
                let _ = write!(out, "\\reviewkw{{{word}}}（{alt}）");
            }
            None => {
                let _ = write!(out, "\\reviewkw{{{word}}}");
            }
        }
    }

    fn href(url: &str, label: &str, out: &mut String) {
        let _ = write!(out, "\\href{{{url}}}{{{label}}}");
    }

    fn footnote_ref(_id: &str, number: &EntryNumber, _content: &str, out: &mut String) {
        let _ = write!(out, "\\footnotemark[{number}]");
    }

    fn bib_ref(id: &str, number: &EntryNumber, out: &mut String) {
        let _ = write!(out, "\\reviewbibref{{[{number}]}}{{bib:{}}}", escape_latex(id));
    }

    fn icon(path: &str, _id: &str, out: &mut String) {
        let _ = write!(out, "\\includegraphics{{{path}}}");
    }
}
