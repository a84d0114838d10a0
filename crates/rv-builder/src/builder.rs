//! Generic builder with pluggable backend.

use std::borrow::Cow;
use std::fmt::Write;
use std::marker::PhantomData;

use rv_book::{
    Book, Chapter, EntryNumber, ImageResolver, Index, IndexError, IndexKind, Location, NoImages,
};
use rv_config::Config;

use crate::backend::{BoxKind, Caption, CodeKind, RenderBackend, TableCell};
use crate::diagnostics::{Diagnostic, Severity};
use crate::encoding;
use crate::error::{BuildError, InlineError};
use crate::inline::{self, InlineHandler, InlineTag, args};
use crate::numbering::{MAX_HEADING_LEVEL, SectionCounter};
use crate::table::parse_table;
use crate::util::{TAB_WIDTH, detab, split_paragraphs};

/// Everything a finished render pass produced.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered body, not wrapped in a document.
    pub text: String,
    /// `text` in the configured output encoding.
    pub encoded: Vec<u8>,
    /// Warnings and recoverable errors in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders one chapter through backend `B`.
///
/// Block operations are called in document order and append to an internal
/// buffer. Inline text in captions, paragraphs, list items and table cells is
/// resolved on the way in; verbatim bodies are only escaped.
///
/// Failures follow three tiers:
/// - an unresolvable reference becomes a placeholder plus a warning,
/// - a missing caption target records an error diagnostic and renders the
///   body without the caption,
/// - [`error`](Self::error) and invalid heading levels return
///   [`BuildError`] to the caller.
pub struct Builder<'a, B: RenderBackend> {
    book: &'a Book,
    chapter: &'a Chapter,
    config: &'a Config,
    images: &'a dyn ImageResolver,
    location: Location,
    output: String,
    strict: bool,
    sections: SectionCounter,
    /// Chapter headlines plus ones registered while rendering.
    headlines: Index,
    noindent: bool,
    /// Set while resolving the caption of a referenced headline or footnote.
    in_reference: bool,
    diagnostics: Vec<Diagnostic>,
    _backend: PhantomData<B>,
}

impl<'a, B: RenderBackend> Builder<'a, B> {
    /// Create a builder for `chapter` of `book`.
    ///
    /// Strict mode starts from `config.strict`. No image is bound until an
    /// [`ImageResolver`] is set with [`with_images`](Self::with_images).
    #[must_use]
    pub fn new(book: &'a Book, chapter: &'a Chapter, config: &'a Config) -> Self {
        Self {
            book,
            chapter,
            config,
            images: &NoImages,
            location: Location::default(),
            output: String::with_capacity(4096),
            strict: config.strict,
            sections: SectionCounter::new(),
            headlines: chapter.headline_index().clone(),
            noindent: false,
            in_reference: false,
            diagnostics: Vec::new(),
            _backend: PhantomData,
        }
    }

    #[must_use]
    pub fn with_images(mut self, images: &'a dyn ImageResolver) -> Self {
        self.images = images;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Current location, for the caller to advance line numbers.
    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Record a warning: `<location>: warning: <msg>`.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnose(Severity::Warning, message.into());
    }

    /// Build the fatal error for `message`. The caller decides whether to
    /// return it.
    #[must_use]
    pub fn error(&self, message: impl Into<String>) -> BuildError {
        BuildError::Application {
            location: self.location.clone(),
            message: message.into(),
        }
    }

    fn report_error(&mut self, message: String) {
        self.diagnose(Severity::Error, message);
    }

    fn diagnose(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Warning => {
                tracing::warn!(location = %self.location, backend = B::NAME, "{message}");
            }
            Severity::Error => {
                tracing::error!(location = %self.location, backend = B::NAME, "{message}");
            }
        }
        self.diagnostics.push(Diagnostic {
            severity,
            location: self.location.clone(),
            message,
        });
    }

    /// `N.` for a numbered chapter when numbering is enabled, else empty.
    fn chapter_prefix(&self, chapter: &Chapter) -> String {
        match chapter.number() {
            Some(number) if self.config.secnolevel > 0 => format!("{number}."),
            _ => String::new(),
        }
    }

    // --- Block operations ---

    /// Heading at `level` (1..=6).
    ///
    /// Level 1 resets the section counters; deeper levels advance theirs. The
    /// number prefix is present when the chapter is numbered and `level` is
    /// within `secnolevel`.
    pub fn heading(&mut self, level: u8, label: Option<&str>, caption: &str) -> Result<(), BuildError> {
        if !(1..=MAX_HEADING_LEVEL).contains(&level) {
            return Err(self.error(format!("invalid heading level: {level}")));
        }
        let sections = self.sections.advance(level).to_vec();
        let chapter_number = self.chapter.number();

        if level > 1
            && let Some(id) = label
            && !self.headlines.contains(id)
        {
            let registered = self
                .headlines
                .register_path(id, sections.clone(), Some(caption))
                .map(|_| ());
            if let Err(err) = registered {
                return Err(self.error(err.to_string()));
            }
        }

        let mut anchor = String::from("h");
        if let Some(number) = chapter_number {
            let _ = write!(anchor, "{number}");
        }
        for section in &sections {
            let _ = write!(anchor, "-{section}");
        }

        let number: Option<Vec<u32>> = match chapter_number {
            Some(number) if self.config.numbers_level(level) => {
                Some(std::iter::once(number).chain(sections).collect())
            }
            _ => None,
        };

        tracing::debug!(level, ?label, anchor = %anchor, "Heading");
        let caption = self.compile_inline(caption);
        B::headline(
            level,
            label,
            &anchor,
            number.as_deref(),
            &caption,
            &mut self.output,
        );
        Ok(())
    }

    pub fn label(&mut self, id: &str) {
        B::label(id, &mut self.output);
    }

    pub fn hr(&mut self) {
        B::hr(&mut self.output);
    }

    /// Emit `text` unchanged; the two-character sequence `\n` becomes a
    /// newline.
    pub fn raw(&mut self, text: &str) {
        self.output.push_str(&text.replace("\\n", "\n"));
    }

    /// Mark the next paragraph as not indented.
    pub fn noindent(&mut self) {
        self.noindent = true;
    }

    pub fn paragraph<S: AsRef<str>>(&mut self, lines: &[S]) {
        let text = self.compile_lines(lines.iter().map(|line| line.as_ref()));
        let noindent = std::mem::take(&mut self.noindent);
        B::paragraph(&text, noindent, &mut self.output);
    }

    pub fn quote<S: AsRef<str>>(&mut self, lines: &[S]) {
        let paragraphs = self.compile_paragraphs(lines);
        B::quote(&paragraphs, &mut self.output);
    }

    pub fn flushright<S: AsRef<str>>(&mut self, lines: &[S]) {
        let paragraphs = self.compile_paragraphs(lines);
        B::flushright(&paragraphs, &mut self.output);
    }

    pub fn column<S: AsRef<str>>(&mut self, lines: &[S], caption: Option<&str>) {
        self.boxed(BoxKind::Column, lines, caption);
    }

    pub fn memo<S: AsRef<str>>(&mut self, lines: &[S], caption: Option<&str>) {
        self.boxed(BoxKind::Memo, lines, caption);
    }

    fn boxed<S: AsRef<str>>(&mut self, kind: BoxKind, lines: &[S], caption: Option<&str>) {
        let caption = caption.map(|caption| self.compile_inline(caption));
        let paragraphs = self.compile_paragraphs(lines);
        B::boxed(kind, caption.as_deref(), &paragraphs, &mut self.output);
    }

    pub fn ul<S: AsRef<str>>(&mut self, items: &[S]) {
        let items = self.compile_items(items);
        B::unordered_list(&items, &mut self.output);
    }

    pub fn ol<S: AsRef<str>>(&mut self, items: &[S]) {
        let items = self.compile_items(items);
        B::ordered_list(&items, &mut self.output);
    }

    /// Definition list of `(term, description)` pairs.
    pub fn dl<S: AsRef<str>>(&mut self, items: &[(S, S)]) {
        let items: Vec<(String, String)> = items
            .iter()
            .map(|(term, desc)| (self.compile_inline(term.as_ref()), self.compile_inline(desc.as_ref())))
            .collect();
        B::definition_list(&items, &mut self.output);
    }

    /// Numbered code list. An id missing from the list index records
    /// `no such list` and renders the body without caption.
    pub fn list<S: AsRef<str>>(&mut self, lines: &[S], id: &str, caption: &str) {
        let caption = self.list_caption(id, caption);
        let lines = code_lines(lines);
        B::code_block(CodeKind::List, caption.as_ref(), &lines, &mut self.output);
    }

    /// Like [`list`](Self::list) with line numbers.
    pub fn listnum<S: AsRef<str>>(&mut self, lines: &[S], id: &str, caption: &str) {
        let caption = self.list_caption(id, caption);
        let lines: Vec<String> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| detab(&format!("{:>2}: {}", i + 1, line.as_ref()), TAB_WIDTH).into_owned())
            .collect();
        B::code_block(CodeKind::ListNum, caption.as_ref(), &lines, &mut self.output);
    }

    pub fn emlist<S: AsRef<str>>(&mut self, lines: &[S], caption: Option<&str>) {
        self.unnumbered_code(CodeKind::EmList, lines, caption);
    }

    pub fn source<S: AsRef<str>>(&mut self, lines: &[S], caption: Option<&str>) {
        self.unnumbered_code(CodeKind::Source, lines, caption);
    }

    fn unnumbered_code<S: AsRef<str>>(&mut self, kind: CodeKind, lines: &[S], caption: Option<&str>) {
        let caption = caption.map(|text| Caption::new(None, self.compile_inline(text)));
        let lines = code_lines(lines);
        B::code_block(kind, caption.as_ref(), &lines, &mut self.output);
    }

    fn list_caption(&mut self, id: &str, caption: &str) -> Option<Caption> {
        let chapter = self.chapter;
        match chapter.list(id) {
            Ok(entry) => {
                let label = format!("リスト{}{}", self.chapter_prefix(chapter), entry.number);
                Some(Caption::new(Some(label), self.compile_inline(caption)))
            }
            Err(_) => {
                self.report_error(format!("no such list: {id}"));
                None
            }
        }
    }

    /// Numbered image.
    ///
    /// A bound image is rendered from its preferred path. Otherwise the raw
    /// `lines` are rendered as a dummy, with a warning in strict mode. An id
    /// missing from the image index is treated as unbound.
    pub fn image<S: AsRef<str>>(&mut self, lines: &[S], id: &str, caption: &str, metric: Option<&str>) {
        let chapter = self.chapter;
        let number = chapter.image(id).ok().map(|entry| entry.number.clone());
        let label = match &number {
            Some(number) => format!("図{}{number}", self.chapter_prefix(chapter)),
            None => "図".to_owned(),
        };
        let resolution = self.images.resolve(chapter, id);
        let caption = Caption::new(Some(label), self.compile_inline(caption));

        match resolution.path() {
            Some(path) if number.is_some() => {
                B::image(path, Some(&caption), metric, &mut self.output);
            }
            _ => {
                if self.strict {
                    self.warn(format!("image not bound: {id}"));
                }
                let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_owned()).collect();
                B::image_dummy(id, Some(&caption), &lines, &mut self.output);
            }
        }
    }

    /// Image outside the figure numbering.
    pub fn indepimage(&mut self, id: &str, caption: Option<&str>, metric: Option<&str>) {
        let caption = caption.map(|text| Caption::new(Some("図".to_owned()), self.compile_inline(text)));
        let resolution = self.images.resolve(self.chapter, id);
        match resolution.path() {
            Some(path) => B::image(path, caption.as_ref(), metric, &mut self.output),
            None => {
                if self.strict {
                    self.warn(format!("image not bound: {id}"));
                }
                B::image_dummy(id, caption.as_ref(), &[], &mut self.output);
            }
        }
    }

    /// Table from tab-separated `lines`.
    ///
    /// With a separator line the rows before it are header rows. Without one
    /// the first cell of every row is a header cell. The caption needs `id`
    /// in the table index; a miss records `no such table` and the rows are
    /// still rendered.
    pub fn table<S: AsRef<str>>(&mut self, lines: &[S], id: Option<&str>, caption: Option<&str>) {
        let parsed = parse_table(lines);
        let chapter = self.chapter;

        let caption = match caption {
            None => None,
            Some(_) if id.is_none() => {
                self.report_error("table caption without id".to_owned());
                None
            }
            Some(text) => {
                let id = id.unwrap_or_default();
                match chapter.table(id) {
                    Ok(entry) => {
                        let label = format!("表{}{}", self.chapter_prefix(chapter), entry.number);
                        Some(Caption::new(Some(label), self.compile_inline(text)))
                    }
                    Err(_) => {
                        self.report_error(format!("no such table: {id}"));
                        None
                    }
                }
            }
        };

        let header_rows = parsed.header_rows();
        let mut rows = Vec::with_capacity(parsed.rows.len());
        for (i, row) in parsed.rows.iter().enumerate() {
            let cells = row
                .iter()
                .enumerate()
                .map(|(j, cell)| TableCell {
                    header: i < header_rows || (parsed.separator.is_none() && j == 0),
                    content: self.compile_inline(cell),
                })
                .collect();
            rows.push(cells);
        }
        B::table(caption.as_ref(), &rows, &mut self.output);
    }

    /// Bibliography entry: header, then a blank line and the body when
    /// `lines` is non-empty, then a blank line.
    pub fn bibpaper<S: AsRef<str>>(&mut self, lines: &[S], id: &str, caption: &str) {
        let number = match self.book.bibpaper(id) {
            Ok(entry) => Some(entry.number.clone()),
            Err(_) => {
                self.report_error(format!("no such bibpaper: {id}"));
                None
            }
        };
        let caption = self.compile_inline(caption);
        B::bibpaper_header(id, number.as_ref(), &caption, &mut self.output);
        if !lines.is_empty() {
            self.output.push('\n');
            let paragraphs = self.compile_paragraphs(lines);
            B::bibpaper_body(id, &paragraphs, &mut self.output);
        }
        self.output.push('\n');
    }

    /// Footnote body for `id`.
    pub fn footnote(&mut self, id: &str, content: &str) {
        let number = match self.chapter.footnote(id) {
            Ok(entry) => entry.number.clone(),
            Err(_) => {
                self.report_error(format!("no such footnote: {id}"));
                return;
            }
        };
        let content = self.compile_inline(content);
        B::footnote(id, &number, &content, &mut self.output);
    }

    // --- Inline ---

    /// Resolve all inline directives in `text`.
    pub fn compile_inline(&mut self, text: &str) -> String {
        inline::resolve(self, text)
    }

    /// Resolve a single directive, e.g. `inline("chapref", "intro")`.
    ///
    /// Unknown tags and references yield their placeholder.
    pub fn inline(&mut self, tag: &str, arg: &str) -> String {
        inline::resolve_single(self, tag, arg)
    }

    /// Hyperlink; the url doubles as label when none is given.
    #[must_use]
    pub fn compile_href(&self, url: &str, label: Option<&str>) -> String {
        let mut out = String::new();
        B::href(&B::escape(url), &B::escape(label.unwrap_or(url)), &mut out);
        out
    }

    fn compile_lines<'s>(&mut self, lines: impl Iterator<Item = &'s str>) -> String {
        let joined = lines.collect::<Vec<_>>().join(B::PARAGRAPH_JOIN);
        self.compile_inline(&joined)
    }

    fn compile_paragraphs<S: AsRef<str>>(&mut self, lines: &[S]) -> Vec<String> {
        split_paragraphs(lines)
            .into_iter()
            .map(|paragraph| self.compile_lines(paragraph.into_iter()))
            .collect()
    }

    fn compile_items<S: AsRef<str>>(&mut self, items: &[S]) -> Vec<String> {
        items
            .iter()
            .map(|item| self.compile_inline(item.as_ref()))
            .collect()
    }

    /// Resolve text stored in an index. Nested references inside it are not
    /// followed again, so self-referencing captions terminate.
    fn compile_reference_text(&mut self, text: &str) -> String {
        if self.in_reference {
            return B::escape(text).into_owned();
        }
        self.in_reference = true;
        let out = self.compile_inline(text);
        self.in_reference = false;
        out
    }

    fn headline_ref(&mut self, arg: &str) -> Result<String, InlineError> {
        let book = self.book;
        let target = args::split_chapter_ref(arg)
            .and_then(|(chapter_id, id)| book.chapter(chapter_id).ok().map(|chapter| (chapter, id)));

        let (chapter, number, caption) = match target {
            Some((chapter, id)) => {
                let entry = chapter.headline(id)?;
                (chapter, entry.number.clone(), entry.title.clone())
            }
            None => {
                let entry = self.headlines.lookup(arg)?;
                (self.chapter, entry.number.clone(), entry.title.clone())
            }
        };

        let caption = self.compile_reference_text(caption.as_deref().unwrap_or_default());
        let level = match &number {
            EntryNumber::Path(path) => path.len() + 1,
            EntryNumber::Seq(_) => 2,
        };
        let numbered = chapter.number().is_some()
            && u8::try_from(level).is_ok_and(|level| self.config.numbers_level(level));

        Ok(if numbered {
            format!("「{}{number}　{caption}」", self.chapter_prefix(chapter))
        } else {
            format!("「{caption}」")
        })
    }

    fn render_inline(&mut self, tag: InlineTag, arg: &str, out: &mut String) -> Result<(), InlineError> {
        let book = self.book;
        let chapter = self.chapter;

        if let Some(style) = tag.style() {
            let content = if tag.nests() { Cow::Borrowed(arg) } else { B::escape(arg) };
            B::styled(style, &content, out);
            return Ok(());
        }

        match tag {
            InlineTag::Br => B::line_break(out),
            InlineTag::Uchar => {
                let ch = u32::from_str_radix(arg.trim(), 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| InlineError::InvalidArgument {
                        tag: "uchar",
                        arg: arg.to_owned(),
                    })?;
                B::uchar(ch, out);
            }
            InlineTag::Raw => out.push_str(&B::escape(arg)),
            InlineTag::Ruby => match args::split_pair(arg) {
                (base, Some(ruby)) => B::ruby(&B::escape(base), &B::escape(ruby.trim()), out),
                (base, None) => out.push_str(&B::escape(base)),
            },
            InlineTag::Kw => {
                let (word, alt) = args::split_pair(arg);
                let alt = alt.map(|alt| B::escape(alt.trim()));
                B::keyword(&B::escape(word), alt.as_deref(), out);
            }
            InlineTag::Href => {
                let (url, label) = args::split_href(arg);
                out.push_str(&self.compile_href(&url, label));
            }
            InlineTag::Chap => out.push_str(&B::escape(&book.chapter_number_label(arg)?)),
            InlineTag::Chapref => out.push_str(&B::escape(&book.chapter_display_string(arg)?)),
            InlineTag::Title => out.push_str(&B::escape(book.chapter_title(arg)?)),
            InlineTag::List => {
                let number = &chapter.list(arg)?.number;
                out.push_str(&B::escape(&format!("リスト{}{number}", self.chapter_prefix(chapter))));
            }
            InlineTag::Table => {
                let number = &chapter.table(arg)?.number;
                out.push_str(&B::escape(&format!("表{}{number}", self.chapter_prefix(chapter))));
            }
            InlineTag::Img => {
                let number = &chapter.image(arg)?.number;
                out.push_str(&B::escape(&format!("図{}{number}", self.chapter_prefix(chapter))));
            }
            InlineTag::Fn => {
                let entry = chapter.footnote(arg)?;
                let content = self.compile_reference_text(entry.content.as_deref().unwrap_or_default());
                B::footnote_ref(arg, &entry.number, &content, out);
            }
            InlineTag::Hd => out.push_str(&self.headline_ref(arg)?),
            InlineTag::Bib => B::bib_ref(arg, &book.bibpaper(arg)?.number, out),
            InlineTag::Icon => {
                let resolution = self.images.resolve(chapter, arg);
                let path = resolution.path().ok_or_else(|| IndexError::UnknownId {
                    kind: IndexKind::Image,
                    id: arg.to_owned(),
                })?;
                B::icon(path, arg, out);
            }
            // Decorations returned above.
            InlineTag::B
            | InlineTag::I
            | InlineTag::Em
            | InlineTag::Strong
            | InlineTag::U
            | InlineTag::Tt
            | InlineTag::Tti
            | InlineTag::Ttb
            | InlineTag::Code
            | InlineTag::Sup
            | InlineTag::Sub
            | InlineTag::Bou
            | InlineTag::Ami => {}
        }
        Ok(())
    }

    // --- Results ---

    /// Rendered body so far.
    #[must_use]
    pub fn raw_result(&self) -> &str {
        &self.output
    }

    /// Body wrapped in the backend's document frame.
    #[must_use]
    pub fn result(&self) -> String {
        let mut out = String::with_capacity(self.output.len() + 512);
        B::document(
            &B::escape(self.chapter.title()),
            &self.output,
            self.config,
            &mut out,
        );
        out
    }

    /// Body in the configured output encoding. Unmappable characters become
    /// the backend's character reference.
    #[must_use]
    pub fn render(&self) -> Cow<'_, [u8]> {
        encoding::encode_with(&self.output, self.config.outencoding, B::uchar)
    }

    /// Complete document in the configured output encoding.
    #[must_use]
    pub fn render_document(&self) -> Vec<u8> {
        encoding::encode_with(&self.result(), self.config.outencoding, B::uchar).into_owned()
    }

    /// Finish the pass.
    #[must_use]
    pub fn finish(self) -> RenderResult {
        let encoded = self.render().into_owned();
        tracing::debug!(
            chapter = self.chapter.id(),
            bytes = encoded.len(),
            diagnostics = self.diagnostics.len(),
            "Rendered chapter"
        );
        RenderResult {
            text: self.output,
            encoded,
            diagnostics: self.diagnostics,
        }
    }
}

impl<B: RenderBackend> InlineHandler for Builder<'_, B> {
    fn text(&mut self, text: &str, out: &mut String) {
        out.push_str(&B::escape(text));
    }

    fn directive(&mut self, tag: InlineTag, arg: &str, out: &mut String) -> Result<(), InlineError> {
        self.render_inline(tag, arg, out)
    }

    fn warn(&mut self, message: String) {
        self.diagnose(Severity::Warning, message);
    }
}

fn code_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|line| detab(line.as_ref(), TAB_WIDTH).into_owned())
        .collect()
}
