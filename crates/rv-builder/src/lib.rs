//! Trait-based builder for review markup with pluggable backends.
//!
//! This crate provides a generic [`Builder`] that turns block commands and
//! inline directives (`@<b>{...}`) into backend markup using the
//! [`RenderBackend`] trait.
//!
//! # Architecture
//!
//! - [`HtmlBackend`]: XHTML-style markup
//! - [`LatexBackend`]: LaTeX using the `reviewmacro` environments
//!
//! Shared functionality (section numbering, cross-reference lookups, inline
//! resolution, table shaping, diagnostics, output encoding) lives in the
//! generic builder, while markup is delegated to the backend.
//!
//! # Example
//!
//! ```
//! use rv_book::{Book, Chapter};
//! use rv_builder::{Builder, HtmlBackend};
//! use rv_config::Config;
//!
//! let mut book = Book::new();
//! book.push_chapter(Chapter::new("intro", Some(1), "Introduction")).unwrap();
//! let config = Config::default();
//!
//! let mut builder = Builder::<HtmlBackend>::new(&book, &book.chapters()[0], &config);
//! builder.heading(1, None, "Introduction").unwrap();
//! builder.paragraph(&["See @<chapref>{intro} and @<b>{this}."]);
//!
//! let result = builder.finish();
//! assert!(result.text.contains("第1章「Introduction」"));
//! assert!(result.diagnostics.is_empty());
//! ```

mod backend;
mod builder;
mod diagnostics;
mod encoding;
mod error;
mod html;
mod inline;
mod latex;
mod numbering;
mod table;
mod util;

pub use backend::{BoxKind, Caption, CodeKind, RenderBackend, Style, TableCell};
pub use builder::{Builder, RenderResult};
pub use diagnostics::{Diagnostic, Severity};
pub use encoding::{charset, encode, encode_with};
pub use error::{BuildError, InlineError};
pub use html::{HtmlBackend, escape_html, unescape_html};
pub use inline::{InlineTag, MAX_INLINE_DEPTH};
pub use latex::{LatexBackend, escape_latex};
pub use numbering::{MAX_HEADING_LEVEL, SectionCounter};
pub use table::{ParsedTable, normalize, parse_table};
pub use util::{TAB_WIDTH, detab};

static_assertions::assert_impl_all!(Builder<'static, HtmlBackend>: Send);
static_assertions::assert_impl_all!(RenderResult: Send, Sync);
