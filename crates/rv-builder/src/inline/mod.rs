//! Inline directives: `@<tag>{argument}`.
//!
//! Resolution is split in three parts:
//!
//! 1. `parser` finds directives in a text run, balancing nested openers and
//!    honoring `\}` escapes inside arguments.
//! 2. `resolver` walks a run left to right, escapes literal text, recurses
//!    into arguments of nesting tags and dispatches each directive to an
//!    [`InlineHandler`]. Failed directives become placeholders.
//! 3. `args` splits composite arguments (`href`, `ruby`, `kw`, `hd`).

pub(crate) mod args;
pub(crate) mod parser;
pub(crate) mod resolver;

use std::str::FromStr;

use crate::backend::Style;
use crate::error::InlineError;

pub(crate) use resolver::{InlineHandler, resolve, resolve_single};

/// Maximum nesting depth of directive arguments.
pub const MAX_INLINE_DEPTH: usize = 16;

/// Known inline tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTag {
    B,
    I,
    Em,
    Strong,
    U,
    Tt,
    Tti,
    Ttb,
    Code,
    Sup,
    Sub,
    Bou,
    Ami,
    Br,
    Uchar,
    Raw,
    Ruby,
    Kw,
    Href,
    Chap,
    Chapref,
    Title,
    List,
    Table,
    Img,
    Fn,
    Hd,
    Bib,
    Icon,
}

impl InlineTag {
    /// Decoration applied by this tag, if it only wraps its content.
    #[must_use]
    pub fn style(self) -> Option<Style> {
        Some(match self {
            Self::B => Style::Bold,
            Self::I => Style::Italic,
            Self::Em => Style::Emphasis,
            Self::Strong => Style::Strong,
            Self::U => Style::Underline,
            Self::Tt => Style::Teletype,
            Self::Tti => Style::TeletypeItalic,
            Self::Ttb => Style::TeletypeBold,
            Self::Code => Style::Code,
            Self::Sup => Style::Superscript,
            Self::Sub => Style::Subscript,
            Self::Bou => Style::Bou,
            Self::Ami => Style::Ami,
            _ => return None,
        })
    }

    /// Whether the argument may itself contain directives.
    ///
    /// Nesting tags receive their argument already resolved and escaped;
    /// all others receive the raw argument with `\}` unescaped. `code` is
    /// the one decoration whose argument stays verbatim.
    #[must_use]
    pub fn nests(self) -> bool {
        self.style().is_some_and(|style| style != Style::Code)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::B => "b",
            Self::I => "i",
            Self::Em => "em",
            Self::Strong => "strong",
            Self::U => "u",
            Self::Tt => "tt",
            Self::Tti => "tti",
            Self::Ttb => "ttb",
            Self::Code => "code",
            Self::Sup => "sup",
            Self::Sub => "sub",
            Self::Bou => "bou",
            Self::Ami => "ami",
            Self::Br => "br",
            Self::Uchar => "uchar",
            Self::Raw => "raw",
            Self::Ruby => "ruby",
            Self::Kw => "kw",
            Self::Href => "href",
            Self::Chap => "chap",
            Self::Chapref => "chapref",
            Self::Title => "title",
            Self::List => "list",
            Self::Table => "table",
            Self::Img => "img",
            Self::Fn => "fn",
            Self::Hd => "hd",
            Self::Bib => "bib",
            Self::Icon => "icon",
        }
    }
}

impl FromStr for InlineTag {
    type Err = InlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "b" => Self::B,
            "i" => Self::I,
            "em" => Self::Em,
            "strong" => Self::Strong,
            "u" => Self::U,
            "tt" => Self::Tt,
            "tti" => Self::Tti,
            "ttb" => Self::Ttb,
            "code" => Self::Code,
            "sup" => Self::Sup,
            "sub" => Self::Sub,
            "bou" => Self::Bou,
            "ami" => Self::Ami,
            "br" => Self::Br,
            "uchar" => Self::Uchar,
            "raw" => Self::Raw,
            "ruby" => Self::Ruby,
            "kw" => Self::Kw,
            "href" => Self::Href,
            "chap" => Self::Chap,
            "chapref" => Self::Chapref,
            "title" => Self::Title,
            "list" => Self::List,
            "table" => Self::Table,
            "img" => Self::Img,
            "fn" => Self::Fn,
            "hd" => Self::Hd,
            "bib" => Self::Bib,
            "icon" => Self::Icon,
            _ => {
                return Err(InlineError::UnknownTag {
                    tag: s.to_owned(),
                    arg: String::new(),
                });
            }
        })
    }
}
