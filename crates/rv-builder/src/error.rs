//! Error types for building.

use rv_book::{IndexError, Location};

/// Failure that aborts the whole render of the enclosing document.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Explicit fatal error raised through [`Builder::error`](crate::Builder::error).
    #[error("{location}: error: {message}")]
    Application { location: Location, message: String },
}

/// Failure to resolve a single inline directive.
///
/// Never escapes the resolver: each one is turned into a placeholder in the
/// output plus a warning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InlineError {
    #[error("unknown inline: @<{tag}>")]
    UnknownTag { tag: String, arg: String },
    #[error(transparent)]
    UnknownReference(#[from] IndexError),
    #[error("invalid argument for @<{tag}>: {arg}")]
    InvalidArgument { tag: &'static str, arg: String },
}

impl InlineError {
    /// Visible text emitted in place of the directive.
    #[must_use]
    pub fn placeholder(&self) -> String {
        match self {
            Self::UnknownTag { tag, arg } => format!("[UnknownInline:{tag}:{arg}]"),
            Self::UnknownReference(err) => err.placeholder(),
            Self::InvalidArgument { tag, arg } => {
                let mut name = String::with_capacity(tag.len());
                let mut chars = tag.chars();
                if let Some(first) = chars.next() {
                    name.extend(first.to_uppercase());
                    name.extend(chars);
                }
                format!("[Invalid{name}:{arg}]")
            }
        }
    }
}
