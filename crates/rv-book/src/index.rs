//! Append-only, id-keyed cross-reference indices.

use std::collections::HashMap;
use std::fmt;

/// What an [`Index`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Chapter,
    Headline,
    List,
    Table,
    Image,
    Footnote,
    Bibpaper,
}

impl IndexKind {
    /// Capitalized name used in placeholders (`[UnknownList:id]`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Chapter => "Chapter",
            Self::Headline => "Headline",
            Self::List => "List",
            Self::Table => "Table",
            Self::Image => "Image",
            Self::Footnote => "Footnote",
            Self::Bibpaper => "Bibpaper",
        }
    }

    /// Visible placeholder emitted in place of an unresolved reference.
    #[must_use]
    pub fn placeholder(self, id: &str) -> String {
        format!("[Unknown{}:{id}]", self.label())
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

/// Display number of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryNumber {
    /// Position in registration order, starting at 1.
    Seq(usize),
    /// Section path, e.g. `[1, 2]` for the second section of chapter 1.
    Path(Vec<u32>),
}

impl fmt::Display for EntryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seq(n) => write!(f, "{n}"),
            Self::Path(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// One registered id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: String,
    pub number: EntryNumber,
    /// Caption or title shown with the number.
    pub title: Option<String>,
    /// Body text (footnotes).
    pub content: Option<String>,
}

/// Index lookup and registration failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: IndexKind, id: String },
    #[error("unknown {kind}: {id}")]
    UnknownId { kind: IndexKind, id: String },
}

impl IndexError {
    /// Visible placeholder for this failure.
    #[must_use]
    pub fn placeholder(&self) -> String {
        match self {
            Self::DuplicateId { kind, id } | Self::UnknownId { kind, id } => kind.placeholder(id),
        }
    }
}

/// Append-only registry of ids for one [`IndexKind`].
///
/// Sequential numbers are assigned in registration order and never reused.
#[derive(Debug, Clone)]
pub struct Index {
    kind: IndexKind,
    entries: Vec<IndexEntry>,
    by_id: HashMap<String, usize>,
}

impl Index {
    #[must_use]
    pub fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Register `id` with the next sequential number.
    pub fn register(
        &mut self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<&IndexEntry, IndexError> {
        let number = EntryNumber::Seq(self.entries.len() + 1);
        self.insert(id, number, title, content)
    }

    /// Register `id` with an explicit section path.
    pub fn register_path(
        &mut self,
        id: &str,
        path: Vec<u32>,
        title: Option<&str>,
    ) -> Result<&IndexEntry, IndexError> {
        self.insert(id, EntryNumber::Path(path), title, None)
    }

    fn insert(
        &mut self,
        id: &str,
        number: EntryNumber,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<&IndexEntry, IndexError> {
        if self.by_id.contains_key(id) {
            return Err(IndexError::DuplicateId {
                kind: self.kind,
                id: id.to_owned(),
            });
        }
        tracing::trace!(kind = %self.kind, id, "Registered index entry");
        let pos = self.entries.len();
        self.by_id.insert(id.to_owned(), pos);
        self.entries.push(IndexEntry {
            id: id.to_owned(),
            number,
            title: title.map(str::to_owned),
            content: content.map(str::to_owned),
        });
        Ok(&self.entries[pos])
    }

    /// Look up an entry by id.
    pub fn lookup(&self, id: &str) -> Result<&IndexEntry, IndexError> {
        self.by_id
            .get(id)
            .map(|&pos| &self.entries[pos])
            .ok_or_else(|| IndexError::UnknownId {
                kind: self.kind,
                id: id.to_owned(),
            })
    }

    pub fn number_of(&self, id: &str) -> Result<&EntryNumber, IndexError> {
        self.lookup(id).map(|e| &e.number)
    }

    pub fn title_of(&self, id: &str) -> Result<Option<&str>, IndexError> {
        self.lookup(id).map(|e| e.title.as_deref())
    }

    pub fn content_of(&self, id: &str) -> Result<Option<&str>, IndexError> {
        self.lookup(id).map(|e| e.content.as_deref())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }
}
