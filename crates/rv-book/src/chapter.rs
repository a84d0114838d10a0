//! Chapters and their per-chapter indices.

use crate::index::{Index, IndexEntry, IndexError, IndexKind};

/// One chapter of a book.
///
/// Owns the indices that `@<list>`, `@<table>`, `@<img>`, `@<fn>` and `@<hd>`
/// references resolve against. Indices are populated by the indexing pass;
/// rendering borrows the chapter immutably.
#[derive(Debug, Clone)]
pub struct Chapter {
    id: String,
    number: Option<u32>,
    title: String,
    name: String,
    lists: Index,
    tables: Index,
    images: Index,
    footnotes: Index,
    headlines: Index,
}

impl Chapter {
    /// Create a chapter. `number` is `None` for unnumbered chapters
    /// (prefaces, appendices without numbering).
    #[must_use]
    pub fn new(id: impl Into<String>, number: Option<u32>, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            number,
            title: title.into(),
            lists: Index::new(IndexKind::List),
            tables: Index::new(IndexKind::Table),
            images: Index::new(IndexKind::Image),
            footnotes: Index::new(IndexKind::Footnote),
            headlines: Index::new(IndexKind::Headline),
        }
    }

    /// Set the file stem used for image lookup (defaults to the id).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `第N章`, or `None` for an unnumbered chapter.
    #[must_use]
    pub fn number_label(&self) -> Option<String> {
        self.number.map(|n| format!("第{n}章"))
    }

    pub fn register_list(&mut self, id: &str, caption: Option<&str>) -> Result<&IndexEntry, IndexError> {
        self.lists.register(id, caption, None)
    }

    pub fn register_table(&mut self, id: &str, caption: Option<&str>) -> Result<&IndexEntry, IndexError> {
        self.tables.register(id, caption, None)
    }

    pub fn register_image(&mut self, id: &str, caption: Option<&str>) -> Result<&IndexEntry, IndexError> {
        self.images.register(id, caption, None)
    }

    pub fn register_footnote(&mut self, id: &str, content: &str) -> Result<&IndexEntry, IndexError> {
        self.footnotes.register(id, None, Some(content))
    }

    /// Register a headline under its section path below the chapter level:
    /// `[2]` is section N.2, `[2, 1]` is N.2.1 for chapter N.
    pub fn register_headline(
        &mut self,
        id: &str,
        path: Vec<u32>,
        caption: &str,
    ) -> Result<&IndexEntry, IndexError> {
        self.headlines.register_path(id, path, Some(caption))
    }

    pub fn list(&self, id: &str) -> Result<&IndexEntry, IndexError> {
        self.lists.lookup(id)
    }

    pub fn table(&self, id: &str) -> Result<&IndexEntry, IndexError> {
        self.tables.lookup(id)
    }

    pub fn image(&self, id: &str) -> Result<&IndexEntry, IndexError> {
        self.images.lookup(id)
    }

    pub fn footnote(&self, id: &str) -> Result<&IndexEntry, IndexError> {
        self.footnotes.lookup(id)
    }

    pub fn headline(&self, id: &str) -> Result<&IndexEntry, IndexError> {
        self.headlines.lookup(id)
    }

    #[must_use]
    pub fn headline_index(&self) -> &Index {
        &self.headlines
    }
}
