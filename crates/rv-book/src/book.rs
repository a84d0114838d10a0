//! Document-level container and chapter index.

use crate::chapter::Chapter;
use crate::index::{EntryNumber, Index, IndexEntry, IndexError, IndexKind};

/// An ordered set of chapters plus the document-level indices: chapters and
/// bibliography entries.
///
/// Built completely before rendering starts and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Book {
    chapters: Vec<Chapter>,
    chapter_index: Index,
    bibpapers: Index,
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

impl Book {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chapters: Vec::new(),
            chapter_index: Index::new(IndexKind::Chapter),
            bibpapers: Index::new(IndexKind::Bibpaper),
        }
    }

    /// Append a chapter and register it in the chapter index.
    pub fn push_chapter(&mut self, chapter: Chapter) -> Result<(), IndexError> {
        self.chapter_index
            .register(chapter.id(), Some(chapter.title()), None)?;
        self.chapters.push(chapter);
        Ok(())
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn chapter_index(&self) -> &Index {
        &self.chapter_index
    }

    pub fn chapter(&self, id: &str) -> Result<&Chapter, IndexError> {
        let entry = self.chapter_index.lookup(id)?;
        match entry.number {
            EntryNumber::Seq(pos) => self.chapters.get(pos - 1),
            EntryNumber::Path(_) => None,
        }
        .ok_or_else(|| IndexError::UnknownId {
            kind: IndexKind::Chapter,
            id: id.to_owned(),
        })
    }

    /// Chapter number as shown in text (`第1章`); the title for unnumbered
    /// chapters.
    pub fn chapter_number_label(&self, id: &str) -> Result<String, IndexError> {
        let chapter = self.chapter(id)?;
        Ok(chapter
            .number_label()
            .unwrap_or_else(|| chapter.title().to_owned()))
    }

    /// Number and title (`第1章「Title」`); just the title for unnumbered
    /// chapters.
    pub fn chapter_display_string(&self, id: &str) -> Result<String, IndexError> {
        let chapter = self.chapter(id)?;
        Ok(match chapter.number_label() {
            Some(label) => format!("{label}「{}」", chapter.title()),
            None => chapter.title().to_owned(),
        })
    }

    pub fn chapter_title(&self, id: &str) -> Result<&str, IndexError> {
        self.chapter(id).map(Chapter::title)
    }

    /// Register a bibliography entry; numbers are shared by the whole book.
    pub fn register_bibpaper(&mut self, id: &str, caption: &str) -> Result<&IndexEntry, IndexError> {
        self.bibpapers.register(id, Some(caption), None)
    }

    pub fn bibpaper(&self, id: &str) -> Result<&IndexEntry, IndexError> {
        self.bibpapers.lookup(id)
    }
}
