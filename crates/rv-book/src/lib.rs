//! Book model for the review builder.
//!
//! A [`Book`] owns its [`Chapter`]s and a document-level chapter index. Each
//! chapter owns the per-chapter indices (lists, tables, images, footnotes,
//! headlines) that cross-references resolve against.
//!
//! Indices are filled during an indexing pass that runs before rendering.
//! Rendering only reads them, so a fully indexed book can be shared between
//! threads that each render one chapter.
//!
//! # Example
//!
//! ```
//! use rv_book::{Book, Chapter};
//!
//! let mut chapter = Chapter::new("intro", Some(1), "Introduction");
//! chapter.register_list("hello", Some("Hello world")).unwrap();
//!
//! let mut book = Book::new();
//! book.push_chapter(chapter).unwrap();
//!
//! let intro = book.chapter("intro").unwrap();
//! assert_eq!(intro.list("hello").unwrap().number.to_string(), "1");
//! assert_eq!(book.chapter_display_string("intro").unwrap(), "第1章「Introduction」");
//! ```

mod book;
mod chapter;
mod image;
mod index;
mod location;

pub use book::Book;
pub use chapter::Chapter;
pub use image::{ImageCatalog, ImageResolution, ImageResolver, NoImages, StaticImages};
pub use index::{EntryNumber, Index, IndexEntry, IndexError, IndexKind};
pub use location::Location;

static_assertions::assert_impl_all!(Book: Send, Sync);
static_assertions::assert_impl_all!(Chapter: Send, Sync);
