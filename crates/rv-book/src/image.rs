//! Image resolution interface.
//!
//! Deciding whether an image id is *bound* to a file is delegated to an
//! [`ImageResolver`]. The builder only consumes the answer; directory
//! enumeration stays with the caller.

use std::collections::HashMap;

use rv_config::{Config, ImagesConfig};

use crate::chapter::Chapter;

/// Result of resolving an image id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResolution {
    /// Whether at least one file backs the image.
    pub bound: bool,
    /// Candidate paths, most preferred image type first.
    pub paths: Vec<String>,
}

impl ImageResolution {
    #[must_use]
    pub fn unbound() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_paths(paths: Vec<String>) -> Self {
        Self {
            bound: !paths.is_empty(),
            paths,
        }
    }

    /// Preferred path, if bound.
    ///
    /// Candidate paths of an unbound resolution are never returned, and a
    /// resolution marked bound without any path counts as unbound.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        if !self.bound {
            return None;
        }
        self.paths.first().map(String::as_str)
    }
}

/// Resolves image ids to files.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, chapter: &Chapter, id: &str) -> ImageResolution;
}

/// Resolver that never binds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _chapter: &Chapter, _id: &str) -> ImageResolution {
        ImageResolution::unbound()
    }
}

/// Resolver backed by an explicit `(chapter id, image id) -> paths` map.
#[derive(Debug, Clone, Default)]
pub struct StaticImages {
    paths: HashMap<(String, String), Vec<String>>,
}

impl StaticImages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_image(mut self, chapter_id: &str, image_id: &str, path: impl Into<String>) -> Self {
        self.paths
            .entry((chapter_id.to_owned(), image_id.to_owned()))
            .or_default()
            .push(path.into());
        self
    }
}

impl ImageResolver for StaticImages {
    fn resolve(&self, chapter: &Chapter, id: &str) -> ImageResolution {
        self.paths
            .get(&(chapter.id().to_owned(), id.to_owned()))
            .map_or_else(ImageResolution::unbound, |paths| {
                ImageResolution::from_paths(paths.clone())
            })
    }
}

/// Resolver over a pre-enumerated listing of image file names.
///
/// In flat mode files are named `<chapter>-<id><ext>` inside the image
/// directory. In subdirectory mode each chapter has its own directory and
/// files are named `<id><ext>`. Candidates are ranked by the position of their
/// extension in the configured image types; unknown extensions never match.
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    basedir: String,
    config: ImagesConfig,
    subdirmode: bool,
    /// Directory listings keyed by chapter name (`""` for the flat directory).
    listings: HashMap<String, Vec<String>>,
}

impl ImageCatalog {
    /// Catalog using the book's `[images]` section and `subdirmode`.
    #[must_use]
    pub fn from_config(basedir: impl Into<String>, config: &Config) -> Self {
        Self::new(basedir, config.images.clone(), config.subdirmode)
    }

    #[must_use]
    pub fn new(basedir: impl Into<String>, config: ImagesConfig, subdirmode: bool) -> Self {
        Self {
            basedir: basedir.into(),
            config,
            subdirmode,
            listings: HashMap::new(),
        }
    }

    /// Set the listing of the flat image directory.
    #[must_use]
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listings
            .insert(String::new(), entries.into_iter().map(Into::into).collect());
        self
    }

    /// Set the listing of one chapter's image subdirectory.
    #[must_use]
    pub fn with_chapter_entries<I, S>(mut self, chapter_name: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listings.insert(
            chapter_name.to_owned(),
            entries.into_iter().map(Into::into).collect(),
        );
        self
    }

    fn type_rank(&self, ext: &str) -> Option<usize> {
        self.config
            .types
            .iter()
            .position(|t| t.eq_ignore_ascii_case(ext))
    }
}

impl ImageResolver for ImageCatalog {
    fn resolve(&self, chapter: &Chapter, id: &str) -> ImageResolution {
        let (listing_key, stem, dir) = if self.subdirmode {
            (
                chapter.name(),
                id.to_owned(),
                format!("{}/{}/{}", self.basedir, self.config.dir, chapter.name()),
            )
        } else {
            (
                "",
                format!("{}-{id}", chapter.name()),
                format!("{}/{}", self.basedir, self.config.dir),
            )
        };

        let Some(entries) = self.listings.get(listing_key) else {
            return ImageResolution::unbound();
        };

        let mut ranked: Vec<(usize, &str)> = entries
            .iter()
            .filter_map(|entry| {
                let ext = entry.strip_prefix(stem.as_str())?;
                self.type_rank(ext).map(|rank| (rank, entry.as_str()))
            })
            .collect();
        ranked.sort_by_key(|&(rank, _)| rank);

        ImageResolution::from_paths(
            ranked
                .into_iter()
                .map(|(_, entry)| format!("{dir}/{entry}"))
                .collect(),
        )
    }
}
