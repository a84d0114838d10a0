//! Book configuration for the review builder.
//!
//! Parses `review.toml` with serde and provides auto-discovery of the config
//! file in parent directories. The resulting [`Config`] is an explicit value:
//! it is handed to each builder when a render pass starts and never stored in
//! global state.
//!
//! ```toml
//! secnolevel = 3
//! outencoding = "EUC"
//! stylesheet = "style.css"
//!
//! [images]
//! dir = "images"
//! types = [".png", ".jpg"]
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "review.toml";

/// Deepest heading level a book can number.
pub const MAX_SECNOLEVEL: u8 = 6;

/// Book configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Heading levels up to and including this value get a section number.
    /// `0` disables numbering entirely.
    pub secnolevel: u8,
    /// Encoding of the rendered output.
    pub outencoding: OutputEncoding,
    /// Look for images in one subdirectory per chapter instead of a flat
    /// `<chapter>-<id>` naming scheme.
    pub subdirmode: bool,
    /// Stylesheet linked from HTML output. Other backends ignore it.
    pub stylesheet: Option<String>,
    /// Surface missing resources (unbound images) as warnings.
    pub strict: bool,
    /// Image lookup configuration.
    pub images: ImagesConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secnolevel: 2,
            outencoding: OutputEncoding::default(),
            subdirmode: false,
            stylesheet: None,
            strict: false,
            images: ImagesConfig::default(),
            config_path: None,
        }
    }
}

/// Image lookup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Directory holding image files, relative to the book root.
    pub dir: String,
    /// Accepted extensions, most preferred first.
    pub types: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: "images".to_owned(),
            types: [".ai", ".eps", ".pdf", ".tif", ".tiff", ".png", ".bmp", ".jpg", ".jpeg", ".gif", ".svg"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Target encoding for rendered output.
///
/// Parsed case-insensitively from `UTF-8`, `EUC`, `SJIS` or `JIS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputEncoding {
    /// UTF-8, the output buffer as is.
    #[default]
    Utf8,
    /// EUC-JP.
    Euc,
    /// `Shift_JIS`.
    Sjis,
    /// ISO-2022-JP.
    Jis,
}

impl FromStr for OutputEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Ok(Self::Utf8),
            "EUC" | "EUC-JP" => Ok(Self::Euc),
            "SJIS" | "SHIFT_JIS" => Ok(Self::Sjis),
            "JIS" | "ISO-2022-JP" => Ok(Self::Jis),
            _ => Err(ConfigError::Validation(format!(
                "outencoding must be one of UTF-8, EUC, SJIS, JIS (got {s:?})"
            ))),
        }
    }
}

impl TryFrom<String> for OutputEncoding {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF-8",
            Self::Euc => "EUC",
            Self::Sjis => "SJIS",
            Self::Jis => "JIS",
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `review.toml` in the current directory and its parents, falling
    /// back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether headings at `level` receive a section number.
    #[must_use]
    pub fn numbers_level(&self, level: u8) -> bool {
        self.secnolevel > 0 && level <= self.secnolevel
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after parsing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secnolevel > MAX_SECNOLEVEL {
            return Err(ConfigError::Validation(format!(
                "secnolevel cannot exceed {MAX_SECNOLEVEL}"
            )));
        }
        self.validate_images()
    }

    fn validate_images(&self) -> Result<(), ConfigError> {
        if self.images.types.is_empty() {
            return Err(ConfigError::Validation(
                "images.types cannot be empty".to_owned(),
            ));
        }
        if let Some(bad) = self.images.types.iter().find(|t| !t.starts_with('.')) {
            return Err(ConfigError::Validation(format!(
                "images.types entries must start with '.' (got {bad:?})"
            )));
        }
        Ok(())
    }
}
