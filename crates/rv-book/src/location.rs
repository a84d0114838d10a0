//! Source position used to prefix diagnostics.

use std::fmt;

/// Current source file and line.
///
/// Rendering never inspects it; it only ends up in diagnostic messages as
/// `file:line`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub file: Option<String>,
    pub line: Option<usize>,
}

impl Location {
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
        }
    }

    pub fn set_line(&mut self, line: usize) {
        self.line = Some(line);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => write!(f, "{file}:-"),
            (None, Some(line)) => write!(f, "-:{line}"),
            (None, None) => f.write_str("-:-"),
        }
    }
}
