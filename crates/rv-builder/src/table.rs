//! Table source parsing and shape normalization.

/// Rows of a table block after parsing, plus the separator position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    /// Normalized rows; all have the same width.
    pub rows: Vec<Vec<String>>,
    /// Line index of the first separator line. The same number of leading
    /// rows are header rows.
    pub separator: Option<usize>,
}

impl ParsedTable {
    /// Number of leading rows rendered entirely as header cells.
    #[must_use]
    pub fn header_rows(&self) -> usize {
        self.separator.map_or(0, |sep| sep.min(self.rows.len()))
    }

    /// Column count (0 for an empty table).
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Whether `line` separates header rows from body rows: it starts with at
/// least twelve `=` or `-` characters.
#[must_use]
pub fn is_separator(line: &str) -> bool {
    line.chars().take(12).filter(|c| matches!(c, '=' | '-')).count() == 12
}

/// Parse the raw lines of a table block.
///
/// Separator lines are dropped. Other lines are trimmed and split on runs of
/// tabs; each cell loses one leading `.`.
#[must_use]
pub fn parse_table<S: AsRef<str>>(lines: &[S]) -> ParsedTable {
    let mut rows = Vec::with_capacity(lines.len());
    let mut separator = None;

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if is_separator(line) {
            separator.get_or_insert(idx);
            continue;
        }
        rows.push(
            line.trim()
                .split('\t')
                .filter(|cell| !cell.is_empty())
                .map(|cell| cell.strip_prefix('.').unwrap_or(cell).to_owned())
                .collect(),
        );
    }

    ParsedTable {
        rows: normalize(rows),
        separator,
    }
}

/// Make `rows` rectangular.
///
/// Trailing cells that are empty after trimming are dropped from every row,
/// then each row is padded with `""` to the widest remaining row.
#[must_use]
pub fn normalize(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    for row in &mut rows {
        while row.last().is_some_and(|cell| cell.trim().is_empty()) {
            row.pop();
        }
    }
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}
