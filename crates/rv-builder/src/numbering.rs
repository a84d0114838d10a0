//! Per-level section counters.

/// Deepest heading level.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Running section numbers for heading levels 2 through 6.
///
/// Level 1 is the chapter itself and resets everything. Advancing a level
/// increments its counter and zeroes all deeper ones, so a level 3 heading
/// directly under a chapter is numbered `N.0.1`.
#[derive(Debug, Clone, Default)]
pub struct SectionCounter {
    counts: [u32; MAX_HEADING_LEVEL as usize - 1],
}

impl SectionCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to a heading at `level` (1..=6) and return the counters of
    /// levels 2..=`level`.
    pub fn advance(&mut self, level: u8) -> &[u32] {
        if level <= 1 {
            self.counts = Default::default();
            return &[];
        }
        let idx = usize::from(level.min(MAX_HEADING_LEVEL)) - 2;
        self.counts[idx] += 1;
        self.counts[idx + 1..].fill(0);
        &self.counts[..=idx]
    }
}
