use bon::Builder;
use clap::ValueEnum;

/// How the per-vertex searches of an analysis are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Parallelism {
    /// One vertex after another on the calling thread.
    Sequential,
    /// One search per worker of the global rayon pool.
    Threads,
}

/// Settings of a single search from a starting vertex.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Builder)]
pub struct SearchOptions {
    /// Longest path allowed before the search is aborted. `None` means
    /// the search is unbounded, which only terminates for admissible ideals.
    pub max_path_length: Option<usize>,

    #[builder(default = false)]
    pub detect_cancellativity_failure: bool,

    #[builder(default = false)]
    pub detect_weak_cancellativity_failure: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions::builder().build()
    }
}

impl SearchOptions {
    /// Check whether a path of `length` arrows exceeds the bound.
    #[must_use]
    pub fn exceeds_bound(&self, length: usize) -> bool {
        self.max_path_length.is_some_and(|max| length > max)
    }

    #[must_use]
    pub fn detects_any_cancellativity_failure(&self) -> bool {
        self.detect_cancellativity_failure || self.detect_weak_cancellativity_failure
    }
}
