//! Outcome of a search from a single starting vertex.
use crate::quiver::{Path, Vertex};

/// Result of [`crate::search::MaximalNonzeroEquivalenceClassRepresentativeComputer::compute`].
///
/// The result owns its paths, the search tree they were read from is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputationResult<V> {
    /// One path per maximal nonzero equivalence class, in discovery order.
    /// Empty when the search was aborted or a cancellativity failure was
    /// detected.
    pub representatives: Vec<Path<V>>,

    /// A path longer than the configured maximum was met and the search
    /// was aborted.
    pub too_long_path_encountered: bool,

    pub cancellativity_failure_detected: bool,

    pub weak_cancellativity_failure_detected: bool,

    /// Longest path created during the search, aborted or not.
    pub longest_path_encountered: Path<V>,
}

impl<V: Vertex> ComputationResult<V> {
    /// Check whether the representatives are meaningful, i.e. the search was
    /// neither aborted nor stopped by a cancellativity failure.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.too_long_path_encountered
            && !self.cancellativity_failure_detected
            && !self.weak_cancellativity_failure_detected
    }

    /// The representative if there is exactly one maximal nonzero class.
    #[must_use]
    pub fn unique_representative(&self) -> Option<&Path<V>> {
        match self.representatives.as_slice() {
            [representative] if self.is_complete() => Some(representative),
            _ => None,
        }
    }
}
