//! Errors reported before any search begins: invalid configuration and
//! malformed ideal generators.
use thiserror::Error;

/// Errors of the self-injectivity engine.
///
/// Paths that grow beyond the configured bound and cancellativity failures
/// are not errors, they are reported as flags of
/// [`crate::search::ComputationResult`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Vertex is not part of the quiver.
    #[error("vertex {0} is not a vertex of the quiver")]
    UnknownVertex(String),

    /// Search was requested from a vertex the quiver does not contain.
    #[error("starting vertex {0} is not a vertex of the quiver")]
    UnknownStartingVertex(String),

    /// A path must visit at least one vertex.
    #[error("path must contain at least one vertex")]
    EmptyPath,

    /// Path uses an arrow the quiver does not have.
    #[error("path {0} is not a path in the quiver")]
    PathNotInQuiver(String),

    /// Both sides of a binomial relation must start and end at the same vertices.
    #[error("binomial generator {0} ~ {1} has mismatched endpoints")]
    MismatchedEndpoints(String, String),

    /// Path already has a replacement, i.e. it occurs in more than one binomial generator.
    #[error("path {0} occurs in more than one binomial generator")]
    AmbiguousReplacement(String),

    /// Stationary paths cannot be relations.
    #[error("generator {0} is a stationary path")]
    StationaryGenerator(String),
}

pub type Result<T> = std::result::Result<T, Error>;
