//! Quivers (directed multigraphs) and paths in them.
#[allow(clippy::module_inception)]
mod quiver;
mod path;

pub use crate::quiver::path::*;
pub use crate::quiver::quiver::*;

use std::{fmt::Debug, hash::Hash};

/// Vertex of a quiver. Any cloneable, totally ordered and hashable value
/// qualifies.
pub trait Vertex: Clone + Eq + Ord + Hash + Debug {}

impl<T: Clone + Eq + Ord + Hash + Debug> Vertex for T {}
