use crate::{errors::Error, quiver::Vertex, Result};
use std::fmt::Display;

/// Arrow of a quiver given by its source and target.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Arrow<V> {
    pub source: V,
    pub target: V,
}

impl<V: Vertex> Arrow<V> {
    #[must_use]
    pub fn new(source: V, target: V) -> Self {
        Arrow { source, target }
    }
}

/// Path in a quiver given by the sequence of visited vertices.
///
/// The first vertex is the starting vertex; a path visiting a single vertex
/// is the stationary path at that vertex and has length 0.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path<V> {
    vertices: Vec<V>,
}

impl<V: Vertex> Path<V> {
    /// Stationary path at `vertex`.
    #[must_use]
    pub fn stationary(vertex: V) -> Self {
        Path {
            vertices: vec![vertex],
        }
    }

    /// Create a path visiting `vertices` in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPath`] if `vertices` is empty.
    pub fn new(vertices: Vec<V>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(Error::EmptyPath);
        }

        Ok(Path { vertices })
    }

    #[doc(hidden)]
    #[must_use]
    pub fn from_vertices_unchecked(vertices: Vec<V>) -> Self {
        assert!(!vertices.is_empty(), "path must contain at least one vertex");
        Path { vertices }
    }

    /// Number of arrows of the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len() - 1
    }

    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.vertices.len() == 1
    }

    #[must_use]
    pub fn start(&self) -> &V {
        &self.vertices[0]
    }

    #[must_use]
    pub fn end(&self) -> &V {
        &self.vertices[self.vertices.len() - 1]
    }

    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Arrows of the path in order of traversal.
    pub fn arrows(&self) -> impl Iterator<Item = Arrow<V>> + '_ {
        self.vertices
            .windows(2)
            .map(|pair| Arrow::new(pair[0].clone(), pair[1].clone()))
    }

    /// Path followed by the arrow `end -> vertex`.
    #[must_use]
    pub fn extended(&self, vertex: V) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.push(vertex);
        Path { vertices }
    }
}

impl<V: Vertex + Display> Display for Path<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.vertices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ")
        )
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Arrow, Path};
    use crate::errors::Error;

    #[test]
    fn stationary_path() {
        let p = Path::stationary(4);
        assert_eq!(p.len(), 0);
        assert!(p.is_stationary());
        assert_eq!(p.start(), p.end());
        assert_eq!(p.arrows().count(), 0);
    }

    #[test]
    fn empty_path_is_rejected() {
        assert_eq!(Path::<u32>::new(Vec::new()), Err(Error::EmptyPath));
    }

    #[test]
    fn arrows_and_display() {
        let p = path![1, 2, 3];
        assert_eq!(p.len(), 2);
        assert_eq!(
            p.arrows().collect::<Vec<_>>(),
            vec![Arrow::new(1, 2), Arrow::new(2, 3)]
        );
        assert_eq!(p.to_string(), "1 -> 2 -> 3");
        assert_eq!(p.extended(1), path![1, 2, 3, 1]);
    }
}
