use crate::{
    errors::Error,
    quiver::{Path, Vertex},
    Result,
};
use rustc_hash::FxHashMap;

/// Directed multigraph given by its vertices and, for every vertex, the
/// targets of its outgoing arrows.
///
/// Every target stored in the adjacency lists is a vertex of the quiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiver<V: Vertex> {
    vertices: Vec<V>,
    adjacency: FxHashMap<V, Vec<V>>,
}

impl<V: Vertex> Default for Quiver<V> {
    fn default() -> Self {
        Quiver {
            vertices: Vec::new(),
            adjacency: FxHashMap::default(),
        }
    }
}

impl<V: Vertex> Quiver<V> {
    #[must_use]
    pub fn new() -> Self {
        Quiver::default()
    }

    /// Create a quiver with the given vertices and no arrows. Duplicate
    /// vertices are ignored.
    #[must_use]
    pub fn with_vertices(vertices: impl IntoIterator<Item = V>) -> Self {
        let mut quiver = Quiver::new();
        for vertex in vertices {
            quiver.add_vertex(vertex);
        }
        quiver
    }

    /// Add a vertex. Returns `false` if it was already present.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.adjacency.contains_key(&vertex) {
            return false;
        }

        self.adjacency.insert(vertex.clone(), Vec::new());
        self.vertices.push(vertex);
        true
    }

    /// Add an arrow `source -> target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVertex`] if either endpoint is not a vertex
    /// of the quiver.
    pub fn add_arrow(&mut self, source: V, target: V) -> Result<()> {
        if !self.contains_vertex(&target) {
            return Err(Error::UnknownVertex(format!("{target:?}")));
        }

        let Some(targets) = self.adjacency.get_mut(&source) else {
            return Err(Error::UnknownVertex(format!("{source:?}")));
        };

        targets.push(target);
        Ok(())
    }

    /// Vertices in the order they were added.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Targets of arrows going out of `vertex`, in the order they were added.
    /// Unknown vertices have no successors.
    #[must_use]
    pub fn successors(&self, vertex: &V) -> &[V] {
        self.adjacency.get(vertex).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    #[must_use]
    pub fn contains_arrow(&self, source: &V, target: &V) -> bool {
        self.successors(source).contains(target)
    }

    /// Check whether every arrow of `path` is an arrow of the quiver.
    #[must_use]
    pub fn contains_path(&self, path: &Path<V>) -> bool {
        self.contains_vertex(path.start())
            && path
                .vertices()
                .windows(2)
                .all(|pair| self.contains_arrow(&pair[0], &pair[1]))
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn arrow_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Position of `vertex` in [`Quiver::vertices`].
    #[must_use]
    pub fn vertex_position(&self, vertex: &V) -> Option<usize> {
        self.vertices.iter().position(|v| v == vertex)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Quiver;
    use crate::errors::Error;

    fn oriented_triangle() -> Quiver<u32> {
        let mut quiver = Quiver::with_vertices([1, 2, 3]);
        quiver.add_arrow(1, 2).unwrap();
        quiver.add_arrow(2, 3).unwrap();
        quiver.add_arrow(3, 1).unwrap();
        quiver
    }

    #[test]
    fn vertices_are_unique() {
        let mut quiver = Quiver::with_vertices([1, 2, 2, 3]);
        assert_eq!(quiver.vertices(), &[1, 2, 3]);
        assert!(!quiver.add_vertex(3));
        assert!(quiver.add_vertex(4));
        assert_eq!(quiver.vertex_count(), 4);
        assert_eq!(quiver.vertex_position(&4), Some(3));
    }

    #[test]
    fn arrows_require_known_endpoints() {
        let mut quiver = Quiver::with_vertices([1, 2]);
        assert_eq!(
            quiver.add_arrow(1, 5),
            Err(Error::UnknownVertex("5".to_string()))
        );
        assert_eq!(
            quiver.add_arrow(7, 1),
            Err(Error::UnknownVertex("7".to_string()))
        );
        assert_eq!(quiver.arrow_count(), 0);
    }

    #[test]
    fn successors_and_paths() {
        let quiver = oriented_triangle();
        assert_eq!(quiver.successors(&1), &[2]);
        assert_eq!(quiver.successors(&42), &[] as &[u32]);
        assert_eq!(quiver.arrow_count(), 3);

        assert!(quiver.contains_path(&path![1, 2, 3, 1, 2]));
        assert!(quiver.contains_path(&path![3]));
        assert!(!quiver.contains_path(&path![1, 3]));
        assert!(!quiver.contains_path(&path![4]));
    }
}
