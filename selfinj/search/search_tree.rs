use crate::quiver::{Path, Vertex};
use derive_more::derive::{Display, From};
use rustc_hash::FxHashMap;

/// Index of a node of the [`SearchTree`]. Stable for the lifetime of the tree.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord, From, Display)]
pub struct NodeIdx(pub(crate) usize);

#[derive(Debug, Clone)]
struct SearchTreeNode<V> {
    parent: Option<NodeIdx>,
    // Last vertex of the path; the starting vertex for the root.
    vertex: V,
    children: FxHashMap<V, NodeIdx>,
    length: usize,
}

/// Tree of all paths discovered from a fixed starting vertex.
///
/// Every node stands for exactly one path: the root is the stationary path
/// and a child extends its parent by one arrow. Children are only created
/// on demand.
#[derive(Debug, Clone)]
pub struct SearchTree<V> {
    nodes: Vec<SearchTreeNode<V>>,
}

impl<V: Vertex> SearchTree<V> {
    /// Tree consisting of the stationary path at `start`.
    #[must_use]
    pub fn new(start: V) -> Self {
        SearchTree {
            nodes: vec![SearchTreeNode {
                parent: None,
                vertex: start,
                children: FxHashMap::default(),
                length: 0,
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeIdx {
        NodeIdx(0)
    }

    /// Number of nodes in the tree, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn parent(&self, node: NodeIdx) -> Option<NodeIdx> {
        self.nodes[node.0].parent
    }

    /// Last vertex of the path of `node`.
    #[must_use]
    pub fn vertex(&self, node: NodeIdx) -> &V {
        &self.nodes[node.0].vertex
    }

    /// Number of arrows of the path of `node`.
    #[must_use]
    pub fn length(&self, node: NodeIdx) -> usize {
        self.nodes[node.0].length
    }

    #[must_use]
    pub fn child(&self, node: NodeIdx, vertex: &V) -> Option<NodeIdx> {
        self.nodes[node.0].children.get(vertex).copied()
    }

    /// Node of the path of `node` extended by the arrow to `vertex`.
    /// Returns the node and whether it had to be created.
    pub fn get_or_create_child(&mut self, node: NodeIdx, vertex: &V) -> (NodeIdx, bool) {
        if let Some(child) = self.child(node, vertex) {
            return (child, false);
        }

        let child = NodeIdx(self.nodes.len());
        let length = self.nodes[node.0].length + 1;
        self.nodes.push(SearchTreeNode {
            parent: Some(node),
            vertex: vertex.clone(),
            children: FxHashMap::default(),
            length,
        });
        self.nodes[node.0].children.insert(vertex.clone(), child);
        (child, true)
    }

    /// Nodes from `node` up to and including the root.
    pub fn walk_to_root(&self, node: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        std::iter::successors(Some(node), |node| self.parent(*node))
    }

    /// Nodes of every prefix of the path of `node`, the root first.
    #[must_use]
    pub fn ancestry(&self, node: NodeIdx) -> Vec<NodeIdx> {
        let mut ancestry: Vec<_> = self.walk_to_root(node).collect();
        ancestry.reverse();
        ancestry
    }

    /// Vertices visited by the path of `node`.
    #[must_use]
    pub fn vertices(&self, node: NodeIdx) -> Vec<V> {
        self.ancestry(node)
            .into_iter()
            .map(|node| self.vertex(node).clone())
            .collect()
    }

    #[must_use]
    pub fn path(&self, node: NodeIdx) -> Path<V> {
        Path::from_vertices_unchecked(self.vertices(node))
    }
}
