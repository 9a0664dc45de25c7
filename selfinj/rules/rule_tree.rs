use crate::{
    errors::Error,
    quiver::{Path, Vertex},
    Result,
};
use derive_more::derive::{Display, From};
use rustc_hash::FxHashMap;

/// Index of a node of the [`TransformationRuleTree`].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord, From, Display)]
pub struct RuleNodeIdx(pub(crate) usize);

#[derive(Debug, Clone)]
struct RuleNode<V> {
    can_be_killed: bool,
    replacement: Option<Path<V>>,
    children: FxHashMap<V, RuleNodeIdx>,
}

impl<V> Default for RuleNode<V> {
    fn default() -> Self {
        RuleNode {
            can_be_killed: false,
            replacement: None,
            children: FxHashMap::default(),
        }
    }
}

/// Trie over reversed generator paths.
///
/// Walking the trie from the root along the vertices of a subpath, last
/// vertex first, ends in a node telling whether that subpath vanishes
/// (`can_be_killed`) or may be rewritten to another path (`replacement`).
/// The root stands for the empty suffix.
#[derive(Debug, Clone)]
pub struct TransformationRuleTree<V> {
    nodes: Vec<RuleNode<V>>,
}

impl<V: Vertex> Default for TransformationRuleTree<V> {
    fn default() -> Self {
        TransformationRuleTree {
            nodes: vec![RuleNode::default()],
        }
    }
}

impl<V: Vertex> TransformationRuleTree<V> {
    /// Empty rule tree: no path vanishes and no path is rewritten.
    #[must_use]
    pub fn new() -> Self {
        TransformationRuleTree::default()
    }

    /// Declare `path` zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StationaryGenerator`] for paths of length 0.
    pub fn add_monomial(&mut self, path: &Path<V>) -> Result<()> {
        if path.is_stationary() {
            return Err(Error::StationaryGenerator(format!("{:?}", path.vertices())));
        }

        let node = self.insert(path);
        self.nodes[node.0].can_be_killed = true;
        Ok(())
    }

    /// Declare `fst` and `snd` equal up to sign: each one may be rewritten
    /// to the other.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * the two paths differ in their starting or ending vertex,
    /// * either path is stationary,
    /// * either path already occurs in another binomial generator.
    pub fn add_binomial(&mut self, fst: &Path<V>, snd: &Path<V>) -> Result<()> {
        if fst.start() != snd.start() || fst.end() != snd.end() {
            return Err(Error::MismatchedEndpoints(
                format!("{:?}", fst.vertices()),
                format!("{:?}", snd.vertices()),
            ));
        }

        for path in [fst, snd] {
            if path.is_stationary() {
                return Err(Error::StationaryGenerator(format!("{:?}", path.vertices())));
            }
            if self.replacement_of(path).is_some() {
                return Err(Error::AmbiguousReplacement(format!("{:?}", path.vertices())));
            }
        }

        if fst == snd {
            return Err(Error::AmbiguousReplacement(format!("{:?}", fst.vertices())));
        }

        let node = self.insert(fst);
        self.nodes[node.0].replacement = Some(snd.clone());
        let node = self.insert(snd);
        self.nodes[node.0].replacement = Some(fst.clone());
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> RuleNodeIdx {
        RuleNodeIdx(0)
    }

    /// Node reached from `node` by consuming `vertex`.
    #[must_use]
    pub fn child(&self, node: RuleNodeIdx, vertex: &V) -> Option<RuleNodeIdx> {
        self.nodes[node.0].children.get(vertex).copied()
    }

    #[must_use]
    pub fn can_be_killed(&self, node: RuleNodeIdx) -> bool {
        self.nodes[node.0].can_be_killed
    }

    #[must_use]
    pub fn replacement(&self, node: RuleNodeIdx) -> Option<&Path<V>> {
        self.nodes[node.0].replacement.as_ref()
    }

    /// Number of trie nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether no rule has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Trie node of exactly `path`, if `path` was inserted or is a suffix of
    /// an inserted path.
    #[must_use]
    pub fn lookup(&self, path: &Path<V>) -> Option<RuleNodeIdx> {
        path.vertices()
            .iter()
            .rev()
            .try_fold(self.root(), |node, vertex| self.child(node, vertex))
    }

    #[must_use]
    pub fn is_killed(&self, path: &Path<V>) -> bool {
        self.lookup(path)
            .is_some_and(|node| self.can_be_killed(node))
    }

    #[must_use]
    pub fn replacement_of(&self, path: &Path<V>) -> Option<&Path<V>> {
        self.lookup(path).and_then(|node| self.replacement(node))
    }

    fn insert(&mut self, path: &Path<V>) -> RuleNodeIdx {
        let mut node = self.root();
        for vertex in path.vertices().iter().rev() {
            node = match self.child(node, vertex) {
                Some(child) => child,
                None => {
                    let child = RuleNodeIdx(self.nodes.len());
                    self.nodes.push(RuleNode::default());
                    self.nodes[node.0].children.insert(vertex.clone(), child);
                    child
                }
            };
        }
        node
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::TransformationRuleTree;
    use crate::errors::Error;

    #[test]
    fn empty_tree() {
        let tree = TransformationRuleTree::<u32>::new();
        assert!(tree.is_empty());
        assert_eq!(tree.lookup(&path![1, 2]), None);
        assert_eq!(tree.lookup(&path![1]), None);
    }

    #[test]
    fn monomial_is_keyed_by_reversed_path() {
        let mut tree = TransformationRuleTree::new();
        tree.add_monomial(&path![1, 2, 3, 1]).unwrap();

        // root + one node per vertex
        assert_eq!(tree.len(), 5);
        assert!(tree.is_killed(&path![1, 2, 3, 1]));
        // Suffixes exist in the trie but are not killed themselves.
        assert!(tree.lookup(&path![3, 1]).is_some());
        assert!(!tree.is_killed(&path![3, 1]));
        // Prefixes are not part of the trie at all.
        assert_eq!(tree.lookup(&path![1, 2, 3]), None);

        let root = tree.root();
        let last = tree.child(root, &1).unwrap();
        assert_eq!(tree.child(root, &3), None);
        assert!(tree.child(last, &3).is_some());
    }

    #[test]
    fn binomial_is_symmetric() {
        let mut tree = TransformationRuleTree::new();
        tree.add_binomial(&path![1, 2, 4], &path![1, 3, 4]).unwrap();

        assert_eq!(tree.replacement_of(&path![1, 2, 4]), Some(&path![1, 3, 4]));
        assert_eq!(tree.replacement_of(&path![1, 3, 4]), Some(&path![1, 2, 4]));
        assert!(!tree.is_killed(&path![1, 2, 4]));
    }

    #[test]
    fn shared_suffixes_share_nodes() {
        let mut tree = TransformationRuleTree::new();
        tree.add_monomial(&path![1, 2, 3]).unwrap();
        tree.add_monomial(&path![4, 2, 3]).unwrap();

        // root, 3, 2, 1, 4
        assert_eq!(tree.len(), 5);
        assert!(tree.is_killed(&path![1, 2, 3]));
        assert!(tree.is_killed(&path![4, 2, 3]));
    }

    #[test]
    fn mismatched_endpoints_are_rejected() {
        let mut tree = TransformationRuleTree::new();
        assert_eq!(
            tree.add_binomial(&path![1, 2], &path![1]),
            Err(Error::MismatchedEndpoints(
                "[1, 2]".to_string(),
                "[1]".to_string()
            ))
        );
        assert!(matches!(
            tree.add_binomial(&path![1, 2, 4], &path![5, 3, 4]),
            Err(Error::MismatchedEndpoints(..))
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn path_in_two_binomials_is_rejected() {
        let mut tree = TransformationRuleTree::new();
        tree.add_binomial(&path![1, 2, 4], &path![1, 3, 4]).unwrap();
        assert!(matches!(
            tree.add_binomial(&path![1, 5, 4], &path![1, 3, 4]),
            Err(Error::AmbiguousReplacement(..))
        ));
        assert!(matches!(
            tree.add_binomial(&path![1, 6, 4], &path![1, 6, 4]),
            Err(Error::AmbiguousReplacement(..))
        ));
        // The rejected generator must not have touched the existing rule.
        assert_eq!(tree.replacement_of(&path![1, 3, 4]), Some(&path![1, 2, 4]));
        assert_eq!(tree.replacement_of(&path![1, 5, 4]), None);
    }

    #[test]
    fn stationary_generators_are_rejected() {
        let mut tree = TransformationRuleTree::new();
        assert!(matches!(
            tree.add_monomial(&path![2]),
            Err(Error::StationaryGenerator(..))
        ));
        assert!(matches!(
            tree.add_binomial(&path![2], &path![2]),
            Err(Error::StationaryGenerator(..))
        ));
    }
}
