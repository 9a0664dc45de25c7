use crate::{
    disjoint_set::DisjointSet,
    errors::Error,
    quiver::{Path, Quiver, Vertex},
    rules::TransformationRuleTree,
    search::{options::SearchOptions, ComputationResult, NodeIdx, SearchTree},
    Result,
};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Element of the equivalence classes: either a path of the search tree or
/// the sentinel standing for the zero path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ClassMember {
    Zero,
    Node(NodeIdx),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classification {
    Zero,
    Nonzero,
}

/// How far the inner search got with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Discovery {
    Unseen,
    SeenThisSearch,
    Classified(Classification),
}

/// A path longer than [`SearchOptions::max_path_length`] was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LengthBoundExceeded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchState {
    NotStarted,
    Searching,
    Aborted,
    Completed,
    CancellativityChecked { passed: bool },
}

impl SearchState {
    fn can_transition(self, next: SearchState) -> bool {
        match self {
            SearchState::NotStarted => next == SearchState::Searching,
            SearchState::Searching => {
                matches!(next, SearchState::Aborted | SearchState::Completed)
            }
            SearchState::Completed => {
                matches!(
                    next,
                    SearchState::Aborted | SearchState::CancellativityChecked { .. }
                )
            }
            SearchState::Aborted | SearchState::CancellativityChecked { .. } => false,
        }
    }
}

/// Computes one representative path for every maximal nonzero equivalence
/// class of paths starting at a vertex.
///
/// The quiver and the rules are only read, so one computer (or several
/// sharing the same inputs) can serve any number of starting vertices,
/// also from different threads.
///
/// ```
/// use selfinj::{path, quiver::Quiver, rules::TransformationRuleTree};
/// use selfinj::search::{options::SearchOptions, MaximalNonzeroEquivalenceClassRepresentativeComputer};
///
/// let mut quiver = Quiver::with_vertices([1, 2, 3]);
/// quiver.add_arrow(1, 2).unwrap();
/// quiver.add_arrow(2, 3).unwrap();
/// quiver.add_arrow(3, 1).unwrap();
///
/// let mut rules = TransformationRuleTree::new();
/// rules.add_monomial(&path![1, 2, 3, 1]).unwrap();
///
/// let options = SearchOptions::default();
/// let computer = MaximalNonzeroEquivalenceClassRepresentativeComputer::new(&quiver, &rules, &options);
/// let result = computer.compute(&1).unwrap();
/// assert_eq!(result.representatives, vec![path![1, 2, 3]]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MaximalNonzeroEquivalenceClassRepresentativeComputer<'a, V: Vertex> {
    quiver: &'a Quiver<V>,
    rules: &'a TransformationRuleTree<V>,
    options: &'a SearchOptions,
}

impl<'a, V: Vertex> MaximalNonzeroEquivalenceClassRepresentativeComputer<'a, V> {
    #[must_use]
    pub fn new(
        quiver: &'a Quiver<V>,
        rules: &'a TransformationRuleTree<V>,
        options: &'a SearchOptions,
    ) -> Self {
        MaximalNonzeroEquivalenceClassRepresentativeComputer {
            quiver,
            rules,
            options,
        }
    }

    /// Search all paths starting at `starting_vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownStartingVertex`] if the vertex is not part of
    /// the quiver. Paths exceeding the length bound and cancellativity
    /// failures are reported in the returned [`ComputationResult`].
    #[tracing::instrument(skip(self), fields(max_path_length = ?self.options.max_path_length))]
    pub fn compute(&self, starting_vertex: &V) -> Result<ComputationResult<V>> {
        if !self.quiver.contains_vertex(starting_vertex) {
            return Err(Error::UnknownStartingVertex(format!("{starting_vertex:?}")));
        }

        let search = Search::new(
            self.quiver,
            self.rules,
            self.options,
            starting_vertex.clone(),
        );
        Ok(search.run())
    }
}

/// State of the search from one starting vertex. Dropped once the result
/// has been extracted.
pub(crate) struct Search<'a, V: Vertex> {
    quiver: &'a Quiver<V>,
    rules: &'a TransformationRuleTree<V>,
    pub(super) options: &'a SearchOptions,

    pub(super) tree: SearchTree<V>,
    pub(super) classes: DisjointSet<ClassMember>,
    // Indexed by `NodeIdx`. `None` until an inner search has finished with the node.
    pub(super) classification: Vec<Option<Classification>>,

    longest: NodeIdx,
    state: SearchState,
}

impl<'a, V: Vertex> Search<'a, V> {
    pub(crate) fn new(
        quiver: &'a Quiver<V>,
        rules: &'a TransformationRuleTree<V>,
        options: &'a SearchOptions,
        starting_vertex: V,
    ) -> Self {
        let tree = SearchTree::new(starting_vertex);
        let root = tree.root();

        let mut classes = DisjointSet::new();
        classes.make_set(ClassMember::Zero);
        classes.make_set(ClassMember::Node(root));

        Search {
            quiver,
            rules,
            options,
            tree,
            classes,
            classification: vec![None],
            longest: root,
            state: SearchState::NotStarted,
        }
    }

    pub(crate) fn run(mut self) -> ComputationResult<V> {
        self.transition(SearchState::Searching);

        let Ok(maximal) = self.outer_search() else {
            self.transition(SearchState::Aborted);
            debug!(
                longest = self.tree.length(self.longest),
                nodes = self.tree.node_count(),
                "path exceeded the length bound, search aborted"
            );
            return self.result(Vec::new(), false, false);
        };
        self.transition(SearchState::Completed);
        debug!(
            maximal = maximal.len(),
            nodes = self.tree.node_count(),
            "search completed"
        );

        if self.options.detects_any_cancellativity_failure() {
            match self.detect_cancellativity_failures() {
                // Classifying prefixes for the checks may still create new paths.
                Err(LengthBoundExceeded) => {
                    self.transition(SearchState::Aborted);
                    return self.result(Vec::new(), false, false);
                }
                Ok(report) => {
                    let passed =
                        !report.cancellativity_failure && !report.weak_cancellativity_failure;
                    self.transition(SearchState::CancellativityChecked { passed });
                    if !passed {
                        return self.result(
                            Vec::new(),
                            report.cancellativity_failure,
                            report.weak_cancellativity_failure,
                        );
                    }
                }
            }
        }

        let representatives = self.representatives(&maximal);
        self.result(representatives, false, false)
    }

    fn transition(&mut self, next: SearchState) {
        debug_assert!(
            self.state.can_transition(next),
            "invalid search state transition {:?} -> {next:?}",
            self.state
        );
        debug!(from = ?self.state, to = ?next, "search state changed");
        self.state = next;
    }

    /// Walk the tree of nonzero paths and collect the nodes none of whose
    /// extensions by one arrow is nonzero.
    pub(super) fn outer_search(
        &mut self,
    ) -> std::result::Result<Vec<NodeIdx>, LengthBoundExceeded> {
        let quiver = self.quiver;
        let root = self.tree.root();
        self.classification[root.0] = Some(Classification::Nonzero);

        let mut maximal = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let successors = quiver.successors(self.tree.vertex(node));
            let mut is_maximal = true;

            for (idx, successor) in successors.iter().enumerate() {
                // Parallel arrows lead to the same child.
                if successors[..idx].contains(successor) {
                    continue;
                }

                let child = self.child(node, successor);
                self.check_length(child)?;

                if self.classify(child)? == Classification::Nonzero {
                    is_maximal = false;
                    stack.push(child);
                }
            }

            if is_maximal {
                maximal.push(node);
            }
        }

        Ok(maximal)
    }

    /// Decide whether the path of `start` vanishes, merging every path it
    /// can be rewritten to into its class.
    pub(super) fn classify(
        &mut self,
        start: NodeIdx,
    ) -> std::result::Result<Classification, LengthBoundExceeded> {
        if let Some(classification) = self.classification[start.0] {
            return Ok(classification);
        }

        let mut seen = FxHashSet::default();
        seen.insert(start);
        let mut stack = vec![start];

        let verdict = loop {
            let Some(node) = stack.pop() else {
                break Classification::Nonzero;
            };

            if self.rewrite(node, &mut seen, &mut stack)? == Classification::Zero {
                break Classification::Zero;
            }
        };

        for node in &seen {
            self.classification[node.0] = Some(verdict);
        }

        trace!(node = %start, ?verdict, class_size = seen.len(), "classified path");
        Ok(verdict)
    }

    /// Try every rule on every subpath of `node`. Returns
    /// [`Classification::Zero`] as soon as the node is known to vanish;
    /// otherwise pushes the newly reached rewrites of `node` onto `stack`.
    fn rewrite(
        &mut self,
        node: NodeIdx,
        seen: &mut FxHashSet<NodeIdx>,
        stack: &mut Vec<NodeIdx>,
    ) -> std::result::Result<Classification, LengthBoundExceeded> {
        let rules = self.rules;
        let ancestry = self.tree.ancestry(node);
        let vertices: Vec<V> = ancestry
            .iter()
            .map(|ancestor| self.tree.vertex(*ancestor).clone())
            .collect();

        // The subpath `vertices[start..=end]` is matched against the trie
        // from its last vertex backwards.
        for end in (0..vertices.len()).rev() {
            let mut rule = rules.root();
            for start in (0..=end).rev() {
                let Some(next) = rules.child(rule, &vertices[start]) else {
                    break;
                };
                rule = next;

                if rules.can_be_killed(rule) {
                    trace!(node = %node, start, end, "subpath vanishes");
                    self.union(node, ClassMember::Zero);
                    return Ok(Classification::Zero);
                }

                let Some(replacement) = rules.replacement(rule) else {
                    continue;
                };

                let transformed = self.splice(ancestry[start], replacement, &vertices[end + 1..]);
                self.check_length(transformed)?;

                match self.discovery(transformed, seen) {
                    Discovery::Classified(Classification::Zero) => {
                        trace!(node = %node, %transformed, "rewrites to a vanishing path");
                        self.union(node, ClassMember::Node(transformed));
                        return Ok(Classification::Zero);
                    }
                    Discovery::SeenThisSearch => {}
                    Discovery::Unseen | Discovery::Classified(Classification::Nonzero) => {
                        trace!(node = %node, %transformed, start, end, "subpath rewritten");
                        self.union(node, ClassMember::Node(transformed));
                        seen.insert(transformed);
                        stack.push(transformed);
                    }
                }
            }
        }

        Ok(Classification::Nonzero)
    }

    /// Node of the path `prefix . replacement . suffix` where `prefix` ends
    /// where `replacement` starts. Missing nodes are created on the way.
    fn splice(&mut self, prefix: NodeIdx, replacement: &Path<V>, suffix: &[V]) -> NodeIdx {
        debug_assert_eq!(self.tree.vertex(prefix), replacement.start());

        replacement.vertices()[1..]
            .iter()
            .chain(suffix)
            .fold(prefix, |node, vertex| self.child(node, vertex))
    }

    pub(super) fn discovery(&self, node: NodeIdx, seen: &FxHashSet<NodeIdx>) -> Discovery {
        match self.classification[node.0] {
            Some(classification) => Discovery::Classified(classification),
            None if seen.contains(&node) => Discovery::SeenThisSearch,
            None => Discovery::Unseen,
        }
    }

    /// Child of `node` along the arrow to `vertex`, registered in the
    /// equivalence classes when it is new.
    fn child(&mut self, node: NodeIdx, vertex: &V) -> NodeIdx {
        let (child, created) = self.tree.get_or_create_child(node, vertex);
        if created {
            self.classes.make_set(ClassMember::Node(child));
            self.classification.push(None);
            debug_assert_eq!(self.classification.len(), self.tree.node_count());
        }
        child
    }

    /// Record `node` as the longest path if it is, then enforce the bound.
    pub(super) fn check_length(
        &mut self,
        node: NodeIdx,
    ) -> std::result::Result<(), LengthBoundExceeded> {
        let length = self.tree.length(node);
        if length > self.tree.length(self.longest) {
            self.longest = node;
        }

        if self.options.exceeds_bound(length) {
            return Err(LengthBoundExceeded);
        }

        Ok(())
    }

    fn union(&mut self, node: NodeIdx, other: ClassMember) {
        self.classes
            .union(&ClassMember::Node(node), &other)
            .expect("every node of the search tree is registered in the classes");
    }

    /// Representative of the class of `node`.
    pub(super) fn class_of(&mut self, node: NodeIdx) -> ClassMember {
        self.classes
            .find(&ClassMember::Node(node))
            .expect("every node of the search tree is registered in the classes")
    }

    /// One node per class of the `maximal` nodes, in order of first
    /// appearance.
    fn representatives(&mut self, maximal: &[NodeIdx]) -> Vec<Path<V>> {
        let mut recorded = FxHashSet::default();
        let mut representatives = Vec::new();

        for node in maximal {
            let ClassMember::Node(representative) = self.class_of(*node) else {
                unreachable!("maximal paths are nonzero");
            };

            if recorded.insert(representative) {
                representatives.push(self.tree.path(representative));
            }
        }

        representatives
    }

    fn result(
        &self,
        representatives: Vec<Path<V>>,
        cancellativity_failure_detected: bool,
        weak_cancellativity_failure_detected: bool,
    ) -> ComputationResult<V> {
        ComputationResult {
            representatives,
            too_long_path_encountered: self.state == SearchState::Aborted,
            cancellativity_failure_detected,
            weak_cancellativity_failure_detected,
            longest_path_encountered: self.tree.path(self.longest),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{
        ClassMember, Classification, MaximalNonzeroEquivalenceClassRepresentativeComputer, Search,
    };
    use crate::{
        errors::Error,
        quiver::Quiver,
        rules::TransformationRuleTree,
        search::{options::SearchOptions, NodeIdx},
    };

    fn oriented_cycle(length: u32) -> Quiver<u32> {
        let mut quiver = Quiver::with_vertices(1..=length);
        for vertex in 1..=length {
            quiver.add_arrow(vertex, vertex % length + 1).unwrap();
        }
        quiver
    }

    fn commutative_square() -> (Quiver<u32>, TransformationRuleTree<u32>) {
        let mut quiver = Quiver::with_vertices([1, 2, 3, 4]);
        for (source, target) in [(1, 2), (1, 3), (2, 4), (3, 4)] {
            quiver.add_arrow(source, target).unwrap();
        }

        let mut rules = TransformationRuleTree::new();
        rules.add_binomial(&path![1, 2, 4], &path![1, 3, 4]).unwrap();
        (quiver, rules)
    }

    fn node_of(search: &Search<'_, u32>, vertices: &[u32]) -> NodeIdx {
        vertices[1..]
            .iter()
            .try_fold(search.tree.root(), |node, vertex| {
                search.tree.child(node, vertex)
            })
            .unwrap()
    }

    #[test]
    fn unknown_starting_vertex() {
        let quiver = oriented_cycle(3);
        let rules = TransformationRuleTree::new();
        let options = SearchOptions::default();
        let computer =
            MaximalNonzeroEquivalenceClassRepresentativeComputer::new(&quiver, &rules, &options);

        assert_eq!(
            computer.compute(&7),
            Err(Error::UnknownStartingVertex("7".to_string()))
        );
    }

    #[test]
    fn kill_cycle_at_starting_vertex() {
        let quiver = oriented_cycle(3);
        let mut rules = TransformationRuleTree::new();
        rules.add_monomial(&path![1, 2, 3, 1]).unwrap();
        let options = SearchOptions::default();
        let computer =
            MaximalNonzeroEquivalenceClassRepresentativeComputer::new(&quiver, &rules, &options);

        let result = computer.compute(&1).unwrap();
        assert_eq!(result.representatives, vec![path![1, 2, 3]]);
        assert!(result.is_complete());
        assert_eq!(result.longest_path_encountered, path![1, 2, 3, 1]);
    }

    #[test]
    fn sink_is_its_own_representative() {
        let quiver = Quiver::with_vertices(['a']);
        let rules = TransformationRuleTree::new();
        let options = SearchOptions::default();
        let computer =
            MaximalNonzeroEquivalenceClassRepresentativeComputer::new(&quiver, &rules, &options);

        let result = computer.compute(&'a').unwrap();
        assert_eq!(result.representatives, vec![path!['a']]);
        assert_eq!(result.longest_path_encountered, path!['a']);
    }

    #[test]
    fn commutativity_merges_parallel_routes() {
        let (quiver, rules) = commutative_square();
        let options = SearchOptions::default();
        let mut search = Search::new(&quiver, &rules, &options, 1);

        let maximal = search.outer_search().unwrap();
        // Both routes to 4 are maximal but they form one class.
        assert_eq!(maximal.len(), 2);

        let upper = node_of(&search, &[1, 2, 4]);
        let lower = node_of(&search, &[1, 3, 4]);
        assert_eq!(search.class_of(upper), search.class_of(lower));
        assert_ne!(
            search.class_of(node_of(&search, &[1, 2])),
            search.class_of(node_of(&search, &[1, 3]))
        );

        let representatives = search.representatives(&maximal);
        assert_eq!(representatives.len(), 1);
        assert!(representatives[0] == path![1, 2, 4] || representatives[0] == path![1, 3, 4]);
    }

    #[test]
    fn splicing_keeps_trailing_path() {
        // 1 -> 2 -> 4 -> 5 and 1 -> 3 -> 4 -> 5 with 1,2,4 ~ 1,3,4.
        let (mut quiver, rules) = commutative_square();
        quiver.add_vertex(5);
        quiver.add_arrow(4, 5).unwrap();
        let options = SearchOptions::default();
        let mut search = Search::new(&quiver, &rules, &options, 1);

        let maximal = search.outer_search().unwrap();
        let upper = node_of(&search, &[1, 2, 4, 5]);
        let lower = node_of(&search, &[1, 3, 4, 5]);
        assert_eq!(search.class_of(upper), search.class_of(lower));

        // Sibling prefixes keep their own classes.
        assert_ne!(
            search.class_of(node_of(&search, &[1, 2])),
            search.class_of(node_of(&search, &[1, 3]))
        );
        assert_eq!(search.representatives(&maximal).len(), 1);
    }

    #[test]
    fn replacement_into_vanishing_path() {
        // 1,2,4 ~ 1,3,4 and 3,4 = 0 make 1,2,4 vanish as well.
        let (quiver, mut rules) = commutative_square();
        rules.add_monomial(&path![3, 4]).unwrap();
        let options = SearchOptions::default();
        let computer =
            MaximalNonzeroEquivalenceClassRepresentativeComputer::new(&quiver, &rules, &options);

        let result = computer.compute(&1).unwrap();
        assert_eq!(result.representatives, vec![path![1, 3], path![1, 2]]);
    }

    #[test]
    fn classification_is_idempotent() {
        let quiver = oriented_cycle(3);
        let mut rules = TransformationRuleTree::new();
        rules.add_monomial(&path![1, 2, 3, 1]).unwrap();
        let options = SearchOptions::default();
        let mut search = Search::new(&quiver, &rules, &options, 1);
        search.outer_search().unwrap();

        let vanishing = node_of(&search, &[1, 2, 3, 1]);
        let nodes = search.tree.node_count();
        let class = search.class_of(vanishing);

        assert_eq!(search.classify(vanishing), Ok(Classification::Zero));
        assert_eq!(search.classify(vanishing), Ok(Classification::Zero));
        assert_eq!(search.tree.node_count(), nodes);
        assert_eq!(search.class_of(vanishing), class);
        assert_eq!(
            search.classify(node_of(&search, &[1, 2, 3])),
            Ok(Classification::Nonzero)
        );
    }

    #[test]
    fn classes_agree_with_classification() {
        // 1,2,4 ~ 1,3,4 and 3,4,5 = 0: both routes to 5 vanish.
        let (mut quiver, mut rules) = commutative_square();
        quiver.add_vertex(5);
        quiver.add_arrow(4, 5).unwrap();
        rules.add_monomial(&path![3, 4, 5]).unwrap();
        let options = SearchOptions::default();
        let mut search = Search::new(&quiver, &rules, &options, 1);
        search.outer_search().unwrap();

        let zero = search.classes.find(&ClassMember::Zero).unwrap();
        for class in search.classes.classes() {
            let root = search.classes.find(&class[0]).unwrap();
            let expected = if root == zero {
                Classification::Zero
            } else {
                Classification::Nonzero
            };

            for member in &class {
                assert_eq!(search.classes.find(member), Some(root));
                if let ClassMember::Node(node) = member {
                    if let Some(classification) = search.classification[node.0] {
                        assert_eq!(classification, expected);
                    }
                }
            }
        }

        let upper = node_of(&search, &[1, 2, 4, 5]);
        assert!(search
            .classes
            .same_set(&ClassMember::Node(upper), &ClassMember::Zero));
    }

    #[test]
    fn representatives_follow_the_checks() {
        let checks = SearchOptions::builder()
            .detect_cancellativity_failure(true)
            .detect_weak_cancellativity_failure(true)
            .build();

        let (quiver, rules) = commutative_square();
        let checked = Search::new(&quiver, &rules, &checks, 1).run();
        let unchecked = Search::new(&quiver, &rules, &SearchOptions::default(), 1).run();
        assert!(checked.is_complete());
        assert_eq!(checked.representatives.len(), 1);
        assert_eq!(checked.representatives, unchecked.representatives);

        // 1,2,3,5 ~ 1,4,3,5 with 1,2,3 and 1,4,3 apart fails both checks.
        let mut quiver = Quiver::with_vertices([1, 2, 3, 4, 5]);
        for (source, target) in [(1, 2), (2, 3), (1, 4), (4, 3), (3, 5)] {
            quiver.add_arrow(source, target).unwrap();
        }
        let mut rules = TransformationRuleTree::new();
        rules
            .add_binomial(&path![1, 2, 3, 5], &path![1, 4, 3, 5])
            .unwrap();
        let failed = Search::new(&quiver, &rules, &checks, 1).run();
        assert!(failed.cancellativity_failure_detected);
        assert!(failed.weak_cancellativity_failure_detected);
        assert!(failed.representatives.is_empty());
        assert_eq!(failed.longest_path_encountered.len(), 3);
    }

    #[test]
    fn length_bound_aborts_inner_search() {
        // The route through 5 is longer than the bound allows.
        let mut quiver = Quiver::with_vertices([1, 2, 3, 4, 5]);
        for (source, target) in [(1, 2), (2, 4), (1, 3), (3, 5), (5, 4)] {
            quiver.add_arrow(source, target).unwrap();
        }
        let mut rules = TransformationRuleTree::new();
        rules.add_binomial(&path![1, 2, 4], &path![1, 3, 5, 4]).unwrap();
        let options = SearchOptions::builder().max_path_length(2).build();
        let computer =
            MaximalNonzeroEquivalenceClassRepresentativeComputer::new(&quiver, &rules, &options);

        let result = computer.compute(&1).unwrap();
        assert!(result.too_long_path_encountered);
        assert!(result.representatives.is_empty());
        assert_eq!(result.longest_path_encountered, path![1, 3, 5, 4]);
    }
}
