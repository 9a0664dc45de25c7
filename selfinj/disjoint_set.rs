//! Disjoint-set (union-find) over arbitrary hashable elements.
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Partition of elements into equivalence classes.
///
/// Elements are mapped to dense slots on [`DisjointSet::make_set`]. Classes
/// are merged by rank and [`DisjointSet::find`] halves the paths it walks.
/// Once two elements share a class they do so forever.
#[derive(Debug, Clone)]
pub struct DisjointSet<T> {
    slots: FxHashMap<T, usize>,
    elements: Vec<T>,
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl<T> Default for DisjointSet<T> {
    fn default() -> Self {
        DisjointSet {
            slots: FxHashMap::default(),
            elements: Vec::new(),
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> DisjointSet<T> {
    #[must_use]
    pub fn new() -> Self {
        DisjointSet::default()
    }

    /// Put `element` into its own singleton class. Returns `false` if the
    /// element is already known, in which case its class is left untouched.
    pub fn make_set(&mut self, element: T) -> bool {
        if self.slots.contains_key(&element) {
            return false;
        }

        let slot = self.elements.len();
        self.slots.insert(element, slot);
        self.elements.push(element);
        self.parent.push(slot);
        self.rank.push(0);
        true
    }

    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.slots.contains_key(element)
    }

    /// Number of elements (not classes).
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Representative of the class of `element`, compressing the walked path.
    pub fn find(&mut self, element: &T) -> Option<T> {
        let slot = *self.slots.get(element)?;
        let root = self.find_slot(slot);
        Some(self.elements[root])
    }

    /// Representative of the class of `element` without touching the structure.
    #[must_use]
    pub fn find_immutable(&self, element: &T) -> Option<T> {
        let mut slot = *self.slots.get(element)?;
        while self.parent[slot] != slot {
            slot = self.parent[slot];
        }
        Some(self.elements[slot])
    }

    /// Merge classes of `fst` and `snd` and return the representative of the
    /// merged class, or `None` if either element is unknown.
    pub fn union(&mut self, fst: &T, snd: &T) -> Option<T> {
        let fst = self.find_slot(*self.slots.get(fst)?);
        let snd = self.find_slot(*self.slots.get(snd)?);

        if fst == snd {
            return Some(self.elements[fst]);
        }

        let root = match self.rank[fst].cmp(&self.rank[snd]) {
            std::cmp::Ordering::Less => {
                self.parent[fst] = snd;
                snd
            }
            std::cmp::Ordering::Greater => {
                self.parent[snd] = fst;
                fst
            }
            std::cmp::Ordering::Equal => {
                // Ties keep the older slot as the root so that representatives
                // do not depend on argument order.
                let (root, child) = if fst < snd { (fst, snd) } else { (snd, fst) };
                self.parent[child] = root;
                self.rank[root] += 1;
                root
            }
        };

        Some(self.elements[root])
    }

    /// Check whether both elements are known and share a class.
    pub fn same_set(&mut self, fst: &T, snd: &T) -> bool {
        match (self.find(fst), self.find(snd)) {
            (Some(fst), Some(snd)) => fst == snd,
            _ => false,
        }
    }

    /// Enumerate all current classes. Members keep insertion order and
    /// classes are ordered by their oldest member.
    #[must_use]
    pub fn classes(&self) -> Vec<Vec<T>> {
        let mut class_of_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut classes: Vec<Vec<T>> = Vec::new();

        for (slot, element) in self.elements.iter().enumerate() {
            let mut root = slot;
            while self.parent[root] != root {
                root = self.parent[root];
            }

            let class = *class_of_root.entry(root).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });
            classes[class].push(*element);
        }

        classes
    }

    fn find_slot(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            let grandparent = self.parent[self.parent[slot]];
            self.parent[slot] = grandparent;
            slot = grandparent;
        }
        slot
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::DisjointSet;

    #[test]
    fn singletons() {
        let mut set = DisjointSet::new();
        assert!(set.make_set('a'));
        assert!(set.make_set('b'));
        assert!(!set.make_set('a'));

        assert_eq!(set.len(), 2);
        assert_eq!(set.find(&'a'), Some('a'));
        assert_eq!(set.find(&'b'), Some('b'));
        assert_eq!(set.find(&'c'), None);
        assert!(!set.same_set(&'a', &'b'));
    }

    #[test]
    fn union_is_transitive() {
        let mut set = DisjointSet::new();
        for element in 0..6 {
            set.make_set(element);
        }

        set.union(&0, &1);
        set.union(&2, &3);
        assert!(!set.same_set(&1, &2));

        let root = set.union(&1, &3).unwrap();
        for element in 0..4 {
            assert_eq!(set.find(&element), Some(root));
        }
        assert!(!set.same_set(&0, &4));
        assert_eq!(set.find_immutable(&5), Some(5));
    }

    #[test]
    fn find_agrees_with_immutable_find() {
        let mut set = DisjointSet::new();
        for element in 0..8 {
            set.make_set(element);
        }
        // Balanced merges build a tree of depth 3.
        for step in [1, 2, 4] {
            for element in (0..8).step_by(2 * step) {
                set.union(&element, &(element + step));
            }
        }

        let root = set.find_immutable(&7).unwrap();
        for element in 0..8 {
            assert_eq!(set.find(&element), Some(root));
            assert_eq!(set.find_immutable(&element), Some(root));
        }
        assert_eq!(set.classes().len(), 1);
    }

    #[test]
    fn union_with_unknown_element() {
        let mut set = DisjointSet::new();
        set.make_set(1);
        assert_eq!(set.union(&1, &2), None);
        assert_eq!(set.find(&1), Some(1));
    }

    #[test]
    fn make_set_keeps_existing_class() {
        let mut set = DisjointSet::new();
        set.make_set(1);
        set.make_set(2);
        set.union(&1, &2);
        set.make_set(2);
        assert!(set.same_set(&1, &2));
    }

    #[test]
    fn tie_keeps_older_root() {
        let mut set = DisjointSet::new();
        set.make_set(10);
        set.make_set(20);
        assert_eq!(set.union(&20, &10), Some(10));
    }

    #[test]
    fn enumerate_classes() {
        let mut set = DisjointSet::new();
        for element in 0..5 {
            set.make_set(element);
        }
        set.union(&3, &0);
        set.union(&4, &1);

        assert_eq!(set.classes(), vec![vec![0, 3], vec![1, 4], vec![2]]);
    }
}
