//! Cancellativity and weak cancellativity of the ideal, read off the classes
//! of a completed search.
//!
//! A nonzero class `C` of paths `p . a` is *cancellative* when all its
//! members have equivalent prefixes `p`. An arrow `a` is *distinguishing*
//! for the class of `p` when no inequivalent `q` has `q . a` in the class of
//! `p . a`; weak cancellativity asks every non-maximal nonzero class to have
//! at least one distinguishing arrow.
use crate::{
    quiver::{Arrow, Vertex},
    search::{
        computer::{ClassMember, Classification, LengthBoundExceeded, Search},
        NodeIdx,
    },
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CancellativityReport {
    pub(crate) cancellativity_failure: bool,
    pub(crate) weak_cancellativity_failure: bool,
}

/// Nonzero path `parent . arrow` seen from the classes.
#[derive(Debug, Clone)]
struct Extension<V> {
    class: ClassMember,
    parent_class: ClassMember,
    arrow: Arrow<V>,
}

impl<V: Vertex> Search<'_, V> {
    /// Run the checks enabled in the options. Only valid after a completed
    /// outer search.
    pub(super) fn detect_cancellativity_failures(
        &mut self,
    ) -> Result<CancellativityReport, LengthBoundExceeded> {
        self.classify_prefixes()?;
        let extensions = self.extensions();

        let mut report = CancellativityReport::default();
        if self.options.detect_cancellativity_failure {
            report.cancellativity_failure = cancellativity_fails(&extensions);
        }
        if self.options.detect_weak_cancellativity_failure {
            report.weak_cancellativity_failure = weak_cancellativity_fails(&extensions);
        }

        debug!(
            extensions = extensions.len(),
            cancellativity_failure = report.cancellativity_failure,
            weak_cancellativity_failure = report.weak_cancellativity_failure,
            "checked cancellativity"
        );
        Ok(report)
    }

    /// Give a class to the parent of every nonzero path. Paths only created
    /// as intermediate steps of a rewrite have none yet, and classifying
    /// them can reveal further members whose parents need one too.
    fn classify_prefixes(&mut self) -> Result<(), LengthBoundExceeded> {
        loop {
            let mut classified = 0;
            // New nodes appended while classifying are picked up by the next round.
            for idx in 0..self.tree.node_count() {
                let node = NodeIdx(idx);
                if self.classification[idx] != Some(Classification::Nonzero) {
                    continue;
                }

                let Some(parent) = self.tree.parent(node) else {
                    continue;
                };

                if self.classification[parent.0].is_none() {
                    let verdict = self.classify(parent)?;
                    debug_assert_eq!(
                        verdict,
                        Classification::Nonzero,
                        "prefix of a nonzero path must be nonzero"
                    );
                    classified += 1;
                }
            }

            if classified == 0 {
                return Ok(());
            }
        }
    }

    /// Every nonzero, non-stationary classified path as an extension of its
    /// parent's class.
    fn extensions(&mut self) -> Vec<Extension<V>> {
        let mut extensions = Vec::new();
        for idx in 0..self.tree.node_count() {
            let node = NodeIdx(idx);
            if self.classification[idx] != Some(Classification::Nonzero) {
                continue;
            }

            let Some(parent) = self.tree.parent(node) else {
                continue;
            };

            extensions.push(Extension {
                class: self.class_of(node),
                parent_class: self.class_of(parent),
                arrow: Arrow::new(
                    self.tree.vertex(parent).clone(),
                    self.tree.vertex(node).clone(),
                ),
            });
        }

        extensions
    }
}

/// Some class has two members ending in the same arrow whose parents lie
/// in different classes.
fn cancellativity_fails<V: Vertex>(extensions: &[Extension<V>]) -> bool {
    let mut parent_of_class: FxHashMap<(ClassMember, &Arrow<V>), ClassMember> =
        FxHashMap::default();

    for extension in extensions {
        let parent_class = *parent_of_class
            .entry((extension.class, &extension.arrow))
            .or_insert(extension.parent_class);

        if parent_class != extension.parent_class {
            debug!(
                class = ?extension.class,
                ?parent_class,
                other_parent_class = ?extension.parent_class,
                "cancellativity fails"
            );
            return true;
        }
    }

    false
}

/// Some non-maximal class has no distinguishing arrow.
fn weak_cancellativity_fails<V: Vertex>(extensions: &[Extension<V>]) -> bool {
    // (class of p . a, a) -> classes of p
    let mut parents: FxHashMap<(ClassMember, &Arrow<V>), Vec<ClassMember>> =
        FxHashMap::default();
    // class of p -> arrows a with p . a nonzero
    let mut arrows: FxHashMap<ClassMember, FxHashSet<&Arrow<V>>> = FxHashMap::default();

    for extension in extensions {
        let classes = parents
            .entry((extension.class, &extension.arrow))
            .or_default();
        if !classes.contains(&extension.parent_class) {
            classes.push(extension.parent_class);
        }

        arrows
            .entry(extension.parent_class)
            .or_default()
            .insert(&extension.arrow);
    }

    let mut non_distinguishing: FxHashSet<(ClassMember, &Arrow<V>)> = FxHashSet::default();
    for ((_, arrow), classes) in &parents {
        if classes.len() > 1 {
            non_distinguishing.extend(classes.iter().map(|class| (*class, *arrow)));
        }
    }

    arrows.iter().any(|(class, arrows)| {
        let fails = arrows
            .iter()
            .all(|arrow| non_distinguishing.contains(&(*class, *arrow)));
        if fails {
            debug!(?class, "no distinguishing arrow, weak cancellativity fails");
        }
        fails
    })
}
