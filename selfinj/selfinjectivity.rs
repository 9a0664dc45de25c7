//! Self-injectivity of a bound quiver algebra from the searches at all of
//! its vertices.
//!
//! The algebra is self-injective when, at every vertex, there is exactly one
//! maximal nonzero class of paths and the endpoints of these classes form a
//! permutation of the vertices: the Nakayama permutation.
use crate::{
    quiver::{Path, Quiver, Vertex},
    rules::TransformationRuleTree,
    search::{
        options::{Parallelism, SearchOptions},
        ComputationResult, MaximalNonzeroEquivalenceClassRepresentativeComputer,
    },
    Result,
};
use bitvec::prelude::*;
use bon::Builder;
use rayon::prelude::*;
use tracing::debug;

#[derive(Debug, Clone, Builder)]
pub struct AnalysisOptions {
    #[builder(default)]
    pub search: SearchOptions,

    #[builder(default = Parallelism::Sequential)]
    pub parallelism: Parallelism,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions::builder().build()
    }
}

/// Map from every vertex to the end of its unique maximal nonzero path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NakayamaPermutation<V> {
    images: Vec<(V, V)>,
}

impl<V: Vertex> NakayamaPermutation<V> {
    #[must_use]
    pub fn image(&self, vertex: &V) -> Option<&V> {
        self.images
            .iter()
            .find(|(source, _)| source == vertex)
            .map(|(_, image)| image)
    }

    /// Pairs `(vertex, image)` in the vertex order of the quiver.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &V)> {
        self.images.iter().map(|(vertex, image)| (vertex, image))
    }
}

/// Why an algebra was found not to be self-injective. Only the first
/// offending vertex is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason<V> {
    /// Search from `vertex` met a path longer than the bound; the ideal is
    /// probably not admissible.
    TooLongPath { vertex: V, longest: Path<V> },
    CancellativityFailure { vertex: V },
    WeakCancellativityFailure { vertex: V },
    /// More than one maximal nonzero class starts at `vertex`.
    NonUniqueRepresentative {
        vertex: V,
        representatives: Vec<Path<V>>,
    },
    /// Maximal paths from `fst` and `snd` both end in `image`.
    NotInjective { fst: V, snd: V, image: V },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<V> {
    SelfInjective(NakayamaPermutation<V>),
    NotSelfInjective(Reason<V>),
}

impl<V> Verdict<V> {
    #[must_use]
    pub fn is_self_injective(&self) -> bool {
        matches!(self, Verdict::SelfInjective(..))
    }
}

/// Per-vertex results together with the verdict drawn from them.
#[derive(Debug, Clone)]
pub struct SelfInjectivityAnalysis<V> {
    /// Result of the search from every vertex, in the vertex order of the quiver.
    pub results: Vec<(V, ComputationResult<V>)>,
    pub verdict: Verdict<V>,
}

impl<V: Vertex + Send + Sync> SelfInjectivityAnalysis<V> {
    /// Search from every vertex of `quiver` and decide self-injectivity.
    ///
    /// # Errors
    ///
    /// Propagates errors of
    /// [`MaximalNonzeroEquivalenceClassRepresentativeComputer::compute`];
    /// none are expected since every starting vertex is taken from `quiver`.
    pub fn run(
        quiver: &Quiver<V>,
        rules: &TransformationRuleTree<V>,
        options: &AnalysisOptions,
    ) -> Result<Self> {
        let computer = MaximalNonzeroEquivalenceClassRepresentativeComputer::new(
            quiver,
            rules,
            &options.search,
        );
        let search = |vertex: &V| -> Result<(V, ComputationResult<V>)> {
            Ok((vertex.clone(), computer.compute(vertex)?))
        };

        let results = match options.parallelism {
            Parallelism::Sequential => quiver
                .vertices()
                .iter()
                .map(search)
                .collect::<Result<Vec<_>>>()?,
            Parallelism::Threads => quiver
                .vertices()
                .par_iter()
                .map(search)
                .collect::<Result<Vec<_>>>()?,
        };

        let verdict = verdict(quiver, &results);
        debug!(
            vertices = results.len(),
            self_injective = verdict.is_self_injective(),
            "analysis finished"
        );

        Ok(SelfInjectivityAnalysis { results, verdict })
    }
}

fn verdict<V: Vertex>(quiver: &Quiver<V>, results: &[(V, ComputationResult<V>)]) -> Verdict<V> {
    let mut images = Vec::with_capacity(results.len());

    for (vertex, result) in results {
        let vertex = vertex.clone();
        if result.too_long_path_encountered {
            return Verdict::NotSelfInjective(Reason::TooLongPath {
                vertex,
                longest: result.longest_path_encountered.clone(),
            });
        }
        if result.cancellativity_failure_detected {
            return Verdict::NotSelfInjective(Reason::CancellativityFailure { vertex });
        }
        if result.weak_cancellativity_failure_detected {
            return Verdict::NotSelfInjective(Reason::WeakCancellativityFailure { vertex });
        }

        let Some(representative) = result.unique_representative() else {
            return Verdict::NotSelfInjective(Reason::NonUniqueRepresentative {
                vertex,
                representatives: result.representatives.clone(),
            });
        };
        images.push((vertex, representative.end().clone()));
    }

    let mut hit = bitvec![0; quiver.vertex_count()];
    for (idx, (vertex, image)) in images.iter().enumerate() {
        let position = quiver
            .vertex_position(image)
            .expect("representatives end in vertices of the quiver");
        if hit[position] {
            let (fst, _) = images[..idx]
                .iter()
                .find(|(_, other)| other == image)
                .expect("hit positions have a preimage");
            return Verdict::NotSelfInjective(Reason::NotInjective {
                fst: fst.clone(),
                snd: vertex.clone(),
                image: image.clone(),
            });
        }
        hit.set(position, true);
    }

    Verdict::SelfInjective(NakayamaPermutation { images })
}
