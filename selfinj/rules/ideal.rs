use crate::{
    errors::Error,
    quiver::{Path, Quiver, Vertex},
    rules::TransformationRuleTree,
    Result,
};
use bon::Builder;

/// Ideal generated by paths (monomial generators) and by sums of two paths
/// with equal endpoints (binomial generators).
#[derive(Debug, Clone, Builder)]
pub struct SemimonomialIdeal<V: Vertex> {
    #[builder(default = Vec::new())]
    monomials: Vec<Path<V>>,

    #[builder(default = Vec::new())]
    binomials: Vec<(Path<V>, Path<V>)>,
}

impl<V: Vertex> Default for SemimonomialIdeal<V> {
    fn default() -> Self {
        SemimonomialIdeal {
            monomials: Vec::new(),
            binomials: Vec::new(),
        }
    }
}

impl<V: Vertex> SemimonomialIdeal<V> {
    pub fn add_monomial(&mut self, path: Path<V>) {
        self.monomials.push(path);
    }

    pub fn add_binomial(&mut self, fst: Path<V>, snd: Path<V>) {
        self.binomials.push((fst, snd));
    }

    #[must_use]
    pub fn monomials(&self) -> &[Path<V>] {
        &self.monomials
    }

    #[must_use]
    pub fn binomials(&self) -> &[(Path<V>, Path<V>)] {
        &self.binomials
    }

    /// Compile the generators into a [`TransformationRuleTree`].
    ///
    /// # Errors
    ///
    /// Returns the first error reported by
    /// [`TransformationRuleTree::add_monomial`] or
    /// [`TransformationRuleTree::add_binomial`].
    pub fn compile(&self) -> Result<TransformationRuleTree<V>> {
        let mut tree = TransformationRuleTree::new();
        for monomial in &self.monomials {
            tree.add_monomial(monomial)?;
        }

        for (fst, snd) in &self.binomials {
            tree.add_binomial(fst, snd)?;
        }

        tracing::debug!(
            monomials = self.monomials.len(),
            binomials = self.binomials.len(),
            trie_nodes = tree.len(),
            "compiled transformation rules"
        );
        Ok(tree)
    }

    /// Compile the generators after checking that each of them is a path
    /// of `quiver`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotInQuiver`] for the first generator using an
    /// arrow outside of `quiver`, otherwise behaves like
    /// [`SemimonomialIdeal::compile`].
    pub fn compile_for(&self, quiver: &Quiver<V>) -> Result<TransformationRuleTree<V>> {
        let generators = self
            .monomials
            .iter()
            .chain(self.binomials.iter().flat_map(|(fst, snd)| [fst, snd]));

        for path in generators {
            if !quiver.contains_path(path) {
                return Err(Error::PathNotInQuiver(format!("{:?}", path.vertices())));
            }
        }

        self.compile()
    }
}
