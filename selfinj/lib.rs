//! # Self-injectivity of bound quiver algebras.
//!
//! Decide whether a bound quiver algebra `kQ/I` is self-injective by
//! exploring, for every vertex of the quiver `Q`, the classes of paths
//! modulo the ideal `I` that do not vanish, and keeping one representative
//! of every *maximal* nonzero class.
//!
//! The library currently supports:
//! * quivers over any ordered, hashable vertex type,
//! * ideals generated by paths and by pairs of paths with common endpoints
//!   (semimonomial ideals), compiled into a [`rules::TransformationRuleTree`],
//! * lazy search of path classes with a bound on the path length, so that
//!   non-admissible ideals are detected instead of searched forever,
//! * detection of cancellativity and weak cancellativity failures,
//! * computation of the Nakayama permutation, optionally in parallel.
//!
//! The following snippet truncates the oriented triangle at length 3 and
//! checks that the resulting algebra is self-injective.
//!
//! ```rust
//! use selfinj::{path, quiver::Quiver};
//! use selfinj::rules::SemimonomialIdeal;
//! use selfinj::selfinjectivity::{AnalysisOptions, SelfInjectivityAnalysis};
//!
//! let mut quiver = Quiver::with_vertices([1, 2, 3]);
//! quiver.add_arrow(1, 2).unwrap();
//! quiver.add_arrow(2, 3).unwrap();
//! quiver.add_arrow(3, 1).unwrap();
//!
//! let ideal = SemimonomialIdeal::builder()
//!     .monomials(vec![path![1, 2, 3, 1], path![2, 3, 1, 2], path![3, 1, 2, 3]])
//!     .build();
//! let rules = ideal.compile_for(&quiver).unwrap();
//!
//! let options = AnalysisOptions::default();
//! let analysis = SelfInjectivityAnalysis::run(&quiver, &rules, &options).unwrap();
//! assert!(analysis.verdict.is_self_injective());
//! ```
//!
//! ---
//!
//! Main entry points are:
//!
//! * [`crate::search::MaximalNonzeroEquivalenceClassRepresentativeComputer::compute`] -- maximal
//!   nonzero classes of paths starting at a single vertex
//! * [`crate::selfinjectivity::SelfInjectivityAnalysis::run`] -- searches from every vertex and
//!   the resulting Nakayama permutation
//! * [`crate::rules::SemimonomialIdeal::compile`] -- turn ideal generators into rewrite rules
#[macro_use]
mod util;

pub mod disjoint_set;
pub mod errors;
pub mod quiver;
pub mod rules;
pub mod search;
pub mod selfinjectivity;

pub use crate::errors::Result;
