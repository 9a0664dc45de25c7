//! Search for the maximal nonzero equivalence classes of paths starting at
//! a vertex.
//!
//! Two nested explicit-stack searches are run. The outer one walks the tree
//! of paths from the starting vertex and extends every path that does not
//! vanish. The inner one decides whether a newly met path vanishes by
//! rewriting its subpaths with the [`crate::rules::TransformationRuleTree`]
//! and merging every path it reaches into the class of the path it started from.
mod cancellativity;
mod computer;
pub mod options;
mod result;
mod search_tree;

pub use crate::search::computer::*;
pub use crate::search::result::*;
pub use crate::search::search_tree::*;
