//! Compilation of ideal generators into path transformation rules.
mod ideal;
mod rule_tree;

pub use crate::rules::ideal::*;
pub use crate::rules::rule_tree::*;
