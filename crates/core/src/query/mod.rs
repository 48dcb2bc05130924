//! Query trees and their evaluation against an [`IndexStore`](crate::index::IndexStore).

pub mod evaluator;
pub mod tree;

pub use evaluator::{Evaluator, QueryResult};
pub use tree::{CompareOp, QueryTree};
