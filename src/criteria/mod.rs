//! Result criteria trees.
//!
//! A criteria tree combines test outcomes (`criterion`) and other definitions'
//! outcomes (`extend_definition`) through boolean operators (`criteria`) into
//! the verdict of one definition.
//!
//! ## Module Structure
//!
//! - `node`: node model, constructors, accessors and lock-gated setters
//! - `eval`: memoized, negation-aware evaluation
//! - `lifecycle`: validation, cloning into another system, derivation from templates
//! - `parse`: reading nodes from results documents
//! - `serialize`: writing nodes into results documents

mod eval;
mod lifecycle;
mod node;
mod parse;
mod serialize;

pub use node::{CriteriaNode, NodeKind};
pub use parse::{parse_node, ParseStatus};
