//! oval-criteria - result criteria evaluation for OVAL compliance definitions.
//!
//! A definition's verdict comes from a criteria tree: `criterion` leaves wrap
//! test outcomes, `extend_definition` leaves wrap other definitions, and
//! `criteria` nodes combine their children through an operator. This crate
//! builds those trees (fresh, cloned, or derived from a definition model),
//! evaluates them with per-node memoization and negation, freezes them once
//! the owning system is locked, and reads/writes them as results XML.
//!
//! # Example
//!
//! ```no_run
//! use oval_criteria::{DefinitionModel, Operator, OvalResult, ResultSystem};
//!
//! let model = DefinitionModel::from_file("definitions.xml").unwrap();
//! let and_only = |op: Operator, results: &[OvalResult]| {
//!     if op == Operator::And && results.iter().all(|r| *r == OvalResult::True) {
//!         OvalResult::True
//!     } else {
//!         OvalResult::Unknown
//!     }
//! };
//! let mut system = ResultSystem::new(model).with_combiner(and_only);
//!
//! for id in system.derive_all() {
//!     println!("{:?}", system.eval_definition(id));
//! }
//! ```

pub mod cli;
pub mod config;
pub mod criteria;
pub mod error;
pub mod model;
pub mod report;
pub mod results;
pub mod types;
pub mod xml;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at crate root
pub use config::ResultsConfig;
pub use criteria::{parse_node, CriteriaNode, NodeKind, ParseStatus};
pub use error::{Result, ResultsError};
pub use model::{DefinitionModel, DefinitionTemplate, TemplateKind, TemplateNode, TestTemplate};
pub use results::{
    read_results, write_results, ResultCombiner, ResultDefinition, ResultSystem, ResultTest,
    SystemHandle, TestEvaluator,
};
pub use types::{DefinitionId, NodeType, Operator, OvalResult, TestId};
