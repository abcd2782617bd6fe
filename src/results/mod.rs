//! Result system and results documents.
//!
//! ## Module Structure
//!
//! - `system`: `ResultSystem`, its lock handle and the collaborator traits
//! - `entities`: result tests and result definitions
//! - `document`: reading and writing the `<system>` part of a results document

mod document;
mod entities;
mod system;

pub use document::{read_results, write_results};
pub use entities::{ResultDefinition, ResultTest};
pub use system::{ResultCombiner, ResultSystem, SystemHandle, TestEvaluator};
