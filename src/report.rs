//! Validation summary over the definitions of a result system.

use crate::results::ResultSystem;
use crate::types::OvalResult;
use serde::Serialize;
use std::fmt::Write;

/// Status of one result definition
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionStatus {
    pub id: String,
    pub result: OvalResult,
    pub valid: bool,
    /// Nodes in the criteria tree (0 when the definition has none)
    pub nodes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub definitions: Vec<DefinitionStatus>,
    pub tests: usize,
}

impl CheckReport {
    pub fn from_system(system: &ResultSystem) -> Self {
        let definitions = system
            .definitions()
            .iter()
            .map(|definition| {
                let tree_valid = definition.criteria().map_or(true, |c| c.is_valid(system));
                DefinitionStatus {
                    id: definition.id().to_string(),
                    result: definition.result(),
                    valid: definition.is_valid(system) && tree_valid,
                    nodes: definition.criteria().map_or(0, |c| c.node_count()),
                }
            })
            .collect();
        Self { definitions, tests: system.tests().len() }
    }

    pub fn invalid_count(&self) -> usize {
        self.definitions.iter().filter(|d| !d.valid).count()
    }

    /// Plain-text rendering, one line per definition
    pub fn to_terminal(&self) -> String {
        let mut out = String::new();
        for status in &self.definitions {
            let _ = writeln!(
                out,
                "{:<8} {:<40} {:>4} nodes  {}",
                if status.valid { "ok" } else { "INVALID" },
                status.id,
                status.nodes,
                status.result
            );
        }
        let _ = writeln!(
            out,
            "{} definitions, {} tests, {} invalid",
            self.definitions.len(),
            self.tests,
            self.invalid_count()
        );
        out
    }
}
