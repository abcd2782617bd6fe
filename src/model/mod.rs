//! Definition model: the static policy template that result trees are derived from.
//!
//! ## Module Structure
//!
//! - `mod.rs`: template types and the `DefinitionModel` registry
//! - `loader`: reading an `oval_definitions` XML document

mod loader;

use crate::types::Operator;
use rustc_hash::FxHashMap;
use tracing::warn;

/// A check referenced by `criterion` nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTemplate {
    pub id: String,
    pub version: u32,
    /// Element name of the test in the source document (e.g. `file_test`)
    pub kind: String,
    pub comment: Option<String>,
}

impl TestTemplate {
    pub fn new<S: Into<String>>(id: S, version: u32) -> Self {
        Self { id: id.into(), version, kind: "unknown_test".to_string(), comment: None }
    }
}

/// A policy definition whose criteria tree is the template for results
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionTemplate {
    pub id: String,
    pub version: u32,
    pub class: Option<String>,
    pub title: Option<String>,
    pub criteria: Option<TemplateNode>,
}

impl DefinitionTemplate {
    pub fn new<S: Into<String>>(id: S, version: u32, criteria: Option<TemplateNode>) -> Self {
        Self { id: id.into(), version, class: None, title: None, criteria }
    }
}

/// Node of a template criteria tree
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pub negate: bool,
    pub kind: TemplateKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateKind {
    Criteria { operator: Operator, children: Vec<TemplateNode> },
    Criterion { test_ref: String },
    ExtendDefinition { definition_ref: String },
}

impl TemplateNode {
    pub fn criteria(operator: Operator, children: Vec<TemplateNode>) -> Self {
        Self { negate: false, kind: TemplateKind::Criteria { operator, children } }
    }

    pub fn criterion<S: Into<String>>(test_ref: S) -> Self {
        Self { negate: false, kind: TemplateKind::Criterion { test_ref: test_ref.into() } }
    }

    pub fn extend_definition<S: Into<String>>(definition_ref: S) -> Self {
        Self {
            negate: false,
            kind: TemplateKind::ExtendDefinition { definition_ref: definition_ref.into() },
        }
    }

    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

/// Registry of definitions and tests, keyed by identifier, in document order
#[derive(Debug, Clone, Default)]
pub struct DefinitionModel {
    definitions: Vec<DefinitionTemplate>,
    definition_index: FxHashMap<String, usize>,
    tests: Vec<TestTemplate>,
    test_index: FxHashMap<String, usize>,
}

impl DefinitionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. A later definition with the same id replaces the earlier one.
    pub fn add_definition(&mut self, definition: DefinitionTemplate) {
        if let Some(&idx) = self.definition_index.get(&definition.id) {
            warn!("duplicate definition {}, keeping the last one", definition.id);
            self.definitions[idx] = definition;
        } else {
            self.definition_index.insert(definition.id.clone(), self.definitions.len());
            self.definitions.push(definition);
        }
    }

    /// Add a test. A later test with the same id replaces the earlier one.
    pub fn add_test(&mut self, test: TestTemplate) {
        if let Some(&idx) = self.test_index.get(&test.id) {
            warn!("duplicate test {}, keeping the last one", test.id);
            self.tests[idx] = test;
        } else {
            self.test_index.insert(test.id.clone(), self.tests.len());
            self.tests.push(test);
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: DefinitionTemplate) -> Self {
        self.add_definition(definition);
        self
    }

    #[must_use]
    pub fn with_test(mut self, test: TestTemplate) -> Self {
        self.add_test(test);
        self
    }

    pub fn definition(&self, id: &str) -> Option<&DefinitionTemplate> {
        self.definition_index.get(id).map(|&idx| &self.definitions[idx])
    }

    pub fn test(&self, id: &str) -> Option<&TestTemplate> {
        self.test_index.get(id).map(|&idx| &self.tests[idx])
    }

    pub fn definitions(&self) -> &[DefinitionTemplate] {
        &self.definitions
    }

    pub fn tests(&self) -> &[TestTemplate] {
        &self.tests
    }
}

#[cfg(test)]
mod tests;
