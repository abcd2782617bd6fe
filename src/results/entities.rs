//! Result tests and result definitions owned by a `ResultSystem`.

use super::system::{ResultSystem, SystemHandle};
use crate::criteria::CriteriaNode;
use crate::types::OvalResult;
use tracing::{debug, warn};

/// Outcome of one model test within a result system
#[derive(Debug)]
pub struct ResultTest {
    owner: SystemHandle,
    test_id: String,
    version: u32,
    pub(crate) result: OvalResult,
}

impl ResultTest {
    pub(crate) fn new(owner: SystemHandle, test_id: String, version: u32) -> Self {
        Self { owner, test_id, version, result: OvalResult::NotEvaluated }
    }

    pub fn id(&self) -> &str {
        &self.test_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn result(&self) -> OvalResult {
        self.result
    }

    pub fn set_result(&mut self, result: OvalResult) {
        if self.owner.is_locked() {
            warn!("attempt to update locked content: result of test {}", self.test_id);
            return;
        }
        self.result = result;
    }

    /// A test is valid when the definition model knows it
    pub fn is_valid(&self, system: &ResultSystem) -> bool {
        let valid = system.model().test(&self.test_id).is_some();
        if !valid {
            debug!("test {} is not in the definition model", self.test_id);
        }
        valid
    }
}

/// Outcome of one model definition, with the criteria tree that produced it
#[derive(Debug)]
pub struct ResultDefinition {
    owner: SystemHandle,
    definition_id: String,
    version: u32,
    pub(crate) result: OvalResult,
    pub(crate) criteria: Option<CriteriaNode>,
    /// Set while the criteria tree is being evaluated
    pub(crate) evaluating: bool,
}

impl ResultDefinition {
    pub(crate) fn new(owner: SystemHandle, definition_id: String, version: u32) -> Self {
        Self {
            owner,
            definition_id,
            version,
            result: OvalResult::NotEvaluated,
            criteria: None,
            evaluating: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn result(&self) -> OvalResult {
        self.result
    }

    pub fn criteria(&self) -> Option<&CriteriaNode> {
        self.criteria.as_ref()
    }

    pub fn criteria_mut(&mut self) -> Option<&mut CriteriaNode> {
        self.criteria.as_mut()
    }

    pub fn set_result(&mut self, result: OvalResult) {
        if self.owner.is_locked() {
            warn!("attempt to update locked content: result of definition {}", self.definition_id);
            return;
        }
        self.result = result;
    }

    /// Replace the criteria tree
    pub fn set_criteria(&mut self, criteria: CriteriaNode) {
        if self.owner.is_locked() {
            warn!(
                "attempt to update locked content: criteria of definition {}",
                self.definition_id
            );
            return;
        }
        self.criteria = Some(criteria);
    }

    /// A definition is valid when the definition model knows it.
    ///
    /// Does not descend into the criteria tree, so extend cycles cannot loop here.
    pub fn is_valid(&self, system: &ResultSystem) -> bool {
        let valid = system.model().definition(&self.definition_id).is_some();
        if !valid {
            debug!("definition {} is not in the definition model", self.definition_id);
        }
        valid
    }
}
