//! The result system: owner of result tests, result definitions and the lock flag.

use super::entities::{ResultDefinition, ResultTest};
use crate::config::ResultsConfig;
use crate::criteria::CriteriaNode;
use crate::model::{DefinitionModel, TestTemplate};
use crate::types::{DefinitionId, Operator, OvalResult, TestId};
use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Combines the ordered child results of a criteria node under an operator.
///
/// The truth tables live outside this crate; callers plug them in here.
pub trait ResultCombiner {
    fn combine(&self, operator: Operator, results: &[OvalResult]) -> OvalResult;
}

impl<F> ResultCombiner for F
where
    F: Fn(Operator, &[OvalResult]) -> OvalResult,
{
    fn combine(&self, operator: Operator, results: &[OvalResult]) -> OvalResult {
        self(operator, results)
    }
}

/// Computes the result of a single test against the target system
pub trait TestEvaluator {
    fn evaluate(&mut self, test: &TestTemplate) -> OvalResult;
}

impl<F> TestEvaluator for F
where
    F: FnMut(&TestTemplate) -> OvalResult,
{
    fn evaluate(&mut self, test: &TestTemplate) -> OvalResult {
        self(test)
    }
}

#[derive(Debug, Default)]
struct SystemState {
    locked: Cell<bool>,
}

/// Shared, non-owning view of a system's lock state, held by every node it creates
#[derive(Debug, Clone, Default)]
pub struct SystemHandle {
    state: Rc<SystemState>,
}

impl SystemHandle {
    pub fn is_locked(&self) -> bool {
        self.state.locked.get()
    }

    /// True if both handles belong to the same system
    pub fn same_system(&self, other: &SystemHandle) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Owning container for result tests and result definitions
pub struct ResultSystem {
    handle: SystemHandle,
    model: Arc<DefinitionModel>,
    config: ResultsConfig,
    tests: Vec<ResultTest>,
    test_index: FxHashMap<String, TestId>,
    definitions: Vec<ResultDefinition>,
    definition_index: FxHashMap<String, DefinitionId>,
    /// Definitions currently open on the derive/clone/eval stack
    extend_depth: usize,
    combiner: Option<Box<dyn ResultCombiner>>,
    test_evaluator: Option<Box<dyn TestEvaluator>>,
}

impl fmt::Debug for ResultSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSystem")
            .field("locked", &self.is_locked())
            .field("tests", &self.tests.len())
            .field("definitions", &self.definitions.len())
            .field("has_combiner", &self.combiner.is_some())
            .field("has_test_evaluator", &self.test_evaluator.is_some())
            .finish()
    }
}

impl ResultSystem {
    pub fn new(model: impl Into<Arc<DefinitionModel>>) -> Self {
        Self {
            handle: SystemHandle::default(),
            model: model.into(),
            config: ResultsConfig::default(),
            tests: Vec::new(),
            test_index: FxHashMap::default(),
            definitions: Vec::new(),
            definition_index: FxHashMap::default(),
            extend_depth: 0,
            combiner: None,
            test_evaluator: None,
        }
    }

    #[must_use]
    pub fn with_combiner(mut self, combiner: impl ResultCombiner + 'static) -> Self {
        self.combiner = Some(Box::new(combiner));
        self
    }

    #[must_use]
    pub fn with_test_evaluator(mut self, evaluator: impl TestEvaluator + 'static) -> Self {
        self.test_evaluator = Some(Box::new(evaluator));
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ResultsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn handle(&self) -> SystemHandle {
        self.handle.clone()
    }

    pub fn model(&self) -> &DefinitionModel {
        &self.model
    }

    pub fn config(&self) -> &ResultsConfig {
        &self.config
    }

    pub fn is_locked(&self) -> bool {
        self.handle.is_locked()
    }

    /// Freeze every node, test and definition of this system. There is no unlock.
    pub fn lock(&mut self) {
        debug!("locking result system ({} definitions)", self.definitions.len());
        self.handle.state.locked.set(true);
    }

    pub fn test(&self, id: TestId) -> Option<&ResultTest> {
        self.tests.get(id.0)
    }

    pub fn test_mut(&mut self, id: TestId) -> Option<&mut ResultTest> {
        self.tests.get_mut(id.0)
    }

    pub fn definition(&self, id: DefinitionId) -> Option<&ResultDefinition> {
        self.definitions.get(id.0)
    }

    pub fn definition_mut(&mut self, id: DefinitionId) -> Option<&mut ResultDefinition> {
        self.definitions.get_mut(id.0)
    }

    pub fn tests(&self) -> &[ResultTest] {
        &self.tests
    }

    pub fn definitions(&self) -> &[ResultDefinition] {
        &self.definitions
    }

    /// Look up an already registered test by identifier
    pub fn find_test(&self, test_id: &str) -> Option<TestId> {
        self.test_index.get(test_id).copied()
    }

    /// Look up an already registered definition by identifier
    pub fn find_definition(&self, definition_id: &str) -> Option<DefinitionId> {
        self.definition_index.get(definition_id).copied()
    }

    /// Open one more level of extend_definition chain, or refuse past the limit
    fn enter_extend(&mut self, definition_ref: &str, action: &str) -> bool {
        if self.extend_depth >= self.config.max_extend_depth {
            warn!(
                "extend_definition chain deeper than {} levels at {}, not {}",
                self.config.max_extend_depth, definition_ref, action
            );
            return false;
        }
        self.extend_depth += 1;
        true
    }

    fn leave_extend(&mut self) {
        self.extend_depth = self.extend_depth.saturating_sub(1);
    }

    fn register_test(&mut self, test: ResultTest) -> TestId {
        let id = TestId(self.tests.len());
        self.test_index.insert(test.id().to_string(), id);
        self.tests.push(test);
        id
    }

    fn register_definition(&mut self, definition: ResultDefinition) -> DefinitionId {
        let id = DefinitionId(self.definitions.len());
        self.definition_index.insert(definition.id().to_string(), id);
        self.definitions.push(definition);
        id
    }

    /// Register-or-get the result test for a model test.
    ///
    /// Returns None when the model has no test with this identifier.
    pub fn test_for(&mut self, test_ref: &str) -> Option<TestId> {
        if let Some(id) = self.find_test(test_ref) {
            return Some(id);
        }
        let template = self.model.test(test_ref)?;
        let test = ResultTest::new(self.handle(), template.id.clone(), template.version);
        Some(self.register_test(test))
    }

    /// Register-or-get the result definition for a model definition.
    ///
    /// A fresh registration derives the definition's criteria tree from its
    /// template. The definition is registered before its tree is derived, so
    /// self-referencing templates terminate. Past `max_extend_depth` nested
    /// registrations the definition is left unregistered and None is returned.
    pub fn definition_for(&mut self, definition_ref: &str) -> Option<DefinitionId> {
        if let Some(id) = self.find_definition(definition_ref) {
            return Some(id);
        }
        let model = Arc::clone(&self.model);
        let template = model.definition(definition_ref)?;
        if !self.enter_extend(definition_ref, "deriving") {
            return None;
        }

        let definition =
            ResultDefinition::new(self.handle(), template.id.clone(), template.version);
        let id = self.register_definition(definition);

        let criteria = CriteriaNode::derive(self, template.criteria.as_ref());
        self.definitions[id.0].criteria = criteria;
        self.leave_extend();
        Some(id)
    }

    /// Derive result definitions for every definition in the model
    pub fn derive_all(&mut self) -> Vec<DefinitionId> {
        let model = Arc::clone(&self.model);
        model
            .definitions()
            .iter()
            .filter_map(|template| self.definition_for(&template.id))
            .collect()
    }

    /// Copy a test from another system into this one (register-or-get by identifier)
    pub fn clone_test_from(&mut self, source: &ResultSystem, id: TestId) -> Option<TestId> {
        let old = source.test(id)?;
        if let Some(existing) = self.find_test(old.id()) {
            return Some(existing);
        }
        let mut test = ResultTest::new(self.handle(), old.id().to_string(), old.version());
        test.result = old.result();
        Some(self.register_test(test))
    }

    /// Copy a definition and its criteria tree from another system into this one
    pub fn clone_definition_from(
        &mut self,
        source: &ResultSystem,
        id: DefinitionId,
    ) -> Option<DefinitionId> {
        let old = source.definition(id)?;
        if let Some(existing) = self.find_definition(old.id()) {
            return Some(existing);
        }
        if !self.enter_extend(old.id(), "cloning") {
            return None;
        }
        let mut definition =
            ResultDefinition::new(self.handle(), old.id().to_string(), old.version());
        definition.result = old.result();
        let new_id = self.register_definition(definition);

        let criteria = old.criteria().map(|node| node.clone_into(source, self));
        self.definitions[new_id.0].criteria = criteria;
        self.leave_extend();
        Some(new_id)
    }

    /// Combine child results through the configured combiner
    pub fn combine(&self, operator: Operator, results: &[OvalResult]) -> OvalResult {
        match &self.combiner {
            Some(combiner) => combiner.combine(operator, results),
            None => {
                debug!("no result combiner configured, {} left unevaluated", operator);
                OvalResult::NotEvaluated
            }
        }
    }

    /// Evaluate a test once and cache its result
    pub fn eval_test(&mut self, id: TestId) -> OvalResult {
        let Some(test) = self.tests.get(id.0) else {
            warn!("evaluation of unknown test handle {}", id.0);
            return OvalResult::Error;
        };
        if test.result().is_evaluated() {
            return test.result();
        }

        let model = Arc::clone(&self.model);
        let Some(template) = model.test(test.id()) else {
            warn!("test {} is not in the definition model", test.id());
            return OvalResult::Error;
        };

        let result = match self.test_evaluator.as_mut() {
            Some(evaluator) => evaluator.evaluate(template),
            None => {
                debug!("no test evaluator configured, {} left unevaluated", template.id);
                OvalResult::NotEvaluated
            }
        };
        self.tests[id.0].result = result;
        result
    }

    /// Evaluate a definition's criteria tree once and cache its result.
    ///
    /// Re-entering a definition that is already being evaluated (an
    /// extend_definition cycle) yields `Error` for that edge, as does a chain
    /// of extends deeper than `max_extend_depth`. Neither is cached.
    pub fn eval_definition(&mut self, id: DefinitionId) -> OvalResult {
        let Some(definition) = self.definitions.get(id.0) else {
            warn!("evaluation of unknown definition handle {}", id.0);
            return OvalResult::Error;
        };
        if definition.result.is_evaluated() {
            return definition.result;
        }
        if definition.evaluating {
            warn!("cyclic extend_definition reference through {}", definition.id());
            return OvalResult::Error;
        }
        if definition.criteria.is_none() {
            debug!("definition {} has no criteria", definition.id());
            return OvalResult::NotEvaluated;
        }
        if self.extend_depth >= self.config.max_extend_depth {
            warn!(
                "extend_definition chain deeper than {} levels at {}, not evaluating",
                self.config.max_extend_depth,
                definition.id()
            );
            return OvalResult::Error;
        }

        let definition = &mut self.definitions[id.0];
        let Some(mut criteria) = definition.criteria.take() else {
            return OvalResult::NotEvaluated;
        };
        definition.evaluating = true;
        self.extend_depth += 1;

        let result = criteria.eval(self);

        self.extend_depth -= 1;
        let definition = &mut self.definitions[id.0];
        definition.evaluating = false;
        definition.criteria = Some(criteria);
        definition.result = result;
        result
    }
}
