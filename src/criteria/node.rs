//! Criteria node data model: construction, accessors and lock-gated setters.

use crate::results::{ResultSystem, SystemHandle};
use crate::types::{
    DefinitionId, NodeType, Operator, OvalResult, TestId, DEFAULT_VARIABLE_INSTANCE,
};
use tracing::warn;

/// One node of a result criteria tree
#[derive(Debug)]
pub struct CriteriaNode {
    pub(crate) owner: SystemHandle,
    pub(crate) negate: bool,
    pub(crate) result: OvalResult,
    pub(crate) kind: NodeKind,
}

/// Variant payload of a criteria node
#[derive(Debug)]
pub enum NodeKind {
    /// Internal node combining its children under an operator
    Criteria { operator: Operator, subnodes: Vec<CriteriaNode> },
    /// Leaf wrapping one test's outcome
    Criterion { test: Option<TestId>, variable_instance: u32 },
    /// Leaf wrapping another definition's outcome
    ExtendDefinition { extends: Option<DefinitionId>, variable_instance: u32 },
}

fn checked_instance(variable_instance: u32) -> u32 {
    if variable_instance == 0 {
        warn!("variable_instance must be positive, using {}", DEFAULT_VARIABLE_INSTANCE);
        DEFAULT_VARIABLE_INSTANCE
    } else {
        variable_instance
    }
}

impl CriteriaNode {
    fn with_kind(system: &ResultSystem, negate: bool, kind: NodeKind) -> Self {
        Self { owner: system.handle(), negate, result: OvalResult::NotEvaluated, kind }
    }

    /// New criteria node with no children
    pub fn criteria(system: &ResultSystem, negate: bool, operator: Operator) -> Self {
        Self::with_kind(system, negate, NodeKind::Criteria { operator, subnodes: Vec::new() })
    }

    pub fn criterion(
        system: &ResultSystem,
        negate: bool,
        test: Option<TestId>,
        variable_instance: u32,
    ) -> Self {
        let variable_instance = checked_instance(variable_instance);
        Self::with_kind(system, negate, NodeKind::Criterion { test, variable_instance })
    }

    pub fn extend_definition(
        system: &ResultSystem,
        negate: bool,
        extends: Option<DefinitionId>,
        variable_instance: u32,
    ) -> Self {
        let variable_instance = checked_instance(variable_instance);
        Self::with_kind(system, negate, NodeKind::ExtendDefinition { extends, variable_instance })
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Criteria { .. } => NodeType::Criteria,
            NodeKind::Criterion { .. } => NodeType::Criterion,
            NodeKind::ExtendDefinition { .. } => NodeType::ExtendDefinition,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn owner(&self) -> &SystemHandle {
        &self.owner
    }

    pub fn is_locked(&self) -> bool {
        self.owner.is_locked()
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    /// Cached result; `NotEvaluated` until `eval` or `set_result` runs
    pub fn result(&self) -> OvalResult {
        self.result
    }

    /// Operator of a criteria node, None for leaves
    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            NodeKind::Criteria { operator, .. } => Some(operator),
            _ => None,
        }
    }

    /// Children of a criteria node, empty for leaves
    pub fn subnodes(&self) -> &[CriteriaNode] {
        match &self.kind {
            NodeKind::Criteria { subnodes, .. } => subnodes,
            _ => &[],
        }
    }

    pub fn test(&self) -> Option<TestId> {
        match self.kind {
            NodeKind::Criterion { test, .. } => test,
            _ => None,
        }
    }

    pub fn extends(&self) -> Option<DefinitionId> {
        match self.kind {
            NodeKind::ExtendDefinition { extends, .. } => extends,
            _ => None,
        }
    }

    /// Variable instance of a leaf, None for criteria nodes
    pub fn variable_instance(&self) -> Option<u32> {
        match self.kind {
            NodeKind::Criterion { variable_instance, .. }
            | NodeKind::ExtendDefinition { variable_instance, .. } => Some(variable_instance),
            NodeKind::Criteria { .. } => None,
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.subnodes().iter().map(CriteriaNode::node_count).sum::<usize>()
    }

    fn writable(&self, field: &str) -> bool {
        if self.owner.is_locked() {
            warn!("attempt to update locked content: {} of <{}>", field, self.node_type().tag_name());
            false
        } else {
            true
        }
    }

    pub fn set_result(&mut self, result: OvalResult) {
        if self.writable("result") {
            self.result = result;
        }
    }

    pub fn set_negate(&mut self, negate: bool) {
        if self.writable("negate") {
            self.negate = negate;
        }
    }

    /// No-op on leaves
    pub fn set_operator(&mut self, operator: Operator) {
        if self.writable("operator") {
            if let NodeKind::Criteria { operator: current, .. } = &mut self.kind {
                *current = operator;
            }
        }
    }

    /// Append a child. No-op on leaves.
    pub fn add_subnode(&mut self, subnode: CriteriaNode) {
        if self.writable("subnodes") {
            if let NodeKind::Criteria { subnodes, .. } = &mut self.kind {
                subnodes.push(subnode);
            }
        }
    }

    /// No-op unless this is a criterion
    pub fn set_test(&mut self, test: TestId) {
        if self.writable("test") {
            if let NodeKind::Criterion { test: current, .. } = &mut self.kind {
                *current = Some(test);
            }
        }
    }

    /// No-op unless this is an extend_definition
    pub fn set_extends(&mut self, extends: DefinitionId) {
        if self.writable("extends") {
            if let NodeKind::ExtendDefinition { extends: current, .. } = &mut self.kind {
                *current = Some(extends);
            }
        }
    }

    /// No-op on criteria nodes
    pub fn set_variable_instance(&mut self, instance: u32) {
        if self.writable("variable_instance") {
            let instance = checked_instance(instance);
            match &mut self.kind {
                NodeKind::Criterion { variable_instance, .. }
                | NodeKind::ExtendDefinition { variable_instance, .. } => {
                    *variable_instance = instance;
                }
                NodeKind::Criteria { .. } => {}
            }
        }
    }
}
