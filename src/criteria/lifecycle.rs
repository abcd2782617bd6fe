//! Validation, cloning into another system, and derivation from template trees.

use super::node::{CriteriaNode, NodeKind};
use crate::model::{TemplateKind, TemplateNode};
use crate::results::ResultSystem;
use crate::types::DEFAULT_VARIABLE_INSTANCE;
use tracing::{debug, warn};

impl CriteriaNode {
    /// Recursively check that every reference in this subtree resolves.
    pub fn is_valid(&self, system: &ResultSystem) -> bool {
        match &self.kind {
            NodeKind::Criteria { subnodes, .. } => subnodes.iter().all(|subnode| subnode.is_valid(system)),
            NodeKind::Criterion { test, .. } => {
                match test.and_then(|id| system.test(id)) {
                    Some(test) => test.is_valid(system),
                    None => {
                        debug!("invalid criterion: test reference is not resolved");
                        false
                    }
                }
            }
            NodeKind::ExtendDefinition { extends, .. } => {
                match extends.and_then(|id| system.definition(id)) {
                    Some(definition) => definition.is_valid(system),
                    None => {
                        debug!("invalid extend_definition: definition reference is not resolved");
                        false
                    }
                }
            }
        }
    }

    /// Deep copy of this subtree into `target`.
    ///
    /// Tests and definitions are cloned into `target` by identifier. The cached
    /// result is preserved; reset it before re-evaluating the clone.
    pub fn clone_into(&self, source: &ResultSystem, target: &mut ResultSystem) -> CriteriaNode {
        let mut node = match &self.kind {
            NodeKind::Criteria { operator, subnodes } => {
                let mut node = CriteriaNode::criteria(target, self.negate, *operator);
                for subnode in subnodes {
                    let cloned = subnode.clone_into(source, target);
                    node.add_subnode(cloned);
                }
                node
            }
            NodeKind::Criterion { test, variable_instance } => {
                let test = test.and_then(|id| target.clone_test_from(source, id));
                CriteriaNode::criterion(target, self.negate, test, *variable_instance)
            }
            NodeKind::ExtendDefinition { extends, variable_instance } => {
                let extends = extends.and_then(|id| target.clone_definition_from(source, id));
                CriteriaNode::extend_definition(target, self.negate, extends, *variable_instance)
            }
        };
        node.set_result(self.result);
        node
    }

    /// Build a result tree mirroring a template tree.
    ///
    /// Leaf references are registered (or reused) in `system`; references the
    /// model cannot resolve become absent handles. An absent template yields None.
    pub fn derive(system: &mut ResultSystem, template: Option<&TemplateNode>) -> Option<CriteriaNode> {
        let template = template?;
        let node = match &template.kind {
            TemplateKind::Criteria { operator, children } => {
                let mut node = CriteriaNode::criteria(system, template.negate, *operator);
                for child in children {
                    if let Some(subnode) = CriteriaNode::derive(system, Some(child)) {
                        node.add_subnode(subnode);
                    }
                }
                node
            }
            TemplateKind::Criterion { test_ref } => {
                let test = system.test_for(test_ref);
                if test.is_none() {
                    warn!("criterion references unknown test {}", test_ref);
                }
                CriteriaNode::criterion(system, template.negate, test, DEFAULT_VARIABLE_INSTANCE)
            }
            TemplateKind::ExtendDefinition { definition_ref } => {
                let extends = system.definition_for(definition_ref);
                if extends.is_none() {
                    warn!("extend_definition reference {} could not be resolved", definition_ref);
                }
                CriteriaNode::extend_definition(
                    system,
                    template.negate,
                    extends,
                    DEFAULT_VARIABLE_INSTANCE,
                )
            }
        };
        Some(node)
    }
}
