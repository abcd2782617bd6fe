//! Memoized, negation-aware evaluation of criteria trees.

use super::node::{CriteriaNode, NodeKind};
use crate::results::ResultSystem;
use crate::types::OvalResult;
use tracing::{trace, warn};

impl CriteriaNode {
    /// Evaluate this node once and cache the (negated) result.
    ///
    /// Later calls return the cached value without touching children or
    /// collaborators. Evaluation writes the cache even on a locked system.
    pub fn eval(&mut self, system: &mut ResultSystem) -> OvalResult {
        if !self.result.is_evaluated() {
            self.result = self.compute(system);
        }
        self.result
    }

    fn compute(&mut self, system: &mut ResultSystem) -> OvalResult {
        let raw = match &mut self.kind {
            NodeKind::Criteria { operator, subnodes } => {
                // every child is evaluated, no short-circuit
                let results: Vec<OvalResult> =
                    subnodes.iter_mut().map(|subnode| subnode.eval(system)).collect();
                system.combine(*operator, &results)
            }
            NodeKind::Criterion { test: Some(test), .. } => system.eval_test(*test),
            NodeKind::ExtendDefinition { extends: Some(definition), .. } => {
                system.eval_definition(*definition)
            }
            NodeKind::Criterion { test: None, .. } => {
                warn!("criterion without a resolved test evaluates to error");
                OvalResult::Error
            }
            NodeKind::ExtendDefinition { extends: None, .. } => {
                warn!("extend_definition without a resolved definition evaluates to error");
                OvalResult::Error
            }
        };

        let result = raw.negated_if(self.negate);
        trace!(
            "<{}> raw={} negate={} result={}",
            self.node_type().tag_name(),
            raw,
            self.negate,
            result
        );
        result
    }
}
