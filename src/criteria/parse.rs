//! Reading criteria trees from results documents.

use super::node::CriteriaNode;
use crate::results::ResultSystem;
use crate::types::{NodeType, Operator, OvalResult, DEFAULT_VARIABLE_INSTANCE};
use crate::xml::{bool_attribute, child_elements, operator_attribute, result_attribute, u32_attribute};
use roxmltree::Node;
use tracing::{debug, warn};

/// Whether `parse_node` recognized the element it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Handled,
    /// Element was skipped; the consumer received None
    Unhandled,
}

/// Parse one `criteria`, `criterion` or `extend_definition` element.
///
/// The consumer is always invoked before returning: with the parsed node, or
/// with None for an element that was skipped. Unresolvable references degrade
/// to nodes with absent handles instead of failing.
pub fn parse_node<F>(element: Node<'_, '_>, system: &mut ResultSystem, consumer: F) -> ParseStatus
where
    F: FnOnce(Option<CriteriaNode>),
{
    parse_with_depth(element, system, 1, consumer)
}

fn parse_with_depth<F>(element: Node<'_, '_>, system: &mut ResultSystem, depth: usize, consumer: F) -> ParseStatus
where
    F: FnOnce(Option<CriteriaNode>),
{
    let (status, node) = parse_element(element, system, depth);
    consumer(node);
    status
}

fn parse_element(element: Node<'_, '_>, system: &mut ResultSystem, depth: usize) -> (ParseStatus, Option<CriteriaNode>) {
    let name = element.tag_name().name();
    debug!("parsing <{}>", name);

    if !system.config().allows_depth(depth) {
        warn!(
            "<{}> nested deeper than {} levels, skipping",
            name,
            system.config().max_depth
        );
        return (ParseStatus::Unhandled, None);
    }

    let negate = bool_attribute(element, "negate", false);
    let mut node = match NodeType::from_tag_name(name) {
        Some(NodeType::Criteria) => {
            let operator = operator_attribute(element, "operator", Operator::And);
            let mut node = CriteriaNode::criteria(system, negate, operator);
            for child in child_elements(element) {
                parse_with_depth(child, system, depth + 1, |subnode| match subnode {
                    Some(subnode) => node.add_subnode(subnode),
                    None => debug!("dropping skipped child of <criteria>"),
                });
            }
            node
        }
        Some(NodeType::Criterion) => {
            let test_ref = element.attribute("test_ref").unwrap_or_default();
            let version = u32_attribute(element, "version", 0);
            let variable_instance =
                u32_attribute(element, "variable_instance", DEFAULT_VARIABLE_INSTANCE);

            match system.model().test(test_ref).map(|template| template.version) {
                Some(test_version) if test_version != version => warn!(
                    "unmatched test versions for {}: test version = {}, criterion version = {}",
                    test_ref, test_version, version
                ),
                None => warn!("criterion references unknown test '{}'", test_ref),
                _ => {}
            }

            let test = system.test_for(test_ref);
            CriteriaNode::criterion(system, negate, test, variable_instance)
        }
        Some(NodeType::ExtendDefinition) => {
            let definition_ref = element.attribute("definition_ref").unwrap_or_default();
            let variable_instance =
                u32_attribute(element, "variable_instance", DEFAULT_VARIABLE_INSTANCE);

            let extends = system.definition_for(definition_ref);
            if extends.is_none() {
                warn!("extend_definition references unknown definition '{}'", definition_ref);
            }
            CriteriaNode::extend_definition(system, negate, extends, variable_instance)
        }
        None => {
            warn!("unhandled criteria element <{}>, skipping", name);
            return (ParseStatus::Unhandled, None);
        }
    };

    node.set_result(result_attribute(element, "result", OvalResult::NotEvaluated));
    (ParseStatus::Handled, Some(node))
}
