//! Attribute helpers over `roxmltree` nodes.
//!
//! Every helper takes a default that is returned when the attribute is missing.
//! Unparseable values also fall back to the default, with a warning.

use crate::types::{Operator, OvalResult};
use roxmltree::Node;
use tracing::warn;

/// Namespace of OVAL results documents
pub const RESULTS_NAMESPACE: &str = "http://oval.mitre.org/XMLSchema/oval-results-5";
/// Namespace of OVAL definitions documents
pub const DEFINITIONS_NAMESPACE: &str = "http://oval.mitre.org/XMLSchema/oval-definitions-5";

/// Iterate over element children only (skips text, comments, PIs)
pub fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// First element child with the given local name
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    child_elements(node).find(|n| n.tag_name().name() == name)
}

pub fn bool_attribute(node: Node, name: &str, default: bool) -> bool {
    match node.attribute(name) {
        None => default,
        Some(value) => match value.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                warn!(
                    "invalid boolean {}=\"{}\" on <{}>, using {}",
                    name,
                    other,
                    node.tag_name().name(),
                    default
                );
                default
            }
        },
    }
}

pub fn u32_attribute(node: Node, name: &str, default: u32) -> u32 {
    match node.attribute(name) {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(
                "invalid integer {}=\"{}\" on <{}>, using {}",
                name,
                value,
                node.tag_name().name(),
                default
            );
            default
        }),
    }
}

pub fn result_attribute(node: Node, name: &str, default: OvalResult) -> OvalResult {
    match node.attribute(name) {
        None => default,
        Some(value) => OvalResult::from_text(value).unwrap_or_else(|| {
            warn!(
                "invalid result {}=\"{}\" on <{}>, using '{}'",
                name,
                value,
                node.tag_name().name(),
                default
            );
            default
        }),
    }
}

pub fn operator_attribute(node: Node, name: &str, default: Operator) -> Operator {
    match node.attribute(name) {
        None => default,
        Some(value) => Operator::from_text(value).unwrap_or_else(|| {
            warn!(
                "invalid operator {}=\"{}\" on <{}>, using {}",
                name,
                value,
                node.tag_name().name(),
                default
            );
            default
        }),
    }
}
