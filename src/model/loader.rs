//! Loading a `DefinitionModel` from an `oval_definitions` XML document.

use super::{DefinitionModel, DefinitionTemplate, TemplateKind, TemplateNode, TestTemplate};
use crate::config::MAX_CRITERIA_DEPTH;
use crate::error::{Result, ResultsError};
use crate::types::{NodeType, Operator};
use crate::xml::{
    bool_attribute, child_elements, find_child, operator_attribute, u32_attribute,
    DEFINITIONS_NAMESPACE,
};
use roxmltree::{Document, Node};
use std::path::Path;
use tracing::{debug, warn};

impl DefinitionModel {
    /// Parse an `oval_definitions` document.
    ///
    /// A root element in a namespace other than the definitions namespace is
    /// rejected; an unqualified root is accepted.
    pub fn from_xml(content: &str) -> Result<Self> {
        let doc = Document::parse(content)?;
        let root = doc.root_element();
        if let Some(namespace) = root.tag_name().namespace() {
            if namespace != DEFINITIONS_NAMESPACE {
                return Err(ResultsError::malformed(format!(
                    "<{}> is in namespace {}, expected {}",
                    root.tag_name().name(),
                    namespace,
                    DEFINITIONS_NAMESPACE
                )));
            }
        }
        let mut model = DefinitionModel::new();

        if let Some(tests) = find_child(root, "tests") {
            for test in child_elements(tests) {
                model.add_test(parse_test(test)?);
            }
        }

        if let Some(definitions) = find_child(root, "definitions") {
            for definition in child_elements(definitions) {
                if definition.tag_name().name() != "definition" {
                    warn!("skipping <{}> inside <definitions>", definition.tag_name().name());
                    continue;
                }
                model.add_definition(parse_definition(definition)?);
            }
        }

        debug!(
            "loaded definition model: {} definitions, {} tests",
            model.definitions().len(),
            model.tests().len()
        );
        Ok(model)
    }

    /// Read and parse an `oval_definitions` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_xml(&content)
    }
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| ResultsError::missing_attribute(node.tag_name().name(), name))
}

fn parse_test(node: Node) -> Result<TestTemplate> {
    Ok(TestTemplate {
        id: required_attribute(node, "id")?.to_string(),
        version: u32_attribute(node, "version", 0),
        kind: node.tag_name().name().to_string(),
        comment: node.attribute("comment").map(str::to_string),
    })
}

fn parse_definition(node: Node) -> Result<DefinitionTemplate> {
    let id = required_attribute(node, "id")?.to_string();
    let title = find_child(node, "metadata")
        .and_then(|metadata| find_child(metadata, "title"))
        .and_then(|title| title.text())
        .map(|text| text.trim().to_string());

    let criteria = match find_child(node, "criteria") {
        Some(criteria) => parse_template(criteria, 1)?,
        None => None,
    };

    Ok(DefinitionTemplate {
        id,
        version: u32_attribute(node, "version", 0),
        class: node.attribute("class").map(str::to_string),
        title,
        criteria,
    })
}

/// Parse one template criteria element. Unknown elements yield `Ok(None)`.
fn parse_template(node: Node, depth: usize) -> Result<Option<TemplateNode>> {
    let name = node.tag_name().name();
    if depth > MAX_CRITERIA_DEPTH {
        return Err(ResultsError::malformed(format!(
            "criteria nested deeper than {} levels",
            MAX_CRITERIA_DEPTH
        )));
    }

    let negate = bool_attribute(node, "negate", false);
    let kind = match NodeType::from_tag_name(name) {
        Some(NodeType::Criteria) => {
            let mut children = Vec::new();
            for child in child_elements(node) {
                if let Some(template) = parse_template(child, depth + 1)? {
                    children.push(template);
                }
            }
            TemplateKind::Criteria {
                operator: operator_attribute(node, "operator", Operator::And),
                children,
            }
        }
        Some(NodeType::Criterion) => TemplateKind::Criterion {
            test_ref: required_attribute(node, "test_ref")?.to_string(),
        },
        Some(NodeType::ExtendDefinition) => TemplateKind::ExtendDefinition {
            definition_ref: required_attribute(node, "definition_ref")?.to_string(),
        },
        None => {
            warn!("skipping unknown criteria element <{}>", name);
            return Ok(None);
        }
    };

    Ok(Some(TemplateNode { negate, kind }))
}
