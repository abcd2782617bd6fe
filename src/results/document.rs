//! Reading and writing the `<system>` section of an OVAL results document.

use super::system::ResultSystem;
use crate::criteria::parse_node;
use crate::error::{Result, ResultsError};
use crate::types::{DefinitionId, OvalResult};
use crate::xml::{child_elements, find_child, result_attribute, RESULTS_NAMESPACE};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use roxmltree::Document;
use std::io::Cursor;
use tracing::{debug, warn};

/// Populate `system` from a results document.
///
/// Definitions and tests unknown to the definition model are skipped with a
/// warning. A parsed criteria tree replaces any tree derived on registration.
/// Returns the definitions read, in document order.
pub fn read_results(system: &mut ResultSystem, content: &str) -> Result<Vec<DefinitionId>> {
    let doc = Document::parse(content)?;
    let system_node = doc
        .descendants()
        .find(|n| n.has_tag_name("system"))
        .ok_or_else(|| ResultsError::malformed("no <system> element in results document"))?;

    let mut read = Vec::new();
    if let Some(definitions) = find_child(system_node, "definitions") {
        for element in child_elements(definitions).filter(|n| n.has_tag_name("definition")) {
            let definition_ref = element
                .attribute("definition_id")
                .ok_or_else(|| ResultsError::missing_attribute("definition", "definition_id"))?;
            let Some(id) = system.definition_for(definition_ref) else {
                warn!("results reference unknown definition {}, skipping", definition_ref);
                continue;
            };

            if let Some(criteria) = find_child(element, "criteria") {
                let mut parsed = None;
                parse_node(criteria, system, |node| parsed = node);
                if let (Some(node), Some(definition)) = (parsed, system.definition_mut(id)) {
                    definition.set_criteria(node);
                }
            }

            let result = result_attribute(element, "result", OvalResult::NotEvaluated);
            if let Some(definition) = system.definition_mut(id) {
                definition.set_result(result);
            }
            read.push(id);
        }
    }

    if let Some(tests) = find_child(system_node, "tests") {
        for element in child_elements(tests).filter(|n| n.has_tag_name("test")) {
            let test_ref = element
                .attribute("test_id")
                .ok_or_else(|| ResultsError::missing_attribute("test", "test_id"))?;
            let Some(id) = system.test_for(test_ref) else {
                warn!("results reference unknown test {}, skipping", test_ref);
                continue;
            };
            let result = result_attribute(element, "result", OvalResult::NotEvaluated);
            if let Some(test) = system.test_mut(id) {
                test.set_result(result);
            }
        }
    }

    debug!("read {} definitions from results document", read.len());
    Ok(read)
}

/// Serialize every registered definition and test of `system`
pub fn write_results(system: &ResultSystem) -> Result<String> {
    let indent = system.config().indent;
    let mut writer = if indent > 0 {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', indent)
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("oval_results");
    root.push_attribute(("xmlns", RESULTS_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("results")))?;
    writer.write_event(Event::Start(BytesStart::new("system")))?;

    writer.write_event(Event::Start(BytesStart::new("definitions")))?;
    for definition in system.definitions() {
        let mut start = BytesStart::new("definition");
        start.push_attribute(("definition_id", definition.id()));
        start.push_attribute(("version", definition.version().to_string().as_str()));
        start.push_attribute(("result", definition.result().as_str()));
        match definition.criteria() {
            Some(criteria) => {
                writer.write_event(Event::Start(start))?;
                criteria.to_dom(system, &mut writer)?;
                writer.write_event(Event::End(BytesEnd::new("definition")))?;
            }
            None => writer.write_event(Event::Empty(start))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new("definitions")))?;

    writer.write_event(Event::Start(BytesStart::new("tests")))?;
    for test in system.tests() {
        let mut start = BytesStart::new("test");
        start.push_attribute(("test_id", test.id()));
        start.push_attribute(("version", test.version().to_string().as_str()));
        start.push_attribute(("result", test.result().as_str()));
        writer.write_event(Event::Empty(start))?;
    }
    writer.write_event(Event::End(BytesEnd::new("tests")))?;

    writer.write_event(Event::End(BytesEnd::new("system")))?;
    writer.write_event(Event::End(BytesEnd::new("results")))?;
    writer.write_event(Event::End(BytesEnd::new("oval_results")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes)
        .map_err(|e| ResultsError::malformed(format!("results document is not UTF-8: {}", e)))
}
