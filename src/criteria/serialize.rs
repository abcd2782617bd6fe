//! Writing criteria trees into results documents.

use super::node::{CriteriaNode, NodeKind};
use crate::error::Result;
use crate::results::ResultSystem;
use crate::types::DEFAULT_VARIABLE_INSTANCE;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;
use tracing::warn;

impl CriteriaNode {
    /// Emit this subtree as one element (plus children for criteria nodes).
    ///
    /// Elements are written unprefixed; the caller binds the results namespace
    /// as the default namespace of an enclosing element.
    pub fn to_dom<W: Write>(&self, system: &ResultSystem, writer: &mut Writer<W>) -> Result<()> {
        let tag = self.node_type().tag_name();
        let mut start = BytesStart::new(tag);

        match &self.kind {
            NodeKind::Criteria { operator, .. } => {
                start.push_attribute(("operator", operator.as_str()));
            }
            NodeKind::Criterion { test, variable_instance } => {
                match test.and_then(|id| system.test(id)) {
                    Some(test) => {
                        start.push_attribute(("test_ref", test.id()));
                        start.push_attribute(("version", test.version().to_string().as_str()));
                    }
                    None => warn!("writing <criterion> without a resolved test"),
                }
                push_variable_instance(&mut start, *variable_instance);
            }
            NodeKind::ExtendDefinition { extends, variable_instance } => {
                match extends.and_then(|id| system.definition(id)) {
                    Some(definition) => start.push_attribute(("definition_ref", definition.id())),
                    None => warn!("writing <extend_definition> without a resolved definition"),
                }
                push_variable_instance(&mut start, *variable_instance);
            }
        }

        start.push_attribute(("result", self.result.as_str()));
        if self.negate {
            start.push_attribute(("negate", "true"));
        }

        let subnodes = self.subnodes();
        if subnodes.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for subnode in subnodes {
                subnode.to_dom(system, writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        Ok(())
    }
}

fn push_variable_instance(start: &mut BytesStart, variable_instance: u32) {
    if variable_instance != DEFAULT_VARIABLE_INSTANCE {
        start.push_attribute(("variable_instance", variable_instance.to_string().as_str()));
    }
}
