//! Collaborator stubs shared by unit tests.

use crate::criteria::{CriteriaNode, NodeKind};
use crate::model::{DefinitionModel, DefinitionTemplate, TemplateNode, TestTemplate};
use crate::results::{ResultCombiner, ResultSystem, TestEvaluator};
use crate::types::{Operator, OvalResult};
use quick_xml::Writer;
use rustc_hash::FxHashMap;
use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

/// Simplified truth tables, enough to exercise the engine
pub(crate) struct TruthTable {
    pub calls: Rc<Cell<usize>>,
}

impl TruthTable {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (Self { calls: Rc::clone(&calls) }, calls)
    }
}

impl ResultCombiner for TruthTable {
    fn combine(&self, operator: Operator, results: &[OvalResult]) -> OvalResult {
        self.calls.set(self.calls.get() + 1);
        let trues = results.iter().filter(|r| **r == OvalResult::True).count();
        let falses = results.iter().filter(|r| **r == OvalResult::False).count();
        let undecided = results.len() - trues - falses;
        let decided = |b: bool| if b { OvalResult::True } else { OvalResult::False };
        match operator {
            Operator::And if falses > 0 => OvalResult::False,
            Operator::And if undecided > 0 => OvalResult::Unknown,
            Operator::And => OvalResult::True,
            Operator::Or if trues > 0 => OvalResult::True,
            Operator::Or if undecided > 0 => OvalResult::Unknown,
            Operator::Or => OvalResult::False,
            _ if undecided > 0 => OvalResult::Unknown,
            Operator::One => decided(trues == 1),
            Operator::Xor => decided(trues % 2 == 1),
            Operator::NoneOf => decided(trues == 0),
        }
    }
}

/// Test evaluator answering from a fixed table and counting its calls
pub(crate) struct FixedResults {
    results: FxHashMap<String, OvalResult>,
    calls: Rc<Cell<usize>>,
}

impl FixedResults {
    pub fn new(pairs: &[(&str, OvalResult)]) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let results = pairs.iter().map(|(id, r)| (id.to_string(), *r)).collect();
        (Self { results, calls: Rc::clone(&calls) }, calls)
    }
}

impl TestEvaluator for FixedResults {
    fn evaluate(&mut self, test: &TestTemplate) -> OvalResult {
        self.calls.set(self.calls.get() + 1);
        self.results.get(&test.id).copied().unwrap_or(OvalResult::Unknown)
    }
}

/// Three tests and two definitions; `def:root` extends `def:leaf`
pub(crate) fn sample_model() -> DefinitionModel {
    DefinitionModel::new()
        .with_test(TestTemplate::new("tst:1", 1))
        .with_test(TestTemplate::new("tst:2", 2))
        .with_test(TestTemplate::new("tst:3", 1))
        .with_definition(DefinitionTemplate::new(
            "def:leaf",
            1,
            Some(TemplateNode::criteria(Operator::And, vec![TemplateNode::criterion("tst:3")])),
        ))
        .with_definition(DefinitionTemplate::new(
            "def:root",
            4,
            Some(TemplateNode::criteria(
                Operator::Or,
                vec![
                    TemplateNode::criterion("tst:1").negated(),
                    TemplateNode::extend_definition("def:leaf"),
                ],
            )),
        ))
}

/// System over `sample_model` with the truth table and fixed test results
pub(crate) fn sample_system(pairs: &[(&str, OvalResult)]) -> ResultSystem {
    let (table, _) = TruthTable::new();
    let (evaluator, _) = FixedResults::new(pairs);
    ResultSystem::new(sample_model()).with_combiner(table).with_test_evaluator(evaluator)
}

/// Serialize one node without indentation
pub(crate) fn render(node: &CriteriaNode, system: &ResultSystem) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    node.to_dom(system, &mut writer).unwrap();
    String::from_utf8(writer.into_inner().into_inner()).unwrap()
}

/// Canonical description of a tree, independent of the owning system
pub(crate) fn shape(node: &CriteriaNode, system: &ResultSystem) -> String {
    let header = format!("neg={} res={}", node.negate(), node.result());
    match node.kind() {
        NodeKind::Criteria { operator, subnodes } => {
            let children: Vec<String> = subnodes.iter().map(|n| shape(n, system)).collect();
            format!("criteria({} {})[{}]", operator, header, children.join(","))
        }
        NodeKind::Criterion { test, variable_instance } => {
            let id = test.and_then(|t| system.test(t)).map(|t| t.id().to_string());
            format!("criterion({:?} vi={} {})", id, variable_instance, header)
        }
        NodeKind::ExtendDefinition { extends, variable_instance } => {
            let id = extends.and_then(|d| system.definition(d)).map(|d| d.id().to_string());
            format!("extend({:?} vi={} {})", id, variable_instance, header)
        }
    }
}
