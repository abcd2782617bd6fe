//! Core value types shared by the criteria engine: results, operators and node kinds.

use serde::Serialize;
use std::fmt;

/// Outcome of evaluating a test, a criteria node or a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OvalResult {
    /// Sentinel for "not computed yet"
    #[default]
    NotEvaluated,
    True,
    False,
    Unknown,
    Error,
    NotApplicable,
    NotChecked,
}

impl OvalResult {
    /// Textual form used in results documents
    pub fn as_str(&self) -> &'static str {
        match self {
            OvalResult::NotEvaluated => "not evaluated",
            OvalResult::True => "true",
            OvalResult::False => "false",
            OvalResult::Unknown => "unknown",
            OvalResult::Error => "error",
            OvalResult::NotApplicable => "not applicable",
            OvalResult::NotChecked => "not checked",
        }
    }

    /// Parse the textual form. Returns None for unrecognized text.
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim() {
            "not evaluated" => Some(OvalResult::NotEvaluated),
            "true" => Some(OvalResult::True),
            "false" => Some(OvalResult::False),
            "unknown" => Some(OvalResult::Unknown),
            "error" => Some(OvalResult::Error),
            "not applicable" => Some(OvalResult::NotApplicable),
            "not checked" => Some(OvalResult::NotChecked),
            _ => None,
        }
    }

    /// Logical inversion when `negate` is set. Only True and False flip.
    pub fn negated_if(self, negate: bool) -> Self {
        match (negate, self) {
            (true, OvalResult::True) => OvalResult::False,
            (true, OvalResult::False) => OvalResult::True,
            (_, other) => other,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        *self != OvalResult::NotEvaluated
    }
}

impl fmt::Display for OvalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combination rule applied to the children of a criteria node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    And,
    Or,
    One,
    Xor,
    /// No child may be true
    #[serde(rename = "NONE")]
    NoneOf,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::One => "ONE",
            Operator::Xor => "XOR",
            Operator::NoneOf => "NONE",
        }
    }

    /// Case-insensitive parse of the operator attribute
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "ONE" => Some(Operator::One),
            "XOR" => Some(Operator::Xor),
            "NONE" => Some(Operator::NoneOf),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of a criteria node, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Criteria,
    Criterion,
    ExtendDefinition,
}

impl NodeType {
    /// Element name used on the wire
    pub fn tag_name(&self) -> &'static str {
        match self {
            NodeType::Criteria => "criteria",
            NodeType::Criterion => "criterion",
            NodeType::ExtendDefinition => "extend_definition",
        }
    }

    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "criteria" => Some(NodeType::Criteria),
            "criterion" => Some(NodeType::Criterion),
            "extend_definition" => Some(NodeType::ExtendDefinition),
            _ => None,
        }
    }
}

/// Handle to a result test owned by a `ResultSystem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TestId(pub(crate) usize);

/// Handle to a result definition owned by a `ResultSystem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DefinitionId(pub(crate) usize);

/// Default variable instance for criterion and extend_definition nodes
pub const DEFAULT_VARIABLE_INSTANCE: u32 = 1;
