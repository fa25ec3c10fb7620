//! Validation messages attached to a parsed SBOM.

use serde::Serialize;

use crate::model::Document;

/// Kind of SBOM element a validation message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementType {
    Document,
    CreationInfo,
    Package,
    Relationship,
    Agent,
    Element,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Document => "Document",
            ElementType::CreationInfo => "CreationInfo",
            ElementType::Package => "Package",
            ElementType::Relationship => "Relationship",
            ElementType::Agent => "Agent",
            ElementType::Element => "Element",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the document a validation problem was found. Any field may be unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationContext {
    pub spdx_id: Option<String>,
    pub parent_id: Option<String>,
    pub element_type: Option<ElementType>,
}

impl ValidationContext {
    pub fn new(
        spdx_id: Option<&str>,
        parent_id: Option<&str>,
        element_type: ElementType,
    ) -> Self {
        Self {
            spdx_id: spdx_id.map(str::to_string),
            parent_id: parent_id.map(str::to_string),
            element_type: Some(element_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ValidationContext>,
}

impl ValidationMessage {
    pub fn new(message: impl Into<String>, context: ValidationContext) -> Self {
        Self {
            message: message.into(),
            context: Some(context),
        }
    }

    pub fn bare(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }
}

/// Parser output: the normalized document plus problems found while
/// normalizing it (kept separate so `--skip-validation` can drop them).
#[derive(Debug, Clone)]
pub struct ParsedSbom {
    pub document: Document,
    pub conversion_issues: Vec<ValidationMessage>,
}
