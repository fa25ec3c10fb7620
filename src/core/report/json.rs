use serde::Serialize;

use crate::checker::{Compliance, SbomChecker, SbomSpec};
use crate::messages::ValidationMessage;
use crate::model::ComponentRef;

/// Outcome of one per-component element check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementReport<T: Serialize> {
    pub all_provided: bool,
    pub nonconformant_components: Vec<T>,
}

impl<T: Serialize + Clone> ElementReport<T> {
    fn from_missing(missing: &[T]) -> Self {
        Self {
            all_provided: missing.is_empty(),
            nonconformant_components: missing.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub compliance_standard: Compliance,
    pub is_conformant: bool,
    pub sbom_name: String,
    pub sbom_file: String,
    pub sbom_spec: SbomSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,
    pub author_name_provided: bool,
    pub timestamp_provided: bool,
    pub dependency_relationships_provided: bool,
    pub component_names: ElementReport<String>,
    pub component_versions: ElementReport<ComponentRef>,
    pub component_identifiers: ElementReport<String>,
    pub component_suppliers: ElementReport<ComponentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_concluded_licenses: Option<ElementReport<ComponentRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_copyright_texts: Option<ElementReport<ComponentRef>>,
    pub total_number_components: usize,
    pub parsing_error: Vec<String>,
    pub validation_messages: Vec<ValidationMessage>,
}

pub fn output_json(checker: &SbomChecker) -> Report {
    let fsct = checker.compliance == Compliance::Fsct3Min;

    Report {
        compliance_standard: checker.compliance,
        is_conformant: checker.compliant,
        sbom_name: checker.sbom_name.clone(),
        sbom_file: checker.file.display().to_string(),
        sbom_spec: checker.sbom_spec,
        spec_version: checker
            .get_doc_spec_version()
            .map(|(major, minor)| format!("{}.{}", major, minor)),
        author_name_provided: checker.doc_author,
        timestamp_provided: checker.doc_timestamp,
        dependency_relationships_provided: checker.dependency_relationships,
        component_names: ElementReport::from_missing(&checker.components_without_names),
        component_versions: ElementReport::from_missing(&checker.components_without_versions),
        component_identifiers: ElementReport::from_missing(
            &checker.components_without_identifiers,
        ),
        component_suppliers: ElementReport::from_missing(&checker.components_without_suppliers),
        component_concluded_licenses: fsct.then(|| {
            ElementReport::from_missing(&checker.components_without_concluded_licenses)
        }),
        component_copyright_texts: fsct
            .then(|| ElementReport::from_missing(&checker.components_without_copyright_texts)),
        total_number_components: checker.total_number_components,
        parsing_error: checker.parsing_error.clone(),
        validation_messages: checker.validation_messages.clone(),
    }
}
