//! Minimum elements compliance checking.
//!
//! [`SbomChecker`] parses a document once, optionally validates it, and caches
//! the result of every element check so reports can be rendered from the
//! checker alone. Parsing failures never abort construction: the document is
//! absent, `parsing_error` says why, and every check reports "not provided".

mod standard;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

pub use standard::{Compliance, SbomSpec};

use crate::messages::{ParsedSbom, ValidationMessage};
use crate::model::{ComponentRef, Document, RelationshipKind};
use crate::{spdx2, spdx3};

/// One row of the element/status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableElement {
    pub label: &'static str,
    pub provided: bool,
}

/// A component lacking one or more required attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingComponentInfo {
    pub name: String,
    pub spdx_id: String,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct SbomChecker {
    pub file: PathBuf,
    pub validate: bool,
    pub compliance: Compliance,
    pub sbom_spec: SbomSpec,

    pub doc: Option<Document>,
    pub parsing_error: Vec<String>,
    pub validation_messages: Vec<ValidationMessage>,

    pub doc_version: bool,
    pub doc_author: bool,
    pub doc_timestamp: bool,
    pub dependency_relationships: bool,
    pub components_without_names: Vec<String>,
    pub components_without_versions: Vec<ComponentRef>,
    pub components_without_identifiers: Vec<String>,
    pub components_without_suppliers: Vec<ComponentRef>,
    pub components_without_concluded_licenses: Vec<ComponentRef>,
    pub components_without_copyright_texts: Vec<ComponentRef>,
    pub total_number_components: usize,
    pub sbom_name: String,
    pub compliant: bool,
}

impl SbomChecker {
    pub fn new(
        file: impl AsRef<Path>,
        validate: bool,
        compliance: Compliance,
        sbom_spec: SbomSpec,
    ) -> Self {
        let mut checker = Self {
            file: file.as_ref().to_path_buf(),
            validate,
            compliance,
            sbom_spec,
            doc: None,
            parsing_error: Vec::new(),
            validation_messages: Vec::new(),
            doc_version: false,
            doc_author: false,
            doc_timestamp: false,
            dependency_relationships: false,
            components_without_names: Vec::new(),
            components_without_versions: Vec::new(),
            components_without_identifiers: Vec::new(),
            components_without_suppliers: Vec::new(),
            components_without_concluded_licenses: Vec::new(),
            components_without_copyright_texts: Vec::new(),
            total_number_components: 0,
            sbom_name: String::new(),
            compliant: false,
        };

        if let Some(parsed) = checker.parse_file() {
            if validate {
                checker.validation_messages = checker.run_validation(&parsed);
            }
            checker.doc = Some(parsed.document);
        }

        checker.refresh();
        checker
    }

    /// Parse `self.file` according to `self.sbom_spec`, recording failures
    /// in `parsing_error`.
    pub fn parse_file(&mut self) -> Option<ParsedSbom> {
        debug!("Parsing {} as {}", self.file.display(), self.sbom_spec);

        let result = match self.sbom_spec {
            SbomSpec::Spdx2 => spdx2::parse_file(&self.file),
            SbomSpec::Spdx3 => spdx3::parse_file(&self.file),
        };

        match result {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!("Failed to parse {}: {}", self.file.display(), err);
                self.parsing_error.extend(err.messages);
                None
            }
        }
    }

    fn run_validation(&self, parsed: &ParsedSbom) -> Vec<ValidationMessage> {
        let mut messages = parsed.conversion_issues.clone();
        messages.extend(match self.sbom_spec {
            SbomSpec::Spdx2 => spdx2::validate(&parsed.document),
            SbomSpec::Spdx3 => spdx3::validate(&parsed.document),
        });
        if !messages.is_empty() {
            debug!(
                "{} validation message(s) for {}",
                messages.len(),
                self.file.display()
            );
        }
        messages
    }

    /// Recompute every cached check from `self.doc`.
    pub fn refresh(&mut self) {
        self.doc_version = self.check_doc_version();
        self.doc_author = self.check_author();
        self.doc_timestamp = self.check_timestamp();
        self.dependency_relationships = self.check_dependency_relationships();
        self.components_without_names = self.get_components_without_names();
        self.components_without_versions = self.get_components_without_versions();
        self.components_without_identifiers = self.get_components_without_identifiers();
        self.components_without_suppliers = self.get_components_without_suppliers();
        self.components_without_concluded_licenses =
            self.get_components_without_concluded_licenses();
        self.components_without_copyright_texts = self.get_components_without_copyright_texts();
        self.total_number_components = self.get_total_number_components();
        self.sbom_name = self.get_sbom_name();
        self.compliant = self.check_compliance();
    }

    pub fn get_doc_spec_version(&self) -> Option<(u32, u32)> {
        self.doc.as_ref().and_then(Document::version_tuple)
    }

    pub fn check_doc_version(&self) -> bool {
        self.get_doc_spec_version().is_some()
    }

    pub fn check_author(&self) -> bool {
        self.doc.as_ref().is_some_and(Document::has_author)
    }

    pub fn check_timestamp(&self) -> bool {
        self.doc.as_ref().is_some_and(Document::has_timestamp)
    }

    /// SPDX 2 needs the document to describe something; SPDX 3 needs a root
    /// element or a describes/contains/dependsOn relationship.
    pub fn check_dependency_relationships(&self) -> bool {
        let Some(doc) = &self.doc else {
            return false;
        };

        match self.sbom_spec {
            SbomSpec::Spdx2 => doc.relationships.iter().any(|r| match r.kind {
                RelationshipKind::Describes => r.from == doc.spdx_id,
                RelationshipKind::DescribedBy => r.to == doc.spdx_id,
                _ => false,
            }),
            SbomSpec::Spdx3 => {
                !doc.root_elements.is_empty()
                    || doc.relationships.iter().any(|r| {
                        matches!(
                            r.kind,
                            RelationshipKind::Describes
                                | RelationshipKind::Contains
                                | RelationshipKind::DependsOn
                        )
                    })
            }
        }
    }

    pub fn get_total_number_components(&self) -> usize {
        self.doc.as_ref().map_or(0, |d| d.packages.len())
    }

    pub fn get_sbom_name(&self) -> String {
        self.doc.as_ref().map(|d| d.name.clone()).unwrap_or_default()
    }

    pub fn get_components_without_names(&self) -> Vec<String> {
        self.doc
            .as_ref()
            .map(Document::components_without_names)
            .unwrap_or_default()
    }

    pub fn get_components_without_versions(&self) -> Vec<ComponentRef> {
        self.doc
            .as_ref()
            .map(Document::components_without_versions)
            .unwrap_or_default()
    }

    pub fn get_components_without_identifiers(&self) -> Vec<String> {
        self.doc
            .as_ref()
            .map(Document::components_without_identifiers)
            .unwrap_or_default()
    }

    pub fn get_components_without_suppliers(&self) -> Vec<ComponentRef> {
        self.doc
            .as_ref()
            .map(Document::components_without_suppliers)
            .unwrap_or_default()
    }

    pub fn get_components_without_concluded_licenses(&self) -> Vec<ComponentRef> {
        self.doc
            .as_ref()
            .map(Document::components_without_concluded_licenses)
            .unwrap_or_default()
    }

    pub fn get_components_without_copyright_texts(&self) -> Vec<ComponentRef> {
        self.doc
            .as_ref()
            .map(Document::components_without_copyright_texts)
            .unwrap_or_default()
    }

    /// Evaluate the selected standard against the cached checks.
    pub fn check_compliance(&self) -> bool {
        let ntia = self.doc.is_some()
            && self.doc_author
            && self.doc_timestamp
            && self.dependency_relationships
            && self.components_without_names.is_empty()
            && self.components_without_versions.is_empty()
            && self.components_without_identifiers.is_empty()
            && self.components_without_suppliers.is_empty()
            && self.validation_messages.is_empty();

        match self.compliance {
            Compliance::Ntia => ntia,
            Compliance::Fsct3Min => {
                ntia && self.components_without_concluded_licenses.is_empty()
                    && self.components_without_copyright_texts.is_empty()
            }
        }
    }

    #[deprecated(note = "use `check_compliance` instead")]
    pub fn check_ntia_minimum_elements_compliance(&self) -> bool {
        warn!("check_ntia_minimum_elements_compliance is deprecated, use check_compliance");
        self.check_compliance()
    }

    /// Rows of the element/status table: 7 for NTIA, 9 for FSCT v3.
    pub fn table_elements(&self) -> Vec<TableElement> {
        let mut rows = vec![
            TableElement {
                label: "All component names provided?",
                provided: self.components_without_names.is_empty(),
            },
            TableElement {
                label: "All component versions provided?",
                provided: self.components_without_versions.is_empty(),
            },
            TableElement {
                label: "All component identifiers provided?",
                provided: self.components_without_identifiers.is_empty(),
            },
            TableElement {
                label: "All component suppliers provided?",
                provided: self.components_without_suppliers.is_empty(),
            },
        ];

        if self.compliance == Compliance::Fsct3Min {
            rows.push(TableElement {
                label: "All component concluded licenses provided?",
                provided: self.components_without_concluded_licenses.is_empty(),
            });
            rows.push(TableElement {
                label: "All component copyright texts provided?",
                provided: self.components_without_copyright_texts.is_empty(),
            });
        }

        rows.extend([
            TableElement {
                label: "SBOM author name provided?",
                provided: self.doc_author,
            },
            TableElement {
                label: "SBOM creation timestamp provided?",
                provided: self.doc_timestamp,
            },
            TableElement {
                label: "Dependency relationships provided?",
                provided: self.dependency_relationships,
            },
        ]);

        rows
    }

    /// Components missing any attribute the selected standard requires.
    pub fn components_missing_info(&self) -> Vec<MissingComponentInfo> {
        self.components_missing_attributes(self.compliance.attributes())
    }

    /// Components missing any of `attributes`; unknown attribute names are ignored.
    pub fn components_missing_attributes(&self, attributes: &[&str]) -> Vec<MissingComponentInfo> {
        let Some(doc) = &self.doc else {
            return Vec::new();
        };

        doc.packages
            .iter()
            .filter_map(|package| {
                let missing: Vec<&'static str> = attributes
                    .iter()
                    .filter_map(|attr| {
                        let (label, provided) = match *attr {
                            "name" => ("name", package.has_name()),
                            "version" => ("version", package.has_version()),
                            "identifier" => ("identifier", package.has_identifier()),
                            "supplier" => ("supplier", package.has_supplier()),
                            "concluded_license" => {
                                ("concluded_license", package.has_concluded_license())
                            }
                            "copyright_text" => ("copyright_text", package.has_copyright_text()),
                            _ => return None,
                        };
                        (!provided).then_some(label)
                    })
                    .collect();

                (!missing.is_empty()).then(|| MissingComponentInfo {
                    name: package.name.clone(),
                    spdx_id: package.spdx_id.clone(),
                    missing,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn fixture(rel: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join(rel)
    }

    fn complete_spdx2() -> SbomChecker {
        SbomChecker::new(
            fixture("no_elements_missing/SPDXJSONExample-v2.3.spdx.json"),
            true,
            Compliance::Ntia,
            SbomSpec::Spdx2,
        )
    }

    #[test]
    fn complete_document_is_ntia_compliant() {
        let checker = complete_spdx2();
        assert!(checker.parsing_error.is_empty(), "{:?}", checker.parsing_error);
        assert_eq!(checker.validation_messages, vec![]);
        assert!(checker.doc_author);
        assert!(checker.doc_timestamp);
        assert!(checker.dependency_relationships);
        assert!(checker.doc_version);
        assert_eq!(checker.total_number_components, 3);
        assert_eq!(checker.sbom_name, "SPDX-Tools-v2.0");
        assert!(checker.compliant);
    }

    #[test]
    fn complete_document_is_fsct_compliant() {
        let checker = SbomChecker::new(
            fixture("no_elements_missing/SPDXJSONExample-v2.3.spdx.json"),
            true,
            Compliance::Fsct3Min,
            SbomSpec::Spdx2,
        );
        assert!(checker.compliant);
        assert_eq!(checker.table_elements().len(), 9);
    }

    #[test]
    fn missing_supplier_breaks_compliance() {
        let checker = SbomChecker::new(
            fixture("missing_supplier_name/SPDXJSONExample-v2.3.spdx.json"),
            true,
            Compliance::Ntia,
            SbomSpec::Spdx2,
        );
        assert!(checker.doc.is_some());
        assert!(!checker.compliant);
        assert_eq!(checker.components_without_suppliers.len(), 1);
        assert_eq!(checker.components_without_suppliers[0].name, "glibc");

        let missing = checker.components_missing_info();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].missing, vec!["supplier"]);
    }

    #[test]
    fn tag_value_fixture_checks() {
        let checker = SbomChecker::new(
            fixture("no_elements_missing/example.spdx"),
            true,
            Compliance::Ntia,
            SbomSpec::Spdx2,
        );
        assert!(checker.parsing_error.is_empty(), "{:?}", checker.parsing_error);
        assert!(checker.compliant, "{:?}", checker.validation_messages);
    }

    #[test]
    fn yaml_fixture_checks() {
        let checker = SbomChecker::new(
            fixture("no_elements_missing/example.spdx.yaml"),
            true,
            Compliance::Ntia,
            SbomSpec::Spdx2,
        );
        assert!(checker.compliant, "{:?}", checker.validation_messages);
    }

    #[test]
    fn xml_fixture_checks() {
        let checker = SbomChecker::new(
            fixture("no_elements_missing/example.spdx.xml"),
            true,
            Compliance::Ntia,
            SbomSpec::Spdx2,
        );
        assert!(checker.parsing_error.is_empty(), "{:?}", checker.parsing_error);
        assert!(checker.compliant, "{:?}", checker.validation_messages);
        assert_eq!(checker.sbom_name, "SPDX-Tools-v2.0");
        assert_eq!(checker.total_number_components, 2);
        assert!(checker.doc_version);

        let fsct = SbomChecker::new(
            fixture("no_elements_missing/example.spdx.xml"),
            true,
            Compliance::Fsct3Min,
            SbomSpec::Spdx2,
        );
        assert!(fsct.compliant, "{:?}", fsct.validation_messages);
    }

    #[test]
    fn spdx3_fixtures() {
        let complete = SbomChecker::new(
            fixture("spdx3/no_elements_missing.json"),
            true,
            Compliance::Ntia,
            SbomSpec::Spdx3,
        );
        assert!(complete.parsing_error.is_empty(), "{:?}", complete.parsing_error);
        assert!(complete.compliant, "{:?}", complete.validation_messages);

        let missing = SbomChecker::new(
            fixture("spdx3/missing_elements.json"),
            true,
            Compliance::Ntia,
            SbomSpec::Spdx3,
        );
        assert!(missing.doc.is_some());
        assert!(!missing.compliant);
        assert!(!missing.components_without_versions.is_empty());
        assert!(!missing.components_without_suppliers.is_empty());
    }

    #[test]
    fn empty_path_and_missing_file_are_parse_errors() {
        let mut checker = complete_spdx2();
        checker.file = PathBuf::new();
        assert!(checker.parse_file().is_none());
        assert!(!checker.parsing_error.is_empty());

        let mut checker = complete_spdx2();
        checker.file = PathBuf::from("/nonexistent/path/to/file.spdx");
        assert!(checker.parse_file().is_none());

        let mut checker = complete_spdx2();
        checker.sbom_spec = SbomSpec::Spdx3;
        checker.file = PathBuf::from("/nonexistent/path/to/file.json");
        assert!(checker.parse_file().is_none());
    }

    #[test]
    fn invalid_spdx3_json_leaves_no_document() {
        let mut temp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(temp, "not valid json at all").unwrap();

        let checker = SbomChecker::new(temp.path(), true, Compliance::Ntia, SbomSpec::Spdx3);
        assert!(checker.doc.is_none());
        assert!(!checker.parsing_error.is_empty());
        assert!(!checker.compliant);
    }

    #[test]
    fn missing_document_reports_nothing_provided() {
        let mut checker = complete_spdx2();
        checker.doc = None;

        assert!(!checker.check_author());
        assert!(!checker.check_timestamp());
        assert!(!checker.check_dependency_relationships());
        assert!(!checker.check_doc_version());
        assert_eq!(checker.get_doc_spec_version(), None);
        assert_eq!(checker.get_total_number_components(), 0);
        assert_eq!(checker.get_sbom_name(), "");
        assert!(checker.get_components_without_names().is_empty());
        assert!(checker.get_components_without_versions().is_empty());
        assert!(checker.get_components_without_identifiers().is_empty());
        assert!(checker.get_components_without_suppliers().is_empty());
        assert!(checker.get_components_without_concluded_licenses().is_empty());
        assert!(checker.get_components_without_copyright_texts().is_empty());
        assert!(checker.components_missing_info().is_empty());

        checker.refresh();
        assert!(!checker.compliant);
    }

    #[test]
    fn empty_package_list_counts_zero() {
        let mut checker = complete_spdx2();
        if let Some(doc) = checker.doc.as_mut() {
            doc.packages.clear();
        }
        assert_eq!(checker.get_total_number_components(), 0);
    }

    #[test]
    fn compliance_follows_cached_fields() {
        let mut checker = complete_spdx2();
        assert!(checker.check_compliance());

        checker.doc_author = false;
        assert!(!checker.check_compliance());

        checker.doc_author = true;
        checker.compliance = Compliance::Fsct3Min;
        checker.components_without_copyright_texts.push(ComponentRef {
            name: "x".to_string(),
            spdx_id: "SPDXRef-x".to_string(),
        });
        assert!(!checker.check_compliance());

        checker.compliance = Compliance::Ntia;
        assert!(checker.check_compliance());
        checker.validation_messages.push(ValidationMessage::bare("broken"));
        assert!(!checker.check_compliance());
    }

    #[test]
    #[allow(deprecated)]
    fn deprecated_alias_matches_check_compliance() {
        let checker = complete_spdx2();
        assert_eq!(
            checker.check_ntia_minimum_elements_compliance(),
            checker.check_compliance()
        );
    }

    #[test]
    fn table_has_seven_rows_for_ntia() {
        assert_eq!(complete_spdx2().table_elements().len(), 7);
    }

    #[test]
    fn skip_validation_ignores_invalid_documents() {
        let mut temp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            temp,
            r#"{{"spdxVersion": "SPDX-2.3", "SPDXID": "bad-id", "name": "n",
                "creationInfo": {{"creators": ["Tool: t"], "created": "2024-01-01T00:00:00Z"}},
                "packages": [{{"SPDXID": "SPDXRef-a", "name": "a", "versionInfo": "1",
                               "supplier": "Organization: A"}}],
                "documentDescribes": ["SPDXRef-a"]}}"#
        )
        .unwrap();

        let validated = SbomChecker::new(temp.path(), true, Compliance::Ntia, SbomSpec::Spdx2);
        assert!(!validated.validation_messages.is_empty());
        assert!(!validated.compliant);

        let skipped = SbomChecker::new(temp.path(), false, Compliance::Ntia, SbomSpec::Spdx2);
        assert!(skipped.validation_messages.is_empty());
        assert!(skipped.dependency_relationships);
        assert!(skipped.compliant);
    }
}
