//! Structural validation of SPDX 2 documents.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::messages::{ElementType, ValidationContext, ValidationMessage};
use crate::model::{Document, DOCUMENT_SPDX_ID, NOASSERTION, NONE};

pub const SUPPORTED_VERSIONS: &[&str] = &["SPDX-2.2", "SPDX-2.3"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

static SPDX_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SPDXRef-[A-Za-z0-9.\-]+$").unwrap());

// Element in another document, e.g. `DocumentRef-base:SPDXRef-lib`
static EXTERNAL_REF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^DocumentRef-[A-Za-z0-9.\-]+:SPDXRef-[A-Za-z0-9.\-]+$").unwrap()
});

static URI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s#]+$").unwrap());

/// `true` for timestamps of the form `2024-05-01T10:00:00Z`.
pub fn is_valid_timestamp(value: &str) -> bool {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).is_ok()
}

pub fn validate(doc: &Document) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let doc_id = (!doc.spdx_id.is_empty()).then_some(doc.spdx_id.as_str());
    let doc_context = || ValidationContext::new(doc_id, None, ElementType::Document);

    if !SUPPORTED_VERSIONS.contains(&doc.spec_version.trim()) {
        messages.push(ValidationMessage::new(
            format!(
                "spdx_version must be one of {}, but is: {}",
                SUPPORTED_VERSIONS.join(", "),
                doc.spec_version
            ),
            doc_context(),
        ));
    }

    if doc.spdx_id != DOCUMENT_SPDX_ID {
        messages.push(ValidationMessage::new(
            format!(
                "document SPDXID must be \"{}\", but is: {}",
                DOCUMENT_SPDX_ID, doc.spdx_id
            ),
            doc_context(),
        ));
    }

    if doc.name.trim().is_empty() {
        messages.push(ValidationMessage::new(
            "document name must not be empty",
            doc_context(),
        ));
    }

    match doc.namespace.as_deref() {
        Some(ns) if URI_PATTERN.is_match(ns.trim()) => {}
        Some(ns) => messages.push(ValidationMessage::new(
            format!(
                "document_namespace must be a valid URI without a '#' part, but is: {}",
                ns
            ),
            doc_context(),
        )),
        None => messages.push(ValidationMessage::new(
            "document_namespace is missing",
            doc_context(),
        )),
    }

    let creation_context = || ValidationContext::new(None, doc_id, ElementType::CreationInfo);
    if doc.creators.is_empty() {
        messages.push(ValidationMessage::new(
            "creators must contain at least one element",
            creation_context(),
        ));
    }

    match doc.created.as_deref() {
        Some(created) if is_valid_timestamp(created) => {}
        Some(created) => messages.push(ValidationMessage::new(
            format!(
                "created must be a timestamp of the form YYYY-MM-DDThh:mm:ssZ, but is: {}",
                created
            ),
            creation_context(),
        )),
        None => messages.push(ValidationMessage::new(
            "created timestamp is missing",
            creation_context(),
        )),
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for package in &doc.packages {
        let id = (!package.spdx_id.is_empty()).then_some(package.spdx_id.as_str());
        let context = || ValidationContext::new(id, doc_id, ElementType::Package);

        match id {
            Some(id) if !SPDX_ID_PATTERN.is_match(id) => {
                messages.push(ValidationMessage::new(
                    format!(
                        "spdx_id must only contain letters, numbers, \".\" and \"-\" and must begin with \"SPDXRef-\", but is: {}",
                        id
                    ),
                    context(),
                ));
            }
            Some(id) if !seen.insert(id) => {
                messages.push(ValidationMessage::new(
                    format!("spdx_id must be unique, but {} occurs more than once", id),
                    context(),
                ));
            }
            Some(_) => {}
            None => messages.push(ValidationMessage::new(
                format!("package \"{}\" has no SPDXID", package.name),
                context(),
            )),
        }

        if !package.has_name() {
            messages.push(ValidationMessage::new(
                "package name must not be empty",
                context(),
            ));
        }

        if package
            .download_location
            .as_deref()
            .map_or(true, |l| l.trim().is_empty())
        {
            messages.push(ValidationMessage::new(
                "download_location must be a URL, NONE or NOASSERTION",
                context(),
            ));
        }
    }

    let known: HashSet<&str> = doc
        .packages
        .iter()
        .map(|p| p.spdx_id.as_str())
        .chain(doc.other_element_ids.iter().map(String::as_str))
        .chain(std::iter::once(doc.spdx_id.as_str()))
        .collect();

    let resolves = |id: &str| {
        known.contains(id) || id == NONE || id == NOASSERTION || EXTERNAL_REF_PATTERN.is_match(id)
    };

    for rel in &doc.relationships {
        for endpoint in [&rel.from, &rel.to] {
            if !resolves(endpoint) {
                messages.push(ValidationMessage::new(
                    format!(
                        "did not find the referenced spdx_id \"{}\" in the SPDX document",
                        endpoint
                    ),
                    ValidationContext::new(Some(rel.from.as_str()), doc_id, ElementType::Relationship),
                ));
            }
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Actor, Package, Relationship, RelationshipKind, Supplier};

    fn valid_document() -> Document {
        Document {
            spdx_id: DOCUMENT_SPDX_ID.to_string(),
            name: "doc".to_string(),
            spec_version: "SPDX-2.3".to_string(),
            namespace: Some("https://example.com/doc-1".to_string()),
            creators: vec![Actor::parse("Tool: builder").unwrap()],
            created: Some("2024-05-01T10:00:00Z".to_string()),
            packages: vec![Package {
                spdx_id: "SPDXRef-app".to_string(),
                name: "app".to_string(),
                version: Some("1.0".to_string()),
                supplier: Supplier::from_spdx2(Some("Organization: ACME")),
                license_concluded: Some("MIT".to_string()),
                copyright_text: Some(NOASSERTION.to_string()),
                download_location: Some(NOASSERTION.to_string()),
            }],
            relationships: vec![Relationship {
                from: DOCUMENT_SPDX_ID.to_string(),
                kind: RelationshipKind::Describes,
                to: "SPDXRef-app".to_string(),
            }],
            root_elements: vec![],
            other_element_ids: vec![],
        }
    }

    #[test]
    fn valid_document_has_no_messages() {
        assert!(validate(&valid_document()).is_empty());
    }

    #[test]
    fn timestamps_must_be_utc_seconds() {
        assert!(is_valid_timestamp("2024-05-01T10:00:00Z"));
        assert!(!is_valid_timestamp("2024-05-01 10:00:00"));
        assert!(!is_valid_timestamp("yesterday"));
    }

    #[test]
    fn bad_package_id_is_reported_with_context() {
        let mut doc = valid_document();
        doc.packages[0].spdx_id = "app".to_string();
        doc.relationships.clear();

        let messages = validate(&doc);
        assert_eq!(messages.len(), 1);
        let context = messages[0].context.as_ref().unwrap();
        assert_eq!(context.spdx_id.as_deref(), Some("app"));
        assert_eq!(context.parent_id.as_deref(), Some(DOCUMENT_SPDX_ID));
        assert_eq!(context.element_type, Some(ElementType::Package));
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let mut doc = valid_document();
        let copy = doc.packages[0].clone();
        doc.packages.push(copy);
        let messages = validate(&doc);
        assert!(messages.iter().any(|m| m.message.contains("unique")));
    }

    #[test]
    fn dangling_relationship_is_reported() {
        let mut doc = valid_document();
        doc.relationships[0].to = "SPDXRef-ghost".to_string();
        let messages = validate(&doc);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.contains("SPDXRef-ghost"));
    }

    #[test]
    fn external_and_special_endpoints_resolve() {
        let mut doc = valid_document();
        doc.relationships.push(Relationship {
            from: "SPDXRef-app".to_string(),
            kind: RelationshipKind::DependsOn,
            to: "DocumentRef-other:SPDXRef-lib".to_string(),
        });
        doc.relationships.push(Relationship {
            from: "SPDXRef-app".to_string(),
            kind: RelationshipKind::Other,
            to: NONE.to_string(),
        });
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn unsupported_version_and_missing_creation_info() {
        let mut doc = valid_document();
        doc.spec_version = "SPDX-1.2".to_string();
        doc.creators.clear();
        doc.created = None;
        let messages = validate(&doc);
        assert_eq!(messages.len(), 3);
    }
}
