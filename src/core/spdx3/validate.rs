//! Structural validation of SPDX 3 documents.

use std::collections::HashSet;

use crate::messages::{ElementType, ValidationContext, ValidationMessage};
use crate::model::Document;
use crate::spdx2::is_valid_timestamp;

use super::is_vocabulary_individual;

pub fn validate(doc: &Document) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let doc_id = (!doc.spdx_id.is_empty()).then_some(doc.spdx_id.as_str());

    if doc_id.is_none() {
        messages.push(ValidationMessage::bare(
            "no SpdxDocument or software_Sbom element found",
        ));
    }

    let creation_context = || ValidationContext::new(None, doc_id, ElementType::CreationInfo);
    match doc.version_tuple() {
        Some((3, 0)) => {}
        _ => messages.push(ValidationMessage::new(
            format!("specVersion must be 3.0.x, but is: {}", doc.spec_version),
            creation_context(),
        )),
    }

    if doc.creators.is_empty() {
        messages.push(ValidationMessage::new(
            "createdBy must contain at least one agent",
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

    for package in &doc.packages {
        if !package.has_name() {
            let id = (!package.spdx_id.is_empty()).then_some(package.spdx_id.as_str());
            messages.push(ValidationMessage::new(
                "software_Package name must not be empty",
                ValidationContext::new(id, doc_id, ElementType::Package),
            ));
        }
    }

    let known: HashSet<&str> = doc
        .packages
        .iter()
        .map(|p| p.spdx_id.as_str())
        .chain(doc.other_element_ids.iter().map(String::as_str))
        .collect();
    let resolvable = |id: &str| known.contains(id) || is_vocabulary_individual(id);

    for id in &doc.root_elements {
        if !resolvable(id.as_str()) {
            messages.push(ValidationMessage::new(
                format!("rootElement \"{}\" is not defined in the document", id),
                ValidationContext::new(doc_id, None, ElementType::Document),
            ));
        }
    }

    for rel in &doc.relationships {
        for endpoint in [&rel.from, &rel.to] {
            if !resolvable(endpoint.as_str()) {
                messages.push(ValidationMessage::new(
                    format!(
                        "relationship refers to \"{}\", which is not defined in the document",
                        endpoint
                    ),
                    ValidationContext::new(Some(rel.from.as_str()), doc_id, ElementType::Relationship),
                ));
            }
        }
    }

    messages
}
