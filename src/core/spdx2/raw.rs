//! Serde shape shared by the SPDX 2 JSON, YAML and XML serializations.

use serde::{Deserialize, Deserializer};

use crate::messages::{ElementType, ParsedSbom, ValidationContext, ValidationMessage};
use crate::model::{
    Actor, Document, Package, Relationship, RelationshipKind, Supplier, DOCUMENT_SPDX_ID,
    NOASSERTION,
};

/// YAML happily turns `versionInfo: 1.0` into a float; accept any scalar.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<Scalar>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(Scalar::into_string)
        .collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawDocument {
    #[serde(deserialize_with = "opt_string")]
    pub spdx_version: Option<String>,
    #[serde(rename = "SPDXID", deserialize_with = "opt_string")]
    pub spdx_id: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub document_namespace: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub data_license: Option<String>,
    pub creation_info: Option<RawCreationInfo>,
    pub packages: Vec<RawPackage>,
    pub relationships: Vec<RawRelationship>,
    #[serde(deserialize_with = "string_list")]
    pub document_describes: Vec<String>,
    pub files: Vec<RawElement>,
    pub snippets: Vec<RawElement>,
}

/// Files and snippets only matter as relationship endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawElement {
    #[serde(rename = "SPDXID", deserialize_with = "opt_string")]
    pub spdx_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawCreationInfo {
    #[serde(deserialize_with = "string_list")]
    pub creators: Vec<String>,
    #[serde(deserialize_with = "opt_string")]
    pub created: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawPackage {
    #[serde(rename = "SPDXID", deserialize_with = "opt_string")]
    pub spdx_id: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub version_info: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub supplier: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub license_concluded: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub copyright_text: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub download_location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawRelationship {
    #[serde(deserialize_with = "opt_string")]
    pub spdx_element_id: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub relationship_type: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub related_spdx_element: Option<String>,
}

impl RawDocument {
    pub fn into_parsed(self) -> ParsedSbom {
        let mut issues = Vec::new();
        let spdx_id = self.spdx_id.unwrap_or_default();
        let doc_id = (!spdx_id.is_empty()).then_some(spdx_id.as_str());

        let mut creators = Vec::new();
        let mut created = None;
        if let Some(info) = self.creation_info {
            for raw in &info.creators {
                match Actor::parse(raw) {
                    Some(actor) => creators.push(actor),
                    None => issues.push(ValidationMessage::new(
                        format!(
                            "creator must be of the form 'Person: ...', 'Organization: ...' or 'Tool: ...', but is: {}",
                            raw
                        ),
                        ValidationContext::new(None, doc_id, ElementType::CreationInfo),
                    )),
                }
            }
            created = info.created;
        }

        let mut packages = Vec::with_capacity(self.packages.len());
        for p in self.packages {
            let supplier = Supplier::from_spdx2(p.supplier.as_deref());
            if let Some(raw) = p.supplier.as_deref() {
                let raw = raw.trim();
                if !raw.is_empty() && raw != NOASSERTION && !supplier.is_provided() {
                    issues.push(ValidationMessage::new(
                        format!("supplier must be NOASSERTION or an actor, but is: {}", raw),
                        ValidationContext::new(p.spdx_id.as_deref(), doc_id, ElementType::Package),
                    ));
                }
            }

            packages.push(Package {
                spdx_id: p.spdx_id.unwrap_or_default(),
                name: p.name.unwrap_or_default(),
                version: p.version_info,
                supplier,
                license_concluded: p.license_concluded,
                copyright_text: p.copyright_text,
                download_location: p.download_location,
            });
        }

        let describing_id = doc_id.unwrap_or(DOCUMENT_SPDX_ID).to_string();
        let mut relationships: Vec<Relationship> = self
            .document_describes
            .iter()
            .map(|target| Relationship {
                from: describing_id.clone(),
                kind: RelationshipKind::Describes,
                to: target.clone(),
            })
            .collect();

        relationships.extend(self.relationships.into_iter().map(|r| Relationship {
            from: r.spdx_element_id.unwrap_or_default(),
            kind: RelationshipKind::parse(r.relationship_type.as_deref().unwrap_or_default()),
            to: r.related_spdx_element.unwrap_or_default(),
        }));

        if self.data_license.as_deref().is_some_and(|l| l.trim() != "CC0-1.0") {
            issues.push(ValidationMessage::new(
                "data_license must be \"CC0-1.0\"",
                ValidationContext::new(doc_id, None, ElementType::Document),
            ));
        }

        let document = Document {
            spdx_id,
            name: self.name.unwrap_or_default(),
            spec_version: self.spdx_version.unwrap_or_default(),
            namespace: self.document_namespace,
            creators,
            created,
            packages,
            relationships,
            root_elements: self.document_describes,
            other_element_ids: self
                .files
                .into_iter()
                .chain(self.snippets)
                .filter_map(|e| e.spdx_id)
                .collect(),
        };

        ParsedSbom {
            document,
            conversion_issues: issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_describes_becomes_relationship() {
        let raw: RawDocument = serde_json::from_str(
            r#"{
                "spdxVersion": "SPDX-2.3",
                "SPDXID": "SPDXRef-DOCUMENT",
                "documentDescribes": ["SPDXRef-app"],
                "packages": [{"SPDXID": "SPDXRef-app", "name": "app"}]
            }"#,
        )
        .unwrap();

        let doc = raw.into_parsed().document;
        assert_eq!(doc.relationships.len(), 1);
        assert_eq!(doc.relationships[0].kind, RelationshipKind::Describes);
        assert_eq!(doc.relationships[0].from, "SPDXRef-DOCUMENT");
        assert_eq!(doc.relationships[0].to, "SPDXRef-app");
    }

    #[test]
    fn yaml_numeric_versions_become_strings() {
        let raw: RawDocument = serde_yml::from_str(
            "spdxVersion: SPDX-2.3\npackages:\n  - SPDXID: SPDXRef-a\n    name: a\n    versionInfo: 2\n",
        )
        .unwrap();
        let doc = raw.into_parsed().document;
        assert_eq!(doc.packages[0].version.as_deref(), Some("2"));
    }

    #[test]
    fn unparseable_creators_are_reported() {
        let raw: RawDocument = serde_json::from_str(
            r#"{"creationInfo": {"creators": ["Tool: x", "bogus"], "created": "2024-01-01T00:00:00Z"}}"#,
        )
        .unwrap();
        let doc = raw.into_parsed().document;
        assert_eq!(doc.creators.len(), 1);
        assert!(doc.has_timestamp());
    }
}
