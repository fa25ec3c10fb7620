//! SPDX 3.0 JSON-LD documents.
//!
//! Elements live in a flat `@graph` and refer to each other by `spdxId`.
//! The reader indexes the graph, then resolves creation info, agents,
//! packages and relationships into the shared [`Document`] model.

mod validate;

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

pub use validate::validate;

use crate::messages::{ElementType, ParsedSbom, ValidationContext, ValidationMessage};
use crate::model::{
    Actor, ActorKind, Document, Package, Relationship, RelationshipKind, Supplier, NOASSERTION,
    NONE,
};
use crate::parse::{self, ParseError, ParseResult};

const CONCLUDED_LICENSE: &str = "hasConcludedLicense";

// Named individuals of the 3.0.x vocabulary, valid wherever an element is expected.
static INDIVIDUAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https://spdx\.org/rdf/3\.0(?:\.\d+)?/terms/(Core/NoneElement|Core/NoAssertionElement|ExpandedLicensing/NoneLicense|ExpandedLicensing/NoAssertionLicense)$",
    )
    .unwrap()
});

/// `true` for `Core/NoneElement`, `Core/NoAssertionElement` and the
/// `ExpandedLicensing` none/no-assertion licenses under any 3.0.x IRI.
pub fn is_vocabulary_individual(id: &str) -> bool {
    INDIVIDUAL_PATTERN.is_match(id)
}

fn str_field<'a>(element: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| element.get(*k).and_then(Value::as_str))
}

fn element_type(element: &Value) -> &str {
    str_field(element, &["type", "@type"]).unwrap_or_default()
}

fn element_id(element: &Value) -> Option<&str> {
    str_field(element, &["spdxId", "@id"])
}

/// A JSON-LD reference may be a plain string or an object carrying an id.
fn reference(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(_) => element_id(value),
        _ => None,
    }
}

fn references(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(reference).collect(),
        Some(single) => reference(single).into_iter().collect(),
        None => Vec::new(),
    }
}

fn agent_kind(type_name: &str) -> Option<ActorKind> {
    match type_name {
        "Person" => Some(ActorKind::Person),
        "Organization" => Some(ActorKind::Organization),
        "Tool" | "SoftwareAgent" | "Agent" => Some(ActorKind::Tool),
        _ => None,
    }
}

struct Graph<'a> {
    elements: Vec<&'a Value>,
    by_id: HashMap<&'a str, &'a Value>,
}

impl<'a> Graph<'a> {
    fn new(items: &'a [Value]) -> Self {
        let by_id = items
            .iter()
            .filter_map(|e| element_id(e).map(|id| (id, e)))
            .collect();
        Self {
            elements: items.iter().collect(),
            by_id,
        }
    }

    fn of_type(&self, type_name: &'a str) -> impl Iterator<Item = &'a Value> + '_ {
        self.elements
            .iter()
            .copied()
            .filter(move |e| element_type(e) == type_name)
    }

    fn resolve(&self, value: &'a Value) -> Option<&'a Value> {
        match value {
            Value::String(id) => self.by_id.get(id.as_str()).copied(),
            Value::Object(_) => Some(value),
            _ => None,
        }
    }

    /// Agent by id; unknown ids still yield an actor named after the id.
    fn actor(&self, id: &str) -> Actor {
        match self.by_id.get(id) {
            Some(agent) => Actor {
                kind: agent_kind(element_type(agent)).unwrap_or(ActorKind::Tool),
                name: str_field(agent, &["name"]).unwrap_or(id).to_string(),
                email: None,
            },
            None => Actor {
                kind: ActorKind::Tool,
                name: id.to_string(),
                email: None,
            },
        }
    }

    /// License expression text for a license element id.
    fn license_text(&self, id: &str) -> String {
        if is_vocabulary_individual(id) {
            let none = id.ends_with("/NoneLicense") || id.ends_with("/NoneElement");
            return if none { NONE } else { NOASSERTION }.to_string();
        }
        self.by_id
            .get(id)
            .and_then(|lic| {
                str_field(
                    lic,
                    &["simplelicensing_licenseExpression", "expandedlicensing_licenseId", "name"],
                )
            })
            .unwrap_or(id)
            .to_string()
    }
}

pub fn parse_str(content: &str) -> ParseResult<ParsedSbom> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| ParseError::new(format!("JSON error: {}", e)))?;

    let items = root
        .get("@graph")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::new("Not an SPDX 3 JSON-LD document: \"@graph\" is missing"))?;

    let graph = Graph::new(items);
    let mut issues = Vec::new();

    let spdx_document = graph
        .of_type("SpdxDocument")
        .next()
        .or_else(|| graph.of_type("software_Sbom").next());
    let doc_id = spdx_document.and_then(element_id).unwrap_or_default().to_string();
    let parent = (!doc_id.is_empty()).then_some(doc_id.as_str());

    let creation_info = spdx_document
        .and_then(|d| d.get("creationInfo"))
        .and_then(|ci| graph.resolve(ci))
        .or_else(|| graph.of_type("CreationInfo").next());

    let (spec_version, created, creators) = match creation_info {
        Some(ci) => (
            str_field(ci, &["specVersion"]).unwrap_or_default().to_string(),
            str_field(ci, &["created"]).map(str::to_string),
            references(ci.get("createdBy"))
                .into_iter()
                .map(|id| graph.actor(id))
                .collect(),
        ),
        None => {
            issues.push(ValidationMessage::new(
                "no CreationInfo found in the document",
                ValidationContext::new(parent, None, ElementType::CreationInfo),
            ));
            (String::new(), None, Vec::new())
        }
    };

    let mut relationships = Vec::new();
    let mut concluded: HashMap<&str, String> = HashMap::new();
    for rel in graph.of_type("Relationship") {
        let from = str_field(rel, &["from"]).unwrap_or_default();
        let rel_type = str_field(rel, &["relationshipType"]).unwrap_or_default();
        let targets = references(rel.get("to"));

        if rel_type == CONCLUDED_LICENSE {
            if let Some(first) = targets.first() {
                concluded.insert(from, graph.license_text(first));
            }
        }

        let kind = RelationshipKind::parse(rel_type);
        relationships.extend(targets.into_iter().map(|to| Relationship {
            from: from.to_string(),
            kind,
            to: to.to_string(),
        }));
    }

    let mut packages = Vec::new();
    for pkg in graph.of_type("software_Package") {
        let id = element_id(pkg);
        if id.is_none() {
            issues.push(ValidationMessage::new(
                format!(
                    "package \"{}\" has no spdxId",
                    str_field(pkg, &["name"]).unwrap_or_default()
                ),
                ValidationContext::new(None, parent, ElementType::Package),
            ));
        }

        let supplier = match pkg.get("suppliedBy").and_then(reference) {
            Some(agent) => Supplier::Actor(graph.actor(agent)),
            None => Supplier::Missing,
        };

        packages.push(Package {
            spdx_id: id.unwrap_or_default().to_string(),
            name: str_field(pkg, &["name"]).unwrap_or_default().to_string(),
            version: str_field(pkg, &["software_packageVersion", "packageVersion"])
                .map(str::to_string),
            supplier,
            license_concluded: id.and_then(|id| concluded.get(id).cloned()),
            copyright_text: str_field(pkg, &["software_copyrightText", "copyrightText"])
                .map(str::to_string),
            download_location: str_field(pkg, &["software_downloadLocation", "downloadLocation"])
                .map(str::to_string),
        });
    }

    let mut root_elements: Vec<String> = Vec::new();
    for container in graph
        .of_type("SpdxDocument")
        .chain(graph.of_type("software_Sbom"))
    {
        for id in references(container.get("rootElement")) {
            if !root_elements.iter().any(|r| r == id) {
                root_elements.push(id.to_string());
            }
        }
    }

    for element in &graph.elements {
        let reported = matches!(element_type(element), "CreationInfo" | "software_Package");
        if element_id(element).is_none() && !reported {
            issues.push(ValidationMessage::new(
                format!("{} element has no spdxId", element_type(element)),
                ValidationContext::new(None, parent, ElementType::Element),
            ));
        }
    }

    // Elements declared in other documents through `import` resolve like local ones.
    let imported = spdx_document
        .and_then(|d| d.get("import"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| graph.resolve(entry))
        .filter_map(|map| str_field(map, &["externalSpdxId"]));

    let other_element_ids = graph
        .elements
        .iter()
        .filter(|e| element_type(e) != "software_Package")
        .filter_map(|e| element_id(e))
        .chain(imported)
        .map(str::to_string)
        .collect();

    let name = spdx_document
        .and_then(|d| str_field(d, &["name"]))
        .unwrap_or_default()
        .to_string();

    let document = Document {
        spdx_id: doc_id,
        name,
        spec_version,
        namespace: None,
        creators,
        created,
        packages,
        relationships,
        root_elements,
        other_element_ids,
    };

    Ok(ParsedSbom {
        document,
        conversion_issues: issues,
    })
}

pub fn parse_file(path: &Path) -> ParseResult<ParsedSbom> {
    let content = parse::read_sbom(path)?;
    debug!("Parsing {} as JSON-LD", path.display());
    parse_str(&content)
}
