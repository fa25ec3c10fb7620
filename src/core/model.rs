//! Normalized SBOM document model.
//!
//! SPDX 2 and SPDX 3 parsers both produce a [`Document`]; compliance checks
//! only ever look at this model.

use serde::Serialize;

/// SPDX ID of the document element in SPDX 2 documents.
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";

pub const NOASSERTION: &str = "NOASSERTION";
pub const NONE: &str = "NONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Person,
    Organization,
    Tool,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::Person => "Person",
            ActorKind::Organization => "Organization",
            ActorKind::Tool => "Tool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub kind: ActorKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Actor {
    /// Parse an SPDX 2 actor string such as `Organization: ACME (ops@acme.io)`.
    pub fn parse(value: &str) -> Option<Self> {
        let (kind, rest) = value.split_once(':')?;
        let kind = match kind.trim() {
            "Person" => ActorKind::Person,
            "Organization" => ActorKind::Organization,
            "Tool" => ActorKind::Tool,
            _ => return None,
        };

        let rest = rest.trim();
        let (name, email) = match (rest.rfind('('), rest.ends_with(')')) {
            (Some(open), true) => {
                let email = rest[open + 1..rest.len() - 1].trim();
                let email = (!email.is_empty()).then(|| email.to_string());
                (rest[..open].trim(), email)
            }
            _ => (rest, None),
        };

        if name.is_empty() {
            return None;
        }

        Some(Self {
            kind,
            name: name.to_string(),
            email,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "actor")]
pub enum Supplier {
    #[default]
    Missing,
    NoAssertion,
    Actor(Actor),
}

impl Supplier {
    pub fn from_spdx2(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Supplier::Missing,
            Some(NOASSERTION) => Supplier::NoAssertion,
            Some(raw) => match Actor::parse(raw) {
                Some(actor) => Supplier::Actor(actor),
                None => Supplier::Missing,
            },
        }
    }

    pub fn is_provided(&self) -> bool {
        matches!(self, Supplier::Actor(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    Describes,
    DescribedBy,
    Contains,
    ContainedBy,
    DependsOn,
    DependencyOf,
    Other,
}

impl RelationshipKind {
    /// Accepts SPDX 2 (`DEPENDS_ON`) and SPDX 3 (`dependsOn`) spellings.
    pub fn parse(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "describes" => RelationshipKind::Describes,
            "describedby" => RelationshipKind::DescribedBy,
            "contains" => RelationshipKind::Contains,
            "containedby" => RelationshipKind::ContainedBy,
            "dependson" => RelationshipKind::DependsOn,
            "dependencyof" => RelationshipKind::DependencyOf,
            _ => RelationshipKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from: String,
    pub kind: RelationshipKind,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub spdx_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub supplier: Supplier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_concluded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub spdx_id: String,
    pub name: String,
    /// Version string as written in the document, e.g. `SPDX-2.3` or `3.0.1`.
    pub spec_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub creators: Vec<Actor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    pub packages: Vec<Package>,
    pub relationships: Vec<Relationship>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub root_elements: Vec<String>,
    /// IDs of elements that are not packages (files, snippets, agents).
    #[serde(skip)]
    pub other_element_ids: Vec<String>,
}

/// A (name, SPDX ID) pair identifying a component in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub name: String,
    pub spdx_id: String,
}

impl From<&Package> for ComponentRef {
    fn from(package: &Package) -> Self {
        Self {
            name: package.name.clone(),
            spdx_id: package.spdx_id.clone(),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn is_unasserted(value: Option<&str>) -> bool {
    is_blank(value) || value.map(str::trim) == Some(NOASSERTION)
}

impl Package {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn has_version(&self) -> bool {
        !is_blank(self.version.as_deref())
    }

    pub fn has_identifier(&self) -> bool {
        !self.spdx_id.trim().is_empty()
    }

    pub fn has_supplier(&self) -> bool {
        self.supplier.is_provided()
    }

    pub fn has_concluded_license(&self) -> bool {
        !is_unasserted(self.license_concluded.as_deref())
    }

    pub fn has_copyright_text(&self) -> bool {
        !is_unasserted(self.copyright_text.as_deref())
    }
}

impl Document {
    /// SPDX IDs of components without names.
    pub fn components_without_names(&self) -> Vec<String> {
        self.packages
            .iter()
            .filter(|p| !p.has_name())
            .map(|p| p.spdx_id.clone())
            .collect()
    }

    pub fn components_without_versions(&self) -> Vec<ComponentRef> {
        self.collect_missing(Package::has_version)
    }

    /// NOASSERTION suppliers count as missing.
    pub fn components_without_suppliers(&self) -> Vec<ComponentRef> {
        self.collect_missing(Package::has_supplier)
    }

    /// Names of components without SPDX IDs.
    pub fn components_without_identifiers(&self) -> Vec<String> {
        self.packages
            .iter()
            .filter(|p| !p.has_identifier())
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn components_without_concluded_licenses(&self) -> Vec<ComponentRef> {
        self.collect_missing(Package::has_concluded_license)
    }

    pub fn components_without_copyright_texts(&self) -> Vec<ComponentRef> {
        self.collect_missing(Package::has_copyright_text)
    }

    fn collect_missing(&self, has: fn(&Package) -> bool) -> Vec<ComponentRef> {
        self.packages
            .iter()
            .filter(|p| !has(p))
            .map(ComponentRef::from)
            .collect()
    }

    pub fn has_author(&self) -> bool {
        !self.creators.is_empty()
    }

    pub fn has_timestamp(&self) -> bool {
        !is_blank(self.created.as_deref())
    }

    /// `(major, minor)` parsed from the SPDX version string.
    pub fn version_tuple(&self) -> Option<(u32, u32)> {
        parse_version_tuple(&self.spec_version)
    }
}

/// Parse `SPDX-2.3`, `2.3`, or `3.0.1` into `(major, minor)`.
pub fn parse_version_tuple(value: &str) -> Option<(u32, u32)> {
    let trimmed = value.trim();
    let numeric = trimmed.strip_prefix("SPDX-").unwrap_or(trimmed);
    let mut parts = numeric.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = parts.next()?.trim().parse().ok()?;
    Some((major, minor))
}
