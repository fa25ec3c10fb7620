//! SPDX 2 tag-value reader.
//!
//! Lines are `Tag: value`. `<text>...</text>` values may span lines. A
//! `PackageName` tag opens a package section, `FileName`, `SnippetSPDXID` and
//! `LicenseID` open sections whose tags are not needed for conformance checks.

use super::raw::{RawCreationInfo, RawDocument, RawElement, RawPackage, RawRelationship};
use crate::parse::{ParseError, ParseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Document,
    Package,
    File,
    Other,
}

struct Line {
    number: usize,
    tag: String,
    value: String,
}

/// Split content into logical `Tag: value` lines, joining `<text>` blocks.
fn logical_lines(content: &str, errors: &mut Vec<String>) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut physical = content.lines().enumerate();

    while let Some((idx, raw)) = physical.next() {
        let number = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((tag, value)) = trimmed.split_once(':') else {
            errors.push(format!(
                "Line {}: expected 'Tag: value', found: {}",
                number, trimmed
            ));
            continue;
        };

        let tag = tag.trim().to_string();
        let mut value = value.trim().to_string();

        if let Some(rest) = value.strip_prefix("<text>") {
            let mut text = rest.to_string();
            let mut closed = text.contains("</text>");
            while !closed {
                match physical.next() {
                    Some((_, next)) => {
                        text.push('\n');
                        text.push_str(next);
                        closed = next.contains("</text>");
                    }
                    None => break,
                }
            }
            if !closed {
                errors.push(format!(
                    "Line {}: <text> block for {} is never closed",
                    number, tag
                ));
            }
            value = match text.find("</text>") {
                Some(end) => text[..end].to_string(),
                None => text,
            }
            .trim()
            .to_string();
        }

        lines.push(Line { number, tag, value });
    }

    lines
}

fn parse_relationship(line: &Line) -> Result<RawRelationship, String> {
    let parts: Vec<&str> = line.value.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(format!(
            "Line {}: relationship must be '<id> <TYPE> <id>', found: {}",
            line.number, line.value
        ));
    }
    Ok(RawRelationship {
        spdx_element_id: Some(parts[0].to_string()),
        relationship_type: Some(parts[1].to_string()),
        related_spdx_element: Some(parts[2].to_string()),
    })
}

pub(crate) fn parse(content: &str) -> ParseResult<RawDocument> {
    let mut errors = Vec::new();
    let lines = logical_lines(content, &mut errors);

    let mut doc = RawDocument::default();
    let mut creation = RawCreationInfo::default();
    let mut has_creation = false;
    let mut section = Section::Document;

    for line in &lines {
        let value = Some(line.value.clone());
        match line.tag.as_str() {
            "PackageName" => {
                doc.packages.push(RawPackage {
                    name: value,
                    ..RawPackage::default()
                });
                section = Section::Package;
            }
            "FileName" => section = Section::File,
            "SnippetSPDXID" => {
                doc.snippets.push(RawElement { spdx_id: value });
                section = Section::Other;
            }
            "LicenseID" => section = Section::Other,
            "Relationship" => match parse_relationship(line) {
                Ok(rel) => doc.relationships.push(rel),
                Err(e) => errors.push(e),
            },
            "SPDXID" => match section {
                Section::Document => doc.spdx_id = value,
                Section::Package => {
                    if let Some(pkg) = doc.packages.last_mut() {
                        pkg.spdx_id = value;
                    }
                }
                Section::File => doc.files.push(RawElement { spdx_id: value }),
                Section::Other => {}
            },
            tag if section == Section::Package => {
                if let Some(pkg) = doc.packages.last_mut() {
                    match tag {
                        "PackageVersion" => pkg.version_info = value,
                        "PackageSupplier" => pkg.supplier = value,
                        "PackageLicenseConcluded" => pkg.license_concluded = value,
                        "PackageCopyrightText" => pkg.copyright_text = value,
                        "PackageDownloadLocation" => pkg.download_location = value,
                        _ => {}
                    }
                }
            }
            "SPDXVersion" => doc.spdx_version = value,
            "DataLicense" => doc.data_license = value,
            "DocumentName" => doc.name = value,
            "DocumentNamespace" => doc.document_namespace = value,
            "Creator" => {
                has_creation = true;
                creation.creators.push(line.value.clone());
            }
            "Created" => {
                has_creation = true;
                creation.created = value;
            }
            _ => {}
        }
    }

    if doc.spdx_version.is_none() {
        errors.push("SPDXVersion tag is missing".to_string());
    }

    if !errors.is_empty() {
        return Err(ParseError::many(errors));
    }

    if has_creation {
        doc.creation_info = Some(creation);
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SPDXVersion: SPDX-2.3
DataLicense: CC0-1.0
SPDXID: SPDXRef-DOCUMENT
DocumentName: sample
DocumentNamespace: https://example.com/sample
Creator: Organization: ACME
Creator: Tool: builder-1.0
Created: 2024-05-01T10:00:00Z

## Package
PackageName: app
SPDXID: SPDXRef-app
PackageVersion: 1.2.3
PackageSupplier: Organization: ACME
PackageDownloadLocation: NOASSERTION
PackageLicenseConcluded: MIT
PackageCopyrightText: <text>Copyright 2024
ACME Corp</text>

FileName: ./main.c
SPDXID: SPDXRef-file

Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-app
";

    #[test]
    fn parses_document_and_package_sections() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.spdx_version.as_deref(), Some("SPDX-2.3"));
        assert_eq!(doc.spdx_id.as_deref(), Some("SPDXRef-DOCUMENT"));
        assert_eq!(doc.creation_info.as_ref().unwrap().creators.len(), 2);
        assert_eq!(doc.packages.len(), 1);

        let pkg = &doc.packages[0];
        assert_eq!(pkg.spdx_id.as_deref(), Some("SPDXRef-app"));
        assert_eq!(pkg.version_info.as_deref(), Some("1.2.3"));
        assert_eq!(pkg.copyright_text.as_deref(), Some("Copyright 2024\nACME Corp"));
        assert_eq!(doc.relationships.len(), 1);
    }

    #[test]
    fn file_spdxid_does_not_override_package() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.packages[0].spdx_id.as_deref(), Some("SPDXRef-app"));
        assert_eq!(doc.files[0].spdx_id.as_deref(), Some("SPDXRef-file"));
    }

    #[test]
    fn missing_version_is_an_error() {
        let err = parse("DocumentName: x\n").unwrap_err();
        assert!(err.messages.iter().any(|m| m.contains("SPDXVersion")));
    }

    #[test]
    fn malformed_lines_are_reported_with_numbers() {
        let err = parse("SPDXVersion: SPDX-2.3\nthis is not a tag\n").unwrap_err();
        assert!(err.messages[0].starts_with("Line 2"));
    }

    #[test]
    fn unclosed_text_block_is_an_error() {
        let err = parse("SPDXVersion: SPDX-2.3\nDocumentComment: <text>open\n").unwrap_err();
        assert!(err.messages[0].contains("never closed"));
    }

    #[test]
    fn minimal_header_parses() {
        let doc = parse("SPDXVersion: SPDX-2.3\n").unwrap();
        assert!(doc.creation_info.is_none());
        assert!(doc.packages.is_empty());
    }
}
