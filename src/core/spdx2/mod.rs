//! SPDX 2.x documents: parsing in every supported serialization, plus validation.

mod raw;
mod tag_value;
mod validate;
mod xml;

use std::path::Path;

use tracing::debug;

pub use validate::{is_valid_timestamp, validate, SUPPORTED_VERSIONS};

use crate::messages::ParsedSbom;
use crate::parse::{self, Format, ParseError, ParseResult};

/// Parse an SPDX 2 document from text in the given serialization.
pub fn parse_str(content: &str, format: Format) -> ParseResult<ParsedSbom> {
    let raw = match format {
        Format::Json => serde_json::from_str::<raw::RawDocument>(content)
            .map_err(|e| ParseError::new(format!("JSON error: {}", e)))?,
        Format::Yaml => serde_yml::from_str::<raw::RawDocument>(content)
            .map_err(|e| ParseError::new(format!("YAML error: {}", e)))?,
        Format::TagValue => tag_value::parse(content)?,
        Format::Xml => xml::parse(content)?,
        Format::RdfXml => {
            return Err(ParseError::new(
                "RDF/XML documents are not supported; convert the SBOM to JSON, YAML, XML or tag-value",
            ))
        }
        Format::Spreadsheet => {
            return Err(ParseError::new("Spreadsheet SBOMs are not supported"));
        }
    };

    if raw.spdx_version.is_none() {
        return Err(ParseError::new(
            "spdxVersion is missing; the file does not look like an SPDX 2 document",
        ));
    }

    Ok(raw.into_parsed())
}

/// Parse an SPDX 2 file, detecting its serialization from the name or content.
pub fn parse_file(path: &Path) -> ParseResult<ParsedSbom> {
    let content = parse::read_sbom(path)?;
    let format = Format::detect(path, &content).ok_or_else(|| {
        ParseError::new(format!(
            "Could not determine the serialization of {}",
            path.display()
        ))
    })?;

    debug!("Parsing {} as {}", path.display(), format.as_str());
    parse_str(&content, format)
}
