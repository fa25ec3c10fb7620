//! Shared parsing primitives: serialization detection and parse failures.

use std::fmt;
use std::fs;
use std::path::Path;

/// Parsing failed; `messages` lists every problem found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub messages: Vec<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn many(messages: Vec<String>) -> Self {
        Self { messages }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Serialization of an SBOM file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    TagValue,
    Xml,
    RdfXml,
    Spreadsheet,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::TagValue => "tag-value",
            Format::Xml => "xml",
            Format::RdfXml => "rdf-xml",
            Format::Spreadsheet => "spreadsheet",
        }
    }

    /// Format implied by the file name, if the extension is known.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();

        if name.ends_with(".rdf.xml") || name.ends_with(".rdf") {
            return Some(Format::RdfXml);
        }

        let ext = name.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext {
            "json" | "jsonld" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "spdx" | "tag" | "tv" => Some(Format::TagValue),
            "xml" => Some(Format::Xml),
            "xls" | "xlsx" => Some(Format::Spreadsheet),
            _ => None,
        }
    }

    /// Guess the format from content when the extension says nothing.
    pub fn sniff(content: &str) -> Option<Self> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            Some(Format::Json)
        } else if trimmed.starts_with('<') {
            if trimmed.contains("rdf:RDF") {
                Some(Format::RdfXml)
            } else {
                Some(Format::Xml)
            }
        } else if trimmed.starts_with("SPDXVersion:") || trimmed.starts_with('#') {
            Some(Format::TagValue)
        } else if trimmed.starts_with("spdxVersion:") || trimmed.starts_with("---") {
            Some(Format::Yaml)
        } else {
            None
        }
    }

    pub fn detect(path: &Path, content: &str) -> Option<Self> {
        Self::from_path(path).or_else(|| Self::sniff(content))
    }
}

/// Read an SBOM file as UTF-8 text.
pub fn read_sbom(path: &Path) -> ParseResult<String> {
    if path.as_os_str().is_empty() {
        return Err(ParseError::new("No SBOM file path provided"));
    }
    if !path.exists() {
        return Err(ParseError::new(format!(
            "File not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| ParseError::new(format!("Failed to read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.spdx.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.YAML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.spdx")), Some(Format::TagValue));
        assert_eq!(Format::from_path(Path::new("a.rdf.xml")), Some(Format::RdfXml));
        assert_eq!(Format::from_path(Path::new("a.xml")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("a.XLSX")), Some(Format::Spreadsheet));
        assert_eq!(Format::from_path(Path::new("a.txt")), None);
    }

    #[test]
    fn sniff_content() {
        assert_eq!(Format::sniff("  {\"a\": 1}"), Some(Format::Json));
        assert_eq!(Format::sniff("<Document/>"), Some(Format::Xml));
        assert_eq!(Format::sniff("<rdf:RDF>"), Some(Format::RdfXml));
        assert_eq!(Format::sniff("SPDXVersion: SPDX-2.3"), Some(Format::TagValue));
        assert_eq!(Format::sniff("spdxVersion: SPDX-2.3"), Some(Format::Yaml));
        assert_eq!(Format::sniff("hello"), None);
    }

    #[test]
    fn read_sbom_reports_empty_and_missing_paths() {
        let err = read_sbom(Path::new("")).unwrap_err();
        assert!(err.messages[0].contains("No SBOM file path"));

        let err = read_sbom(Path::new("/nonexistent/path/to/file.spdx")).unwrap_err();
        assert!(err.messages[0].contains("File not found"));
    }

    #[test]
    fn read_sbom_rejects_invalid_utf8() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"\xff\xfe\x00\x00SPDXVersion: SPDX-2.3").unwrap();
        assert!(read_sbom(temp.path()).is_err());
    }
}
