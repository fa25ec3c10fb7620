//! SPDX version detection.
//!
//! A full parse is tried first (SPDX 2 or SPDX 3 depending on the requested
//! `SbomSpec`); when that fails the raw text is scanned for the version markers of
//! each serialization.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::checker::SbomSpec;
use crate::model::parse_version_tuple;
use crate::parse::Format;
use crate::{spdx2, spdx3};

/// Version markers, each capturing major and minor.
// Tried in order; the first pattern that matches anywhere in the text wins,
// so SPDX 2 markers outrank SPDX 3 context URLs in mixed content.
static VERSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // tag-value
        r"(?m)^\s*SPDXVersion:\s*SPDX-(\d+)\.(\d+)",
        // JSON
        r#""spdxVersion"\s*:\s*"SPDX-(\d+)\.(\d+)"#,
        // YAML, quoted or bare
        r#"(?m)^\s*spdxVersion:\s*['"]?SPDX-(\d+)\.(\d+)"#,
        // XML
        r"<spdxVersion>\s*SPDX-(\d+)\.(\d+)",
        // RDF/XML
        r"<spdx:specVersion>\s*SPDX-(\d+)\.(\d+)",
        // SPDX 3 JSON-LD context
        r"spdx\.org/rdf/(\d+)\.(\d+)",
        r#""specVersion"\s*:\s*"(\d+)\.(\d+)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Scan text for an SPDX version marker. Precedence follows the pattern
/// list, not the position of the match in `content`.
pub fn scan_version(content: &str) -> Option<(u32, u32)> {
    VERSION_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(content)?;
        let major = caps.get(1)?.as_str().parse().ok()?;
        let minor = caps.get(2)?.as_str().parse().ok()?;
        Some((major, minor))
    })
}

fn parsed_version(path: &Path, sbom_spec: SbomSpec) -> Option<(u32, u32)> {
    let parsed = match sbom_spec {
        SbomSpec::Spdx2 => spdx2::parse_file(path),
        SbomSpec::Spdx3 => spdx3::parse_file(path),
    };

    match parsed {
        Ok(parsed) => parse_version_tuple(&parsed.document.spec_version),
        Err(err) => {
            debug!("Full parse failed, scanning text instead: {}", err);
            None
        }
    }
}

/// Detect the `(major, minor)` SPDX version of a file. Spreadsheets, missing
/// files and non-UTF-8 content yield `None`.
pub fn get_spdx_version(path: &Path, sbom_spec: SbomSpec) -> Option<(u32, u32)> {
    if Format::from_path(path) == Some(Format::Spreadsheet) {
        debug!("Spreadsheet SBOMs are not supported: {}", path.display());
        return None;
    }

    if !path.is_file() {
        debug!("File not found: {}", path.display());
        return None;
    }

    if let Some(version) = parsed_version(path, sbom_spec) {
        return Some(version);
    }

    let bytes = fs::read(path).ok()?;
    let content = String::from_utf8(bytes).ok()?;
    scan_version(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut temp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        temp.write_all(content).unwrap();
        temp
    }

    fn detect(suffix: &str, content: &str) -> Option<(u32, u32)> {
        let temp = temp_with(suffix, content.as_bytes());
        get_spdx_version(temp.path(), SbomSpec::Spdx2)
    }

    #[test]
    fn spreadsheets_are_not_supported() {
        for name in ["test.xls", "test.xlsx", "test.XLS"] {
            assert_eq!(get_spdx_version(Path::new(name), SbomSpec::Spdx2), None);
        }
    }

    #[test]
    fn nonexistent_file() {
        assert_eq!(
            get_spdx_version(Path::new("nonexistent_file.spdx"), SbomSpec::Spdx2),
            None
        );
    }

    #[test]
    fn tag_value() {
        assert_eq!(detect(".spdx", "SPDXVersion: SPDX-2.3\nCreationInfo:\n"), Some((2, 3)));
    }

    #[test]
    fn json() {
        assert_eq!(detect(".json", r#"{"spdxVersion": "SPDX-2.2"}"#), Some((2, 2)));
    }

    #[test]
    fn yaml_bare_and_quoted() {
        assert_eq!(detect(".yaml", "spdxVersion: SPDX-2.3\n"), Some((2, 3)));
        assert_eq!(detect(".yaml", "spdxVersion: 'SPDX-2.2'\n"), Some((2, 2)));
    }

    #[test]
    fn xml() {
        assert_eq!(detect(".xml", "<spdxVersion>SPDX-2.3</spdxVersion>"), Some((2, 3)));
    }

    #[test]
    fn rdf_falls_back_to_text_scan() {
        assert_eq!(
            detect(".txt", "<spdx:specVersion>SPDX-2.2</spdx:specVersion>"),
            Some((2, 2))
        );
    }

    #[test]
    fn spdx3_context() {
        let content = r#""@context": "https://spdx.org/rdf/3.0/spdx-context.jsonld""#;
        assert_eq!(detect(".json", content), Some((3, 0)));

        let temp = temp_with(".json", content.as_bytes());
        assert_eq!(get_spdx_version(temp.path(), SbomSpec::Spdx3), Some((3, 0)));
    }

    #[test]
    fn spdx3_spec_version_from_full_parse() {
        let content = r#"{"@graph": [{"type": "CreationInfo", "specVersion": "3.0.1"}]}"#;
        let temp = temp_with(".jsonld", content.as_bytes());
        assert_eq!(get_spdx_version(temp.path(), SbomSpec::Spdx3), Some((3, 0)));
    }

    #[test]
    fn pattern_order_beats_match_position() {
        let content = "\"specVersion\": \"3.0\"\nSPDXVersion: SPDX-2.2\n";
        assert_eq!(scan_version(content), Some((2, 2)));

        let content = "see https://spdx.org/rdf/3.0/terms\n<spdxVersion>SPDX-2.3</spdxVersion>";
        assert_eq!(scan_version(content), Some((2, 3)));

        assert_eq!(scan_version("\"specVersion\": \"3.0.1\""), Some((3, 0)));
    }

    #[test]
    fn patch_is_ignored() {
        assert_eq!(detect(".json", r#"{"spdxVersion": "SPDX-2.2.1"}"#), Some((2, 2)));
    }

    #[test]
    fn no_version_found() {
        assert_eq!(detect(".txt", "This file has no SPDX version information"), None);
    }

    #[test]
    fn invalid_utf8() {
        let temp = temp_with(".spdx", b"\xff\xfe SPDXVersion: SPDX-2.3");
        assert_eq!(get_spdx_version(temp.path(), SbomSpec::Spdx2), None);
    }
}
