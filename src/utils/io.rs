//! File access for SBOM inputs, the config file and written reports.

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

fn io_error(path: &Path, operation: &str, err: io::Error) -> Error {
    Error::internal_io(
        err.to_string(),
        Some(format!("{} {}", operation, path.display())),
    )
}

/// Read a UTF-8 file. A missing file is `file.not_found`, anything else
/// `internal.io_error` with the path in the context.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::file_not_found(path.display().to_string(), operation),
        _ => io_error(path, operation, e),
    })
}

/// Write a report. The parent directory must already exist.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        let missing_dir = e.kind() == io::ErrorKind::NotFound;
        let err = io_error(path, operation, e);
        match path.parent().filter(|p| missing_dir && !p.as_os_str().is_empty()) {
            Some(dir) => err.with_hint(format!(
                "Create {} before writing the report there",
                dir.display()
            )),
            None => err,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_config_text() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, r#"{{"comply": "ntia"}}"#).unwrap();

        let content = read_file(temp.path(), "read config").unwrap();
        assert_eq!(content, "{\"comply\": \"ntia\"}\n");
    }

    #[test]
    fn missing_input_is_file_not_found() {
        let err = read_file(Path::new("/nonexistent/sbom.spdx.json"), "read SBOM").unwrap_err();
        assert_eq!(err.code.as_str(), "file.not_found");
        assert_eq!(err.details["path"], "/nonexistent/sbom.spdx.json");
        assert_eq!(err.details["operation"], "read SBOM");
    }

    #[test]
    fn directory_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(dir.path(), "read SBOM").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.details["context"]
            .as_str()
            .unwrap()
            .starts_with("read SBOM "));
    }

    #[test]
    fn writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.json");
        write_file(&target, "{\"isConformant\": true}", "write report").unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "{\"isConformant\": true}"
        );
    }

    #[test]
    fn missing_report_directory_gets_a_hint() {
        let err = write_file(
            Path::new("/nonexistent/dir/report.html"),
            "<html></html>",
            "write report",
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.hints[0].message.contains("/nonexistent/dir"));
    }
}
