//! CLI output: report emission, error envelope, exit code mapping.

use sbomcheck::error::Hint;
use sbomcheck::report::OutputFormat;
use sbomcheck::{Error, Result};
use serde::Serialize;
use std::io::{self, Write};

use crate::commands::check::CheckOutput;

#[derive(Debug, Serialize)]
pub struct CliResponse {
    pub success: bool,
    pub error: CliError,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl CliResponse {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            error: CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            },
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

fn write_stdout(payload: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = write!(handle, "{}", payload).and_then(|_| handle.flush()) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

/// Write a command's rendered output to stdout.
pub fn emit(output: CheckOutput) -> Result<()> {
    match output {
        CheckOutput::Stdout(text) if text.ends_with('\n') => write_stdout(&text),
        CheckOutput::Stdout(text) => write_stdout(&format!("{}\n", text)),
        CheckOutput::Written(_) | CheckOutput::Silent => Ok(()),
    }
}

/// Report a failed command: the JSON envelope on stdout in json mode,
/// otherwise a message with hints on stderr. Returns the exit code.
pub fn print_error(err: &Error, format: OutputFormat) -> i32 {
    match format {
        OutputFormat::Json => {
            let payload = CliResponse::from_error(err)
                .to_json()
                .map(|json| json + "\n");
            match payload.and_then(|json| write_stdout(&json)) {
                Ok(()) => {}
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        OutputFormat::Quiet => {}
        OutputFormat::Print | OutputFormat::Html => {
            eprintln!("Error: {}", err);
            for hint in &err.hints {
                eprintln!("Hint: {}", hint.message);
            }
        }
    }
    err.code.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_code_and_hints() {
        let err = Error::sbom_version_undetected("missing.spdx");
        let value = serde_json::to_value(CliResponse::from_error(&err)).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "sbom.version_undetected");
        assert_eq!(value["error"]["details"]["file"], "missing.spdx");
        assert!(value["error"]["hints"].is_array());
    }

    #[test]
    fn envelope_omits_empty_hints() {
        let err = Error::internal_unexpected("boom");
        let value = serde_json::to_value(CliResponse::from_error(&err)).unwrap();
        assert!(value["error"].get("hints").is_none());
    }

    #[test]
    fn quiet_errors_still_map_exit_codes() {
        let err = Error::validation_missing_argument(vec!["FILE".to_string()]);
        assert_eq!(print_error(&err, OutputFormat::Quiet), 2);
        let err = Error::sbom_version_unsupported("a.spdx", "1.0");
        assert_eq!(print_error(&err, OutputFormat::Quiet), 1);
    }
}
