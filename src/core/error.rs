use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationMissingArgument,
    ValidationInvalidJson,

    SbomUnsupportedSpec,
    SbomUnknownCompliance,
    SbomVersionUndetected,
    SbomVersionUnsupported,

    FileNotFound,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::SbomUnsupportedSpec => "sbom.unsupported_spec",
            ErrorCode::SbomUnknownCompliance => "sbom.unknown_compliance",
            ErrorCode::SbomVersionUndetected => "sbom.version_undetected",
            ErrorCode::SbomVersionUnsupported => "sbom.version_unsupported",

            ErrorCode::FileNotFound => "file.not_found",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }

    /// Process exit code used when a command fails with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::ValidationMissingArgument
            | ErrorCode::ValidationInvalidJson
            | ErrorCode::SbomUnsupportedSpec
            | ErrorCode::SbomUnknownCompliance => 2,

            ErrorCode::SbomVersionUndetected
            | ErrorCode::SbomVersionUnsupported
            | ErrorCode::FileNotFound
            | ErrorCode::InternalIoError
            | ErrorCode::InternalJsonError
            | ErrorCode::InternalUnexpected => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedValueDetails {
    pub value: String,
    pub supported: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNotFoundDetails {
    pub path: String,
    pub operation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetails {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_json(err: serde_json::Error, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn sbom_unsupported_spec(value: impl Into<String>, supported: &[&str]) -> Self {
        let value = value.into();
        Self::new(
            ErrorCode::SbomUnsupportedSpec,
            format!("Unsupported SBOM specification: {}", value),
            to_details(UnsupportedValueDetails {
                value,
                supported: supported.iter().map(|s| s.to_string()).collect(),
            }),
        )
        .with_hint(format!("Supported specifications: {}", supported.join(", ")))
    }

    pub fn sbom_unknown_compliance(value: impl Into<String>, supported: &[&str]) -> Self {
        let value = value.into();
        Self::new(
            ErrorCode::SbomUnknownCompliance,
            format!("Unknown compliance standard: {}", value),
            to_details(UnsupportedValueDetails {
                value,
                supported: supported.iter().map(|s| s.to_string()).collect(),
            }),
        )
        .with_hint(format!("Supported standards: {}", supported.join(", ")))
    }

    /// `operation` names what the file was needed for, e.g. "read SBOM".
    pub fn file_not_found(path: impl Into<String>, operation: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path),
            to_details(FileNotFoundDetails {
                path,
                operation: operation.into(),
            }),
        )
        .with_hint("Check the path; a leading ~ expands to the home directory")
    }

    pub fn sbom_version_undetected(file: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SbomVersionUndetected,
            "Could not detect the SPDX version of the SBOM",
            to_details(VersionDetails {
                file: file.into(),
                version: None,
            }),
        )
        .with_hint("Check that the file is an SPDX document in a supported format")
    }

    pub fn sbom_version_unsupported(file: impl Into<String>, version: impl Into<String>) -> Self {
        let version = version.into();
        Self::new(
            ErrorCode::SbomVersionUnsupported,
            format!("Unsupported SPDX version: {}", version),
            to_details(VersionDetails {
                file: file.into(),
                version: Some(version),
            }),
        )
        .with_hint("Supported SPDX versions are 2.2, 2.3 and 3.0")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            to_details(InternalIoErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalJsonErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::internal_unexpected(message)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
