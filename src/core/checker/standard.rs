use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// SBOM specification family of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SbomSpec {
    #[default]
    Spdx2,
    Spdx3,
}

impl SbomSpec {
    pub const NAMES: &'static [&'static str] = &["spdx2", "spdx3"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SbomSpec::Spdx2 => "spdx2",
            SbomSpec::Spdx3 => "spdx3",
        }
    }

    /// Specification family for a detected `(major, minor)` version.
    pub fn for_version((major, _minor): (u32, u32)) -> Option<Self> {
        match major {
            2 => Some(SbomSpec::Spdx2),
            3 => Some(SbomSpec::Spdx3),
            _ => None,
        }
    }
}

impl fmt::Display for SbomSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SbomSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spdx2" => Ok(SbomSpec::Spdx2),
            "spdx3" => Ok(SbomSpec::Spdx3),
            _ => Err(Error::sbom_unsupported_spec(s, Self::NAMES)),
        }
    }
}

/// Minimum elements standard a document is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum Compliance {
    #[default]
    #[value(name = "ntia")]
    #[serde(rename = "ntia")]
    Ntia,
    #[value(name = "fsct3-min")]
    #[serde(rename = "fsct3-min")]
    Fsct3Min,
}

const NTIA_ATTRIBUTES: &[&str] = &["name", "version", "identifier", "supplier"];

const FSCT3_ATTRIBUTES: &[&str] = &[
    "name",
    "version",
    "identifier",
    "supplier",
    "concluded_license",
    "copyright_text",
];

impl Compliance {
    pub const NAMES: &'static [&'static str] = &["ntia", "fsct3-min"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compliance::Ntia => "ntia",
            Compliance::Fsct3Min => "fsct3-min",
        }
    }

    /// Human-readable name of the standard.
    pub fn title(&self) -> &'static str {
        match self {
            Compliance::Ntia => "NTIA Minimum Elements",
            Compliance::Fsct3Min => "FSCT v3 Minimum Expected",
        }
    }

    /// Per-component attributes the standard requires.
    pub fn attributes(&self) -> &'static [&'static str] {
        match self {
            Compliance::Ntia => NTIA_ATTRIBUTES,
            Compliance::Fsct3Min => FSCT3_ATTRIBUTES,
        }
    }
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compliance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ntia" => Ok(Compliance::Ntia),
            "fsct3-min" | "fsct3" => Ok(Compliance::Fsct3Min),
            _ => Err(Error::sbom_unknown_compliance(s, Self::NAMES)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn unsupported_spec_is_rejected() {
        let err = "unsupported_spec".parse::<SbomSpec>().unwrap_err();
        assert_eq!(err.code, ErrorCode::SbomUnsupportedSpec);
        assert!(err.message.contains("Unsupported SBOM specification"));
    }

    #[test]
    fn unknown_compliance_is_rejected() {
        let err = "unknown".parse::<Compliance>().unwrap_err();
        assert_eq!(err.code, ErrorCode::SbomUnknownCompliance);
        assert!(err.message.contains("Unknown compliance standard"));
    }

    #[test]
    fn names_round_trip() {
        assert_eq!("SPDX3".parse::<SbomSpec>().unwrap(), SbomSpec::Spdx3);
        assert_eq!("fsct3-min".parse::<Compliance>().unwrap(), Compliance::Fsct3Min);
        assert_eq!(Compliance::Fsct3Min.to_string(), "fsct3-min");
    }

    #[test]
    fn fsct_extends_ntia_attributes() {
        assert_eq!(Compliance::Ntia.attributes(), ["name", "version", "identifier", "supplier"]);
        assert_eq!(Compliance::Fsct3Min.attributes().len(), 6);
        assert!(Compliance::Fsct3Min.attributes().starts_with(Compliance::Ntia.attributes()));
    }

    #[test]
    fn spec_for_version() {
        assert_eq!(SbomSpec::for_version((2, 3)), Some(SbomSpec::Spdx2));
        assert_eq!(SbomSpec::for_version((3, 0)), Some(SbomSpec::Spdx3));
        assert_eq!(SbomSpec::for_version((3, 1)), Some(SbomSpec::Spdx3));
        assert_eq!(SbomSpec::for_version((1, 0)), None);
    }
}
