//! Rendering of checker results: plain-text table, JSON report, HTML page.
//!
//! Every renderer returns a `String`; the `print_*` wrappers write it to
//! stdout unchanged.

mod html;
mod json;

use std::fmt::{self, Display, Write as _};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use html::{output_html, validation_messages_html};
pub use json::{output_json, ElementReport, Report};

use crate::checker::SbomChecker;
use crate::messages::{ValidationContext, ValidationMessage};

pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// How the CLI presents results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text table
    #[default]
    Print,
    /// JSON report
    Json,
    /// Standalone HTML page
    Html,
    /// No output, exit code only
    Quiet,
}

/// Display a possibly absent value, using "N/A" for missing or empty values.
pub fn safe_attr<T: Display>(value: Option<T>) -> String {
    match value.map(|v| v.to_string()) {
        Some(text) if !text.is_empty() => text,
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// `SPDX 2.3` style version label, or N/A without a document.
pub(crate) fn version_label(checker: &SbomChecker) -> String {
    safe_attr(
        checker
            .get_doc_spec_version()
            .map(|(major, minor)| format!("SPDX {}.{}", major, minor)),
    )
}

pub(crate) struct ContextFields<'a>(pub &'a ValidationContext);

impl ContextFields<'_> {
    pub fn spdx_id(&self) -> String {
        safe_attr(self.0.spdx_id.as_deref())
    }

    pub fn parent_id(&self) -> String {
        safe_attr(self.0.parent_id.as_deref())
    }

    pub fn element_type(&self) -> String {
        safe_attr(self.0.element_type)
    }
}

fn has_text(message: &ValidationMessage) -> bool {
    !message.message.trim().is_empty()
}

/// Validation messages as an indented list. Context lines only appear when
/// `verbose` is set and the message carries a context.
pub fn render_validation_messages(messages: &[ValidationMessage], verbose: bool) -> String {
    let mut out = String::new();
    for message in messages.iter().filter(|m| has_text(m)) {
        let _ = writeln!(out, "  - {}", message.message);
        if let (true, Some(context)) = (verbose, &message.context) {
            let fields = ContextFields(context);
            let _ = writeln!(out, "      SPDX ID: {}", fields.spdx_id());
            let _ = writeln!(out, "      Parent ID: {}", fields.parent_id());
            let _ = writeln!(out, "      Element type: {}", fields.element_type());
        }
    }
    out
}

pub fn print_validation_messages(messages: &[ValidationMessage], verbose: bool) {
    print!("{}", render_validation_messages(messages, verbose));
}

/// Components missing required attributes. Empty when parsing failed or
/// nothing is missing.
pub fn render_components_missing_info(checker: &SbomChecker) -> String {
    if !checker.parsing_error.is_empty() {
        return String::new();
    }

    let missing = checker.components_missing_info();
    if missing.is_empty() {
        return String::new();
    }

    let mut out = String::from("Missing required information:\n");
    for component in missing {
        let _ = writeln!(
            out,
            "  - {} ({}): missing {}",
            safe_attr(Some(&component.name)),
            safe_attr(Some(&component.spdx_id)),
            component.missing.join(", ")
        );
    }
    out
}

pub fn print_components_missing_info(checker: &SbomChecker) {
    print!("{}", render_components_missing_info(checker));
}

struct Table<'a>(&'a SbomChecker);

impl Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.0.table_elements();
        let width = rows
            .iter()
            .map(|r| r.label.len())
            .chain(std::iter::once("Individual elements".len()))
            .max()
            .unwrap_or_default();

        writeln!(f, "{:<width$} | Status", "Individual elements", width = width)?;
        writeln!(f, "{}-+-------", "-".repeat(width))?;
        for row in rows {
            writeln!(f, "{:<width$} | {}", row.label, yes_no(row.provided), width = width)?;
        }
        Ok(())
    }
}

/// Human-readable report: headline, element table, then parse errors,
/// validation messages and (when verbose) components missing information.
pub fn render_table_output(checker: &SbomChecker, verbose: bool) -> String {
    let title = checker.compliance.title();
    let mut out = String::new();

    let _ = writeln!(out, "{} conformance check", title);
    let _ = writeln!(out);
    let _ = writeln!(out, "SBOM name: {}", safe_attr(Some(&checker.sbom_name)));
    let _ = writeln!(out, "SBOM file: {}", checker.file.display());
    let _ = writeln!(out, "Specification: {}", version_label(checker));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Is this SBOM {} conformant? {}",
        title,
        yes_no(checker.compliant)
    );
    let _ = writeln!(out);
    let _ = write!(out, "{}", Table(checker));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total number of components: {}",
        checker.total_number_components
    );

    if !checker.parsing_error.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "The following parsing errors were found:");
        for error in &checker.parsing_error {
            let _ = writeln!(out, "  - {}", error);
        }
    }

    if checker.validation_messages.iter().any(has_text) {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "The document is not valid according to the SPDX specification. The following errors were found:"
        );
        out.push_str(&render_validation_messages(
            &checker.validation_messages,
            verbose,
        ));
    }

    if verbose {
        let missing = render_components_missing_info(checker);
        if !missing.is_empty() {
            let _ = writeln!(out);
            out.push_str(&missing);
        }
    }

    out
}

pub fn print_table_output(checker: &SbomChecker, verbose: bool) {
    print!("{}", render_table_output(checker, verbose));
}
