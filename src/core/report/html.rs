use std::fmt::Write as _;

use quick_xml::escape::escape;

use super::{safe_attr, version_label, yes_no, ContextFields};
use crate::checker::SbomChecker;
use crate::messages::ValidationMessage;

/// `<ul>` list of validation messages; empty string for no messages.
/// Messages without text are skipped but the list wrapper is kept.
pub fn validation_messages_html(messages: &[ValidationMessage]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut out = String::from("<ul>\n");
    for message in messages {
        if message.message.trim().is_empty() {
            continue;
        }

        let _ = write!(
            out,
            "<li><strong>Validation message:</strong> {}",
            escape(message.message.as_str())
        );
        if let Some(context) = &message.context {
            let fields = ContextFields(context);
            let _ = write!(
                out,
                "<br>\n<strong>Validation context:</strong> SPDX ID: {}, Parent ID: {}, Element type: {}",
                escape(fields.spdx_id().as_str()),
                escape(fields.parent_id().as_str()),
                escape(fields.element_type().as_str())
            );
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>");
    out
}

/// Standalone HTML page with the element table and any errors.
pub fn output_html(checker: &SbomChecker) -> String {
    let title = escape(checker.compliance.title()).into_owned();
    let name = escape(safe_attr(Some(&checker.sbom_name)).as_str()).into_owned();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{} conformance: {}</title>", title, name);
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h2>{} conformance check</h2>", title);
    let _ = writeln!(out, "<p>SBOM name: {}</p>", name);
    let _ = writeln!(
        out,
        "<p>SBOM file: {}</p>",
        escape(checker.file.display().to_string().as_str())
    );
    let _ = writeln!(out, "<p>Specification: {}</p>", escape(version_label(checker).as_str()));
    let _ = writeln!(
        out,
        "<p>Is this SBOM {} conformant? <strong>{}</strong></p>",
        title,
        yes_no(checker.compliant)
    );

    out.push_str("<table>\n<tr><th>Individual elements</th><th>Status</th></tr>\n");
    for row in checker.table_elements() {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(row.label),
            yes_no(row.provided)
        );
    }
    out.push_str("</table>\n");
    let _ = writeln!(
        out,
        "<p>Total number of components: {}</p>",
        checker.total_number_components
    );

    if !checker.parsing_error.is_empty() {
        out.push_str("<h3>Parsing errors</h3>\n<ul>\n");
        for error in &checker.parsing_error {
            let _ = writeln!(out, "<li>{}</li>", escape(error.as_str()));
        }
        out.push_str("</ul>\n");
    }

    let messages = validation_messages_html(&checker.validation_messages);
    if !messages.is_empty() {
        out.push_str("<h3>Validation messages</h3>\n");
        out.push_str(&messages);
        out.push('\n');
    }

    out.push_str("</body>\n</html>\n");
    out
}
