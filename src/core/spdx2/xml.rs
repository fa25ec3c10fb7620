//! SPDX 2 XML reader.
//!
//! The XML serialization mirrors the JSON one: each JSON key becomes an
//! element and arrays become repeated elements. The element tree is folded
//! into a `serde_json::Value` and then read through the shared raw shape.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::raw::RawDocument;
use crate::parse::{ParseError, ParseResult};

/// Keys that are arrays in the JSON schema even when they occur once.
const ARRAY_KEYS: &[&str] = &[
    "annotations",
    "attributionTexts",
    "checksums",
    "creators",
    "documentDescribes",
    "externalDocumentRefs",
    "externalRefs",
    "files",
    "fileTypes",
    "hasExtractedLicensingInfos",
    "hasFiles",
    "licenseInfoFromFiles",
    "licenseInfoInFiles",
    "packages",
    "ranges",
    "relationships",
    "seeAlsos",
    "snippets",
];

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text.trim().to_string())
        } else {
            Value::Object(self.children)
        }
    }
}

fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            let value = if ARRAY_KEYS.contains(&name.as_str()) {
                Value::Array(vec![value])
            } else {
                value
            };
            parent.insert(name, value);
        }
    }
}

fn local_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.into_owned(),
    }
}

/// Convert an XML document into its JSON-equivalent value (root element content).
pub(crate) fn to_value(content: &str) -> ParseResult<Value> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ParseError::new(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => {
                stack.push(Frame::new(local_name(start.name().as_ref())));
            }
            Event::Empty(empty) => {
                let name = local_name(empty.name().as_ref());
                match stack.last_mut() {
                    Some(parent) => {
                        insert_child(&mut parent.children, name, Value::String(String::new()))
                    }
                    None => root = Some(Value::Object(Map::new())),
                }
            }
            Event::Text(text) => {
                let unescaped = text
                    .unescape()
                    .map_err(|e| ParseError::new(format!("XML text error: {}", e)))?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(ParseError::new("XML error: unexpected closing tag"));
                };
                let name = frame.name.clone();
                let value = frame.into_value();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, value),
                    None => root = Some(value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::new("XML error: document ended inside an element"));
    }

    match root {
        Some(value @ Value::Object(_)) => Ok(value),
        _ => Err(ParseError::new("XML error: root element has no content")),
    }
}

pub(crate) fn parse(content: &str) -> ParseResult<RawDocument> {
    let value = to_value(content)?;
    serde_json::from_value(value)
        .map_err(|e| ParseError::new(format!("XML document does not match SPDX schema: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Document>
  <spdxVersion>SPDX-2.3</spdxVersion>
  <SPDXID>SPDXRef-DOCUMENT</SPDXID>
  <name>xml-sample</name>
  <creationInfo>
    <created>2024-05-01T10:00:00Z</created>
    <creators>Tool: builder</creators>
  </creationInfo>
  <packages>
    <SPDXID>SPDXRef-a</SPDXID>
    <name>a &amp; b</name>
    <versionInfo>1.0</versionInfo>
  </packages>
  <documentDescribes>SPDXRef-a</documentDescribes>
</Document>"#;

    #[test]
    fn single_occurrences_of_array_keys_become_arrays() {
        let value = to_value(SAMPLE).unwrap();
        assert!(value["packages"].is_array());
        assert!(value["creationInfo"]["creators"].is_array());
        assert_eq!(value["spdxVersion"], "SPDX-2.3");
    }

    #[test]
    fn parses_into_raw_document() {
        let doc = parse(SAMPLE).unwrap();
        assert_eq!(doc.packages.len(), 1);
        assert_eq!(doc.packages[0].name.as_deref(), Some("a & b"));
        assert_eq!(doc.document_describes, vec!["SPDXRef-a"]);
    }

    #[test]
    fn repeated_elements_collect() {
        let value = to_value("<Document><tag>a</tag><tag>b</tag></Document>").unwrap();
        assert_eq!(value["tag"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse("<Document><a></b></Document>").is_err());
    }
}
