use serde_json::Value;

use crate::errors::SummarizeError;

/// Flattens a JSON document into `path: value` lines, one per scalar leaf.
pub(crate) fn extract(bytes: &[u8]) -> Result<String, SummarizeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let mut lines = Vec::new();
    flatten(&value, String::new(), &mut lines);
    Ok(lines.join("\n"))
}

fn flatten(value: &Value, path: String, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten(child, child_path, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten(child, format!("{path}[{i}]"), out);
            }
        }
        Value::Null => {}
        Value::String(s) => push_leaf(out, &path, s),
        other => push_leaf(out, &path, &other.to_string()),
    }
}

fn push_leaf(out: &mut Vec<String>, path: &str, value: &str) {
    if path.is_empty() {
        out.push(value.to_string());
    } else {
        out.push(format!("{path}: {value}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_documents() {
        let json = br#"{"title": "Launch", "owners": ["ana", "li"], "meta": {"draft": false, "notes": null}}"#;
        let text = extract(json).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"title: Launch"));
        assert!(lines.contains(&"owners[0]: ana"));
        assert!(lines.contains(&"owners[1]: li"));
        assert!(lines.contains(&"meta.draft: false"));
        assert!(!text.contains("notes"));
    }

    #[test]
    fn bare_string_document_is_its_own_text() {
        assert_eq!(extract(br#""just text""#).unwrap(), "just text");
    }

    #[test]
    fn invalid_json_is_an_extraction_error() {
        let err = extract(b"{not json").unwrap_err();
        assert!(matches!(err, SummarizeError::Extraction(ref m) if m.starts_with("Failed to parse JSON")));
    }
}
