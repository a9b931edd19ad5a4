//! OCR text lookup inside JSON payloads.

use serde_json::Value;
use tracing::debug;

fn text_field(node: Option<&Value>) -> Option<&str> {
    node?.get("text")?.as_str()
}

/// Pull the OCR text out of a JSON payload.
///
/// Tries, in order: top-level `text`, `ocr.text`, `data.text`, then the
/// trimmed non-empty `pages[*].text` joined by newlines. Anything that is
/// not JSON, fails to parse, or has none of these is returned unchanged.
pub fn extract_ocr_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return raw.to_string();
    }

    let root: Value = match serde_json::from_str(trimmed) {
        Ok(root) => root,
        Err(e) => {
            debug!("Input looks like JSON but does not parse ({}), using it as text", e);
            return raw.to_string();
        }
    };

    if let Some(text) = root.get("text").and_then(Value::as_str) {
        return text.to_string();
    }

    for key in ["ocr", "data"] {
        if let Some(text) = text_field(root.get(key)) {
            return text.to_string();
        }
    }

    if let Some(pages) = root.get("pages").and_then(Value::as_array) {
        let joined = pages
            .iter()
            .filter_map(|page| page.get("text").and_then(Value::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if !joined.is_empty() {
            return joined;
        }
    }

    debug!("No OCR text field found in JSON, using raw input");
    raw.to_string()
}
