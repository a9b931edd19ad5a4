//! Raw ticket input loading.

mod json;

pub use json::extract_ocr_text;

use std::path::Path;

use tracing::debug;

use crate::error::InputError;

/// Result type for input operations.
pub type Result<T> = std::result::Result<T, InputError>;

/// Kind of ticket input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Plain OCR text.
    Text,
    /// JSON payload carrying the OCR text.
    Json,
}

impl InputKind {
    /// Determine the kind from the file extension; anything but `.json` is text.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json { InputKind::Json } else { InputKind::Text }
    }
}

/// Extensions picked up when expanding batch inputs.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "json"];

/// Whether a path has one of the supported extensions.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

/// Read a ticket file and return its OCR text.
pub fn load_ocr_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let kind = InputKind::from_path(path);
    debug!("Loaded {} bytes from {} as {:?}", raw.len(), path.display(), kind);

    Ok(match kind {
        InputKind::Json => extract_ocr_text(&raw),
        InputKind::Text => raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(InputKind::from_path(Path::new("a/ticket.JSON")), InputKind::Json);
        assert_eq!(InputKind::from_path(Path::new("ticket.txt")), InputKind::Text);
        assert_eq!(InputKind::from_path(Path::new("ticket")), InputKind::Text);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("x.txt")));
        assert!(is_supported(Path::new("x.Json")));
        assert!(!is_supported(Path::new("x.pdf")));
    }

    #[test]
    fn test_load_json_and_text() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("sample.json");
        std::fs::write(&json_path, r#"{"text": "실중량: 5010 kg"}"#).unwrap();
        assert_eq!(load_ocr_text(&json_path).unwrap(), "실중량: 5010 kg");

        // a .txt file is never parsed as JSON
        let txt_path = dir.path().join("sample.txt");
        std::fs::write(&txt_path, r#"{"text": "x"}"#).unwrap();
        assert_eq!(load_ocr_text(&txt_path).unwrap(), r#"{"text": "x"}"#);
    }

    #[test]
    fn test_missing_file() {
        let err = load_ocr_text(Path::new("/nonexistent/ticket.txt")).unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
    }
}
