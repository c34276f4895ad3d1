//! Reading brick documents from text.
//!
//! Getting the text (file, network, stdin) is the caller's business; this
//! only turns bytes into a [`Brick`] or a raw [`Value`], reporting parse
//! failures together with the JSON path where they happened.
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::brick::Brick;
use crate::registry::TypeRegistry;

#[derive(Debug, Error)]
#[error("at JSON path {path} → {source}")]
pub struct DocumentError {
    pub path: String,
    #[source]
    pub source: serde_json::Error,
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DocumentError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_document_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DocumentError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_document_error)
}

/// Parse a single brick document against a caller-supplied registry.
pub fn brick_from_str(src: &str, types: &TypeRegistry) -> anyhow::Result<Brick> {
    let json: Value = from_str_with_path(src)?;
    Ok(Brick::decode_with(&json, types)?)
}

/// Parse newline-delimited documents, skipping blank lines.
pub fn values_from_ndjson(src: &str) -> Result<Vec<Value>, DocumentError> {
    src.lines()
        .filter(|line| !line.trim().is_empty())
        .map(from_str_with_path::<Value>)
        .collect()
}

fn into_document_error(err: serde_path_to_error::Error<serde_json::Error>) -> DocumentError {
    let path = err.path().to_string();
    DocumentError { path, source: err.into_inner() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brick_error_carries_path() {
        let src = r#"{"name": "root", "components": [{"name": "ok"}]}"#;
        let root: Brick = from_str_with_path(src).unwrap();
        assert_eq!(root.children().len(), 1);

        let err = from_str_with_path::<Vec<Brick>>(r#"[{"name": "a"}, {"width": 1}]"#).unwrap_err();
        assert_eq!(err.path, "[1]");
        assert!(err.to_string().contains("unexpected component name"));
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(from_slice_with_path::<Value>(b"{\"name\": ").is_err());
    }

    #[test]
    fn ndjson_skips_blank_lines() {
        let values = values_from_ndjson("{\"name\":\"a\"}\n\n  \n{\"name\":\"b\"}\n").unwrap();
        assert_eq!(values.len(), 2);
        let bricks: Vec<Brick> = values.iter().map(|v| Brick::decode(v).unwrap()).collect();
        assert_eq!(bricks[1].name(), "b");
    }

    #[test]
    fn brick_from_str_uses_registry() {
        let mut types = TypeRegistry::new();
        types.register_view("Badge").unwrap();
        let b = brick_from_str(r#"{"name": "b", "targetClass": "Badge"}"#, &types).unwrap();
        assert_eq!(b.target().name(), "Badge");
        assert!(brick_from_str(r#"{"targetClass": "Badge"}"#, &types).is_err());
    }
}
