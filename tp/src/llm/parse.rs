//! Model response parsing
//!
//! Language models are asked to respond with a single JSON object, but the
//! raw text frequently arrives wrapped in markdown fences or surrounded by
//! prose. All model-output fragility is localized here: every extraction
//! strategy goes through [`parse_json`], which validates and coerces into a
//! typed struct or fails with a [`SchemaError`].

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors produced while locating or decoding the JSON object embedded in a
/// model response
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("No JSON object found in the model's response")]
    MissingObject,

    #[error("Malformed JSON in the model's response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response failed validation: {0}")]
    Invalid(String),
}

/// Locate the JSON object in raw model output and decode it into `T`
///
/// Markdown code fences are stripped first, then the slice from the first
/// `{` through the last `}` is parsed. The model is prompted to emit exactly
/// one object, so the widest-span slice is the right one even when the
/// object contains nested braces.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, SchemaError> {
    let object = locate_object(raw)?;
    debug!(len = object.len(), "parse_json: located candidate object");
    Ok(serde_json::from_str(&object)?)
}

/// Slice out the first-`{`-to-last-`}` span after stripping code fences
fn locate_object(raw: &str) -> Result<String, SchemaError> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let start = cleaned.find('{').ok_or(SchemaError::MissingObject)?;
    let end = cleaned.rfind('}').ok_or(SchemaError::MissingObject)?;
    if end < start {
        return Err(SchemaError::MissingObject);
    }
    Ok(cleaned[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        action: String,
        confidence: f64,
    }

    #[test]
    fn test_parse_bare_object() {
        let parsed: Sample = parse_json(r#"{"action": "make_playlist", "confidence": 0.9}"#).unwrap();
        assert_eq!(parsed.action, "make_playlist");
    }

    #[test]
    fn test_parse_fenced_object() {
        let raw = "```json\n{\"action\": \"play_video\", \"confidence\": 0.8}\n```";
        let parsed: Sample = parse_json(raw).unwrap();
        assert_eq!(parsed.action, "play_video");
    }

    #[test]
    fn test_parse_object_surrounded_by_prose() {
        let raw = "Sure! Here is the classification:\n{\"action\": \"remove_playlist\", \"confidence\": 1.0}\nLet me know if you need more.";
        let parsed: Sample = parse_json(raw).unwrap();
        assert_eq!(parsed.action, "remove_playlist");
    }

    #[test]
    fn test_parse_nested_braces() {
        #[derive(Debug, Deserialize)]
        struct Outer {
            parameters: serde_json::Value,
        }

        let raw = r#"{"parameters": {"playlist_name": "Study Beats"}, "ready_to_execute": true}"#;
        let parsed: Outer = parse_json(raw).unwrap();
        assert_eq!(parsed.parameters["playlist_name"], "Study Beats");
    }

    #[test]
    fn test_no_object_is_error() {
        let result: Result<Sample, _> = parse_json("I could not produce JSON for that.");
        assert!(matches!(result, Err(SchemaError::MissingObject)));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result: Result<Sample, _> = parse_json(r#"{"action": "play_video", "confidence":}"#);
        assert!(matches!(result, Err(SchemaError::Json(_))));
    }

    proptest! {
        /// A valid object survives arbitrary brace-free prose around it
        #[test]
        fn prop_object_found_in_wrapping_prose(
            prefix in "[^{}]{0,40}",
            suffix in "[^{}]{0,40}",
        ) {
            let raw = format!("{prefix}{{\"action\": \"x\", \"confidence\": 0.5}}{suffix}");
            let parsed: Sample = parse_json(&raw).unwrap();
            prop_assert_eq!(parsed.action, "x");
        }

        /// locate_object never panics on arbitrary input
        #[test]
        fn prop_locate_never_panics(raw in ".{0,200}") {
            let _ = locate_object(&raw);
        }
    }
}
