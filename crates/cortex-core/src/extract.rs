//! Recovery of structured results from raw model output.
//!
//! Models often wrap JSON in prose and markdown fences. Extraction is split
//! into two pure steps so each can be tested on its own:
//!
//! 1. [`locate_candidate`] picks the text to decode: the interior of the first
//!    fenced block, or the whole trimmed input when there is none.
//! 2. [`extract`] strictly decodes that candidate. No repair is attempted.

use serde::de::DeserializeOwned;

use crate::CoreError;

const FENCE: &str = "```";

/// Locate the text that should hold the structured payload.
///
/// Only the first fenced block is considered, even if the output contains
/// several. An opening fence without a closing one is not a block.
pub fn locate_candidate(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(open) = trimmed.find(FENCE) else {
        return trimmed;
    };
    let after_open = &trimmed[open + FENCE.len()..];

    let body = &after_open[tag_len(after_open)..];

    match body.find(FENCE) {
        Some(close) => body[..close].trim(),
        None => trimmed,
    }
}

/// Length of the language tag directly after an opening fence ("```json").
///
/// A tag starts with an ASCII letter, so a fenced payload such as "```42```"
/// keeps its leading digits.
fn tag_len(after_open: &str) -> usize {
    if !after_open.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return 0;
    }
    after_open
        .find(|c: char| !is_tag_char(c))
        .unwrap_or(after_open.len())
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')
}

/// Decode raw model output into `T`.
///
/// Fails with [`CoreError::MalformedOutput`] carrying the candidate text when
/// it is not valid JSON for `T`. Empty input and empty fences are decode
/// failures, not empty results.
pub fn extract<T: DeserializeOwned>(raw: &str) -> Result<T, CoreError> {
    let candidate = locate_candidate(raw);
    serde_json::from_str(candidate).map_err(|e| CoreError::MalformedOutput {
        candidate: candidate.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    fn fenced(lang: &str, body: &str) -> String {
        format!("```{lang}\n{body}\n```")
    }

    #[test]
    fn test_plain_json() {
        let value: Value = extract("  {\"a\": 1}\n").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let raw = "Here is the result:\n```json\n{\"a\":1}\n```\nThanks!";
        let value: Value = extract(raw).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let raw = "```\n[1, 2, 3]\n```";
        let value: Vec<u32> = extract(raw).unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_fence_on_single_line() {
        let value: Value = extract("```json {\"ok\": true} ```").unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn test_leading_digits_are_not_a_tag() {
        assert_eq!(locate_candidate("```42```"), "42");
        let value: u32 = extract("```42```").unwrap();
        assert_eq!(value, 42);
        let n: i32 = extract("```-1```").unwrap();
        assert_eq!(n, -1);
    }

    #[test]
    fn test_values_survive_fencing() {
        let samples = [
            json!({"summary": "text with `backticks`", "n": [1, 2.5, null]}),
            json!([{"nested": {"deep": "yes"}}]),
            json!("just a string"),
            json!(42),
        ];
        for v in samples {
            let encoded = serde_json::to_string_pretty(&v).unwrap();
            let from_fence: Value = extract(&fenced("json", &encoded)).unwrap();
            let bare: Value = extract(&encoded).unwrap();
            assert_eq!(from_fence, v);
            assert_eq!(bare, v);
        }
    }

    #[test]
    fn test_only_first_block_is_used() {
        let raw = "```json\n{\"first\":1}\n```\nand also\n```json\n{\"second\":2}\n```";
        assert_eq!(locate_candidate(raw), "{\"first\":1}");
    }

    #[test]
    fn test_unclosed_fence_uses_whole_text() {
        let raw = "```json\n{\"a\":1}";
        assert_eq!(locate_candidate(raw), raw);
        assert!(extract::<Value>(raw).unwrap_err().is_malformed_output());
    }

    #[test]
    fn test_not_json() {
        let err = extract::<Value>("not json at all").unwrap_err();
        match err {
            CoreError::MalformedOutput { candidate, .. } => {
                assert_eq!(candidate, "not json at all");
            }
            other => panic!("Expected MalformedOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_fence() {
        let err = extract::<Value>("```json\n```").unwrap_err();
        match err {
            CoreError::MalformedOutput { candidate, .. } => assert!(candidate.is_empty()),
            other => panic!("Expected MalformedOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(extract::<Value>("").unwrap_err().is_malformed_output());
        assert!(extract::<Value>("   \n\t").unwrap_err().is_malformed_output());
    }

    #[test]
    fn test_no_repair_of_trailing_comma() {
        assert!(extract::<Value>("{\"a\": 1,}").is_err());
    }

    #[test]
    fn test_typed_target_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Report {
            summary: String,
        }

        let err = extract::<Report>("```json\n{\"title\": \"x\"}\n```").unwrap_err();
        assert!(err.is_malformed_output());
        assert!(err.to_string().contains("summary"));
    }
}
