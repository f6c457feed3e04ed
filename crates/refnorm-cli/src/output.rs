//! Output formatting utilities.

use refnorm_canonical::{NormalizeResponse, Normalizer};
use serde_json::{json, Value};

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a response envelope as a single JSON line.
pub fn format_envelope(response: &NormalizeResponse) -> String {
    serde_json::to_string(response)
        .unwrap_or_else(|_| r#"{"ref":null,"error":"unserializable response"}"#.to_string())
}

/// Describes how `input` parses: its components, canonical and familiar
/// forms, or the rejection.
pub fn explain(normalizer: &Normalizer, input: &str) -> Value {
    match normalizer.parse(input) {
        Ok(reference) => json!({
            "input": input,
            "domain": reference.domain,
            "path": reference.path,
            "tag": reference.tag,
            "digest": reference.digest.as_ref().map(|digest| json!({
                "algorithm": digest.algorithm(),
                "hex": digest.hex(),
            })),
            "canonical": normalizer.normalize(&reference),
            "familiar": normalizer.familiarize(&reference),
        }),
        Err(err) => json!({
            "input": input,
            "kind": err.kind(),
            "error": err.to_string(),
        }),
    }
}
