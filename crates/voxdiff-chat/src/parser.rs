//! Best-effort recovery of the model's JSON reply
//!
//! Models asked for JSON still wrap it in markdown fences or surround it
//! with prose. Extraction is a brace heuristic: the object runs from the
//! first `{` to the last `}`. Braces in prose before or after the object,
//! or a second object, make the slice invalid and parsing fails. That is a
//! known limitation, the caller falls back to the raw text.

use serde::{Deserialize, Deserializer};

const FENCE: &str = "```";

/// The two fields the prompt asks the model for
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModelReply {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    #[serde(default)]
    pub improved_code: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Drop a fence wrapping the whole text
///
/// When the trimmed text opens with a fence, its first line (the fence and
/// any language tag) and a closing fence are removed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    if !trimmed.starts_with(FENCE) {
        return trimmed;
    }

    let body = trimmed.split_once('\n').map_or("", |(_, body)| body);
    let body = body.trim_end();

    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Slice from the first `{` to the last `}` inclusive
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (start < end).then(|| &text[start..=end])
}

/// Parse a raw model reply, `None` when no valid object can be recovered
pub fn parse_model_reply(raw: &str) -> Option<ModelReply> {
    let candidate = find_json_object(strip_code_fence(raw))?;

    match serde_json::from_str(candidate) {
        Ok(reply) => Some(reply),
        Err(error) => {
            tracing::debug!(%error, "model reply is not the expected JSON object");
            None
        }
    }
}
