use serde::Deserialize;

use crate::artifacts::clean;
use crate::client::{ChatCompleter, CHAT_MAX_TOKENS, CHAT_TEMPERATURE};

use super::prompts::{render_template, PROMPT_STRUCTURED};

#[derive(Clone, Debug, Deserialize)]
struct StructuredReply {
    #[serde(default)]
    translation: String,
    #[serde(default)]
    #[allow(dead_code)]
    notes: String,
}

/// Re-issue a hop as a structured request after the cleaner flagged the raw
/// completion. Returns the isolated translation and `true` on success; on any
/// failure (transport, parse, missing field) falls back to cleaning the
/// original raw completion and returns `false`. Strictly an enhancement: this
/// never fails the parent hop.
pub fn request_structured(
    raw_completion: &str,
    source_text: &str,
    target_language_name: &str,
    model: &str,
    client: &dyn ChatCompleter,
) -> (String, bool) {
    let prompt = render_template(
        PROMPT_STRUCTURED,
        &[("target_language", target_language_name), ("text", source_text)],
    );

    let reply = match client.complete(model, &prompt, CHAT_TEMPERATURE, CHAT_MAX_TOKENS) {
        Ok(r) => r,
        Err(_) => return (clean(raw_completion).text, false),
    };

    match parse_structured(&reply) {
        Some(translation) => (translation, true),
        None => (clean(raw_completion).text, false),
    }
}

fn parse_structured(reply: &str) -> Option<String> {
    let value = extract_json_obj(reply)?;
    let parsed: StructuredReply = serde_json::from_value(value).ok()?;
    let translation = parsed.translation.trim().to_string();
    if translation.is_empty() {
        return None;
    }
    Some(translation)
}

/// Parse the first JSON object found in `text`, tolerating prose or fencing
/// around it.
fn extract_json_obj(text: &str) -> Option<serde_json::Value> {
    let start = text.find('{')?;
    let slice = &text[start..];
    let mut de = serde_json::Deserializer::from_str(slice);
    serde_json::Value::deserialize(&mut de).ok()
}
