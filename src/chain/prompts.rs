/// Prompt templates for the chain's call sites. `{{var}}` placeholders are
/// substituted by [`render_template`].
pub const PROMPT_TO_ENGLISH: &str = r#"Translate the following text to English. Provide only the translation without any additional text or explanations:

{{text}}"#;

pub const PROMPT_FROM_ENGLISH: &str = r#"Translate the following English text to {{target_language}}. Provide only the translation without any additional text or explanations:

{{text}}"#;

pub const PROMPT_CONTROL: &str = r#"Translate the following {{source_language}} text back to {{target_language}} to verify accuracy. Provide only the translation without any additional text or explanations:

{{text}}"#;

/// The structured re-query: demands a strict two-key JSON object so the model
/// separates the translation from whatever it wants to say about it.
pub const PROMPT_STRUCTURED: &str = r#"Translate the following text to {{target_language}}.
Return STRICT JSON only (one JSON object). No markdown. No extra text.
Use exactly these two keys:
{"translation":"...","notes":"..."}
Put ONLY the translation in "translation". Put any commentary, caveats or explanations in "notes".

TEXT:
{{text}}"#;

pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        let pat = format!("{{{{{k}}}}}");
        out = out.replace(&pat, v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::render_template;

    #[test]
    fn substitutes_placeholders() {
        let out = render_template("to {{target_language}}: {{text}}", &[
            ("target_language", "Thai"),
            ("text", "hello"),
        ]);
        assert_eq!(out, "to Thai: hello");
    }
}
