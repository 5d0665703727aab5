use crate::ir::TranslationResult;
use crate::lang::LanguageTag;

/// Render a completed result for display. The ordering is a contract:
/// the English-equivalent line always comes first, then the non-English
/// target line, then (optionally) the control line, then a blank line and
/// the original text. Every line carries its language flag.
#[must_use]
pub fn format_result(result: &TranslationResult, include_control: bool) -> String {
    let en_flag = LanguageTag::En.flag();
    let mut parts: Vec<String> = Vec::new();

    let english_line = if result.source_lang == LanguageTag::En {
        result.original.as_str()
    } else if result.target_lang == LanguageTag::En {
        result.final_translation.as_deref().unwrap_or_default()
    } else {
        result.english_translation.as_deref().unwrap_or_default()
    };
    parts.push(format!("{en_flag} {english_line}"));

    if result.target_lang != LanguageTag::En {
        let final_text = result.final_translation.as_deref().unwrap_or_default();
        parts.push(format!("{} {}", result.target_lang.flag(), final_text));
    }

    if include_control {
        if let Some(control) = result.control_translation.as_deref() {
            parts.push(format!("{} {}", result.source_lang.flag(), control));
        }
    }

    parts.push(String::new());
    parts.push(format!("{} {}", result.source_lang.flag(), result.original));

    parts.join("\n")
}
