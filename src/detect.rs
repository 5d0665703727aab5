use whatlang::Lang;

use crate::lang::LanguageTag;

/// Resolve the source language of `text`, falling back to the user's native
/// language whenever detection is not possible or not trustworthy.
#[must_use]
pub fn resolve_source(text: &str, native: LanguageTag) -> LanguageTag {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return native;
    }

    // Statistical detection is unreliable below a minimal sample size; for
    // very short input a plain script check decides.
    if trimmed.chars().filter(|c| !c.is_whitespace()).count() < 3 {
        if trimmed.chars().any(is_cyrillic) {
            return LanguageTag::Ru;
        }
        if trimmed.chars().any(is_thai) {
            return LanguageTag::Th;
        }
        return native;
    }

    match whatlang::detect_lang(trimmed) {
        Some(lang) => normalize_detected(lang).unwrap_or(native),
        None => native,
    }
}

/// Static routing policy: ru -> th, th -> ru, en -> ru. The asymmetric
/// ru<->th bridge via English is a product decision, not a heuristic.
#[must_use]
pub fn resolve_target(source: LanguageTag, _native: LanguageTag) -> LanguageTag {
    match source {
        LanguageTag::Ru => LanguageTag::Th,
        LanguageTag::Th | LanguageTag::En => LanguageTag::Ru,
    }
}

/// Cyrillic-script relatives collapse to Russian; anything outside the
/// supported set maps to nothing and the caller falls back to native.
fn normalize_detected(lang: Lang) -> Option<LanguageTag> {
    match lang {
        Lang::Rus | Lang::Ukr | Lang::Bel | Lang::Bul => Some(LanguageTag::Ru),
        Lang::Tha => Some(LanguageTag::Th),
        Lang::Eng => Some(LanguageTag::En),
        _ => None,
    }
}

fn is_cyrillic(ch: char) -> bool {
    let u = ch as u32;
    (0x0400..=0x04FF).contains(&u) || (0x0500..=0x052F).contains(&u)
}

fn is_thai(ch: char) -> bool {
    let u = ch as u32;
    (0x0E00..=0x0E7F).contains(&u)
}
