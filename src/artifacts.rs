use once_cell::sync::Lazy;
use regex::Regex;

/// Outcome of one cleaning pass over a raw model completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanOutcome {
    pub text: String,
    pub had_artifacts: bool,
}

/// Substring patterns (matched case-insensitively, per line) that mark a line
/// as model commentary rather than translation content. English plus the
/// Russian/Thai equivalents models tend to emit when answering in the target
/// language.
const ARTIFACT_PATTERNS: &[&str] = &[
    // Hedge phrases.
    "note:",
    "however,",
    "disclaimer",
    "please note",
    "примечание:",
    "однако,",
    "обратите внимание",
    "หมายเหตุ:",
    "อย่างไรก็ตาม",
    // Untranslatable-content disclaimers.
    "cannot translate",
    "unable to translate",
    "cannot be translated",
    "gibberish",
    "nonsense",
    "не могу перевести",
    "невозможно перевести",
    "не поддается переводу",
    "бессмыслица",
    "ไม่สามารถแปล",
    "ไม่มีความหมาย",
    // Fragment warnings.
    "seems incomplete",
    "appears incomplete",
    "cut off",
    "текст неполный",
    "обрывается",
    "ข้อความไม่สมบูรณ์",
    // Parenthetical explanation markers.
    "this is a",
    "this appears to be",
    "which means",
    "literally means",
    "это означает",
    "дословно означает",
    "ซึ่งหมายถึง",
    "แปลตรงตัวว่า",
];

const BRACKETED_LINE_MAX_CHARS: usize = 50;
const MIN_LINE_CHARS: usize = 3;

static BRACKETED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\(.*\)|\[.*\])$").unwrap());

/// Strip model commentary from a completion, line by line. Returns the
/// surviving lines rejoined and whether anything looked like an artifact.
///
/// If every line is dropped the trimmed original comes back instead of an
/// empty string: noisy-but-nonempty output beats nothing. That makes this one
/// path deliberately lossy.
#[must_use]
pub fn clean(text: &str) -> CleanOutcome {
    let mut kept: Vec<&str> = Vec::new();
    let mut had_artifacts = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_artifact_line(trimmed) {
            had_artifacts = true;
            continue;
        }
        kept.push(trimmed);
    }

    if kept.is_empty() {
        return CleanOutcome {
            text: text.trim().to_string(),
            had_artifacts,
        };
    }

    CleanOutcome {
        text: kept.join("\n").trim().to_string(),
        had_artifacts,
    }
}

fn is_artifact_line(line: &str) -> bool {
    let chars = line.chars().count();
    if chars < MIN_LINE_CHARS {
        return true;
    }
    if BRACKETED_LINE.is_match(line) && chars < BRACKETED_LINE_MAX_CHARS {
        return true;
    }

    let lower = line.to_lowercase();
    ARTIFACT_PATTERNS.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::clean;

    #[test]
    fn passes_plain_translation_through() {
        let out = clean("Привет! Как дела?");
        assert_eq!(out.text, "Привет! Как дела?");
        assert!(!out.had_artifacts);
    }

    #[test]
    fn drops_parenthetical_annotation() {
        let out = clean("Привет!\n(This is an informal greeting)");
        assert_eq!(out.text, "Привет!");
        assert!(out.had_artifacts);
    }

    #[test]
    fn drops_hedge_lines_in_any_supported_language() {
        let out = clean("สวัสดี\nNote: this greeting is informal\nОднако, возможен другой вариант");
        assert_eq!(out.text, "สวัสดี");
        assert!(out.had_artifacts);
    }

    #[test]
    fn drops_short_lines() {
        let out = clean("Hello there\nok");
        assert_eq!(out.text, "Hello there");
        assert!(out.had_artifacts);
    }

    #[test]
    fn keeps_long_bracketed_lines() {
        let long = "(this bracketed line is far too long to be a mere annotation, so it stays)";
        let out = clean(long);
        assert_eq!(out.text, long);
        assert!(!out.had_artifacts);
    }

    #[test]
    fn empty_lines_do_not_set_flag() {
        let out = clean("Hello there\n\nGood morning everyone");
        assert_eq!(out.text, "Hello there\nGood morning everyone");
        assert!(!out.had_artifacts);
    }

    #[test]
    fn all_artifact_input_returns_trimmed_original() {
        let raw = "  Note: I cannot translate gibberish.\n(unclear fragment)  ";
        let out = clean(raw);
        assert_eq!(out.text, raw.trim());
        assert!(out.had_artifacts);
    }

    #[test]
    fn whitespace_only_input_is_not_flagged() {
        let out = clean("  \n \n");
        assert_eq!(out.text, "");
        assert!(!out.had_artifacts);
    }

    #[test]
    fn idempotent_once_artifacts_are_gone() {
        let first = clean("Добрый день!\nNote: formal register\n(polite form)");
        assert!(first.had_artifacts);
        let second = clean(&first.text);
        assert_eq!(second.text, first.text);
        assert!(!second.had_artifacts);
    }
}
