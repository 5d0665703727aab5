use crate::lang::LanguageTag;

/// One chain invocation's input. Source and target are expected to differ;
/// callers skip the chain entirely when they resolve to the same tag.
#[derive(Clone, Debug)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: LanguageTag,
    pub target_lang: LanguageTag,
    pub model: String,
    pub correction_hint: Option<String>,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: LanguageTag,
        target_lang: LanguageTag,
        model: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang,
            target_lang,
            model: model.into(),
            correction_hint: None,
        }
    }
}

/// Outcome of a single model call within a chain. Never persisted; lives only
/// for the duration of one chain execution.
#[derive(Clone, Debug)]
pub struct HopResult {
    pub raw_completion: String,
    pub cleaned_text: String,
    pub had_artifacts: bool,
    pub structured_succeeded: bool,
}

/// Aggregated result of one chain run. On completion exactly one of
/// `final_translation` / `error` is set, never both, never neither.
#[derive(Clone, Debug)]
pub struct TranslationResult {
    pub original: String,
    pub source_lang: LanguageTag,
    pub target_lang: LanguageTag,
    pub english_translation: Option<String>,
    pub final_translation: Option<String>,
    pub control_translation: Option<String>,
    pub has_artifacts: bool,
    pub structured_succeeded: bool,
    pub error: Option<String>,
}

impl TranslationResult {
    pub(crate) fn started(request: &TranslationRequest) -> Self {
        Self {
            original: request.text.clone(),
            source_lang: request.source_lang,
            target_lang: request.target_lang,
            english_translation: None,
            final_translation: None,
            control_translation: None,
            has_artifacts: false,
            structured_succeeded: false,
            error: None,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.final_translation.is_some()
    }
}
