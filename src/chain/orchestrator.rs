use crate::artifacts::clean;
use crate::client::{ChatCompleter, CHAT_MAX_TOKENS, CHAT_TEMPERATURE};
use crate::error::ChainError;
use crate::ir::{HopResult, TranslationRequest, TranslationResult};
use crate::lang::LanguageTag;
use crate::progress::ConsoleProgress;

use super::prompts::{
    render_template, PROMPT_CONTROL, PROMPT_FROM_ENGLISH, PROMPT_TO_ENGLISH,
};
use super::requery::request_structured;
use super::trace::TraceWriter;

const ERR_TO_ENGLISH: &str = "Не удалось перевести на английский";
const ERR_FROM_ENGLISH: &str = "Не удалось перевести с английского";

#[derive(Clone, Debug, Default)]
pub struct ChainOptions {
    /// Skip the reverse round-trip hop even when source != target.
    pub skip_control: bool,
}

/// Sequences one translation request through up to three hops:
/// source -> English -> target, plus an advisory reverse control hop.
/// Each invocation is independent; the chain holds no mutable state across
/// runs beyond trace/progress sinks.
pub struct TranslationChain<'a> {
    client: &'a dyn ChatCompleter,
    progress: ConsoleProgress,
    trace: TraceWriter,
    options: ChainOptions,
}

impl<'a> TranslationChain<'a> {
    pub fn new(client: &'a dyn ChatCompleter, progress: ConsoleProgress) -> Self {
        Self {
            client,
            progress,
            trace: TraceWriter::disabled(),
            options: ChainOptions::default(),
        }
    }

    pub fn with_trace(mut self, trace: TraceWriter) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_options(mut self, options: ChainOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the full chain. A required-hop failure aborts with a localized
    /// message in `error` and no final translation; the control hop degrades
    /// silently.
    pub fn run(&self, request: &TranslationRequest) -> TranslationResult {
        let mut result = TranslationResult::started(request);
        if let Err(err) = self.execute(request, &mut result) {
            result.final_translation = None;
            result.error = Some(err.to_string());
        }
        result
    }

    fn execute(
        &self,
        request: &TranslationRequest,
        result: &mut TranslationResult,
    ) -> Result<(), ChainError> {
        if request.text.trim().is_empty() {
            return Err(ChainError::InvalidText);
        }

        self.progress.info(format!(
            "chain: {} -> {} via {}",
            request.source_lang, request.target_lang, request.model
        ));

        // TO_ENGLISH. Verbatim copy for English input; no call issued.
        if request.source_lang == LanguageTag::En {
            result.english_translation = Some(request.text.clone());
        } else {
            let mut prompt = render_template(PROMPT_TO_ENGLISH, &[("text", &request.text)]);
            if let Some(hint) = request.correction_hint.as_deref() {
                prompt.push_str("\n\nContext hint: ");
                prompt.push_str(hint);
            }
            let hop = self
                .run_hop("to_english", &request.model, &prompt, LanguageTag::En, true)
                .ok_or_else(|| ChainError::HopFailed(ERR_TO_ENGLISH.to_string()))?;
            result.has_artifacts |= hop.had_artifacts;
            result.structured_succeeded |= hop.structured_succeeded;
            result.english_translation = Some(hop.cleaned_text);
        }
        let english = result.english_translation.clone().unwrap_or_default();

        // FROM_ENGLISH. Verbatim copy when the target already is English.
        if request.target_lang == LanguageTag::En {
            result.final_translation = Some(english.clone());
        } else {
            let prompt = render_template(
                PROMPT_FROM_ENGLISH,
                &[
                    ("target_language", request.target_lang.name()),
                    ("text", &english),
                ],
            );
            let hop = self
                .run_hop(
                    "from_english",
                    &request.model,
                    &prompt,
                    request.target_lang,
                    true,
                )
                .ok_or_else(|| ChainError::HopFailed(ERR_FROM_ENGLISH.to_string()))?;
            result.has_artifacts |= hop.had_artifacts;
            result.structured_succeeded |= hop.structured_succeeded;
            result.final_translation = Some(hop.cleaned_text);
        }

        // CONTROL. Advisory round-trip back toward the source language; the
        // one hop whose failure never aborts the chain.
        if request.source_lang != request.target_lang && !self.options.skip_control {
            let final_text = result.final_translation.clone().unwrap_or_default();
            let prompt = render_template(
                PROMPT_CONTROL,
                &[
                    ("source_language", request.target_lang.name()),
                    ("target_language", request.source_lang.name()),
                    ("text", &final_text),
                ],
            );
            match self.run_hop("control", &request.model, &prompt, request.source_lang, false) {
                Some(hop) => {
                    result.has_artifacts |= hop.had_artifacts;
                    result.control_translation = Some(hop.cleaned_text);
                }
                None => {
                    self.progress.warn("control hop failed; continuing");
                }
            }
        }

        Ok(())
    }

    /// One model call plus clean-up. Returns `None` when the hop produced no
    /// usable text. When `escalate` is set, a flagged completion triggers the
    /// structured re-query; a successful structured pass resets the artifact
    /// flag for this hop.
    fn run_hop(
        &self,
        stage: &str,
        model: &str,
        prompt: &str,
        hop_target: LanguageTag,
        escalate: bool,
    ) -> Option<HopResult> {
        let _ = self.trace.write_hop_text(stage, "prompt", prompt);

        let raw = match self
            .client
            .complete(model, prompt, CHAT_TEMPERATURE, CHAT_MAX_TOKENS)
        {
            Ok(r) => r,
            Err(err) => {
                self.progress.warn(format!("{stage}: {err}"));
                return None;
            }
        };
        let _ = self.trace.write_hop_text(stage, "output.raw", &raw);

        let outcome = clean(&raw);
        let mut hop = HopResult {
            raw_completion: raw,
            cleaned_text: outcome.text,
            had_artifacts: outcome.had_artifacts,
            structured_succeeded: false,
        };

        if hop.had_artifacts && escalate {
            let (text, succeeded) = request_structured(
                &hop.raw_completion,
                prompt_source_text(prompt),
                hop_target.name(),
                model,
                self.client,
            );
            hop.cleaned_text = text;
            hop.structured_succeeded = succeeded;
            if succeeded {
                hop.had_artifacts = false;
            }
        }

        if hop.cleaned_text.trim().is_empty() {
            return None;
        }
        let _ = self
            .trace
            .write_hop_text(stage, "output.clean", &hop.cleaned_text);
        Some(hop)
    }
}

/// The chain prompts all end with the payload after a blank line; the
/// structured re-query wants just that payload back.
fn prompt_source_text(prompt: &str) -> &str {
    match prompt.split_once("\n\n") {
        Some((_, rest)) => rest,
        None => prompt,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{ChainOptions, TranslationChain};
    use crate::client::ChatCompleter;
    use crate::error::TransportError;
    use crate::ir::TranslationRequest;
    use crate::lang::LanguageTag;
    use crate::progress::ConsoleProgress;

    /// Scripted stub: pops one canned reply per call and records every prompt.
    struct StubClient {
        replies: RefCell<Vec<Result<String, ()>>>,
        calls: RefCell<Vec<String>>,
    }

    impl StubClient {
        fn new(replies: Vec<Result<&str, ()>>) -> Self {
            Self {
                replies: RefCell::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ChatCompleter for StubClient {
        fn complete(
            &self,
            _model: &str,
            prompt: &str,
            temperature: f32,
            max_tokens: u32,
        ) -> Result<String, TransportError> {
            assert_eq!(temperature, crate::client::CHAT_TEMPERATURE);
            assert_eq!(max_tokens, crate::client::CHAT_MAX_TOKENS);
            self.calls.borrow_mut().push(prompt.to_string());
            if self.replies.borrow().is_empty() {
                return Err(TransportError::EmptyCompletion);
            }
            match self.replies.borrow_mut().remove(0) {
                Ok(s) => Ok(s),
                Err(()) => Err(TransportError::EmptyCompletion),
            }
        }
    }

    fn chain(client: &StubClient) -> TranslationChain<'_> {
        TranslationChain::new(client, ConsoleProgress::new(false))
    }

    fn request(
        text: &str,
        source: LanguageTag,
        target: LanguageTag,
    ) -> TranslationRequest {
        TranslationRequest::new(text, source, target, "test/model")
    }

    #[test]
    fn empty_text_is_rejected_before_any_call() {
        let client = StubClient::new(vec![]);
        let result = chain(&client).run(&request("   ", LanguageTag::Ru, LanguageTag::Th));
        assert_eq!(result.error.as_deref(), Some("Некорректный текст для перевода"));
        assert!(result.final_translation.is_none());
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn english_source_passes_through_verbatim() {
        // en -> th: no TO_ENGLISH call; FROM_ENGLISH + CONTROL only.
        let client = StubClient::new(vec![Ok("สวัสดีทุกคน"), Ok("Hello everyone")]);
        let result = chain(&client).run(&request(
            "Hello everyone",
            LanguageTag::En,
            LanguageTag::Th,
        ));
        assert_eq!(result.english_translation.as_deref(), Some("Hello everyone"));
        assert_eq!(result.final_translation.as_deref(), Some("สวัสดีทุกคน"));
        assert!(result.error.is_none());
        assert_eq!(client.call_count(), 2);
        assert!(client.calls.borrow()[0].contains("Thai"));
    }

    #[test]
    fn thai_to_russian_runs_all_three_hops() {
        let client = StubClient::new(vec![
            Ok("Hello"),
            Ok("Привет"),
            Ok("สวัสดี"),
        ]);
        let result = chain(&client).run(&request("สวัสดี", LanguageTag::Th, LanguageTag::Ru));
        assert!(result.error.is_none());
        assert_eq!(result.english_translation.as_deref(), Some("Hello"));
        assert_eq!(result.final_translation.as_deref(), Some("Привет"));
        assert_eq!(result.control_translation.as_deref(), Some("สวัสดี"));
        assert_eq!(client.call_count(), 3);

        let calls = client.calls.borrow();
        assert!(calls[0].contains("Translate the following text to English"));
        assert!(calls[1].contains("Russian"));
        assert!(calls[2].contains("back to Thai"));
    }

    #[test]
    fn english_target_copies_english_translation() {
        // th -> en: TO_ENGLISH + CONTROL, FROM_ENGLISH is a verbatim copy.
        let client = StubClient::new(vec![Ok("Hello"), Ok("สวัสดี")]);
        let result = chain(&client).run(&request("สวัสดี", LanguageTag::Th, LanguageTag::En));
        assert_eq!(result.final_translation.as_deref(), Some("Hello"));
        assert_eq!(result.english_translation.as_deref(), Some("Hello"));
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn failing_client_yields_error_and_no_final() {
        let client = StubClient::new(vec![Err(())]);
        let result = chain(&client).run(&request("Привет", LanguageTag::Ru, LanguageTag::Th));
        assert!(result.final_translation.is_none());
        assert_eq!(result.error.as_deref(), Some("Не удалось перевести на английский"));
    }

    #[test]
    fn from_english_failure_names_the_target_step() {
        let client = StubClient::new(vec![Ok("Hello"), Err(())]);
        let result = chain(&client).run(&request("Привет", LanguageTag::Ru, LanguageTag::Th));
        assert_eq!(result.error.as_deref(), Some("Не удалось перевести с английского"));
        assert!(result.final_translation.is_none());
        // The English hop's output is still recorded; only the final text is withheld.
        assert_eq!(result.english_translation.as_deref(), Some("Hello"));
    }

    #[test]
    fn control_failure_is_non_fatal() {
        let client = StubClient::new(vec![Ok("Hello"), Ok("สวัสดี"), Err(())]);
        let result = chain(&client).run(&request("Привет", LanguageTag::Ru, LanguageTag::Th));
        assert!(result.error.is_none());
        assert_eq!(result.final_translation.as_deref(), Some("สวัสดี"));
        assert!(result.control_translation.is_none());
    }

    #[test]
    fn artifact_completion_escalates_to_structured_requery() {
        let client = StubClient::new(vec![
            Ok("Hello\n(Note: this is an informal greeting)"),
            Ok(r#"{"translation":"Hello","notes":"informal"}"#),
            Ok("สวัสดี"),
            Ok("Привет"),
        ]);
        let result = chain(&client).run(&request("Привет", LanguageTag::Ru, LanguageTag::Th));
        assert!(result.error.is_none());
        assert_eq!(result.english_translation.as_deref(), Some("Hello"));
        // Structured pass isolated the translation and reset the flag.
        assert!(!result.has_artifacts);
        assert!(result.structured_succeeded);
        assert_eq!(client.call_count(), 4);
        assert!(client.calls.borrow()[1].contains("STRICT JSON"));
    }

    #[test]
    fn requery_parse_failure_keeps_cleaned_text_and_flag() {
        let client = StubClient::new(vec![
            Ok("Hello\n(informal greeting)"),
            Ok("no json here"),
            Ok("สวัสดี"),
            Ok("Привет"),
        ]);
        let result = chain(&client).run(&request("Привет", LanguageTag::Ru, LanguageTag::Th));
        assert!(result.error.is_none());
        assert_eq!(result.english_translation.as_deref(), Some("Hello"));
        assert!(result.has_artifacts);
        assert!(!result.structured_succeeded);
    }

    #[test]
    fn control_hop_never_escalates() {
        // Control reply carries an artifact; the chain cleans it but issues
        // no structured re-query.
        let client = StubClient::new(vec![
            Ok("Hello"),
            Ok("สวัสดี"),
            Ok("Привет\n(back-translation note)"),
        ]);
        let result = chain(&client).run(&request("Привет", LanguageTag::Ru, LanguageTag::Th));
        assert_eq!(result.control_translation.as_deref(), Some("Привет"));
        assert!(result.has_artifacts);
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn skip_control_option_suppresses_round_trip() {
        let client = StubClient::new(vec![Ok("Hello"), Ok("สวัสดี")]);
        let chain = TranslationChain::new(&client, ConsoleProgress::new(false))
            .with_options(ChainOptions { skip_control: true });
        let result = chain.run(&request("Привет", LanguageTag::Ru, LanguageTag::Th));
        assert!(result.error.is_none());
        assert!(result.control_translation.is_none());
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn correction_hint_reaches_the_first_hop_prompt() {
        let client = StubClient::new(vec![Ok("Hello"), Ok("สวัสดี"), Ok("Привет")]);
        let mut req = request("Привет", LanguageTag::Ru, LanguageTag::Th);
        req.correction_hint = Some("speaker is greeting a friend".to_string());
        let result = chain(&client).run(&req);
        assert!(result.error.is_none());
        assert!(client.calls.borrow()[0].contains("speaker is greeting a friend"));
        assert!(!client.calls.borrow()[1].contains("speaker is greeting a friend"));
    }
}
