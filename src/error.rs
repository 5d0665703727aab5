use thiserror::Error;

/// Failures the chain can surface to a caller. User-visible messages are the
/// localized strings; anything else stays internal.
#[derive(Clone, Debug, Error)]
pub enum ChainError {
    #[error("Некорректный текст для перевода")]
    InvalidText,

    #[error("Неподдерживаемый язык перевода: {0}")]
    UnsupportedLanguage(String),

    /// A required hop produced no usable text. The message names the hop.
    #[error("{0}")]
    HopFailed(String),
}

/// Failures at the model-call boundary. Each call site catches these and
/// converts them to the nearest chain-level outcome.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(&'static str),

    #[error("empty completion")]
    EmptyCompletion,
}
