pub mod artifacts;
pub mod chain;
pub mod client;
pub mod config;
pub mod detect;
pub mod error;
pub mod format;
pub mod ir;
pub mod lang;
pub mod progress;
pub mod session;
pub mod storage;
pub mod stt;
pub mod tts;

pub use chain::{ChainOptions, TranslationChain};
pub use ir::{TranslationRequest, TranslationResult};
pub use lang::LanguageTag;
