mod orchestrator;
mod prompts;
mod requery;
mod trace;

pub use orchestrator::{ChainOptions, TranslationChain};
pub use requery::request_structured;
pub use trace::TraceWriter;
