//! AI triage pipeline: intake → bounded refinement loop → risk synthesis
//! → facility resolution. No stage ever surfaces an error to the caller;
//! every failure degrades to a deterministic substitute.

pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod refinement;
pub mod resolver;
pub mod synthesis;
pub mod types;

pub use gemini::*;
pub use parser::*;
pub use prompt::*;
pub use refinement::*;
pub use resolver::*;
pub use synthesis::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("AI endpoint is unreachable at {0}")]
    Connection(String),

    #[error("AI request timed out after {0}s")]
    Timeout(u64),

    #[error("AI endpoint returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response decoding error: {0}")]
    ResponseDecoding(String),
}

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Malformed synthesis response: {0}")]
    MalformedResponse(String),

    #[error("Synthesis response is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid triage signal: '{0}'")]
    InvalidSignal(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}
