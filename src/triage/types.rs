use serde::Serialize;

use super::LlmError;
use crate::models::{IntakeRecord, TranscriptEntry};

/// Gemini client abstraction (allows mocking).
///
/// One text prompt in, one text completion out. The provider holds no
/// conversation state; callers re-serialize all context into every prompt.
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError>;

    /// Prompt plus inline base64 JPEG frames (facility verification).
    fn generate_with_frames(
        &self,
        model: &str,
        prompt: &str,
        frames: &[String],
    ) -> Result<String, LlmError>;
}

/// Everything the risk synthesis stage needs: the original intake record
/// flattened alongside the full interview transcript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    #[serde(flatten)]
    pub intake: IntakeRecord,
    pub interview_transcript: Vec<TranscriptEntry>,
}
