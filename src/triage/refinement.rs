use super::prompt::{build_follow_up_prompt, build_opening_prompt};
use super::types::{LlmClient, SynthesisRequest};
use crate::config::TriageConfig;
use crate::models::{IntakeRecord, TranscriptEntry};

/// Patient replies accepted per session before synthesis takes over.
pub const MAX_ROUNDS: u32 = 3;

/// Opening question used when the AI cannot be reached at session start.
/// The session must never block on AI availability.
pub const OPENING_FALLBACK_QUESTION: &str =
    "I see. Could you tell me a bit more about how severe the pain is right now on a scale of 1 to 10?";

/// Generic follow-up substituted for a failed mid-interview AI call.
pub const GENERIC_FOLLOW_UP: &str =
    "Thank you for sharing that. Is there anything else you think I should know?";

/// One triage session's conversational state. Owned by exactly one caller;
/// `advance` consumes it, so a state value cannot be advanced twice.
#[derive(Debug)]
pub struct RefinementState {
    intake: IntakeRecord,
    rounds_completed: u32,
    transcript: Vec<TranscriptEntry>,
}

impl RefinementState {
    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn intake(&self) -> &IntakeRecord {
        &self.intake
    }

    /// The question the patient should answer next.
    pub fn current_question(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|e| e.role == crate::models::SpeakerRole::Assistant)
            .map(|e| e.text.as_str())
    }
}

/// Outcome of advancing a session by one patient reply.
#[derive(Debug)]
pub enum Advance {
    /// The interview continues; the transcript now ends with the next
    /// assistant question.
    Continued(RefinementState),
    /// The round budget is spent; proceed to risk synthesis with the
    /// bundled intake and full transcript.
    Completed(SynthesisRequest),
}

/// Conducts the bounded follow-up interview. Never surfaces an AI failure
/// to the caller: every round produces a question, real or substituted.
pub struct RefinementLoop {
    llm: Box<dyn LlmClient + Send + Sync>,
    config: TriageConfig,
}

impl RefinementLoop {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, config: TriageConfig) -> Self {
        Self { llm, config }
    }

    /// Start a session: seed the transcript with one assistant-authored
    /// opening question derived from the intake record.
    pub fn begin_session(&self, intake: IntakeRecord) -> RefinementState {
        let question = if self.config.has_api_key() {
            let prompt = build_opening_prompt(&intake);
            self.ask_with_chain(&prompt)
                .unwrap_or_else(|| OPENING_FALLBACK_QUESTION.to_string())
        } else {
            tracing::warn!(reason = "missing_api_key", "Using opening fallback question");
            OPENING_FALLBACK_QUESTION.to_string()
        };

        RefinementState {
            intake,
            rounds_completed: 0,
            transcript: vec![TranscriptEntry::assistant(question)],
        }
    }

    /// Record one patient reply. Returns the continued session with the
    /// next assistant question appended, or the synthesis request once
    /// `MAX_ROUNDS` replies have been collected.
    pub fn advance(&self, mut state: RefinementState, patient_reply: &str) -> Advance {
        state
            .transcript
            .push(TranscriptEntry::patient(patient_reply));
        state.rounds_completed += 1;

        if state.rounds_completed >= MAX_ROUNDS {
            tracing::info!(
                rounds = state.rounds_completed,
                entries = state.transcript.len(),
                "Interview complete, handing off to synthesis"
            );
            return Advance::Completed(SynthesisRequest {
                intake: state.intake,
                interview_transcript: state.transcript,
            });
        }

        let question = if self.config.has_api_key() {
            let prompt = build_follow_up_prompt(&state.intake, &state.transcript);
            self.ask_with_chain(&prompt)
                .unwrap_or_else(|| GENERIC_FOLLOW_UP.to_string())
        } else {
            GENERIC_FOLLOW_UP.to_string()
        };

        state.transcript.push(TranscriptEntry::assistant(question));
        Advance::Continued(state)
    }

    /// One attempt on the primary model, at most one retry on the next
    /// model in the chain. No backoff; a round is never worth blocking on.
    fn ask_with_chain(&self, prompt: &str) -> Option<String> {
        for model in self.config.models.iter().take(2) {
            match self.llm.generate(model, prompt) {
                Ok(text) => {
                    let text = text.trim().to_string();
                    if !text.is_empty() {
                        return Some(text);
                    }
                    tracing::warn!(model, "AI returned an empty question");
                }
                Err(e) => {
                    tracing::warn!(model, error = %e, "AI call failed during refinement");
                }
            }
        }
        None
    }
}
