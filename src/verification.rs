//! Facility liveness verification for hospital onboarding. Three frames
//! from a camera walkthrough are judged by the vision model before a new
//! facility record is admitted to the directory.
//!
//! Unlike the triage pipeline, failure here IS surfaced: onboarding is a
//! gate, and a gate must not silently pass.

use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::config::TriageConfig;
use crate::models::{FacilityRecord, VerificationConfidence};
use crate::triage::parser::parse_liveness_verdict;
use crate::triage::prompt::build_liveness_prompt;
use crate::triage::types::LlmClient;
use crate::triage::{LlmError, SynthesisError};

/// Frames captured during one walkthrough scan.
pub const EXPECTED_FRAMES: usize = 3;

/// Defaults applied to a newly onboarded facility until the admin fills
/// in real details.
const NEW_FACILITY_LOCATION: &str = "Lagos";
const NEW_FACILITY_COST: &str = "Standard";
const NEW_FACILITY_WAIT_TIME: &str = "30 mins";
const NEW_FACILITY_FACILITIES: [&str; 3] = ["Emergency Unit", "General Ward", "Pharmacy"];
const NEW_FACILITY_SPECIALISTS: [&str; 1] = ["GP"];

/// Lagos city center; new facilities are jittered around it until they
/// report exact coordinates.
const LAGOS_BASE_COORDINATES: [f64; 2] = [6.5244, 3.3792];
const COORDINATE_JITTER: f64 = 0.1;

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("GEMINI_API_KEY is not configured; facility verification requires it")]
    MissingApiKey,

    #[error("No walkthrough frames supplied")]
    NoFrames,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Verdict(#[from] SynthesisError),
}

/// Input to one verification scan: the claimed identity plus the
/// captured frames (base64 JPEG, expected 3).
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub facility_name: String,
    pub address: String,
    pub frames: Vec<String>,
}

/// The model's judgement of the walkthrough.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub verified: bool,
    pub confidence: VerificationConfidence,
    pub reasoning: String,
}

/// Run the walkthrough analysis: one vision call with the prompt and the
/// inline frames, verdict fence-stripped and parsed.
pub fn verify_liveness(
    request: &VerificationRequest,
    llm: &(dyn LlmClient + Send + Sync),
    config: &TriageConfig,
) -> Result<VerificationReport, VerificationError> {
    if !config.has_api_key() {
        return Err(VerificationError::MissingApiKey);
    }
    if request.frames.is_empty() {
        return Err(VerificationError::NoFrames);
    }

    let prompt = build_liveness_prompt(&request.facility_name, &request.address);
    let model = config
        .models
        .first()
        .map(String::as_str)
        .unwrap_or("gemini-2.5-flash");

    let raw = llm.generate_with_frames(model, &prompt, &request.frames)?;
    let verdict = parse_liveness_verdict(&raw)?;

    tracing::info!(
        facility = %request.facility_name,
        verified = verdict.verified,
        confidence = verdict.confidence.as_str(),
        frames = request.frames.len(),
        "Liveness verification complete"
    );

    Ok(VerificationReport {
        verified: verdict.verified,
        confidence: verdict.confidence,
        reasoning: verdict.reasoning,
    })
}

/// Build the directory record for a freshly verified facility. Location
/// and amenities are placeholders; coordinates are jittered around the
/// Lagos center so map pins don't stack.
pub fn new_facility_record(facility_name: &str, kind: &str) -> FacilityRecord {
    let mut rng = rand::thread_rng();
    let coordinates = [
        LAGOS_BASE_COORDINATES[0] + rng.gen::<f64>() * COORDINATE_JITTER,
        LAGOS_BASE_COORDINATES[1] + rng.gen::<f64>() * COORDINATE_JITTER,
    ];

    FacilityRecord {
        id: format!("h_{}", Uuid::new_v4()),
        name: facility_name.to_string(),
        location: NEW_FACILITY_LOCATION.to_string(),
        cost: NEW_FACILITY_COST.to_string(),
        kind: kind.to_string(),
        coordinates,
        facilities: NEW_FACILITY_FACILITIES.iter().map(|f| f.to_string()).collect(),
        specialists: NEW_FACILITY_SPECIALISTS.iter().map(|s| s.to_string()).collect(),
        wait_time: NEW_FACILITY_WAIT_TIME.to_string(),
        price_level: 1,
    }
}
