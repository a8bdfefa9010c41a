use serde::{Deserialize, Serialize};

use super::enums::Signal;
use super::facility::FacilityRecord;

/// Structured hand-off for the consulting doctor. Deserialization is
/// lenient (field defaults) because the synthesis model may omit inner
/// fields; presence of the summary object itself is validated upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreConsultSummary {
    #[serde(default)]
    pub main_complaint: String,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub differentials: Vec<String>,
    #[serde(default)]
    pub vital_signs: String,
    #[serde(default)]
    pub risk_category: String,
    #[serde(default)]
    pub recommended_doctor_type: String,
}

/// Which failure class routed synthesis to the deterministic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingApiKey,
    Transport,
    MalformedResponse,
    InvalidSchema,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "missing_api_key",
            Self::Transport => "transport",
            Self::MalformedResponse => "malformed_response",
            Self::InvalidSchema => "invalid_schema",
        }
    }
}

/// Provenance of a triage artifact. Operator-facing only; the serialized
/// artifact is identical whether a model or the fallback produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    Model { model: String },
    Fallback { reason: FallbackReason },
}

/// Final pipeline output. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageArtifact {
    pub signal: Signal,
    pub risk_description: String,
    pub doctor_type: String,
    pub pre_consult_summary: PreConsultSummary,
    pub advice: String,
    pub recommended_facility: FacilityRecord,
    #[serde(skip)]
    pub source: ArtifactSource,
}

impl TriageArtifact {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ArtifactSource::Fallback { .. })
    }
}
