use super::parser::{parse_synthesis_response, ValidatedSynthesis};
use super::prompt::build_synthesis_prompt;
use super::resolver::{resolve_by_location, resolve_by_name};
use super::types::{LlmClient, SynthesisRequest};
use super::SynthesisError;
use crate::config::TriageConfig;
use crate::models::{
    ArtifactSource, FacilityRecord, FallbackReason, IntakeRecord, PreConsultSummary, Signal,
    TriageArtifact,
};

/// Fallback artifact constants. These are the user-visible values when no
/// genuine model answer is available; the provenance field records why.
const FALLBACK_RISK_DESCRIPTION: &str = "Moderate (Within 24 hours)";
const FALLBACK_DOCTOR_TYPE: &str = "General Practitioner";
const FALLBACK_RISK_CATEGORY: &str = "Moderate";
const FALLBACK_VITAL_SIGNS: &str = "Not Recorded";
const FALLBACK_ADVICE: &str = "Please visit the nearest clinic for a proper check-up.";
const FALLBACK_DIFFERENTIALS: [&str; 3] = ["Viral Infection", "Stress", "Undetermined"];
const UNDETERMINED_COMPLAINT: &str = "Undetermined";

/// Produces the final triage artifact from one AI call over the completed
/// interview. Total: every input yields a well-formed artifact, model-made
/// or deterministic.
pub struct RiskSynthesizer {
    llm: Box<dyn LlmClient + Send + Sync>,
    config: TriageConfig,
}

impl RiskSynthesizer {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, config: TriageConfig) -> Self {
        Self { llm, config }
    }

    /// Run risk synthesis. Walks the model chain on transport failure; a
    /// parse or validation failure is terminal, since the same prompt
    /// would regenerate the same malformed answer.
    pub fn synthesize(
        &self,
        request: SynthesisRequest,
        catalog: &[FacilityRecord],
    ) -> TriageArtifact {
        if !self.config.has_api_key() {
            tracing::warn!(reason = "missing_api_key", "Synthesis falling back");
            return fallback_artifact(&request.intake, catalog, FallbackReason::MissingApiKey);
        }

        let prompt = build_synthesis_prompt(&request, catalog);
        let mut failure = FallbackReason::Transport;

        for model in &self.config.models {
            let raw = match self.llm.generate(model, &prompt) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(model, error = %e, "Synthesis call failed, trying next model");
                    continue;
                }
            };

            match parse_synthesis_response(&raw) {
                Ok(validated) => {
                    tracing::info!(
                        model,
                        signal = validated.signal.as_str(),
                        clinic = %validated.recommended_clinic_name,
                        "Synthesis complete"
                    );
                    return build_artifact(validated, catalog, model);
                }
                Err(e) => {
                    failure = match e {
                        SynthesisError::MalformedResponse(_) => FallbackReason::MalformedResponse,
                        _ => FallbackReason::InvalidSchema,
                    };
                    tracing::warn!(model, error = %e, "Synthesis response rejected");
                    break;
                }
            }
        }

        tracing::warn!(reason = failure.as_str(), "Synthesis falling back");
        fallback_artifact(&request.intake, catalog, failure)
    }
}

fn build_artifact(
    validated: ValidatedSynthesis,
    catalog: &[FacilityRecord],
    model: &str,
) -> TriageArtifact {
    let facility = resolve_by_name(&validated.recommended_clinic_name, catalog).clone();

    TriageArtifact {
        signal: validated.signal,
        risk_description: validated.risk_description,
        doctor_type: validated.doctor_type,
        pre_consult_summary: validated.pre_consult_summary,
        advice: validated.advice,
        recommended_facility: facility,
        source: ArtifactSource::Model {
            model: model.to_string(),
        },
    }
}

/// The deterministic substitute: Yellow signal, GP referral, facility
/// matched by the intake's reported location. Indistinguishable from a
/// genuine Yellow/GP answer in serialized form.
fn fallback_artifact(
    intake: &IntakeRecord,
    catalog: &[FacilityRecord],
    reason: FallbackReason,
) -> TriageArtifact {
    let main_complaint = if intake.main_symptom.trim().is_empty() {
        UNDETERMINED_COMPLAINT.to_string()
    } else {
        intake.main_symptom.clone()
    };

    TriageArtifact {
        signal: Signal::Yellow,
        risk_description: FALLBACK_RISK_DESCRIPTION.to_string(),
        doctor_type: FALLBACK_DOCTOR_TYPE.to_string(),
        pre_consult_summary: PreConsultSummary {
            main_complaint,
            red_flags: intake.red_flags.clone(),
            differentials: FALLBACK_DIFFERENTIALS.iter().map(|d| d.to_string()).collect(),
            vital_signs: FALLBACK_VITAL_SIGNS.to_string(),
            risk_category: FALLBACK_RISK_CATEGORY.to_string(),
            recommended_doctor_type: FALLBACK_DOCTOR_TYPE.to_string(),
        },
        advice: FALLBACK_ADVICE.to_string(),
        recommended_facility: resolve_by_location(&intake.location, catalog).clone(),
        source: ArtifactSource::Fallback { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FacilityCatalog;
    use crate::models::{Duration, History, Severity, TranscriptEntry};
    use crate::triage::gemini::MockLlmClient;
    use crate::triage::LlmError;

    const GOOD_RESPONSE: &str = r#"{
        "clinicalReasoning": {
            "signal": "Red",
            "riskDescription": "High Risk (Emergency)"
        },
        "doctorType": "Cardiologist",
        "preConsultSummary": {
            "mainComplaint": "Acute chest pain",
            "redFlags": ["Chest pain or tightness"],
            "differentials": ["ACS", "PE", "Panic attack"],
            "vitalSigns": "Not Recorded",
            "riskCategory": "High",
            "recommendedDoctorType": "Cardiologist"
        },
        "advice": "Go to the nearest emergency unit immediately.",
        "recommendedClinicName": "Reddington Hospital"
    }"#;

    fn sample_request() -> SynthesisRequest {
        SynthesisRequest {
            intake: IntakeRecord {
                main_symptom: "chest pain".into(),
                duration: Duration::Under24Hours,
                severity: Severity::Severe,
                red_flags: vec!["Chest pain or tightness".into()],
                associated_symptoms: "sweating".into(),
                history: History::Hypertension,
                location: "Ikeja".into(),
            },
            interview_transcript: vec![
                TranscriptEntry::assistant("Does the pain spread to your arm?"),
                TranscriptEntry::patient("Yes, the left one"),
            ],
        }
    }

    fn config_with_key() -> TriageConfig {
        TriageConfig {
            api_key: Some("test-key".into()),
            ..TriageConfig::default()
        }
    }

    #[test]
    fn successful_synthesis_resolves_facility_by_name() {
        let catalog = FacilityCatalog::bundled();
        let llm = MockLlmClient::new(GOOD_RESPONSE);
        let synthesizer = RiskSynthesizer::new(Box::new(llm), config_with_key());

        let artifact = synthesizer.synthesize(sample_request(), catalog.records());
        assert_eq!(artifact.signal, Signal::Red);
        assert_eq!(artifact.doctor_type, "Cardiologist");
        assert_eq!(artifact.recommended_facility.name, "Reddington Hospital");
        assert!(!artifact.is_fallback());
        assert_eq!(
            artifact.source,
            ArtifactSource::Model {
                model: "gemini-2.5-flash".into()
            }
        );
    }

    #[test]
    fn fenced_response_parses_like_bare_json() {
        let catalog = FacilityCatalog::bundled();
        let fenced = format!("```json\n{GOOD_RESPONSE}\n```");
        let llm = MockLlmClient::new(&fenced);
        let synthesizer = RiskSynthesizer::new(Box::new(llm), config_with_key());

        let artifact = synthesizer.synthesize(sample_request(), catalog.records());
        assert_eq!(artifact.signal, Signal::Red);
        assert!(!artifact.is_fallback());
    }

    #[test]
    fn missing_api_key_falls_back_without_network_call() {
        let catalog = FacilityCatalog::bundled();
        let llm = MockLlmClient::new(GOOD_RESPONSE);
        let synthesizer = RiskSynthesizer::new(Box::new(llm), TriageConfig::default());

        let artifact = synthesizer.synthesize(sample_request(), catalog.records());
        assert_eq!(artifact.signal, Signal::Yellow);
        assert_eq!(
            artifact.source,
            ArtifactSource::Fallback {
                reason: FallbackReason::MissingApiKey
            }
        );
    }

    #[test]
    fn fallback_carries_intake_data_and_location_match() {
        let catalog = FacilityCatalog::bundled();
        let llm = MockLlmClient::unreachable();
        let synthesizer = RiskSynthesizer::new(Box::new(llm), config_with_key());

        let artifact = synthesizer.synthesize(sample_request(), catalog.records());
        assert_eq!(artifact.signal, Signal::Yellow);
        assert_eq!(artifact.risk_description, "Moderate (Within 24 hours)");
        assert_eq!(artifact.doctor_type, "General Practitioner");
        assert_eq!(artifact.pre_consult_summary.main_complaint, "chest pain");
        assert_eq!(
            artifact.pre_consult_summary.red_flags,
            vec!["Chest pain or tightness"]
        );
        assert_eq!(artifact.pre_consult_summary.differentials.len(), 3);
        assert_eq!(artifact.pre_consult_summary.vital_signs, "Not Recorded");
        // First Ikeja entry in the bundled directory.
        assert_eq!(artifact.recommended_facility.location, "Ikeja");
        assert_eq!(artifact.recommended_facility.name, "Alimosho General Hospital");
        assert_eq!(
            artifact.source,
            ArtifactSource::Fallback {
                reason: FallbackReason::Transport
            }
        );
    }

    #[test]
    fn empty_symptom_becomes_undetermined() {
        let catalog = FacilityCatalog::bundled();
        let mut request = sample_request();
        request.intake.main_symptom = "  ".into();

        let synthesizer =
            RiskSynthesizer::new(Box::new(MockLlmClient::unreachable()), config_with_key());
        let artifact = synthesizer.synthesize(request, catalog.records());
        assert_eq!(artifact.pre_consult_summary.main_complaint, "Undetermined");
    }

    #[test]
    fn malformed_json_is_not_retried_on_another_model() {
        let catalog = FacilityCatalog::bundled();
        let mock = std::sync::Arc::new(MockLlmClient::new("{ truncated"));

        struct Shared(std::sync::Arc<MockLlmClient>);
        impl LlmClient for Shared {
            fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
                self.0.generate(model, prompt)
            }
            fn generate_with_frames(
                &self,
                model: &str,
                prompt: &str,
                frames: &[String],
            ) -> Result<String, LlmError> {
                self.0.generate_with_frames(model, prompt, frames)
            }
        }

        let synthesizer = RiskSynthesizer::new(Box::new(Shared(mock.clone())), config_with_key());
        let artifact = synthesizer.synthesize(sample_request(), catalog.records());

        assert_eq!(mock.calls(), 1);
        assert_eq!(
            artifact.source,
            ArtifactSource::Fallback {
                reason: FallbackReason::MalformedResponse
            }
        );
    }

    #[test]
    fn missing_signal_is_schema_fallback() {
        let catalog = FacilityCatalog::bundled();
        let response = r#"{
            "preConsultSummary": {},
            "recommendedClinicName": "Lagoon Hospital"
        }"#;
        let synthesizer =
            RiskSynthesizer::new(Box::new(MockLlmClient::new(response)), config_with_key());

        let artifact = synthesizer.synthesize(sample_request(), catalog.records());
        assert_eq!(artifact.signal, Signal::Yellow);
        assert_eq!(
            artifact.source,
            ArtifactSource::Fallback {
                reason: FallbackReason::InvalidSchema
            }
        );
    }

    #[test]
    fn transport_failure_then_second_model_succeeds() {
        let catalog = FacilityCatalog::bundled();
        let llm = MockLlmClient::new(GOOD_RESPONSE).with_script(vec![Err(LlmError::Api {
            status: 503,
            body: "overloaded".into(),
        })]);
        let synthesizer = RiskSynthesizer::new(Box::new(llm), config_with_key());

        let artifact = synthesizer.synthesize(sample_request(), catalog.records());
        assert!(!artifact.is_fallback());
        assert_eq!(
            artifact.source,
            ArtifactSource::Model {
                model: "gemini-2.0-flash".into()
            }
        );
    }

    #[test]
    fn unknown_clinic_name_resolves_to_first_entry() {
        let catalog = FacilityCatalog::bundled();
        let response = GOOD_RESPONSE.replace("Reddington Hospital", "No Such Clinic");
        let synthesizer =
            RiskSynthesizer::new(Box::new(MockLlmClient::new(&response)), config_with_key());

        let artifact = synthesizer.synthesize(sample_request(), catalog.records());
        assert!(!artifact.is_fallback());
        assert_eq!(artifact.recommended_facility.name, "Alimosho General Hospital");
    }
}
