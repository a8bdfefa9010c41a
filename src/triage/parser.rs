use serde::Deserialize;

use super::SynthesisError;
use crate::models::{PreConsultSummary, Signal, VerificationConfidence};

/// Remove every Markdown code-fence marker and trim. Models routinely wrap
/// JSON in ```json fences despite being told not to.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Synthesis document as the model emits it. Every field is optional so a
/// successful parse can still report which required field is absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSynthesis {
    #[serde(default)]
    pub clinical_reasoning: Option<RawClinicalReasoning>,
    #[serde(default)]
    pub doctor_type: Option<String>,
    #[serde(default)]
    pub pre_consult_summary: Option<PreConsultSummary>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub recommended_clinic_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClinicalReasoning {
    #[serde(default)]
    pub signal: Option<String>,
    #[serde(default)]
    pub risk_description: Option<String>,
}

/// Synthesis document after validation: the signal is one of the three
/// enumerated values and the required fields are present.
#[derive(Debug)]
pub struct ValidatedSynthesis {
    pub signal: Signal,
    pub risk_description: String,
    pub doctor_type: String,
    pub pre_consult_summary: PreConsultSummary,
    pub advice: String,
    pub recommended_clinic_name: String,
}

/// Parse and validate a synthesis response. Callers translate `Err` into
/// the deterministic fallback; a malformed answer is never retried with
/// the same prompt.
pub fn parse_synthesis_response(raw: &str) -> Result<ValidatedSynthesis, SynthesisError> {
    let stripped = strip_code_fences(raw);

    let parsed: RawSynthesis = serde_json::from_str(&stripped)
        .map_err(|e| SynthesisError::MalformedResponse(e.to_string()))?;

    let reasoning = parsed
        .clinical_reasoning
        .ok_or(SynthesisError::MissingField("clinicalReasoning"))?;

    let signal_text = reasoning
        .signal
        .ok_or(SynthesisError::MissingField("signal"))?;
    let signal = signal_text
        .parse::<Signal>()
        .map_err(|_| SynthesisError::InvalidSignal(signal_text))?;

    let pre_consult_summary = parsed
        .pre_consult_summary
        .ok_or(SynthesisError::MissingField("preConsultSummary"))?;

    let recommended_clinic_name = parsed
        .recommended_clinic_name
        .ok_or(SynthesisError::MissingField("recommendedClinicName"))?;

    Ok(ValidatedSynthesis {
        signal,
        risk_description: reasoning.risk_description.unwrap_or_default(),
        doctor_type: parsed.doctor_type.unwrap_or_default(),
        pre_consult_summary,
        advice: parsed.advice.unwrap_or_default(),
        recommended_clinic_name,
    })
}

/// Verdict of the facility walkthrough analysis.
#[derive(Debug, Clone)]
pub struct LivenessVerdict {
    pub verified: bool,
    pub confidence: VerificationConfidence,
    pub reasoning: String,
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(default)]
    verified: Option<bool>,
    #[serde(default)]
    confidence: Option<VerificationConfidence>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Parse and validate a liveness verdict. An unknown confidence label
/// fails the parse outright.
pub fn parse_liveness_verdict(raw: &str) -> Result<LivenessVerdict, SynthesisError> {
    let stripped = strip_code_fences(raw);

    let parsed: RawVerdict = serde_json::from_str(&stripped)
        .map_err(|e| SynthesisError::MalformedResponse(e.to_string()))?;

    Ok(LivenessVerdict {
        verified: parsed
            .verified
            .ok_or(SynthesisError::MissingField("verified"))?,
        confidence: parsed
            .confidence
            .ok_or(SynthesisError::MissingField("confidence"))?,
        reasoning: parsed.reasoning.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = r#"{
        "clinicalReasoning": {
            "signal": "Red",
            "riskDescription": "High Risk (Emergency)"
        },
        "doctorType": "Cardiologist",
        "preConsultSummary": {
            "mainComplaint": "Acute chest pain radiating to the left arm",
            "redFlags": ["Chest pain or tightness", "Difficulty breathing"],
            "differentials": ["Acute coronary syndrome", "Pulmonary embolism", "Panic attack"],
            "vitalSigns": "Not Recorded",
            "riskCategory": "High",
            "recommendedDoctorType": "Cardiologist"
        },
        "advice": "Go to the nearest emergency unit immediately.",
        "recommendedClinicName": "Lagoon Hospital"
    }"#;

    #[test]
    fn parses_complete_response() {
        let result = parse_synthesis_response(FULL_RESPONSE).unwrap();
        assert_eq!(result.signal, Signal::Red);
        assert_eq!(result.risk_description, "High Risk (Emergency)");
        assert_eq!(result.doctor_type, "Cardiologist");
        assert_eq!(result.recommended_clinic_name, "Lagoon Hospital");
        assert_eq!(result.pre_consult_summary.differentials.len(), 3);
    }

    #[test]
    fn fenced_response_parses_like_bare_json() {
        let fenced = format!("```json\n{FULL_RESPONSE}\n```");
        let bare = parse_synthesis_response(FULL_RESPONSE).unwrap();
        let stripped = parse_synthesis_response(&fenced).unwrap();
        assert_eq!(stripped.signal, bare.signal);
        assert_eq!(stripped.recommended_clinic_name, bare.recommended_clinic_name);
        assert_eq!(stripped.advice, bare.advice);
    }

    #[test]
    fn strips_all_fence_markers() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  ```json```json{}``````  "), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }

    #[test]
    fn truncated_json_is_malformed() {
        let err = parse_synthesis_response("{\"clinicalReasoning\": {\"signal\": \"Red\"")
            .unwrap_err();
        assert!(matches!(err, SynthesisError::MalformedResponse(_)));
    }

    #[test]
    fn missing_signal_is_reported() {
        let response = r#"{
            "clinicalReasoning": { "riskDescription": "Moderate (Within 24 hours)" },
            "preConsultSummary": {},
            "recommendedClinicName": "Lagoon Hospital"
        }"#;
        let err = parse_synthesis_response(response).unwrap_err();
        assert!(matches!(err, SynthesisError::MissingField("signal")));
    }

    #[test]
    fn unknown_signal_is_rejected() {
        let response = r#"{
            "clinicalReasoning": { "signal": "Purple" },
            "preConsultSummary": {},
            "recommendedClinicName": "Lagoon Hospital"
        }"#;
        let err = parse_synthesis_response(response).unwrap_err();
        match err {
            SynthesisError::InvalidSignal(value) => assert_eq!(value, "Purple"),
            other => panic!("expected InvalidSignal, got {other:?}"),
        }
    }

    #[test]
    fn missing_summary_or_clinic_is_reported() {
        let no_summary = r#"{
            "clinicalReasoning": { "signal": "Green" },
            "recommendedClinicName": "Lagoon Hospital"
        }"#;
        assert!(matches!(
            parse_synthesis_response(no_summary).unwrap_err(),
            SynthesisError::MissingField("preConsultSummary")
        ));

        let no_clinic = r#"{
            "clinicalReasoning": { "signal": "Green" },
            "preConsultSummary": {}
        }"#;
        assert!(matches!(
            parse_synthesis_response(no_clinic).unwrap_err(),
            SynthesisError::MissingField("recommendedClinicName")
        ));
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let minimal = r#"{
            "clinicalReasoning": { "signal": "Yellow" },
            "preConsultSummary": {},
            "recommendedClinicName": "St. Kizito Clinic"
        }"#;
        let result = parse_synthesis_response(minimal).unwrap();
        assert_eq!(result.doctor_type, "");
        assert_eq!(result.advice, "");
        assert_eq!(result.risk_description, "");
    }

    #[test]
    fn parses_liveness_verdict() {
        let raw = r#"```json
        {
            "verified": true,
            "confidence": "high",
            "reasoning": "Consistent walkthrough showing a reception desk and signboard."
        }
        ```"#;
        let verdict = parse_liveness_verdict(raw).unwrap();
        assert!(verdict.verified);
        assert_eq!(verdict.confidence, VerificationConfidence::High);
        assert!(verdict.reasoning.contains("reception desk"));
    }

    #[test]
    fn verdict_requires_verified_and_confidence() {
        assert!(matches!(
            parse_liveness_verdict(r#"{"confidence": "low"}"#).unwrap_err(),
            SynthesisError::MissingField("verified")
        ));
        assert!(matches!(
            parse_liveness_verdict(r#"{"verified": false}"#).unwrap_err(),
            SynthesisError::MissingField("confidence")
        ));
        assert!(matches!(
            parse_liveness_verdict(r#"{"verified": true, "confidence": "certain"}"#).unwrap_err(),
            SynthesisError::MalformedResponse(_)
        ));
    }
}
