use super::types::SynthesisRequest;
use crate::models::{FacilityRecord, IntakeRecord, TranscriptEntry};

/// Render transcript entries as speaker-labeled lines (`ASSISTANT: ...`).
pub fn render_history(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {}", e.role.as_str().to_uppercase(), e.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt for the opening interview question.
pub fn build_opening_prompt(intake: &IntakeRecord) -> String {
    let form_json = serde_json::to_string_pretty(intake).unwrap_or_default();

    format!(
        r#"You are an advanced medical triage AI assistant for Lagos, Nigeria.

MEDICAL CONTEXT (RAG DATA):
Patient Initial Form Data: {form_json}

INSTRUCTIONS:
- Analyze the patient's initial data.
- Ask EXACTLY ONE follow-up question to clarify their condition.
- Focus on ruling out emergencies or understanding severity.
- Be empathetic but professional.
- Do NOT diagnose yet."#
    )
}

/// Build the prompt for a mid-interview follow-up question. The transcript
/// already ends with the patient's latest reply.
pub fn build_follow_up_prompt(intake: &IntakeRecord, transcript: &[TranscriptEntry]) -> String {
    let form_json = serde_json::to_string_pretty(intake).unwrap_or_default();
    let history = render_history(transcript);

    format!(
        r#"You are Dr. AI, a triage assistant.

MEDICAL CONTEXT (KNOWN DATA):
{form_json}

CONVERSATION HISTORY:
{history}

TASK:
- Review the entire context above.
- Ask ONE relevant follow-up question based on what the patient just said AND their initial form data.
- If they mentioned a symptom earlier, you can reference it.
- Keep it short."#
    )
}

/// Build the single risk-synthesis prompt: patient data plus the full
/// facility directory, so the model can only recommend a clinic that exists.
pub fn build_synthesis_prompt(request: &SynthesisRequest, catalog: &[FacilityRecord]) -> String {
    let patient_json = serde_json::to_string_pretty(request).unwrap_or_default();
    let catalog_json = serde_json::to_string_pretty(catalog).unwrap_or_default();

    format!(
        r#"Act as an expert medical AI for Lagos, Nigeria. Perform Clinical Reasoning and generate a Doctor Pre-consult Summary.

Patient Data & Interview:
{patient_json}

Available Clinics in Lagos:
{catalog_json}

Output strictly valid JSON with this schema:
{{
  "clinicalReasoning": {{
    "signal": "Red" | "Yellow" | "Green",
    "riskDescription": "High Risk (Emergency)" | "Moderate (Within 24 hours)" | "Low (Home care/Routine)"
  }},
  "doctorType": "Recommended Specialist (e.g. Dermatologist, Cardiologist, GP)",
  "preConsultSummary": {{
    "mainComplaint": "Concise statement of the main symptom",
    "redFlags": ["List of specific red flags detected"],
    "differentials": ["List of 3 possible differential diagnoses"],
    "vitalSigns": "Note 'Not Recorded' or infer from text if mentioned (e.g. 'High fever')",
    "riskCategory": "High/Moderate/Low",
    "recommendedDoctorType": "Same as doctorType"
  }},
  "advice": "Immediate action advice for the patient",
  "recommendedClinicName": "Exact name of one clinic from the provided list"
}}"#
    )
}

/// Build the facility walkthrough verification prompt (3 frames expected).
pub fn build_liveness_prompt(facility_name: &str, address: &str) -> String {
    format!(
        r#"Analyze these 3 video frames from a live facility walkthrough.
Target: Verifying existence of "{facility_name}" at "{address}".

Task:
1. Consistency: Do the frames show a consistent real-world environment (not a screen recording or static photo)?
2. Facility Check: Do you see signs of a hospital/clinic (signboard, reception, medical chart, waiting area, or building exterior)?

Output JSON only:
{{
  "verified": boolean,
  "confidence": "high" | "medium" | "low",
  "reasoning": "Explain what was seen across frames."
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, History, Severity};

    fn sample_intake() -> IntakeRecord {
        IntakeRecord {
            main_symptom: "chest pain".into(),
            duration: Duration::Under24Hours,
            severity: Severity::Severe,
            red_flags: vec!["Chest pain or tightness".into()],
            associated_symptoms: "shortness of breath".into(),
            history: History::Hypertension,
            location: "Ikeja".into(),
        }
    }

    #[test]
    fn opening_prompt_embeds_intake() {
        let prompt = build_opening_prompt(&sample_intake());
        assert!(prompt.contains("advanced medical triage AI assistant for Lagos, Nigeria"));
        assert!(prompt.contains("MEDICAL CONTEXT (RAG DATA)"));
        assert!(prompt.contains("\"mainSymptom\": \"chest pain\""));
        assert!(prompt.contains("EXACTLY ONE follow-up question"));
        assert!(prompt.contains("Do NOT diagnose yet"));
    }

    #[test]
    fn history_renders_uppercase_speaker_lines() {
        let transcript = vec![
            TranscriptEntry::assistant("How long has this lasted?"),
            TranscriptEntry::patient("Since this morning"),
        ];
        let rendered = render_history(&transcript);
        assert_eq!(
            rendered,
            "ASSISTANT: How long has this lasted?\nPATIENT: Since this morning"
        );
    }

    #[test]
    fn follow_up_prompt_carries_conversation() {
        let transcript = vec![
            TranscriptEntry::assistant("How severe is it?"),
            TranscriptEntry::patient("About 8 out of 10"),
        ];
        let prompt = build_follow_up_prompt(&sample_intake(), &transcript);
        assert!(prompt.contains("Dr. AI, a triage assistant"));
        assert!(prompt.contains("CONVERSATION HISTORY:"));
        assert!(prompt.contains("PATIENT: About 8 out of 10"));
        assert!(prompt.contains("Keep it short."));
    }

    #[test]
    fn synthesis_prompt_embeds_catalog_and_schema() {
        let catalog = vec![FacilityRecord {
            id: "1".into(),
            name: "Alimosho General Hospital".into(),
            location: "Ikeja".into(),
            cost: "Affordable".into(),
            kind: "General".into(),
            coordinates: [6.6018, 3.3515],
            facilities: vec![],
            specialists: vec![],
            wait_time: "45 mins".into(),
            price_level: 1,
        }];
        let request = SynthesisRequest {
            intake: sample_intake(),
            interview_transcript: vec![TranscriptEntry::assistant("Any fever?")],
        };

        let prompt = build_synthesis_prompt(&request, &catalog);
        assert!(prompt.contains("Act as an expert medical AI for Lagos, Nigeria"));
        assert!(prompt.contains("Available Clinics in Lagos:"));
        assert!(prompt.contains("Alimosho General Hospital"));
        assert!(prompt.contains("\"recommendedClinicName\""));
        assert!(prompt.contains("\"signal\": \"Red\" | \"Yellow\" | \"Green\""));
        assert!(prompt.contains("interviewTranscript"));
    }

    #[test]
    fn liveness_prompt_names_target() {
        let prompt = build_liveness_prompt("Lagos City General", "12 Allen Avenue, Ikeja");
        assert!(prompt.contains("Verifying existence of \"Lagos City General\""));
        assert!(prompt.contains("at \"12 Allen Avenue, Ikeja\""));
        assert!(prompt.contains("\"confidence\": \"high\" | \"medium\" | \"low\""));
        assert!(prompt.contains("screen recording or static photo"));
    }
}
