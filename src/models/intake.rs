use serde::{Deserialize, Serialize};

use super::enums::{Duration, History, Severity};
use super::ModelError;

/// Canonical red-flag options offered by the intake collector.
pub const RED_FLAG_OPTIONS: [&str; 6] = [
    "Chest pain or tightness",
    "Difficulty breathing",
    "Severe bleeding",
    "Sudden weakness/numbness",
    "Confusion or fainting",
    "None of the above",
];

/// Sentinel red flag; mutually exclusive with every other selection.
pub const NO_RED_FLAGS: &str = "None of the above";

/// Completed answer set handed over by the intake collector.
/// Immutable once produced; the pipeline only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub main_symptom: String,
    pub duration: Duration,
    pub severity: Severity,
    #[serde(default)]
    pub red_flags: Vec<String>,
    pub associated_symptoms: String,
    pub history: History,
    pub location: String,
}

impl IntakeRecord {
    /// Checks the sentinel exclusivity rule on a red-flag selection:
    /// "None of the above" cannot coexist with any other flag.
    pub fn validate_red_flags(flags: &[String]) -> Result<(), ModelError> {
        if flags.len() > 1 && flags.iter().any(|f| f == NO_RED_FLAGS) {
            return Err(ModelError::InvalidEnum {
                field: "redFlags".into(),
                value: flags.join(", "),
            });
        }
        Ok(())
    }
}
