use serde::{Deserialize, Serialize};

use super::enums::SpeakerRole;

/// One turn of the refinement conversation. Entries are append-only;
/// the loop never rewrites earlier turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: SpeakerRole,
    pub text: String,
}

impl TranscriptEntry {
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::Assistant,
            text: text.into(),
        }
    }

    pub fn patient(text: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::Patient,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_role() {
        let a = TranscriptEntry::assistant("How long has this lasted?");
        assert_eq!(a.role, SpeakerRole::Assistant);

        let p = TranscriptEntry::patient("Since yesterday");
        assert_eq!(p.role, SpeakerRole::Patient);
        assert_eq!(p.text, "Since yesterday");
    }

    #[test]
    fn serializes_with_lowercase_roles() {
        let entry = TranscriptEntry::patient("It hurts when I breathe");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["role"], "patient");
    }
}
