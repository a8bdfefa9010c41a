use serde::{Deserialize, Serialize};

/// One entry of the Lagos facility directory. Read-only to the triage
/// pipeline; onboarding (facility verification) constructs new records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub cost: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
    pub facilities: Vec<String>,
    pub specialists: Vec<String>,
    pub wait_time: String,
    pub price_level: u8,
}
