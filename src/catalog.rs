//! The Lagos facility directory. A fixed ten-entry catalog ships with the
//! crate; deployments can load their own from JSON instead. Catalog order
//! is stable and meaningful: resolvers fall back to the first entry.

use std::path::Path;

use thiserror::Error;

use crate::models::FacilityRecord;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {0}: {1}")]
    Read(String, String),

    #[error("Failed to parse catalog JSON: {0}")]
    Parse(String),

    #[error("Catalog is empty; resolvers require at least one facility")]
    Empty,
}

/// An ordered, non-empty facility directory.
#[derive(Debug, Clone)]
pub struct FacilityCatalog {
    records: Vec<FacilityRecord>,
}

impl FacilityCatalog {
    /// The compiled-in Lagos directory.
    pub fn bundled() -> Self {
        Self {
            records: bundled_records(),
        }
    }

    /// Load a catalog from a JSON array of facility records. Rejects
    /// empty catalogs so the resolvers' first-entry fallback always
    /// exists.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Read(path.display().to_string(), e.to_string()))?;

        let records: Vec<FacilityRecord> =
            serde_json::from_str(&json).map_err(|e| CatalogError::Parse(e.to_string()))?;

        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FacilityRecord> {
        self.records.iter()
    }

    /// Append a newly onboarded facility (post-verification).
    pub fn push(&mut self, record: FacilityRecord) {
        self.records.push(record);
    }
}

fn facility(
    id: &str,
    name: &str,
    location: &str,
    cost: &str,
    kind: &str,
    coordinates: [f64; 2],
    facilities: &[&str],
    specialists: &[&str],
    wait_time: &str,
    price_level: u8,
) -> FacilityRecord {
    FacilityRecord {
        id: id.into(),
        name: name.into(),
        location: location.into(),
        cost: cost.into(),
        kind: kind.into(),
        coordinates,
        facilities: facilities.iter().map(|f| f.to_string()).collect(),
        specialists: specialists.iter().map(|s| s.to_string()).collect(),
        wait_time: wait_time.into(),
        price_level,
    }
}

fn bundled_records() -> Vec<FacilityRecord> {
    vec![
        facility(
            "1",
            "Alimosho General Hospital",
            "Ikeja",
            "Affordable",
            "General",
            [6.6018, 3.3515],
            &["X-Ray", "Emergency Unit", "Pharmacy"],
            &["GP", "Pediatrician"],
            "45 mins",
            1,
        ),
        facility(
            "2",
            "LUTH Idi-Araba",
            "Surulere",
            "Moderate",
            "Teaching Hospital",
            [6.5244, 3.3578],
            &["ICU", "MRI", "Specialist Care", "Trauma Center"],
            &["Cardiologist", "Neurologist", "Surgeon"],
            "2 hours",
            2,
        ),
        facility(
            "3",
            "Massey Children Hospital",
            "Lagos Island",
            "Affordable",
            "Pediatric",
            [6.4549, 3.3947],
            &["NICU", "Pediatric Ward", "Vaccination"],
            &["Pediatrician"],
            "30 mins",
            1,
        ),
        facility(
            "4",
            "St Kizito Clinic",
            "Lekki",
            "Low-Cost NGO",
            "General",
            [6.4698, 3.5852],
            &["Basic Lab", "Outpatient", "Maternity"],
            &["GP", "Midwife"],
            "15 mins",
            1,
        ),
        facility(
            "5",
            "Lagoon Hospital",
            "Victoria Island",
            "Premium",
            "Specialist",
            [6.4281, 3.4219],
            &["Advanced Surgery", "Private Ward", "Telemedicine", "24/7 Ambulance"],
            &["All Specialties"],
            "10 mins",
            3,
        ),
        facility(
            "6",
            "Reddington Hospital",
            "Ikeja",
            "Premium",
            "Specialist",
            [6.5960, 3.3550],
            &["Cardiac Centre", "Dialysis", "CT Scan"],
            &["Cardiologist", "Orthopedic"],
            "15 mins",
            3,
        ),
        facility(
            "7",
            "General Hospital Lagos",
            "Lagos Island",
            "Affordable",
            "General",
            [6.4531, 3.3958],
            &["Emergency", "Dental", "Eye Clinic"],
            &["GP", "Ophthalmologist"],
            "1 hour",
            1,
        ),
        facility(
            "8",
            "Federal Medical Centre",
            "Ebute Metta",
            "Affordable",
            "General",
            [6.4972, 3.3828],
            &["Radiology", "Oncology", "Dialysis"],
            &["Oncologist", "Nephrologist"],
            "1.5 hours",
            1,
        ),
        facility(
            "9",
            "Mother and Child Centre",
            "Eti-Osa",
            "Moderate",
            "Maternity/Pediatric",
            [6.4584, 3.6015],
            &["Labor Ward", "Ultrasound", "Antenatal"],
            &["Obstetrician", "Gynecologist"],
            "40 mins",
            2,
        ),
        facility(
            "10",
            "Gbagada General Hospital",
            "Gbagada",
            "Affordable",
            "General",
            [6.5569, 3.3914],
            &["Renal Centre", "Burn Unit", "Pharmacy"],
            &["Nephrologist", "Plastic Surgeon"],
            "1 hour",
            1,
        ),
    ]
}
