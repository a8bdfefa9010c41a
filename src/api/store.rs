//! Profile persistence boundary. The production deployment keeps
//! profiles in a managed document store; this crate talks to it through
//! the `ProfileStore` trait and ships an in-memory implementation for
//! the service binary and tests.

use std::sync::RwLock;

use chrono::Utc;
use thiserror::Error;

use crate::models::{HospitalProfile, PatientProfile};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Profile store lock poisoned")]
    LockFailed,

    #[error("Hospital profile not found: {0}")]
    HospitalNotFound(String),
}

pub trait ProfileStore: Send + Sync {
    /// Create or replace the patient profile keyed by `user_id`
    /// (document-store set semantics).
    fn upsert_patient(&self, profile: PatientProfile) -> Result<(), StoreError>;

    /// Create or replace the hospital profile keyed by `user_id`.
    fn upsert_hospital(&self, profile: HospitalProfile) -> Result<(), StoreError>;

    /// Flip a hospital to verified and stamp `verified_at`. Returns the
    /// updated profile.
    fn approve_hospital(&self, user_id: &str) -> Result<HospitalProfile, StoreError>;

    fn patient(&self, user_id: &str) -> Result<Option<PatientProfile>, StoreError>;

    fn hospital(&self, user_id: &str) -> Result<Option<HospitalProfile>, StoreError>;
}

/// RwLock-backed in-memory store.
pub struct MemoryProfileStore {
    patients: RwLock<Vec<PatientProfile>>,
    hospitals: RwLock<Vec<HospitalProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            patients: RwLock::new(Vec::new()),
            hospitals: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn upsert_patient(&self, profile: PatientProfile) -> Result<(), StoreError> {
        let mut patients = self.patients.write().map_err(|_| StoreError::LockFailed)?;
        patients.retain(|p| p.user_id != profile.user_id);
        patients.push(profile);
        Ok(())
    }

    fn upsert_hospital(&self, profile: HospitalProfile) -> Result<(), StoreError> {
        let mut hospitals = self.hospitals.write().map_err(|_| StoreError::LockFailed)?;
        hospitals.retain(|h| h.user_id != profile.user_id);
        hospitals.push(profile);
        Ok(())
    }

    fn approve_hospital(&self, user_id: &str) -> Result<HospitalProfile, StoreError> {
        let mut hospitals = self.hospitals.write().map_err(|_| StoreError::LockFailed)?;

        let hospital = hospitals
            .iter_mut()
            .find(|h| h.user_id == user_id)
            .ok_or_else(|| StoreError::HospitalNotFound(user_id.to_string()))?;

        hospital.verified = true;
        hospital.verified_at = Some(Utc::now());

        Ok(hospital.clone())
    }

    fn patient(&self, user_id: &str) -> Result<Option<PatientProfile>, StoreError> {
        let patients = self.patients.read().map_err(|_| StoreError::LockFailed)?;
        Ok(patients.iter().find(|p| p.user_id == user_id).cloned())
    }

    fn hospital(&self, user_id: &str) -> Result<Option<HospitalProfile>, StoreError> {
        let hospitals = self.hospitals.read().map_err(|_| StoreError::LockFailed)?;
        Ok(hospitals.iter().find(|h| h.user_id == user_id).cloned())
    }
}
