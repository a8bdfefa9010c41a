//! Data model for the triage pipeline and the user-lifecycle service.

pub mod artifact;
pub mod enums;
pub mod facility;
pub mod intake;
pub mod profile;
pub mod transcript;

pub use artifact::*;
pub use enums::*;
pub use facility::*;
pub use intake::*;
pub use profile::*;
pub use transcript::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid {field} value: '{value}'")]
    InvalidEnum { field: String, value: String },
}
