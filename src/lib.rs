//! ExpressCare triage core.
//!
//! Three concerns live here:
//! - `triage`: the AI intake pipeline — a bounded conversational
//!   refinement loop, risk synthesis with a deterministic fallback, and
//!   facility resolution against the bundled Lagos catalog.
//! - `verification`: camera-frame liveness checks for facility onboarding.
//! - `api`: the user-lifecycle HTTP service (Clerk webhook intake,
//!   hospital approval, health probe).

pub mod api;
pub mod catalog;
pub mod config;
pub mod models;
pub mod triage;
pub mod verification;
