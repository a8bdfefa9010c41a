//! The user-lifecycle HTTP service: Clerk webhook intake, hospital
//! approval, health probe. The one place in the crate where a failure is
//! surfaced to the caller instead of absorbed.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod signature;
pub mod store;

pub use error::ApiError;
pub use router::{service_router, ServiceContext};
pub use server::{start_service, ServerError, ServiceServer};
pub use signature::{verify_signature, WebhookError};
pub use store::{MemoryProfileStore, ProfileStore, StoreError};
