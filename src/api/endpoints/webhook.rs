//! Clerk user-lifecycle webhook.
//!
//! The handler takes the raw body (signatures cover bytes, not parsed
//! JSON), verifies it, then branches on the event type. Unknown event
//! types are acknowledged and ignored so Clerk does not retry them.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::router::ServiceContext;
use crate::api::signature::{verify_signature, WebhookError};
use crate::models::{HospitalProfile, PatientProfile, UserRole};

const EVENT_USER_CREATED: &str = "user.created";
const EVENT_USER_UPDATED: &str = "user.updated";

#[derive(Deserialize)]
struct ClerkEvent {
    #[serde(rename = "type")]
    kind: String,
    data: ClerkUserData,
}

#[derive(Deserialize)]
struct ClerkUserData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    public_metadata: PublicMetadata,
}

#[derive(Deserialize)]
struct EmailAddress {
    email_address: String,
}

#[derive(Deserialize, Default)]
struct PublicMetadata {
    #[serde(default)]
    role: Option<String>,
}

/// `POST /webhooks/clerk` — verify and apply a user-lifecycle event.
pub async fn clerk(
    State(ctx): State<ServiceContext>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let id = header(&headers, "svix-id")?;
    let timestamp = header(&headers, "svix-timestamp")?;
    let signature = header(&headers, "svix-signature")?;

    verify_signature(&ctx.config.webhook_secret, id, timestamp, signature, &body)?;

    let event: ClerkEvent = serde_json::from_str(&body)
        .map_err(|e| ApiError::SignatureRejected(WebhookError::MalformedEvent(e.to_string())))?;

    match event.kind.as_str() {
        EVENT_USER_CREATED => apply_user_created(&ctx, event.data)?,
        EVENT_USER_UPDATED => {
            tracing::debug!(user_id = %event.data.id, "user.updated acknowledged (no-op)");
        }
        other => {
            tracing::debug!(event_type = other, "Ignoring unhandled webhook event type");
        }
    }

    Ok(Json(json!({ "received": true })))
}

fn apply_user_created(ctx: &ServiceContext, data: ClerkUserData) -> Result<(), ApiError> {
    let email = data
        .email_addresses
        .first()
        .map(|e| e.email_address.clone())
        .unwrap_or_default();

    match data.public_metadata.role.as_deref() {
        Some("hospital") => {
            tracing::info!(user_id = %data.id, "Creating unverified hospital profile");
            ctx.store.upsert_hospital(HospitalProfile {
                user_id: data.id,
                email,
                role: UserRole::Hospital,
                verified: false,
                created_at: Utc::now(),
                verified_at: None,
            })?;
        }
        // Patients may sign up before the role metadata lands.
        _ => {
            let name = format!(
                "{} {}",
                data.first_name.unwrap_or_default(),
                data.last_name.unwrap_or_default()
            )
            .trim()
            .to_string();

            tracing::info!(user_id = %data.id, "Creating patient profile");
            ctx.store.upsert_patient(PatientProfile {
                user_id: data.id,
                name,
                email,
                role: UserRole::Patient,
                created_at: Utc::now(),
                profile_completed: false,
            })?;
        }
    }

    Ok(())
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::SignatureRejected(WebhookError::MissingHeader(
            name,
        )))
}
