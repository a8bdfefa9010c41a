//! Svix-convention webhook signature verification.
//!
//! Signed content is `"{id}.{timestamp}.{body}"`, keyed with the
//! base64-decoded secret after the `whsec_` prefix, HMAC-SHA256. The
//! signature header carries space-separated `v1,<base64>` candidates;
//! any single match accepts the payload. Timestamps outside a five-minute
//! window are rejected before any MAC work.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted clock skew between sender and receiver.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Missing required header '{0}'")]
    MissingHeader(&'static str),

    #[error("Webhook secret is malformed")]
    InvalidSecret,

    #[error("Invalid svix-timestamp header: '{0}'")]
    BadTimestamp(String),

    #[error("Timestamp outside tolerance window (skew {0}s)")]
    StaleTimestamp(i64),

    #[error("No signature candidate matched the payload")]
    SignatureMismatch,

    #[error("Malformed event payload: {0}")]
    MalformedEvent(String),
}

/// Verify a webhook payload against the shared secret.
pub fn verify_signature(
    secret: &str,
    id: &str,
    timestamp: &str,
    signature_header: &str,
    body: &str,
) -> Result<(), WebhookError> {
    verify_signature_at(
        secret,
        id,
        timestamp,
        signature_header,
        body,
        chrono::Utc::now().timestamp(),
    )
}

/// Verification with an injectable clock, for tolerance-window tests.
pub(crate) fn verify_signature_at(
    secret: &str,
    id: &str,
    timestamp: &str,
    signature_header: &str,
    body: &str,
    now: i64,
) -> Result<(), WebhookError> {
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| WebhookError::BadTimestamp(timestamp.to_string()))?;

    let skew = (now - ts).abs();
    if skew > TIMESTAMP_TOLERANCE_SECS {
        return Err(WebhookError::StaleTimestamp(skew));
    }

    let expected = sign(secret, id, timestamp, body)?;

    // Constant-time comparison against every v1 candidate; a mismatch
    // must not leak which byte diverged.
    for candidate in signature_header.split(' ') {
        let Some((version, sig)) = candidate.split_once(',') else {
            continue;
        };
        if version != SIGNATURE_VERSION {
            continue;
        }
        if expected.as_bytes().ct_eq(sig.as_bytes()).unwrap_u8() == 1 {
            return Ok(());
        }
    }

    Err(WebhookError::SignatureMismatch)
}

/// Compute the `v1` signature value for a payload. Exposed so tests (and
/// local tooling) can construct correctly signed requests.
pub fn sign(secret: &str, id: &str, timestamp: &str, body: &str) -> Result<String, WebhookError> {
    let key = decode_secret(secret)?;

    let mut mac =
        HmacSha256::new_from_slice(&key).map_err(|_| WebhookError::InvalidSecret)?;
    mac.update(id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body.as_bytes());

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, WebhookError> {
    let encoded = secret
        .strip_prefix(SECRET_PREFIX)
        .ok_or(WebhookError::InvalidSecret)?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| WebhookError::InvalidSecret)
}
