//! # Authentication Module
//!
//! Hashed API key authentication for the administrator routes.
//!
//! ## Configuration
//!
//! - `WORKLOAD_ADMIN_KEY_HASH`: BLAKE3 hex digest of the administrator key.
//!   Produce it with `workload admin-hash`. The plaintext key is never
//!   stored or configured.
//!
//! If the digest is not configured, administrator routes answer
//! `403 Forbidden` for every request.
//!
//! ## Usage
//!
//! Send the key in the Authorization header:
//! ```text
//! Authorization: Bearer <your-admin-key>
//! ```

use super::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// 32-byte BLAKE3 digest of the administrator key.
pub type AdminKeyHash = [u8; blake3::OUT_LEN];

// =============================================================================
// ADMIN KEY HASHING
// =============================================================================

/// Digest a plaintext key.
#[must_use]
pub fn hash_admin_key(key: &str) -> AdminKeyHash {
    *blake3::hash(key.as_bytes()).as_bytes()
}

/// Hex form of [`hash_admin_key`], as stored in `WORKLOAD_ADMIN_KEY_HASH`.
#[must_use]
pub fn hash_admin_key_hex(key: &str) -> String {
    blake3::hash(key.as_bytes()).to_hex().to_string()
}

/// Parse a 64-character hex digest.
pub fn parse_admin_key_hash(hex: &str) -> Option<AdminKeyHash> {
    blake3::Hash::from_hex(hex.trim())
        .ok()
        .map(|h| *h.as_bytes())
}

/// Get the administrator key digest from the environment.
///
/// Returns `None` when `WORKLOAD_ADMIN_KEY_HASH` is unset, empty, or not a
/// valid digest (admin routes are then disabled).
pub fn get_admin_key_hash_from_env() -> Option<AdminKeyHash> {
    let raw = std::env::var("WORKLOAD_ADMIN_KEY_HASH")
        .ok()
        .filter(|k| !k.is_empty())?;

    let parsed = parse_admin_key_hash(&raw);
    if parsed.is_none() {
        tracing::warn!(
            event = "auth_config_invalid",
            "WORKLOAD_ADMIN_KEY_HASH is not a 64-character BLAKE3 hex digest; admin routes disabled"
        );
    }
    parsed
}

// =============================================================================
// ADMIN AUTHENTICATION MIDDLEWARE
// =============================================================================

/// Administrator authentication middleware.
///
/// Hashes the presented Bearer key and compares digests in constant time.
/// Both digests are fixed-length, so no padding is needed.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = state.admin_key_hash.as_deref() else {
        tracing::warn!(
            event = "auth_failure",
            reason = "admin_disabled",
            "Admin route requested but no admin key hash is configured"
        );
        return Err((StatusCode::FORBIDDEN, "Admin access is not configured"));
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header_value) = auth_header else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_authorization_header",
            "Missing Authorization header"
        );
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    let provided_key = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
    let provided = hash_admin_key(provided_key);

    if bool::from(provided.as_slice().ct_eq(expected.as_slice())) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            event = "auth_failure",
            reason = "invalid_admin_key",
            "Authentication failed: invalid admin key"
        );
        Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

// =============================================================================
// TESTS
// =============================================================================
