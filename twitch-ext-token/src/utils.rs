use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::Deserialize;

use crate::error::TokenError;

/// Decode the base64 extension secret into raw HMAC key bytes
///
/// # Arguments
///
/// * `secret` - Base64 (standard alphabet) encoded secret as shown in the
///   extension console
pub fn decode_secret(secret: &str) -> Result<Vec<u8>, TokenError> {
    Ok(STANDARD.decode(secret)?)
}

/// Encode raw key bytes into the base64 form expected by [`decode_secret`]
pub fn encode_secret(key: &[u8]) -> String {
    STANDARD.encode(key)
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Read the `alg` field of a compact JWT header without trusting anything else
/// in the token.
pub(crate) fn declared_algorithm(token: &str) -> Result<String, TokenError> {
    let mut parts = token.split('.');
    let header = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(_), Some(_), None) => header,
        _ => return Err(TokenError::invalid_token("expected three token segments")),
    };

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TokenError::invalid_token(format!("malformed header encoding: {}", e)))?;
    let header: RawHeader = serde_json::from_slice(&header)
        .map_err(|e| TokenError::invalid_token(format!("malformed header: {}", e)))?;

    Ok(header.alg)
}
