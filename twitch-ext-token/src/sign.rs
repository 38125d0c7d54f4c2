use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::claims::ExtensionClaims;
use crate::error::TokenError;
use crate::utils::decode_secret;

/// Sign extension claims into a compact HS256 JWT.
///
/// # Arguments
///
/// * `claims` - Claims to embed in the token
/// * `secret` - Base64 encoded extension secret
///
/// # Errors
///
/// * [`TokenError::KeyDecode`] if the secret is not valid base64
/// * [`TokenError::Signing`] if the claims cannot be serialized or signed
pub fn sign_claims(claims: &ExtensionClaims, secret: &str) -> Result<String, TokenError> {
    let key = decode_secret(secret)?;

    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(&key),
    )
    .map_err(TokenError::Signing)
}
