use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use crate::claims::ExtensionClaims;
use crate::error::TokenError;
use crate::utils::{declared_algorithm, decode_secret};

/// Map a declared `alg` onto the HMAC family, rejecting everything else.
fn hmac_algorithm(alg: &str) -> Result<Algorithm, TokenError> {
    match alg {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(TokenError::UnexpectedAlgorithm(other.to_string())),
    }
}

/// Verifies an extension JWT (for example one forwarded by the extension
/// frontend) and returns its claims.
///
/// # Arguments
///
/// * `token` - Compact JWT string
/// * `secret` - Base64 encoded extension secret
///
/// # Errors
///
/// * [`TokenError::MissingToken`] if `token` is empty
/// * [`TokenError::UnexpectedAlgorithm`] if the header declares a non-HMAC algorithm
/// * [`TokenError::KeyDecode`] if the secret is not valid base64
/// * [`TokenError::InvalidToken`] if the token is malformed, its signature
///   does not match or it has expired
pub fn verify_token(token: &str, secret: &str) -> Result<ExtensionClaims, TokenError> {
    verify_token_at(token, secret, Utc::now())
}

/// Same as [`verify_token`], checking expiry against `now`
pub fn verify_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<ExtensionClaims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::MissingToken);
    }

    let alg = declared_algorithm(token)?;
    let algorithm = match hmac_algorithm(&alg) {
        Ok(algorithm) => algorithm,
        Err(e) => {
            debug!(alg = %alg, "rejecting token with non-HMAC signing method");
            return Err(e);
        }
    };

    let key = decode_secret(secret)?;

    // Expiry is in milliseconds, so it is checked below rather than by jsonwebtoken.
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<ExtensionClaims>(token, &DecodingKey::from_secret(&key), &validation)
        .map_err(|e| {
            debug!(error = %e, "token verification failed");
            TokenError::from(e)
        })?;

    let claims = data.claims;
    if claims.is_expired_at(now) {
        debug!(
            expires_at = claims.expires_at_millis(),
            "token verification failed: expired"
        );
        return Err(TokenError::invalid_token("token is expired"));
    }

    Ok(claims)
}
