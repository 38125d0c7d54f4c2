use thiserror::Error;

/// Errors raised while building, signing or verifying extension tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// The configured extension secret is not valid base64
    #[error("failed to decode extension secret: {0}")]
    KeyDecode(#[from] base64::DecodeError),

    /// The claims could not be serialized or signed
    #[error("failed to sign claims: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// An empty token string was handed to the verifier
    #[error("JWT token string missing")]
    MissingToken,

    /// The token declares a signing algorithm outside the HMAC family
    #[error("unexpected signing method: {0}")]
    UnexpectedAlgorithm(String),

    /// Signature mismatch, malformed structure or expired token
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// A pub/sub target string that is not one of the known target kinds
    #[error("invalid publish target: {0:?}")]
    InvalidPublishTarget(String),
}

impl TokenError {
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        TokenError::InvalidToken(msg.into())
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        TokenError::InvalidToken(error.to_string())
    }
}
