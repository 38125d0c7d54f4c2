//! # Twitch Extension Token
//!
//! Claim construction, signing and verification for Twitch extension JWTs.
//!
//! Extension backends authenticate against the extension API with short lived
//! HS256 tokens signed with the extension secret, and receive tokens of the
//! same shape from the extension frontend. This crate covers both directions
//! and has no networking dependencies.
//!
//! ## Usage
//!
//! ```no_run
//! use twitch_ext_token::{create_claims, sign_claims, verify_token, Permissions, Role};
//!
//! fn main() -> Result<(), twitch_ext_token::TokenError> {
//!     let secret = "c2VjcmV0"; // base64 extension secret
//!
//!     let claims = create_claims(
//!         "owner-id",
//!         "35851594",
//!         Some(Role::Broadcaster),
//!         Permissions::broadcast_send(),
//!     );
//!     let token = sign_claims(&claims, secret)?;
//!
//!     let verified = verify_token(&token, secret)?;
//!     assert_eq!(verified.channel_id, "35851594");
//!     Ok(())
//! }
//! ```

mod claims;
mod error;
mod permissions;
mod sign;
mod utils;
mod verify;

pub use claims::{
    create_claims, create_claims_at, ExtensionClaims, Role, ALL_CHANNELS, CLAIMS_LIFETIME_MILLIS,
};
pub use error::TokenError;
pub use permissions::{Permissions, PublishTarget};
pub use sign::sign_claims;
pub use utils::{decode_secret, encode_secret};
pub use verify::{verify_token, verify_token_at};
