use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::Permissions;

/// Lifetime of every claim set built by this crate (3 minutes)
pub const CLAIMS_LIFETIME_MILLIS: i64 = 3 * 60 * 1000;

/// Channel scope used when a claim set is not bound to a single channel
pub const ALL_CHANNELS: &str = "all";

// Expiry values below this are epoch seconds, not milliseconds.
const SECONDS_EPOCH_CEILING: i64 = 100_000_000_000;

/// The user role carried in an extension token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Broadcaster,
    #[default]
    External,
    Moderator,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Broadcaster => "broadcaster",
            Role::External => "external",
            Role::Moderator => "moderator",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims of a Twitch extension JWT.
///
/// Serialized field names follow the extension API's wire format. `exp` and
/// `iat` are written in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opaque_user_id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    pub role: Role,
    #[serde(default, rename = "is_unlinked", skip_serializing_if = "is_false")]
    pub unlinked: bool,
    #[serde(default, rename = "pubsub_perms")]
    pub permissions: Permissions,
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(default, rename = "iat", skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ExtensionClaims {
    /// Expiry normalized to epoch milliseconds.
    ///
    /// Tokens minted by the Twitch frontend helper carry `exp` in seconds,
    /// tokens minted here carry milliseconds.
    pub fn expires_at_millis(&self) -> i64 {
        if self.expires_at < SECONDS_EPOCH_CEILING {
            self.expires_at.saturating_mul(1000)
        } else {
            self.expires_at
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() > self.expires_at_millis()
    }
}

/// Builds the claims required by the extension API for a request made on
/// behalf of `owner_id`.
///
/// An empty `channel_id` scopes the claims to [`ALL_CHANNELS`] and a missing
/// role defaults to [`Role::External`]. The claims expire
/// [`CLAIMS_LIFETIME_MILLIS`] after creation.
pub fn create_claims(
    owner_id: &str,
    channel_id: &str,
    role: Option<Role>,
    permissions: Permissions,
) -> ExtensionClaims {
    create_claims_at(owner_id, channel_id, role, permissions, Utc::now())
}

/// Same as [`create_claims`] with an explicit creation time
pub fn create_claims_at(
    owner_id: &str,
    channel_id: &str,
    role: Option<Role>,
    permissions: Permissions,
    now: DateTime<Utc>,
) -> ExtensionClaims {
    let issued_at = now.timestamp_millis();
    let channel_id = if channel_id.is_empty() {
        ALL_CHANNELS
    } else {
        channel_id
    };

    ExtensionClaims {
        opaque_user_id: None,
        user_id: owner_id.to_string(),
        channel_id: channel_id.to_string(),
        role: role.unwrap_or_default(),
        unlinked: false,
        permissions,
        expires_at: issued_at + CLAIMS_LIFETIME_MILLIS,
        issued_at: Some(issued_at),
    }
}
