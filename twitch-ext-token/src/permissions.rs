use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TokenError;

const WHISPER_PREFIX: &str = "whisper-";

/// A pub/sub target a token may send to or listen on.
///
/// The wire form is a plain string: `*`, `broadcast`, `global` or
/// `whisper-<opaque user id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublishTarget {
    /// Wildcard target (`*`)
    Any,
    /// Every viewer of a channel
    Broadcast,
    /// Every channel the extension is active on
    Global,
    /// A single viewer, identified by their opaque user id
    Whisper(String),
}

impl PublishTarget {
    /// Whisper target for the given opaque user id
    pub fn whisper(opaque_user_id: impl Into<String>) -> Self {
        PublishTarget::Whisper(opaque_user_id.into())
    }
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishTarget::Any => f.write_str("*"),
            PublishTarget::Broadcast => f.write_str("broadcast"),
            PublishTarget::Global => f.write_str("global"),
            PublishTarget::Whisper(opaque_user_id) => {
                write!(f, "{}{}", WHISPER_PREFIX, opaque_user_id)
            }
        }
    }
}

impl FromStr for PublishTarget {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*" => Ok(PublishTarget::Any),
            "broadcast" => Ok(PublishTarget::Broadcast),
            "global" => Ok(PublishTarget::Global),
            _ => match s.strip_prefix(WHISPER_PREFIX) {
                Some(opaque_user_id) => Ok(PublishTarget::whisper(opaque_user_id)),
                None => Err(TokenError::InvalidPublishTarget(s.to_string())),
            },
        }
    }
}

impl Serialize for PublishTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublishTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Pub/sub permissions embedded in the `pubsub_perms` claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    send: Vec<PublishTarget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    listen: Vec<PublishTarget>,
}

impl Permissions {
    pub fn new(send: Vec<PublishTarget>, listen: Vec<PublishTarget>) -> Self {
        Self { send, listen }
    }

    /// Permission to publish a whisper to a single viewer
    pub fn whisper_send(opaque_user_id: impl Into<String>) -> Self {
        Self::new(vec![PublishTarget::whisper(opaque_user_id)], Vec::new())
    }

    /// Permission to publish to every viewer of a channel
    pub fn broadcast_send() -> Self {
        Self::new(vec![PublishTarget::Broadcast], Vec::new())
    }

    /// Permission to publish to every channel running the extension
    pub fn global_send() -> Self {
        Self::new(vec![PublishTarget::Global], Vec::new())
    }

    /// Permission to publish to any target
    pub fn generic_send() -> Self {
        Self::new(vec![PublishTarget::Any], Vec::new())
    }

    pub fn send(&self) -> &[PublishTarget] {
        &self.send
    }

    pub fn listen(&self) -> &[PublishTarget] {
        &self.listen
    }
}
