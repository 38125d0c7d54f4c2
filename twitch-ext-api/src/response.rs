use std::collections::BTreeMap;

use reqwest::header::HeaderMap;

const PUBSUB_CHANNEL_LIMIT: &str = "Ratelimit-Ratelimitermessagesbychannel-Limit";
const PUBSUB_CHANNEL_REMAINING: &str = "Ratelimit-Ratelimitermessagesbychannel-Remaining";
const SET_CONFIGURATION_LIMIT: &str = "Ratelimit-Ratelimiterextensionsetconfiguration-Limit";
const SET_CONFIGURATION_REMAINING: &str =
    "Ratelimit-Ratelimiterextensionsetconfiguration-Remaining";
const CHAT_MESSAGE_LIMIT: &str = "Ratelimit-Ratelimiterextensionchatmessages-Limit";
const CHAT_MESSAGE_REMAINING: &str = "Ratelimit-Ratelimiterextensionchatmessages-Remaining";

/// Response headers returned alongside every successful API call.
///
/// The rate limit accessors are advisory: a missing or malformed header reads
/// as zero.
#[derive(Debug, Clone, Default)]
pub struct ResponseCommon {
    headers: HeaderMap,
}

impl ResponseCommon {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Integer value of the named header, or 0 if it is missing or not a number
    pub fn header_int(&self, name: &str) -> i64 {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    /// Pub/sub messages per channel limit
    pub fn pubsub_channel_rate_limit(&self) -> i64 {
        self.header_int(PUBSUB_CHANNEL_LIMIT)
    }

    pub fn pubsub_channel_rate_limit_remaining(&self) -> i64 {
        self.header_int(PUBSUB_CHANNEL_REMAINING)
    }

    /// Configuration service set limit
    pub fn set_configuration_rate_limit(&self) -> i64 {
        self.header_int(SET_CONFIGURATION_LIMIT)
    }

    pub fn set_configuration_rate_limit_remaining(&self) -> i64 {
        self.header_int(SET_CONFIGURATION_REMAINING)
    }

    /// Extension chat message limit
    pub fn chat_message_rate_limit(&self) -> i64 {
        self.header_int(CHAT_MESSAGE_LIMIT)
    }

    pub fn chat_message_rate_limit_remaining(&self) -> i64 {
        self.header_int(CHAT_MESSAGE_REMAINING)
    }

    /// Headers rendered as a JSON object of name to list of values
    pub fn to_json(&self) -> String {
        let mut headers: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (name, value) in &self.headers {
            headers
                .entry(name.as_str())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
        serde_json::to_string(&headers).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn response_with(headers: &[(&'static str, &'static str)]) -> ResponseCommon {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_static(value),
            );
        }
        ResponseCommon::new(map)
    }

    #[test]
    fn test_header_int() {
        let response = response_with(&[("X-Limit", "30"), ("X-Broken", "notanumber")]);

        assert_eq!(response.header_int("X-Limit"), 30);
        assert_eq!(response.header_int("x-limit"), 30);
        assert_eq!(response.header_int("X-Missing"), 0);
        assert_eq!(response.header_int("X-Broken"), 0);
    }

    #[test]
    fn test_rate_limit_accessors() {
        let response = response_with(&[
            ("Ratelimit-Ratelimitermessagesbychannel-Limit", "100"),
            ("Ratelimit-Ratelimitermessagesbychannel-Remaining", "99"),
            ("Ratelimit-Ratelimiterextensionsetconfiguration-Limit", "20"),
            ("Ratelimit-Ratelimiterextensionsetconfiguration-Remaining", "19"),
            ("Ratelimit-Ratelimiterextensionchatmessages-Limit", "12"),
            ("Ratelimit-Ratelimiterextensionchatmessages-Remaining", "11"),
        ]);

        assert_eq!(response.pubsub_channel_rate_limit(), 100);
        assert_eq!(response.pubsub_channel_rate_limit_remaining(), 99);
        assert_eq!(response.set_configuration_rate_limit(), 20);
        assert_eq!(response.set_configuration_rate_limit_remaining(), 19);
        assert_eq!(response.chat_message_rate_limit(), 12);
        assert_eq!(response.chat_message_rate_limit_remaining(), 11);

        let empty = ResponseCommon::default();
        assert_eq!(empty.pubsub_channel_rate_limit(), 0);
        assert_eq!(empty.chat_message_rate_limit_remaining(), 0);
    }

    #[test]
    fn test_to_json() {
        let response = response_with(&[("X-Limit", "30"), ("Set-Thing", "a"), ("Set-Thing", "b")]);
        let value: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();

        assert_eq!(value["x-limit"], serde_json::json!(["30"]));
        assert_eq!(value["set-thing"], serde_json::json!(["a", "b"]));
    }
}
