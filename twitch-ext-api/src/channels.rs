use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{from_json_body, ExtensionClient};
use crate::response::ResponseCommon;
use crate::ApiError;

/// One page of live channels with the extension activated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionEnabledChannels {
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Pagination cursor for the next page, empty on the last one
    #[serde(default)]
    pub cursor: String,
    #[serde(skip)]
    pub headers: ResponseCommon,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub game: String,
    pub id: String,
    pub username: String,
    pub title: String,
    #[serde(rename = "view_count")]
    pub viewers: String,
}

impl ExtensionClient {
    /// List live channels with the extension activated.
    ///
    /// Pass the `cursor` of the previous page to continue, or an empty string
    /// for the first page. The request carries no bearer token.
    pub async fn get_live_channels_with_extension_enabled(
        &self,
        extension_id: &str,
        cursor: &str,
    ) -> Result<ExtensionEnabledChannels, ApiError> {
        let url = self.endpoint(&format!(
            "/extensions/{}/live_activated_channels",
            extension_id
        ));
        let mut query = Vec::new();
        if !cursor.is_empty() {
            query.push(("cursor", cursor));
        }

        let (payload, headers) = self.send(Method::GET, &url, None, None, &query).await?;

        let mut channels: ExtensionEnabledChannels = from_json_body(&payload)?;
        channels.headers = headers;
        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_page_decoding() {
        let payload = br#"{
            "channels": [
                {"game": "Chess", "id": "70", "username": "gm", "title": "blitz", "view_count": "1200"},
                {"id": "71"}
            ],
            "cursor": "abc"
        }"#;
        let page: ExtensionEnabledChannels = from_json_body(payload).unwrap();

        assert_eq!(page.cursor, "abc");
        assert_eq!(page.channels.len(), 2);
        assert_eq!(page.channels[0].viewers, "1200");
        assert_eq!(page.channels[1].username, "");

        let last: ExtensionEnabledChannels = from_json_body(br#"{"channels": []}"#).unwrap();
        assert!(last.cursor.is_empty());
    }
}
