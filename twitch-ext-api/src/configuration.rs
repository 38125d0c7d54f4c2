use std::collections::HashMap;
use std::fmt;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use twitch_ext_token::{Permissions, Role};

use crate::client::{from_json_body, to_json_body, ExtensionClient};
use crate::response::ResponseCommon;
use crate::ApiError;

/// A configuration service segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Broadcaster,
    Developer,
    Global,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Broadcaster => "broadcaster",
            SegmentType::Developer => "developer",
            SegmentType::Global => "global",
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct ConfigurationParams<'a> {
    segment: SegmentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_id: Option<&'a str>,
    #[serde(skip_serializing_if = "str::is_empty")]
    version: &'a str,
    content: String,
}

#[derive(Serialize)]
struct RequiredConfiguration<'a> {
    required_configuration: &'a str,
}

/// A stored segment and its record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub segment: Option<Segment>,
    #[serde(default)]
    pub record: Option<Record>,
}

/// Segment type and, for channel segments, the channel it belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "segment_type")]
    pub segment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
}

/// Version and raw content stored within a segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ConfigurationResponse {
    pub configuration: Configuration,
    pub headers: ResponseCommon,
}

/// Every segment stored for a channel, keyed by segment type
#[derive(Debug, Clone)]
pub struct AllConfigurationsResponse {
    pub configurations: HashMap<String, Configuration>,
    pub headers: ResponseCommon,
}

impl ExtensionClient {
    /// Set the global segment
    pub async fn set_global_segment<T: Serialize + ?Sized>(
        &self,
        data: &T,
    ) -> Result<ResponseCommon, ApiError> {
        self.set_segment_config(data, "", SegmentType::Global).await
    }

    /// Set the broadcaster segment of a channel
    pub async fn set_broadcaster_segment<T: Serialize + ?Sized>(
        &self,
        data: &T,
        channel_id: &str,
    ) -> Result<ResponseCommon, ApiError> {
        self.set_segment_config(data, channel_id, SegmentType::Broadcaster)
            .await
    }

    /// Set the developer segment of a channel
    pub async fn set_developer_segment<T: Serialize + ?Sized>(
        &self,
        data: &T,
        channel_id: &str,
    ) -> Result<ResponseCommon, ApiError> {
        self.set_segment_config(data, channel_id, SegmentType::Developer)
            .await
    }

    pub async fn get_global_segment(&self) -> Result<ConfigurationResponse, ApiError> {
        self.get_segment_config("", SegmentType::Global).await
    }

    pub async fn get_broadcaster_segment(
        &self,
        channel_id: &str,
    ) -> Result<ConfigurationResponse, ApiError> {
        self.get_segment_config(channel_id, SegmentType::Broadcaster)
            .await
    }

    pub async fn get_developer_segment(
        &self,
        channel_id: &str,
    ) -> Result<ConfigurationResponse, ApiError> {
        self.get_segment_config(channel_id, SegmentType::Developer)
            .await
    }

    /// Broadcaster and developer segments of a channel
    pub async fn get_all_channel_configurations(
        &self,
        channel_id: &str,
    ) -> Result<AllConfigurationsResponse, ApiError> {
        let url = self.endpoint(&format!(
            "/extensions/{}/configurations/channels/{}",
            self.config().client_id,
            channel_id
        ));
        let claims = self.create_claims(
            channel_id,
            Some(Role::External),
            Permissions::broadcast_send(),
        );

        let (payload, headers) = self
            .send(Method::GET, &url, Some(&claims), None, &[])
            .await?;
        let stored: HashMap<String, Configuration> = from_json_body(&payload)?;

        // keys come back as "<segment>:<channel_id>"
        let configurations = stored
            .into_iter()
            .map(|(key, configuration)| {
                let segment = key.split(':').next().unwrap_or_default().to_string();
                (segment, configuration)
            })
            .collect();

        Ok(AllConfigurationsResponse {
            configurations,
            headers,
        })
    }

    /// Mark a channel's configuration as matching the current configuration version
    pub async fn set_extension_required(
        &self,
        channel_id: &str,
    ) -> Result<ResponseCommon, ApiError> {
        let config = self.config();
        let url = self.endpoint(&format!(
            "/extensions/{}/{}/required_configuration",
            config.client_id, config.version
        ));
        let claims = self.create_claims(
            channel_id,
            Some(Role::External),
            Permissions::broadcast_send(),
        );
        let body = to_json_body(&RequiredConfiguration {
            required_configuration: &config.config_version,
        })?;

        let (_, headers) = self
            .send(
                Method::PUT,
                &url,
                Some(&claims),
                Some(body),
                &[("channel_id", channel_id)],
            )
            .await?;
        Ok(headers)
    }

    async fn set_segment_config<T: Serialize + ?Sized>(
        &self,
        data: &T,
        channel_id: &str,
        segment: SegmentType,
    ) -> Result<ResponseCommon, ApiError> {
        let config = self.config();
        let url = self.endpoint(&format!(
            "/extensions/{}/configurations/",
            config.client_id
        ));
        let claims = self.create_claims(
            channel_id,
            Some(Role::External),
            Permissions::broadcast_send(),
        );
        let params = ConfigurationParams {
            segment,
            channel_id: (segment != SegmentType::Global).then_some(channel_id),
            version: &config.config_version,
            content: serde_json::to_string(data)?,
        };

        let (_, headers) = self
            .send(
                Method::PUT,
                &url,
                Some(&claims),
                Some(to_json_body(&params)?),
                &[],
            )
            .await?;
        Ok(headers)
    }

    async fn get_segment_config(
        &self,
        channel_id: &str,
        segment: SegmentType,
    ) -> Result<ConfigurationResponse, ApiError> {
        let url = self.endpoint(&format!(
            "/extensions/{}/configurations/segments/{}",
            self.config().client_id,
            segment
        ));
        let claims = self.create_claims(
            channel_id,
            Some(Role::External),
            Permissions::broadcast_send(),
        );
        let mut query = Vec::new();
        if segment != SegmentType::Global {
            query.push(("channel_id", channel_id));
        }

        let (payload, headers) = self
            .send(Method::GET, &url, Some(&claims), None, &query)
            .await?;
        let mut stored: HashMap<String, Configuration> = from_json_body(&payload)?;

        let configuration = stored
            .remove(&format!("{}:{}", segment, channel_id))
            .ok_or_else(|| ApiError::MissingConfiguration {
                segment: segment.to_string(),
                channel_id: channel_id.to_string(),
            })?;

        Ok(ConfigurationResponse {
            configuration,
            headers,
        })
    }
}
