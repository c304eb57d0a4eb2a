use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{
    platform::{RtcError, RtcPlatform},
    types::{CreatedParticipant, Permission},
};

pub const DEFAULT_API_URL: &str = "https://api.webrtc.bandwidth.com/v1";

/// Device API version requested for every participant we create
const DEVICE_API_VERSION: &str = "V3";

#[derive(Debug, Serialize)]
struct SessionBody<'a> {
    tag: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionCreated {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantBody<'a> {
    tag: &'a str,
    publish_permissions: &'a [Permission],
    device_api_version: &'a str,
}

#[derive(Debug, Deserialize)]
struct ParticipantCreated {
    participant: ParticipantInfo,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ParticipantInfo {
    id: String,
}

/// Subscription body sent when adding a participant: subscribe to the whole session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionsBody<'a> {
    session_id: &'a str,
}

/// Account credentials for the platform REST API
#[derive(Debug, Clone)]
pub struct RtcCredentials {
    pub account_id: String,
    pub username: String,
    pub password: String,
}

/// `RtcPlatform` backed by the platform's HTTP API
#[derive(Debug, Clone)]
pub struct HttpRtcPlatform {
    client: Client,
    base_url: String,
    credentials: RtcCredentials,
}

impl HttpRtcPlatform {
    pub fn new(base_url: impl Into<String>, credentials: RtcCredentials) -> Self {
        Self::with_client(Client::new(), base_url, credentials)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        credentials: RtcCredentials,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Builds an account-scoped URL from a path like `/sessions`
    fn account_url(&self, path: &str) -> String {
        format!(
            "{}/accounts/{}{}",
            self.base_url.trim_end_matches('/'),
            self.credentials.account_id,
            path
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    /// Sends the request and turns non-success statuses into `RtcError::Api`
    async fn send(&self, request: RequestBuilder) -> Result<Response, RtcError> {
        let response = self.authorized(request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown error").to_string()
        } else {
            body
        };
        warn!(status = status.as_u16(), message = %message, "Platform request failed");

        Err(RtcError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RtcError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            debug!(body = %String::from_utf8_lossy(&bytes), "Undecodable platform response");
            RtcError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl RtcPlatform for HttpRtcPlatform {
    #[instrument(skip(self))]
    async fn create_session(&self, tag: &str) -> Result<String, RtcError> {
        let request = self
            .client
            .post(self.account_url("/sessions"))
            .json(&SessionBody { tag });

        let created: SessionCreated = Self::decode(self.send(request).await?).await?;
        debug!(session_id = %created.id, "Session created on platform");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn create_participant(
        &self,
        tag: &str,
        permissions: &[Permission],
    ) -> Result<CreatedParticipant, RtcError> {
        let request = self
            .client
            .post(self.account_url("/participants"))
            .json(&ParticipantBody {
                tag,
                publish_permissions: permissions,
                device_api_version: DEVICE_API_VERSION,
            });

        let created: ParticipantCreated = Self::decode(self.send(request).await?).await?;
        debug!(participant_id = %created.participant.id, "Participant created on platform");

        Ok(CreatedParticipant {
            participant_id: created.participant.id,
            token: created.token,
        })
    }

    #[instrument(skip(self))]
    async fn add_participant_to_session(
        &self,
        session_id: &str,
        participant_id: &str,
    ) -> Result<(), RtcError> {
        let request = self
            .client
            .put(self.account_url(&format!(
                "/sessions/{}/participants/{}",
                session_id, participant_id
            )))
            .json(&SubscriptionsBody { session_id });

        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_participant_from_session(
        &self,
        participant_id: &str,
        session_id: &str,
    ) -> Result<(), RtcError> {
        let request = self.client.delete(self.account_url(&format!(
            "/sessions/{}/participants/{}",
            session_id, participant_id
        )));

        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> RtcCredentials {
        RtcCredentials {
            account_id: "9900000".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
        }
    }

    #[test]
    fn test_account_url() {
        let platform = HttpRtcPlatform::new("https://api.example.com/v1/", credentials());

        assert_eq!(
            platform.account_url("/sessions"),
            "https://api.example.com/v1/accounts/9900000/sessions"
        );
    }

    #[test]
    fn test_participant_body_wire_format() {
        let permissions = [Permission::Audio];
        let body = ParticipantBody {
            tag: "abc",
            publish_permissions: &permissions,
            device_api_version: DEVICE_API_VERSION,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tag": "abc",
                "publishPermissions": ["AUDIO"],
                "deviceApiVersion": "V3"
            })
        );
    }

    #[test]
    fn test_participant_created_decodes_extra_fields() {
        let body = r#"{
            "participant": {"id": "p-1", "tag": "abc", "publishPermissions": ["AUDIO"]},
            "token": "jwt"
        }"#;

        let created: ParticipantCreated = serde_json::from_str(body).unwrap();
        assert_eq!(created.participant.id, "p-1");
        assert_eq!(created.token, "jwt");
    }
}
