use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::auth::TokenSource;
use crate::error::{SurgeError, SurgeResult};

const DEFAULT_BASE_URL: &str = "https://secretmanager.googleapis.com";

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: String,
}

pub struct SecretsClient {
    client: Client,
    base_url: String,
    token_source: TokenSource,
}

impl SecretsClient {
    pub fn new(token_source: TokenSource) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_source,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches the payload text of `secret_name` at `version` (a version
    /// number or the alias "latest"). Every call goes to the store; nothing
    /// is cached locally.
    pub async fn access_secret_version(
        &self,
        project_id: &str,
        secret_name: &str,
        version: &str,
    ) -> SurgeResult<String> {
        let token = self.token_source.token().await?;
        let url = format!(
            "{}/v1/projects/{}/secrets/{}/versions/{}:access",
            self.base_url, project_id, secret_name, version
        );

        debug!("Accessing secret {}/{}", secret_name, version);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(SurgeError::SecretNotFound {
                name: secret_name.to_string(),
                version: version.to_string(),
            }),
            StatusCode::FORBIDDEN => Err(SurgeError::SecretPermissionDenied {
                name: secret_name.to_string(),
            }),
            status if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                Err(SurgeError::Remote {
                    service: "secret manager",
                    status: status.as_u16(),
                    message,
                })
            }
            _ => {
                let body: AccessSecretVersionResponse = response.json().await?;
                let bytes = STANDARD.decode(body.payload.data.as_bytes()).map_err(|e| {
                    SurgeError::MalformedSecret(format!("payload is not valid base64: {e}"))
                })?;
                String::from_utf8(bytes).map_err(|e| {
                    SurgeError::MalformedSecret(format!("payload is not valid UTF-8: {e}"))
                })
            }
        }
    }
}
