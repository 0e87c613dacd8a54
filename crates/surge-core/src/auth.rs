use crate::error::SurgeResult;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where bearer tokens come from. `Gcp` asks the ambient credentials
/// (service account or workload identity); `Fixed` serves tests and local
/// runs against a stub endpoint.
#[derive(Clone)]
pub enum TokenSource {
    Gcp,
    Fixed(String),
}

impl TokenSource {
    pub async fn token(&self) -> SurgeResult<String> {
        match self {
            TokenSource::Fixed(token) => Ok(token.clone()),
            TokenSource::Gcp => {
                let provider = gcp_auth::provider().await?;
                let token = provider.token(&[CLOUD_PLATFORM_SCOPE]).await?;
                Ok(token.as_str().to_string())
            }
        }
    }
}
