use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurgeError {
    #[error("{service} call failed with status {status}: {message}")]
    Remote {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("secret {name} (version {version}) not found")]
    SecretNotFound { name: String, version: String },

    #[error("access to secret {name} denied")]
    SecretPermissionDenied { name: String },

    #[error("malformed secret payload: {0}")]
    MalformedSecret(String),

    #[error("failed to obtain access token: {0}")]
    Auth(#[from] gcp_auth::Error),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type SurgeResult<T> = Result<T, SurgeError>;
