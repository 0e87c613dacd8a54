use crate::error::{SurgeError, SurgeResult};

const DEFAULT_LOCATION: &str = "northamerica-south1";

fn required(name: &'static str) -> SurgeResult<String> {
    std::env::var(name).map_err(|_| SurgeError::Config(format!("{name} must be set")))
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Environment for the load driver: which deployed workflow to execute.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub project: String,
    pub location: String,
    pub workflow: String,
}

impl BenchConfig {
    pub fn from_env() -> SurgeResult<Self> {
        Ok(Self {
            project: required("PROJECT")?,
            location: std::env::var("LOCATION").unwrap_or_else(|_| DEFAULT_LOCATION.to_string()),
            workflow: required("WORKFLOW")?,
        })
    }
}

/// Environment for the update service: where the credentials secret lives
/// and how the pool and listener are sized.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub project_id: String,
    pub secret_name: String,
    pub max_connections: u32,
    pub port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> SurgeResult<Self> {
        Ok(Self {
            project_id: required("PROJECT_ID")?,
            secret_name: required("SECRET_NAME")?,
            max_connections: parsed_or("MAX_CONNECTIONS", crate::db::DEFAULT_MAX_CONNECTIONS),
            port: parsed_or("PORT", 8080),
        })
    }
}
