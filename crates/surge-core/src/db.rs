use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{SurgeError, SurgeResult};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Credentials bundle stored in Secret Manager. All keys are required; a
/// missing key fails deserialization before any connection attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct DbSecret {
    pub connection_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
}

impl DbSecret {
    pub fn from_payload(payload: &str) -> SurgeResult<Self> {
        serde_json::from_str(payload).map_err(|e| SurgeError::MalformedSecret(e.to_string()))
    }

    /// Host portion of the instance reference. Full connection names are
    /// `project:region:instance`; a bare hostname passes through unchanged
    /// for local databases.
    fn host(&self) -> &str {
        self.connection_name
            .rsplit(':')
            .next()
            .unwrap_or(&self.connection_name)
    }
}

/// Builds the bounded pool: at most `max_connections` permanent connections,
/// no overflow, 30 second acquire timeout, 30 minute connection lifetime.
pub async fn connect_pool(secret: &DbSecret, max_connections: u32) -> SurgeResult<PgPool> {
    let options = PgConnectOptions::new()
        .host(secret.host())
        .username(&secret.db_user)
        .password(&secret.db_password)
        .database(&secret.db_name)
        .ssl_mode(PgSslMode::Prefer);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect_with(options)
        .await?;

    info!("Connection pool ready (max_connections={})", max_connections);
    Ok(pool)
}

/// Data access for the external clients table. `account_number` returns
/// `Ok(None)` only when no row matches; query failures surface as errors so
/// the HTTP layer can tell 404 from 500.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn account_number(&self, client_id: i64) -> SurgeResult<Option<String>>;

    /// Writes the derived field; returns whether a row was affected.
    async fn write_encoded(&self, client_id: i64, encoded: &str) -> SurgeResult<bool>;
}

pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn account_number(&self, client_id: i64) -> SurgeResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT accountnumber FROM my_schema.clients WHERE clientid = $1",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(account_number,)| account_number))
    }

    async fn write_encoded(&self, client_id: i64, encoded: &str) -> SurgeResult<bool> {
        let result = sqlx::query("UPDATE my_schema.clients SET base64 = $1 WHERE clientid = $2")
            .bind(encoded)
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-memory store for tests and local runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryClientStore {
    rows: Arc<RwLock<HashMap<i64, ClientRow>>>,
}

#[derive(Debug, Clone)]
struct ClientRow {
    account_number: String,
    encoded: Option<String>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, client_id: i64, account_number: &str) {
        self.rows.write().await.insert(
            client_id,
            ClientRow {
                account_number: account_number.to_string(),
                encoded: None,
            },
        );
    }

    pub async fn encoded(&self, client_id: i64) -> Option<String> {
        self.rows
            .read()
            .await
            .get(&client_id)
            .and_then(|row| row.encoded.clone())
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn account_number(&self, client_id: i64) -> SurgeResult<Option<String>> {
        Ok(self
            .rows
            .read()
            .await
            .get(&client_id)
            .map(|row| row.account_number.clone()))
    }

    async fn write_encoded(&self, client_id: i64, encoded: &str) -> SurgeResult<bool> {
        match self.rows.write().await.get_mut(&client_id) {
            Some(row) => {
                row.encoded = Some(encoded.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_bundle_parses_complete_payload() {
        let payload = r#"{
            "connection_name": "demo:northamerica-south1:clients-primary",
            "db_user": "app",
            "db_password": "hunter2",
            "db_name": "clients"
        }"#;
        let secret = DbSecret::from_payload(payload).expect("bundle");
        assert_eq!(secret.db_user, "app");
        assert_eq!(secret.host(), "clients-primary");
    }

    #[test]
    fn secret_bundle_missing_db_user_fails_before_any_connection() {
        let payload = r#"{
            "connection_name": "demo:northamerica-south1:clients-primary",
            "db_password": "hunter2",
            "db_name": "clients"
        }"#;
        let err = DbSecret::from_payload(payload).expect_err("missing key");
        assert!(matches!(err, SurgeError::MalformedSecret(_)));
    }

    #[test]
    fn bare_hostname_passes_through() {
        let secret = DbSecret {
            connection_name: "localhost".to_string(),
            db_user: "app".to_string(),
            db_password: "hunter2".to_string(),
            db_name: "clients".to_string(),
        };
        assert_eq!(secret.host(), "localhost");
    }

    #[tokio::test]
    async fn memory_store_distinguishes_absent_rows() {
        let store = InMemoryClientStore::new();
        store.insert(42, "ACC123").await;

        assert_eq!(
            store.account_number(42).await.expect("lookup"),
            Some("ACC123".to_string())
        );
        assert_eq!(store.account_number(999999).await.expect("lookup"), None);

        assert!(store.write_encoded(42, "QUNDMTIz").await.expect("write"));
        assert!(!store.write_encoded(999999, "QUNDMTIz").await.expect("write"));
        assert_eq!(store.encoded(42).await, Some("QUNDMTIz".to_string()));
    }
}
