// Database Connection Management
//
// PostgreSQL connection pooling using tokio-postgres and deadpool, and the
// user store built on top of it.
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::config::Host;
use tokio_postgres::error::SqlState;

use crate::auth::models::User;
use crate::database::migrations;
use crate::database::models::FromRow;
use crate::services::errors::StoreError;
use crate::services::traits::{UserCreator, UserGetter};

/// Database configuration
///
/// Holds the connection settings exactly as parsed from `DATABASE_URL`, so
/// options such as `sslmode` and `connect_timeout` reach the driver.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub pg_config: tokio_postgres::Config,
    pub max_size: usize,
    pub timeouts: deadpool_postgres::Timeouts,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("hosts", &self.pg_config.get_hosts())
            .field("ports", &self.pg_config.get_ports())
            .field("user", &self.pg_config.get_user())
            .field("password", &"<redacted>")
            .field("dbname", &self.pg_config.get_dbname())
            .field("ssl_mode", &self.pg_config.get_ssl_mode())
            .field("max_size", &self.max_size)
            .finish()
    }
}

fn default_timeouts() -> deadpool_postgres::Timeouts {
    deadpool_postgres::Timeouts {
        wait: Some(Duration::from_secs(30)),
        create: Some(Duration::from_secs(30)),
        recycle: Some(Duration::from_secs(30)),
    }
}

impl DatabaseConfig {
    /// Create configuration from a `postgres://` connection string
    pub fn from_url(database_url: &str, max_size: usize) -> Result<Self> {
        let pg_config = tokio_postgres::Config::from_str(database_url)
            .context("Failed to parse DATABASE_URL")?;

        Ok(Self {
            pg_config,
            max_size,
            timeouts: default_timeouts(),
        })
    }

    /// `host:port/dbname` of the first host, for logging
    fn target(&self) -> String {
        let host = match self.pg_config.get_hosts().first() {
            Some(Host::Tcp(host)) => host.clone(),
            Some(Host::Unix(path)) => path.to_string_lossy().to_string(),
            None => "localhost".to_string(),
        };
        let port = self.pg_config.get_ports().first().copied().unwrap_or(5432);
        let dbname = self.pg_config.get_dbname().unwrap_or_default();
        format!("{host}:{port}/{dbname}")
    }
}

/// Database connection wrapper; also the PostgreSQL-backed user store
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: Pool,
}

impl DatabaseConnection {
    /// Create a new database connection with the provided configuration
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        tracing::info!(
            "Connecting to database: {} (sslmode {:?})",
            config.target(),
            config.pg_config.get_ssl_mode()
        );

        let tls_connector = TlsConnector::builder()
            .build()
            .context("Failed to build TLS connector")?;
        let tls = MakeTlsConnector::new(tls_connector);

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = Manager::from_config(config.pg_config, tls, mgr_config);

        let pool = Pool::builder(mgr)
            .max_size(config.max_size)
            .wait_timeout(config.timeouts.wait)
            .create_timeout(config.timeouts.create)
            .recycle_timeout(config.timeouts.recycle)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .context("Failed to create database pool")?;

        let connection = Self { pool };
        connection.health_check().await?;

        tracing::info!("Database connection established");
        Ok(connection)
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get connection for health check")?;

        client
            .query("SELECT 1", &[])
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

#[async_trait]
impl UserGetter for DatabaseConnection {
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection")?;
        let row = client
            .query_opt(
                "SELECT id, username, password_hash FROM users WHERE username = $1",
                &[&username],
            )
            .await
            .context("Failed to query user by username")?;

        let row = row.ok_or(StoreError::NotFound)?;
        let user = User::from_row(&row).context("Failed to decode user row")?;
        Ok(user)
    }
}

#[async_trait]
impl UserCreator for DatabaseConnection {
    async fn create_user(&self, user: User) -> Result<(), StoreError> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection")?;

        let result = client
            .execute(
                "INSERT INTO users (username, password_hash) VALUES ($1, $2)",
                &[&user.username, &user.password],
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Err(StoreError::Conflict),
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to insert user")
                .into()),
        }
    }
}
