//! Server settings loaded via OrthoConfig and the assembled server config.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use visa_backend::domain::EmptyResultPolicy;
use visa_backend::inbound::http::session_config::{BuildMode, SessionSettings};
use visa_backend::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 5;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid identity lookup URL '{value}': {message}")]
    IdentityUrl { value: String, message: String },
    #[error("{0}")]
    EmptyResultPolicy(String),
    #[error("identity timeout must be at least one second")]
    ZeroTimeout,
    #[error("VISA_IDENTITY_LOOKUP_URL must be set in release builds")]
    IdentityProviderRequired,
}

/// Values read from `VISA_*` environment variables, CLI flags or a config
/// file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VISA")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Account lookup endpoint of the identity provider. The fixture token
    /// table is used when absent.
    pub identity_lookup_url: Option<String>,
    /// API key appended to identity lookups.
    pub identity_api_key: Option<String>,
    /// Timeout for one identity lookup.
    pub identity_timeout_secs: Option<u64>,
    /// `empty` (default) or `not_found`.
    pub applicant_empty_result: Option<String>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.trim().parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::BindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Pool settings when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(
            PoolConfig::new(url)
                .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)),
        )
    }

    pub fn identity_lookup_url(&self) -> Result<Option<Url>, SettingsError> {
        let Some(value) = self.identity_lookup_url.as_deref() else {
            return Ok(None);
        };
        Url::parse(value.trim())
            .map(Some)
            .map_err(|err| SettingsError::IdentityUrl {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn identity_timeout(&self) -> Result<Duration, SettingsError> {
        match self
            .identity_timeout_secs
            .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS)
        {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Provider settings for the HTTP verifier.
    ///
    /// `None` selects the fixture token table, which only debug builds may
    /// use.
    pub fn identity_settings(
        &self,
        mode: BuildMode,
    ) -> Result<Option<IdentitySettings>, SettingsError> {
        match self.identity_lookup_url()? {
            Some(lookup_url) => Ok(Some(IdentitySettings {
                lookup_url,
                api_key: self.identity_api_key.clone(),
                timeout: self.identity_timeout()?,
            })),
            None if mode == BuildMode::Release => Err(SettingsError::IdentityProviderRequired),
            None => Ok(None),
        }
    }

    pub fn empty_result_policy(&self) -> Result<EmptyResultPolicy, SettingsError> {
        self.applicant_empty_result
            .as_deref()
            .map_or(Ok(EmptyResultPolicy::default()), str::parse)
            .map_err(SettingsError::EmptyResultPolicy)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity: Option<IdentitySettings>,
    pub(crate) empty_result_policy: EmptyResultPolicy,
    pub(crate) build_mode: BuildMode,
}

/// Identity provider endpoint used by the HTTP verifier.
#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub lookup_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            identity: None,
            empty_result_policy: EmptyResultPolicy::default(),
            build_mode: BuildMode::from_debug_assertions(),
        }
    }

    /// Back the repositories with PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Verify tokens against a real provider instead of the fixture table.
    #[must_use]
    pub fn with_identity(mut self, identity: IdentitySettings) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Release mode refuses to start without an identity provider.
    #[must_use]
    pub fn with_build_mode(mut self, mode: BuildMode) -> Self {
        self.build_mode = mode;
        self
    }

    #[must_use]
    pub fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_result_policy = policy;
        self
    }
}
