/*
 * Responsibility
 * - Load settings from the environment (JWT secret, Supabase endpoint/keys, CORS, timeouts)
 * - Validate them once at startup (anything missing aborts the process before serving)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout_seconds: u64,

    // HMAC secret shared with the identity provider that issues access tokens
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,

    pub supabase_url: Url,
    pub supabase_key: String,
    pub service_role_key: Option<String>,
    pub supabase_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("jwt_audience", &self.jwt_audience)
            .field("supabase_url", &self.supabase_url.as_str())
            .field("service_role_key_set", &self.service_role_key.is_some())
            .field("supabase_timeout_seconds", &self.supabase_timeout_seconds)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout_seconds = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let jwt_secret = required_raw(&lookup, "JWT_SECRET")?;
        let jwt_audience = optional(&lookup, "JWT_AUDIENCE");

        let supabase_url = required(&lookup, "SUPABASE_URL")?;
        let supabase_url =
            Url::parse(&supabase_url).map_err(|_| ConfigError::Invalid("SUPABASE_URL"))?;
        if !matches!(supabase_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("SUPABASE_URL"));
        }

        let supabase_key = required(&lookup, "SUPABASE_KEY")?;
        let service_role_key = optional(&lookup, "SERVICE_ROLE_KEY");

        let supabase_timeout_seconds = lookup("SUPABASE_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout_seconds,
            jwt_secret,
            jwt_audience,
            supabase_url,
            supabase_key,
            service_role_key,
            supabase_timeout_seconds,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

// Secrets are compared byte for byte by the issuer, so surrounding
// whitespace is kept; only an all-blank value counts as missing.
fn required_raw<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
