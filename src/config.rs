//! Process-wide configuration.
//!
//! Everything here is loaded once at startup and never mutated afterwards.
//! Values come from the environment (and a `.env` file when present); the
//! lookup is injectable so tests never touch the real process environment.

use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use thiserror::Error;

/// Endpoint of the hosted real-time platform. Deliberately not configurable.
pub const SERVER_URL: &str = "wss://voice-agent-02t0q3nc.livekit.cloud";

/// The one room every participant (and the voice agent) joins.
pub const ROOM_NAME: &str = "test-room-22";

/// Lifetime of an issued access token.
pub const TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

pub const DEFAULT_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3000));

pub const API_KEY_VAR: &str = "LIVEKIT_API_KEY";
pub const API_SECRET_VAR: &str = "LIVEKIT_API_SECRET";
pub const ADDR_VAR: &str = "VOICEROOM_ADDR";
pub const SMTP_EMAIL_VAR: &str = "SMTP_EMAIL";
pub const SMTP_PASSWORD_VAR: &str = "SMTP_PASSWORD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// API key and secret used to sign access tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Sender account for booking confirmation mails.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when either secret is missing; reported per request, not at startup.
    pub credentials: Option<Credentials>,
    pub server_url: String,
    pub room_name: String,
    pub token_ttl: Duration,
    pub bind_addr: SocketAddr,
    pub smtp: Option<SmtpSettings>,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // empty values count as unset
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let credentials = match (get(API_KEY_VAR), get(API_SECRET_VAR)) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            _ => None,
        };

        let smtp = match (get(SMTP_EMAIL_VAR), get(SMTP_PASSWORD_VAR)) {
            (Some(email), Some(password)) => Some(SmtpSettings { email, password }),
            _ => None,
        };

        let bind_addr = match get(ADDR_VAR) {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidValue(ADDR_VAR.to_string(), addr.clone()))?,
            None => DEFAULT_ADDR,
        };

        Ok(Self {
            credentials,
            bind_addr,
            smtp,
            ..Self::default()
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: None,
            server_url: SERVER_URL.to_string(),
            room_name: ROOM_NAME.to_string(),
            token_ttl: TOKEN_TTL,
            bind_addr: DEFAULT_ADDR,
            smtp: None,
        }
    }
}
